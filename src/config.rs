use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{PatchError, Result};

/// Name of the optional config file looked up in the working directory.
pub const CONFIG_FILE: &str = "site-patch.toml";

pub const DEFAULT_APP_JS: &str = "assets/js/app.js";
pub const DEFAULT_CONTENT: &str = "assets/data/mock.json";

/// Where the site lives and how artifacts are written back.
///
/// Every field has a default, so an absent or empty config file reproduces
/// the fixed relative paths the patches were authored against.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PatchConfig {
    /// Site root the artifact paths are relative to.
    pub root: PathBuf,
    /// Write to a sibling temp file and rename over the target.
    pub atomic_writes: bool,
    /// Rendering script patched by `policy-cap` and `flow-items`.
    pub app_js: PathBuf,
    /// Content document rewritten by `mock-v2`.
    pub content: PathBuf,
}

impl Default for PatchConfig {
    fn default() -> Self {
        PatchConfig {
            root: PathBuf::from("."),
            atomic_writes: true,
            app_js: PathBuf::from(DEFAULT_APP_JS),
            content: PathBuf::from(DEFAULT_CONTENT),
        }
    }
}

impl PatchConfig {
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self> {
        toml::from_str(text).map_err(|source| PatchError::Config {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Load `path`, or fall back to defaults when it does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml_str(&text, path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(PatchError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn app_js_path(&self) -> PathBuf {
        self.root.join(&self.app_js)
    }

    pub fn content_path(&self) -> PathBuf {
        self.root.join(&self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_site_layout() {
        let cfg = PatchConfig::default();
        assert!(cfg.atomic_writes);
        assert_eq!(cfg.app_js_path(), Path::new("./assets/js/app.js"));
        assert_eq!(cfg.content_path(), Path::new("./assets/data/mock.json"));
    }

    #[test]
    fn test_empty_toml_is_default() {
        let cfg = PatchConfig::from_toml_str("", Path::new("x.toml")).unwrap();
        assert_eq!(cfg, PatchConfig::default());
    }

    #[test]
    fn test_partial_toml_overrides_only_given_keys() {
        let cfg = PatchConfig::from_toml_str(
            "root = \"site\"\natomic_writes = false\n",
            Path::new("x.toml"),
        )
        .unwrap();
        assert_eq!(cfg.root, PathBuf::from("site"));
        assert!(!cfg.atomic_writes);
        assert_eq!(cfg.app_js, PathBuf::from(DEFAULT_APP_JS));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = PatchConfig::from_toml_str("colour = \"red\"", Path::new("x.toml")).unwrap_err();
        assert!(matches!(err, PatchError::Config { .. }));
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = PatchConfig::load_or_default(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(cfg, PatchConfig::default());
    }
}
