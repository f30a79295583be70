// The content literals in `content_v2` nest deeper than the default
// `json!` expansion limit allows.
#![recursion_limit = "256"]

pub mod artifact;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod content_v2;
pub mod document;
pub mod error;
pub mod inspect;
pub mod locator;
pub mod procedure;
pub mod rules;
pub mod structured_patch;
pub mod text_patch;

pub use catalog::PatchKind;
pub use document::ContentDocument;
pub use error::{PatchError, Result, Violation};
pub use procedure::{run_patch, Patch, PatchReport, PatchRun, PatchState, RunOptions};

use artifact::WriteMode;
use config::PatchConfig;

/// Apply the named patches in order against `config`, stopping at the first
/// failure.  Patches already applied in this call stay applied.
pub fn apply_named(names: &[String], config: &PatchConfig, dry_run: bool) -> Result<Vec<PatchReport>> {
    // resolve every name before touching any artifact
    let kinds = names
        .iter()
        .map(|n| PatchKind::from_str_loose(n))
        .collect::<Result<Vec<_>>>()?;

    let options = RunOptions {
        write_mode: WriteMode::from_atomic(config.atomic_writes),
        dry_run,
    };

    let mut reports = Vec::with_capacity(kinds.len());
    for kind in kinds {
        let patch = kind.build(config)?;
        reports.push(run_patch(patch.as_ref(), options)?);
    }
    Ok(reports)
}
