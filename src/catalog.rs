//! The built-in patches, addressable by name.

use std::fmt;

use crate::config::PatchConfig;
use crate::content_v2::refresh_content;
use crate::document::Invariants;
use crate::error::{PatchError, Result};
use crate::locator::Locator;
use crate::procedure::Patch;
use crate::structured_patch::DocumentPatch;
use crate::text_patch::{BlockPatch, LiteralPatch};

/// Caption line that treated a zero `cap` as missing.
pub const POLICY_CAP_OLD: &str = r#"    rightCol.appendChild(createElement('p', { className: 'metric-caption', text: `加分封顶：${policy.cap || (policy.base || 0) + (policy.addonsCap || 0)} 分` }));
"#;

pub const POLICY_CAP_NEW: &str = r#"    const policyCapValue = typeof policy.cap === 'number' ? policy.cap : (policy.base || 0) + (policy.addonsCap || 0);
    rightCol.appendChild(createElement('p', { className: 'metric-caption', text: `加分封顶：${policyCapValue} 分` }));
"#;

/// Timeline renderer that stuffed title and description into innerHTML.
pub const FLOW_ITEMS_OLD: &str = r#"flow.timelineSteps.forEach((step) => {
  const stepEl = createElement('div', {
    className: 'glass-card flow-item',
    attrs: { tabindex: '0', role: 'button', 'aria-label': step.title }
  });
  stepEl.innerHTML = `<strong>${step.title}</strong><p class="metric-caption">${step.description}</p>`;
  listWrap.appendChild(stepEl);
});"#;

/// Renderer with a zero-padded step badge and text-only children.
pub const FLOW_ITEMS_NEW: &str = r#"flow.timelineSteps.forEach((step, idx) => {
  const stepEl = createElement('div', {
    className: 'glass-card flow-item',
    attrs: { tabindex: '0', role: 'button', 'aria-label': step.title, 'data-step-index': String(step.step || idx + 1) }
  });
  const indexBadge = createElement('span', { className: 'flow-step-index', text: String(step.step || idx + 1).padStart(2, '0') });
  const title = createElement('strong', { text: step.title });
  const desc = createElement('p', { className: 'flow-item-desc', text: step.description });
  stepEl.append(indexBadge, title, desc);
  listWrap.appendChild(stepEl);
});"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchKind {
    PolicyCap,
    FlowItems,
    MockV2,
}

impl PatchKind {
    pub const ALL: [PatchKind; 3] = [PatchKind::PolicyCap, PatchKind::FlowItems, PatchKind::MockV2];

    pub fn from_str_loose(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "policy-cap" => Ok(PatchKind::PolicyCap),
            "flow-items" => Ok(PatchKind::FlowItems),
            "mock-v2" => Ok(PatchKind::MockV2),
            _ => Err(PatchError::UnknownPatch(s.to_string())),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PatchKind::PolicyCap => "policy-cap",
            PatchKind::FlowItems => "flow-items",
            PatchKind::MockV2 => "mock-v2",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            PatchKind::PolicyCap => "use an explicit numeric policy cap in the S4 caption",
            PatchKind::FlowItems => "render business-flow steps with two-digit index badges",
            PatchKind::MockV2 => "rewrite the content document with the v2 sections",
        }
    }

    /// Build the patch against the artifacts `config` points at.
    pub fn build(self, config: &PatchConfig) -> Result<Box<dyn Patch>> {
        let patch: Box<dyn Patch> = match self {
            PatchKind::PolicyCap => Box::new(LiteralPatch::new(
                self.name(),
                self.description(),
                config.app_js_path(),
                POLICY_CAP_OLD,
                POLICY_CAP_NEW,
            )),
            PatchKind::FlowItems => Box::new(BlockPatch::new(
                self.name(),
                self.description(),
                config.app_js_path(),
                Locator::template(FLOW_ITEMS_OLD)?,
                FLOW_ITEMS_NEW,
            )),
            PatchKind::MockV2 => Box::new(DocumentPatch::new(
                self.name(),
                self.description(),
                config.content_path(),
                refresh_content,
            )
            .with_invariants(Invariants::CONTENT_V2)),
        };
        Ok(patch)
    }
}

impl fmt::Display for PatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
