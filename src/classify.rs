use crate::ast::{Header, HeaderValue};
use crate::target::Target;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// What happens to an adaptable key on a given target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdaptAction {
    Keep,
    Strip,
    /// The key leaves the primary header and is expressed in a separate
    /// platform file instead.
    Relocate,
}

/// Why a key cannot be carried to a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unsupported {
    /// A source-platform key with a known explanation.
    Known { reason: String },
    /// A key no table mentions.
    Unknown,
    /// An adaptable key whose action on this target is `strip`.
    Stripped,
}

/// Resolution of a single header key for a single target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldClass {
    Portable,
    Adaptable(AdaptAction),
    Unsupported(Unsupported),
}

/// Rule tables driving field classification.
#[derive(Debug, Clone)]
pub struct FieldRules {
    portable: BTreeSet<String>,
    adaptable: HashMap<String, HashMap<Target, AdaptAction>>,
    source_only: HashMap<String, String>,
}

impl Default for FieldRules {
    fn default() -> Self {
        use AdaptAction::{Keep, Relocate, Strip};

        let mut rules = FieldRules::empty();
        for key in [
            "name",
            "description",
            "license",
            "compatibility",
            "metadata",
            "argument-hint",
        ] {
            rules = rules.with_portable(key);
        }
        rules = rules
            .with_adaptable(
                "allowed-tools",
                &[
                    (Target::Codex, Keep),
                    (Target::Gemini, Strip),
                    (Target::Antigravity, Strip),
                    (Target::Cursor, Strip),
                ],
            )
            .with_adaptable(
                "disable-model-invocation",
                &[
                    (Target::Codex, Relocate),
                    (Target::Gemini, Strip),
                    (Target::Antigravity, Strip),
                    (Target::Cursor, Strip),
                ],
            );
        for (key, reason) in [
            ("context", "No equivalent. Subagent isolation is Claude Code specific."),
            ("agent", "No equivalent. Agent delegation is Claude Code specific."),
            ("hooks", "No equivalent. Lifecycle hooks are Claude Code specific."),
            ("model", "No equivalent. Model selection is Claude Code specific."),
            ("user-invocable", "Skills are always discoverable on other platforms."),
            ("skills", "No equivalent. Sub-skill references are Claude Code specific."),
            ("memory", "No equivalent. Persistent memory is Claude Code specific."),
        ] {
            rules = rules.with_source_only(key, reason);
        }
        rules
    }
}

impl FieldRules {
    /// Tables with no entries: every key is unknown.
    pub fn empty() -> Self {
        Self {
            portable: BTreeSet::new(),
            adaptable: HashMap::new(),
            source_only: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_portable(mut self, key: &str) -> Self {
        self.portable.insert(key.to_string());
        self
    }

    #[must_use]
    pub fn with_adaptable(mut self, key: &str, actions: &[(Target, AdaptAction)]) -> Self {
        self.adaptable
            .insert(key.to_string(), actions.iter().copied().collect());
        self
    }

    #[must_use]
    pub fn with_source_only(mut self, key: &str, reason: &str) -> Self {
        self.source_only.insert(key.to_string(), reason.to_string());
        self
    }

    /// Resolves one key for `target`. Targets missing from an adaptable
    /// key's row default to `strip`.
    pub fn resolve(&self, key: &str, target: Target) -> FieldClass {
        if self.portable.contains(key) {
            return FieldClass::Portable;
        }
        if let Some(actions) = self.adaptable.get(key) {
            return match actions.get(&target).copied().unwrap_or(AdaptAction::Strip) {
                AdaptAction::Strip => FieldClass::Unsupported(Unsupported::Stripped),
                action => FieldClass::Adaptable(action),
            };
        }
        match self.source_only.get(key) {
            Some(reason) => FieldClass::Unsupported(Unsupported::Known {
                reason: reason.clone(),
            }),
            None => FieldClass::Unsupported(Unsupported::Unknown),
        }
    }

    pub fn classify(&self, header: &Header, target: Target) -> FieldClassification {
        let mut classification = FieldClassification::default();
        for key in header.keys() {
            let bucket = match self.resolve(key, target) {
                FieldClass::Portable => &mut classification.portable,
                FieldClass::Adaptable(_) => &mut classification.adaptable,
                FieldClass::Unsupported(_) => &mut classification.unsupported,
            };
            bucket.push(key.to_string());
        }
        classification
    }

    /// Drops everything `target` cannot carry and pulls out relocated keys.
    pub fn clean(&self, header: &Header, target: Target) -> CleanedHeader {
        let mut cleaned = CleanedHeader::default();
        for (key, value) in header.iter() {
            match self.resolve(key, target) {
                FieldClass::Portable | FieldClass::Adaptable(AdaptAction::Keep) => {
                    cleaned.header.insert(key, value.clone());
                }
                FieldClass::Adaptable(AdaptAction::Relocate) => {
                    cleaned
                        .notices
                        .push(format!("Field '{key}' moved to openai.yaml (Codex platform extension)"));
                    cleaned.relocated.insert(key, value.clone());
                }
                FieldClass::Adaptable(AdaptAction::Strip) | FieldClass::Unsupported(Unsupported::Stripped) => {
                    let mut notice = format!("Field '{key}' removed: not supported on {target}.");
                    if key == "allowed-tools" {
                        notice.push_str(" All tools available by default on this platform.");
                    }
                    cleaned.notices.push(notice);
                }
                FieldClass::Unsupported(Unsupported::Known { reason }) => {
                    cleaned.notices.push(format!("Field '{key}' removed: {reason}"));
                }
                FieldClass::Unsupported(Unsupported::Unknown) => {
                    cleaned.notices.push(format!(
                        "Field '{key}' removed: unknown field, may be Claude Code specific."
                    ));
                }
            }
        }
        cleaned
    }
}

/// Header keys partitioned by how well they carry to one target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldClassification {
    pub portable: Vec<String>,
    pub adaptable: Vec<String>,
    pub unsupported: Vec<String>,
}

impl FieldClassification {
    pub fn total(&self) -> usize {
        self.portable.len() + self.adaptable.len() + self.unsupported.len()
    }

    /// Lossiness estimate in `0..=100`: portable keys weigh 1, adaptable 0.5,
    /// unsupported 0. An empty header scores 100.
    pub fn compatibility_score(&self) -> u8 {
        let total = self.total();
        if total == 0 {
            return 100;
        }
        let weighted = self.portable.len() as f64 + self.adaptable.len() as f64 * 0.5;
        let score = (100.0 * weighted / total as f64).round();
        score.clamp(0.0, 100.0) as u8
    }
}

/// Result of [`FieldRules::clean`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanedHeader {
    pub header: Header,
    pub relocated: Header,
    pub notices: Vec<String>,
}

impl CleanedHeader {
    pub fn relocated_scalar(&self, key: &str) -> Option<&str> {
        self.relocated.get(key).and_then(HeaderValue::as_scalar)
    }
}
