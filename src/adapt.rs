use crate::target::Target;
use log::{debug, warn};
use regex::{NoExpand, Regex};
use std::collections::HashMap;

/// Maximum number of distinct examples quoted in an advisory notice.
pub const ADVISORY_EXAMPLE_CAP: usize = 3;

/// The body of a document after adaptation for one target.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AdaptationOutcome {
    pub adapted_body: String,
    pub notices: Vec<String>,
}

/// A mechanical rewrite. The replacement is inserted literally.
#[derive(Debug, Clone)]
pub struct RewriteRule {
    pattern: Regex,
    replacement: String,
}

impl RewriteRule {
    pub fn new(pattern: &str, replacement: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            replacement: replacement.to_string(),
        })
    }

    /// Builds a rule matching `text` exactly.
    pub fn literal(text: &str, replacement: &str) -> Result<Self, regex::Error> {
        Self::new(&regex::escape(text), replacement)
    }

    fn label(&self) -> String {
        self.pattern.as_str().replace('\\', "")
    }
}

/// A construct with no mechanical equivalent on any target.
#[derive(Debug, Clone)]
pub struct Advisory {
    pattern: Regex,
    message: String,
}

impl Advisory {
    pub fn new(pattern: &str, message: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            message: message.to_string(),
        })
    }
}

/// Per-target rewrite rules plus the shared advisory scan.
#[derive(Debug, Clone, Default)]
pub struct BodyRules {
    rewrites: HashMap<Target, Vec<RewriteRule>>,
    advisories: Vec<Advisory>,
}

impl BodyRules {
    /// The built-in tables. Within each target the narrow patterns come
    /// before the broad ones they overlap with.
    pub fn standard() -> Self {
        let mut rules = BodyRules::default();
        for target in Target::ALL {
            let (home, project, instructions) = match target {
                Target::Codex => ("~/.agents/", ".agents/", "AGENTS.md"),
                Target::Gemini => ("~/.gemini/", ".gemini/", "GEMINI.md"),
                Target::Antigravity => ("~/.gemini/antigravity/", ".agent/", "GEMINI.md"),
                Target::Cursor => ("~/.cursor/", ".cursor/", ".cursor/rules/"),
            };
            let mut pairs = vec![
                ("~/.claude/skills/", format!("{home}skills/")),
                (".claude/skills/", format!("{project}skills/")),
                ("~/.claude/", home.to_string()),
                (".claude/", project.to_string()),
                ("CLAUDE.md", instructions.to_string()),
            ];
            if target == Target::Antigravity {
                pairs.push(("./scripts/", "{{SKILL_PATH}}/scripts/".to_string()));
                pairs.push(("./references/", "{{SKILL_PATH}}/references/".to_string()));
            }
            let list = pairs
                .into_iter()
                .filter_map(|(from, to)| match RewriteRule::literal(from, &to) {
                    Ok(rule) => Some(rule),
                    Err(e) => {
                        warn!("{target}: skipping rewrite for '{from}': {e}");
                        None
                    }
                })
                .collect();
            rules.rewrites.insert(target, list);
        }

        rules.advisories = [
            (
                r"`/[a-z][\w-]+(?:\s+[a-z][\w-]+)*`",
                "Slash command syntax is Claude Code specific. Codex uses $mention, Gemini uses description-based activation.",
            ),
            (
                r"\bTask\s+tool\b",
                "Task tool (subagent delegation) is Claude Code specific. No direct equivalent on other platforms.",
            ),
            (r"\bspawn\s+(?:a\s+)?subagent", "Subagent spawning is Claude Code specific."),
            (r"\bcontext:\s*fork\b", "Forked context is Claude Code specific."),
            (r"\bhooks?\s*:", "Lifecycle hooks are Claude Code specific."),
        ]
        .into_iter()
        .filter_map(|(pattern, message)| match Advisory::new(pattern, message) {
            Ok(advisory) => Some(advisory),
            Err(e) => {
                warn!("skipping advisory '{pattern}': {e}");
                None
            }
        })
        .collect();

        rules
    }

    #[must_use]
    pub fn with_rewrites(mut self, target: Target, rules: Vec<RewriteRule>) -> Self {
        self.rewrites.insert(target, rules);
        self
    }

    #[must_use]
    pub fn with_advisory(mut self, advisory: Advisory) -> Self {
        self.advisories.push(advisory);
        self
    }

    pub fn adapt(&self, body: &str, target: Target) -> AdaptationOutcome {
        let mut adapted = body.to_string();
        let mut notices = Vec::new();

        for rule in self.rewrites.get(&target).into_iter().flatten() {
            let rewritten = rule
                .pattern
                .replace_all(&adapted, NoExpand(&rule.replacement))
                .into_owned();
            if rewritten != adapted {
                debug!("{target}: rewrote '{}'", rule.label());
                notices.push(format!(
                    "Auto-replaced '{}' -> '{}' in body text.",
                    rule.label(),
                    rule.replacement
                ));
                adapted = rewritten;
            }
        }

        // Scan the original text; rewritten paths must not look like hazards.
        for advisory in &self.advisories {
            let mut examples: Vec<&str> = Vec::new();
            for m in advisory.pattern.find_iter(body) {
                let text = m.as_str().trim();
                if !examples.contains(&text) {
                    examples.push(text);
                }
                if examples.len() == ADVISORY_EXAMPLE_CAP {
                    break;
                }
            }
            if !examples.is_empty() {
                let found = examples
                    .iter()
                    .map(|e| format!("'{e}'"))
                    .collect::<Vec<_>>()
                    .join(", ");
                notices.push(format!(
                    "Manual review needed: {} Found: {found}",
                    advisory.message
                ));
            }
        }

        AdaptationOutcome {
            adapted_body: adapted,
            notices,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_tables_are_complete() {
        let rules = BodyRules::standard();
        let sizes: Vec<(Target, usize)> = Target::ALL
            .iter()
            .map(|t| (*t, rules.rewrites[t].len()))
            .collect();

        assert_eq!(
            sizes,
            vec![
                (Target::Codex, 5),
                (Target::Gemini, 5),
                (Target::Antigravity, 7),
                (Target::Cursor, 5),
            ]
        );
        assert_eq!(rules.advisories.len(), 5);
    }

    #[test]
    fn test_narrow_rule_wins_over_broad() {
        let rules = BodyRules::standard();
        let outcome = rules.adapt("Install into ~/.claude/skills/demo", Target::Codex);

        assert_eq!(outcome.adapted_body, "Install into ~/.agents/skills/demo");
        assert_eq!(
            outcome.notices,
            vec!["Auto-replaced '~/.claude/skills/' -> '~/.agents/skills/' in body text."]
        );
    }

    #[test]
    fn test_mixed_narrow_and_broad_paths() {
        let rules = BodyRules::standard();
        let body = "See ~/.claude/skills/x and .claude/settings.json";
        let outcome = rules.adapt(body, Target::Antigravity);

        assert_eq!(
            outcome.adapted_body,
            "See ~/.gemini/antigravity/skills/x and .agent/settings.json"
        );
        assert_eq!(outcome.notices.len(), 2);
    }

    #[test]
    fn test_literal_replacement_with_braces() {
        let rules = BodyRules::standard();
        let outcome = rules.adapt("Run ./scripts/run.sh", Target::Antigravity);
        assert_eq!(outcome.adapted_body, "Run {{SKILL_PATH}}/scripts/run.sh");

        let untouched = rules.adapt("Run ./scripts/run.sh", Target::Gemini);
        assert_eq!(untouched.adapted_body, "Run ./scripts/run.sh");
        assert!(untouched.notices.is_empty());
    }

    #[test]
    fn test_cursor_instruction_file_rewrite() {
        let outcome = BodyRules::standard().adapt("Edit CLAUDE.md first.", Target::Cursor);
        assert_eq!(outcome.adapted_body, "Edit .cursor/rules/ first.");
    }

    #[test]
    fn test_advisory_leaves_body_untouched() {
        let rules = BodyRules::standard();
        let body = "Use the Task tool to spawn a subagent.";
        let outcome = rules.adapt(body, Target::Gemini);

        assert_eq!(outcome.adapted_body, body);
        assert_eq!(outcome.notices.len(), 2);
        assert!(outcome.notices[0].starts_with("Manual review needed: Task tool"));
        assert!(outcome.notices[0].ends_with("Found: 'Task tool'"));
        assert!(outcome.notices[1].contains("'spawn a subagent'"));
    }

    #[test]
    fn test_advisory_examples_deduplicated_and_capped() {
        let rules = BodyRules::standard();
        let body = "`/alpha` `/beta` `/alpha` `/gamma` `/delta`";
        let outcome = rules.adapt(body, Target::Codex);

        assert_eq!(outcome.notices.len(), 1);
        assert!(outcome.notices[0].ends_with("Found: '`/alpha`', '`/beta`', '`/gamma`'"));
    }

    #[test]
    fn test_advisory_scans_original_body() {
        let rules = BodyRules::default()
            .with_advisory(Advisory::new(r"\bhooks?\s*:", "Hooks.").unwrap())
            .with_rewrites(
                Target::Cursor,
                vec![RewriteRule::literal("hooks:", "triggers:").unwrap()],
            );

        let outcome = rules.adapt("hooks: none", Target::Cursor);
        assert_eq!(outcome.adapted_body, "triggers: none");
        assert_eq!(outcome.notices.len(), 2);
    }
}
