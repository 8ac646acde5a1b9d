use crate::adapt::BodyRules;
use crate::ast::{Document, Header};
use crate::classify::{CleanedHeader, FieldClassification, FieldRules};
use crate::error::ForgeError;
use crate::layout::{copy_subtree, AUX_SUBTREES};
use crate::serialization::to_header_text;
use crate::target::Target;
use log::info;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const PRIMARY_DOCUMENT: &str = "SKILL.md";

/// Everything a generator needs to know about the skill being converted.
#[derive(Debug, Clone, Copy)]
pub struct SkillContext<'a> {
    pub source_dir: &'a Path,
    pub document: &'a Document,
    pub name: &'a str,
    pub tier: u8,
}

/// What one target's generation produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetArtifact {
    pub output_dir: PathBuf,
    pub files_written: Vec<String>,
    pub compatibility_score: u8,
    pub notices: Vec<String>,
    pub manual_steps: Vec<String>,
}

/// A dry-run view of one target: the same analysis, nothing written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetAssessment {
    pub compatibility_score: u8,
    pub notices: Vec<String>,
    pub manual_steps: Vec<String>,
    pub fields: FieldClassification,
}

/// Produces per-target variants of a skill from a fixed set of rule tables.
pub struct Generator<'a> {
    fields: &'a FieldRules,
    body: &'a BodyRules,
}

impl<'a> Generator<'a> {
    pub fn new(fields: &'a FieldRules, body: &'a BodyRules) -> Self {
        Self { fields, body }
    }

    pub fn assess(&self, ctx: &SkillContext<'_>, target: Target) -> TargetAssessment {
        let header = &ctx.document.header;
        let fields = self.fields.classify(header, target);
        let cleaned = self.fields.clean(header, target);
        let adapted = self.body.adapt(&ctx.document.body, target);

        let mut notices = cleaned.notices;
        notices.extend(adapted.notices);

        TargetAssessment {
            compatibility_score: fields.compatibility_score(),
            notices,
            manual_steps: manual_steps(target, ctx.tier),
            fields,
        }
    }

    /// Writes the variant for `target` under `output_root/<target>/<name>/`.
    pub fn generate(
        &self,
        ctx: &SkillContext<'_>,
        target: Target,
        output_root: &Path,
    ) -> Result<TargetArtifact, ForgeError> {
        let header = &ctx.document.header;
        let classification = self.fields.classify(header, target);
        let cleaned = self.fields.clean(header, target);
        let adapted = self.body.adapt(&ctx.document.body, target);

        let mut out = OutputTree::new(output_root, target, ctx.name);

        out.write(
            PRIMARY_DOCUMENT,
            &primary_document(&cleaned.header, &adapted.adapted_body),
        )?;

        match target {
            Target::Codex => {
                out.write("agents/openai.yaml", &openai_manifest(ctx.name, &cleaned)?)?;
                out.write("AGENTS.md", &instruction_file(header, ctx.name, &adapted.adapted_body))?;
            }
            Target::Gemini | Target::Antigravity => {
                out.write("GEMINI.md", &instruction_file(header, ctx.name, &adapted.adapted_body))?;
            }
            Target::Cursor => {
                let rule = cursor_rule(header, &adapted.adapted_body)?;
                out.write(&format!("rules/{}.mdc", ctx.name), &rule)?;
            }
        }

        for subtree in AUX_SUBTREES {
            let src = ctx.source_dir.join(subtree);
            if src.is_dir() {
                let copied = copy_subtree(&src, &out.skill_dir.join(subtree))?;
                out.record(copied);
            }
        }

        info!("{target}: wrote {} files", out.files.len());

        let mut notices = cleaned.notices;
        notices.extend(adapted.notices);

        Ok(TargetArtifact {
            output_dir: out.skill_dir,
            files_written: out.files,
            compatibility_score: classification.compatibility_score(),
            notices,
            manual_steps: manual_steps(target, ctx.tier),
        })
    }
}

/// Tracks files written below `output_root/<target>/`.
struct OutputTree {
    target_root: PathBuf,
    skill_dir: PathBuf,
    files: Vec<String>,
}

impl OutputTree {
    fn new(output_root: &Path, target: Target, name: &str) -> Self {
        let target_root = output_root.join(target.as_str());
        let skill_dir = target_root.join(name);
        Self {
            target_root,
            skill_dir,
            files: Vec::new(),
        }
    }

    fn write(&mut self, relative: &str, contents: &str) -> Result<(), ForgeError> {
        let path = self.skill_dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ForgeError::io(parent, e))?;
        }
        fs::write(&path, contents).map_err(|e| ForgeError::io(&path, e))?;
        self.record([path]);
        Ok(())
    }

    fn record(&mut self, paths: impl IntoIterator<Item = PathBuf>) {
        for path in paths {
            self.files.push(relative_to(&self.target_root, &path));
        }
    }
}

/// `path` relative to `root`, always with `/` separators.
pub(crate) fn relative_to(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn primary_document(header: &Header, body: &str) -> String {
    let header_text = to_header_text(header);
    if body.is_empty() {
        format!("{header_text}\n")
    } else {
        format!("{header_text}\n\n{body}\n")
    }
}

/// `demo-skill` becomes `Demo Skill`.
pub fn display_name(name: &str) -> String {
    name.replace('-', " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Drops a leading `# Title` line (and the blank lines after it), since the
/// generated files carry their own top-level heading.
pub fn strip_leading_heading(body: &str) -> &str {
    let mut rest = body;
    for line in body.split_inclusive('\n') {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            rest = &rest[line.len()..];
            continue;
        }
        if trimmed.starts_with("# ") {
            rest = &rest[line.len()..];
        } else {
            return body.trim();
        }
        break;
    }
    rest.trim()
}

fn instruction_file(header: &Header, name: &str, body: &str) -> String {
    let description = header.scalar("description").unwrap_or_default();
    let mut lines = vec![
        format!("# {}", display_name(name)),
        String::new(),
        description.to_string(),
    ];
    let trimmed = strip_leading_heading(body);
    if !trimmed.is_empty() {
        lines.push(String::new());
        lines.push(trimmed.to_string());
    }
    lines.join("\n") + "\n"
}

#[derive(Serialize)]
struct OpenAiManifest {
    interface: OpenAiInterface,
    policy: OpenAiPolicy,
}

#[derive(Serialize)]
struct OpenAiInterface {
    display_name: String,
}

#[derive(Serialize)]
struct OpenAiPolicy {
    allow_implicit_invocation: bool,
}

/// The Codex platform extension. `disable-model-invocation` is relocated here
/// and inverted into `allow_implicit_invocation`.
fn openai_manifest(name: &str, cleaned: &CleanedHeader) -> Result<String, ForgeError> {
    let disabled = cleaned
        .relocated_scalar("disable-model-invocation")
        .is_some_and(|v| v.eq_ignore_ascii_case("true"));
    let manifest = OpenAiManifest {
        interface: OpenAiInterface {
            display_name: display_name(name),
        },
        policy: OpenAiPolicy {
            allow_implicit_invocation: !disabled,
        },
    };
    serde_yaml::to_string(&manifest).map_err(|source| ForgeError::Render {
        file: "agents/openai.yaml".to_string(),
        source,
    })
}

#[derive(Serialize)]
struct CursorRuleHeader<'a> {
    description: &'a str,
    #[serde(rename = "alwaysApply")]
    always_apply: bool,
}

fn cursor_rule(header: &Header, body: &str) -> Result<String, ForgeError> {
    let rule_header = CursorRuleHeader {
        description: header.scalar("description").unwrap_or_default(),
        always_apply: false,
    };
    let yaml = serde_yaml::to_string(&rule_header).map_err(|source| ForgeError::Render {
        file: "cursor rule".to_string(),
        source,
    })?;
    let mut text = format!("---\n{yaml}---\n");
    let trimmed = strip_leading_heading(body);
    if !trimmed.is_empty() {
        text.push('\n');
        text.push_str(trimmed);
        text.push('\n');
    }
    Ok(text)
}

/// Follow-up work the converter cannot do, keyed by complexity tier.
pub fn manual_steps(target: Target, tier: u8) -> Vec<String> {
    let (routing, delegation) = match target {
        Target::Codex => (
            "Routing table uses Claude Code slash commands. Adapt to Codex $mention syntax.",
            "Subagent delegation (Task tool) has no direct Codex equivalent. Consider breaking into separate skills.",
        ),
        Target::Gemini => (
            "Routing table uses Claude Code slash commands. Gemini relies on description-based activation.",
            "Subagent delegation (Task tool) has no Gemini CLI equivalent.",
        ),
        Target::Antigravity => (
            "Routing table is Claude Code specific. Antigravity uses description-based activation.",
            "Subagent delegation (Task tool) has no Antigravity equivalent.",
        ),
        Target::Cursor => (
            "Routing table is Claude Code specific. Cursor uses description-based activation.",
            "Cursor has single-level subagents only (Background Agents, Ultra plan). Task tool delegation needs manual adaptation.",
        ),
    };
    let mut steps = Vec::new();
    if tier >= 3 {
        steps.push(routing.to_string());
    }
    if tier >= 4 {
        steps.push(delegation.to_string());
    }
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_document;
    use tempfile::tempdir;

    const SOURCE: &str = "---\nname: demo-skill\ndescription: Does X. Use when user says \"x\".\nallowed-tools:\n  - Read\n  - Grep\ndisable-model-invocation: true\nmodel: opus\n---\n\n# Demo Skill\n\nSee ~/.claude/skills/demo-skill and run ./scripts/go.sh\n";

    fn generate(target: Target) -> (tempfile::TempDir, TargetArtifact) {
        let src = tempdir().unwrap();
        let out = tempdir().unwrap();
        let document = parse_document(SOURCE, "SKILL.md").unwrap();
        let fields = FieldRules::default();
        let body = BodyRules::standard();
        let ctx = SkillContext {
            source_dir: src.path(),
            document: &document,
            name: "demo-skill",
            tier: 1,
        };
        let artifact = Generator::new(&fields, &body)
            .generate(&ctx, target, out.path())
            .unwrap();
        (out, artifact)
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("demo-skill"), "Demo Skill");
        assert_eq!(display_name("PDF-tools"), "Pdf Tools");
    }

    #[test]
    fn test_strip_leading_heading() {
        assert_eq!(strip_leading_heading("\n# Title\n\n\nBody\n"), "Body");
        assert_eq!(strip_leading_heading("## Section\n\nBody"), "## Section\n\nBody");
        assert_eq!(strip_leading_heading("Intro\n# Title"), "Intro\n# Title");
        assert_eq!(strip_leading_heading("# Only"), "");
    }

    #[test]
    fn test_codex_output() {
        let (out, artifact) = generate(Target::Codex);

        assert_eq!(
            artifact.files_written,
            vec![
                "demo-skill/SKILL.md",
                "demo-skill/agents/openai.yaml",
                "demo-skill/AGENTS.md"
            ]
        );
        let skill = fs::read_to_string(out.path().join("codex/demo-skill/SKILL.md")).unwrap();
        assert!(skill.contains("allowed-tools:\n  - Read\n  - Grep"));
        assert!(!skill.contains("disable-model-invocation"));
        assert!(!skill.contains("model: opus"));
        assert!(skill.contains("See ~/.agents/skills/demo-skill"));

        let manifest =
            fs::read_to_string(out.path().join("codex/demo-skill/agents/openai.yaml")).unwrap();
        assert!(manifest.contains("display_name: Demo Skill"));
        assert!(manifest.contains("allow_implicit_invocation: false"));

        let agents = fs::read_to_string(out.path().join("codex/demo-skill/AGENTS.md")).unwrap();
        assert!(agents.starts_with("# Demo Skill\n\nDoes X."));
        assert_eq!(agents.matches("# Demo Skill").count(), 1);

        // 2 portable, 2 adaptable (keep + relocate), 1 unsupported
        assert_eq!(artifact.compatibility_score, 60);
    }

    #[test]
    fn test_cursor_rule_file() {
        let (out, artifact) = generate(Target::Cursor);

        assert!(artifact
            .files_written
            .contains(&"demo-skill/rules/demo-skill.mdc".to_string()));
        let rule =
            fs::read_to_string(out.path().join("cursor/demo-skill/rules/demo-skill.mdc")).unwrap();
        assert!(rule.starts_with("---\ndescription: "));
        assert!(rule.contains("alwaysApply: false\n---\n\nSee ~/.cursor/skills/demo-skill"));
        assert_eq!(artifact.compatibility_score, 40);
    }

    #[test]
    fn test_antigravity_rewrites_script_paths() {
        let (out, _) = generate(Target::Antigravity);
        let gemini = fs::read_to_string(out.path().join("antigravity/demo-skill/GEMINI.md")).unwrap();
        assert!(gemini.contains("run {{SKILL_PATH}}/scripts/go.sh"));
    }

    #[test]
    fn test_manual_steps_by_tier() {
        assert!(manual_steps(Target::Gemini, 2).is_empty());
        assert_eq!(manual_steps(Target::Gemini, 3).len(), 1);
        let steps = manual_steps(Target::Cursor, 4);
        assert_eq!(steps.len(), 2);
        assert!(steps[1].starts_with("Cursor has single-level subagents"));
    }

    #[test]
    fn test_relative_to() {
        let root = Path::new("/out/codex");
        assert_eq!(
            relative_to(root, Path::new("/out/codex/demo/scripts/a.sh")),
            "demo/scripts/a.sh"
        );
    }
}
