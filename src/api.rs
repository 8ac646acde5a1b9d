use crate::adapt::BodyRules;
use crate::ast::Document;
use crate::classify::FieldRules;
use crate::error::ForgeError;
use crate::generator::{Generator, SkillContext, TargetArtifact, TargetAssessment, PRIMARY_DOCUMENT};
use crate::installer::{self, INSTALL_SCRIPT};
use crate::layout::detect_tier;
use crate::mcp;
use crate::parser::parse_document;
use crate::target::Target;
use log::{info, warn};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Options for a single conversion run.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub targets: Vec<Target>,
    pub output_dir: PathBuf,
    pub dry_run: bool,
    pub include_mcp: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            targets: Target::ALL.to_vec(),
            output_dir: PathBuf::from("./dist"),
            dry_run: false,
            include_mcp: false,
        }
    }
}

/// Per-target result of a full run. A failure here never aborts the other targets.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TargetOutcome {
    Generated(TargetArtifact),
    Failed { message: String },
}

/// The single structured result of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Report {
    Success {
        document_name: String,
        tier: u8,
        targets: BTreeMap<Target, TargetOutcome>,
        install_script: PathBuf,
    },
    DryRun {
        document_name: String,
        tier: u8,
        targets: BTreeMap<Target, TargetAssessment>,
    },
    Error {
        message: String,
    },
}

impl Report {
    pub fn error(err: &ForgeError) -> Self {
        let message = match err {
            ForgeError::Parse(parse) => format!("Invalid frontmatter: {parse}"),
            other => other.to_string(),
        };
        Report::Error { message }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Report::Error { .. })
    }

    /// Serializes the report into a pretty-printed JSON string.
    ///
    /// # Errors
    /// Returns a `serde_json::Error` if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Runs conversions with a fixed set of rule tables.
pub struct Converter {
    fields: FieldRules,
    body: BodyRules,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(FieldRules::default(), BodyRules::standard())
    }
}

impl Converter {
    pub fn new(fields: FieldRules, body: BodyRules) -> Self {
        Self { fields, body }
    }

    /// Converts the skill in `skill_dir` for every requested target.
    ///
    /// # Errors
    ///
    /// Fails before touching the output directory when `SKILL.md` is missing
    /// or its header cannot be parsed. I/O failures while writing one target
    /// are recorded in that target's outcome instead.
    pub fn convert(&self, skill_dir: &Path, options: &ConvertOptions) -> Result<Report, ForgeError> {
        let skill_dir = fs::canonicalize(skill_dir).map_err(|_| ForgeError::MissingDocument {
            path: skill_dir.to_path_buf(),
        })?;
        let doc_path = skill_dir.join(PRIMARY_DOCUMENT);
        if !doc_path.is_file() {
            return Err(ForgeError::MissingDocument { path: skill_dir });
        }
        let source = fs::read_to_string(&doc_path).map_err(|e| ForgeError::io(&doc_path, e))?;
        let document = parse_document(&source, &doc_path.to_string_lossy())?;

        let name = document_name(&document, &skill_dir);
        let tier = detect_tier(&skill_dir);
        let ctx = SkillContext {
            source_dir: &skill_dir,
            document: &document,
            name: &name,
            tier,
        };
        let generator = Generator::new(&self.fields, &self.body);

        if options.dry_run {
            let targets = options
                .targets
                .iter()
                .map(|&target| (target, generator.assess(&ctx, target)))
                .collect();
            return Ok(Report::DryRun {
                document_name: name,
                tier,
                targets,
            });
        }

        let output_dir = &options.output_dir;
        fs::create_dir_all(output_dir).map_err(|e| ForgeError::io(output_dir, e))?;

        let mut targets = BTreeMap::new();
        for &target in &options.targets {
            let outcome = match generator.generate(&ctx, target, output_dir) {
                Ok(artifact) => TargetOutcome::Generated(artifact),
                Err(e) => {
                    warn!("{target}: generation failed: {e}");
                    TargetOutcome::Failed {
                        message: e.to_string(),
                    }
                }
            };
            targets.insert(target, outcome);
        }

        if options.include_mcp {
            match mcp::locate(&skill_dir) {
                Some(config) => write_service_configs(&config, &name, &mut targets),
                None => info!("no {} found for {name}", mcp::SOURCE_FILE),
            }
        }

        let install_script = output_dir.join(INSTALL_SCRIPT);
        write_installer(&install_script, &installer::render(&name, &options.targets))?;

        Ok(Report::Success {
            document_name: name,
            tier,
            targets,
            install_script,
        })
    }
}

/// Converts the skill in `skill_dir` with the built-in rule tables.
pub fn convert(skill_dir: &Path, options: &ConvertOptions) -> Result<Report, ForgeError> {
    Converter::default().convert(skill_dir, options)
}

/// The `name` header value when it is usable as a directory name, otherwise
/// the skill directory's own name.
fn document_name(document: &Document, skill_dir: &Path) -> String {
    let usable = |n: &&str| !n.is_empty() && *n != "." && *n != ".." && !n.contains(&['/', '\\'][..]);
    match document.header.scalar("name").filter(usable) {
        Some(name) => name.to_string(),
        None => skill_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "skill".to_string()),
    }
}

fn write_service_configs(config: &Path, name: &str, targets: &mut BTreeMap<Target, TargetOutcome>) {
    for (&target, outcome) in targets.iter_mut() {
        let TargetOutcome::Generated(artifact) = outcome else {
            continue;
        };
        let Some(contents) = mcp::convert(config, target) else {
            continue;
        };
        let file = target.service_config_file();
        let path = artifact.output_dir.join(file);
        match fs::write(&path, contents) {
            Ok(()) => artifact.files_written.push(format!("{name}/{file}")),
            Err(e) => {
                let err = ForgeError::io(&path, e);
                warn!("{target}: {err}");
                *outcome = TargetOutcome::Failed {
                    message: err.to_string(),
                };
            }
        }
    }
}

fn write_installer(path: &Path, contents: &str) -> Result<(), ForgeError> {
    fs::write(path, contents).map_err(|e| ForgeError::io(path, e))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755))
            .map_err(|e| ForgeError::io(path, e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn skill(root: &Path, name: &str, contents: &str) -> PathBuf {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(PRIMARY_DOCUMENT), contents).unwrap();
        dir
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let root = tempdir().unwrap();
        let dir = skill(root.path(), "demo", "---\nname: demo\ndescription: d\n---\nBody");
        let out = root.path().join("dist");
        let options = ConvertOptions {
            output_dir: out.clone(),
            dry_run: true,
            ..ConvertOptions::default()
        };

        let report = convert(&dir, &options).unwrap();

        assert!(!out.exists());
        let Report::DryRun { targets, tier, .. } = report else {
            panic!("expected a dry run report");
        };
        assert_eq!(tier, 1);
        assert_eq!(targets.len(), 4);
        assert!(targets.values().all(|t| t.compatibility_score == 100));
    }

    #[test]
    fn test_document_name_falls_back_to_directory() {
        let doc = parse_document("---\nname: ../escape\n---\n", "SKILL.md").unwrap();
        assert_eq!(document_name(&doc, Path::new("/skills/demo")), "demo");

        let doc = parse_document("---\ndescription: d\n---\n", "SKILL.md").unwrap();
        assert_eq!(document_name(&doc, Path::new("/skills/other")), "other");
    }

    #[test]
    fn test_error_report_json() {
        let report = Report::error(&ForgeError::UnknownTarget {
            name: "claude".to_string(),
        });
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": "error", "message": "Invalid target: claude"})
        );
    }
}
