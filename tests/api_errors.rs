use skill_forge::error::{ForgeError, ParseError};
use skill_forge::{convert, ConvertOptions, Report, Target};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_missing_document() {
    let root = tempdir().unwrap();
    let out = root.path().join("dist");
    let options = ConvertOptions {
        output_dir: out.clone(),
        ..ConvertOptions::default()
    };

    let err = convert(root.path(), &options).unwrap_err();
    assert!(matches!(err, ForgeError::MissingDocument { .. }));
    assert!(err.to_string().starts_with("SKILL.md not found in "));
    assert!(!out.exists());
}

#[test]
fn test_missing_directory() {
    let root = tempdir().unwrap();
    let err = convert(&root.path().join("nope"), &ConvertOptions::default()).unwrap_err();
    assert!(matches!(err, ForgeError::MissingDocument { .. }));
}

#[test]
fn test_bad_header_fails_before_writing() {
    let root = tempdir().unwrap();
    let dir = root.path().join("broken");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("SKILL.md"), "---\nname: broken\n").unwrap();
    let out = root.path().join("dist");
    let options = ConvertOptions {
        output_dir: out.clone(),
        ..ConvertOptions::default()
    };

    let err = convert(&dir, &options).unwrap_err();
    assert!(matches!(
        err,
        ForgeError::Parse(ParseError::MissingClosingDelimiter { .. })
    ));
    assert!(!out.exists());

    let report = Report::error(&err);
    assert_eq!(
        report,
        Report::Error {
            message: "Invalid frontmatter: Missing closing '---' delimiter".to_string()
        }
    );
}

#[test]
fn test_unknown_target() {
    let err = Target::parse_list("codex,claude").unwrap_err();
    assert!(matches!(err, ForgeError::UnknownTarget { ref name } if name == "claude"));
    assert_eq!(err.to_string(), "Invalid target: claude");
}

#[test]
fn test_empty_target_list() {
    assert!(matches!(
        Target::parse_list(""),
        Err(ForgeError::UnknownTarget { .. })
    ));
}

#[test]
fn test_failed_target_does_not_abort_the_run() {
    let root = tempdir().unwrap();
    let dir = root.path().join("demo");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("SKILL.md"), "---\nname: demo\ndescription: d\n---\nBody").unwrap();
    let out = root.path().join("dist");
    fs::create_dir_all(&out).unwrap();
    // A plain file where the codex tree should go.
    fs::write(out.join("codex"), "in the way").unwrap();

    let options = ConvertOptions {
        targets: vec![Target::Codex, Target::Gemini],
        output_dir: out.clone(),
        ..ConvertOptions::default()
    };
    let report = convert(&dir, &options).unwrap();

    let Report::Success { targets, .. } = report else {
        panic!("expected success");
    };
    assert!(matches!(
        targets[&Target::Codex],
        skill_forge::TargetOutcome::Failed { .. }
    ));
    assert!(matches!(
        targets[&Target::Gemini],
        skill_forge::TargetOutcome::Generated(_)
    ));
    assert!(out.join("gemini/demo/GEMINI.md").is_file());
}
