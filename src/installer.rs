use crate::target::Target;

pub const INSTALL_SCRIPT: &str = "install-multiplatform.sh";

fn title(target: Target) -> String {
    let name = target.as_str();
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Renders a bash installer that detects the agent platform (or takes it as
/// the first argument) and copies the matching converted tree into place.
pub fn render(skill_name: &str, targets: &[Target]) -> String {
    let has = |t: Target| targets.contains(&t);
    let supported: Vec<String> = targets.iter().map(|t| title(*t)).collect();
    let names: Vec<&str> = targets.iter().map(|t| t.as_str()).collect();

    let mut lines: Vec<String> = vec![
        "#!/usr/bin/env bash".into(),
        format!("# Multi-platform installer for {skill_name}"),
        format!("# Supports: Claude Code, {}", supported.join(", ")),
        "# Usage: bash install.sh [--platform claude|codex|gemini|antigravity|cursor]".into(),
        String::new(),
        "set -euo pipefail".into(),
        String::new(),
        r#"SCRIPT_DIR="$(cd "$(dirname "${BASH_SOURCE[0]}")" && pwd)""#.into(),
        r#"PLATFORM="${1:-auto}""#.into(),
        String::new(),
        "detect_platform() {".into(),
        r#"    if [ -d "$HOME/.claude" ]; then"#.into(),
        r#"        echo "claude""#.into(),
    ];

    let mut detect = |dir: &str, platform: &str| {
        lines.push(format!(r#"    elif [ -d "$HOME/{dir}" ]; then"#));
        lines.push(format!(r#"        echo "{platform}""#));
    };
    if has(Target::Codex) {
        detect(".agents", "codex");
    }
    if has(Target::Cursor) {
        detect(".cursor", "cursor");
    }
    if has(Target::Gemini) || has(Target::Antigravity) {
        detect(".gemini", "gemini");
    }

    lines.extend(
        [
            "    else",
            r#"        echo "claude"  # Default"#,
            "    fi",
            "}",
            "",
            r#"if [ "$PLATFORM" = "auto" ] || [ "$PLATFORM" = "--auto" ]; then"#,
            "    PLATFORM=$(detect_platform)",
            r#"    echo "Detected platform: $PLATFORM""#,
            "fi",
            "",
            "# Strip -- prefix if provided as flag",
            r#"PLATFORM="${PLATFORM#--}""#,
            r#"PLATFORM="${PLATFORM#--platform=}""#,
            "",
            r#"case "$PLATFORM" in"#,
            "    claude)",
            r#"        SKILL_DIR="$HOME/.claude/skills""#,
            "        ;;",
        ]
        .map(String::from),
    );

    for target in targets {
        let (_, user_dir) = target.skill_dirs();
        let home_relative = user_dir.trim_start_matches("~/");
        lines.push(format!("    {})", target.as_str()));
        lines.push(format!(r#"        SKILL_DIR="$HOME/{home_relative}""#));
        lines.push("        ;;".into());
    }

    lines.extend([
        "    *)".to_string(),
        r#"        echo "Unknown platform: $PLATFORM""#.to_string(),
        format!(r#"        echo "Supported: claude, {}""#, names.join(", ")),
        "        exit 1".to_string(),
        "        ;;".to_string(),
        "esac".to_string(),
        String::new(),
        r#"echo "Installing to: $SKILL_DIR""#.to_string(),
        r#"mkdir -p "$SKILL_DIR""#.to_string(),
        String::new(),
        "# Copy skill for the target platform".to_string(),
        r#"if [ -d "$SCRIPT_DIR/$PLATFORM" ]; then"#.to_string(),
        r#"    cp -r "$SCRIPT_DIR/$PLATFORM"/* "$SKILL_DIR/""#.to_string(),
        r#"elif [ -d "$SCRIPT_DIR/claude" ]; then"#.to_string(),
        "    # Fallback to claude version".to_string(),
        r#"    cp -r "$SCRIPT_DIR/claude"/* "$SKILL_DIR/""#.to_string(),
        "fi".to_string(),
        String::new(),
        r#"echo """#.to_string(),
        format!(r#"echo "{skill_name} installed for $PLATFORM!""#),
        String::new(),
    ]);

    lines.join("\n") + "\n"
}
