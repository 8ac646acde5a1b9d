use crate::error::ForgeError;
use serde::Serialize;
use std::fmt::{self, Display};
use std::str::FromStr;

/// A destination platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Codex,
    Gemini,
    Antigravity,
    Cursor,
}

impl Target {
    pub const ALL: [Target; 4] = [
        Target::Codex,
        Target::Gemini,
        Target::Antigravity,
        Target::Cursor,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Target::Codex => "codex",
            Target::Gemini => "gemini",
            Target::Antigravity => "antigravity",
            Target::Cursor => "cursor",
        }
    }

    /// Skill directories relative to the project root and the user's home.
    pub fn skill_dirs(self) -> (&'static str, &'static str) {
        match self {
            Target::Codex => (".agents/skills", "~/.agents/skills"),
            Target::Gemini => (".gemini/skills", "~/.gemini/skills"),
            Target::Antigravity => (".agent/skills", "~/.gemini/antigravity/skills"),
            Target::Cursor => (".cursor/skills", "~/.cursor/skills"),
        }
    }

    /// File name of the converted service configuration.
    pub fn service_config_file(self) -> &'static str {
        match self {
            Target::Codex => "config.toml",
            Target::Gemini => "settings.json",
            Target::Antigravity => "mcp_config.json",
            Target::Cursor => "mcp.json",
        }
    }

    /// Parses a comma-separated target list. `all` expands to every target.
    /// Duplicates are dropped, keeping the first occurrence.
    pub fn parse_list(csv: &str) -> Result<Vec<Target>, ForgeError> {
        let mut targets = Vec::new();
        for name in csv.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            let parsed: Vec<Target> = if name == "all" {
                Target::ALL.to_vec()
            } else {
                vec![name.parse()?]
            };
            for target in parsed {
                if !targets.contains(&target) {
                    targets.push(target);
                }
            }
        }
        if targets.is_empty() {
            return Err(ForgeError::UnknownTarget {
                name: csv.to_string(),
            });
        }
        Ok(targets)
    }
}

impl FromStr for Target {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Target::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ForgeError::UnknownTarget {
                name: s.to_string(),
            })
    }
}

impl Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
