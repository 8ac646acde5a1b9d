//! Conversion of `.mcp.json` service configuration into each target's native
//! configuration file.

use crate::target::Target;
use log::warn;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

pub const SOURCE_FILE: &str = ".mcp.json";

#[derive(Debug, Deserialize)]
struct SourceConfig {
    #[serde(rename = "mcpServers", default)]
    servers: Map<String, Value>,
}

/// One service entry. Fields are read independently and a malformed field is
/// skipped on its own.
#[derive(Debug, Default)]
struct ServiceEntry {
    command: String,
    mode: Option<String>,
    args: Vec<String>,
    env: Vec<(String, String)>,
}

impl ServiceEntry {
    fn from_value(name: &str, raw: &Value) -> Self {
        let Some(fields) = raw.as_object() else {
            warn!("service '{name}' is not an object, emitting defaults");
            return Self::default();
        };
        let args = match fields.get("args") {
            Some(Value::Array(items)) => items.iter().map(scalar_text).collect(),
            Some(other) => {
                warn!("service '{name}' has non-list args {other}, ignoring them");
                Vec::new()
            }
            None => Vec::new(),
        };
        let env = match fields.get("env") {
            Some(Value::Object(vars)) => vars
                .iter()
                .map(|(key, value)| (key.clone(), scalar_text(value)))
                .collect(),
            Some(other) => {
                warn!("service '{name}' has a non-object env {other}, ignoring it");
                Vec::new()
            }
            None => Vec::new(),
        };
        Self {
            command: fields.get("command").map(scalar_text).unwrap_or_default(),
            mode: fields.get("type").map(scalar_text),
            args,
            env,
        }
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Converts the service configuration at `path` for `target`.
///
/// Returns `None` when the file is missing, cannot be parsed, or declares no
/// services.
pub fn convert(path: &Path, target: Target) -> Option<String> {
    let servers = load_servers(path)?;
    match target {
        Target::Codex => Some(to_toml(&servers)),
        Target::Gemini | Target::Antigravity | Target::Cursor => to_json(servers),
    }
}

/// Finds the service configuration for a skill: beside the skill first, then
/// in its parent directory.
pub fn locate(skill_dir: &Path) -> Option<std::path::PathBuf> {
    let local = skill_dir.join(SOURCE_FILE);
    if local.is_file() {
        return Some(local);
    }
    let shared = skill_dir.parent()?.join(SOURCE_FILE);
    shared.is_file().then_some(shared)
}

fn load_servers(path: &Path) -> Option<Map<String, Value>> {
    let raw = fs::read_to_string(path).ok()?;
    let config: SourceConfig = match serde_json::from_str(&raw) {
        Ok(config) => config,
        Err(e) => {
            warn!("ignoring unparseable {}: {e}", path.display());
            return None;
        }
    };
    (!config.servers.is_empty()).then_some(config.servers)
}

fn to_json(servers: Map<String, Value>) -> Option<String> {
    let mut root = Map::new();
    root.insert("mcpServers".to_string(), Value::Object(servers));
    serde_json::to_string_pretty(&Value::Object(root)).ok()
}

fn to_toml(servers: &Map<String, Value>) -> String {
    let mut lines: Vec<String> = Vec::new();
    for (name, raw) in servers {
        let entry = ServiceEntry::from_value(name, raw);
        let table = format!("mcp_servers.{}", toml_key(name));
        lines.push(format!("[{table}]"));

        if !entry.command.is_empty() {
            lines.push(format!("command = {}", toml_string(&entry.command)));
        }
        let mode = entry.mode.as_deref().unwrap_or("stdio");
        lines.push(format!("type = {}", toml_string(mode)));
        if !entry.args.is_empty() {
            let args: Vec<String> = entry.args.iter().map(|a| toml_string(a)).collect();
            lines.push(format!("args = [{}]", args.join(", ")));
        }
        if !entry.env.is_empty() {
            lines.push(String::new());
            lines.push(format!("[{table}.env]"));
            for (key, value) in &entry.env {
                lines.push(format!("{} = {}", toml_key(key), toml_string(value)));
            }
        }
        lines.push(String::new());
    }
    lines.join("\n")
}

fn toml_string(value: &str) -> String {
    toml::Value::String(value.to_string()).to_string()
}

fn toml_key(key: &str) -> String {
    let bare = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if bare {
        key.to_string()
    } else {
        toml_string(key)
    }
}
