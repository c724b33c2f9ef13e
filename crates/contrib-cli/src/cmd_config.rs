use clap::Subcommand;
use serde_json::Value;
use std::path::Path;

use crate::settings_file;

// ── CLI Schema ──

#[derive(Subcommand)]
pub enum ConfigCmd {
    /// Set a setting
    Set {
        /// Setting key, camelCase (e.g. displayMode, refreshInterval)
        key: String,
        /// Value (true/false/number/string)
        value: String,
    },
    /// Get a setting, falling back to its default
    Get {
        /// Setting key
        key: String,
    },
    /// List all settings, defaults included
    List,
    /// Remove a setting so it takes its default again
    Unset {
        /// Setting key
        key: String,
    },
}

// ── Dispatch ──

pub fn run(cmd: ConfigCmd, path: &Path) -> anyhow::Result<()> {
    match cmd {
        ConfigCmd::Set { key, value } => set(path, &key, &value),
        ConfigCmd::Get { key } => get(path, &key),
        ConfigCmd::List => list(path),
        ConfigCmd::Unset { key } => unset(path, &key),
    }
}

// ── Command Implementations ──

/// Parse a string value into an appropriate JSON value (bool/number/string).
fn parse_value(s: &str) -> Value {
    match s {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => {
            if let Ok(n) = s.parse::<i64>() {
                Value::Number(n.into())
            } else if let Ok(f) = s.parse::<f64>() {
                serde_json::json!(f)
            } else {
                Value::String(s.to_string())
            }
        }
    }
}

/// Every key the settings snapshot knows, with its effective value.
fn effective(path: &Path) -> anyhow::Result<serde_json::Map<String, Value>> {
    let settings = settings_file::load(path)?;
    match serde_json::to_value(settings)? {
        Value::Object(map) => Ok(map),
        _ => Ok(serde_json::Map::new()),
    }
}

/// `contrib-graph config set <key> <value>`
pub fn set(path: &Path, key: &str, value: &str) -> anyhow::Result<()> {
    let known = effective(path)?;
    if !known.contains_key(key) && key != "backgroundColor" {
        anyhow::bail!("unknown setting: {key}");
    }
    let mut config = settings_file::read_raw(path)?;
    config.insert(key.to_string(), parse_value(value));
    if let Err(e) = settings_file::to_settings(&config) {
        anyhow::bail!("invalid value for {key}: {e}");
    }
    settings_file::write_raw(path, &config)?;
    println!("{key} = {value}");
    Ok(())
}

/// `contrib-graph config get <key>`
pub fn get(path: &Path, key: &str) -> anyhow::Result<()> {
    let config = effective(path)?;
    match config.get(key) {
        Some(val) => println!("{val}"),
        None => println!("(not set)"),
    }
    Ok(())
}

/// `contrib-graph config list`
pub fn list(path: &Path) -> anyhow::Result<()> {
    let explicit = settings_file::read_raw(path)?;
    for (k, v) in &effective(path)? {
        let marker = if explicit.contains_key(k) { "" } else { "  (default)" };
        println!("{k} = {v}{marker}");
    }
    Ok(())
}

/// `contrib-graph config unset <key>`
pub fn unset(path: &Path, key: &str) -> anyhow::Result<()> {
    let mut config = settings_file::read_raw(path)?;
    if config.remove(key).is_none() {
        println!("(not set)");
        return Ok(());
    }
    settings_file::write_raw(path, &config)?;
    println!("{key} unset");
    Ok(())
}
