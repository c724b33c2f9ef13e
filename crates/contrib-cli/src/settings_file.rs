use std::path::{Path, PathBuf};

use anyhow::Context;
use contrib_core::WidgetSettings;
use serde_json::{Map, Value};

/// `<data dir>/contrib-graph/config.json`, or `./contrib-graph.json` when the
/// platform has no data directory.
pub fn default_path() -> PathBuf {
    match dirs::data_dir() {
        Some(dir) => dir.join("contrib-graph").join("config.json"),
        None => PathBuf::from("contrib-graph.json"),
    }
}

/// Raw key/value view of the settings file. Missing file is an empty map.
pub fn read_raw(path: &Path) -> anyhow::Result<Map<String, Value>> {
    if !path.exists() {
        return Ok(Map::new());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let val: Value = serde_json::from_str(&content)
        .with_context(|| format!("parsing {}", path.display()))?;
    match val {
        Value::Object(map) => Ok(map),
        _ => Ok(Map::new()),
    }
}

pub fn write_raw(path: &Path, config: &Map<String, Value>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    contrib_store::write_atomic(path, json.as_bytes())
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Typed settings. Unset keys take their defaults.
pub fn to_settings(config: &Map<String, Value>) -> anyhow::Result<WidgetSettings> {
    let settings = serde_json::from_value(Value::Object(config.clone()))?;
    Ok(settings)
}

pub fn load(path: &Path) -> anyhow::Result<WidgetSettings> {
    to_settings(&read_raw(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contrib_core::{DisplayMode, YearSetting};

    #[test]
    fn missing_file_is_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let s = load(&tmp.path().join("nope.json")).unwrap();
        assert_eq!(s, WidgetSettings::default());
    }

    #[test]
    fn write_then_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("config.json");
        let settings = WidgetSettings {
            display_mode: DisplayMode::Month,
            year: YearSetting::Fixed(2022),
            ..WidgetSettings::default()
        };
        let Value::Object(map) = serde_json::to_value(&settings).unwrap() else {
            panic!("settings must serialize to an object");
        };
        write_raw(&path, &map).unwrap();
        assert_eq!(load(&path).unwrap(), settings);

        let raw = read_raw(&path).unwrap();
        assert_eq!(raw["displayMode"], "month");
        assert_eq!(raw["year"], 2022);
    }

    #[test]
    fn non_object_file_reads_as_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, "[1, 2]").unwrap();
        assert!(read_raw(&path).unwrap().is_empty());
    }
}
