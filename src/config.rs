use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_MODEL: &str = "llama3.1";
pub const DEFAULT_ASSISTANT_URL: &str = "http://localhost:11434";
pub const DEFAULT_MAX_IN_FLIGHT: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    pub theme: String,
    pub font_size: u32,
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Base URL of the assistant backend (Ollama API).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assistant_url: Option<String>,
    /// Upper bound on concurrently running assistant requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_in_flight: Option<usize>,
    /// Keys this version does not know about; written back untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Config {
    /// Known keys are read one by one; a key holding an unusable value falls
    /// back to its default without touching the others. Everything else
    /// lands in `extra`.
    pub fn from_map(mut map: Map<String, Value>) -> Self {
        let mut config = Config::default();
        if let Some(theme) = take_string(&mut map, "theme") {
            config.theme = theme;
        }
        if let Some(size) = take_uint(&mut map, "font_size").and_then(|n| u32::try_from(n).ok()) {
            config.font_size = size;
        }
        if let Some(language) = take_string(&mut map, "language") {
            config.language = language;
        }
        config.model = take_string(&mut map, "model");
        config.assistant_url = take_string(&mut map, "assistant_url");
        config.max_in_flight =
            take_uint(&mut map, "max_in_flight").and_then(|n| usize::try_from(n).ok());
        config.extra = map;
        config
    }

    pub fn model_or_default(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn assistant_url_or_default(&self) -> &str {
        self.assistant_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_ASSISTANT_URL)
    }

    pub fn max_in_flight_or_default(&self) -> usize {
        self.max_in_flight.unwrap_or(DEFAULT_MAX_IN_FLIGHT).max(1)
    }

    pub fn is_dark(&self) -> bool {
        self.theme != "light"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            font_size: default_font_size(),
            language: default_language(),
            model: None,
            assistant_url: None,
            max_in_flight: None,
            extra: Map::new(),
        }
    }
}

fn take_string(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    match map.remove(key)? {
        Value::String(s) => Some(s),
        other => {
            log::debug!("config key {} ignored, expected a string: {}", key, other);
            None
        }
    }
}

/// Accepts non-negative integers and numeric strings such as `"14"`.
fn take_uint(map: &mut Map<String, Value>, key: &str) -> Option<u64> {
    let value = map.remove(key)?;
    let parsed = match &value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    if parsed.is_none() {
        log::debug!("config key {} ignored, expected a whole number: {}", key, value);
    }
    parsed
}

fn default_theme() -> String {
    "dark".into()
}
fn default_font_size() -> u32 {
    12
}
fn default_language() -> String {
    "es".into()
}

pub fn config_path() -> Result<PathBuf, String> {
    if let Some(dir) = dirs::config_dir() {
        return Ok(dir.join("nubemcopilot").join("config.json"));
    }
    if let Some(home) = dirs::home_dir() {
        return Ok(home.join(".config").join("nubemcopilot").join("config.json"));
    }
    Err("Failed to resolve config directory".into())
}

pub fn load() -> Config {
    match config_path() {
        Ok(path) => load_from(&path),
        Err(e) => {
            log::debug!("{}; using default config", e);
            Config::default()
        }
    }
}

/// An unreadable file, malformed JSON, or a non-object document yields the
/// defaults. Bad values inside a valid document only reset their own key.
pub fn load_from(path: &Path) -> Config {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            log::debug!("config not read from {}: {}", path.display(), e);
            return Config::default();
        }
    };
    match serde_json::from_str::<Value>(&text) {
        Ok(Value::Object(map)) => Config::from_map(map),
        Ok(other) => {
            log::debug!("config at {} is not an object: {}", path.display(), other);
            Config::default()
        }
        Err(e) => {
            log::debug!("config at {} not parseable: {}", path.display(), e);
            Config::default()
        }
    }
}

pub fn save(config: &Config) -> Result<(), String> {
    let path = config_path()?;
    save_to(&path, config)
}

pub fn save_to(path: &Path, config: &Config) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| format!("Failed to create config dir: {}", e))?;
    }
    let json = serde_json::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;
    fs::write(path, json).map_err(|e| format!("Failed to write config: {}", e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_from(&dir.path().join("config.json"));
        assert_eq!(config, Config::default());
        assert_eq!(config.theme, "dark");
        assert_eq!(config.font_size, 12);
        assert_eq!(config.language, "es");
        assert_eq!(config.model_or_default(), "llama3.1");
    }

    #[test]
    fn garbage_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_from(&path), Config::default());
    }

    #[test]
    fn default_document_has_three_keys() {
        let value = serde_json::to_value(Config::default()).unwrap();
        assert_eq!(
            value,
            json!({ "theme": "dark", "font_size": 12, "language": "es" })
        );
    }

    #[test]
    fn save_creates_parent_dirs_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("nubemcopilot").join("config.json");
        let mut config = Config::default();
        config.theme = "light".into();
        config.model = Some("llama2".into());

        save_to(&path, &config).unwrap();
        let loaded = load_from(&path);
        assert_eq!(loaded, config);

        save_to(&path, &loaded).unwrap();
        assert_eq!(load_from(&path), loaded);
    }

    #[test]
    fn unknown_keys_survive_load_modify_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"theme":"dark","font_size":14,"language":"en","window":{"w":800},"beta":true}"#,
        )
        .unwrap();

        let mut config = load_from(&path);
        assert_eq!(config.font_size, 14);
        config.theme = "light".into();
        config.model = Some("llama2".into());
        save_to(&path, &config).unwrap();

        let raw: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["window"], json!({ "w": 800 }));
        assert_eq!(raw["beta"], json!(true));
        assert_eq!(raw["theme"], json!("light"));
        assert_eq!(raw["model"], json!("llama2"));
    }

    #[test]
    fn mistyped_known_key_keeps_the_rest_of_the_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"theme":"light","font_size":"14","language":"en","shortcut":"ctrl+space"}"#,
        )
        .unwrap();

        let config = load_from(&path);
        assert_eq!(config.theme, "light");
        assert_eq!(config.font_size, 14);
        assert_eq!(config.language, "en");
        assert_eq!(config.extra["shortcut"], json!("ctrl+space"));

        save_to(&path, &config).unwrap();
        let raw: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["shortcut"], json!("ctrl+space"));
        assert_eq!(raw["theme"], json!("light"));
    }

    #[test]
    fn unusable_values_reset_only_their_own_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"theme":null,"font_size":-1,"language":"en","model":7,"max_in_flight":3,"beta":true}"#,
        )
        .unwrap();

        let config = load_from(&path);
        assert_eq!(config.theme, "dark");
        assert_eq!(config.font_size, 12);
        assert_eq!(config.language, "en");
        assert_eq!(config.model, None);
        assert_eq!(config.max_in_flight, Some(3));
        assert_eq!(config.extra["beta"], json!(true));
        assert!(!config.extra.contains_key("theme"));
    }

    #[test]
    fn non_object_document_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "[1, 2, 3]").unwrap();
        assert_eq!(load_from(&path), Config::default());
    }

    #[test]
    fn blank_assistant_url_falls_back() {
        let mut config = Config::default();
        config.assistant_url = Some("  ".into());
        assert_eq!(config.assistant_url_or_default(), DEFAULT_ASSISTANT_URL);
        config.max_in_flight = Some(0);
        assert_eq!(config.max_in_flight_or_default(), 1);
    }
}
