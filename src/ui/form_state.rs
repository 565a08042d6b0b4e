use crate::config::Config;

use super::theme::{MAX_FONT_SIZE, MIN_FONT_SIZE};

/// Editable copy of the fields the settings dialog exposes.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub theme: String,
    pub model: String,
    pub font_size: u32,
}

impl FormState {
    pub fn from_config(config: &Config) -> Self {
        Self {
            theme: config.theme.clone(),
            model: config.model_or_default().to_string(),
            font_size: config.font_size,
        }
    }

    /// The whole config with the form's fields written over it; everything
    /// else, unknown keys included, is carried over unchanged.
    pub fn apply_to_config(&self, config: &Config) -> Config {
        let mut updated = config.clone();
        updated.theme = self.theme.clone();
        updated.model = Some(self.model.clone());
        updated.font_size = self.font_size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn form_starts_from_config() {
        let form = FormState::from_config(&Config::default());
        assert_eq!(form.theme, "dark");
        assert_eq!(form.model, "llama3.1");
        assert_eq!(form.font_size, 12);
    }

    #[test]
    fn apply_overwrites_fields_and_keeps_the_rest() {
        let mut config = Config::default();
        config.language = "en".into();
        config.extra.insert("shortcut".into(), json!("ctrl+space"));

        let mut form = FormState::from_config(&config);
        form.theme = "light".into();
        form.model = "llama2".into();
        form.font_size = 99;

        let updated = form.apply_to_config(&config);
        assert_eq!(updated.theme, "light");
        assert_eq!(updated.model.as_deref(), Some("llama2"));
        assert_eq!(updated.font_size, MAX_FONT_SIZE);
        assert_eq!(updated.language, "en");
        assert_eq!(updated.extra["shortcut"], json!("ctrl+space"));
        // the source config is untouched
        assert_eq!(config.theme, "dark");
    }
}
