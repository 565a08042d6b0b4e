use eframe::egui::{self, vec2, Color32, Stroke};

use crate::config::Config;

pub const ACCENT: Color32 = Color32::from_rgb(0x0d, 0x73, 0x77);
pub const ACCENT_HOVER: Color32 = Color32::from_rgb(0x14, 0xa1, 0xa5);
pub const ERROR_RED: Color32 = Color32::from_rgb(0xef, 0x44, 0x44);

pub const THEME_OPTIONS: &[(&str, &str)] = &[("light", "Light"), ("dark", "Dark")];
pub const MODEL_OPTIONS: &[(&str, &str)] = &[("llama3.1", "Llama 3.1"), ("llama2", "Llama 2")];

pub const MIN_FONT_SIZE: u32 = 8;
pub const MAX_FONT_SIZE: u32 = 24;

#[derive(Clone, Copy)]
pub struct ThemePalette {
    pub window_bg: Color32,
    pub log_bg: Color32,
    pub input_bg: Color32,
    pub border: Color32,
    pub text: Color32,
    pub text_muted: Color32,
}

pub fn theme_palette(dark: bool) -> ThemePalette {
    if dark {
        ThemePalette {
            window_bg: Color32::from_rgb(0x2b, 0x2b, 0x2b),
            log_bg: Color32::from_rgb(0x1e, 0x1e, 0x1e),
            input_bg: Color32::from_rgb(0x3c, 0x3c, 0x3c),
            border: Color32::from_rgb(0x55, 0x55, 0x55),
            text: Color32::WHITE,
            text_muted: Color32::from_rgb(0x88, 0x88, 0x88),
        }
    } else {
        ThemePalette {
            window_bg: Color32::from_rgb(0xf4, 0xf4, 0xf4),
            log_bg: Color32::WHITE,
            input_bg: Color32::WHITE,
            border: Color32::from_rgb(0xc8, 0xc8, 0xc8),
            text: Color32::from_rgb(0x1e, 0x1e, 0x1e),
            text_muted: Color32::from_rgb(0x88, 0x88, 0x88),
        }
    }
}

pub fn option_label<'a>(options: &'a [(&'a str, &'a str)], id: &'a str) -> &'a str {
    options
        .iter()
        .find(|(opt, _)| *opt == id)
        .map(|(_, name)| *name)
        .unwrap_or(id)
}

/// Body text size for the conversation view.
pub fn body_size(config: &Config) -> f32 {
    config.font_size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE) as f32
}

pub fn apply_theme(ctx: &egui::Context, config: &Config) {
    let p = theme_palette(config.is_dark());
    let mut visuals = if config.is_dark() {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    };
    visuals.panel_fill = p.window_bg;
    visuals.window_fill = p.window_bg;
    visuals.extreme_bg_color = p.input_bg;
    visuals.selection.bg_fill = ACCENT;
    if config.is_dark() {
        visuals.widgets.inactive.weak_bg_fill = ACCENT;
        visuals.widgets.inactive.bg_stroke = Stroke::NONE;
        visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, Color32::WHITE);
        visuals.widgets.hovered.weak_bg_fill = ACCENT_HOVER;
        visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, Color32::WHITE);
        visuals.widgets.active.weak_bg_fill = ACCENT_HOVER;
    }
    ctx.set_visuals(visuals);

    let mut style = (*ctx.style()).clone();
    style.spacing.item_spacing = vec2(10.0, 8.0);
    style.spacing.button_padding = vec2(16.0, 8.0);
    style.spacing.interact_size.y = 28.0;
    ctx.set_style(style);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_fall_back_to_id() {
        assert_eq!(option_label(MODEL_OPTIONS, "llama2"), "Llama 2");
        assert_eq!(option_label(MODEL_OPTIONS, "mistral"), "mistral");
        assert_eq!(option_label(THEME_OPTIONS, "dark"), "Dark");
    }

    #[test]
    fn font_size_is_clamped() {
        let mut config = Config::default();
        assert_eq!(body_size(&config), 12.0);
        config.font_size = 200;
        assert_eq!(body_size(&config), MAX_FONT_SIZE as f32);
    }
}
