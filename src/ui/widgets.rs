use eframe::egui;
use egui::{vec2, Color32, RichText, TextureHandle};
use std::path::Path;

use crate::conversation::{Message, Sender};

use super::theme::*;

pub const LOGO_PATH: &str = "/usr/share/icons/nubemlinux/logo.png";
const LOGO_SIZE: u32 = 48;

/// Load an image scaled to fit `size`×`size`, keeping its aspect ratio.
pub fn load_scaled_rgba(path: &Path, size: u32) -> Result<image::RgbaImage, String> {
    let img = image::open(path).map_err(|e| format!("Failed to load {}: {}", path.display(), e))?;
    Ok(img
        .resize(size, size, image::imageops::FilterType::Triangle)
        .to_rgba8())
}

/// Missing or unreadable logos leave the header without an image.
pub fn load_logo(ctx: &egui::Context) -> Option<TextureHandle> {
    let rgba = match load_scaled_rgba(Path::new(LOGO_PATH), LOGO_SIZE) {
        Ok(rgba) => rgba,
        Err(e) => {
            log::debug!("[ui] no logo: {}", e);
            return None;
        }
    };
    let (w, h) = rgba.dimensions();
    let color_image =
        egui::ColorImage::from_rgba_unmultiplied([w as usize, h as usize], rgba.as_raw());
    Some(ctx.load_texture("logo", color_image, egui::TextureOptions::LINEAR))
}

/// Returns true when the copy button was clicked.
pub fn header(ui: &mut egui::Ui, logo: Option<&TextureHandle>) -> bool {
    ui.horizontal(|ui| {
        if let Some(tex) = logo {
            ui.add(egui::Image::new(tex).fit_to_exact_size(tex.size_vec2()));
        }
        ui.label(RichText::new("NubemCopilot").size(20.0).strong());
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            icon_button(ui, "📋", "Copy conversation").clicked()
        })
        .inner
    })
    .inner
}

fn sender_color(sender: Sender, p: ThemePalette) -> Color32 {
    match sender {
        Sender::Error => ERROR_RED,
        Sender::Assistant => ACCENT_HOVER,
        _ => p.text,
    }
}

/// `[HH:MM] sender: body` followed by a blank line.
pub fn message_row(ui: &mut egui::Ui, message: &Message, p: ThemePalette, body_size: f32) {
    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing.x = 4.0;
        ui.label(
            RichText::new(format!("[{}]", message.time_label()))
                .size(body_size * 0.9)
                .color(p.text_muted),
        );
        ui.label(
            RichText::new(format!("{}:", message.sender.label()))
                .size(body_size)
                .strong()
                .color(sender_color(message.sender, p)),
        );
        ui.label(RichText::new(&message.body).size(body_size).color(p.text));
    });
    ui.add_space(body_size);
}

pub fn status_bar(ui: &mut egui::Ui, text: &str, is_error: bool, p: ThemePalette) {
    ui.horizontal(|ui| {
        ui.add_space(4.0);
        let color = if is_error { ERROR_RED } else { p.text_muted };
        ui.label(RichText::new(text).size(12.0).color(color));
    });
    ui.add_space(2.0);
}

pub fn icon_button(ui: &mut egui::Ui, glyph: &str, tooltip: &str) -> egui::Response {
    ui.add(egui::Button::new(RichText::new(glyph).size(16.0)).min_size(vec2(36.0, 32.0)))
        .on_hover_text(tooltip)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logo_is_scaled_within_bounds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.png");
        image::RgbaImage::from_pixel(200, 100, image::Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();

        let scaled = load_scaled_rgba(&path, LOGO_SIZE).unwrap();
        assert_eq!(scaled.dimensions(), (48, 24));
    }

    #[test]
    fn missing_logo_is_an_error() {
        assert!(load_scaled_rgba(Path::new("/no/such/logo.png"), LOGO_SIZE).is_err());
    }
}
