use eframe::egui;
use std::path::PathBuf;

use crate::config::Config;
use crate::voice::{PlaceholderRecorder, VoiceSession};

use super::form_state::FormState;
use super::theme::*;

/// Per-frame result of a modal dialog.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogOutcome<T> {
    Open,
    Confirmed(T),
    Cancelled,
}

fn modal_window(title: &str) -> egui::Window<'_> {
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
}

fn dialog_buttons(ui: &mut egui::Ui) -> (bool, bool) {
    let mut ok = false;
    let mut cancel = false;
    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
        ok = ui.button("OK").clicked();
        cancel = ui.button("Cancel").clicked();
    });
    (ok, cancel)
}

pub struct SettingsDialog {
    base: Config,
    form: FormState,
}

impl SettingsDialog {
    pub fn new(config: &Config) -> Self {
        Self {
            base: config.clone(),
            form: FormState::from_config(config),
        }
    }

    pub fn show(&mut self, ctx: &egui::Context) -> DialogOutcome<Config> {
        let mut ok = false;
        let mut cancel = false;
        modal_window("Settings")
            .default_width(400.0)
            .show(ctx, |ui| {
                egui::Grid::new("settings_grid")
                    .num_columns(2)
                    .spacing([16.0, 10.0])
                    .show(ui, |ui| {
                        ui.label("Theme:");
                        egui::ComboBox::from_id_salt("theme_select")
                            .selected_text(option_label(THEME_OPTIONS, &self.form.theme))
                            .show_ui(ui, |ui| {
                                for (id, name) in THEME_OPTIONS {
                                    ui.selectable_value(&mut self.form.theme, id.to_string(), *name);
                                }
                            });
                        ui.end_row();

                        ui.label("AI model:");
                        egui::ComboBox::from_id_salt("model_select")
                            .selected_text(option_label(MODEL_OPTIONS, &self.form.model))
                            .show_ui(ui, |ui| {
                                for (id, name) in MODEL_OPTIONS {
                                    ui.selectable_value(&mut self.form.model, id.to_string(), *name);
                                }
                            });
                        ui.end_row();

                        ui.label("Font size:");
                        ui.add(egui::Slider::new(
                            &mut self.form.font_size,
                            MIN_FONT_SIZE..=MAX_FONT_SIZE,
                        ));
                        ui.end_row();
                    });
                ui.add_space(12.0);
                (ok, cancel) = dialog_buttons(ui);
            });

        if ok {
            DialogOutcome::Confirmed(self.form.apply_to_config(&self.base))
        } else if cancel {
            DialogOutcome::Cancelled
        } else {
            DialogOutcome::Open
        }
    }
}

pub struct VoiceDialog {
    session: Option<VoiceSession<PlaceholderRecorder>>,
}

impl VoiceDialog {
    pub fn new() -> Self {
        Self {
            session: Some(VoiceSession::new(PlaceholderRecorder)),
        }
    }

    /// Confirmed carries the recorded file, or `None` when nothing was recorded.
    pub fn show(&mut self, ctx: &egui::Context) -> DialogOutcome<Option<PathBuf>> {
        let Some(session) = self.session.as_mut() else {
            return DialogOutcome::Cancelled;
        };
        let mut ok = false;
        let mut cancel = false;
        modal_window("Voice recording")
            .default_width(300.0)
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label("Press the button to record");
                    ui.add_space(6.0);
                    let label = if session.is_recording() {
                        "⏹ Stop"
                    } else {
                        "🎤 Record"
                    };
                    if ui
                        .add(egui::SelectableLabel::new(session.is_recording(), label))
                        .clicked()
                    {
                        session.toggle();
                    }
                });
                ui.add_space(12.0);
                (ok, cancel) = dialog_buttons(ui);
            });

        if ok {
            let recorded = self.session.take().and_then(|s| s.finish());
            DialogOutcome::Confirmed(recorded)
        } else if cancel {
            if let Some(s) = self.session.take() {
                let _ = s.finish();
            }
            DialogOutcome::Cancelled
        } else {
            DialogOutcome::Open
        }
    }
}
