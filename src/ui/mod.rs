pub mod dialogs;
pub mod form_state;
pub mod theme;
pub mod widgets;

use crate::config::{self, Config};
use crate::conversation::Sender;
use crate::dispatch::{Dispatcher, RequestKind, SessionStatus, SubmitOutcome};
use crate::gateway::{self, AssistantGateway};
use eframe::egui;
use egui::{RichText, TextureHandle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dialogs::{DialogOutcome, SettingsDialog, VoiceDialog};
use theme::*;
use widgets::*;

pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];
const WELCOME: &str = "Hello! I'm NubemCopilot, your AI assistant. How can I help you?";
const NOTE_TIMEOUT: Duration = Duration::from_secs(4);

pub struct NubemCopilotApp {
    pub config: Config,
    pub dispatcher: Dispatcher,
    pub input: String,
    pub logo: Option<TextureHandle>,
    pub settings_dialog: Option<SettingsDialog>,
    pub voice_dialog: Option<VoiceDialog>,
    // Transient status-bar override (busy rejection, save failure).
    note: Option<(String, Instant)>,
    focus_input: bool,
}

impl NubemCopilotApp {
    pub fn new(ctx: &egui::Context, config: Config, gateway: Arc<dyn AssistantGateway>) -> Self {
        apply_theme(ctx, &config);

        let mut dispatcher = Dispatcher::new(gateway, config.max_in_flight_or_default());
        let repaint_ctx = ctx.clone();
        dispatcher.set_waker(move || repaint_ctx.request_repaint());
        dispatcher.conversation_mut().push(Sender::Assistant, WELCOME);

        Self {
            logo: load_logo(ctx),
            config,
            dispatcher,
            input: String::new(),
            settings_dialog: None,
            voice_dialog: None,
            note: None,
            focus_input: true,
        }
    }

    fn modal_open(&self) -> bool {
        self.settings_dialog.is_some() || self.voice_dialog.is_some()
    }

    fn set_note(&mut self, text: &str) {
        self.note = Some((text.into(), Instant::now()));
    }

    fn status_text(&self) -> (String, bool) {
        if let Some((note, _)) = &self.note {
            return (note.clone(), true);
        }
        if self.dispatcher.status() == SessionStatus::Idle && self.dispatcher.last_failed() {
            return ("Error".into(), true);
        }
        (self.dispatcher.status_label().into(), false)
    }

    fn submit(&mut self, kind: RequestKind) -> bool {
        match self.dispatcher.submit(kind) {
            SubmitOutcome::Accepted(id) => {
                log::debug!("[ui] request {} dispatched", id);
                self.note = None;
                true
            }
            SubmitOutcome::Busy => {
                self.set_note("Still working on earlier requests, try again shortly");
                false
            }
            SubmitOutcome::Ignored => false,
        }
    }

    fn send_text(&mut self) {
        let text = std::mem::take(&mut self.input);
        if !self.submit(RequestKind::Text(text.clone())) && !text.trim().is_empty() {
            // rejected, keep what the user typed
            self.input = text;
        }
        self.focus_input = true;
    }

    fn pick_image(&mut self) {
        let picked = rfd::FileDialog::new()
            .set_title("Select image")
            .add_filter("Images", IMAGE_EXTENSIONS)
            .pick_file();
        if let Some(path) = picked {
            self.submit(RequestKind::Image(path));
        }
    }

    fn process_voice(&mut self, audio_file: PathBuf) {
        self.submit(RequestKind::VoiceTranscribe(audio_file));
    }

    fn apply_config(&mut self, ctx: &egui::Context, updated: Config) {
        let backend_changed = updated.model_or_default() != self.config.model_or_default()
            || updated.assistant_url_or_default() != self.config.assistant_url_or_default();
        self.config = updated;
        if let Err(e) = config::save(&self.config) {
            log::error!("[ui] {}", e);
            self.set_note(&format!("Save failed: {}", e));
        }
        if backend_changed {
            self.dispatcher
                .set_gateway(gateway::create_gateway(&self.config));
        }
        apply_theme(ctx, &self.config);
    }

    fn show_dialogs(&mut self, ctx: &egui::Context) {
        if let Some(dialog) = self.settings_dialog.as_mut() {
            match dialog.show(ctx) {
                DialogOutcome::Open => {}
                DialogOutcome::Cancelled => self.settings_dialog = None,
                DialogOutcome::Confirmed(updated) => {
                    self.settings_dialog = None;
                    self.apply_config(ctx, updated);
                }
            }
        }

        if let Some(dialog) = self.voice_dialog.as_mut() {
            match dialog.show(ctx) {
                DialogOutcome::Open => {}
                DialogOutcome::Cancelled | DialogOutcome::Confirmed(None) => {
                    self.voice_dialog = None
                }
                DialogOutcome::Confirmed(Some(audio_file)) => {
                    self.voice_dialog = None;
                    self.process_voice(audio_file);
                }
            }
        }
    }

    fn render_input_row(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let buttons_w = 250.0;
            let edit = ui.add_sized(
                [(ui.available_width() - buttons_w).max(120.0), 32.0],
                egui::TextEdit::singleline(&mut self.input)
                    .hint_text("Type your question here...")
                    .vertical_align(egui::Align::Center),
            );
            if self.focus_input && !self.modal_open() {
                edit.request_focus();
                self.focus_input = false;
            }
            let entered = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

            let send = ui.add(egui::Button::new("Send").min_size(egui::vec2(64.0, 32.0)));
            if entered || send.clicked() {
                self.send_text();
            }
            if icon_button(ui, "📷", "Attach image").clicked() {
                self.pick_image();
            }
            if icon_button(ui, "🎤", "Voice input").clicked() {
                self.voice_dialog = Some(VoiceDialog::new());
            }
            if icon_button(ui, "⚙", "Settings").clicked() {
                self.settings_dialog = Some(SettingsDialog::new(&self.config));
            }
        });
    }

    fn render_main_ui(&mut self, ctx: &egui::Context) {
        let p = theme_palette(self.config.is_dark());
        let enabled = !self.modal_open();

        egui::TopBottomPanel::top("header")
            .frame(egui::Frame::none().fill(p.window_bg).inner_margin(10.0))
            .show(ctx, |ui| {
                if header(ui, self.logo.as_ref()) {
                    ctx.copy_text(self.dispatcher.conversation().render());
                }
            });

        let (status, is_error) = self.status_text();
        egui::TopBottomPanel::bottom("status_bar")
            .frame(egui::Frame::none().fill(p.window_bg).inner_margin(4.0))
            .show(ctx, |ui| status_bar(ui, &status, is_error, p));

        egui::TopBottomPanel::bottom("input_row")
            .frame(egui::Frame::none().fill(p.window_bg).inner_margin(10.0))
            .show(ctx, |ui| {
                ui.add_enabled_ui(enabled, |ui| self.render_input_row(ui));
            });

        let body = body_size(&self.config);
        egui::CentralPanel::default()
            .frame(
                egui::Frame::none()
                    .fill(p.log_bg)
                    .stroke(egui::Stroke::new(1.0, p.border))
                    .inner_margin(egui::Margin::symmetric(10.0, 8.0))
                    .outer_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                let jump = self.dispatcher.conversation_mut().take_scroll_request();
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        for message in self.dispatcher.conversation().messages() {
                            message_row(ui, message, p, body);
                        }
                        if jump {
                            ui.scroll_to_cursor(Some(egui::Align::BOTTOM));
                        }
                        if self.dispatcher.status() == SessionStatus::Processing {
                            ui.label(RichText::new("…").color(p.text_muted));
                        }
                    });
            });
    }
}

impl eframe::App for NubemCopilotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.dispatcher.process_events();

        if let Some((_, since)) = &self.note {
            if since.elapsed() > NOTE_TIMEOUT {
                self.note = None;
            }
        }

        self.render_main_ui(ctx);
        self.show_dialogs(ctx);

        if self.note.is_some() {
            ctx.request_repaint_after(NOTE_TIMEOUT);
        }
    }
}
