mod config;
mod conversation;
mod dispatch;
mod gateway;
mod ui;
mod voice;

use eframe::egui;
use egui::{vec2, ViewportBuilder};
use std::path::Path;
use std::sync::Arc;

fn main() {
    env_logger::init();

    let config = config::load();
    log::info!(
        "starting with theme={} model={} assistant={}",
        config.theme,
        config.model_or_default(),
        config.assistant_url_or_default()
    );
    let assistant = gateway::create_gateway(&config);
    log::info!("assistant backend: {}", assistant.name());

    let window_icon = ui::widgets::load_scaled_rgba(Path::new(ui::widgets::LOGO_PATH), 64)
        .ok()
        .map(|rgba| {
            let (w, h) = rgba.dimensions();
            Arc::new(egui::IconData {
                rgba: rgba.into_raw(),
                width: w,
                height: h,
            })
        });

    let mut vp = ViewportBuilder::default()
        .with_title("NubemCopilot - AI Assistant")
        .with_inner_size(vec2(800.0, 600.0))
        .with_min_inner_size(vec2(480.0, 320.0));
    if let Some(icon) = window_icon {
        vp = vp.with_icon(icon);
    }

    let native_options = eframe::NativeOptions {
        viewport: vp,
        ..Default::default()
    };

    let result = eframe::run_native(
        "NubemCopilot",
        native_options,
        Box::new(move |cc| {
            log::info!("window created");
            Ok(Box::new(ui::NubemCopilotApp::new(
                &cc.egui_ctx,
                config,
                assistant,
            )))
        }),
    );
    if let Err(e) = result {
        log::error!("failed to start window: {}", e);
        std::process::exit(1);
    }
}
