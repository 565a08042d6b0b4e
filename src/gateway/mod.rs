pub mod offline;
pub mod ollama;

use crate::config::Config;
use std::path::Path;
use std::sync::Arc;

/// Trait that each assistant backend implements.
///
/// Every call blocks the calling thread until the backend answers, so the
/// UI only ever invokes these from worker threads. Errors carry a message
/// that is shown to the user as-is.
pub trait AssistantGateway: Send + Sync {
    fn name(&self) -> &str;
    fn process_text(&self, text: &str) -> Result<String, String>;
    fn process_image(&self, path: &Path) -> Result<String, String>;
    /// Transcribe a recorded audio file into text.
    fn process_voice(&self, path: &Path) -> Result<String, String>;
}

/// Environment switch that selects the offline backend.
pub const OFFLINE_ENV: &str = "NUBEMCOPILOT_OFFLINE";

/// Create the backend for the given config.
pub fn create_gateway(config: &Config) -> Arc<dyn AssistantGateway> {
    if std::env::var_os(OFFLINE_ENV).is_some() {
        return Arc::new(offline::OfflineGateway);
    }
    match ollama::OllamaGateway::new(config.assistant_url_or_default(), config.model_or_default())
    {
        Ok(gateway) => Arc::new(gateway),
        Err(e) => {
            log::warn!("{}; falling back to offline assistant", e);
            Arc::new(offline::OfflineGateway)
        }
    }
}
