use super::AssistantGateway;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const REQUEST_TIMEOUT_SECS: u64 = 300;
const IMAGE_PROMPT: &str = "Describe this image and point out anything noteworthy.";

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    images: Vec<String>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Assistant backed by a local Ollama server.
pub struct OllamaGateway {
    client: reqwest::blocking::Client,
    base_url: String,
    model: String,
}

impl OllamaGateway {
    pub fn new(base_url: &str, model: &str) -> Result<Self, String> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {}", e))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    fn generate(&self, prompt: &str, images: Vec<String>) -> Result<String, String> {
        let url = format!("{}/api/generate", self.base_url);
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            images,
        };
        let resp = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .map_err(|e| format!("Assistant unreachable at {}: {}", self.base_url, e))?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp
                .json::<ErrorResponse>()
                .map(|body| body.error)
                .unwrap_or_else(|_| status.to_string());
            return Err(format!("Assistant request failed: {}", detail));
        }

        let body: GenerateResponse = resp
            .json()
            .map_err(|e| format!("Invalid assistant response: {}", e))?;
        Ok(body.response.trim().to_string())
    }
}

impl AssistantGateway for OllamaGateway {
    fn name(&self) -> &str {
        "ollama"
    }

    fn process_text(&self, text: &str) -> Result<String, String> {
        self.generate(text, Vec::new())
    }

    fn process_image(&self, path: &Path) -> Result<String, String> {
        let bytes = std::fs::read(path)
            .map_err(|e| format!("Failed to read image {}: {}", path.display(), e))?;
        let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
        self.generate(IMAGE_PROMPT, vec![encoded])
    }

    fn process_voice(&self, _path: &Path) -> Result<String, String> {
        Err("Voice transcription is not available with the Ollama backend".into())
    }
}
