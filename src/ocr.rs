use crate::error::HandlerError;
use crate::types::OcrResult;
use async_trait::async_trait;
use bytes::Bytes;
use log::{debug, warn};
use serde_json::Value;

#[async_trait]
pub trait TextRecognizer: Send + Sync {
    async fn analyze(&self, image: Bytes) -> Result<OcrResult, HandlerError>;
}

/// Client for the vision service's `/ocr` operation.
pub struct VisionClient {
    client: reqwest::Client,
    endpoint: String,
    key: String,
}

impl VisionClient {
    pub fn new(client: reqwest::Client, base_url: &str, key: &str) -> VisionClient {
        VisionClient {
            client,
            endpoint: format!("{}/ocr", base_url),
            key: key.to_string(),
        }
    }
}

#[async_trait]
impl TextRecognizer for VisionClient {
    async fn analyze(&self, image: Bytes) -> Result<OcrResult, HandlerError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Ocp-Apim-Subscription-Key", &self.key)
            .header("Content-Type", "application/octet-stream")
            .body(image)
            .send()
            .await
            .map_err(|e| HandlerError::OcrTransport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!("OCR service returned {}", status);
            return Ok(OcrResult::not_found());
        }
        match response.json::<Value>().await {
            Ok(json) => Ok(extract_plate(&json)),
            Err(e) => {
                warn!("Unable to parse OCR response: {}", e);
                Ok(OcrResult::not_found())
            }
        }
    }
}

/// The plate is expected as the first word of the second line of the
/// first region. Anything else counts as not found.
pub fn extract_plate(json: &Value) -> OcrResult {
    match json["regions"][0]["lines"][1]["words"][0]["text"].as_str() {
        Some(text) => OcrResult::found(text.to_string()),
        None => {
            debug!("No text at the expected position in {}", json);
            OcrResult::not_found()
        }
    }
}
