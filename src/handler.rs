use crate::error::HandlerError;
use crate::ocr::TextRecognizer;
use crate::publish::EventPublisher;
use crate::storage::{result_reference, ObjectStore};
use crate::types::{BlobCreatedData, InboundEvent, OutboundEvent, Outcome};
use bytes::Bytes;
use log::info;
use std::sync::Arc;

pub const NOT_FOUND_RESULT: &str = "NOT FOUND - event sent";

/// Reads a newly created plate image, runs OCR on it and records what was
/// found next to the image.
#[derive(Clone)]
pub struct Handler {
    store: Arc<dyn ObjectStore>,
    recognizer: Arc<dyn TextRecognizer>,
    publisher: Arc<dyn EventPublisher>,
}

impl Handler {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        recognizer: Arc<dyn TextRecognizer>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Handler {
        Handler {
            store,
            recognizer,
            publisher,
        }
    }

    pub async fn handle(&self, event: &InboundEvent) -> Result<Outcome, HandlerError> {
        info!("{}", event.data);
        let data: BlobCreatedData = serde_json::from_value(event.data.clone())
            .map_err(|e| HandlerError::MalformedEvent(format!("event {}: {}", event.id, e)))?;

        let plate = self.store.fetch(&data.url).await?;
        self.process(event, &data, plate).await
    }

    async fn process(
        &self,
        event: &InboundEvent,
        data: &BlobCreatedData,
        plate: Bytes,
    ) -> Result<Outcome, HandlerError> {
        info!(
            "About to analyze image: {} ({} bytes, {})",
            data.url,
            data.content_length.unwrap_or(plate.len() as u64),
            data.content_type.as_deref().unwrap_or("unknown type")
        );
        let result = self.recognizer.analyze(plate).await?;
        info!("Found text: {} with text: {:?}", result.found, result.text);

        let destination = result_reference(&data.url);
        match result.text {
            Some(text) if result.found => {
                info!("Writing {}", destination);
                self.store
                    .store(&destination, Bytes::from(text.clone()))
                    .await?;
                Ok(Outcome::TextFound(text))
            }
            _ => {
                info!("Sending event to event grid");
                self.publisher
                    .publish(&[OutboundEvent::plate_not_read(event, &data.url)])
                    .await?;
                info!("Writing {}", destination);
                self.store
                    .store(&destination, Bytes::from_static(NOT_FOUND_RESULT.as_bytes()))
                    .await?;
                Ok(Outcome::TextNotFound)
            }
        }
    }
}
