use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

pub const BLOB_CREATED: &str = "Microsoft.Storage.BlobCreated";
pub const SUBSCRIPTION_VALIDATION: &str = "Microsoft.EventGrid.SubscriptionValidationEvent";
pub const PLATE_NOT_READ: &str = "PlateNotRead";

/// An event as delivered by the event bus. `data` stays untyped until the
/// handler knows what kind of event it is looking at.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundEvent {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    pub subject: String,
    pub event_type: String,
    pub event_time: String,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub data_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_version: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BlobCreatedData {
    pub url: String,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub content_length: Option<u64>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionValidationData {
    pub validation_code: String,
}

#[derive(Debug, PartialEq)]
pub struct OcrResult {
    pub found: bool,
    pub text: Option<String>,
}

impl OcrResult {
    pub fn found(text: String) -> OcrResult {
        OcrResult {
            found: true,
            text: Some(text),
        }
    }

    pub fn not_found() -> OcrResult {
        OcrResult {
            found: false,
            text: None,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct PlateNotReadData {
    pub url: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundEvent {
    pub id: String,
    pub subject: String,
    pub event_type: String,
    pub event_time: DateTime<Utc>,
    pub data: PlateNotReadData,
    pub data_version: String,
}

impl OutboundEvent {
    /// Follow-up event for a plate the OCR service could not read.
    pub fn plate_not_read(inbound: &InboundEvent, url: &str) -> OutboundEvent {
        OutboundEvent {
            id: Uuid::new_v4().to_string(),
            subject: format!("LicensePlate{}", inbound.subject),
            event_type: PLATE_NOT_READ.to_string(),
            event_time: Utc::now(),
            data: PlateNotReadData {
                url: url.to_string(),
            },
            data_version: "1.0".to_string(),
        }
    }
}

/// Terminal state of one invocation.
#[derive(Debug, PartialEq)]
pub enum Outcome {
    TextFound(String),
    TextNotFound,
}
