use crate::error::HandlerError;
use async_trait::async_trait;
use bytes::Bytes;
use log::debug;

const RESULT_SUFFIX: &str = "-result.txt";

/// Where the result for a given source blob gets written.
pub fn result_reference(source: &str) -> String {
    format!("{}{}", source, RESULT_SUFFIX)
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn fetch(&self, reference: &str) -> Result<Bytes, HandlerError>;
    async fn store(&self, reference: &str, bytes: Bytes) -> Result<(), HandlerError>;
}

/// Reads and writes blobs over plain HTTP, addressing them by URL.
pub struct HttpBlobStore {
    client: reqwest::Client,
}

impl HttpBlobStore {
    pub fn new(client: reqwest::Client) -> HttpBlobStore {
        HttpBlobStore { client }
    }
}

#[async_trait]
impl ObjectStore for HttpBlobStore {
    async fn fetch(&self, reference: &str) -> Result<Bytes, HandlerError> {
        debug!("Fetching {}", reference);
        let response = self
            .client
            .get(reference)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| HandlerError::Storage(format!("Error reading {}: {}", reference, e)))?;
        response
            .bytes()
            .await
            .map_err(|e| HandlerError::Storage(format!("Error reading {}: {}", reference, e)))
    }

    async fn store(&self, reference: &str, bytes: Bytes) -> Result<(), HandlerError> {
        debug!("Writing {} bytes to {}", bytes.len(), reference);
        self.client
            .put(reference)
            .header("x-ms-blob-type", "BlockBlob")
            .header("Content-Type", "text/plain; charset=utf-8")
            .body(bytes)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| HandlerError::Storage(format!("Error writing {}: {}", reference, e)))?;
        Ok(())
    }
}
