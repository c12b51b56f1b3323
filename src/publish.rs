use crate::error::HandlerError;
use crate::types::OutboundEvent;
use async_trait::async_trait;
use log::info;
use url::Url;

const API_VERSION: &str = "2018-01-01";

#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, events: &[OutboundEvent]) -> Result<(), HandlerError>;
}

/// Publishes batches of events to a single Event Grid topic.
pub struct EventGridPublisher {
    client: reqwest::Client,
    endpoint: Url,
    key: String,
}

impl EventGridPublisher {
    /// Only the host (plus scheme and port) of `topic_url` is used; the
    /// path is always the topic's `/api/events`.
    pub fn new(client: reqwest::Client, topic_url: &Url, key: &str) -> EventGridPublisher {
        let mut endpoint = topic_url.clone();
        endpoint.set_path("/api/events");
        endpoint.set_fragment(None);
        endpoint
            .query_pairs_mut()
            .clear()
            .append_pair("api-version", API_VERSION);
        EventGridPublisher {
            client,
            endpoint,
            key: key.to_string(),
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl EventPublisher for EventGridPublisher {
    async fn publish(&self, events: &[OutboundEvent]) -> Result<(), HandlerError> {
        info!(
            "Publishing {} event(s) to {}",
            events.len(),
            self.endpoint.host_str().unwrap_or_default()
        );
        self.client
            .post(self.endpoint.clone())
            .header("aeg-sas-key", &self.key)
            .json(events)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| HandlerError::Publish(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PlateNotReadData;
    use chrono::Utc;
    use serde_json::Value;
    use std::collections::HashMap;
    use std::net::SocketAddr;
    use std::sync::{Arc, Mutex};
    use warp::http::StatusCode;
    use warp::Filter;

    #[derive(Debug, Default)]
    struct Seen {
        key: Option<String>,
        query: HashMap<String, String>,
        body: Value,
    }

    fn serve(status: StatusCode) -> (SocketAddr, Arc<Mutex<Seen>>) {
        let seen = Arc::new(Mutex::new(Seen::default()));
        let recorder = seen.clone();
        let route = warp::post()
            .and(warp::path!("api" / "events"))
            .and(warp::header::optional::<String>("aeg-sas-key"))
            .and(warp::query::<HashMap<String, String>>())
            .and(warp::body::json())
            .map(move |key, query, body: Value| {
                let mut seen = recorder.lock().unwrap();
                seen.key = key;
                seen.query = query;
                seen.body = body;
                warp::reply::with_status(warp::reply(), status)
            });
        let (addr, server) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(server);
        (addr, seen)
    }

    fn event() -> OutboundEvent {
        OutboundEvent {
            id: "8ba4a2b6-5e1e-4d44-9d1e-0a3e3e1c0d2a".to_string(),
            subject: "LicensePlate/blobs/car.jpg".to_string(),
            event_type: "PlateNotRead".to_string(),
            event_time: Utc::now(),
            data: PlateNotReadData {
                url: "https://plates/car.jpg".to_string(),
            },
            data_version: "1.0".to_string(),
        }
    }

    #[test]
    fn endpoint_keeps_only_host() {
        let url = Url::parse("https://plates.westus2-1.eventgrid.azure.net/api/events?x=1#frag")
            .unwrap();
        let publisher = EventGridPublisher::new(reqwest::Client::new(), &url, "k");
        assert_eq!(
            publisher.endpoint().as_str(),
            "https://plates.westus2-1.eventgrid.azure.net/api/events?api-version=2018-01-01"
        );
    }

    #[tokio::test]
    async fn posts_single_element_batch() {
        let (addr, seen) = serve(StatusCode::OK);
        let url = Url::parse(&format!("http://{}/", addr)).unwrap();
        let publisher = EventGridPublisher::new(reqwest::Client::new(), &url, "grid-key");
        publisher.publish(&[event()]).await.unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.key.as_deref(), Some("grid-key"));
        assert_eq!(seen.query.get("api-version").map(String::as_str), Some(API_VERSION));
        let batch = seen.body.as_array().unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0]["eventType"], "PlateNotRead");
        assert_eq!(batch[0]["subject"], "LicensePlate/blobs/car.jpg");
        assert_eq!(batch[0]["data"]["url"], "https://plates/car.jpg");
        assert_eq!(batch[0]["dataVersion"], "1.0");
    }

    #[tokio::test]
    async fn rejected_publish_is_error() {
        let (addr, _) = serve(StatusCode::UNAUTHORIZED);
        let url = Url::parse(&format!("http://{}/", addr)).unwrap();
        let publisher = EventGridPublisher::new(reqwest::Client::new(), &url, "bad");
        match publisher.publish(&[event()]).await {
            Err(HandlerError::Publish(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }
}
