use crate::error::HandlerError;
use crate::handler::Handler;
use crate::types::{InboundEvent, SubscriptionValidationData, BLOB_CREATED, SUBSCRIPTION_VALIDATION};
use log::{error, info, warn};
use serde_json::json;
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

#[derive(Debug)]
struct HandleEventError;

impl warp::reject::Reject for HandleEventError {}

pub async fn run(handler: Handler, port: u16) {
    info!("Listening for events on port {}", port);
    warp::serve(routes(handler)).run(([0, 0, 0, 0], port)).await;
}

pub fn routes(handler: Handler) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::post()
        .and(warp::path!("api" / "events"))
        .and(warp::body::json::<Vec<InboundEvent>>())
        .and(warp::any().map(move || handler.clone()))
        .and_then(|events: Vec<InboundEvent>, handler: Handler| async move {
            let result = handle_events(events, handler).await;
            if let Err(e) = &result {
                error!("Error handling events: {}", e);
            }
            result.map_err(|_| warp::reject::custom(HandleEventError))
        })
}

async fn handle_events(
    events: Vec<InboundEvent>,
    handler: Handler,
) -> Result<Response, HandlerError> {
    for event in &events {
        match event.event_type.as_str() {
            SUBSCRIPTION_VALIDATION => {
                // The event bus won't deliver anything until this is echoed back.
                let data: SubscriptionValidationData = serde_json::from_value(event.data.clone())
                    .map_err(|e| {
                        HandlerError::MalformedEvent(format!("validation event {}: {}", event.id, e))
                    })?;
                info!("Answering subscription validation for {:?}", event.topic);
                return Ok(warp::reply::json(&json!({
                    "validationResponse": data.validation_code
                }))
                .into_response());
            }
            BLOB_CREATED => {
                let outcome = handler.handle(event).await?;
                info!("Event {} finished: {:?}", event.id, outcome);
            }
            other => warn!("Ignoring event {} of type {}", event.id, other),
        }
    }
    Ok(warp::reply().into_response())
}
