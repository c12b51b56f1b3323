mod config;
mod error;
mod handler;
mod ocr;
mod publish;
mod storage;
mod types;
mod webhook;

use config::Config;
use env_logger::Env;
use handler::Handler;
use log::{error, info};
use ocr::VisionClient;
use publish::EventGridPublisher;
use std::process;
use std::sync::Arc;
use storage::HttpBlobStore;

#[macro_use]
extern crate failure;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    info!("Starting plate-reader");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            process::exit(1);
        }
    };

    let client = reqwest::Client::new();
    let publisher = EventGridPublisher::new(
        client.clone(),
        &config.event_grid_url,
        &config.event_grid_key,
    );
    info!("Unread plates go to {}", publisher.endpoint());
    let handler = Handler::new(
        Arc::new(HttpBlobStore::new(client.clone())),
        Arc::new(VisionClient::new(
            client.clone(),
            &config.vision_api_url,
            &config.vision_api_key,
        )),
        Arc::new(publisher),
    );
    webhook::run(handler, config.port).await;
    info!("Exiting main");
}
