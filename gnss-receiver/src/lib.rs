//! Consumer side of the GNSS pipeline: subscribes to position sentences,
//! validates them and appends the accepted ones to SQLite.

pub mod config;
pub mod database;
pub mod mailbox;
pub mod receive_loop;
pub mod repository;
pub mod shutdown;

use crate::config::Config;
use crate::mailbox::Mailbox;
use crate::receive_loop::ReceiveLoop;
use crate::repository::{SqliteNmeaRepository, StoreError};
use mqtt_client::{QoS, TransportError, receiver::MqttReceiver};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Anything that keeps the receiver from reaching its main loop.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] ::config::ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Opens the store, connects, subscribes and wires deliveries into a fresh mailbox.
pub async fn setup(
    config: &Config,
    shutdown: CancellationToken,
) -> Result<ReceiveLoop<MqttReceiver, SqliteNmeaRepository>, SetupError> {
    let repository = SqliteNmeaRepository::open(&config.database.url).await?;

    let mailbox = Mailbox::new();
    let mut receiver = MqttReceiver::connect(&config.broker_options()).await?;

    let inbox = mailbox.clone();
    receiver.set_message_callback(move |payload| {
        if let Some(dropped) = inbox.try_send(payload) {
            log::warn!("Unprocessed GNSS data overwritten: {}", dropped);
        }
    });
    receiver.subscribe(&config.mqtt.topic, QoS::AtMostOnce).await?;

    Ok(ReceiveLoop::new(receiver, repository, mailbox, shutdown)
        .with_policy(config.receiver.validation)
        .with_poll_timeout(config.receiver.poll_timeout()))
}
