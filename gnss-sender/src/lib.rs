//! Producer side of the GNSS pipeline: fabricates fixes and publishes them
//! as `$GPRMC` sentences.

pub mod config;

use mqtt_client::{Publisher, QoS};
use nmea::{FixGenerator, encode};
use rand::Rng;
use std::time::Duration;

/// Where, how often and how many times to publish.
#[derive(Debug, Clone)]
pub struct PublishSchedule {
    pub topic: String,
    pub qos: QoS,
    pub cycles: u32,
    pub interval: Duration,
}

impl PublishSchedule {
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self {
            topic: config.mqtt.topic.clone(),
            qos: QoS::AtMostOnce,
            cycles: config.sender.cycles,
            interval: config.sender.interval(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishReport {
    pub published: u32,
    pub failed: u32,
}

/// Generates, encodes and publishes one fix per cycle, sleeping `interval`
/// after each. A failed publish is logged and the remaining cycles still run.
pub async fn publish_fixes<P, R>(
    publisher: &mut P,
    generator: &mut FixGenerator<R>,
    schedule: &PublishSchedule,
) -> PublishReport
where
    P: Publisher,
    R: Rng,
{
    let mut report = PublishReport::default();

    for _ in 0..schedule.cycles {
        let sentence = encode(&generator.next());

        match publisher
            .publish(&schedule.topic, sentence.as_str(), schedule.qos, false)
            .await
        {
            Ok(()) => report.published += 1,
            Err(e) => {
                report.failed += 1;
                log::error!("Failed to publish GNSS data, error: {}", e);
            }
        }

        tokio::time::sleep(schedule.interval).await;
    }

    report
}
