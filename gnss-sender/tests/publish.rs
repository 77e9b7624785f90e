use async_trait::async_trait;
use gnss_sender::{PublishReport, PublishSchedule, publish_fixes};
use mqtt_client::{Publisher, QoS, TransportError};
use nmea::{FixGenerator, checksum, decode_and_validate};
use std::time::Duration;
use tokio::time::Instant;

#[derive(Default)]
struct RecordingPublisher {
    sent: Vec<(String, String, QoS, bool, Instant)>,
    fail_on_call: Option<usize>,
    calls: usize,
}

#[async_trait]
impl Publisher for RecordingPublisher {
    async fn publish(
        &mut self,
        topic: &str,
        payload: &str,
        qos: QoS,
        retain: bool,
    ) -> Result<(), TransportError> {
        self.calls += 1;
        if self.fail_on_call == Some(self.calls) {
            return Err(TransportError::Publish {
                topic: topic.to_string(),
                reason: "broker gone".to_string(),
            });
        }

        self.sent
            .push((topic.to_string(), payload.to_string(), qos, retain, Instant::now()));
        Ok(())
    }
}

fn schedule() -> PublishSchedule {
    PublishSchedule {
        topic: "gnss/data".to_string(),
        qos: QoS::AtMostOnce,
        cycles: 5,
        interval: Duration::from_secs(2),
    }
}

#[tokio::test(start_paused = true)]
async fn publishes_five_valid_sentences_two_seconds_apart() {
    let mut publisher = RecordingPublisher::default();
    let mut generator = FixGenerator::seeded(1);
    let start = Instant::now();

    let report = publish_fixes(&mut publisher, &mut generator, &schedule()).await;

    assert_eq!(report, PublishReport { published: 5, failed: 0 });
    assert_eq!(publisher.sent.len(), 5);
    assert_eq!(start.elapsed(), Duration::from_secs(10));

    for (i, (topic, payload, qos, retain, at)) in publisher.sent.iter().enumerate() {
        assert_eq!(topic, "gnss/data");
        assert_eq!(*qos, QoS::AtMostOnce);
        assert!(!retain);
        assert!(decode_and_validate(payload).is_ok());
        assert!(checksum::verify(payload));
        assert_eq!(at.duration_since(start), Duration::from_secs(2 * i as u64));
    }
}

#[tokio::test(start_paused = true)]
async fn failed_publish_does_not_stop_the_run() {
    let mut publisher = RecordingPublisher {
        fail_on_call: Some(2),
        ..Default::default()
    };
    let mut generator = FixGenerator::seeded(2);

    let report = publish_fixes(&mut publisher, &mut generator, &schedule()).await;

    assert_eq!(report, PublishReport { published: 4, failed: 1 });
    assert_eq!(publisher.calls, 5);
}

#[tokio::test(start_paused = true)]
async fn every_fix_is_freshly_generated() {
    let mut publisher = RecordingPublisher::default();
    let mut generator = FixGenerator::seeded(3);

    publish_fixes(&mut publisher, &mut generator, &schedule()).await;

    let mut payloads: Vec<&String> = publisher.sent.iter().map(|(_, p, ..)| p).collect();
    payloads.dedup();
    assert_eq!(payloads.len(), 5);
}
