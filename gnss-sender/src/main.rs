use gnss_sender::{PublishSchedule, config::Config, publish_fixes};
use mqtt_client::sender::MqttSender;
use nmea::FixGenerator;

#[tokio::main]
async fn main() {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::load().unwrap_or_else(|err| {
        log::error!("Failed to load configuration: {}", err);
        std::process::exit(1);
    });

    let mut sender = match MqttSender::connect(&config.broker_options()).await {
        Ok(sender) => sender,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let schedule = PublishSchedule::from_config(&config);
    let mut generator = FixGenerator::from_entropy();

    let report = publish_fixes(&mut sender, &mut generator, &schedule).await;
    log::info!(
        "Published {} of {} GNSS fixes to {}",
        report.published,
        schedule.cycles,
        schedule.topic
    );

    sender.disconnect().await;
}
