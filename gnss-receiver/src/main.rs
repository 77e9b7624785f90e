use gnss_receiver::{config::Config, setup, shutdown};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::load().unwrap_or_else(|err| {
        log::error!("Failed to load configuration: {}", err);
        std::process::exit(-1);
    });

    log::info!(
        "MQTT: {}:{} topic {}, database: {}",
        config.mqtt.host,
        config.mqtt.port,
        config.mqtt.topic,
        config.database.url
    );

    let token = CancellationToken::new();
    if let Err(e) = shutdown::cancel_on_signal(token.clone()) {
        log::error!("Unable to install signal handlers: {}", e);
        std::process::exit(-1);
    }

    let mut receive_loop = match setup(&config, token).await {
        Ok(receive_loop) => receive_loop,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(-1);
        }
    };

    receive_loop.run().await;

    let (receiver, repository) = receive_loop.into_inner();
    receiver.disconnect().await;
    repository.close().await;
}
