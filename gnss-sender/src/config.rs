use config::{ConfigError, builder::ConfigBuilder, builder::DefaultState};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub mqtt: MqttConfig,
    pub sender: SenderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MqttConfig {
    pub host: String,
    pub port: u16,
    pub keep_alive_seconds: u64,
    pub topic: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SenderConfig {
    /// Number of fixes published before exiting.
    pub cycles: u32,
    pub interval_seconds: u64,
}

impl Config {
    /// Built-in defaults, optionally overridden by `gnss-sender.toml` and
    /// `GNSS_`-prefixed environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Self::defaults()?
            .add_source(config::File::with_name("gnss-sender").required(false))
            .add_source(config::Environment::with_prefix("GNSS").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        config::Config::builder()
            .set_default("mqtt.host", "localhost")?
            .set_default("mqtt.port", 1883)?
            .set_default("mqtt.keep_alive_seconds", 60)?
            .set_default("mqtt.topic", "gnss/data")?
            .set_default("sender.cycles", 5)?
            .set_default("sender.interval_seconds", 2)
    }

    pub fn broker_options(&self) -> mqtt_client::BrokerOptions {
        mqtt_client::BrokerOptions::new(
            self.mqtt.host.clone(),
            self.mqtt.port,
            Duration::from_secs(self.mqtt.keep_alive_seconds),
        )
    }
}

impl SenderConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_publish_five_fixes_two_seconds_apart() {
        let config: Config = Config::defaults()
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.sender.cycles, 5);
        assert_eq!(config.sender.interval(), Duration::from_secs(2));
        assert_eq!(config.mqtt.topic, "gnss/data");
        assert_eq!(config.broker_options().host, "localhost");
        assert_eq!(config.broker_options().port, 1883);
    }
}
