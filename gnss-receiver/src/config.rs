use config::{ConfigError, builder::ConfigBuilder, builder::DefaultState};
use nmea::ValidationPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub mqtt: MqttConfig,
    pub database: DatabaseConfig,
    pub receiver: ReceiverConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MqttConfig {
    pub host: String,
    pub port: u16,
    pub keep_alive_seconds: u64,
    pub topic: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiverConfig {
    /// Upper bound on a single transport poll.
    pub poll_timeout_ms: u64,
    pub validation: ValidationPolicy,
}

impl Config {
    /// Builds the configuration from built-in defaults, an optional
    /// `gnss-receiver.toml` and `GNSS_` environment variables
    /// (`GNSS_MQTT__HOST`, `GNSS_DATABASE__URL`, ...).
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Self::defaults()?
            .add_source(config::File::with_name("gnss-receiver").required(false))
            .add_source(config::Environment::with_prefix("GNSS").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    /// The fixed deployment: local broker, `gnss/data`, `gnss_data.db`.
    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        config::Config::builder()
            .set_default("mqtt.host", "localhost")?
            .set_default("mqtt.port", 1883)?
            .set_default("mqtt.keep_alive_seconds", 60)?
            .set_default("mqtt.topic", "gnss/data")?
            .set_default("database.url", "sqlite://gnss_data.db")?
            .set_default("receiver.poll_timeout_ms", 1000)?
            .set_default("receiver.validation", "permissive")
    }

    pub fn broker_options(&self) -> mqtt_client::BrokerOptions {
        mqtt_client::BrokerOptions::new(
            self.mqtt.host.clone(),
            self.mqtt.port,
            Duration::from_secs(self.mqtt.keep_alive_seconds),
        )
    }
}

impl ReceiverConfig {
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_fixed_deployment() {
        let config: Config = Config::defaults()
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.mqtt.host, "localhost");
        assert_eq!(config.mqtt.port, 1883);
        assert_eq!(config.mqtt.topic, "gnss/data");
        assert_eq!(config.database.url, "sqlite://gnss_data.db");
        assert_eq!(config.receiver.poll_timeout(), Duration::from_secs(1));
        assert_eq!(config.receiver.validation, ValidationPolicy::Permissive);
        assert_eq!(config.broker_options().keep_alive, Duration::from_secs(60));
    }

    #[test]
    fn overrides_replace_defaults() {
        let config: Config = Config::defaults()
            .unwrap()
            .set_override("receiver.validation", "strict")
            .unwrap()
            .set_override("mqtt.port", 8883)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.receiver.validation, ValidationPolicy::Strict);
        assert_eq!(config.mqtt.port, 8883);
        assert_eq!(config.mqtt.host, "localhost");
    }
}
