use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub serial: SerialConfig,
    pub acquisition: AcquisitionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerialConfig {
    pub baud_rate: u32,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcquisitionConfig {
    pub poll_delay_ms: u64,
    pub window_capacity: usize,
}

impl Config {
    /// Load configuration: coded defaults, overridden by an optional
    /// `meter-client/config.toml`, overridden by `METER_*` env variables
    /// (e.g. `METER_SERIAL__BAUD_RATE`).
    pub fn load() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .set_default("serial.baud_rate", 9600)?
            .set_default("serial.timeout_ms", 1000)?
            .set_default("acquisition.poll_delay_ms", 10)?
            .set_default("acquisition.window_capacity", 20)?
            .add_source(config::File::with_name("meter-client/config").required(false))
            .add_source(config::Environment::with_prefix("METER").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}

impl SerialConfig {
    /// Read timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl AcquisitionConfig {
    /// Delay between poll cycles as Duration
    pub fn poll_delay(&self) -> Duration {
        Duration::from_millis(self.poll_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_a_config_file() {
        let config = Config::load().unwrap();
        assert_eq!(config.serial.baud_rate, 9600);
        assert_eq!(config.serial.timeout(), Duration::from_millis(1000));
        assert_eq!(config.acquisition.poll_delay(), Duration::from_millis(10));
        assert_eq!(config.acquisition.window_capacity, 20);
    }
}
