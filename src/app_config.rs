use config::{Config, ConfigError};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    core: Core,
    ble: Ble,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(config::File::with_name("config").required(true))
            .add_source(config::File::with_name("config_local").required(false))
            .add_source(config::Environment::with_prefix("LUMIERE").separator("__"))
            .build()?
            .try_deserialize()
    }

    pub fn core(&self) -> &Core {
        &self.core
    }

    pub fn ble(&self) -> &Ble {
        &self.ble
    }
}

#[derive(Debug, Deserialize)]
pub struct Core {
    log_level: String,
}

impl Core {
    pub fn log_level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::INFO)
    }
}

#[derive(Debug, Deserialize)]
pub struct Ble {
    adapter_index: usize,
    #[serde(with = "humantime_serde")]
    scan_timeout: Duration,
    #[serde(with = "humantime_serde")]
    connect_delay: Duration,
    connect_attempts: usize,
    retry_ms: u64,
    retry_max_delay_ms: u64,
}

impl Ble {
    pub fn adapter_index(&self) -> usize {
        self.adapter_index
    }

    pub fn scan_timeout(&self) -> Duration {
        self.scan_timeout
    }

    pub fn connect_delay(&self) -> Duration {
        self.connect_delay
    }

    pub fn connect_attempts(&self) -> usize {
        self.connect_attempts
    }

    pub fn retry_ms(&self) -> u64 {
        self.retry_ms
    }

    pub fn retry_max_delay_ms(&self) -> Duration {
        Duration::from_millis(self.retry_max_delay_ms)
    }
}

#[cfg(test)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

#[cfg(test)]
impl AppConfigBuilder {
    pub fn new() -> Self {
        AppConfigBuilder {
            config: AppConfig {
                core: Core {
                    log_level: "debug".to_string(),
                },
                ble: Ble {
                    adapter_index: 0,
                    scan_timeout: Duration::from_secs(1),
                    connect_delay: Duration::from_millis(0),
                    connect_attempts: 1,
                    retry_ms: 10,
                    retry_max_delay_ms: 20,
                },
            },
        }
    }

    pub fn scan_timeout(mut self, scan_timeout: Duration) -> Self {
        self.config.ble.scan_timeout = scan_timeout;
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}
