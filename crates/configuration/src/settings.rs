use crate::error::ConfigError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section is optional; a missing section takes its defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub simulation: SimulationSettings,
    #[serde(default)]
    pub trade_source: TradeSourceSettings,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Starting capitals used when a request or command does not supply one.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    pub default_spot_capital: Decimal,
    pub default_futures_capital: Decimal,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            default_spot_capital: dec!(10000),
            default_futures_capital: dec!(10000),
        }
    }
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_sheet_range() -> String {
    "Sheet1".to_string()
}

/// Where trade records come from. Selected by the `kind` key.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TradeSourceSettings {
    /// A JSON endpoint returning an array of trade objects.
    Http {
        url: String,
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
    /// A Google Sheet read through the Sheets v4 values API.
    GoogleSheet {
        sheet_id: String,
        #[serde(default = "default_sheet_range")]
        range: String,
        api_key: String,
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
    /// A JSON file on disk with the same shape as the HTTP source.
    File { path: PathBuf },
    /// No source configured; every fetch yields an empty dataset.
    #[default]
    None,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl ServerSettings {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive, used when `RUST_LOG` is not set.
    pub level: String,
    pub format: LogFormat,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Full,
            directory: None,
            file_prefix: "pnl-sim.log".to_string(),
        }
    }
}

impl Config {
    /// Checks the values serde cannot: signs, ranges and required text.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.simulation.default_spot_capital < Decimal::ZERO {
            return Err(ConfigError::invalid(
                "simulation.default_spot_capital",
                "must not be negative",
            ));
        }
        if self.simulation.default_futures_capital < Decimal::ZERO {
            return Err(ConfigError::invalid(
                "simulation.default_futures_capital",
                "must not be negative",
            ));
        }
        if self.server.port == 0 {
            return Err(ConfigError::invalid("server.port", "must be non-zero"));
        }

        match &self.trade_source {
            TradeSourceSettings::Http { url, .. } if url.trim().is_empty() => {
                Err(ConfigError::invalid("trade_source.url", "must not be empty"))
            }
            TradeSourceSettings::GoogleSheet { sheet_id, .. } if sheet_id.trim().is_empty() => {
                Err(ConfigError::invalid("trade_source.sheet_id", "must not be empty"))
            }
            TradeSourceSettings::GoogleSheet { api_key, .. } if api_key.trim().is_empty() => {
                Err(ConfigError::invalid("trade_source.api_key", "must not be empty"))
            }
            _ => Ok(()),
        }
    }
}
