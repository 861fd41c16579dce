//! Dashboard settings read and validated from a `ConfigPort`.
//!
//! ```ini
//! [data]
//! prices_dir = data/prices
//! catalog_path = daily_trade_ideas.json
//! ledger_path = portfolio.json
//!
//! [signals]
//! lookback_days = 183
//! interval = daily
//! rsi_overbought = 70
//! require_macd_warmup = false
//! ```

use std::path::PathBuf;

use crate::domain::error::SmartTraderError;
use crate::domain::indicator::IndicatorSettings;
use crate::domain::ohlcv::{Interval, Lookback};
use crate::domain::signal::{SignalSettings, SignalThresholds, DEFAULT_RSI_OVERBOUGHT};
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_CATALOG_PATH: &str = "daily_trade_ideas.json";
pub const DEFAULT_LEDGER_PATH: &str = "portfolio.json";
pub const DEFAULT_LOOKBACK_DAYS: u32 = 183;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub prices_dir: PathBuf,
    pub catalog_path: PathBuf,
    pub ledger_path: PathBuf,
    pub signals: SignalSettings,
}

impl DashboardConfig {
    /// Defaults for everything but the price directory.
    pub fn with_prices_dir(prices_dir: PathBuf) -> Self {
        DashboardConfig {
            prices_dir,
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            ledger_path: PathBuf::from(DEFAULT_LEDGER_PATH),
            signals: SignalSettings::default(),
        }
    }

    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, SmartTraderError> {
        let prices_dir = match config.get_string("data", "prices_dir") {
            Some(s) if !s.trim().is_empty() => PathBuf::from(s.trim()),
            _ => {
                return Err(SmartTraderError::ConfigMissing {
                    section: "data".to_string(),
                    key: "prices_dir".to_string(),
                })
            }
        };

        let catalog_path = config
            .get_string("data", "catalog_path")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_PATH));
        let ledger_path = config
            .get_string("data", "ledger_path")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LEDGER_PATH));

        let lookback_days = parse_lookback(config)?;
        let interval = parse_interval(config)?;
        let rsi_overbought = parse_rsi_overbought(config)?;

        let indicators = IndicatorSettings {
            require_macd_warmup: config.get_bool("signals", "require_macd_warmup", false),
            ..IndicatorSettings::default()
        };

        Ok(DashboardConfig {
            prices_dir,
            catalog_path,
            ledger_path,
            signals: SignalSettings {
                lookback: Lookback::days(lookback_days),
                interval,
                indicators,
                thresholds: SignalThresholds { rsi_overbought },
            },
        })
    }
}

fn invalid(key: &str, reason: impl Into<String>) -> SmartTraderError {
    SmartTraderError::ConfigInvalid {
        section: "signals".to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn parse_lookback(config: &dyn ConfigPort) -> Result<u32, SmartTraderError> {
    let Some(raw) = config.get_string("signals", "lookback_days") else {
        return Ok(DEFAULT_LOOKBACK_DAYS);
    };
    let days: u32 = raw
        .trim()
        .parse()
        .map_err(|_| invalid("lookback_days", "lookback_days must be a whole number of days"))?;
    if days == 0 {
        return Err(invalid("lookback_days", "lookback_days must be positive"));
    }
    Ok(days)
}

fn parse_interval(config: &dyn ConfigPort) -> Result<Interval, SmartTraderError> {
    match config.get_string("signals", "interval") {
        None => Ok(Interval::Daily),
        Some(raw) => raw.parse().map_err(|e: String| invalid("interval", e)),
    }
}

fn parse_rsi_overbought(config: &dyn ConfigPort) -> Result<f64, SmartTraderError> {
    let Some(raw) = config.get_string("signals", "rsi_overbought") else {
        return Ok(DEFAULT_RSI_OVERBOUGHT);
    };
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| invalid("rsi_overbought", "rsi_overbought must be a number"))?;
    if !(0.0..=100.0).contains(&value) {
        return Err(invalid("rsi_overbought", "rsi_overbought must be between 0 and 100"));
    }
    Ok(value)
}
