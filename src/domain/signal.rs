//! Sell-signal evaluation for held positions.
//!
//! Three threshold rules are checked in a fixed order and each contributes a
//! reason when it fires. A rule whose indicator is undefined is skipped.

use std::fmt;

use tracing::debug;

use crate::domain::error::SmartTraderError;
use crate::domain::indicator::{compute_indicators_with, IndicatorSettings, IndicatorSnapshot};
use crate::domain::ohlcv::{Interval, Lookback};
use crate::ports::price_port::PriceSeriesProvider;

pub const DEFAULT_RSI_OVERBOUGHT: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SellReason {
    RsiOverbought,
    MacdBearishCrossover,
    PriceAboveUpperBollinger,
}

impl SellReason {
    pub fn label(&self) -> &'static str {
        match self {
            SellReason::RsiOverbought => "RSI overbought",
            SellReason::MacdBearishCrossover => "MACD bearish crossover",
            SellReason::PriceAboveUpperBollinger => "Price above upper Bollinger band",
        }
    }
}

impl fmt::Display for SellReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalThresholds {
    pub rsi_overbought: f64,
}

impl Default for SignalThresholds {
    fn default() -> Self {
        SignalThresholds {
            rsi_overbought: DEFAULT_RSI_OVERBOUGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SellSignalVerdict {
    pub price: f64,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub signal: Option<f64>,
    pub bollinger_upper: Option<f64>,
    pub reasons: Vec<SellReason>,
}

impl SellSignalVerdict {
    pub fn should_sell(&self) -> bool {
        !self.reasons.is_empty()
    }

    pub fn flags_label(&self) -> String {
        flags_label(&self.reasons)
    }
}

/// Reasons joined for display, "None" when nothing fired.
pub fn flags_label(reasons: &[SellReason]) -> String {
    if reasons.is_empty() {
        return "None".to_string();
    }
    reasons
        .iter()
        .map(|r| r.label())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn evaluate_sell_signal(price: f64, snapshot: &IndicatorSnapshot) -> SellSignalVerdict {
    evaluate_sell_signal_with(price, snapshot, &SignalThresholds::default())
}

pub fn evaluate_sell_signal_with(
    price: f64,
    snapshot: &IndicatorSnapshot,
    thresholds: &SignalThresholds,
) -> SellSignalVerdict {
    let mut reasons = Vec::new();

    if let Some(rsi) = snapshot.rsi14 {
        if rsi > thresholds.rsi_overbought {
            reasons.push(SellReason::RsiOverbought);
        }
    }

    if let (Some(macd), Some(signal)) = (snapshot.macd, snapshot.macd_signal) {
        if macd < signal {
            reasons.push(SellReason::MacdBearishCrossover);
        }
    }

    if let Some(upper) = snapshot.bollinger_upper20 {
        if price > upper {
            reasons.push(SellReason::PriceAboveUpperBollinger);
        }
    }

    SellSignalVerdict {
        price,
        rsi: snapshot.rsi14,
        macd: snapshot.macd,
        signal: snapshot.macd_signal,
        bollinger_upper: snapshot.bollinger_upper20,
        reasons,
    }
}

/// Everything needed to turn a ticker into a live verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalSettings {
    pub lookback: Lookback,
    pub interval: Interval,
    pub indicators: IndicatorSettings,
    pub thresholds: SignalThresholds,
}

impl Default for SignalSettings {
    fn default() -> Self {
        SignalSettings {
            // About six months of daily bars.
            lookback: Lookback::days(183),
            interval: Interval::Daily,
            indicators: IndicatorSettings::default(),
            thresholds: SignalThresholds::default(),
        }
    }
}

/// Fetch a ticker's series and evaluate it at the latest close.
///
/// A failed or empty fetch is reported as `DataUnavailable`; the evaluator
/// never sees a partial series.
pub fn analyze_ticker(
    provider: &dyn PriceSeriesProvider,
    ticker: &str,
    settings: &SignalSettings,
) -> Result<SellSignalVerdict, SmartTraderError> {
    let bars = provider
        .fetch_bars(ticker, settings.lookback, settings.interval)
        .map_err(|err| match err {
            unavailable @ SmartTraderError::DataUnavailable { .. } => unavailable,
            other => SmartTraderError::unavailable(ticker, other.to_string()),
        })?;

    if bars.is_empty() {
        return Err(SmartTraderError::unavailable(ticker, "no bars returned"));
    }

    let snapshot = compute_indicators_with(&bars, &settings.indicators)?;
    let verdict = evaluate_sell_signal_with(snapshot.close, &snapshot, &settings.thresholds);
    debug!(
        ticker,
        bars = snapshot.bars,
        reasons = verdict.reasons.len(),
        "evaluated sell signal"
    );
    Ok(verdict)
}
