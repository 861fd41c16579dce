//! Indicator values at the latest bar of a price series.
//!
//! Every field is `Option<f64>`. When a field is `None` the snapshot also
//! records an [`IndicatorGap`] naming the indicator, why it is undefined and,
//! for short histories, how many bars it needs.

use crate::domain::error::SmartTraderError;
use crate::domain::indicator::bollinger::{self, calculate_bollinger};
use crate::domain::indicator::macd::{self, calculate_macd, warmup_bars};
use crate::domain::indicator::rsi::{self, latest_rsi, RsiGap};
use crate::domain::indicator::{IndicatorType, IndicatorValue};
use crate::domain::ohlcv::{closes, PriceBar};

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSettings {
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bollinger_period: usize,
    pub bollinger_mult_x100: u32,
    /// Report MACD as undefined until `slow + signal - 1` bars exist.
    pub require_macd_warmup: bool,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        IndicatorSettings {
            rsi_period: rsi::DEFAULT_PERIOD,
            macd_fast: macd::DEFAULT_FAST,
            macd_slow: macd::DEFAULT_SLOW,
            macd_signal: macd::DEFAULT_SIGNAL,
            bollinger_period: bollinger::DEFAULT_PERIOD,
            bollinger_mult_x100: bollinger::DEFAULT_MULT_X100,
            require_macd_warmup: false,
        }
    }
}

impl IndicatorSettings {
    pub fn rsi_min_bars(&self) -> usize {
        self.rsi_period + 1
    }

    pub fn macd_min_bars(&self) -> usize {
        if self.require_macd_warmup {
            warmup_bars(self.macd_slow, self.macd_signal)
        } else {
            1
        }
    }

    pub fn bollinger_min_bars(&self) -> usize {
        self.bollinger_period
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapReason {
    InsufficientHistory { bars: usize, minimum: usize },
    ZeroDeviation,
    NonFinite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorGap {
    pub indicator: IndicatorType,
    pub reason: GapReason,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSnapshot {
    pub bars: usize,
    pub close: f64,
    pub rsi14: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub bollinger_upper20: Option<f64>,
    pub gaps: Vec<IndicatorGap>,
}

impl IndicatorSnapshot {
    pub fn is_complete(&self) -> bool {
        self.gaps.is_empty()
    }
}

/// Snapshot with the default 14 / 12-26-9 / 20,2 parameters.
pub fn compute_indicators(bars: &[PriceBar]) -> Result<IndicatorSnapshot, SmartTraderError> {
    compute_indicators_with(bars, &IndicatorSettings::default())
}

pub fn compute_indicators_with(
    bars: &[PriceBar],
    settings: &IndicatorSettings,
) -> Result<IndicatorSnapshot, SmartTraderError> {
    let Some(last) = bars.last() else {
        return Err(SmartTraderError::InsufficientHistory {
            bars: 0,
            minimum: 1,
        });
    };

    let n = bars.len();
    let mut gaps = Vec::new();

    let rsi_type = IndicatorType::Rsi(settings.rsi_period);
    let rsi14 = match latest_rsi(&closes(bars), settings.rsi_period) {
        Ok(v) => Some(v),
        Err(gap) => {
            let reason = match gap {
                RsiGap::Warmup => GapReason::InsufficientHistory {
                    bars: n,
                    minimum: settings.rsi_min_bars(),
                },
                RsiGap::ZeroDeviation => GapReason::ZeroDeviation,
                RsiGap::NonFinite => GapReason::NonFinite,
            };
            gaps.push(IndicatorGap {
                indicator: rsi_type,
                reason,
            });
            None
        }
    };

    let macd_type = IndicatorType::Macd {
        fast: settings.macd_fast,
        slow: settings.macd_slow,
        signal: settings.macd_signal,
    };
    let macd_latest = if n >= settings.macd_min_bars() {
        calculate_macd(
            bars,
            settings.macd_fast,
            settings.macd_slow,
            settings.macd_signal,
        )
        .latest()
    } else {
        None
    };
    let (macd, macd_signal) = match macd_latest {
        Some(IndicatorValue::Macd { line, signal, .. })
            if line.is_finite() && signal.is_finite() =>
        {
            (Some(line), Some(signal))
        }
        Some(_) => {
            gaps.push(IndicatorGap {
                indicator: macd_type,
                reason: GapReason::NonFinite,
            });
            (None, None)
        }
        None => {
            gaps.push(IndicatorGap {
                indicator: macd_type,
                reason: GapReason::InsufficientHistory {
                    bars: n,
                    minimum: settings.macd_min_bars(),
                },
            });
            (None, None)
        }
    };

    let boll_type = IndicatorType::Bollinger {
        period: settings.bollinger_period,
        stddev_mult_x100: settings.bollinger_mult_x100,
    };
    let bollinger_upper20 = match calculate_bollinger(
        bars,
        settings.bollinger_period,
        settings.bollinger_mult_x100,
    )
    .latest()
    {
        Some(IndicatorValue::Bollinger { upper, .. }) if upper.is_finite() => Some(upper),
        Some(_) => {
            gaps.push(IndicatorGap {
                indicator: boll_type,
                reason: GapReason::NonFinite,
            });
            None
        }
        None => {
            gaps.push(IndicatorGap {
                indicator: boll_type,
                reason: GapReason::InsufficientHistory {
                    bars: n,
                    minimum: settings.bollinger_min_bars(),
                },
            });
            None
        }
    };

    Ok(IndicatorSnapshot {
        bars: n,
        close: last.close,
        rsi14,
        macd,
        macd_signal,
        bollinger_upper20,
        gaps,
    })
}
