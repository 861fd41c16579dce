//! RSI (Relative Strength Index) indicator, percentage-change variant.
//!
//! Works on day-over-day percentage changes: R[i] = C[i] / C[i-1] - 1.
//! Over a window of n changes:
//!
//! Formula: RSI = 100 - (100 / (1 + mean(R) / stddev(R)))
//!
//! stddev is the sample deviation. A window with zero deviation (flat prices)
//! has no defined ratio and yields an undefined point rather than NaN.
//!
//! Warmup: first n bars are undefined (need n price changes).

use crate::domain::indicator::stddev::{mean, sample_stddev, trailing_window};
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::PriceBar;

pub const DEFAULT_PERIOD: usize = 14;

/// Why an RSI point could not be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsiGap {
    /// Fewer than `period + 1` bars up to this point.
    Warmup,
    /// The window's percentage changes have zero deviation.
    ZeroDeviation,
    /// A change in the window is not finite (a zero previous close).
    NonFinite,
}

/// Percentage change of each close against the previous one.
///
/// Element 0 has no predecessor and is NaN, so the result lines up with `closes`.
pub fn pct_changes(closes: &[f64]) -> Vec<f64> {
    let mut changes = Vec::with_capacity(closes.len());
    for i in 0..closes.len() {
        if i == 0 {
            changes.push(f64::NAN);
        } else {
            changes.push(closes[i] / closes[i - 1] - 1.0);
        }
    }
    changes
}

/// RSI from one window of percentage changes.
pub fn rsi_from_window(window: &[f64]) -> Result<f64, RsiGap> {
    if window.iter().any(|c| !c.is_finite()) {
        return Err(RsiGap::NonFinite);
    }
    let (Some(avg), Some(dev)) = (mean(window), sample_stddev(window)) else {
        return Err(RsiGap::Warmup);
    };
    if dev == 0.0 {
        return Err(RsiGap::ZeroDeviation);
    }
    let rsi = 100.0 - (100.0 / (1.0 + avg / dev));
    if rsi.is_finite() {
        Ok(rsi)
    } else {
        Err(RsiGap::NonFinite)
    }
}

/// RSI at index `i` of `closes`.
pub fn rsi_at(changes: &[f64], i: usize, period: usize) -> Result<f64, RsiGap> {
    // changes[0] is always NaN; the first usable window starts at index 1.
    if period == 0 || i < period {
        return Err(RsiGap::Warmup);
    }
    let window = trailing_window(changes, i, period).ok_or(RsiGap::Warmup)?;
    rsi_from_window(window)
}

/// RSI at the last bar, or the reason it is undefined.
pub fn latest_rsi(closes: &[f64], period: usize) -> Result<f64, RsiGap> {
    if closes.is_empty() {
        return Err(RsiGap::Warmup);
    }
    let changes = pct_changes(closes);
    rsi_at(&changes, closes.len() - 1, period)
}

pub fn calculate_rsi(bars: &[PriceBar], period: usize) -> IndicatorSeries {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let changes = pct_changes(&closes);

    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| IndicatorPoint {
            date: bar.date,
            value: rsi_at(&changes, i, period).ok().map(IndicatorValue::Simple),
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Rsi(period),
        values,
    }
}
