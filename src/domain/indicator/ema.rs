//! Exponential Moving Average indicator.
//!
//! alpha = 2/(span+1), bias-adjusted from the first bar:
//! EMA[t] = sum((1-alpha)^i * C[t-i]) / sum((1-alpha)^i), i = 0..=t
//!
//! Computed incrementally with den[t] = 1 + (1-alpha)*den[t-1] and
//! EMA[t] = EMA[t-1] + (C[t] - EMA[t-1]) / den[t], which keeps a constant
//! series exactly constant. Defined from the first bar; early values
//! lean on few observations, so callers that need stability apply their own
//! warmup (see `macd::MACD_WARMUP_BARS`).

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::PriceBar;

pub fn calculate_ema(bars: &[PriceBar], span: usize) -> IndicatorSeries {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let values = ewma(&closes, span)
        .into_iter()
        .zip(bars)
        .map(|(v, bar)| IndicatorPoint {
            date: bar.date,
            value: Some(IndicatorValue::Simple(v)),
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Ema(span),
        values,
    }
}

/// Bias-adjusted exponentially weighted mean of `values` with the given span.
///
/// Returns an empty vector for span 0.
pub fn ewma(values: &[f64], span: usize) -> Vec<f64> {
    if span == 0 {
        return Vec::new();
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let decay = 1.0 - alpha;
    let mut mean = 0.0;
    let mut den = 0.0;

    values
        .iter()
        .map(|&x| {
            den = 1.0 + decay * den;
            mean += (x - mean) / den;
            mean
        })
        .collect()
}
