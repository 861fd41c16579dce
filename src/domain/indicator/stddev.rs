//! Rolling-window statistics shared by RSI and Bollinger Bands.
//!
//! Standard deviation here is the sample deviation (divides by n-1), so a
//! window needs at least two values.

/// Arithmetic mean, `None` for an empty window.
pub fn mean(window: &[f64]) -> Option<f64> {
    if window.is_empty() {
        return None;
    }
    Some(window.iter().sum::<f64>() / window.len() as f64)
}

/// Sample standard deviation, `None` for fewer than two values.
pub fn sample_stddev(window: &[f64]) -> Option<f64> {
    let n = window.len();
    if n < 2 {
        return None;
    }
    let m = mean(window)?;
    let variance = window
        .iter()
        .map(|v| {
            let diff = v - m;
            diff * diff
        })
        .sum::<f64>()
        / (n - 1) as f64;
    Some(variance.sqrt())
}

/// The `period` values ending at index `i`, or `None` during warmup.
pub fn trailing_window(values: &[f64], i: usize, period: usize) -> Option<&[f64]> {
    if period == 0 || i >= values.len() || i + 1 < period {
        return None;
    }
    Some(&values[i + 1 - period..=i])
}
