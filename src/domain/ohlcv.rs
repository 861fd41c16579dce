//! OHLCV price bar representation.

use chrono::{Datelike, NaiveDate};

#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub ticker: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

/// Sampling interval of a price series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interval {
    #[default]
    Daily,
    Weekly,
}

impl std::str::FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "1d" => Ok(Interval::Daily),
            "weekly" | "1wk" => Ok(Interval::Weekly),
            other => Err(format!("unknown interval '{other}' (expected daily or weekly)")),
        }
    }
}

/// Calendar-day window counted back from the latest available bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lookback {
    pub days: u32,
}

impl Lookback {
    pub const fn days(days: u32) -> Self {
        Lookback { days }
    }

    /// Earliest date still inside the window ending at `latest`.
    pub fn start_from(&self, latest: NaiveDate) -> NaiveDate {
        latest - chrono::Duration::days(i64::from(self.days))
    }
}

/// Closing prices in series order.
pub fn closes(bars: &[PriceBar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

/// Collapse daily bars into one bar per ISO week.
///
/// Open comes from the first bar of the week, close and date from the last,
/// high/low are the extremes and volume is summed. Input must be ascending.
pub fn resample_weekly(bars: &[PriceBar]) -> Vec<PriceBar> {
    let mut weeks: Vec<PriceBar> = Vec::new();

    for bar in bars {
        let week = bar.date.iso_week();
        match weeks.last_mut() {
            Some(current) if current.date.iso_week() == week => {
                current.date = bar.date;
                current.high = current.high.max(bar.high);
                current.low = current.low.min(bar.low);
                current.close = bar.close;
                current.volume += bar.volume;
            }
            _ => weeks.push(bar.clone()),
        }
    }

    weeks
}
