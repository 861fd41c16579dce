//! CSV file price adapter.
//!
//! Reads `{TICKER}.csv` from a base directory with the columns
//! `date,open,high,low,close,volume`. Non-finite prices and repeated dates
//! make the whole series unavailable.

use crate::domain::error::SmartTraderError;
use crate::domain::ohlcv::{resample_weekly, Interval, Lookback, PriceBar};
use crate::ports::price_port::PriceSeriesProvider;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

pub struct CsvPriceAdapter {
    base_path: PathBuf,
}

impl CsvPriceAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker.to_uppercase()))
    }
}

fn field<T: std::str::FromStr>(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
    ticker: &str,
) -> Result<T, SmartTraderError>
where
    T::Err: std::fmt::Display,
{
    record
        .get(index)
        .ok_or_else(|| SmartTraderError::unavailable(ticker, format!("missing {name} column")))?
        .trim()
        .parse()
        .map_err(|e| SmartTraderError::unavailable(ticker, format!("invalid {name} value: {e}")))
}

fn price_field(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
    ticker: &str,
) -> Result<f64, SmartTraderError> {
    let value: f64 = field(record, index, name, ticker)?;
    if !value.is_finite() {
        return Err(SmartTraderError::unavailable(
            ticker,
            format!("non-finite {name} value: {value}"),
        ));
    }
    Ok(value)
}

impl PriceSeriesProvider for CsvPriceAdapter {
    fn fetch_bars(
        &self,
        ticker: &str,
        lookback: Lookback,
        interval: Interval,
    ) -> Result<Vec<PriceBar>, SmartTraderError> {
        let path = self.csv_path(ticker);
        let content = fs::read_to_string(&path).map_err(|e| {
            SmartTraderError::unavailable(ticker, format!("failed to read {}: {}", path.display(), e))
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result
                .map_err(|e| SmartTraderError::unavailable(ticker, format!("CSV parse error: {e}")))?;

            let date_str: String = field(&record, 0, "date", ticker)?;
            let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|e| {
                SmartTraderError::unavailable(ticker, format!("invalid date format: {e}"))
            })?;

            bars.push(PriceBar {
                ticker: ticker.to_uppercase(),
                date,
                open: price_field(&record, 1, "open", ticker)?,
                high: price_field(&record, 2, "high", ticker)?,
                low: price_field(&record, 3, "low", ticker)?,
                close: price_field(&record, 4, "close", ticker)?,
                volume: field(&record, 5, "volume", ticker)?,
            });
        }

        bars.sort_by_key(|b| b.date);
        if let Some(pair) = bars.windows(2).find(|pair| pair[0].date == pair[1].date) {
            return Err(SmartTraderError::unavailable(
                ticker,
                format!("duplicate date {}", pair[1].date),
            ));
        }

        let Some(latest) = bars.last().map(|b| b.date) else {
            return Err(SmartTraderError::unavailable(ticker, "no price rows"));
        };
        let start = lookback.start_from(latest);
        bars.retain(|b| b.date >= start);

        let bars = match interval {
            Interval::Daily => bars,
            Interval::Weekly => resample_weekly(&bars),
        };
        debug!(ticker, bars = bars.len(), path = %path.display(), "loaded price series");
        Ok(bars)
    }
}
