//! Price series access port.

use crate::domain::error::SmartTraderError;
use crate::domain::ohlcv::{Interval, Lookback, PriceBar};

pub trait PriceSeriesProvider {
    /// Bars for `ticker` covering `lookback`, oldest first.
    ///
    /// Implementations report a missing or unreadable series as
    /// `SmartTraderError::DataUnavailable`.
    fn fetch_bars(
        &self,
        ticker: &str,
        lookback: Lookback,
        interval: Interval,
    ) -> Result<Vec<PriceBar>, SmartTraderError>;
}
