#![allow(dead_code)]

use chrono::NaiveDate;
use smarttrader::domain::error::SmartTraderError;
use smarttrader::domain::idea::{Sector, TradeIdea, Volatility};
use smarttrader::domain::ledger::LoggedTrade;
pub use smarttrader::domain::ohlcv::PriceBar;
use smarttrader::domain::ohlcv::{Interval, Lookback};
use smarttrader::ports::price_port::PriceSeriesProvider;
use std::cell::RefCell;
use std::collections::HashMap;

pub struct MockPriceProvider {
    pub data: HashMap<String, Vec<PriceBar>>,
    pub errors: HashMap<String, String>,
    pub calls: RefCell<Vec<String>>,
}

impl MockPriceProvider {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn with_bars(mut self, ticker: &str, bars: Vec<PriceBar>) -> Self {
        self.data.insert(ticker.to_string(), bars);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }

    pub fn call_count(&self, ticker: &str) -> usize {
        self.calls.borrow().iter().filter(|t| *t == ticker).count()
    }
}

impl PriceSeriesProvider for MockPriceProvider {
    fn fetch_bars(
        &self,
        ticker: &str,
        _lookback: Lookback,
        _interval: Interval,
    ) -> Result<Vec<PriceBar>, SmartTraderError> {
        self.calls.borrow_mut().push(ticker.to_string());
        if let Some(reason) = self.errors.get(ticker) {
            return Err(SmartTraderError::unavailable(ticker, reason.clone()));
        }
        Ok(self.data.get(ticker).cloned().unwrap_or_default())
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn make_bar(ticker: &str, date: NaiveDate, close: f64) -> PriceBar {
    PriceBar {
        ticker: ticker.to_string(),
        date,
        open: close,
        high: close,
        low: close,
        close,
        volume: 1000,
    }
}

/// One bar per calendar day starting 2024-01-01.
pub fn make_bars(ticker: &str, closes: &[f64]) -> Vec<PriceBar> {
    let start = date("2024-01-01");
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| make_bar(ticker, start + chrono::Duration::days(i as i64), c))
        .collect()
}

pub fn flat_bars(ticker: &str, n: usize, price: f64) -> Vec<PriceBar> {
    make_bars(ticker, &vec![price; n])
}

/// Steady climb with a small alternating wobble so every window has spread.
pub fn rising_bars(ticker: &str, n: usize, start: f64, step: f64) -> Vec<PriceBar> {
    let closes: Vec<f64> = (0..n)
        .map(|i| start + step * i as f64 + if i % 2 == 0 { 0.1 } else { -0.1 })
        .collect();
    make_bars(ticker, &closes)
}

/// Long climb that rolls over at the end.
pub fn rolling_over_bars(ticker: &str) -> Vec<PriceBar> {
    let mut closes: Vec<f64> = (0..80).map(|i| 100.0 + i as f64).collect();
    closes.extend((1..=10).map(|i| 179.0 - 3.0 * i as f64));
    make_bars(ticker, &closes)
}

pub fn make_idea(ticker: &str, sector: Sector, volatility: Volatility, score: f64) -> TradeIdea {
    TradeIdea {
        ticker: ticker.to_string(),
        sector,
        volatility,
        trade_type: "Swing".to_string(),
        score,
        price: 100.0,
        rsi: Some(50.0),
        macd: Some(0.1),
        reason: "Test idea".to_string(),
        suggested_action: "Buy".to_string(),
    }
}

pub fn make_trade(ticker: &str, buy_price: f64, sector: Sector) -> LoggedTrade {
    LoggedTrade {
        ticker: ticker.to_string(),
        buy_price,
        trade_type: "Stock".to_string(),
        sector,
        date: date("2024-03-01"),
    }
}
