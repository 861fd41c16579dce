//! Portfolio ledger: the budget and the append-only list of logged trades.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::idea::{Sector, TradeIdea};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedTrade {
    pub ticker: String,
    pub buy_price: f64,
    #[serde(rename = "type")]
    pub trade_type: String,
    pub sector: Sector,
    pub date: NaiveDate,
}

impl LoggedTrade {
    /// A trade bought at the idea's listed price on `date`.
    pub fn from_idea(idea: &TradeIdea, date: NaiveDate) -> Self {
        LoggedTrade {
            ticker: idea.ticker.clone(),
            buy_price: idea.price,
            trade_type: idea.trade_type.clone(),
            sector: idea.sector,
            date,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    #[serde(default)]
    pub budget: f64,
    #[serde(default)]
    pub trades: Vec<LoggedTrade>,
}

impl Ledger {
    pub fn record(&mut self, trade: LoggedTrade) {
        self.trades.push(trade);
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }
}
