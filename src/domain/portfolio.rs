//! Live portfolio rollup: per-position P/L, totals and sector breakdown.
//!
//! Positions are a view recomputed on every pass from the ledger and fresh
//! sell-signal verdicts; nothing here is persisted.

use std::collections::{BTreeMap, HashMap};

use tracing::warn;

use crate::domain::error::SmartTraderError;
use crate::domain::idea::Sector;
use crate::domain::ledger::LoggedTrade;
use crate::domain::signal::{SellReason, SellSignalVerdict};

#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioPosition {
    pub ticker: String,
    pub buy_price: f64,
    pub current_price: f64,
    /// `None` when the buy price is zero.
    pub pnl_percent: Option<f64>,
    pub sell_flags: Vec<SellReason>,
}

/// A logged trade left out of the live rollup because its price could not be fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct UnavailablePosition {
    pub ticker: String,
    pub buy_price: f64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioTotals {
    /// Buy prices of every logged trade.
    pub invested: f64,
    /// Current prices of the trades that could be priced.
    pub current_value: f64,
    pub net_pnl: f64,
    /// `None` when `invested` is zero.
    pub net_pnl_percent: Option<f64>,
    /// Buy prices of the priced trades only.
    pub priced_invested: f64,
    pub priced_pnl: f64,
    pub priced_pnl_percent: Option<f64>,
}

impl PortfolioTotals {
    /// True when every trade was priced, so both bases agree.
    pub fn is_fully_priced(&self) -> bool {
        (self.invested - self.priced_invested).abs() < f64::EPSILON
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectorCount {
    pub sector: Sector,
    pub count: usize,
}

impl SectorCount {
    pub fn share_percent(&self, total: usize) -> f64 {
        if total == 0 {
            return 0.0;
        }
        self.count as f64 / total as f64 * 100.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioSummary {
    pub positions: Vec<PortfolioPosition>,
    pub unavailable: Vec<UnavailablePosition>,
    pub totals: PortfolioTotals,
    pub sector_counts: Vec<SectorCount>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PortfolioReport {
    NoTrades,
    Summary(PortfolioSummary),
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn percent_change(from: f64, to: f64) -> Option<f64> {
    if from == 0.0 {
        return None;
    }
    Some(round2((to - from) / from * 100.0))
}

/// Roll the ledger up against live verdicts.
///
/// `lookup` is called at most once per distinct ticker. A failed lookup puts
/// every trade of that ticker into `unavailable`.
pub fn aggregate_portfolio<F>(trades: &[LoggedTrade], mut lookup: F) -> PortfolioReport
where
    F: FnMut(&str) -> Result<SellSignalVerdict, SmartTraderError>,
{
    if trades.is_empty() {
        return PortfolioReport::NoTrades;
    }

    let mut verdicts: HashMap<&str, Result<SellSignalVerdict, String>> = HashMap::new();
    let mut positions = Vec::new();
    let mut unavailable = Vec::new();

    for trade in trades {
        let verdict = verdicts
            .entry(trade.ticker.as_str())
            .or_insert_with(|| lookup(&trade.ticker).map_err(|e| e.to_string()));

        match verdict {
            Ok(v) => positions.push(PortfolioPosition {
                ticker: trade.ticker.clone(),
                buy_price: trade.buy_price,
                current_price: v.price,
                pnl_percent: percent_change(trade.buy_price, v.price),
                sell_flags: v.reasons.clone(),
            }),
            Err(reason) => {
                warn!(ticker = %trade.ticker, %reason, "excluding position from live rollup");
                unavailable.push(UnavailablePosition {
                    ticker: trade.ticker.clone(),
                    buy_price: trade.buy_price,
                    reason: reason.clone(),
                });
            }
        }
    }

    let invested: f64 = trades.iter().map(|t| t.buy_price).sum();
    let current_value: f64 = positions.iter().map(|p| p.current_price).sum();
    let priced_invested: f64 = positions.iter().map(|p| p.buy_price).sum();
    let net_pnl = current_value - invested;
    let priced_pnl = current_value - priced_invested;

    let totals = PortfolioTotals {
        invested,
        current_value,
        net_pnl,
        net_pnl_percent: percent_change(invested, current_value),
        priced_invested,
        priced_pnl,
        priced_pnl_percent: percent_change(priced_invested, current_value),
    };

    PortfolioReport::Summary(PortfolioSummary {
        positions,
        unavailable,
        totals,
        sector_counts: sector_counts(trades),
    })
}

/// Trades per sector, most common first; ties in sector order.
pub fn sector_counts(trades: &[LoggedTrade]) -> Vec<SectorCount> {
    let mut counts: BTreeMap<Sector, usize> = BTreeMap::new();
    for trade in trades {
        *counts.entry(trade.sector).or_insert(0) += 1;
    }

    let mut out: Vec<SectorCount> = counts
        .into_iter()
        .map(|(sector, count)| SectorCount { sector, count })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count));
    out
}
