//! Trade-idea catalog records and the risk/sector filter.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The eleven GICS sectors. Names parse case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Sector {
    CommunicationServices,
    ConsumerDiscretionary,
    ConsumerStaples,
    Energy,
    Financials,
    HealthCare,
    Industrials,
    InformationTechnology,
    Materials,
    RealEstate,
    Utilities,
}

impl Sector {
    pub const ALL: [Sector; 11] = [
        Sector::CommunicationServices,
        Sector::ConsumerDiscretionary,
        Sector::ConsumerStaples,
        Sector::Energy,
        Sector::Financials,
        Sector::HealthCare,
        Sector::Industrials,
        Sector::InformationTechnology,
        Sector::Materials,
        Sector::RealEstate,
        Sector::Utilities,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Sector::CommunicationServices => "Communication Services",
            Sector::ConsumerDiscretionary => "Consumer Discretionary",
            Sector::ConsumerStaples => "Consumer Staples",
            Sector::Energy => "Energy",
            Sector::Financials => "Financials",
            Sector::HealthCare => "Health Care",
            Sector::Industrials => "Industrials",
            Sector::InformationTechnology => "Information Technology",
            Sector::Materials => "Materials",
            Sector::RealEstate => "Real Estate",
            Sector::Utilities => "Utilities",
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Sector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Sector::ALL
            .into_iter()
            .find(|sector| sector.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown sector '{wanted}'"))
    }
}

impl TryFrom<String> for Sector {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Sector> for String {
    fn from(sector: Sector) -> Self {
        sector.name().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Volatility {
    Low,
    Moderate,
    High,
}

impl Volatility {
    pub fn name(&self) -> &'static str {
        match self {
            Volatility::Low => "low",
            Volatility::Moderate => "moderate",
            Volatility::High => "high",
        }
    }
}

impl fmt::Display for Volatility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Volatility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Volatility::Low),
            "moderate" => Ok(Volatility::Moderate),
            "high" => Ok(Volatility::High),
            other => Err(format!("unknown volatility '{other}'")),
        }
    }
}

impl TryFrom<String> for Volatility {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Volatility> for String {
    fn from(v: Volatility) -> Self {
        v.name().to_string()
    }
}

/// The user's risk appetite; each tier admits a widening set of volatilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum RiskTier {
    Low,
    #[default]
    Moderate,
    High,
}

impl RiskTier {
    pub fn admits(&self, volatility: Volatility) -> bool {
        match self {
            RiskTier::Low => volatility == Volatility::Low,
            RiskTier::Moderate => volatility != Volatility::High,
            RiskTier::High => true,
        }
    }
}

impl FromStr for RiskTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(RiskTier::Low),
            "moderate" => Ok(RiskTier::Moderate),
            "high" => Ok(RiskTier::High),
            other => Err(format!("unknown risk tier '{other}' (expected low, moderate or high)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SectorFilter {
    #[default]
    All,
    Only(Sector),
}

impl SectorFilter {
    pub fn admits(&self, sector: Sector) -> bool {
        match self {
            SectorFilter::All => true,
            SectorFilter::Only(wanted) => *wanted == sector,
        }
    }
}

impl FromStr for SectorFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(SectorFilter::All);
        }
        s.parse().map(SectorFilter::Only)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeIdea {
    pub ticker: String,
    pub sector: Sector,
    pub volatility: Volatility,
    #[serde(rename = "type")]
    pub trade_type: String,
    pub score: f64,
    pub price: f64,
    #[serde(rename = "RSI", default)]
    pub rsi: Option<f64>,
    #[serde(rename = "MACD", default)]
    pub macd: Option<f64>,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub suggested_action: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdeaCatalog {
    pub date: NaiveDate,
    #[serde(default)]
    pub ideas: Vec<TradeIdea>,
}

impl IdeaCatalog {
    pub fn empty(date: NaiveDate) -> Self {
        IdeaCatalog {
            date,
            ideas: Vec::new(),
        }
    }

    /// First idea for `ticker`, matched case-insensitively.
    pub fn find(&self, ticker: &str) -> Option<&TradeIdea> {
        self.ideas
            .iter()
            .find(|idea| idea.ticker.eq_ignore_ascii_case(ticker))
    }
}

/// Keep the ideas admitted by `risk` and `sector`, best score first.
///
/// Ties keep their catalog order.
pub fn filter_and_rank(ideas: &[TradeIdea], risk: RiskTier, sector: SectorFilter) -> Vec<TradeIdea> {
    let mut kept: Vec<TradeIdea> = ideas
        .iter()
        .filter(|idea| risk.admits(idea.volatility) && sector.admits(idea.sector))
        .cloned()
        .collect();
    kept.sort_by(|a, b| b.score.total_cmp(&a.score));
    kept
}
