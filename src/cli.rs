//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::fmt::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

use crate::adapters::csv_adapter::CsvPriceAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_store_adapter::JsonStoreAdapter;
use crate::domain::error::SmartTraderError;
use crate::domain::idea::{filter_and_rank, IdeaCatalog, RiskTier, SectorFilter, TradeIdea};
use crate::domain::ledger::{Ledger, LoggedTrade};
use crate::domain::portfolio::{aggregate_portfolio, PortfolioReport};
use crate::domain::settings::DashboardConfig;
use crate::domain::signal::{analyze_ticker, flags_label, SellSignalVerdict};
use crate::ports::config_port::ConfigPort;
use crate::ports::price_port::PriceSeriesProvider;
use crate::ports::store_port::StorePort;

#[derive(Parser, Debug)]
#[command(name = "smarttrader", about = "Trade-idea dashboard with live sell signals")]
pub struct Cli {
    /// INI configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    /// Directory of per-ticker CSV price files
    #[arg(long, global = true)]
    pub prices_dir: Option<PathBuf>,
    /// Trade-idea catalog JSON
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,
    /// Portfolio ledger JSON
    #[arg(long, global = true)]
    pub ledger: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List catalog ideas admitted by a risk tier and sector, best first
    Ideas {
        #[arg(long, default_value = "moderate")]
        risk: RiskTier,
        #[arg(long, default_value = "All")]
        sector: SectorFilter,
    },
    /// Show indicators and the sell verdict for one ticker
    Signal {
        #[arg(short, long)]
        ticker: String,
    },
    /// Live portfolio summary
    Portfolio,
    /// Log a purchase of a catalog idea at its listed price
    Buy {
        #[arg(short, long)]
        ticker: String,
    },
    /// Set the portfolio budget
    Budget {
        #[arg(long, value_parser = parse_amount)]
        amount: f64,
    },
}

impl Command {
    fn needs_prices(&self) -> bool {
        matches!(self, Command::Signal { .. } | Command::Portfolio)
    }
}

fn parse_amount(s: &str) -> Result<f64, String> {
    let amount: f64 = s.parse().map_err(|_| format!("'{s}' is not a number"))?;
    if !amount.is_finite() || amount < 0.0 {
        return Err("budget must be a non-negative amount".to_string());
    }
    Ok(amount)
}

pub fn run(cli: Cli) -> ExitCode {
    match execute(&cli) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Run a command and return the text it prints on success.
pub fn execute(cli: &Cli) -> Result<String, SmartTraderError> {
    let config = resolve_config(cli)?;
    let store = JsonStoreAdapter::new(config.catalog_path.clone(), config.ledger_path.clone());

    match &cli.command {
        Command::Ideas { risk, sector } => {
            let catalog = store.load_catalog()?;
            let ranked = filter_and_rank(&catalog.ideas, *risk, *sector);
            Ok(render_ideas(&catalog, &ranked))
        }
        Command::Signal { ticker } => {
            let prices = CsvPriceAdapter::new(config.prices_dir.clone());
            let verdict = analyze_ticker(&prices, ticker, &config.signals)?;
            Ok(render_signal(ticker, &verdict))
        }
        Command::Portfolio => {
            let prices = CsvPriceAdapter::new(config.prices_dir.clone());
            let ledger = store.load_ledger()?;
            let report = portfolio_report(&prices, &ledger, &config);
            Ok(render_portfolio(&ledger, &report))
        }
        Command::Buy { ticker } => {
            let trade = log_purchase(&store, ticker)?;
            Ok(format!(
                "Trade logged: {} at ${:.2} ({})\n",
                trade.ticker, trade.buy_price, trade.date
            ))
        }
        Command::Budget { amount } => {
            set_budget(&store, *amount)?;
            Ok(format!("Budget set to ${amount:.2}\n"))
        }
    }
}

/// Config file first, then command-line overrides.
pub fn resolve_config(cli: &Cli) -> Result<DashboardConfig, SmartTraderError> {
    let mut adapter = match &cli.config {
        Some(path) => {
            info!(path = %path.display(), "loading config");
            FileConfigAdapter::from_file(path)?
        }
        None => FileConfigAdapter::from_string("")?,
    };

    let overrides = [
        ("prices_dir", &cli.prices_dir),
        ("catalog_path", &cli.catalog),
        ("ledger_path", &cli.ledger),
    ];
    for (key, value) in overrides {
        if let Some(path) = value {
            adapter.set("data", key, path.display().to_string());
        }
    }

    // Catalog and ledger commands never read prices.
    if !cli.command.needs_prices() && adapter.get_string("data", "prices_dir").is_none() {
        adapter.set("data", "prices_dir", ".".to_string());
    }

    DashboardConfig::from_config(&adapter)
}

pub fn portfolio_report(
    prices: &dyn PriceSeriesProvider,
    ledger: &Ledger,
    config: &DashboardConfig,
) -> PortfolioReport {
    aggregate_portfolio(&ledger.trades, |ticker| {
        analyze_ticker(prices, ticker, &config.signals)
    })
}

/// Append the catalog idea for `ticker` to the ledger and save it.
pub fn log_purchase(store: &dyn StorePort, ticker: &str) -> Result<LoggedTrade, SmartTraderError> {
    let catalog = store.load_catalog()?;
    let idea = catalog
        .find(ticker)
        .ok_or_else(|| SmartTraderError::UnknownIdea {
            ticker: ticker.to_string(),
        })?;

    let trade = LoggedTrade::from_idea(idea, catalog.date);
    let mut ledger = store.load_ledger()?;
    ledger.record(trade.clone());
    store.save_ledger(&ledger)?;
    Ok(trade)
}

pub fn set_budget(store: &dyn StorePort, amount: f64) -> Result<Ledger, SmartTraderError> {
    let mut ledger = store.load_ledger()?;
    ledger.budget = amount;
    store.save_ledger(&ledger)?;
    Ok(ledger)
}

fn opt(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "n/a".to_string(),
    }
}

pub fn render_ideas(catalog: &IdeaCatalog, ideas: &[TradeIdea]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Trade ideas for {}", catalog.date);
    if ideas.is_empty() {
        out.push_str("No ideas match the current filters.\n");
        return out;
    }
    for idea in ideas {
        let _ = writeln!(
            out,
            "{} | {} | {} | Score: {}",
            idea.ticker, idea.sector, idea.trade_type, idea.score
        );
        let _ = writeln!(
            out,
            "  Price: ${:.2}  Volatility: {}  RSI: {}  MACD: {}",
            idea.price,
            idea.volatility,
            opt(idea.rsi),
            opt(idea.macd)
        );
        if !idea.reason.is_empty() {
            let _ = writeln!(out, "  Reason: {}", idea.reason);
        }
        if !idea.suggested_action.is_empty() {
            let _ = writeln!(out, "  Suggested action: {}", idea.suggested_action);
        }
    }
    out
}

pub fn render_signal(ticker: &str, verdict: &SellSignalVerdict) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", ticker.to_uppercase());
    let _ = writeln!(out, "  Price:           {:.2}", verdict.price);
    let _ = writeln!(out, "  RSI(14):         {}", opt(verdict.rsi));
    let _ = writeln!(out, "  MACD:            {}", opt(verdict.macd));
    let _ = writeln!(out, "  Signal:          {}", opt(verdict.signal));
    let _ = writeln!(out, "  Bollinger upper: {}", opt(verdict.bollinger_upper));
    let _ = writeln!(out, "  Sell flags:      {}", verdict.flags_label());
    out
}

pub fn render_portfolio(ledger: &Ledger, report: &PortfolioReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Budget: ${:.2}", ledger.budget);

    let summary = match report {
        PortfolioReport::NoTrades => {
            out.push_str("No trades logged.\n");
            return out;
        }
        PortfolioReport::Summary(summary) => summary,
    };

    let _ = writeln!(
        out,
        "{:<8} {:>10} {:>10} {:>8}  Sell flags",
        "Ticker", "Buy", "Current", "PnL %"
    );
    for p in &summary.positions {
        let _ = writeln!(
            out,
            "{:<8} {:>10.2} {:>10.2} {:>8}  {}",
            p.ticker,
            p.buy_price,
            p.current_price,
            opt(p.pnl_percent),
            flags_label(&p.sell_flags)
        );
    }
    for u in &summary.unavailable {
        let _ = writeln!(
            out,
            "{:<8} {:>10.2} {:>10} {:>8}  unavailable: {}",
            u.ticker, u.buy_price, "-", "-", u.reason
        );
    }

    let t = &summary.totals;
    let _ = writeln!(
        out,
        "Total invested: ${:.2}  Current value: ${:.2}  Net P/L: ${:.2} ({}%)",
        t.invested,
        t.current_value,
        t.net_pnl,
        opt(t.net_pnl_percent)
    );
    if !t.is_fully_priced() {
        let _ = writeln!(
            out,
            "Priced positions only: invested ${:.2}  Net P/L: ${:.2} ({}%)",
            t.priced_invested,
            t.priced_pnl,
            opt(t.priced_pnl_percent)
        );
    }

    let total: usize = summary.sector_counts.iter().map(|c| c.count).sum();
    out.push_str("Sectors:\n");
    for c in &summary.sector_counts {
        let _ = writeln!(
            out,
            "  {:<24} {:>3} ({:.1}%)",
            c.sector.name(),
            c.count,
            c.share_percent(total)
        );
    }
    out
}
