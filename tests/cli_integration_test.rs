//! CLI integration tests for command orchestration.
//!
//! Tests cover:
//! - Config resolution from INI files and command-line overrides
//! - `ideas`, `signal`, `portfolio`, `buy` and `budget` against real files
//! - Error-to-exit-status mapping for CLI failures

mod common;

use clap::Parser;
use common::*;
use smarttrader::adapters::json_store_adapter::JsonStoreAdapter;
use smarttrader::cli::{self, Cli, Command};
use smarttrader::domain::error::SmartTraderError;
use smarttrader::domain::idea::{RiskTier, SectorFilter};
use smarttrader::domain::ledger::Ledger;
use smarttrader::domain::ohlcv::Interval;
use smarttrader::ports::store_port::StorePort;
use std::fmt::Write as _;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const CATALOG: &str = r#"{
    "date": "2024-04-15",
    "ideas": [
        {"ticker": "XOM", "sector": "Energy", "volatility": "low", "type": "Value",
         "score": 7.2, "price": 115.0, "RSI": 48.1, "MACD": 0.4,
         "reason": "Dividend support", "suggested_action": "Buy"},
        {"ticker": "NVDA", "sector": "Information Technology", "volatility": "high", "type": "Momentum",
         "score": 9.4, "price": 880.0, "RSI": 71.3, "MACD": 6.2,
         "reason": "AI demand", "suggested_action": "Buy on dip"},
        {"ticker": "JPM", "sector": "Financials", "volatility": "moderate", "type": "Swing",
         "score": 8.1, "price": 190.0, "RSI": 55.0, "MACD": 1.1,
         "reason": "Rate tailwind", "suggested_action": "Buy"}
    ]
}"#;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn write_prices(dir: &Path, ticker: &str, closes: &[f64]) {
    let mut csv = String::from("date,open,high,low,close,volume\n");
    for bar in make_bars(ticker, closes) {
        let _ = writeln!(
            csv,
            "{},{},{},{},{},{}",
            bar.date, bar.open, bar.high, bar.low, bar.close, bar.volume
        );
    }
    fs::write(dir.join(format!("{ticker}.csv")), csv).unwrap();
}

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("prices")).unwrap();
        fs::write(dir.path().join("daily_trade_ideas.json"), CATALOG).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn cli(&self, command: Command) -> Cli {
        Cli {
            config: None,
            prices_dir: Some(self.path("prices")),
            catalog: Some(self.path("daily_trade_ideas.json")),
            ledger: Some(self.path("portfolio.json")),
            command,
        }
    }

    fn store(&self) -> JsonStoreAdapter {
        JsonStoreAdapter::new(self.path("daily_trade_ideas.json"), self.path("portfolio.json"))
    }
}

mod config_resolution {
    use super::*;

    #[test]
    fn ini_file_supplies_paths_and_signals() {
        let ini = write_temp_ini(
            "[data]\nprices_dir = /data/prices\nledger_path = /data/book.json\n\n\
             [signals]\nlookback_days = 90\ninterval = weekly\nrsi_overbought = 75\n",
        );
        let cli = Cli {
            config: Some(ini.path().to_path_buf()),
            prices_dir: None,
            catalog: None,
            ledger: None,
            command: Command::Portfolio,
        };
        let config = cli::resolve_config(&cli).unwrap();
        assert_eq!(config.prices_dir, PathBuf::from("/data/prices"));
        assert_eq!(config.ledger_path, PathBuf::from("/data/book.json"));
        assert_eq!(config.catalog_path, PathBuf::from("daily_trade_ideas.json"));
        assert_eq!(config.signals.lookback.days, 90);
        assert_eq!(config.signals.interval, Interval::Weekly);
        assert_eq!(config.signals.thresholds.rsi_overbought, 75.0);
    }

    #[test]
    fn flags_override_ini() {
        let ini = write_temp_ini("[data]\nprices_dir = /data/prices\n");
        let cli = Cli {
            config: Some(ini.path().to_path_buf()),
            prices_dir: Some(PathBuf::from("/override")),
            catalog: None,
            ledger: Some(PathBuf::from("mine.json")),
            command: Command::Portfolio,
        };
        let config = cli::resolve_config(&cli).unwrap();
        assert_eq!(config.prices_dir, PathBuf::from("/override"));
        assert_eq!(config.ledger_path, PathBuf::from("mine.json"));
    }

    #[test]
    fn price_commands_need_prices_dir() {
        let cli = Cli::parse_from(["smarttrader", "signal", "--ticker", "XOM"]);
        let err = cli::resolve_config(&cli).unwrap_err();
        assert!(matches!(err, SmartTraderError::ConfigMissing { .. }));
        assert_eq!(err.exit_status(), 2);
    }

    #[test]
    fn catalog_commands_work_without_prices_dir() {
        let cli = Cli::parse_from(["smarttrader", "ideas"]);
        assert!(cli::resolve_config(&cli).is_ok());
    }

    #[test]
    fn invalid_signal_setting_is_rejected() {
        let ini = write_temp_ini("[data]\nprices_dir = p\n[signals]\ninterval = hourly\n");
        let cli = Cli {
            config: Some(ini.path().to_path_buf()),
            prices_dir: None,
            catalog: None,
            ledger: None,
            command: Command::Portfolio,
        };
        let err = cli::resolve_config(&cli).unwrap_err();
        assert!(matches!(err, SmartTraderError::ConfigInvalid { .. }));
    }

    #[test]
    fn missing_config_file_is_config_error() {
        let cli = Cli::parse_from(["smarttrader", "--config", "/nonexistent/app.ini", "portfolio"]);
        let err = cli::resolve_config(&cli).unwrap_err();
        assert!(matches!(err, SmartTraderError::ConfigParse { .. }));
    }
}

mod argument_parsing {
    use super::*;

    #[test]
    fn ideas_defaults() {
        let cli = Cli::parse_from(["smarttrader", "ideas"]);
        match cli.command {
            Command::Ideas { risk, sector } => {
                assert_eq!(risk, RiskTier::Moderate);
                assert_eq!(sector, SectorFilter::All);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn ideas_with_filters_and_global_flag_after_subcommand() {
        let cli = Cli::parse_from([
            "smarttrader",
            "ideas",
            "--risk",
            "high",
            "--sector",
            "health care",
            "--catalog",
            "c.json",
        ]);
        assert_eq!(cli.catalog, Some(PathBuf::from("c.json")));
        assert!(matches!(
            cli.command,
            Command::Ideas { risk: RiskTier::High, sector: SectorFilter::Only(_) }
        ));
    }

    #[test]
    fn negative_budget_rejected() {
        assert!(Cli::try_parse_from(["smarttrader", "budget", "--amount", "-5"]).is_err());
        assert!(Cli::try_parse_from(["smarttrader", "budget", "--amount", "abc"]).is_err());
    }

    #[test]
    fn unknown_risk_rejected() {
        assert!(Cli::try_parse_from(["smarttrader", "ideas", "--risk", "extreme"]).is_err());
    }
}

mod commands {
    use super::*;

    #[test]
    fn ideas_lists_ranked_filtered() {
        let ws = Workspace::new();
        let out = cli::execute(&ws.cli(Command::Ideas {
            risk: RiskTier::Moderate,
            sector: SectorFilter::All,
        }))
        .unwrap();

        assert!(out.starts_with("Trade ideas for 2024-04-15\n"));
        let jpm = out.find("JPM").unwrap();
        let xom = out.find("XOM").unwrap();
        assert!(jpm < xom);
        assert!(!out.contains("NVDA"));
        assert!(out.contains("Reason: Rate tailwind"));
    }

    #[test]
    fn ideas_with_no_matches() {
        let ws = Workspace::new();
        let out = cli::execute(&ws.cli(Command::Ideas {
            risk: RiskTier::Low,
            sector: "Utilities".parse().unwrap(),
        }))
        .unwrap();
        assert!(out.contains("No ideas match"));
    }

    #[test]
    fn signal_reports_verdict() {
        let ws = Workspace::new();
        write_prices(&ws.path("prices"), "FLAT", &[50.0; 30]);

        let out = cli::execute(&ws.cli(Command::Signal {
            ticker: "FLAT".into(),
        }))
        .unwrap();
        assert!(out.contains("Price:           50.00"));
        assert!(out.contains("RSI(14):         n/a"));
        assert!(out.contains("Bollinger upper: 50.00"));
        assert!(out.contains("Sell flags:      None"));
    }

    #[test]
    fn signal_for_missing_prices_is_data_error() {
        let ws = Workspace::new();
        let err = cli::execute(&ws.cli(Command::Signal {
            ticker: "NOPE".into(),
        }))
        .unwrap_err();
        assert_eq!(err.exit_status(), 5);
    }

    #[test]
    fn buy_logs_catalog_idea() {
        let ws = Workspace::new();
        let out = cli::execute(&ws.cli(Command::Buy {
            ticker: "jpm".into(),
        }))
        .unwrap();
        assert!(out.contains("Trade logged: JPM at $190.00 (2024-04-15)"));

        let ledger = ws.store().load_ledger().unwrap();
        assert_eq!(ledger.trades.len(), 1);
        assert_eq!(ledger.trades[0].buy_price, 190.0);
        assert_eq!(ledger.trades[0].trade_type, "Swing");
        assert_eq!(ledger.trades[0].date, date("2024-04-15"));
    }

    #[test]
    fn buy_unknown_ticker() {
        let ws = Workspace::new();
        let err = cli::execute(&ws.cli(Command::Buy {
            ticker: "TSLA".into(),
        }))
        .unwrap_err();
        assert!(matches!(err, SmartTraderError::UnknownIdea { .. }));
        assert_eq!(err.exit_status(), 4);
        assert!(!ws.path("portfolio.json").exists());
    }

    #[test]
    fn budget_keeps_trades() {
        let ws = Workspace::new();
        cli::execute(&ws.cli(Command::Buy {
            ticker: "XOM".into(),
        }))
        .unwrap();
        let out = cli::execute(&ws.cli(Command::Budget { amount: 2500.0 })).unwrap();
        assert_eq!(out, "Budget set to $2500.00\n");

        let ledger = ws.store().load_ledger().unwrap();
        assert_eq!(ledger.budget, 2500.0);
        assert_eq!(ledger.trades.len(), 1);
    }

    #[test]
    fn portfolio_with_no_trades() {
        let ws = Workspace::new();
        let out = cli::execute(&ws.cli(Command::Portfolio)).unwrap();
        assert_eq!(out, "Budget: $0.00\nNo trades logged.\n");
    }

    #[test]
    fn portfolio_shows_positions_and_unavailable() {
        let ws = Workspace::new();
        write_prices(&ws.path("prices"), "XOM", &[126.5; 30]);
        cli::execute(&ws.cli(Command::Buy { ticker: "XOM".into() })).unwrap();
        cli::execute(&ws.cli(Command::Buy { ticker: "JPM".into() })).unwrap();

        let out = cli::execute(&ws.cli(Command::Portfolio)).unwrap();
        assert!(out.contains("XOM"));
        assert!(out.contains("10.00"));
        assert!(out.contains("JPM"));
        assert!(out.contains("unavailable:"));
        assert!(out.contains("Total invested: $305.00  Current value: $126.50"));
        assert!(out.contains("Priced positions only: invested $115.00"));
        assert!(out.contains("Energy"));
        assert!(out.contains("Financials"));
    }

    #[test]
    fn malformed_ledger_is_storage_error() {
        let ws = Workspace::new();
        fs::write(ws.path("portfolio.json"), "[1, 2").unwrap();
        let err = cli::execute(&ws.cli(Command::Portfolio)).unwrap_err();
        assert_eq!(err.exit_status(), 3);
    }

    #[test]
    fn set_budget_through_store_port() {
        let ws = Workspace::new();
        let ledger = cli::set_budget(&ws.store(), 100.0).unwrap();
        assert_eq!(ledger, Ledger { budget: 100.0, trades: Vec::new() });
    }
}
