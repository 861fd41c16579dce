//! JSON file store for the idea catalog and the portfolio ledger.

use crate::domain::error::SmartTraderError;
use crate::domain::idea::{IdeaCatalog, TradeIdea};
use crate::domain::ledger::Ledger;
use crate::ports::store_port::StorePort;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub struct JsonStoreAdapter {
    catalog_path: PathBuf,
    ledger_path: PathBuf,
}

impl JsonStoreAdapter {
    pub fn new(catalog_path: PathBuf, ledger_path: PathBuf) -> Self {
        Self {
            catalog_path,
            ledger_path,
        }
    }

    pub fn ledger_path(&self) -> &Path {
        &self.ledger_path
    }
}

/// Catalog as stored; ideas are decoded one at a time.
#[derive(Deserialize)]
struct RawCatalog {
    date: NaiveDate,
    #[serde(default)]
    ideas: Vec<serde_json::Value>,
}

impl RawCatalog {
    /// Ideas that fail to decode (an unknown sector, say) are skipped with a warning.
    fn into_catalog(self) -> IdeaCatalog {
        let ideas = self
            .ideas
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| match serde_json::from_value::<TradeIdea>(value) {
                Ok(idea) => Some(idea),
                Err(e) => {
                    warn!(index, error = %e, "skipping malformed catalog idea");
                    None
                }
            })
            .collect();
        IdeaCatalog {
            date: self.date,
            ideas,
        }
    }
}

/// `Ok(None)` when the file does not exist.
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, SmartTraderError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "store file missing, using defaults");
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };
    serde_json::from_str(&content)
        .map(Some)
        .map_err(|e| SmartTraderError::Storage {
            reason: format!("malformed JSON in {}: {}", path.display(), e),
        })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), SmartTraderError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser).map_err(|e| SmartTraderError::Storage {
        reason: format!("failed to encode {}: {}", path.display(), e),
    })?;
    fs::write(path, buf)?;
    Ok(())
}

impl StorePort for JsonStoreAdapter {
    fn load_catalog(&self) -> Result<IdeaCatalog, SmartTraderError> {
        Ok(match read_json::<RawCatalog>(&self.catalog_path)? {
            Some(raw) => raw.into_catalog(),
            None => IdeaCatalog::empty(chrono::Local::now().date_naive()),
        })
    }

    fn load_ledger(&self) -> Result<Ledger, SmartTraderError> {
        Ok(read_json(&self.ledger_path)?.unwrap_or_default())
    }

    fn save_ledger(&self, ledger: &Ledger) -> Result<(), SmartTraderError> {
        write_json(&self.ledger_path, ledger)?;
        info!(
            path = %self.ledger_path.display(),
            trades = ledger.trades.len(),
            "saved portfolio ledger"
        );
        Ok(())
    }
}
