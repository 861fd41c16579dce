//! Persistence port for the idea catalog and the portfolio ledger.

use crate::domain::error::SmartTraderError;
use crate::domain::idea::IdeaCatalog;
use crate::domain::ledger::Ledger;

pub trait StorePort {
    fn load_catalog(&self) -> Result<IdeaCatalog, SmartTraderError>;

    fn load_ledger(&self) -> Result<Ledger, SmartTraderError>;

    fn save_ledger(&self, ledger: &Ledger) -> Result<(), SmartTraderError>;
}
