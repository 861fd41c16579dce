//! Domain error types.

/// Top-level error type for smarttrader.
#[derive(Debug, thiserror::Error)]
pub enum SmartTraderError {
    #[error("insufficient price history: have {bars} bars, need {minimum}")]
    InsufficientHistory { bars: usize, minimum: usize },

    #[error("price data unavailable for {ticker}: {reason}")]
    DataUnavailable { ticker: String, reason: String },

    #[error("storage error: {reason}")]
    Storage { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("no trade idea for {ticker} in the catalog")]
    UnknownIdea { ticker: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SmartTraderError {
    pub fn unavailable(ticker: &str, reason: impl Into<String>) -> Self {
        SmartTraderError::DataUnavailable {
            ticker: ticker.to_string(),
            reason: reason.into(),
        }
    }

    /// Process exit status for this error category.
    pub fn exit_status(&self) -> u8 {
        match self {
            SmartTraderError::Io(_) => 1,
            SmartTraderError::ConfigParse { .. }
            | SmartTraderError::ConfigMissing { .. }
            | SmartTraderError::ConfigInvalid { .. } => 2,
            SmartTraderError::Storage { .. } => 3,
            SmartTraderError::UnknownIdea { .. } => 4,
            SmartTraderError::DataUnavailable { .. }
            | SmartTraderError::InsufficientHistory { .. } => 5,
        }
    }
}

impl From<&SmartTraderError> for std::process::ExitCode {
    fn from(err: &SmartTraderError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}
