//! Domain error types and process exit-code mapping.

use chrono::NaiveDate;

/// Top-level error type for etfrank.
///
/// Universe, calendar, and config failures abort a run; price-data failures
/// for a single instrument are degraded to not-launched by the engine and
/// only reach this type when an adapter is used outside the engine.
#[derive(Debug, thiserror::Error)]
pub enum EtfRankError {
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

    #[error("universe unavailable: {reason}")]
    UniverseUnavailable { reason: String },

    #[error("no trading day within {window} days at or before {date}")]
    CalendarExhausted { date: NaiveDate, window: u32 },

    #[error("price data error for {code}: {reason}")]
    PriceData { code: String, reason: String },

    #[error("transient provider failure for {code}: {reason}")]
    ProviderTransient { code: String, reason: String },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&EtfRankError> for std::process::ExitCode {
    fn from(err: &EtfRankError) -> Self {
        let code: u8 = match err {
            EtfRankError::Io(_) => 1,
            EtfRankError::ConfigParse { .. }
            | EtfRankError::ConfigMissing { .. }
            | EtfRankError::ConfigInvalid { .. } => 2,
            EtfRankError::UniverseUnavailable { .. } => 3,
            EtfRankError::CalendarExhausted { .. } => 4,
            EtfRankError::PriceData { .. } | EtfRankError::ProviderTransient { .. } => 5,
            EtfRankError::Report { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}
