//! Instrument universe port trait.

use crate::domain::error::EtfRankError;
use crate::domain::instrument::UniverseEntry;
use async_trait::async_trait;

/// Source of the investable listing: code, display name, and AUM per fund.
///
/// A failure here is fatal to a run, unlike per-instrument price failures.
#[async_trait]
pub trait UniversePort: Send + Sync {
    async fn fetch_entries(&self) -> Result<Vec<UniverseEntry>, EtfRankError>;
}
