pub mod gnss_data;

use async_trait::async_trait;
use thiserror::Error;

pub use gnss_data::SqliteNmeaRepository;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("can't open database {url}: {reason}")]
    OpenFailed { url: String, reason: String },
    #[error("failed to store GNSS data: {0}")]
    WriteFailed(#[source] sqlx::Error),
}

/// Append-only sink for accepted sentences.
///
/// Text is stored verbatim; duplicates are allowed.
#[async_trait]
pub trait NmeaRepository: Send + Sync {
    /// Appends `raw` and returns the id the store assigned to it.
    async fn insert(&self, raw: &str) -> Result<i64, StoreError>;
}
