pub mod postgres;

pub use postgres::{create_pool, PgReferenceStore};

use crate::error::AppResult;
use crate::models::ReferenceRecord;

/// Read-only access to the reference-person database.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ReferenceStore: Send + Sync {
    /// Returns every record with chart data present. The comparison engine
    /// always scans this full set; the narrower prefilter is computed but
    /// not applied.
    async fn fetch_candidates(&self) -> AppResult<Vec<ReferenceRecord>>;
}
