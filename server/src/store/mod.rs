//! Recipe persistence.
//!
//! Handlers talk to storage only through [`RecipeStore`]. Two backends exist:
//! [`PgRecipeStore`] for Postgres via diesel, and [`MemoryRecipeStore`] for
//! local runs and tests.

mod memory;
mod pg;

pub use memory::MemoryRecipeStore;
pub use pg::PgRecipeStore;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::models::{NewRecipe, Recipe, RecipePatch};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("No recipe with id {0}")]
    NotFound(i32),

    #[error("Database connection failed: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    #[error("Database query failed: {0}")]
    Query(#[from] diesel::result::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// The five persistence operations behind the recipes API.
///
/// `find_by_id`, `update` and `remove` return [`StoreError::NotFound`] when
/// the id has no row.
pub trait RecipeStore: Send + Sync {
    fn create(&self, input: NewRecipe) -> Result<Recipe, StoreError>;

    /// Every recipe in creation order.
    fn list_all(&self) -> Result<Vec<Recipe>, StoreError>;

    fn find_by_id(&self, id: i32) -> Result<Recipe, StoreError>;

    /// Apply the present fields of `patch` and refresh `updated_at`.
    fn update(&self, id: i32, patch: RecipePatch) -> Result<Recipe, StoreError>;

    /// Delete the row, returning it as it was just before deletion.
    fn remove(&self, id: i32) -> Result<Recipe, StoreError>;

    /// Short backend name for logs.
    fn backend_name(&self) -> &'static str;
}

/// Timestamp for a write that must sort strictly after `previous`.
///
/// Postgres keeps microseconds, so a write landing in the same microsecond as
/// the previous one is bumped forward by one.
pub(crate) fn next_updated_at(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = truncate_to_micros(Utc::now());
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

pub(crate) fn truncate_to_micros(ts: DateTime<Utc>) -> DateTime<Utc> {
    let nanos = ts.timestamp_subsec_nanos();
    ts - Duration::nanoseconds(i64::from(nanos % 1_000))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_updated_at_is_strictly_later() {
        let future = Utc::now() + Duration::hours(1);
        assert!(next_updated_at(future) > future);

        let past = Utc::now() - Duration::hours(1);
        assert!(next_updated_at(past) > past);
    }

    #[test]
    fn test_truncate_to_micros_drops_nanoseconds() {
        let ts = truncate_to_micros(Utc::now());
        assert_eq!(ts.timestamp_subsec_nanos() % 1_000, 0);
    }
}
