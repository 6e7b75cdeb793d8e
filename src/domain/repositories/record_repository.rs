//! Repository trait for short-code records.

use crate::domain::entities::{NewRecord, Record};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Storage contract for the code → record mapping.
///
/// Every mutating method is a single atomic step on one code and returns the
/// post-image, so callers never read-then-write across two calls. Operations
/// on different codes carry no ordering guarantee between each other.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::InMemoryRecordRepository`] - sharded in-process map
/// - [`crate::infrastructure::persistence::PgRecordRepository`] - PostgreSQL
/// - [`crate::infrastructure::persistence::RedisRecordRepository`] - Redis hashes + Lua
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// Inserts the record unless its code is already live.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Record))` with the stored record if the code was free
    /// - `Ok(None)` if another live record already holds the code (collision)
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] if the backend fails or times out.
    async fn insert_if_absent(&self, new_record: NewRecord) -> Result<Option<Record>, AppError>;

    /// Finds the live record for `code`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on backend errors.
    async fn find_by_code(&self, code: &str) -> Result<Option<Record>, AppError>;

    /// Adds one to `access_count` and returns the post-increment record.
    ///
    /// Returns `Ok(None)` if the code has no live record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on backend errors.
    async fn increment_access(&self, code: &str) -> Result<Option<Record>, AppError>;

    /// Replaces the destination and refreshes `updated_at` to
    /// `max(updated_at, created_at)`, returning the post-update record.
    ///
    /// Returns `Ok(None)` if the code has no live record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on backend errors.
    async fn update_destination(
        &self,
        code: &str,
        destination: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Record>, AppError>;

    /// Removes the record for `code`.
    ///
    /// Returns `Ok(true)` if a record was removed, `Ok(false)` if none existed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on backend errors.
    async fn delete(&self, code: &str) -> Result<bool, AppError>;

    /// Short name of the backend, used in logs and health output.
    fn backend(&self) -> &'static str;

    /// Checks whether the backend is reachable.
    async fn health_check(&self) -> bool;
}
