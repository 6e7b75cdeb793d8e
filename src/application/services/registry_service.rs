//! Short-code registry: code allocation and record lifecycle.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::entities::{NewRecord, Record};
use crate::domain::repositories::RecordRepository;
use crate::error::AppError;
use crate::utils::code_generator::CodeGenerator;
use crate::utils::destination::normalize_destination;

/// Default number of candidate codes tried before giving up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 16;

/// Service owning every record in the registry.
///
/// Allocates collision-free codes and exposes the only ways to create,
/// resolve, retarget and remove records. Atomicity per code is delegated to
/// the repository's primitives; this service never reads and then writes the
/// same record in two steps.
pub struct RegistryService {
    repository: Arc<dyn RecordRepository>,
    generator: CodeGenerator,
    max_attempts: usize,
}

impl RegistryService {
    /// Creates a registry with the default generator (6 alphanumeric symbols).
    pub fn new(repository: Arc<dyn RecordRepository>) -> Self {
        Self {
            repository,
            generator: CodeGenerator::default(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Replaces the code generator.
    pub fn with_generator(mut self, generator: CodeGenerator) -> Self {
        self.generator = generator;
        self
    }

    /// Sets how many candidate codes `create` tries before failing.
    ///
    /// Values below 1 are raised to 1.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Name of the storage backend in use.
    pub fn backend(&self) -> &'static str {
        self.repository.backend()
    }

    /// Creates a record for `destination` under a freshly allocated code.
    ///
    /// Candidate codes are generated and offered to the repository's atomic
    /// insert until one is free. A collision is not an error; it only costs
    /// another attempt.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the destination is malformed.
    /// Returns [`AppError::Storage`] if the backend fails, or if every one of
    /// the configured attempts collided.
    pub async fn create(&self, destination: &str) -> Result<Record, AppError> {
        let destination = normalize_destination(destination).map_err(|e| {
            AppError::bad_request("Invalid destination", json!({ "reason": e.to_string() }))
        })?;

        for attempt in 1..=self.max_attempts {
            let candidate = NewRecord {
                code: self.generator.generate(),
                destination: destination.clone(),
                created_at: Utc::now(),
            };
            let code = candidate.code.clone();

            if let Some(record) = self.repository.insert_if_absent(candidate).await? {
                metrics::counter!("registry_records_created_total").increment(1);
                info!(code = %record.code(), destination = %record.destination(), attempt, "Record created");
                return Ok(record);
            }

            metrics::counter!("registry_code_collisions_total").increment(1);
            debug!(%code, attempt, "Code collision, retrying");
        }

        warn!(
            attempts = self.max_attempts,
            keyspace = %self.generator.keyspace(),
            "Unable to allocate a unique code"
        );

        Err(AppError::storage(
            "Unable to allocate a unique code",
            json!({ "reason": "Too many collisions", "attempts": self.max_attempts }),
        ))
    }

    /// Returns the record for `code` without touching it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no live record has this code.
    /// Returns [`AppError::Storage`] on backend errors.
    pub async fn get(&self, code: &str) -> Result<Record, AppError> {
        self.repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::record_not_found(code))
    }

    /// Resolves `code` for a redirect, counting exactly one access.
    ///
    /// Returns the post-increment record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no live record has this code.
    /// Returns [`AppError::Storage`] on backend errors.
    pub async fn get_and_increment(&self, code: &str) -> Result<Record, AppError> {
        let record = self
            .repository
            .increment_access(code)
            .await?
            .ok_or_else(|| AppError::record_not_found(code))?;

        metrics::counter!("registry_redirects_total").increment(1);
        debug!(code, access_count = record.access_count(), "Access counted");

        Ok(record)
    }

    /// Points `code` at a new destination.
    ///
    /// `code`, `created_at` and `access_count` are left untouched; `updated_at`
    /// is refreshed. Returns the post-update record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the destination is malformed.
    /// Returns [`AppError::NotFound`] if no live record has this code.
    /// Returns [`AppError::Storage`] on backend errors.
    pub async fn update(&self, code: &str, destination: &str) -> Result<Record, AppError> {
        let destination = normalize_destination(destination).map_err(|e| {
            AppError::bad_request("Invalid destination", json!({ "reason": e.to_string() }))
        })?;

        let record = self
            .repository
            .update_destination(code, &destination, Utc::now())
            .await?
            .ok_or_else(|| AppError::record_not_found(code))?;

        info!(code, destination = %record.destination(), "Record updated");

        Ok(record)
    }

    /// Removes the record for `code`.
    ///
    /// Deleting a code with no live record is a no-op, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on backend errors.
    pub async fn delete(&self, code: &str) -> Result<(), AppError> {
        if self.repository.delete(code).await? {
            info!(code, "Record deleted");
        } else {
            debug!(code, "Delete of absent code ignored");
        }

        Ok(())
    }

    /// Checks whether the storage backend is reachable.
    pub async fn health_check(&self) -> bool {
        self.repository.health_check().await
    }
}
