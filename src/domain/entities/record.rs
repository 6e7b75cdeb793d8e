//! Record entity: one short code and the destination it resolves to.

use chrono::{DateTime, Utc};

/// A live short-code record.
///
/// Records are only produced by a [`crate::domain::repositories::RecordRepository`]
/// as the post-image of one of its atomic operations; fields are read through
/// accessors so nothing outside the crate can fabricate or mutate one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    code: String,
    destination: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    access_count: i64,
}

impl Record {
    pub(crate) fn new(
        code: String,
        destination: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        access_count: i64,
    ) -> Self {
        Self {
            code,
            destination,
            created_at,
            updated_at,
            access_count,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Number of successful resolutions since creation.
    pub fn access_count(&self) -> i64 {
        self.access_count
    }

    /// Counts one resolution.
    pub(crate) fn record_access(&mut self) {
        self.access_count += 1;
    }

    /// Points the record at a new destination.
    ///
    /// `updated_at` never moves behind `created_at`, even if the wall clock did.
    pub(crate) fn retarget(&mut self, destination: String, now: DateTime<Utc>) {
        self.destination = destination;
        self.updated_at = now.max(self.created_at);
    }
}

/// Input for inserting a freshly allocated code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    pub code: String,
    pub destination: String,
    pub created_at: DateTime<Utc>,
}

impl NewRecord {
    /// The record this insert produces: zero accesses, both timestamps equal.
    pub(crate) fn into_record(self) -> Record {
        Record::new(
            self.code,
            self.destination,
            self.created_at,
            self.created_at,
            0,
        )
    }
}
