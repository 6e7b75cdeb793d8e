//! In-process record repository backed by `DashMap`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::trace;

use crate::domain::entities::{NewRecord, Record};
use crate::domain::repositories::RecordRepository;
use crate::error::AppError;

/// In-memory implementation of [`RecordRepository`].
///
/// `DashMap` shards its lock, and each operation here holds the shard guard
/// for the whole read-modify-write of a single key. That gives per-code
/// exclusivity while codes in other shards proceed in parallel. Guards are
/// never held across an `.await`.
#[derive(Debug, Default)]
pub struct InMemoryRecordRepository {
    records: DashMap<String, Record>,
}

impl InMemoryRecordRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }

    /// Creates an empty repository with room for `capacity` records.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: DashMap::with_capacity(capacity),
        }
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no record is live.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl RecordRepository for InMemoryRecordRepository {
    async fn insert_if_absent(&self, new_record: NewRecord) -> Result<Option<Record>, AppError> {
        match self.records.entry(new_record.code.clone()) {
            Entry::Occupied(_) => {
                trace!(code = %new_record.code, "Code already live");
                Ok(None)
            }
            Entry::Vacant(slot) => {
                let record = new_record.into_record();
                slot.insert(record.clone());
                Ok(Some(record))
            }
        }
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Record>, AppError> {
        Ok(self.records.get(code).map(|r| r.value().clone()))
    }

    async fn increment_access(&self, code: &str) -> Result<Option<Record>, AppError> {
        Ok(self.records.get_mut(code).map(|mut r| {
            r.record_access();
            r.value().clone()
        }))
    }

    async fn update_destination(
        &self,
        code: &str,
        destination: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Record>, AppError> {
        Ok(self.records.get_mut(code).map(|mut r| {
            r.retarget(destination.to_string(), updated_at);
            r.value().clone()
        }))
    }

    async fn delete(&self, code: &str) -> Result<bool, AppError> {
        Ok(self.records.remove(code).is_some())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn health_check(&self) -> bool {
        true
    }
}
