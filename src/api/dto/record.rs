//! DTOs for the record endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::Record;

/// Body of `POST /shorten` and `PUT /shorten/{code}`.
///
/// Scheme and host checks happen in the registry; only the size is checked here.
#[derive(Debug, Deserialize, Validate)]
pub struct RecordRequest {
    #[validate(length(min = 1, max = 2048, message = "URL must be 1-2048 characters"))]
    pub url: String,
}

/// Public view of a record. The access counter is omitted.
#[derive(Debug, Serialize)]
pub struct RecordResponse {
    pub id: String,
    pub url: String,
    pub short_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full view of a record, including the access counter.
#[derive(Debug, Serialize)]
pub struct RecordStatsResponse {
    #[serde(flatten)]
    pub record: RecordResponse,
    pub access_count: i64,
}

impl From<&Record> for RecordResponse {
    fn from(record: &Record) -> Self {
        Self {
            id: record.code().to_string(),
            url: record.destination().to_string(),
            short_code: record.code().to_string(),
            created_at: record.created_at(),
            updated_at: record.updated_at(),
        }
    }
}

impl From<&Record> for RecordStatsResponse {
    fn from(record: &Record) -> Self {
        Self {
            record: RecordResponse::from(record),
            access_count: record.access_count(),
        }
    }
}
