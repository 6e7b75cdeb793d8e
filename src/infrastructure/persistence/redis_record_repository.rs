//! Redis implementation of the record repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::{AsyncCommands, Client, Script, aio::ConnectionManager};
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info};

use super::deadline::with_deadline;
use crate::config::mask_connection_string;
use crate::domain::entities::{NewRecord, Record};
use crate::domain::repositories::RecordRepository;
use crate::error::AppError;

const BACKEND: &str = "redis";

const INSERT_IF_ABSENT: &str = r#"
if redis.call('EXISTS', KEYS[1]) == 1 then
    return nil
end
redis.call('HSET', KEYS[1],
    'code', ARGV[1],
    'destination', ARGV[2],
    'created_at', ARGV[3],
    'updated_at', ARGV[3],
    'access_count', 0)
return redis.call('HGETALL', KEYS[1])
"#;

const INCREMENT_ACCESS: &str = r#"
if redis.call('EXISTS', KEYS[1]) == 0 then
    return nil
end
redis.call('HINCRBY', KEYS[1], 'access_count', 1)
return redis.call('HGETALL', KEYS[1])
"#;

const UPDATE_DESTINATION: &str = r#"
if redis.call('EXISTS', KEYS[1]) == 0 then
    return nil
end
local created = redis.call('HGET', KEYS[1], 'created_at')
local updated = ARGV[2]
if tonumber(updated) < tonumber(created) then
    updated = created
end
redis.call('HSET', KEYS[1], 'destination', ARGV[1], 'updated_at', updated)
return redis.call('HGETALL', KEYS[1])
"#;

/// Redis repository storing one hash per code.
///
/// Timestamps are stored as microseconds since the Unix epoch. Create,
/// increment and update run as Lua scripts, which Redis executes atomically,
/// so the existence check and the write can never interleave with another
/// client. Every call runs under a deadline.
pub struct RedisRecordRepository {
    conn: ConnectionManager,
    key_prefix: String,
    timeout: Duration,
    insert_script: Script,
    increment_script: Script,
    update_script: Script,
}

impl RedisRecordRepository {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] if the URL is invalid, the connection
    /// cannot be established, or the PING fails within `timeout`.
    pub async fn connect(redis_url: &str, timeout: Duration) -> Result<Self, AppError> {
        info!("Connecting to Redis at {}", mask_connection_string(redis_url));

        let client = Client::open(redis_url)?;
        let conn = with_deadline(BACKEND, "connect", timeout, async {
            let manager = ConnectionManager::new(client).await?;
            let mut probe = manager.clone();
            probe.ping::<()>().await?;
            Ok(manager)
        })
        .await?;

        info!("✓ Connected to Redis");

        Ok(Self::new(conn, timeout))
    }

    /// Wraps an existing connection manager.
    pub fn new(conn: ConnectionManager, timeout: Duration) -> Self {
        Self {
            conn,
            key_prefix: "registry:record:".to_string(),
            timeout,
            insert_script: Script::new(INSERT_IF_ABSENT),
            increment_script: Script::new(INCREMENT_ACCESS),
            update_script: Script::new(UPDATE_DESTINATION),
        }
    }

    /// Uses a custom key namespace, e.g. to isolate test runs.
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Constructs the full Redis key with namespace prefix.
    fn build_key(&self, code: &str) -> String {
        format!("{}{}", self.key_prefix, code)
    }
}

/// Rebuilds a record from a `HGETALL` reply.
fn record_from_hash(code: &str, mut fields: HashMap<String, String>) -> Result<Record, AppError> {
    let invalid = |field: &str| {
        AppError::storage(
            "Stored record is invalid",
            json!({ "backend": BACKEND, "kind": "invalid_data", "code": code, "field": field }),
        )
    };

    let timestamp = |fields: &HashMap<String, String>, field: &str| {
        fields
            .get(field)
            .and_then(|v| v.parse::<i64>().ok())
            .and_then(DateTime::<Utc>::from_timestamp_micros)
            .ok_or_else(|| invalid(field))
    };

    let created_at = timestamp(&fields, "created_at")?;
    let updated_at = timestamp(&fields, "updated_at")?;
    let access_count = fields
        .get("access_count")
        .and_then(|v| v.parse::<i64>().ok())
        .ok_or_else(|| invalid("access_count"))?;
    let destination = fields
        .remove("destination")
        .ok_or_else(|| invalid("destination"))?;

    Ok(Record::new(
        code.to_string(),
        destination,
        created_at,
        updated_at,
        access_count,
    ))
}

/// Reduces a timestamp to the microsecond precision stored in Redis.
fn to_micros(at: DateTime<Utc>) -> i64 {
    at.timestamp_micros()
}

#[async_trait]
impl RecordRepository for RedisRecordRepository {
    async fn insert_if_absent(&self, new_record: NewRecord) -> Result<Option<Record>, AppError> {
        let key = self.build_key(&new_record.code);
        let mut conn = self.conn.clone();

        let reply: Option<HashMap<String, String>> =
            with_deadline(BACKEND, "insert_if_absent", self.timeout, async {
                Ok(self
                    .insert_script
                    .key(&key)
                    .arg(&new_record.code)
                    .arg(&new_record.destination)
                    .arg(to_micros(new_record.created_at))
                    .invoke_async(&mut conn)
                    .await?)
            })
            .await?;

        if reply.is_none() {
            debug!(code = %new_record.code, "Code already live");
        }

        reply
            .map(|fields| record_from_hash(&new_record.code, fields))
            .transpose()
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Record>, AppError> {
        let key = self.build_key(code);
        let mut conn = self.conn.clone();

        let fields: HashMap<String, String> =
            with_deadline(BACKEND, "find_by_code", self.timeout, async {
                Ok(conn.hgetall(&key).await?)
            })
            .await?;

        if fields.is_empty() {
            return Ok(None);
        }

        record_from_hash(code, fields).map(Some)
    }

    async fn increment_access(&self, code: &str) -> Result<Option<Record>, AppError> {
        let key = self.build_key(code);
        let mut conn = self.conn.clone();

        let reply: Option<HashMap<String, String>> =
            with_deadline(BACKEND, "increment_access", self.timeout, async {
                Ok(self
                    .increment_script
                    .key(&key)
                    .invoke_async(&mut conn)
                    .await?)
            })
            .await?;

        reply.map(|fields| record_from_hash(code, fields)).transpose()
    }

    async fn update_destination(
        &self,
        code: &str,
        destination: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Record>, AppError> {
        let key = self.build_key(code);
        let mut conn = self.conn.clone();

        let reply: Option<HashMap<String, String>> =
            with_deadline(BACKEND, "update_destination", self.timeout, async {
                Ok(self
                    .update_script
                    .key(&key)
                    .arg(destination)
                    .arg(to_micros(updated_at))
                    .invoke_async(&mut conn)
                    .await?)
            })
            .await?;

        reply.map(|fields| record_from_hash(code, fields)).transpose()
    }

    async fn delete(&self, code: &str) -> Result<bool, AppError> {
        let key = self.build_key(code);
        let mut conn = self.conn.clone();

        let removed: i64 = with_deadline(BACKEND, "delete", self.timeout, async {
            Ok(conn.del(&key).await?)
        })
        .await?;

        Ok(removed > 0)
    }

    fn backend(&self) -> &'static str {
        BACKEND
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.conn.clone();
        with_deadline(BACKEND, "health_check", self.timeout, async {
            Ok(conn.ping::<()>().await?)
        })
        .await
        .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_record_from_hash() {
        let fields = hash(&[
            ("code", "abc123"),
            ("destination", "https://example.com"),
            ("created_at", "1700000000000000"),
            ("updated_at", "1700000005000000"),
            ("access_count", "7"),
        ]);

        let record = record_from_hash("abc123", fields).unwrap();

        assert_eq!(record.code(), "abc123");
        assert_eq!(record.destination(), "https://example.com");
        assert_eq!(record.created_at().timestamp(), 1_700_000_000);
        assert_eq!(record.updated_at().timestamp(), 1_700_000_005);
        assert_eq!(record.access_count(), 7);
    }

    #[test]
    fn test_record_from_hash_rejects_corrupt_counter() {
        let fields = hash(&[
            ("destination", "https://example.com"),
            ("created_at", "1700000000000000"),
            ("updated_at", "1700000000000000"),
            ("access_count", "many"),
        ]);

        match record_from_hash("abc123", fields) {
            Err(AppError::Storage { details, .. }) => {
                assert_eq!(details["field"], "access_count");
            }
            other => panic!("expected storage error, got {other:?}"),
        }
    }

    #[test]
    fn test_record_from_hash_rejects_missing_destination() {
        let fields = hash(&[
            ("created_at", "1700000000000000"),
            ("updated_at", "1700000000000000"),
            ("access_count", "0"),
        ]);

        assert!(record_from_hash("abc123", fields).is_err());
    }

    #[test]
    fn test_to_micros_truncates_nanoseconds() {
        let at = DateTime::<Utc>::from_timestamp(1_700_000_000, 123_456_789).unwrap();
        assert_eq!(to_micros(at), 1_700_000_000_123_456);
    }
}
