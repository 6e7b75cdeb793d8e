//! PostgreSQL implementation of the record repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

use super::deadline::with_deadline;
use crate::domain::entities::{NewRecord, Record};
use crate::domain::repositories::RecordRepository;
use crate::error::AppError;

const BACKEND: &str = "postgres";

#[derive(sqlx::FromRow)]
struct RecordRow {
    code: String,
    destination: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    access_count: i64,
}

impl From<RecordRow> for Record {
    fn from(row: RecordRow) -> Self {
        Record::new(
            row.code,
            row.destination,
            row.created_at,
            row.updated_at,
            row.access_count,
        )
    }
}

/// PostgreSQL repository for short-code records.
///
/// `code` is the table's primary key. Each operation is one SQL statement, so
/// row-level locking gives per-code serialization and a cancelled request
/// never leaves a half-written row. Every statement runs under a deadline.
pub struct PgRecordRepository {
    pool: Arc<PgPool>,
    timeout: Duration,
}

impl PgRecordRepository {
    /// Creates a new repository with a database connection pool and per-call deadline.
    pub fn new(pool: Arc<PgPool>, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl RecordRepository for PgRecordRepository {
    async fn insert_if_absent(&self, new_record: NewRecord) -> Result<Option<Record>, AppError> {
        with_deadline(BACKEND, "insert_if_absent", self.timeout, async {
            let row = sqlx::query_as::<_, RecordRow>(
                r#"
                INSERT INTO records (code, destination, created_at, updated_at, access_count)
                VALUES ($1, $2, $3, $3, 0)
                ON CONFLICT (code) DO NOTHING
                RETURNING code, destination, created_at, updated_at, access_count
                "#,
            )
            .bind(&new_record.code)
            .bind(&new_record.destination)
            .bind(new_record.created_at)
            .fetch_optional(self.pool.as_ref())
            .await?;

            Ok(row.map(Record::from))
        })
        .await
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Record>, AppError> {
        with_deadline(BACKEND, "find_by_code", self.timeout, async {
            let row = sqlx::query_as::<_, RecordRow>(
                r#"
                SELECT code, destination, created_at, updated_at, access_count
                FROM records
                WHERE code = $1
                "#,
            )
            .bind(code)
            .fetch_optional(self.pool.as_ref())
            .await?;

            Ok(row.map(Record::from))
        })
        .await
    }

    async fn increment_access(&self, code: &str) -> Result<Option<Record>, AppError> {
        with_deadline(BACKEND, "increment_access", self.timeout, async {
            let row = sqlx::query_as::<_, RecordRow>(
                r#"
                UPDATE records
                SET access_count = access_count + 1
                WHERE code = $1
                RETURNING code, destination, created_at, updated_at, access_count
                "#,
            )
            .bind(code)
            .fetch_optional(self.pool.as_ref())
            .await?;

            Ok(row.map(Record::from))
        })
        .await
    }

    async fn update_destination(
        &self,
        code: &str,
        destination: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Record>, AppError> {
        with_deadline(BACKEND, "update_destination", self.timeout, async {
            let row = sqlx::query_as::<_, RecordRow>(
                r#"
                UPDATE records
                SET destination = $2,
                    updated_at = GREATEST($3, created_at)
                WHERE code = $1
                RETURNING code, destination, created_at, updated_at, access_count
                "#,
            )
            .bind(code)
            .bind(destination)
            .bind(updated_at)
            .fetch_optional(self.pool.as_ref())
            .await?;

            Ok(row.map(Record::from))
        })
        .await
    }

    async fn delete(&self, code: &str) -> Result<bool, AppError> {
        with_deadline(BACKEND, "delete", self.timeout, async {
            let result = sqlx::query("DELETE FROM records WHERE code = $1")
                .bind(code)
                .execute(self.pool.as_ref())
                .await?;

            Ok(result.rows_affected() > 0)
        })
        .await
    }

    fn backend(&self) -> &'static str {
        BACKEND
    }

    async fn health_check(&self) -> bool {
        let probe = with_deadline(BACKEND, "health_check", self.timeout, async {
            sqlx::query_scalar::<_, i32>("SELECT 1")
                .fetch_one(self.pool.as_ref())
                .await?;
            Ok(())
        })
        .await;

        probe.is_ok()
    }
}
