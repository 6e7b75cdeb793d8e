//! Record repository implementations.
//!
//! Concrete implementations of [`crate::domain::repositories::RecordRepository`].
//!
//! # Repositories
//!
//! - [`InMemoryRecordRepository`] - Sharded in-process map, per-key locking
//! - [`PgRecordRepository`] - PostgreSQL, one statement per operation
//! - [`RedisRecordRepository`] - Redis hashes, Lua scripts for read-modify-write
//!
//! Remote backends bound every call with [`deadline::with_deadline`].

pub mod deadline;
pub mod memory_record_repository;
pub mod pg_record_repository;
pub mod redis_record_repository;

pub use memory_record_repository::InMemoryRecordRepository;
pub use pg_record_repository::PgRecordRepository;
pub use redis_record_repository::RedisRecordRepository;
