//! Repository trait definitions for the domain layer.
//!
//! Traits define the storage contract; implementations live in
//! `crate::infrastructure::persistence`. Mocks are generated with `mockall`
//! for unit tests.
//!
//! # Available Repositories
//!
//! - [`RecordRepository`] - Atomic record storage keyed by short code

pub mod record_repository;

pub use record_repository::RecordRepository;

#[cfg(test)]
pub use record_repository::MockRecordRepository;
