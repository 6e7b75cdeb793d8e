//! Domain layer: entities and storage contracts.
//!
//! The domain layer has no dependencies on infrastructure or presentation.
//!
//! - [`entities`] - Record data model
//! - [`repositories`] - Storage trait implemented by every backend

pub mod entities;
pub mod repositories;
