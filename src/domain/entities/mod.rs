//! Core domain entities.
//!
//! - [`Record`] - a live code → destination mapping with its access counter
//! - [`NewRecord`] - input for inserting a freshly allocated code

pub mod record;

pub use record::{NewRecord, Record};
