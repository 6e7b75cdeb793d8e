//! Helper functions shared across layers.
//!
//! - [`code_generator`] - Random candidate code generation
//! - [`destination`] - Destination validation

pub mod code_generator;
pub mod destination;
