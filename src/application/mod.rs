//! Application layer services implementing business logic.
//!
//! Services consume repository traits and provide a clean API for HTTP
//! handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::registry_service::RegistryService`] - Code allocation and record lifecycle

pub mod services;
