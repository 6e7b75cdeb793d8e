//! Shared state injected into every handler.

use std::sync::Arc;

use crate::application::services::RegistryService;

/// Application state cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<RegistryService>,
}

impl AppState {
    pub fn new(registry: Arc<RegistryService>) -> Self {
        Self { registry }
    }
}
