#![allow(dead_code)]

use axum_test::TestServer;
use std::sync::Arc;
use url_registry::application::services::RegistryService;
use url_registry::domain::repositories::RecordRepository;
use url_registry::infrastructure::persistence::InMemoryRecordRepository;
use url_registry::routes::router;
use url_registry::state::AppState;
use url_registry::utils::code_generator::CodeGenerator;

pub fn memory_repository() -> Arc<InMemoryRecordRepository> {
    Arc::new(InMemoryRecordRepository::new())
}

pub fn memory_registry() -> RegistryService {
    RegistryService::new(memory_repository())
}

/// Registry whose generator can only ever produce one code.
pub fn single_code_registry() -> RegistryService {
    RegistryService::new(memory_repository())
        .with_generator(CodeGenerator::new("a", 1).unwrap())
        .with_max_attempts(4)
}

pub fn create_test_state(repository: Arc<dyn RecordRepository>) -> AppState {
    AppState::new(Arc::new(RegistryService::new(repository)))
}

pub fn create_test_server(state: AppState) -> TestServer {
    TestServer::new(router(state)).unwrap()
}

pub fn memory_server() -> TestServer {
    create_test_server(create_test_state(memory_repository()))
}

/// Creates a record through the API and returns its code.
pub async fn create_record(server: &TestServer, url: &str) -> String {
    let response = server
        .post("/shorten")
        .json(&serde_json::json!({ "url": url }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);

    response.json::<serde_json::Value>()["short_code"]
        .as_str()
        .unwrap()
        .to_string()
}
