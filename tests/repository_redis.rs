//! Requires a running Redis reachable through `REDIS_URL`
//! (default `redis://127.0.0.1:6379/0`).
//! Run with `cargo test --test repository_redis -- --ignored`.

use chrono::{Duration, Utc};
use std::sync::Arc;
use url_registry::domain::entities::NewRecord;
use url_registry::domain::repositories::RecordRepository;
use url_registry::infrastructure::persistence::RedisRecordRepository;

async fn repository(namespace: &str) -> RedisRecordRepository {
    let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379/0".into());
    let prefix = format!(
        "registry-test:{}:{}:",
        namespace,
        Utc::now().timestamp_nanos_opt().unwrap()
    );

    RedisRecordRepository::connect(&url, std::time::Duration::from_secs(5))
        .await
        .unwrap()
        .with_key_prefix(prefix)
}

fn new_record(code: &str, destination: &str) -> NewRecord {
    NewRecord {
        code: code.to_string(),
        destination: destination.to_string(),
        created_at: Utc::now(),
    }
}

#[tokio::test]
#[ignore = "requires Redis"]
async fn test_insert_and_find() {
    let repo = repository("insert").await;

    let created = repo
        .insert_if_absent(new_record("abc123", "https://example.com"))
        .await
        .unwrap()
        .unwrap();
    let found = repo.find_by_code("abc123").await.unwrap().unwrap();

    assert_eq!(created, found);
    assert_eq!(found.access_count(), 0);

    let collision = repo
        .insert_if_absent(new_record("abc123", "https://other.com"))
        .await
        .unwrap();
    assert!(collision.is_none());

    repo.delete("abc123").await.unwrap();
}

#[tokio::test]
#[ignore = "requires Redis"]
async fn test_increment_update_delete() {
    let repo = repository("lifecycle").await;
    let created = repo
        .insert_if_absent(new_record("abc123", "https://example.com"))
        .await
        .unwrap()
        .unwrap();

    let accessed = repo.increment_access("abc123").await.unwrap().unwrap();
    assert_eq!(accessed.access_count(), 1);

    let earlier = created.created_at() - Duration::hours(1);
    let updated = repo
        .update_destination("abc123", "https://other.com", earlier)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.destination(), "https://other.com");
    assert_eq!(updated.access_count(), 1);
    assert_eq!(updated.updated_at(), created.created_at());

    assert!(repo.delete("abc123").await.unwrap());
    assert!(!repo.delete("abc123").await.unwrap());
    assert!(repo.increment_access("abc123").await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires Redis"]
async fn test_concurrent_increments() {
    let repo = Arc::new(repository("concurrent").await);
    repo.insert_if_absent(new_record("hot", "https://example.com"))
        .await
        .unwrap();

    let tasks: Vec<_> = (0..10)
        .map(|_| {
            let repo = repo.clone();
            tokio::spawn(async move {
                for _ in 0..10 {
                    repo.increment_access("hot").await.unwrap();
                }
            })
        })
        .collect();

    for task in tasks {
        task.await.unwrap();
    }

    let record = repo.find_by_code("hot").await.unwrap().unwrap();
    assert_eq!(record.access_count(), 100);

    repo.delete("hot").await.unwrap();
}
