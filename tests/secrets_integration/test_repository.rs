//! Repository behavior over the in-memory store

use wfsecrets::secrets::{Scope, SecretString};

use crate::common::{memory_repository, Call};

#[tokio::test]
async fn saved_secret_is_listed_and_readable_in_its_scope() {
    let (_api, repo) = memory_repository();

    repo.save("db-pass", &SecretString::new("s3cr3t"), &Scope::Global).await.unwrap();

    assert_eq!(repo.list(&Scope::Global).await.unwrap(), vec!["db-pass"]);
    let record = repo.get(Some("db-pass"), &Scope::Global).await.unwrap().unwrap();
    assert_eq!(record.name, "db-pass");
    assert_eq!(record.scope, Scope::Global);
}

#[tokio::test]
async fn global_secret_is_not_visible_in_workflow_scope() {
    let (_api, repo) = memory_repository();

    repo.save("db-pass", &SecretString::new("s3cr3t"), &Scope::Global).await.unwrap();

    assert!(repo.list(&Scope::workflow("billing")).await.unwrap().is_empty());
    assert!(repo.get(Some("db-pass"), &Scope::workflow("billing")).await.unwrap().is_none());
}

#[tokio::test]
async fn deleting_workflow_secret_keeps_global_namesake() {
    let (api, repo) = memory_repository();
    api.insert(Scope::Global, "api-key", "global-key");
    api.insert(Scope::workflow("billing"), "api-key", "billing-key");

    repo.delete("api-key", &Scope::workflow("billing")).await.unwrap();

    assert_eq!(repo.list(&Scope::Global).await.unwrap(), vec!["api-key"]);
    assert!(repo.list(&Scope::workflow("billing")).await.unwrap().is_empty());
    assert_eq!(api.value(&Scope::Global, "api-key").as_deref(), Some("global-key"));
}

#[tokio::test]
async fn repeated_reads_are_served_from_cache_until_a_write() {
    let (api, repo) = memory_repository();
    api.insert(Scope::workflow("billing"), "api-key", "k");

    repo.list(&Scope::workflow("billing")).await.unwrap();
    repo.list(&Scope::workflow("billing")).await.unwrap();
    repo.get(Some("api-key"), &Scope::workflow("billing")).await.unwrap();
    repo.get(Some("api-key"), &Scope::workflow("billing")).await.unwrap();
    assert_eq!(api.call_count(), 2);

    repo.save("other", &SecretString::new("v"), &Scope::workflow("billing")).await.unwrap();
    let names = repo.list(&Scope::workflow("billing")).await.unwrap();
    assert_eq!(names, vec!["api-key", "other"]);
    assert_eq!(api.calls().last(), Some(&Call::List(Scope::workflow("billing"))));
}

#[tokio::test]
async fn write_in_one_scope_keeps_other_scopes_cached() {
    let (api, repo) = memory_repository();

    repo.list(&Scope::Global).await.unwrap();
    repo.save("api-key", &SecretString::new("v"), &Scope::workflow("billing")).await.unwrap();
    let before = api.call_count();

    repo.list(&Scope::Global).await.unwrap();
    assert_eq!(api.call_count(), before);
}

#[tokio::test]
async fn saving_twice_leaves_one_entry() {
    let (api, repo) = memory_repository();

    repo.save("db-pass", &SecretString::new("a"), &Scope::Global).await.unwrap();
    repo.save("db-pass", &SecretString::new("b"), &Scope::Global).await.unwrap();

    assert_eq!(repo.list(&Scope::Global).await.unwrap(), vec!["db-pass"]);
    assert_eq!(api.value(&Scope::Global, "db-pass").as_deref(), Some("b"));
}

#[tokio::test]
async fn missing_name_resolves_without_request() {
    let (api, repo) = memory_repository();

    assert!(repo.get(None, &Scope::Global).await.unwrap().is_none());
    assert!(repo.get(Some(""), &Scope::workflow("billing")).await.unwrap().is_none());
    assert_eq!(api.call_count(), 0);
}

#[tokio::test]
async fn exists_always_asks_the_store() {
    let (api, repo) = memory_repository();
    api.insert(Scope::Global, "db-pass", "v");

    assert!(repo.exists("db-pass", &Scope::Global).await.unwrap());
    assert!(repo.exists("db-pass", &Scope::Global).await.unwrap());
    assert!(!repo.exists("db-pass", &Scope::workflow("billing")).await.unwrap());
    assert_eq!(api.call_count(), 3);
}

#[tokio::test]
async fn failures_are_reported_and_cleared() {
    let (api, repo) = memory_repository();
    api.fail_with(503, Some("store unavailable"));

    let err = repo.list(&Scope::Global).await.unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert!(repo.status().last_error.unwrap().contains("store unavailable"));
    assert!(!repo.is_pending());

    api.recover();
    repo.list(&Scope::Global).await.unwrap();
    assert!(repo.status().last_error.is_none());
}

#[tokio::test]
async fn failed_read_is_not_cached() {
    let (api, repo) = memory_repository();
    api.fail_with(500, None);
    assert!(repo.list(&Scope::Global).await.is_err());

    api.recover();
    api.insert(Scope::Global, "db-pass", "v");
    assert_eq!(repo.list(&Scope::Global).await.unwrap(), vec!["db-pass"]);
}
