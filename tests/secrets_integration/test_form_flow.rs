//! End-to-end form flows against the in-memory store

use wfsecrets::secrets::{
    FormError, FormStatus, Navigation, Scope, SecretFormController, ValidationError,
};

use crate::common::{memory_repository, Call};

#[tokio::test]
async fn create_global_secret_and_return_to_list() {
    let (api, repo) = memory_repository();
    let mut form = SecretFormController::create(repo.handle(), Scope::Global);

    form.set_name("db-pass").unwrap();
    form.set_value("s3cr3t").unwrap();
    let next = form.save().await.unwrap();

    assert_eq!(next, Some(Navigation::SecretList));
    assert_eq!(next.unwrap().path(), "/secretDefs");
    assert_eq!(form.status(), FormStatus::Done);
    assert_eq!(api.value(&Scope::Global, "db-pass").as_deref(), Some("s3cr3t"));
    assert_eq!(repo.list(&Scope::Global).await.unwrap(), vec!["db-pass"]);
}

#[tokio::test]
async fn scope_chosen_on_create_is_where_the_secret_lands() {
    let (api, repo) = memory_repository();
    let mut form = SecretFormController::create(repo.handle(), Scope::Global);

    form.set_scope(Scope::workflow("billing")).unwrap();
    form.set_name("api-key").unwrap();
    form.set_value("k-123").unwrap();
    form.save().await.unwrap();

    assert_eq!(api.value(&Scope::workflow("billing"), "api-key").as_deref(), Some("k-123"));
    assert!(api.value(&Scope::Global, "api-key").is_none());
}

#[tokio::test]
async fn whitespace_is_trimmed_before_the_request() {
    let (api, repo) = memory_repository();
    let mut form = SecretFormController::create(repo.handle(), Scope::Global);

    form.set_name("  db-pass ").unwrap();
    form.set_value(" s3cr3t\n").unwrap();
    form.save().await.unwrap();

    assert_eq!(api.calls(), vec![Call::Put("db-pass".to_string(), Scope::Global)]);
    assert_eq!(api.value(&Scope::Global, "db-pass").as_deref(), Some("s3cr3t"));
}

#[tokio::test]
async fn invalid_draft_never_reaches_the_store() {
    let (api, repo) = memory_repository();
    let mut form = SecretFormController::create(repo.handle(), Scope::Global);

    form.set_name("   ").unwrap();
    form.set_value("s3cr3t").unwrap();
    let err = form.save().await.unwrap_err();

    assert_eq!(err, FormError::Validation(ValidationError::NameRequired));
    assert_eq!(form.status(), FormStatus::Editing);
    assert_eq!(form.error_message(), Some("Name is required"));
    assert_eq!(form.draft().name(), "   ");
    assert_eq!(api.call_count(), 0);
}

#[tokio::test]
async fn edit_changes_only_the_value() {
    let (api, repo) = memory_repository();
    api.insert(Scope::workflow("billing"), "api-key", "old");

    let mut form = SecretFormController::edit(repo.handle(), "api-key", Scope::workflow("billing"));
    assert_eq!(form.status(), FormStatus::Loading);
    form.load().await;

    assert_eq!(form.status(), FormStatus::Editing);
    assert_eq!(form.draft().name(), "api-key");
    assert!(form.draft().value().is_empty());
    assert!(!form.can_save());
    assert!(form.set_name("renamed").is_err());
    assert!(form.set_scope(Scope::Global).is_err());

    form.set_value("new").unwrap();
    assert!(form.can_save());
    form.save().await.unwrap();

    assert_eq!(api.value(&Scope::workflow("billing"), "api-key").as_deref(), Some("new"));
    assert!(api.value(&Scope::Global, "renamed").is_none());
}

#[tokio::test]
async fn edit_of_missing_secret_reports_not_found() {
    let (_api, repo) = memory_repository();
    let mut form = SecretFormController::edit(repo.handle(), "ghost", Scope::Global);

    form.load().await;

    assert_eq!(form.status(), FormStatus::Editing);
    assert_eq!(form.error_message(), Some("Secret \"ghost\" not found"));
}

#[tokio::test]
async fn delete_requires_confirmation() {
    let (api, repo) = memory_repository();
    api.insert(Scope::Global, "api-key", "k");
    api.insert(Scope::workflow("billing"), "api-key", "k");

    let mut form = SecretFormController::edit(repo.handle(), "api-key", Scope::workflow("billing"));
    form.load().await;

    assert!(form.delete().await.is_err());
    form.request_delete().unwrap();
    assert_eq!(form.status(), FormStatus::ConfirmingDelete);
    assert!(!api.calls().iter().any(|c| matches!(c, Call::Delete(..))));

    let next = form.delete().await.unwrap();
    assert_eq!(next, Some(Navigation::SecretList));
    assert!(api.value(&Scope::workflow("billing"), "api-key").is_none());
    assert!(api.value(&Scope::Global, "api-key").is_some());
}

#[tokio::test]
async fn cancelled_delete_changes_nothing() {
    let (api, repo) = memory_repository();
    api.insert(Scope::Global, "db-pass", "v");

    let mut form = SecretFormController::edit(repo.handle(), "db-pass", Scope::Global);
    form.load().await;
    form.request_delete().unwrap();
    form.cancel_delete();

    assert_eq!(form.status(), FormStatus::Editing);
    assert!(!form.is_dirty());
    assert_eq!(api.value(&Scope::Global, "db-pass").as_deref(), Some("v"));
}

#[tokio::test]
async fn server_failure_returns_to_editing_with_message() {
    let (api, repo) = memory_repository();
    let mut form = SecretFormController::create(repo.handle(), Scope::Global);
    form.set_name("db-pass").unwrap();
    form.set_value("v").unwrap();

    api.fail_with(400, Some("Secret name is reserved"));
    assert_eq!(form.save().await.unwrap(), None);
    assert_eq!(form.status(), FormStatus::Editing);
    assert_eq!(form.error_message(), Some("Secret name is reserved"));
    assert!(form.is_dirty());

    api.fail_with(500, None);
    assert_eq!(form.save().await.unwrap(), None);
    assert_eq!(form.error_message(), Some("Save failed"));

    api.recover();
    assert_eq!(form.save().await.unwrap(), Some(Navigation::SecretList));
}

#[tokio::test]
async fn failed_delete_uses_fallback_message() {
    let (api, repo) = memory_repository();
    api.insert(Scope::Global, "db-pass", "v");

    let mut form = SecretFormController::edit(repo.handle(), "db-pass", Scope::Global);
    form.load().await;
    form.request_delete().unwrap();

    api.fail_with(502, None);
    assert_eq!(form.delete().await.unwrap(), None);
    assert_eq!(form.status(), FormStatus::Editing);
    assert_eq!(form.error_message(), Some("Delete failed"));
    assert!(api.value(&Scope::Global, "db-pass").is_some());
}

#[tokio::test]
async fn cancel_leaves_store_untouched() {
    let (api, repo) = memory_repository();
    let mut form = SecretFormController::create(repo.handle(), Scope::Global);
    form.set_name("db-pass").unwrap();

    assert_eq!(form.cancel(), Navigation::SecretList);
    assert_eq!(api.call_count(), 0);
}
