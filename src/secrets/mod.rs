//! Scoped secret management.
//!
//! Secrets live either in the global namespace or in a workflow's namespace;
//! `(scope, name)` is the key. This module holds the data layer and the form
//! state for managing them through the platform's REST API.
//!
//! # Architecture
//!
//! - [`SecretsApi`]: the remote collaborator (HTTP in production)
//! - [`QueryCache`]: process-wide read cache keyed by `(kind, name, scope)`
//! - [`SecretRepository`]: scoped list/get/save/delete over both, with
//!   request status for views
//! - [`SecretFormController`]: the create/edit/delete form state machine
//! - [`SecretListView`]: rows for the list page
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use wfsecrets::client::{ApiClient, ClientConfig};
//! use wfsecrets::secrets::{
//!     HttpSecretsApi, QueryCache, Scope, SecretFormController, SecretRepository,
//! };
//!
//! let api = HttpSecretsApi::new(ApiClient::new(ClientConfig::default())?);
//! let repository = SecretRepository::new(Arc::new(api), QueryCache::default());
//!
//! let mut form = SecretFormController::create(repository.handle(), Scope::Global);
//! form.set_name("db-pass")?;
//! form.set_value("s3cr3t")?;
//! if let Some(next) = form.save().await? {
//!     println!("saved, go to {}", next.path());
//! }
//! ```
//!
//! # Security
//!
//! - Secret values are wrapped in [`SecretString`] and never logged
//! - List results carry names only

pub mod api;
pub mod cache;
pub mod catalog;
pub mod error;
pub mod form;
pub mod list;
pub mod path;
pub mod repository;
pub mod types;

pub use api::{HttpSecretsApi, SecretsApi};
pub use cache::{CacheKey, CachedRead, QueryCache};
pub use catalog::WorkflowCatalog;
pub use error::{Result, SecretsError};
pub use form::{
    DeleteRequest, Draft, FormError, FormStatus, FormView, Navigation, SecretFormController,
    ValidationError, WriteRequest,
};
pub use list::{SecretListView, SecretRow};
pub use repository::{RequestStatus, SecretRepository};
pub use types::{Scope, SecretRecord, SecretString};
