//! Create/edit/delete form for a single secret
//!
//! [`SecretFormController`] owns the [`Draft`] for one visit to the form and
//! moves through these states:
//!
//! ```text
//! Loading ──► Editing ──► Validating ──► Saving ──► Done
//!                │  ▲          │            │
//!                │  └──────────┴────────────┘  (validation or request failure)
//!                ▼
//!         ConfirmingDelete ──► Deleting ──► Done
//!                │                 │
//!                └──► Editing ◄────┘          (cancel or request failure)
//! ```
//!
//! Every transition is an explicit method. `request_*`/`confirm_delete` start
//! an operation and hand back the payload, `*_finished` apply its result. The
//! async helpers [`SecretFormController::save`] and
//! [`SecretFormController::delete`] run both halves against the repository.
//! A result that arrives when the form is no longer waiting for it is ignored.

use serde::Serialize;
use std::fmt;
use thiserror::Error;
use tracing::debug;

use super::error::SecretsError;
use super::repository::SecretRepository;
use super::types::{Scope, SecretRecord, SecretString};

const SAVE_FAILED: &str = "Save failed";
const DELETE_FAILED: &str = "Delete failed";
const LOAD_FAILED: &str = "Failed to load secret";

/// Where the form is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FormStatus {
    Loading,
    Editing,
    Validating,
    Saving,
    ConfirmingDelete,
    Deleting,
    Done,
}

impl fmt::Display for FormStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FormStatus::Loading => "loading",
            FormStatus::Editing => "editing",
            FormStatus::Validating => "validating",
            FormStatus::Saving => "saving",
            FormStatus::ConfirmingDelete => "confirming delete",
            FormStatus::Deleting => "deleting",
            FormStatus::Done => "done",
        };
        f.write_str(label)
    }
}

/// Locally detected problems with the draft. Never reaches the network.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Name is required")]
    NameRequired,
    #[error("Value is required")]
    ValueRequired,
}

/// A form action that was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("{field} cannot be changed after the secret is created")]
    ReadOnlyField { field: &'static str },

    #[error("the form does not accept changes while {status}")]
    NotEditable { status: FormStatus },

    #[error("{action} is not available while {status}")]
    ActionUnavailable { action: &'static str, status: FormStatus },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Where to go once the visit ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Back to the secret list
    SecretList,
}

impl Navigation {
    pub fn path(&self) -> &'static str {
        match self {
            Navigation::SecretList => "/secretDefs",
        }
    }
}

/// Unsaved state of the secret being edited
#[derive(Debug, Clone, Default)]
pub struct Draft {
    name: String,
    value: SecretString,
    scope: Scope,
    dirty: bool,
}

impl Draft {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &SecretString {
        &self.value
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Both fields have non-blank content
    pub fn is_complete(&self) -> bool {
        self.validate().is_ok()
    }

    /// Checks the trimmed fields; the draft itself keeps what was typed.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::NameRequired);
        }
        if self.value.expose_secret().trim().is_empty() {
            return Err(ValidationError::ValueRequired);
        }
        Ok(())
    }
}

/// Payload for `SecretRepository::save`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRequest {
    pub name: String,
    pub value: SecretString,
    pub scope: Scope,
}

/// Payload for `SecretRepository::delete`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRequest {
    pub name: String,
    pub scope: Scope,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum FormMode {
    Create,
    Edit { name: String, scope: Scope },
}

/// Snapshot of everything a view needs to render the form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormView {
    pub title: String,
    pub name: String,
    pub scope: Scope,
    pub scope_label: String,
    pub status: FormStatus,
    pub is_new: bool,
    pub is_dirty: bool,
    pub is_busy: bool,
    pub can_save: bool,
    pub can_delete: bool,
    pub name_editable: bool,
    pub scope_editable: bool,
    pub error_message: Option<String>,
}

/// State machine behind the secret form
pub struct SecretFormController {
    repository: SecretRepository,
    mode: FormMode,
    draft: Draft,
    status: FormStatus,
    error_message: Option<String>,
}

impl SecretFormController {
    /// Form for a new secret, pre-set to `scope`. Starts in `Editing`.
    pub fn create(repository: SecretRepository, scope: Scope) -> Self {
        Self {
            repository,
            mode: FormMode::Create,
            draft: Draft { scope, ..Draft::default() },
            status: FormStatus::Editing,
            error_message: None,
        }
    }

    /// Form for an existing secret. Starts in `Loading`; call
    /// [`load`](Self::load) or feed [`load_finished`](Self::load_finished).
    pub fn edit(repository: SecretRepository, name: impl Into<String>, scope: Scope) -> Self {
        let name = name.into();
        Self {
            repository,
            mode: FormMode::Edit { name: name.clone(), scope: scope.clone() },
            draft: Draft { name, scope, ..Draft::default() },
            status: FormStatus::Loading,
            error_message: None,
        }
    }

    pub fn status(&self) -> FormStatus {
        self.status
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn is_dirty(&self) -> bool {
        self.draft.dirty
    }

    pub fn is_new(&self) -> bool {
        matches!(self.mode, FormMode::Create)
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Header text: the secret's name, or `NEW`
    pub fn title(&self) -> &str {
        match &self.mode {
            FormMode::Create => "NEW",
            FormMode::Edit { name, .. } => name,
        }
    }

    /// A fetch, save or delete for this form is outstanding
    pub fn is_busy(&self) -> bool {
        matches!(self.status, FormStatus::Loading | FormStatus::Saving | FormStatus::Deleting)
            || self.repository.is_pending()
    }

    pub fn can_save(&self) -> bool {
        let eligible = self.draft.dirty || (self.is_new() && self.draft.is_complete());
        self.status == FormStatus::Editing && !self.is_busy() && eligible
    }

    pub fn can_delete(&self) -> bool {
        !self.is_new() && self.status == FormStatus::Editing && !self.is_busy()
    }

    pub fn view(&self) -> FormView {
        FormView {
            title: self.title().to_string(),
            name: self.draft.name.clone(),
            scope: self.draft.scope.clone(),
            scope_label: self.draft.scope.label(),
            status: self.status,
            is_new: self.is_new(),
            is_dirty: self.draft.dirty,
            is_busy: self.is_busy(),
            can_save: self.can_save(),
            can_delete: self.can_delete(),
            name_editable: self.is_new(),
            scope_editable: self.is_new(),
            error_message: self.error_message.clone(),
        }
    }

    /// Text for the delete confirmation dialog
    pub fn confirmation_message(&self) -> String {
        format!(
            "Are you sure you want to delete secret \"{}\" ({})? This action cannot be undone.",
            self.title(),
            self.draft.scope.label()
        )
    }

    // === Loading ===

    /// Fetch the existing secret and seed the draft from it
    pub async fn load(&mut self) {
        let FormMode::Edit { name, scope } = &self.mode else {
            return;
        };
        if self.status != FormStatus::Loading {
            return;
        }

        let result = self.repository.get(Some(name.as_str()), scope).await;
        self.load_finished(result);
    }

    /// Apply the outcome of the initial fetch
    pub fn load_finished(&mut self, result: Result<Option<SecretRecord>, SecretsError>) {
        if self.status != FormStatus::Loading {
            debug!(status = %self.status, "Ignoring late load result");
            return;
        }

        match result {
            Ok(Some(record)) => {
                self.draft.name = record.name;
                self.error_message = None;
            }
            Ok(None) => {
                let missing = SecretsError::not_found(self.title(), self.draft.scope().clone());
                self.error_message = Some(missing.to_string());
            }
            Err(e) => {
                self.error_message = Some(e.user_message().unwrap_or(LOAD_FAILED).to_string());
            }
        }
        self.status = FormStatus::Editing;
    }

    // === Editing ===

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), FormError> {
        self.ensure_editable()?;
        if !self.is_new() {
            return Err(FormError::ReadOnlyField { field: "name" });
        }
        self.draft.name = name.into();
        self.draft.dirty = true;
        Ok(())
    }

    pub fn set_value(&mut self, value: impl Into<SecretString>) -> Result<(), FormError> {
        self.ensure_editable()?;
        self.draft.value = value.into();
        self.draft.dirty = true;
        Ok(())
    }

    /// Re-target a new secret at another namespace. No request is issued.
    pub fn set_scope(&mut self, scope: Scope) -> Result<(), FormError> {
        self.ensure_editable()?;
        if !self.is_new() {
            return Err(FormError::ReadOnlyField { field: "scope" });
        }
        self.draft.scope = scope;
        self.draft.dirty = true;
        Ok(())
    }

    fn ensure_editable(&self) -> Result<(), FormError> {
        if self.status == FormStatus::Editing {
            Ok(())
        } else {
            Err(FormError::NotEditable { status: self.status })
        }
    }

    // === Saving ===

    /// Validate the draft and move to `Saving`.
    ///
    /// A validation failure returns to `Editing` with the message set and
    /// yields no payload.
    pub fn request_save(&mut self) -> Result<WriteRequest, FormError> {
        if !self.can_save() {
            return Err(FormError::ActionUnavailable { action: "save", status: self.status });
        }

        self.status = FormStatus::Validating;
        if let Err(e) = self.draft.validate() {
            self.error_message = Some(e.to_string());
            self.status = FormStatus::Editing;
            return Err(e.into());
        }

        self.error_message = None;
        self.status = FormStatus::Saving;
        Ok(WriteRequest {
            name: self.draft.name.trim().to_string(),
            value: SecretString::new(self.draft.value.expose_secret().trim()),
            scope: self.draft.scope.clone(),
        })
    }

    /// Apply the outcome of a save
    pub fn save_finished(&mut self, result: Result<(), SecretsError>) -> Option<Navigation> {
        if self.status != FormStatus::Saving {
            debug!(status = %self.status, "Ignoring late save result");
            return None;
        }

        match result {
            Ok(()) => {
                self.status = FormStatus::Done;
                Some(Navigation::SecretList)
            }
            Err(e) => {
                self.error_message = Some(e.user_message().unwrap_or(SAVE_FAILED).to_string());
                self.status = FormStatus::Editing;
                None
            }
        }
    }

    /// Validate and save through the repository.
    ///
    /// `Ok(Some(_))` means the visit is over; `Ok(None)` means the request
    /// failed and [`error_message`](Self::error_message) says why.
    pub async fn save(&mut self) -> Result<Option<Navigation>, FormError> {
        let request = self.request_save()?;
        let result = self.repository.save(&request.name, &request.value, &request.scope).await;
        Ok(self.save_finished(result))
    }

    // === Deleting ===

    /// Open the confirmation gate. Nothing is deleted yet.
    pub fn request_delete(&mut self) -> Result<(), FormError> {
        if !self.can_delete() {
            return Err(FormError::ActionUnavailable { action: "delete", status: self.status });
        }
        self.status = FormStatus::ConfirmingDelete;
        Ok(())
    }

    /// Close the confirmation gate, leaving draft and record untouched
    pub fn cancel_delete(&mut self) {
        if self.status == FormStatus::ConfirmingDelete {
            self.status = FormStatus::Editing;
        }
    }

    /// Pass the confirmation gate and move to `Deleting`
    pub fn confirm_delete(&mut self) -> Result<DeleteRequest, FormError> {
        let FormMode::Edit { name, scope } = &self.mode else {
            return Err(FormError::ActionUnavailable { action: "delete", status: self.status });
        };
        if self.status != FormStatus::ConfirmingDelete {
            return Err(FormError::ActionUnavailable { action: "delete", status: self.status });
        }

        let request = DeleteRequest { name: name.clone(), scope: scope.clone() };
        self.error_message = None;
        self.status = FormStatus::Deleting;
        Ok(request)
    }

    /// Apply the outcome of a delete
    pub fn delete_finished(&mut self, result: Result<(), SecretsError>) -> Option<Navigation> {
        if self.status != FormStatus::Deleting {
            debug!(status = %self.status, "Ignoring late delete result");
            return None;
        }

        match result {
            Ok(()) => {
                self.status = FormStatus::Done;
                Some(Navigation::SecretList)
            }
            Err(e) => {
                self.error_message = Some(e.user_message().unwrap_or(DELETE_FAILED).to_string());
                self.status = FormStatus::Editing;
                None
            }
        }
    }

    /// Confirm and delete through the repository
    pub async fn delete(&mut self) -> Result<Option<Navigation>, FormError> {
        let request = self.confirm_delete()?;
        let result = self.repository.delete(&request.name, &request.scope).await;
        Ok(self.delete_finished(result))
    }

    /// Leave the form without saving; the draft is dropped with it
    pub fn cancel(self) -> Navigation {
        Navigation::SecretList
    }
}

impl fmt::Debug for SecretFormController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretFormController")
            .field("mode", &self.mode)
            .field("draft", &self.draft)
            .field("status", &self.status)
            .field("error_message", &self.error_message)
            .finish()
    }
}
