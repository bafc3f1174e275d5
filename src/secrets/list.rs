//! Rows for the secret list page.

use serde::Serialize;

use super::error::Result;
use super::path::scoped;
use super::repository::SecretRepository;
use super::types::Scope;

const EDIT_BASE: &str = "/secretDef";

/// One row of the list: a name in the filtered scope plus its edit link
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretRow {
    pub name: String,
    pub scope: Scope,
    pub edit_path: String,
}

/// Secret names of one scope, as the list page shows them
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecretListView {
    scope: Scope,
    rows: Vec<SecretRow>,
}

impl SecretListView {
    pub fn new(scope: Scope, names: Vec<String>) -> Self {
        let rows = names
            .into_iter()
            .map(|name| {
                let edit_path =
                    scoped(&format!("{}/{}", EDIT_BASE, urlencoding::encode(&name)), &scope);
                SecretRow { name, scope: scope.clone(), edit_path }
            })
            .collect();
        Self { scope, rows }
    }

    /// Load the names for `scope` through the shared cache
    pub async fn load(repository: &SecretRepository, scope: Scope) -> Result<Self> {
        let names = repository.list(&scope).await?;
        Ok(Self::new(scope, names))
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn rows(&self) -> &[SecretRow] {
        &self.rows
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.name.as_str())
    }

    /// Table caption, e.g. `3 results`
    pub fn title(&self) -> String {
        format!("{} results", self.rows.len())
    }

    /// Link to the create form, pre-set to the current filter
    pub fn new_secret_path(&self) -> String {
        scoped(EDIT_BASE, &self.scope)
    }
}
