//! Workflow names offered by the scope selector.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use super::types::Scope;
use crate::client::ApiClient;

const WORKFLOW_NAMES_PATH: &str = "/metadata/workflow/names-and-versions";

/// Ordered, read-only list of workflow names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkflowCatalog {
    names: Vec<String>,
}

impl WorkflowCatalog {
    /// Sorted and de-duplicated catalog
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> =
            names.into_iter().map(Into::into).filter(|n| !n.is_empty()).collect();
        names.sort();
        names.dedup();
        Self { names }
    }

    /// Fetch the catalog from the metadata API.
    ///
    /// A failed fetch yields an empty catalog; the selector then offers only
    /// the global scope.
    pub async fn load(client: &ApiClient) -> Self {
        match client.get_json::<BTreeMap<String, serde_json::Value>>(WORKFLOW_NAMES_PATH).await {
            Ok(map) => {
                debug!(count = map.len(), "Loaded workflow catalog");
                Self::new(map.into_keys())
            }
            Err(e) => {
                warn!(error = %e, "Failed to load workflow catalog");
                Self::default()
            }
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, workflow_name: &str) -> bool {
        self.names.binary_search_by(|n| n.as_str().cmp(workflow_name)).is_ok()
    }

    /// Selector options: global first, then each workflow
    pub fn scopes(&self) -> Vec<Scope> {
        std::iter::once(Scope::Global)
            .chain(self.names.iter().map(|n| Scope::Workflow(n.clone())))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
