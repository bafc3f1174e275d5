//! Domain types for scoped secrets.
//!
//! A secret is addressed by the pair `(scope, name)`. The same name may exist
//! once globally and once per workflow; those are distinct records.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Namespace a secret lives in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "workflowName", rename_all = "lowercase")]
pub enum Scope {
    /// Visible to every workflow
    #[default]
    Global,
    /// Visible only to the named workflow
    Workflow(String),
}

impl Scope {
    /// Build a scope from an optional workflow name.
    ///
    /// `None` and the empty string both mean [`Scope::Global`], matching the
    /// scope selector where the blank entry is the global namespace.
    pub fn from_workflow<S: AsRef<str>>(workflow_name: Option<S>) -> Self {
        match workflow_name {
            Some(name) if !name.as_ref().is_empty() => Scope::Workflow(name.as_ref().to_string()),
            _ => Scope::Global,
        }
    }

    /// Workflow scope for `name`; an empty name collapses to global.
    pub fn workflow(name: impl Into<String>) -> Self {
        let name = name.into();
        if name.is_empty() {
            Scope::Global
        } else {
            Scope::Workflow(name)
        }
    }

    /// The `workflowName` query value, or `None` for the global namespace.
    pub fn workflow_name(&self) -> Option<&str> {
        match self {
            Scope::Global => None,
            Scope::Workflow(name) => Some(name),
        }
    }

    /// Human readable label: `Global` or `Workflow: <name>`.
    pub fn label(&self) -> String {
        match self {
            Scope::Global => "Global".to_string(),
            Scope::Workflow(name) => format!("Workflow: {}", name),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Global => write!(f, "global"),
            Scope::Workflow(name) => write!(f, "workflow:{}", name),
        }
    }
}

/// Secret metadata as returned by the read API.
///
/// The remote API decides whether a value comes back at all; when it does it
/// is held redacted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecretRecord {
    pub name: String,
    pub scope: Scope,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<SecretString>,
}

impl SecretRecord {
    pub fn new(name: impl Into<String>, scope: Scope) -> Self {
        Self { name: name.into(), scope, value: None }
    }

    pub fn with_value(mut self, value: impl Into<SecretString>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// String wrapper for secret payloads.
///
/// `Debug`, `Display` and serialization all print `[REDACTED]`; the memory is
/// zeroed on drop. Read the value with [`SecretString::expose_secret`].
#[derive(Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Never log the returned value.
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for SecretString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str("[REDACTED]")
    }
}

impl<'de> Deserialize<'de> for SecretString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(SecretString)
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretString([REDACTED])")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl PartialEq for SecretString {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for SecretString {}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
