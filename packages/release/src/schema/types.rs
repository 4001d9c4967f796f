//! Types for the release schema.

use std::fmt;

use serde_json::{Map, Value};

use crate::error::{MergeError, Result};
use crate::path::FieldPath;
use crate::release::value_kind;

/// How a field combines an incoming value with the existing one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MergePolicy {
    /// Scalars overwrite, scalar lists union, objects and entity
    /// collections merge recursively.
    #[default]
    Merge,

    /// Incoming text is appended to existing text with a separator.
    AppendText { separator: String },

    /// The incoming value replaces the existing one wholesale.
    Replace,
}

impl MergePolicy {
    /// Append-text policy with the given separator.
    #[must_use]
    pub fn append_text(separator: impl Into<String>) -> Self {
        Self::AppendText {
            separator: separator.into(),
        }
    }
}

/// The identity of one entity within its collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity {
    /// Attribute that identified the entity (e.g. "id" or "field").
    pub key: String,

    /// Identity value rendered as text.
    pub value: String,
}

impl Identity {
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Declarative specification of one entity collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSpec {
    /// Dotted path of the collection (e.g. "tender.lots").
    pub path: String,

    /// Candidate identity attributes, in priority order.
    ///
    /// An entity is identified by the first candidate it carries.
    pub identity_keys: Vec<String>,

    /// Whether the engine may assign an id to entities that carry none of
    /// the identity keys.
    pub mint_ids: bool,

    /// Whether entities without any identity key are unioned by structural
    /// equality instead of being rejected.
    pub union_unkeyed: bool,
}

impl CollectionSpec {
    /// Create a collection keyed by `id`.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            identity_keys: vec!["id".to_string()],
            mint_ids: false,
            union_unkeyed: false,
        }
    }

    /// Set the candidate identity keys.
    #[must_use]
    pub fn with_identity_keys(mut self, keys: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.identity_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Allow the engine to mint ids for entities that have none.
    #[must_use]
    pub fn with_minted_ids(mut self, mint: bool) -> Self {
        self.mint_ids = mint;
        self
    }

    /// Union entities without identity by structural equality.
    #[must_use]
    pub fn with_unkeyed_union(mut self, union: bool) -> Self {
        self.union_unkeyed = union;
        self
    }

    /// The key minted ids are written to.
    #[must_use]
    pub fn primary_key(&self) -> &str {
        self.identity_keys.first().map_or("id", String::as_str)
    }

    /// Resolve the identity of a fragment entity.
    ///
    /// Returns `Ok(None)` when the entity carries none of the identity keys.
    ///
    /// # Errors
    /// Returns `MalformedFragment` when an identity key present is null,
    /// empty, or not a scalar.
    pub fn identify(&self, entity: &Map<String, Value>, path: &FieldPath) -> Result<Option<Identity>> {
        Ok(self.identities(entity, path)?.into_iter().next())
    }

    /// Every identity key a fragment entity carries, in priority order.
    ///
    /// # Errors
    /// See [`identify`](Self::identify).
    pub fn identities(&self, entity: &Map<String, Value>, path: &FieldPath) -> Result<Vec<Identity>> {
        let mut identities = Vec::new();
        for key in &self.identity_keys {
            let Some(value) = entity.get(key) else {
                continue;
            };
            match identity_text(value) {
                Some(text) if !text.is_empty() => identities.push(Identity::new(key, text)),
                Some(_) => {
                    return Err(MergeError::malformed(
                        path,
                        format!("identity key '{key}' is empty"),
                    ));
                }
                None if value.is_null() => {
                    return Err(MergeError::malformed(
                        path,
                        format!("identity key '{key}' is null"),
                    ));
                }
                None => {
                    return Err(MergeError::malformed(
                        path,
                        format!(
                            "identity key '{key}' must be a string or number, found {}",
                            value_kind(value)
                        ),
                    ));
                }
            }
        }
        Ok(identities)
    }

    /// Check whether an existing entity has the given identity.
    #[must_use]
    pub fn matches(&self, entity: &Value, identity: &Identity) -> bool {
        entity
            .as_object()
            .and_then(|fields| fields.get(&identity.key))
            .and_then(identity_text)
            .is_some_and(|text| text == identity.value)
    }

    /// Check whether an existing entity has `identity` and does not
    /// contradict any of the `stronger` identities.
    ///
    /// An entity lacking a stronger key is compatible with it.
    #[must_use]
    pub fn matches_under(&self, entity: &Value, identity: &Identity, stronger: &[Identity]) -> bool {
        self.matches(entity, identity)
            && stronger.iter().all(|outer| {
                entity
                    .as_object()
                    .and_then(|fields| fields.get(&outer.key))
                    .and_then(identity_text)
                    .is_none_or(|text| text == outer.value)
            })
    }
}

/// Render a scalar identity value as text. Numbers use their JSON rendering.
fn identity_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
