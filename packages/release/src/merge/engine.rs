//! Merge engine that folds fragments into a release using the schema registry.

use serde_json::{Map, Value};

use super::list::{next_free_id, union_values};
use crate::error::{MergeError, Result};
use crate::fragment::Mergeable;
use crate::path::FieldPath;
use crate::release::{value_kind, Release};
use crate::schema::{CollectionSpec, Identity, MergePolicy, SchemaRegistry};

/// Engine that applies fragments to a release.
///
/// Policies per path:
///
/// - scalars: the fragment overwrites (last fragment wins)
/// - lists of scalars: union, first-seen order
/// - entity collections: match by identity and merge, or append
/// - objects: merge key by key
///
/// A fragment never clears anything: nulls and empty containers in a
/// fragment are skipped. Each call to [`apply`](Self::apply) is atomic; on
/// error the release is left exactly as it was.
#[derive(Debug, Clone)]
pub struct MergeEngine {
    schema: SchemaRegistry,
}

impl MergeEngine {
    /// Create an engine for the given schema.
    #[must_use]
    pub fn new(schema: SchemaRegistry) -> Self {
        Self { schema }
    }

    #[must_use]
    pub fn schema(&self) -> &SchemaRegistry {
        &self.schema
    }

    /// Apply one fragment to a release.
    ///
    /// # Errors
    /// - `MalformedFragment` if an entity has a null or missing identity, or
    ///   the fragment's shape contradicts the release
    /// - `Conflict` if an entity's identity matches several existing entities
    pub fn apply<M: Mergeable>(&self, release: &mut Release, fragment: M) -> Result<()> {
        let target = fragment.target();
        let partial = fragment.into_partial()?;
        let root = FieldPath::root();

        // Merge into copies of the touched top-level fields, then commit.
        let mut staged: Vec<(String, Value)> = Vec::with_capacity(partial.len());
        for (key, incoming) in partial {
            if is_vacant(&incoming) {
                continue;
            }
            let path = root.child(&key);
            let mut value = release.as_map().get(&key).cloned().unwrap_or(Value::Null);
            self.merge_value(&mut value, incoming, &path)?;
            if !value.is_null() {
                staged.push((key, value));
            }
        }

        let fields = release.as_map_mut();
        for (key, value) in staged {
            fields.insert(key, value);
        }

        tracing::trace!(path = %target, "Applied fragment");
        Ok(())
    }

    /// Apply fragments in order, stopping at the first failure.
    ///
    /// Returns the number of fragments applied. Fragments applied before a
    /// failure stay applied; callers that need all-or-nothing semantics
    /// apply to a scratch release and discard it on error.
    pub fn apply_all<M, I>(&self, release: &mut Release, fragments: I) -> Result<usize>
    where
        M: Mergeable,
        I: IntoIterator<Item = M>,
    {
        let mut applied = 0;
        for fragment in fragments {
            self.apply(release, fragment)?;
            applied += 1;
        }
        Ok(applied)
    }

    fn merge_value(&self, existing: &mut Value, incoming: Value, path: &FieldPath) -> Result<()> {
        match self.schema.policy(path.as_str()) {
            MergePolicy::Merge => {}
            MergePolicy::Replace => {
                *existing = incoming;
                return Ok(());
            }
            MergePolicy::AppendText { separator } => {
                return append_text(existing, incoming, separator, path);
            }
        }

        match incoming {
            // A fresh container is only written if something landed in it.
            Value::Object(fields) => match existing {
                Value::Null => {
                    let mut target = Map::new();
                    self.merge_object(&mut target, fields, path)?;
                    if !target.is_empty() {
                        *existing = Value::Object(target);
                    }
                    Ok(())
                }
                Value::Object(target) => self.merge_object(target, fields, path),
                other => Err(shape_mismatch(path, "object", other)),
            },
            Value::Array(items) => match existing {
                Value::Null => {
                    let mut target = Vec::new();
                    self.merge_list(&mut target, items, path)?;
                    if !target.is_empty() {
                        *existing = Value::Array(target);
                    }
                    Ok(())
                }
                Value::Array(target) => self.merge_list(target, items, path),
                other => Err(shape_mismatch(path, "list", other)),
            },
            scalar => {
                if existing.is_object() || existing.is_array() {
                    return Err(shape_mismatch(path, value_kind(&scalar), existing));
                }
                *existing = scalar;
                Ok(())
            }
        }
    }

    fn merge_object(
        &self,
        target: &mut Map<String, Value>,
        incoming: Map<String, Value>,
        path: &FieldPath,
    ) -> Result<()> {
        for (key, value) in incoming {
            if is_vacant(&value) {
                continue;
            }
            let child = path.child(&key);
            match target.get_mut(&key) {
                Some(slot) => self.merge_value(slot, value, &child)?,
                None => {
                    let mut slot = Value::Null;
                    self.merge_value(&mut slot, value, &child)?;
                    if !slot.is_null() {
                        target.insert(key, slot);
                    }
                }
            }
        }
        Ok(())
    }

    fn merge_list(&self, target: &mut Vec<Value>, incoming: Vec<Value>, path: &FieldPath) -> Result<()> {
        if let Some(spec) = self.schema.collection(path.as_str()) {
            return self.merge_entities(target, incoming, spec, path);
        }

        // Unregistered lists of objects behave like id-keyed collections.
        if incoming.iter().all(Value::is_object) {
            let spec = CollectionSpec::new(path.as_str()).with_unkeyed_union(true);
            return self.merge_entities(target, incoming, &spec, path);
        }

        union_values(target, incoming);
        Ok(())
    }

    fn merge_entities(
        &self,
        target: &mut Vec<Value>,
        incoming: Vec<Value>,
        spec: &CollectionSpec,
        path: &FieldPath,
    ) -> Result<()> {
        // Ids the fragment carries itself are never minted.
        let reserved: Vec<Value> = if spec.mint_ids {
            incoming
                .iter()
                .filter_map(|item| item.get(spec.primary_key()).cloned())
                .collect()
        } else {
            Vec::new()
        };

        for item in incoming {
            let fields = match item {
                Value::Object(fields) => fields,
                other => {
                    return Err(MergeError::malformed(
                        path,
                        format!(
                            "collection members must be objects, found {}",
                            value_kind(&other)
                        ),
                    ));
                }
            };

            let identities = spec.identities(&fields, path)?;
            if let Some((identity, positions)) = locate(target, spec, &identities) {
                match positions.as_slice() {
                    [index] => {
                        if let Some(Value::Object(existing)) = target.get_mut(*index) {
                            self.merge_object(existing, fields, path)?;
                        }
                    }
                    many => {
                        return Err(MergeError::Conflict {
                            collection: path.to_string(),
                            key: identity.key.clone(),
                            value: identity.value.clone(),
                            matches: many.len(),
                        });
                    }
                }
            } else if !identities.is_empty() {
                let entity = self.build_entity(Map::new(), fields, path)?;
                target.push(entity);
            } else if spec.mint_ids {
                let id = next_free_id(target, &reserved, spec);
                tracing::debug!(collection = %path, id = %id, "Minted entity id");
                let mut seed = Map::new();
                seed.insert(spec.primary_key().to_string(), Value::String(id));
                let entity = self.build_entity(seed, fields, path)?;
                target.push(entity);
            } else if spec.union_unkeyed {
                let entity = self.build_entity(Map::new(), fields, path)?;
                if !is_vacant(&entity) && !target.contains(&entity) {
                    target.push(entity);
                }
            } else {
                return Err(MergeError::malformed(
                    path,
                    format!(
                        "entity has no identity key (expected one of: {})",
                        spec.identity_keys.join(", ")
                    ),
                ));
            }
        }
        Ok(())
    }

    /// Build a new collection member by merging its fields into `seed`, so
    /// nested collections and policies apply to new entities too.
    fn build_entity(
        &self,
        mut seed: Map<String, Value>,
        fields: Map<String, Value>,
        path: &FieldPath,
    ) -> Result<Value> {
        self.merge_object(&mut seed, fields, path)?;
        Ok(Value::Object(seed))
    }
}

fn append_text(existing: &mut Value, incoming: Value, separator: &str, path: &FieldPath) -> Result<()> {
    let text = match incoming {
        Value::String(text) => text,
        other => {
            return Err(MergeError::malformed(
                path,
                format!("expected text to append, found {}", value_kind(&other)),
            ));
        }
    };

    match existing {
        Value::Null => *existing = Value::String(text),
        Value::String(current) if current.is_empty() => *current = text,
        Value::String(current) => {
            current.push_str(separator);
            current.push_str(&text);
        }
        other => {
            return Err(MergeError::malformed(
                path,
                format!("cannot append text to existing {}", value_kind(other)),
            ));
        }
    }
    Ok(())
}

/// Find the existing entities an incoming entity refers to.
///
/// Candidate identities are tried in priority order. A lower-priority
/// identity only matches entities that lack every higher-priority key the
/// incoming entity carries, or carry the same value for it.
fn locate<'a>(
    target: &[Value],
    spec: &CollectionSpec,
    identities: &'a [Identity],
) -> Option<(&'a Identity, Vec<usize>)> {
    identities.iter().enumerate().find_map(|(rank, identity)| {
        let stronger = &identities[..rank];
        let positions: Vec<usize> = target
            .iter()
            .enumerate()
            .filter(|(_, entity)| spec.matches_under(entity, identity, stronger))
            .map(|(index, _)| index)
            .collect();
        (!positions.is_empty()).then_some((identity, positions))
    })
}

/// Nulls and empty containers carry nothing to merge.
fn is_vacant(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        _ => false,
    }
}

fn shape_mismatch(path: &FieldPath, incoming: &str, existing: &Value) -> MergeError {
    MergeError::malformed(
        path,
        format!("cannot merge {incoming} into existing {}", value_kind(existing)),
    )
}
