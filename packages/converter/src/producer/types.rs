//! Types shared by producers.

use serde_json::{Map, Value};
use ted_ocds_release::{Entity, IdSequence};

use crate::config::ocid;
use crate::types::NoticeType;

/// Per-invocation state handed to a producer.
#[derive(Debug, Clone)]
pub struct ProducerContext {
    pub notice_type: NoticeType,

    /// Name of the notice file, for log messages.
    pub file_name: String,

    pub ocid_prefix: String,

    /// Sequential ids for entities the producer mints itself.
    pub ids: IdSequence,
}

impl ProducerContext {
    #[must_use]
    pub fn new(
        notice_type: NoticeType,
        file_name: impl Into<String>,
        ocid_prefix: impl Into<String>,
    ) -> Self {
        Self {
            notice_type,
            file_name: file_name.into(),
            ocid_prefix: ocid_prefix.into(),
            ids: IdSequence::new(),
        }
    }

    /// Copy of the context with a fresh id sequence, for the next producer.
    #[must_use]
    pub fn fork(&self) -> Self {
        Self {
            ids: IdSequence::new(),
            ..self.clone()
        }
    }

    /// OCID for a procedure identifier.
    #[must_use]
    pub fn ocid(&self, procedure_id: &str) -> String {
        ocid(&self.ocid_prefix, procedure_id)
    }
}

/// Build a fragment entity from a JSON object, dropping nulls and empty
/// containers at every level.
///
/// Non-object values yield an empty entity.
#[must_use]
pub fn entity(value: Value) -> Entity {
    match prune(value) {
        Some(Value::Object(fields)) => fields,
        _ => Map::new(),
    }
}

/// Build fragment entities, skipping any that end up empty.
#[must_use]
pub fn entities(values: impl IntoIterator<Item = Value>) -> Vec<Entity> {
    values
        .into_iter()
        .map(entity)
        .filter(|e| !e.is_empty())
        .collect()
}

fn prune(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Object(fields) => {
            let fields: Map<String, Value> = fields
                .into_iter()
                .filter_map(|(k, v)| prune(v).map(|v| (k, v)))
                .collect();
            (!fields.is_empty()).then_some(Value::Object(fields))
        }
        Value::Array(items) => {
            let items: Vec<Value> = items.into_iter().filter_map(prune).collect();
            (!items.is_empty()).then_some(Value::Array(items))
        }
        Value::String(s) if s.is_empty() => None,
        other => Some(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entity_prunes_nulls() {
        let name: Option<String> = None;
        let built = entity(json!({
            "id": "ORG-0001",
            "name": name,
            "address": {"locality": null, "country": ""},
            "roles": [],
            "identifier": {"id": "0123456789", "scheme": null}
        }));

        assert_eq!(
            Value::Object(built),
            json!({"id": "ORG-0001", "identifier": {"id": "0123456789"}})
        );
    }

    #[test]
    fn test_entities_skip_empty() {
        let built = entities(vec![json!({"id": "LOT-0001"}), json!({"title": null})]);
        assert_eq!(built.len(), 1);
    }

    #[test]
    fn test_fork_resets_ids() {
        let mut context = ProducerContext::new(NoticeType::ContractNotice, "cn.xml", "ocds-0c46vo");
        assert_eq!(context.ids.next_id("items"), "1");

        let mut forked = context.fork();
        assert_eq!(forked.ids.next_id("items"), "1");
        assert_eq!(forked.file_name, "cn.xml");
        assert_eq!(forked.ocid("P-1"), "ocds-0c46vo-P-1");
    }
}
