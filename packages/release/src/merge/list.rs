//! List helpers shared by the merge engine.

use serde_json::Value;

use crate::schema::CollectionSpec;

/// Append `incoming` to `target` and drop repeated values, keeping the
/// first occurrence of each.
pub(super) fn union_values(target: &mut Vec<Value>, incoming: Vec<Value>) {
    target.extend(incoming);
    let mut seen: Vec<Value> = Vec::with_capacity(target.len());
    target.retain(|value| {
        if seen.contains(value) {
            false
        } else {
            seen.push(value.clone());
            true
        }
    });
}

/// Next free numeric id in a collection: one past the largest numeric id
/// among the existing entities and the `reserved` ids.
pub(super) fn next_free_id(target: &[Value], reserved: &[Value], spec: &CollectionSpec) -> String {
    let key = spec.primary_key();
    let max = target
        .iter()
        .filter_map(|entity| entity.get(key))
        .chain(reserved)
        .filter_map(|id| match id {
            Value::String(s) => s.parse::<u64>().ok(),
            Value::Number(n) => n.as_u64(),
            _ => None,
        })
        .max()
        .unwrap_or(0);
    max.saturating_add(1).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_union_keeps_first_seen_order() {
        let mut roles = vec![json!("buyer")];
        union_values(&mut roles, vec![json!("buyer"), json!("supplier")]);
        assert_eq!(roles, vec![json!("buyer"), json!("supplier")]);
    }

    #[test]
    fn test_union_drops_existing_duplicates() {
        let mut lots = vec![json!("LOT-1"), json!("LOT-1")];
        union_values(&mut lots, vec![json!("LOT-2"), json!("LOT-1")]);
        assert_eq!(lots, vec![json!("LOT-1"), json!("LOT-2")]);
    }

    #[test]
    fn test_next_free_id() {
        let spec = CollectionSpec::new("statistics");
        assert_eq!(next_free_id(&[], &[], &spec), "1");

        let existing = vec![json!({"id": "2"}), json!({"id": 7}), json!({"id": "x-9"})];
        assert_eq!(next_free_id(&existing, &[], &spec), "8");
    }

    #[test]
    fn test_next_free_id_skips_reserved() {
        let spec = CollectionSpec::new("statistics");
        let existing = vec![json!({"id": "2"})];
        assert_eq!(next_free_id(&existing, &[json!("3")], &spec), "4");
    }

    #[test]
    fn test_next_free_id_saturates() {
        let spec = CollectionSpec::new("statistics");
        let existing = vec![json!({"id": u64::MAX})];
        assert_eq!(next_free_id(&existing, &[], &spec), u64::MAX.to_string());
    }
}
