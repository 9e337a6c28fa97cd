use serde_json::Value;

use crate::model::{CharacterRecord, FieldValue, TrackerDocument, WorldData};

/// Top-level keys of the legacy shape that belong to world data rather than
/// naming an implicit character.
const LEGACY_WORLD_FIELDS: &[&str] = &["current_date", "current_time"];

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("tracker data is not an object")]
    NotAnObject,
}

/// Normalizes a parsed tree into the canonical document shape.
///
/// The modern shape (`worldData` object plus `cards` array) passes through;
/// otherwise every top-level key is either a fixed world field or an implicit
/// character name whose value object becomes a record. Downstream components
/// only ever see the canonical form.
pub fn normalize(tree: &Value) -> Result<TrackerDocument, SchemaError> {
    let root = tree.as_object().ok_or(SchemaError::NotAnObject)?;

    if let (Some(Value::Object(world)), Some(Value::Array(cards))) =
        (root.get("worldData"), root.get("cards"))
    {
        return Ok(TrackerDocument {
            world: world_from_object(world),
            cards: cards_from_array(cards),
        });
    }

    let mut world = WorldData::default();
    let mut records = Vec::new();
    for (key, value) in root {
        if LEGACY_WORLD_FIELDS.contains(&key.as_str()) {
            if let Some(fv) = FieldValue::from_json(value) {
                world.fields.insert(key.clone(), fv);
            }
        } else if let Value::Object(object) = value {
            if let Some(record) = CharacterRecord::from_object(object, Some(key)) {
                records.push(record);
            }
        } else {
            log::debug!("ignoring non-object legacy entry {key:?}");
        }
    }

    Ok(TrackerDocument {
        world,
        cards: records,
    })
}

fn world_from_object(object: &serde_json::Map<String, Value>) -> WorldData {
    WorldData {
        fields: object
            .iter()
            .filter_map(|(k, v)| FieldValue::from_json(v).map(|fv| (k.clone(), fv)))
            .collect(),
    }
}

fn cards_from_array(cards: &[Value]) -> Vec<CharacterRecord> {
    cards
        .iter()
        .filter_map(|card| match card {
            Value::Object(object) => {
                let record = CharacterRecord::from_object(object, None);
                if record.is_none() {
                    log::warn!("skipping card without a name");
                }
                record
            }
            other => {
                log::warn!("skipping non-object card entry: {other}");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn canonical_shape_passes_through() {
        let doc = normalize(&json!({
            "worldData": {"current_date": "2024-06-01"},
            "cards": [{"name": "Alice", "ap": 50}],
        }))
        .unwrap();

        assert_eq!(doc.world.current_date(), Some("2024-06-01"));
        assert_eq!(doc.cards.len(), 1);
        assert_eq!(doc.cards[0].name, "Alice");
        assert_eq!(doc.cards[0].get("ap"), Some(&FieldValue::Number(50.0)));
    }

    #[test]
    fn legacy_shape_and_canonical_shape_normalize_identically() {
        let legacy = normalize(&json!({
            "current_date": "2024-06-01",
            "Alice": {"ap": 50},
            "Bob": {"dp": 10},
        }))
        .unwrap();
        let canonical = normalize(&json!({
            "worldData": {"current_date": "2024-06-01"},
            "cards": [
                {"name": "Alice", "ap": 50},
                {"name": "Bob", "dp": 10},
            ],
        }))
        .unwrap();

        assert_eq!(legacy, canonical);
    }

    #[test]
    fn legacy_character_order_follows_source_keys() {
        let doc = normalize(&json!({
            "Zoe": {"ap": 1},
            "current_date": "today",
            "Adam": {"ap": 2},
        }))
        .unwrap();

        let names: Vec<_> = doc.cards.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Zoe", "Adam"]);
    }

    #[test]
    fn non_object_root_is_a_schema_error() {
        assert!(matches!(
            normalize(&json!([1, 2, 3])),
            Err(SchemaError::NotAnObject)
        ));
        assert!(matches!(
            normalize(&json!("text")),
            Err(SchemaError::NotAnObject)
        ));
    }

    #[test]
    fn scalar_legacy_entries_are_ignored() {
        let doc = normalize(&json!({
            "Alice": {"ap": 1},
            "stray": 42,
        }))
        .unwrap();
        assert_eq!(doc.cards.len(), 1);
        assert!(doc.world.fields.is_empty());
    }

    #[test]
    fn cards_without_names_are_dropped() {
        let doc = normalize(&json!({
            "worldData": {},
            "cards": [{"ap": 1}, {"name": "Kept", "ap": 2}, 7],
        }))
        .unwrap();
        assert_eq!(doc.cards.len(), 1);
        assert_eq!(doc.cards[0].name, "Kept");
    }
}
