use indexmap::IndexMap;
use serde_json::Value;

use super::key::{self, KeyRole};
use super::value::FieldValue;

/// Attributes shared across all characters in one document: current date and
/// time, default background, world-level icon overrides.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorldData {
    pub fields: IndexMap<String, FieldValue>,
}

impl WorldData {
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn current_date(&self) -> Option<&str> {
        self.get("current_date").and_then(FieldValue::as_text)
    }

    pub fn current_time(&self) -> Option<&str> {
        self.get("current_time").and_then(FieldValue::as_text)
    }

    /// World-level background color (`bg` preferred, `bgColor` accepted).
    pub fn bg_color(&self) -> Option<&str> {
        self.get("bg")
            .or_else(|| self.get("bgColor"))
            .and_then(FieldValue::as_text)
    }

    /// World-level icon override for `field_key`, from the `icons` table.
    pub fn icon_override(&self, field_key: &str) -> Option<&str> {
        match self.get("icons") {
            Some(FieldValue::Table(table)) => table.get(field_key).and_then(FieldValue::as_text),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        Value::Object(
            self.fields
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }
}

/// One character's stats within a document. `name` is extracted out of the
/// raw key/value map and is unique within a document after merging.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterRecord {
    pub name: String,
    pub fields: IndexMap<String, FieldValue>,
}

impl CharacterRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: IndexMap::new(),
        }
    }

    /// Builds a record from a parsed object. A `name` field inside the object
    /// takes precedence over `fallback_name`; with neither, there is no record.
    pub fn from_object(
        object: &serde_json::Map<String, Value>,
        fallback_name: Option<&str>,
    ) -> Option<Self> {
        let name = object
            .get("name")
            .and_then(Value::as_str)
            .or(fallback_name)?
            .to_string();

        let fields = object
            .iter()
            .filter(|(k, _)| k.as_str() != "name")
            .filter_map(|(k, v)| FieldValue::from_json(v).map(|fv| (k.clone(), fv)))
            .collect();

        Some(Self { name, fields })
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Whether any sync-gate key is present and truthy.
    pub fn sync_enabled(&self) -> bool {
        key::SYNC_GATE_KEYS
            .iter()
            .any(|k| self.get(k).is_some_and(FieldValue::is_truthy))
    }

    /// Character-level icon override for `field_key`, from the `icons` table.
    pub fn icon_override(&self, field_key: &str) -> Option<&str> {
        match self.get("icons") {
            Some(FieldValue::Table(table)) => table.get(field_key).and_then(FieldValue::as_text),
            _ => None,
        }
    }

    /// The `(base, delta)` pairs of every change field in this record, in
    /// field order.
    pub fn change_fields(&self) -> Vec<(String, FieldValue)> {
        self.fields
            .iter()
            .filter_map(|(k, v)| match key::classify(k) {
                KeyRole::ChangeOf(base) => Some((base, v.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn to_json(&self) -> Value {
        let mut map = serde_json::Map::new();
        map.insert("name".to_string(), Value::String(self.name.clone()));
        for (k, v) in &self.fields {
            map.insert(k.clone(), v.to_json());
        }
        Value::Object(map)
    }
}

/// Canonical parsed unit: world data plus an ordered character list. Both
/// supported input shapes normalize into this; it is rebuilt from raw text on
/// every render pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackerDocument {
    pub world: WorldData,
    pub cards: Vec<CharacterRecord>,
}

impl TrackerDocument {
    /// Re-encodes the document as a canonical-shape JSON tree, for block
    /// generation and format conversion.
    pub fn to_json(&self) -> Value {
        let mut map = serde_json::Map::new();
        map.insert("worldData".to_string(), self.world.to_json());
        map.insert(
            "cards".to_string(),
            Value::Array(self.cards.iter().map(CharacterRecord::to_json).collect()),
        );
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn record(value: Value) -> CharacterRecord {
        let Value::Object(map) = value else {
            panic!("expected object");
        };
        CharacterRecord::from_object(&map, None).unwrap()
    }

    #[test]
    fn name_field_is_extracted_from_object() {
        let card = record(json!({"name": "Alice", "ap": 50}));
        assert_eq!(card.name, "Alice");
        assert_eq!(card.get("ap"), Some(&FieldValue::Number(50.0)));
        assert!(!card.contains("name"));
    }

    #[test]
    fn fallback_name_used_when_object_has_none() {
        let Value::Object(map) = json!({"ap": 50}) else {
            unreachable!()
        };
        let card = CharacterRecord::from_object(&map, Some("Bob")).unwrap();
        assert_eq!(card.name, "Bob");
    }

    #[test]
    fn object_without_any_name_is_rejected() {
        let Value::Object(map) = json!({"ap": 50}) else {
            unreachable!()
        };
        assert!(CharacterRecord::from_object(&map, None).is_none());
    }

    #[test]
    fn sync_gate_requires_truthy_value() {
        let on = record(json!({"name": "A", "enableDataSync": true}));
        assert!(on.sync_enabled());

        let off = record(json!({"name": "A", "dataSync": false}));
        assert!(!off.sync_enabled());

        let absent = record(json!({"name": "A", "ap": 1}));
        assert!(!absent.sync_enabled());
    }

    #[test]
    fn icon_override_reads_icons_table() {
        let card = record(json!({"name": "A", "icons": {"ap": "💖"}}));
        assert_eq!(card.icon_override("ap"), Some("💖"));
        assert_eq!(card.icon_override("dp"), None);
    }

    #[test]
    fn change_fields_pair_base_with_delta() {
        let card = record(json!({"name": "A", "hpChange": -10, "ap": 5}));
        let changes = card.change_fields();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].0, "hp");
        assert_eq!(changes[0].1, FieldValue::Number(-10.0));
    }

    #[test]
    fn world_data_accessors() {
        let world = WorldData {
            fields: [
                (
                    "current_date".to_string(),
                    FieldValue::Text("2024-06-01".to_string()),
                ),
                ("bgColor".to_string(), FieldValue::Text("#112233".to_string())),
            ]
            .into_iter()
            .collect(),
        };
        assert_eq!(world.current_date(), Some("2024-06-01"));
        assert_eq!(world.current_time(), None);
        assert_eq!(world.bg_color(), Some("#112233"));
    }
}
