use indexmap::IndexMap;
use serde_json::Value;

/// A single tracker field value.
///
/// Parsed trees arrive as `serde_json::Value`; at the ingestion boundary every
/// field is converted into this tagged union so reconciliation and extraction
/// dispatch on the variant instead of re-inspecting runtime shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Flag(bool),
    List(Vec<FieldValue>),
    /// Structured list delta: `{ "add": [...], "remove": [...] }`.
    Delta {
        add: Vec<String>,
        remove: Vec<String>,
    },
    /// Any other nested object (e.g. an `icons` override table).
    Table(IndexMap<String, FieldValue>),
}

/// The literal placeholder shown when a base value cannot be recovered.
pub const UNKNOWN_SENTINEL: &str = "?";

impl FieldValue {
    /// Converts a parsed JSON value. Returns `None` for `null`, which tracker
    /// blocks use to mean "no value" and which is dropped at ingestion.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(b) => Some(FieldValue::Flag(*b)),
            Value::Number(n) => Some(FieldValue::Number(n.as_f64().unwrap_or(0.0))),
            Value::String(s) => Some(FieldValue::Text(s.clone())),
            Value::Array(items) => Some(FieldValue::List(
                items.iter().filter_map(FieldValue::from_json).collect(),
            )),
            Value::Object(map) => {
                if let Some(delta) = delta_from_object(map) {
                    return Some(delta);
                }
                let table = map
                    .iter()
                    .filter_map(|(k, v)| FieldValue::from_json(v).map(|fv| (k.clone(), fv)))
                    .collect();
                Some(FieldValue::Table(table))
            }
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Number(n) => number_to_json(*n),
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::Flag(b) => Value::Bool(*b),
            FieldValue::List(items) => Value::Array(items.iter().map(FieldValue::to_json).collect()),
            FieldValue::Delta { add, remove } => {
                let mut map = serde_json::Map::new();
                if !add.is_empty() {
                    map.insert(
                        "add".to_string(),
                        Value::Array(add.iter().cloned().map(Value::String).collect()),
                    );
                }
                if !remove.is_empty() {
                    map.insert(
                        "remove".to_string(),
                        Value::Array(remove.iter().cloned().map(Value::String).collect()),
                    );
                }
                Value::Object(map)
            }
            FieldValue::Table(table) => Value::Object(
                table
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Truthiness the way the host chat scripts evaluate gate keys.
    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Flag(b) => *b,
            FieldValue::Number(n) => *n != 0.0,
            FieldValue::Text(s) => !s.is_empty(),
            FieldValue::List(_) | FieldValue::Delta { .. } | FieldValue::Table(_) => true,
        }
    }

    pub fn is_unknown_sentinel(&self) -> bool {
        matches!(self, FieldValue::Text(s) if s == UNKNOWN_SENTINEL)
    }

    /// Human-readable rendering for display fields. Whole numbers print
    /// without a trailing fraction.
    pub fn display_text(&self) -> String {
        match self {
            FieldValue::Number(n) => format_number(*n),
            FieldValue::Text(s) => s.clone(),
            FieldValue::Flag(b) => b.to_string(),
            other => other.to_json().to_string(),
        }
    }
}

/// Formats a numeric value, dropping the fraction for whole numbers.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

fn number_to_json(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        Value::Number((n as i64).into())
    } else {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

/// An object qualifies as a delta when it carries an `add` or `remove` key
/// holding an array of strings; other keys are ignored.
fn delta_from_object(map: &serde_json::Map<String, Value>) -> Option<FieldValue> {
    let add = string_items(map.get("add"));
    let remove = string_items(map.get("remove"));
    if add.is_none() && remove.is_none() {
        return None;
    }
    Some(FieldValue::Delta {
        add: add.unwrap_or_default(),
        remove: remove.unwrap_or_default(),
    })
}

fn string_items(value: Option<&Value>) -> Option<Vec<String>> {
    match value {
        Some(Value::Array(items)) => Some(
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
        ),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn scalars_convert_to_tagged_variants() {
        assert_eq!(
            FieldValue::from_json(&json!(42)),
            Some(FieldValue::Number(42.0))
        );
        assert_eq!(
            FieldValue::from_json(&json!("hi")),
            Some(FieldValue::Text("hi".to_string()))
        );
        assert_eq!(
            FieldValue::from_json(&json!(true)),
            Some(FieldValue::Flag(true))
        );
        assert_eq!(FieldValue::from_json(&json!(null)), None);
    }

    #[test]
    fn add_remove_object_becomes_delta() {
        let v = FieldValue::from_json(&json!({"add": ["shield"], "remove": ["sword"]})).unwrap();
        assert_eq!(
            v,
            FieldValue::Delta {
                add: vec!["shield".to_string()],
                remove: vec!["sword".to_string()],
            }
        );
    }

    #[test]
    fn plain_object_becomes_table() {
        let v = FieldValue::from_json(&json!({"ap": "💖"})).unwrap();
        match v {
            FieldValue::Table(table) => {
                assert_eq!(table.get("ap"), Some(&FieldValue::Text("💖".to_string())));
            }
            other => panic!("expected table, got {other:?}"),
        }
    }

    #[test]
    fn json_round_trip_preserves_structure() {
        let source = json!({"add": ["a", "b"], "remove": ["c"]});
        let v = FieldValue::from_json(&source).unwrap();
        assert_eq!(v.to_json(), source);

        let list = json!([1, "two", false]);
        let v = FieldValue::from_json(&list).unwrap();
        assert_eq!(v.to_json(), list);
    }

    #[test]
    fn whole_numbers_display_without_fraction() {
        assert_eq!(format_number(50.0), "50");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(2.5), "2.5");
    }

    #[test]
    fn truthiness_matches_gate_semantics() {
        assert!(FieldValue::Flag(true).is_truthy());
        assert!(!FieldValue::Flag(false).is_truthy());
        assert!(!FieldValue::Number(0.0).is_truthy());
        assert!(FieldValue::Number(1.0).is_truthy());
        assert!(!FieldValue::Text(String::new()).is_truthy());
    }
}
