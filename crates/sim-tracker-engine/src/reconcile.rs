//! Change reconciliation: applying `<field>Change` deltas against persisted
//! state and backfilling base values the current message omits.
//!
//! Two cooperating rules:
//! - a record carrying both `<field>` and `<field>Change` treats the change
//!   as transient display metadata; persisted state is never touched for it.
//! - a record carrying only `<field>Change` has its base value recovered from
//!   the store (numeric running total, or structured add/remove against a
//!   stored list), falling back to the `"?"` sentinel when no persisted state
//!   exists.
//!
//! Persist runs before backfill within the same pass, so a just-computed
//! value is immediately visible as the backfilled base.

use crate::model::{
    CharacterRecord, FieldValue, KeyRole, UNKNOWN_SENTINEL, WorldData, classify,
};
use crate::store::{Store, StoredValue};

/// Display/styling keys never written to the store.
const SYNC_EXCLUDED_KEYS: &[&str] = &[
    "bg",
    "bgColor",
    "internal_thought",
    "thought",
    "last_react",
    "health",
    "enableDataSync",
    "dataSync",
    "syncData",
    "trackChanges",
];

/// Reconciles the merged character list against persisted state, mutating the
/// records in place.
///
/// With persistence disabled the store is neither read nor written; every
/// missing base value backfills to the `"?"` sentinel instead.
pub fn reconcile(
    cards: &mut [CharacterRecord],
    world: &WorldData,
    store: &mut dyn Store,
    persistence_enabled: bool,
) {
    if persistence_enabled {
        persist_world(world, store);
        for card in cards.iter() {
            persist_character(card, store);
        }
    }

    for card in cards.iter_mut() {
        backfill_character(card, store, persistence_enabled);
    }
}

fn persist_world(world: &WorldData, store: &mut dyn Store) {
    for (key, value) in &world.fields {
        let name = format!("worldData_{key}");
        write_variable(store, &name, stored_value_of(value));
    }
}

fn persist_character(card: &CharacterRecord, store: &mut dyn Store) {
    if !card.sync_enabled() {
        return;
    }

    // First pass: direct value assignments for non-excluded keys.
    for (key, value) in &card.fields {
        if matches!(classify(key), KeyRole::ChangeOf(_)) {
            continue;
        }
        if SYNC_EXCLUDED_KEYS.contains(&key.as_str()) {
            continue;
        }
        let name = format!("{}_{}", card.name, key);
        write_variable(store, &name, stored_value_of(value));
    }

    // Second pass: change fields are applied to the store only when their
    // base field is absent from this update. A change shipped alongside its
    // base is an already-applied inline delta.
    for (base, delta) in card.change_fields() {
        if card.contains(&base) {
            log::debug!(
                "skipping {base}Change for {}: {base} is present in the update",
                card.name
            );
            continue;
        }
        let name = format!("{}_{}", card.name, base);
        match delta {
            FieldValue::Number(delta) if delta != 0.0 => {
                let current = read_number(&*store, &name);
                let updated = current + delta;
                log::debug!("updating {name}: {current} + {delta} = {updated}");
                write_variable(store, &name, StoredValue::Number(updated));
            }
            FieldValue::Delta { add, remove } => {
                let mut list = read_stored_list(&*store, &name);
                let mut modified = false;
                for item in add {
                    if !list.contains(&item) {
                        list.push(item);
                        modified = true;
                    }
                }
                for item in remove {
                    if let Some(position) = list.iter().position(|entry| *entry == item) {
                        list.remove(position);
                        modified = true;
                    }
                }
                if modified {
                    match serde_json::to_string(&list) {
                        Ok(text) => write_variable(store, &name, StoredValue::Text(text)),
                        Err(error) => log::warn!("could not serialize list for {name}: {error}"),
                    }
                }
            }
            _ => {}
        }
    }
}

fn backfill_character(card: &mut CharacterRecord, store: &dyn Store, persistence_enabled: bool) {
    for (base, delta) in card.change_fields() {
        if card.contains(&base) {
            continue;
        }

        if !persistence_enabled {
            card.fields
                .insert(base, FieldValue::Text(UNKNOWN_SENTINEL.to_string()));
            continue;
        }

        let name = format!("{}_{}", card.name, base);
        let value = match store.get(&name) {
            Ok(Some(StoredValue::Number(n))) => FieldValue::Number(n),
            Ok(Some(StoredValue::Text(text))) => backfill_from_text(&text, &delta),
            // Missing persisted state backfills to the sentinel; only delta
            // application above defaults to zero.
            Ok(None) => FieldValue::Text(UNKNOWN_SENTINEL.to_string()),
            Err(error) => {
                log::warn!("reading {name} failed: {error}; using placeholder");
                FieldValue::Text(UNKNOWN_SENTINEL.to_string())
            }
        };
        card.fields.insert(base, value);
    }
}

/// Interprets stored text as a backfill value. List-looking text is parsed;
/// when that fails and the change itself was list-shaped, a representation is
/// synthesized from the delta so the display still has something meaningful.
fn backfill_from_text(text: &str, delta: &FieldValue) -> FieldValue {
    if !text.starts_with('[') {
        return FieldValue::Text(text.to_string());
    }
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(value @ serde_json::Value::Array(_)) => {
            FieldValue::from_json(&value).unwrap_or_else(|| FieldValue::List(Vec::new()))
        }
        _ => match delta {
            FieldValue::Delta { add, remove } => synthesized_list(add, remove),
            _ => FieldValue::Text(text.to_string()),
        },
    }
}

fn synthesized_list(add: &[String], remove: &[String]) -> FieldValue {
    let tag = |item: &str, change: &str| {
        FieldValue::Table(
            [
                ("name".to_string(), FieldValue::Text(item.to_string())),
                ("change".to_string(), FieldValue::Text(change.to_string())),
            ]
            .into_iter()
            .collect(),
        )
    };
    let items = add
        .iter()
        .map(|item| tag(item, "add"))
        .chain(remove.iter().map(|item| tag(item, "remove")))
        .collect();
    FieldValue::List(items)
}

fn stored_value_of(value: &FieldValue) -> StoredValue {
    match value {
        FieldValue::Number(n) => StoredValue::Number(*n),
        FieldValue::Text(s) => StoredValue::Text(s.clone()),
        FieldValue::Flag(b) => StoredValue::Text(b.to_string()),
        other => StoredValue::Text(other.to_json().to_string()),
    }
}

fn read_number(store: &dyn Store, name: &str) -> f64 {
    match store.get(name) {
        Ok(Some(value)) => value.as_number().unwrap_or(0.0),
        Ok(None) => 0.0,
        Err(error) => {
            log::warn!("reading {name} failed: {error}; defaulting to 0");
            0.0
        }
    }
}

fn read_stored_list(store: &dyn Store, name: &str) -> Vec<String> {
    match store.get(name) {
        Ok(Some(StoredValue::Text(text))) => match serde_json::from_str::<Vec<String>>(&text) {
            Ok(list) => list,
            Err(_) => {
                log::debug!("stored value for {name} is not a list; starting empty");
                Vec::new()
            }
        },
        Ok(_) => Vec::new(),
        Err(error) => {
            log::warn!("reading {name} failed: {error}; starting empty");
            Vec::new()
        }
    }
}

fn write_variable(store: &mut dyn Store, name: &str, value: StoredValue) {
    if let Err(error) = store.set(name, value) {
        log::warn!("writing {name} failed: {error}");
    }
}
