//! Field mapping resolution: label, icon, semantic type, and suggested
//! maximum for a single field key/value pair.
//!
//! Icon resolution consults a priority chain of override sources before any
//! default applies:
//!   1. character-level `icons` table (`character.icons.<key>`)
//!   2. world-level `icons` table (`worldData.icons.<key>`)
//!   3. character-level icon keys: `<key>Icon`, `<key>_icon`, `<key>.icon`,
//!      `icon_<key>`, `icons.<key>` (literal dotted keys), first hit wins
//!   4. static default table
//!   5. key-name pattern heuristics

pub mod defaults;

use std::sync::OnceLock;

use regex::Regex;

use crate::model::{CharacterRecord, FieldValue, WorldData};

pub use defaults::is_table_key;

/// Semantic type of a resolved field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Stat,
    Change,
    Status,
    Thought,
    Boolean,
    Date,
    Color,
    Reaction,
    InactiveReason,
}

/// Display information derived for one field. Recomputed on every render
/// pass; never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMapping {
    pub key: String,
    pub display_name: String,
    pub icon: String,
    pub kind: FieldKind,
    pub max_value: Option<f64>,
    pub custom_icons: Option<defaults::ValueIcons>,
}

/// Ordered category rules applied to unmapped keys. Keys can match several
/// categories, so evaluation order is fixed and the first hit wins.
const PATTERN_RULES: &[(&[&str], &str, FieldKind)] = &[
    (&["change", "delta"], "📈", FieldKind::Change),
    (&["status", "state"], "ℹ️", FieldKind::Status),
    (&["thought", "think"], "💭", FieldKind::Thought),
    (&["date", "time"], "📅", FieldKind::Date),
    (&["color", "bg", "background"], "🎨", FieldKind::Color),
    (&["health", "hp"], "💚", FieldKind::Stat),
    (&["energy", "stamina"], "🔋", FieldKind::Stat),
    (&["love", "romance"], "💕", FieldKind::Stat),
    (&["anger", "rage"], "😡", FieldKind::Stat),
    (&["fear", "scared"], "😨", FieldKind::Stat),
    (&["happy", "joy"], "😄", FieldKind::Stat),
    (&["sad", "sorrow"], "😢", FieldKind::Stat),
    (&["stress", "anxiety"], "😰", FieldKind::Stat),
    (&["trust", "faith"], "🤝", FieldKind::Stat),
    (&["desire", "lust", "arousal"], "🔥", FieldKind::Stat),
    (&["friend", "buddy"], "👫", FieldKind::Stat),
    (&["respect", "honor"], "🙏", FieldKind::Stat),
    (&["level", "lvl"], "⭐", FieldKind::Stat),
    (&["xp", "experience", "exp"], "⚡", FieldKind::Stat),
    (&["strength", "str"], "💪", FieldKind::Stat),
    (&["intelligence", "int", "smart"], "🧠", FieldKind::Stat),
    (&["wisdom", "wis"], "🦉", FieldKind::Stat),
    (&["charisma", "cha", "charm"], "✨", FieldKind::Stat),
    (&["dexterity", "dex", "agility"], "🤸", FieldKind::Stat),
    (&["constitution", "con", "endurance"], "🛡️", FieldKind::Stat),
];

fn date_regex() -> &'static Regex {
    static DATE_REGEX: OnceLock<Regex> = OnceLock::new();
    DATE_REGEX.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("Invalid date regex"))
}

fn color_regex() -> &'static Regex {
    static COLOR_REGEX: OnceLock<Regex> = OnceLock::new();
    COLOR_REGEX.get_or_init(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("Invalid color regex"))
}

/// Resolves the display mapping for one field. Total function: any key/value
/// pair produces some mapping.
pub fn resolve(
    key: &str,
    value: &FieldValue,
    character: &CharacterRecord,
    world: &WorldData,
) -> FieldMapping {
    let custom_icon = custom_icon(key, character, world);

    // A table hit is used as the mapping base; only its icon can be
    // overridden.
    if let Some(entry) = defaults::lookup(key) {
        let mut mapping = FieldMapping {
            key: key.to_string(),
            display_name: entry.display_name.to_string(),
            icon: entry.icon.to_string(),
            kind: entry.kind,
            max_value: entry.max_value,
            custom_icons: entry.custom_icons,
        };
        if let Some(icon) = custom_icon {
            mapping.icon = icon;
        }
        return mapping;
    }

    // Synthesize: pattern heuristics, then value-shape overrides, then the
    // custom icon on top of everything.
    let lower = key.to_lowercase();
    let display_name = key.to_uppercase().replace('_', " ");
    let mut icon = "📊";
    let mut kind = FieldKind::Stat;

    for &(patterns, rule_icon, rule_kind) in PATTERN_RULES {
        if patterns.iter().any(|p| lower.contains(*p)) {
            icon = rule_icon;
            kind = rule_kind;
            break;
        }
    }

    let mut icon = icon.to_string();
    match value {
        FieldValue::Flag(truthy) => {
            kind = FieldKind::Boolean;
            icon = if *truthy { "✅" } else { "❌" }.to_string();
        }
        FieldValue::Text(s) if date_regex().is_match(s) => {
            kind = FieldKind::Date;
            icon = "📅".to_string();
        }
        FieldValue::Text(s) if color_regex().is_match(s) => {
            kind = FieldKind::Color;
            icon = "🎨".to_string();
        }
        _ => {}
    }

    if let Some(custom) = custom_icon {
        icon = custom;
    }

    FieldMapping {
        key: key.to_string(),
        display_name,
        icon,
        kind,
        max_value: value.as_number().map(|n| (n * 1.2).max(100.0)),
        custom_icons: None,
    }
}

/// Walks the icon override chain; the first source with an icon wins.
fn custom_icon(key: &str, character: &CharacterRecord, world: &WorldData) -> Option<String> {
    if let Some(icon) = character.icon_override(key) {
        return Some(icon.to_string());
    }
    if let Some(icon) = world.icon_override(key) {
        return Some(icon.to_string());
    }
    let candidates = [
        format!("{key}Icon"),
        format!("{key}_icon"),
        format!("{key}.icon"),
        format!("icon_{key}"),
        format!("icons.{key}"),
    ];
    for candidate in candidates {
        if let Some(FieldValue::Text(icon)) = character.get(&candidate)
            && !icon.is_empty()
        {
            return Some(icon.clone());
        }
    }
    None
}
