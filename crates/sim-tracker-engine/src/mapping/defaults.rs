//! Static knowledge table for well-known stat fields.

use super::FieldKind;

/// Per-numeric-value icon overrides, e.g. health 0/1/2.
pub type ValueIcons = &'static [(i64, &'static str)];

const HEALTH_ICONS: ValueIcons = &[(0, "💚"), (1, "🤕"), (2, "💀")];
const REACT_ICONS: ValueIcons = &[(0, "😐"), (1, "👍"), (2, "👎")];

#[derive(Debug, Clone, Copy)]
pub struct TableEntry {
    pub display_name: &'static str,
    pub icon: &'static str,
    pub kind: FieldKind,
    pub max_value: Option<f64>,
    pub custom_icons: Option<ValueIcons>,
}

const fn stat(display_name: &'static str, icon: &'static str, max_value: Option<f64>) -> TableEntry {
    TableEntry {
        display_name,
        icon,
        kind: FieldKind::Stat,
        max_value,
        custom_icons: None,
    }
}

const fn of_kind(display_name: &'static str, icon: &'static str, kind: FieldKind) -> TableEntry {
    TableEntry {
        display_name,
        icon,
        kind,
        max_value: None,
        custom_icons: None,
    }
}

/// Looks up a field key in the static default table.
pub fn lookup(key: &str) -> Option<TableEntry> {
    use FieldKind::*;
    let entry = match key {
        // Core stats
        "ap" => stat("AFFECTION", "❤️", Some(200.0)),
        "dp" => stat("DESIRE", "🔥", Some(150.0)),
        "tp" => stat("TRUST", "🤝", Some(150.0)),
        "cp" => stat("CONTEMPT", "💔", Some(150.0)),

        // Change indicators
        "apChange" => of_kind("AFFECTION CHANGE", "❤️", Change),
        "dpChange" => of_kind("DESIRE CHANGE", "🔥", Change),
        "tpChange" => of_kind("TRUST CHANGE", "🤝", Change),
        "cpChange" => of_kind("CONTEMPT CHANGE", "💔", Change),

        // Status fields
        "relationshipStatus" => of_kind("RELATIONSHIP", "💑", Status),
        "desireStatus" => of_kind("DESIRE STATUS", "🔥", Status),
        "internal_thought" | "thought" => of_kind("THOUGHTS", "💭", Thought),

        // Health and activity
        "health" => TableEntry {
            display_name: "HEALTH",
            icon: "💚",
            kind: Stat,
            max_value: Some(2.0),
            custom_icons: Some(HEALTH_ICONS),
        },
        "inactive" => of_kind("ACTIVITY", "⚡", Boolean),
        "inactiveReason" => of_kind("INACTIVE REASON", "😴", InactiveReason),

        // Time tracking
        "days_since_first_meeting" => stat("DAYS KNOWN", "📅", None),
        "days_preg" => stat("PREGNANT DAYS", "🤰", None),

        // Reactions
        "last_react" => TableEntry {
            display_name: "REACTION",
            icon: "😐",
            kind: Reaction,
            max_value: None,
            custom_icons: Some(REACT_ICONS),
        },

        // Appearance
        "bg" => of_kind("BACKGROUND", "🎨", Color),

        // Pregnancy
        "preg" => of_kind("PREGNANT", "🤰", Boolean),
        "conception_date" => of_kind("CONCEPTION DATE", "📅", Date),

        // Generic fallbacks for common patterns
        "level" => stat("LEVEL", "⭐", None),
        "xp" => stat("EXPERIENCE", "⚡", None),
        "energy" => stat("ENERGY", "🔋", Some(100.0)),
        "stamina" => stat("STAMINA", "💪", Some(100.0)),
        "mood" => stat("MOOD", "😊", None),
        "stress" => stat("STRESS", "😰", None),
        "happiness" => stat("HAPPINESS", "😄", None),
        "anger" => stat("ANGER", "😡", None),
        "fear" => stat("FEAR", "😨", None),
        "love" => stat("LOVE", "💕", None),
        "lust" => stat("LUST", "💋", None),
        "friendship" => stat("FRIENDSHIP", "👫", None),
        "respect" => stat("RESPECT", "🙏", None),
        "loyalty" => stat("LOYALTY", "🤝", None),

        // RPG-style stats
        "strength" => stat("STRENGTH", "💪", None),
        "dexterity" => stat("DEXTERITY", "🤸", None),
        "intelligence" => stat("INTELLIGENCE", "🧠", None),
        "wisdom" => stat("WISDOM", "🦉", None),
        "charisma" => stat("CHARISMA", "✨", None),
        "constitution" => stat("CONSTITUTION", "🛡️", None),

        // Generic numeric stats
        "points" => stat("POINTS", "⭐", None),
        "score" => stat("SCORE", "🎯", None),
        "rating" => stat("RATING", "⭐", None),

        _ => return None,
    };
    Some(entry)
}

/// Whether `key` has a static table entry. Table fields sort ahead of
/// synthesized ones in the display list.
pub fn is_table_key(key: &str) -> bool {
    lookup(key).is_some()
}
