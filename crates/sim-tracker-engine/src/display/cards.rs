//! Card view-model assembly: the render-ready records handed to the external
//! card-template renderer.

use crate::model::{CharacterRecord, FieldValue, TrackerDocument, WorldData};

use super::{DisplayField, extract_displayable, stats_markup};

const UNKNOWN_DATE: &str = "Unknown Date";
const UNKNOWN_TIME: &str = "Unknown Time";
const NO_THOUGHT: &str = "No thought recorded.";
const UNKNOWN_RELATIONSHIP: &str = "Unknown Status";
const UNKNOWN_DESIRE: &str = "Unknown Desire";

/// Factor applied per channel when deriving the darker card accent color.
const DARKEN_FACTOR: f64 = 0.7;

/// Render-ready model for one character card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardViewModel {
    pub character_name: String,
    pub current_date: String,
    pub current_time: String,
    pub internal_thought: String,
    pub relationship_status: String,
    pub desire_status: String,
    pub inactive: bool,
    pub inactive_reason: f64,
    pub bg_color: String,
    pub darker_bg_color: String,
    pub reaction_emoji: String,
    pub health_icon: Option<String>,
    pub show_thought_bubble: bool,
    pub dynamic_fields: Vec<DisplayField>,
    pub dynamic_stats_html: String,
}

/// Document-level envelope, for templates that render all cards together.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerViewModel {
    pub cards: Vec<CardViewModel>,
    pub current_date: String,
    pub current_time: String,
    pub bg_color: String,
    pub darker_bg_color: String,
    pub world: WorldData,
}

/// Options the surrounding adapter resolves from its settings.
#[derive(Debug, Clone)]
pub struct CardOptions {
    pub default_bg_color: String,
    pub show_thought_bubble: bool,
}

/// Builds the full set of card view-models for a reconciled document.
pub fn build_view_models(document: &TrackerDocument, options: &CardOptions) -> TrackerViewModel {
    let current_date = document
        .world
        .current_date()
        .unwrap_or(UNKNOWN_DATE)
        .to_string();
    let current_time = document
        .world
        .current_time()
        .unwrap_or(UNKNOWN_TIME)
        .to_string();
    let default_bg = document
        .world
        .bg_color()
        .unwrap_or(&options.default_bg_color)
        .to_string();

    let cards = document
        .cards
        .iter()
        .map(|card| {
            build_card(
                card,
                &document.world,
                &current_date,
                &current_time,
                &default_bg,
                options.show_thought_bubble,
            )
        })
        .collect();

    TrackerViewModel {
        cards,
        current_date,
        current_time,
        darker_bg_color: darken_color(&default_bg),
        bg_color: default_bg,
        world: document.world.clone(),
    }
}

fn build_card(
    card: &CharacterRecord,
    world: &WorldData,
    current_date: &str,
    current_time: &str,
    default_bg: &str,
    show_thought_bubble: bool,
) -> CardViewModel {
    let text_field = |keys: &[&str], fallback: &str| {
        keys.iter()
            .find_map(|k| card.get(k).and_then(FieldValue::as_text))
            .unwrap_or(fallback)
            .to_string()
    };

    let bg_color = text_field(&["bg", "bgColor"], default_bg);
    let dynamic_fields = extract_displayable(card, world);
    let dynamic_stats_html = stats_markup(&dynamic_fields);

    CardViewModel {
        character_name: card.name.clone(),
        current_date: current_date.to_string(),
        current_time: current_time.to_string(),
        internal_thought: text_field(&["internal_thought", "thought"], NO_THOUGHT),
        relationship_status: text_field(&["relationshipStatus"], UNKNOWN_RELATIONSHIP),
        desire_status: text_field(&["desireStatus"], UNKNOWN_DESIRE),
        inactive: card.get("inactive").is_some_and(FieldValue::is_truthy),
        inactive_reason: card
            .get("inactiveReason")
            .and_then(FieldValue::as_number)
            .unwrap_or(0.0),
        darker_bg_color: darken_color(&bg_color),
        bg_color,
        reaction_emoji: reaction_emoji(card.get("last_react")).to_string(),
        health_icon: health_icon(card.get("health")).map(str::to_string),
        show_thought_bubble,
        dynamic_fields,
        dynamic_stats_html,
    }
}

/// Maps a `last_react` value to its emoji: 1 approval, 2 disapproval,
/// anything else neutral.
pub fn reaction_emoji(value: Option<&FieldValue>) -> &'static str {
    match value.and_then(FieldValue::as_number) {
        Some(n) if n == 1.0 => "👍",
        Some(n) if n == 2.0 => "👎",
        _ => "😐",
    }
}

/// Maps a `health` value to an overlay icon; healthy characters get none.
pub fn health_icon(value: Option<&FieldValue>) -> Option<&'static str> {
    match value.and_then(FieldValue::as_number) {
        Some(n) if n == 1.0 => Some("🤕"),
        Some(n) if n == 2.0 => Some("💀"),
        _ => None,
    }
}

/// Darkens a `#RRGGBB` color for the card's accent gradient. Anything that
/// is not a six-digit hex color is returned unchanged.
pub fn darken_color(color: &str) -> String {
    let Some(hex) = color.strip_prefix('#') else {
        return color.to_string();
    };
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return color.to_string();
    }

    let channel = |range: std::ops::Range<usize>| {
        let value = u8::from_str_radix(&hex[range], 16).unwrap_or(0);
        (f64::from(value) * DARKEN_FACTOR).round() as u8
    };

    format!(
        "#{:02x}{:02x}{:02x}",
        channel(0..2),
        channel(2..4),
        channel(4..6)
    )
}
