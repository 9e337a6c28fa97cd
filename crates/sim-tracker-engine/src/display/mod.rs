pub mod cards;

use crate::mapping::{self, FieldKind, FieldMapping};
use crate::model::{CharacterRecord, FieldValue, KeyRole, WorldData, classify};

/// A fully resolved, render-ready stat entry.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayField {
    pub mapping: FieldMapping,
    pub value: FieldValue,
    pub change_value: f64,
}

/// Non-stat keys never shown in the dynamic stat list; they feed dedicated
/// card slots (thought bubble, health icon, background, ...) instead.
const EXCLUDED_DISPLAY_KEYS: &[&str] = &[
    "name",
    "internal_thought",
    "thought",
    "relationshipStatus",
    "desireStatus",
    "inactive",
    "inactiveReason",
    "bg",
    "health",
    "last_react",
    "preg",
    "conception_date",
    "days_preg",
];

/// Turns a reconciled character record into the ordered list of displayable
/// stats.
///
/// Change companions, icon metadata, hidden fields, and the fixed exclusion
/// set are filtered out; only numeric (or `"?"`-sentinel) fields whose
/// resolved type is `stat` survive. Fields from the static default table sort
/// ahead of synthesized ones, alphabetically by display name within each
/// group.
pub fn extract_displayable(card: &CharacterRecord, world: &WorldData) -> Vec<DisplayField> {
    let mut fields = Vec::new();

    for (key, value) in &card.fields {
        match classify(key) {
            KeyRole::ChangeOf(_)
            | KeyRole::IconFor(_)
            | KeyRole::IconsTable
            | KeyRole::Hidden
            | KeyRole::Name => continue,
            KeyRole::SyncGate | KeyRole::Base => {}
        }
        if EXCLUDED_DISPLAY_KEYS.contains(&key.as_str()) {
            continue;
        }
        if !matches!(value, FieldValue::Number(_)) && !value.is_unknown_sentinel() {
            continue;
        }

        let mapping = mapping::resolve(key, value, card, world);
        if mapping.kind != FieldKind::Stat {
            continue;
        }

        let change_value = card
            .get(&format!("{key}Change"))
            .and_then(FieldValue::as_number)
            .unwrap_or(0.0);

        fields.push(DisplayField {
            mapping,
            value: value.clone(),
            change_value,
        });
    }

    fields.sort_by(|a, b| {
        let a_rank = usize::from(!mapping::is_table_key(&a.mapping.key));
        let b_rank = usize::from(!mapping::is_table_key(&b.mapping.key));
        a_rank
            .cmp(&b_rank)
            .then_with(|| a.mapping.display_name.cmp(&b.mapping.display_name))
    });

    fields
}

/// Renders the sorted field list into markup fragments, one per stat. Pure
/// and stateless; empty input yields a single "no stats" fragment.
pub fn stats_markup(fields: &[DisplayField]) -> String {
    if fields.is_empty() {
        return "<div class=\"no-stats\">No stats available</div>".to_string();
    }

    fields
        .iter()
        .map(|field| {
            let title = html_escape::encode_text(&field.mapping.display_name);
            let icon = html_escape::encode_text(&field.mapping.icon);
            let value = field.value.display_text();
            let value = html_escape::encode_text(&value);

            let change = if field.change_value != 0.0 {
                let direction = if field.change_value > 0.0 {
                    "positive"
                } else {
                    "negative"
                };
                let sign = if field.change_value > 0.0 { "+" } else { "" };
                let amount = crate::model::format_number(field.change_value);
                format!(
                    "<div class=\"change-indicator {direction}\">{sign}{amount}</div>"
                )
            } else {
                String::new()
            };

            format!(
                "<div class=\"stat-item\">\
                 <div class=\"stat-title\">{title}</div>\
                 <div class=\"stat-container\">\
                 <div class=\"stat-icon\">{icon}</div>\
                 <div class=\"stat-value\">{value}</div>\
                 {change}\
                 </div>\
                 </div>"
            )
        })
        .collect()
}

/// The inline fragment shown in place of a card when no character data could
/// be recovered from a message at all.
pub fn error_fragment() -> String {
    "<div class=\"sim-tracker-error\">Invalid tracker data in code block.</div>".to_string()
}
