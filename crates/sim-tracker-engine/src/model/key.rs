/// Role a field key plays inside a character record, derived from the
/// naming conventions tracker blocks use (`<field>Change`, `<field>Icon`,
/// `icon_<field>`, suffix `Hidden`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyRole {
    /// The reserved `name` key.
    Name,
    /// `<base>Change` — a delta companion to `<base>`.
    ChangeOf(String),
    /// An icon override for another field.
    IconFor(String),
    /// The bulk `icons` override table.
    IconsTable,
    /// Suffix `Hidden` — excluded from display entirely.
    Hidden,
    /// One of the keys that opts a character into persistence.
    SyncGate,
    /// An ordinary stat/value field.
    Base,
}

/// Keys whose truthy value opts a character record into persistence.
pub const SYNC_GATE_KEYS: &[&str] = &["enableDataSync", "dataSync", "syncData", "trackChanges"];

/// Classifies a field key by its naming convention. Computed once per record
/// walk instead of re-matching suffixes at every use site.
pub fn classify(key: &str) -> KeyRole {
    if key == "name" {
        return KeyRole::Name;
    }
    if key == "icons" {
        return KeyRole::IconsTable;
    }
    if SYNC_GATE_KEYS.contains(&key) {
        return KeyRole::SyncGate;
    }
    if let Some(base) = key.strip_suffix("Change")
        && !base.is_empty()
    {
        return KeyRole::ChangeOf(base.to_string());
    }
    if let Some(base) = key.strip_suffix("Icon")
        && !base.is_empty()
    {
        return KeyRole::IconFor(base.to_string());
    }
    if let Some(base) = key.strip_suffix("_icon")
        && !base.is_empty()
    {
        return KeyRole::IconFor(base.to_string());
    }
    if let Some(base) = key.strip_prefix("icon_")
        && !base.is_empty()
    {
        return KeyRole::IconFor(base.to_string());
    }
    if key.ends_with("Hidden") && key != "Hidden" {
        return KeyRole::Hidden;
    }
    KeyRole::Base
}
