pub mod document;
pub mod key;
pub mod value;

pub use document::{CharacterRecord, TrackerDocument, WorldData};
pub use key::{KeyRole, SYNC_GATE_KEYS, classify};
pub use value::{FieldValue, UNKNOWN_SENTINEL, format_number};
