pub mod display;
pub mod format;
pub mod mapping;
pub mod merge;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod reconcile;
pub mod session;
pub mod store;

// Re-export key types for easier usage
pub use display::cards::{CardOptions, CardViewModel, TrackerViewModel, build_view_models};
pub use display::{DisplayField, extract_displayable, stats_markup};
pub use format::{
    BlockFormat, ParseError, convert_block, detect_format, parse, render_block, serialize,
};
pub use mapping::{FieldKind, FieldMapping, resolve};
pub use merge::merge;
pub use model::{CharacterRecord, FieldValue, KeyRole, TrackerDocument, WorldData};
pub use normalize::{SchemaError, normalize};
pub use pipeline::{RenderError, RenderOptions, render_message};
pub use reconcile::reconcile;
pub use session::RenderSessionState;
pub use store::{MemoryStore, Store, StoreError, StoredValue};
