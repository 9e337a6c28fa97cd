//! End-to-end render pass for one chat message: scan → parse → normalize →
//! merge → reconcile → view models.

use crate::display::cards::{CardOptions, TrackerViewModel, build_view_models};
use crate::format::{self, scan};
use crate::merge::merge;
use crate::model::TrackerDocument;
use crate::normalize::{SchemaError, normalize};
use crate::reconcile::reconcile;
use crate::session::RenderSessionState;
use crate::store::Store;

/// Inputs the adapter resolves from its settings for one render pass.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Info-string tag marking tracker code blocks.
    pub identifier: String,
    pub default_bg_color: String,
    pub show_thought_bubble: bool,
    /// When false the pass runs in re-render mode: the store is untouched
    /// and missing base values backfill to the placeholder sentinel.
    pub persistence_enabled: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// The message carried tracker blocks but none yielded usable data.
    #[error("no tracker data could be recovered from the message")]
    NoUsableData,
}

/// Runs the full pipeline over one message.
///
/// Returns `Ok(None)` when the message has no tracker content to render. The
/// render pass is the unit of failure containment: on any error the
/// generation-in-progress marker is restored before returning, and only this
/// message's tracker output is lost.
pub fn render_message(
    message: &str,
    options: &RenderOptions,
    store: &mut dyn Store,
    session: &mut RenderSessionState,
) -> Result<Option<TrackerViewModel>, RenderError> {
    let result = render_message_inner(message, options, store, session);
    if result.is_err() {
        session.generation_in_progress = false;
    }
    result
}

fn render_message_inner(
    message: &str,
    options: &RenderOptions,
    store: &mut dyn Store,
    session: &mut RenderSessionState,
) -> Result<Option<TrackerViewModel>, RenderError> {
    let blocks = scan::scan_blocks(message, &options.identifier);

    let bodies: Vec<String> = if blocks.is_empty() {
        // A message without a block falls back to the last seen tracker
        // text, but only in re-render mode; fresh data never comes from it.
        match (&session.last_tracker_text, options.persistence_enabled) {
            (Some(last), false) => vec![last.clone()],
            _ => return Ok(None),
        }
    } else {
        if options.persistence_enabled {
            session.generation_in_progress = true;
        }
        blocks.into_iter().map(|b| b.body).collect()
    };

    let mut documents = Vec::new();
    for body in &bodies {
        let tree = match format::parse(body, None) {
            Ok(tree) => tree,
            Err(error) => {
                log::warn!("skipping malformed tracker block: {error}");
                continue;
            }
        };
        documents.push((body, normalize(&tree)?));
    }

    if documents.is_empty() {
        return Err(RenderError::NoUsableData);
    }

    if let Some((body, _)) = documents.last() {
        session.last_tracker_text = Some((*body).clone());
    }

    let mut merged = merge(documents.into_iter().map(|(_, doc)| doc).collect());
    if merged.cards.is_empty() {
        return Ok(None);
    }

    reconcile(
        &mut merged.cards,
        &merged.world,
        store,
        options.persistence_enabled,
    );

    Ok(Some(finish(&merged, options)))
}

fn finish(document: &TrackerDocument, options: &RenderOptions) -> TrackerViewModel {
    build_view_models(
        document,
        &CardOptions {
            default_bg_color: options.default_bg_color.clone(),
            show_thought_bubble: options.show_thought_bubble,
        },
    )
}
