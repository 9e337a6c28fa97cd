/// Mutable state the surrounding UI adapter holds across render passes.
///
/// The pipeline itself is pure over explicit inputs; everything that used to
/// be ambient lives here: the generation-in-progress marker the adapter uses
/// to defer visible side effects, the content buffers deferred while
/// generation runs, and the last raw tracker text used as a fallback when a
/// message carries no block of its own.
#[derive(Debug, Default)]
pub struct RenderSessionState {
    /// Deferred-apply marker, not a lock: data computations ignore it.
    pub generation_in_progress: bool,
    pub pending_left_content: Option<String>,
    pub pending_right_content: Option<String>,
    /// Body of the most recently parsed tracker block.
    pub last_tracker_text: Option<String>,
}

impl RenderSessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the end of a generation and hands back any content the adapter
    /// deferred while it ran.
    pub fn finish_generation(&mut self) -> (Option<String>, Option<String>) {
        self.generation_in_progress = false;
        (
            self.pending_left_content.take(),
            self.pending_right_content.take(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finish_generation_clears_flag_and_drains_buffers() {
        let mut session = RenderSessionState::new();
        session.generation_in_progress = true;
        session.pending_left_content = Some("left".to_string());

        let (left, right) = session.finish_generation();
        assert!(!session.generation_in_progress);
        assert_eq!(left.as_deref(), Some("left"));
        assert_eq!(right, None);
        assert_eq!(session.pending_left_content, None);
    }
}
