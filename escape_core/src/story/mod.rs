//! Story overlay playback.
//!
//! A story is a short full-screen sequence of lines. Advance requests are
//! latched and resolved in [`StoryPlayer::tick`], so a key press, a click and
//! an auto-advance landing in the same frame move the story by one line only.

use room_rules::{StorySequence, Timestamp};
use serde::Serialize;

use crate::error::ActionError;
use crate::modal::ModalStack;

#[derive(Debug, Clone, Copy, PartialEq)]
enum StoryState {
    Closed,
    Showing {
        index: usize,
        next_auto: Option<Timestamp>,
    },
}

/// What the renderer needs to draw the overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoryView {
    pub title: String,
    pub line: String,
    pub index: usize,
    pub total: usize,
    pub allow_skip: bool,
    pub overlay_alpha: f32,
}

/// Plays one [`StorySequence`] at a time.
#[derive(Debug, Clone)]
pub struct StoryPlayer {
    sequence: Option<StorySequence>,
    state: StoryState,
    /// Whether this player owns a block on the modal stack.
    pushed_block: bool,
    advance_requested: bool,
    skip_requested: bool,
}

impl Default for StoryPlayer {
    fn default() -> Self {
        Self {
            sequence: None,
            state: StoryState::Closed,
            pushed_block: false,
            advance_requested: false,
            skip_requested: false,
        }
    }
}

impl StoryPlayer {
    /// Start a sequence from its first line, replacing any story already showing.
    pub fn play(&mut self, sequence: StorySequence, now: Timestamp, modal: &mut ModalStack) -> Result<(), ActionError> {
        if sequence.lines.is_empty() {
            return Err(ActionError::MissingTarget("story lines".into()));
        }
        if self.is_open() {
            self.close(modal);
        }

        tracing::info!(id = %sequence.id, lines = sequence.lines.len(), "story opened");

        if sequence.block_input {
            modal.push();
            self.pushed_block = true;
        } else {
            modal.apply();
        }

        self.state = StoryState::Showing {
            index: 0,
            next_auto: sequence.auto_advance().map(|secs| now.after(secs)),
        };
        self.sequence = Some(sequence);
        self.advance_requested = false;
        self.skip_requested = false;
        Ok(())
    }

    pub fn request_advance(&mut self) {
        if self.is_open() {
            self.advance_requested = true;
        }
    }

    /// Ask to close early. Ignored for sequences that don't allow skipping.
    pub fn request_skip(&mut self) {
        if self.is_open() {
            self.skip_requested = true;
        }
    }

    /// Resolve latched input and auto-advance. Returns `true` if the story closed.
    pub fn tick(&mut self, now: Timestamp, modal: &mut ModalStack) -> bool {
        let advance = std::mem::take(&mut self.advance_requested);
        let skip = std::mem::take(&mut self.skip_requested);

        let StoryState::Showing { next_auto, .. } = self.state else {
            return false;
        };

        if skip && self.allow_skip() {
            self.close(modal);
            return true;
        }

        let auto_due = next_auto.is_some_and(|due| now >= due);
        if advance || auto_due {
            return self.advance(now, modal);
        }
        false
    }

    fn advance(&mut self, now: Timestamp, modal: &mut ModalStack) -> bool {
        let StoryState::Showing { index, .. } = self.state else {
            return false;
        };
        let Some(sequence) = &self.sequence else {
            self.close(modal);
            return true;
        };

        let next = index + 1;
        if next >= sequence.lines.len() {
            self.close(modal);
            return true;
        }

        self.state = StoryState::Showing {
            index: next,
            next_auto: sequence.auto_advance().map(|secs| now.after(secs)),
        };
        false
    }

    /// Close the overlay and release exactly the block it took.
    pub fn close(&mut self, modal: &mut ModalStack) {
        if !self.is_open() {
            return;
        }
        if let Some(sequence) = &self.sequence {
            tracing::info!(id = %sequence.id, "story closed");
        }

        let pushed = self.pushed_block;
        self.clear();
        if pushed {
            modal.pop();
        } else {
            modal.apply();
        }
    }

    /// Forget the story without touching the modal stack (the stack is reset separately).
    pub fn reset(&mut self) {
        self.clear();
    }

    fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, StoryState::Showing { .. })
    }

    fn allow_skip(&self) -> bool {
        self.sequence.as_ref().is_some_and(|seq| seq.allow_skip)
    }

    pub fn view(&self) -> Option<StoryView> {
        let StoryState::Showing { index, .. } = self.state else {
            return None;
        };
        let sequence = self.sequence.as_ref()?;
        Some(StoryView {
            title: sequence.title.clone(),
            line: sequence.lines.get(index)?.clone(),
            index,
            total: sequence.lines.len(),
            allow_skip: sequence.allow_skip,
            overlay_alpha: sequence.overlay_alpha,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::Detached;

    fn at(secs: f64) -> Timestamp {
        Timestamp::from_secs(secs)
    }

    fn modal() -> ModalStack {
        ModalStack::new(Box::new(Detached))
    }

    #[test]
    fn test_manual_story_pops_once() {
        let mut modal = modal();
        let mut story = StoryPlayer::default();
        story
            .play(StorySequence::new(["one", "two", "three"]), at(0.0), &mut modal)
            .unwrap();
        assert_eq!(modal.block_count(), 1);

        let mut closed = 0;
        for i in 0..4 {
            story.request_advance();
            if story.tick(at(i as f64), &mut modal) {
                closed += 1;
            }
        }

        assert_eq!(closed, 1);
        assert!(!story.is_open());
        assert_eq!(modal.block_count(), 0);
    }

    #[test]
    fn test_one_advance_per_tick() {
        let mut modal = modal();
        let mut story = StoryPlayer::default();
        let seq = StorySequence::new(["a", "b", "c"]).with_auto_advance(1.0);
        story.play(seq, at(0.0), &mut modal).unwrap();

        // Manual press and auto-advance in the same frame.
        story.request_advance();
        story.request_advance();
        story.tick(at(1.5), &mut modal);

        assert_eq!(story.view().unwrap().line, "b");
    }

    #[test]
    fn test_auto_advance() {
        let mut modal = modal();
        let mut story = StoryPlayer::default();
        story
            .play(StorySequence::new(["a", "b"]).with_auto_advance(2.0), at(0.0), &mut modal)
            .unwrap();

        assert!(!story.tick(at(1.0), &mut modal));
        assert_eq!(story.view().unwrap().index, 0);
        assert!(!story.tick(at(2.0), &mut modal));
        assert_eq!(story.view().unwrap().index, 1);
        assert!(story.tick(at(4.0), &mut modal));
        assert_eq!(modal.block_count(), 0);
    }

    #[test]
    fn test_skip_respects_allow_skip() {
        let mut modal = modal();
        let mut story = StoryPlayer::default();
        story
            .play(StorySequence::new(["a", "b"]).with_allow_skip(false), at(0.0), &mut modal)
            .unwrap();

        story.request_skip();
        assert!(!story.tick(at(0.1), &mut modal));
        assert!(story.is_open());

        story
            .play(StorySequence::new(["x", "y"]), at(0.2), &mut modal)
            .unwrap();
        assert_eq!(modal.block_count(), 1);
        story.request_skip();
        assert!(story.tick(at(0.3), &mut modal));
        assert_eq!(modal.block_count(), 0);
    }

    #[test]
    fn test_non_blocking_story() {
        let mut modal = modal();
        let mut story = StoryPlayer::default();
        story
            .play(StorySequence::new(["a"]).with_block_input(false), at(0.0), &mut modal)
            .unwrap();
        assert!(!modal.is_blocking());

        modal.push();
        story.close(&mut modal);
        assert_eq!(modal.block_count(), 1);
    }

    #[test]
    fn test_empty_story_rejected() {
        let mut modal = modal();
        let mut story = StoryPlayer::default();
        let empty: [&str; 0] = [];
        assert!(story.play(StorySequence::new(empty), at(0.0), &mut modal).is_err());
        assert!(!story.is_open());
    }
}
