//! Story sequences: reusable narrative beats shown as a full-screen overlay.

use serde::{Deserialize, Serialize};

/// An ordered list of story lines, each shown as one screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorySequence {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub lines: Vec<String>,

    /// Seconds before auto-advancing to the next line. 0 = manual only.
    #[serde(default)]
    pub auto_advance_seconds: f64,

    /// Whether the player may skip/close the sequence early.
    #[serde(default = "default_true")]
    pub allow_skip: bool,

    /// Freeze movement and block world interaction while showing.
    #[serde(default = "default_true")]
    pub block_input: bool,

    /// Opacity of the backdrop, 0.0 - 1.0.
    #[serde(default = "default_overlay_alpha")]
    pub overlay_alpha: f32,
}

fn default_true() -> bool {
    true
}

fn default_overlay_alpha() -> f32 {
    0.86
}

impl StorySequence {
    /// Create a manual-advance, skippable, blocking sequence.
    pub fn new(lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            id: String::new(),
            title: String::new(),
            lines: lines.into_iter().map(Into::into).collect(),
            auto_advance_seconds: 0.0,
            allow_skip: true,
            block_input: true,
            overlay_alpha: default_overlay_alpha(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_auto_advance(mut self, seconds: f64) -> Self {
        self.auto_advance_seconds = seconds.max(0.0);
        self
    }

    pub fn with_allow_skip(mut self, allow: bool) -> Self {
        self.allow_skip = allow;
        self
    }

    pub fn with_block_input(mut self, block: bool) -> Self {
        self.block_input = block;
        self
    }

    pub fn with_overlay_alpha(mut self, alpha: f32) -> Self {
        self.overlay_alpha = alpha.clamp(0.0, 1.0);
        self
    }

    /// Auto-advance delay, or `None` for manual sequences.
    pub fn auto_advance(&self) -> Option<f64> {
        (self.auto_advance_seconds > 0.0).then(|| self.auto_advance_seconds.max(0.01))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_story_defaults() {
        let seq = StorySequence::new(["one", "two"]);
        assert_eq!(seq.lines.len(), 2);
        assert!(seq.allow_skip);
        assert!(seq.block_input);
        assert!(seq.auto_advance().is_none());
    }

    #[test]
    fn test_story_auto_advance_clamped() {
        let seq = StorySequence::new(["a"]).with_auto_advance(0.001);
        assert_eq!(seq.auto_advance(), Some(0.01));

        let negative = StorySequence::new(["a"]).with_auto_advance(-3.0);
        assert!(negative.auto_advance().is_none());
    }

    #[test]
    fn test_story_from_toml() {
        let seq: StorySequence = toml::from_str(
            r#"
            title = "Intro"
            lines = ["You wake up.", "The door is locked."]
            auto_advance_seconds = 3.0
            "#,
        )
        .unwrap();

        assert_eq!(seq.title, "Intro");
        assert_eq!(seq.auto_advance(), Some(3.0));
        assert!(seq.block_input);
        assert!((seq.overlay_alpha - 0.86).abs() < 0.001);
    }
}
