//! Open bracket tracking.

use log::trace;
use serde::{Deserialize, Serialize};

/// An open enclosure and the indentation level that was active when it opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnclosureFrame {
    pub opening: String,
    pub level: String,
}

/// LIFO stack of open enclosures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnclosureTracker {
    frames: Vec<EnclosureFrame>,
}

impl EnclosureTracker {
    pub fn new() -> Self {
        EnclosureTracker::default()
    }

    pub fn open(&mut self, opening: impl Into<String>, level: impl Into<String>) {
        let frame = EnclosureFrame {
            opening: opening.into(),
            level: level.into(),
        };
        trace!("enclosure {:?} opened at level {:?}", frame.opening, frame.level);
        self.frames.push(frame);
    }

    /// The innermost open frame for `opening`.
    pub fn find(&self, opening: &str) -> Option<&EnclosureFrame> {
        self.frames.iter().rev().find(|frame| frame.opening == opening)
    }

    /// Close the innermost frame for `opening` together with every frame opened after
    /// it. Returns the closed frame, or `None` when `opening` is not open.
    pub fn close(&mut self, opening: &str) -> Option<EnclosureFrame> {
        let index = self.frames.iter().rposition(|frame| frame.opening == opening)?;
        let mut closed = self.frames.split_off(index);
        let frame = closed.swap_remove(0);
        trace!(
            "enclosure {:?} closed ({} unmatched inside)",
            frame.opening,
            closed.len()
        );
        Some(frame)
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn frames(&self) -> &[EnclosureFrame] {
        &self.frames
    }
}
