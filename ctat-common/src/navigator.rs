//! Cursor over the loaded conversations

use serde::Serialize;

/// Result of a navigation step
///
/// Boundaries are reported, not raised: `AtStart`/`AtEnd` leave the cursor
/// where it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NavOutcome {
    Changed,
    AtStart,
    AtEnd,
}

/// Progress through the conversation list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Progress {
    /// 1-based position of the current conversation
    pub position: usize,
    pub total: usize,
    pub percent: f64,
}

impl Progress {
    /// Human-readable label, e.g. `3/10 Conversations`
    pub fn label(&self) -> String {
        format!("{}/{} Conversations", self.position, self.total)
    }
}

/// Current-index cursor over `[0, len)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    current: usize,
    len: usize,
}

impl Navigator {
    /// Cursor at index 0 over `len` conversations
    pub fn new(len: usize) -> Self {
        Self { current: 0, len }
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn next(&mut self) -> NavOutcome {
        if self.current + 1 < self.len {
            self.current += 1;
            NavOutcome::Changed
        } else {
            NavOutcome::AtEnd
        }
    }

    pub fn previous(&mut self) -> NavOutcome {
        if self.current > 0 {
            self.current -= 1;
            NavOutcome::Changed
        } else {
            NavOutcome::AtStart
        }
    }

    /// `None` when there is nothing to navigate
    pub fn progress(&self) -> Option<Progress> {
        if self.is_empty() {
            return None;
        }
        let position = self.current + 1;
        Some(Progress {
            position,
            total: self.len,
            percent: position as f64 / self.len as f64 * 100.0,
        })
    }
}
