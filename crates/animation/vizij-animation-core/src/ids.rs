//! Snippet and transition ids.
//!
//! Snippet ids are never reused and grow with every `schedule` call (replacements
//! included), so comparing two ids tells which snippet was scheduled later.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct SnippetId(pub u64);

impl SnippetId {
    /// Recency key used to break priority ties.
    #[inline]
    pub fn seq(self) -> u64 {
        self.0
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct TransitionId(pub u64);

/// Monotonic counter backing both id kinds.
#[derive(Default, Debug)]
pub(crate) struct IdCounter(u64);

impl IdCounter {
    #[inline]
    pub(crate) fn snippet(&mut self) -> SnippetId {
        SnippetId(self.bump())
    }

    #[inline]
    pub(crate) fn transition(&mut self) -> TransitionId {
        TransitionId(self.bump())
    }

    fn bump(&mut self) -> u64 {
        let id = self.0;
        self.0 = self.0.wrapping_add(1);
        id
    }
}
