//! Per-target conflict resolution between concurrently playing snippets.
//!
//! Higher priority wins outright; equal priority goes to the most recent schedule.
//! Losing samples are discarded. There is no blending between snippets.

use hashbrown::HashMap;
use vizij_face_api::{TargetKey, TargetValueTable};

/// One snippet's sample for one target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contribution {
    pub priority: i32,
    pub seq: u64,
    pub value: f32,
}

impl Contribution {
    /// Strict ordering: an identical (priority, seq) never displaces the incumbent.
    #[inline]
    pub fn beats(&self, other: &Contribution) -> bool {
        (self.priority, self.seq) > (other.priority, other.seq)
    }
}

#[derive(Debug, Default)]
pub struct PriorityResolver {
    winners: HashMap<TargetKey, Contribution>,
}

impl PriorityResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop last tick's winners.
    #[inline]
    pub fn begin_frame(&mut self) {
        self.winners.clear();
    }

    /// Offer a sample; returns true when it is now the winner for `key`.
    pub fn offer(&mut self, key: &TargetKey, c: Contribution) -> bool {
        match self.winners.get_mut(key) {
            Some(current) => {
                if c.beats(current) {
                    *current = c;
                    true
                } else {
                    false
                }
            }
            None => {
                self.winners.insert(key.clone(), c);
                true
            }
        }
    }

    #[inline]
    pub fn winner(&self, key: &TargetKey) -> Option<&Contribution> {
        self.winners.get(key)
    }

    pub fn len(&self) -> usize {
        self.winners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.winners.is_empty()
    }

    /// Write every winning value into the table.
    pub fn write_to(&self, table: &mut TargetValueTable) {
        for (key, c) in &self.winners {
            table.set(key.clone(), c.value);
        }
    }
}
