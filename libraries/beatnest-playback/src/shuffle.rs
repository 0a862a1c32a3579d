//! Lazily generated shuffle order
//!
//! A permutation of context indices consumed front to back. When it runs dry a
//! fresh permutation of every index except the one playing is drawn, so a
//! context of N tracks visits the other N-1 tracks once before any repeats.

use rand::seq::SliceRandom;
use rand::{thread_rng, Rng};
use std::collections::VecDeque;

/// Pending shuffle order over context indices
#[derive(Debug, Clone, Default)]
pub struct ShuffleOrder {
    pending: VecDeque<usize>,
}

impl ShuffleOrder {
    /// Create an empty order
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the pending order; the next draw regenerates it
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Drop `index` from the pending order (it is playing now)
    pub fn discard(&mut self, index: usize) {
        self.pending.retain(|&i| i != index);
    }

    /// Indices still to be played
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    /// Check if the order is exhausted
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Next context index to play
    ///
    /// # Arguments
    /// * `len` - Context length
    /// * `current` - Index playing now, excluded when regenerating
    pub fn next_index(&mut self, len: usize, current: Option<usize>) -> Option<usize> {
        self.next_index_with(len, current, &mut thread_rng())
    }

    /// `next_index` with a caller supplied RNG
    pub fn next_index_with<R: Rng + ?Sized>(
        &mut self,
        len: usize,
        current: Option<usize>,
        rng: &mut R,
    ) -> Option<usize> {
        // Context shrank since the order was drawn
        self.pending.retain(|&i| i < len);

        if self.pending.is_empty() {
            let mut order: Vec<usize> = (0..len).filter(|&i| Some(i) != current).collect();
            order.shuffle(rng);
            self.pending = order.into();
        }

        self.pending.pop_front()
    }
}
