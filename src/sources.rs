use std::collections::BTreeSet;

use crate::config::SourcePriority;

/// Vertices whose remaining in-weight dropped to zero, waiting to be placed.
///
/// Kept sorted by out-weight at the time of insertion. A source never loses out-weight while it
/// waits here because the engine skips sources when it removes in-edges, so the key stays valid.
#[derive(Debug, Clone, Default)]
pub struct SourceRegistry {
    set: BTreeSet<(u64, usize)>,
    priority: SourcePriority,
}

impl SourceRegistry {
    pub fn new(priority: SourcePriority) -> SourceRegistry {
        SourceRegistry { set: BTreeSet::new(), priority }
    }

    pub fn add(&mut self, v: usize, out_weight: u64) {
        self.set.insert((out_weight, v));
    }

    /// Removes and returns the source that should be placed next.
    pub fn pop(&mut self) -> Option<usize> {
        match self.priority {
            SourcePriority::LeastOutWeight => self.pop_min(),
            SourcePriority::GreatestOutWeight => self.pop_max(),
        }
    }

    /// Removes and returns the source with the smallest out-weight.
    pub fn pop_min(&mut self) -> Option<usize> {
        self.set.pop_first().map(|(_, v)| v)
    }

    /// Removes and returns the source with the largest out-weight.
    pub fn pop_max(&mut self) -> Option<usize> {
        self.set.pop_last().map(|(_, v)| v)
    }

    /// Pending sources in the order `pop_min` would return them.
    pub fn vertices(&self) -> impl Iterator<Item = usize> + '_ {
        self.set.iter().map(|&(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}
