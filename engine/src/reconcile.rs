//! Reconciliation of the local quote list against a remote snapshot.
//!
//! # Algorithm
//!
//! 1. Clone the local list as the merge target
//! 2. Walk the remote snapshot in order
//! 3. Match each remote record against the first target record with equal text
//! 4. Append unmatched remote records; overwrite category-divergent matches
//!    with the remote record and report a conflict
//! 5. Return the merged list and the conflicts
//!
//! The remote side always wins during the merge. A caller may later undo a
//! conflict with [`Reconciler::keep_local`].

use crate::{QuoteList, QuoteRecord};
use serde::{Deserialize, Serialize};

/// A text match whose categories disagreed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    /// The local record before the merge overwrote it
    pub local: QuoteRecord,
    /// The remote record that replaced it
    pub remote: QuoteRecord,
}

/// Result of one merge pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeOutcome {
    /// The new local list
    pub merged: QuoteList,
    /// Conflicts detected, in remote snapshot order
    pub conflicts: Vec<Conflict>,
    /// Number of remote records that were new to the local list
    pub added: usize,
}

impl MergeOutcome {
    /// Check whether the merge changed nothing.
    pub fn is_noop(&self) -> bool {
        self.added == 0 && self.conflicts.is_empty()
    }
}

/// Merges remote snapshots into a local list.
#[derive(Debug, Clone)]
pub struct Reconciler {
    /// Merge target, starts as a clone of the local list
    merged: QuoteList,
    conflicts: Vec<Conflict>,
    added: usize,
}

impl Reconciler {
    /// Create a reconciler seeded with the current local list.
    pub fn new(local: &QuoteList) -> Self {
        Self {
            merged: local.clone(),
            conflicts: Vec::new(),
            added: 0,
        }
    }

    /// Merge a remote snapshot into a local list in one call.
    pub fn merge(local: &QuoteList, remote: &[QuoteRecord]) -> MergeOutcome {
        let mut reconciler = Self::new(local);
        for record in remote {
            reconciler.apply_remote(record);
        }
        reconciler.finish()
    }

    /// Fold one remote record into the merge target.
    pub fn apply_remote(&mut self, remote: &QuoteRecord) {
        match self.merged.position_of(&remote.text) {
            None => {
                self.merged.push(remote.clone());
                self.added += 1;
            }
            Some(index) => {
                let Some(existing) = self.merged.get_mut(index) else {
                    return;
                };
                if existing.category != remote.category {
                    self.conflicts.push(Conflict {
                        local: existing.clone(),
                        remote: remote.clone(),
                    });
                    *existing = remote.clone();
                }
            }
        }
    }

    /// Finish the pass and return the outcome.
    pub fn finish(self) -> MergeOutcome {
        MergeOutcome {
            merged: self.merged,
            conflicts: self.conflicts,
            added: self.added,
        }
    }

    /// Undo the automatic remote-wins resolution for the given conflicts.
    ///
    /// The pre-merge local category is restored on both sides: in the local
    /// list (where the text is still present) and in the remote list, which
    /// gains the local record if it no longer carries that text.
    ///
    /// Returns the number of conflicts written back to the remote list.
    pub fn keep_local(
        local: &mut QuoteList,
        remote: &mut QuoteList,
        conflicts: &[Conflict],
    ) -> usize {
        for conflict in conflicts {
            if let Some(index) = local.position_of(&conflict.local.text) {
                if let Some(record) = local.get_mut(index) {
                    record.category = conflict.local.category.clone();
                }
            }

            match remote.position_of(&conflict.local.text) {
                Some(index) => {
                    if let Some(record) = remote.get_mut(index) {
                        *record = conflict.local.clone();
                    }
                }
                None => remote.push(conflict.local.clone()),
            }
        }
        conflicts.len()
    }

    /// Append every local record whose text the remote list lacks.
    ///
    /// Returns the number of records pushed.
    pub fn push_local(local: &QuoteList, remote: &mut QuoteList) -> usize {
        let mut pushed = 0;
        for record in local.iter() {
            if !remote.contains_text(&record.text) {
                remote.push(record.clone());
                pushed += 1;
            }
        }
        pushed
    }
}
