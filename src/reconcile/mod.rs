//! Keyed list reconciliation.
//!
//! Given the previously committed item sequence and the newly computed one,
//! [`reconcile`] works out which items to keep, replace in place, insert and
//! remove, and where each insertion goes. The result is a [`Plan`] that a
//! caller applies to a [`Host`](crate::host::Host) in one commit.
//!
//! # Algorithm
//!
//! 1. Items are matched by key. A key present on both sides with an unchanged
//!    content hash is *retained* and keeps its previous node; with a changed hash
//!    (or when a reset is forced) its node is *replaced* where it stands.
//! 2. Matched items whose relative order changed are re-placed: they are kept
//!    in the greedy in-order run of the new sequence or else treated like new
//!    insertions of the same node. There is no dedicated move operation.
//! 3. A two-cursor merge walks the previous sequence (replacements applied,
//!    re-placed items dropped) and the new one. Identical heads advance both
//!    cursors. A kept item at the head of the new sequence waits for the
//!    previous cursor to reach it. Between a removed item and an insertion the
//!    smaller position advances, ties going to the new sequence. Every insertion
//!    is anchored after the item merged just before it, or prepended when there
//!    is none.
//! 4. The plan is a full replace when forced or when every previous item goes
//!    away (which includes an empty previous sequence).

use std::collections::{HashMap, HashSet};

use crate::host::{Anchor, NodeId};

/// Identity of a list item across renders.
pub type ItemKey = String;

/// One rendered item in a sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub key: ItemKey,
    pub node: NodeId,
    /// Content hash of the inputs the item was rendered from.
    pub hash: u64,
    /// Index in the filtered and sorted list, before pagination.
    pub position: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Insertion {
    pub node: NodeId,
    pub anchor: Anchor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Replacement {
    pub old: NodeId,
    pub new: NodeId,
}

/// Everything needed to move the container from the previous sequence to the
/// next one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    /// The committed sequence after this plan is applied, in final order.
    pub sequence: Vec<Slot>,
    /// Nodes to insert, in application order.
    pub inserted: Vec<Insertion>,
    pub replaced: Vec<Replacement>,
    pub removed: Vec<NodeId>,
    pub retained: Vec<NodeId>,
    /// Rewrite the whole container instead of applying individual operations.
    pub full_replace: bool,
}

impl Plan {
    /// True when applying the plan would not change the container.
    pub fn is_noop(&self) -> bool {
        !self.full_replace
            && self.inserted.is_empty()
            && self.replaced.is_empty()
            && self.removed.is_empty()
    }

    /// Nodes that enter the container with this plan.
    pub fn inserted_nodes(&self) -> Vec<NodeId> {
        self.inserted.iter().map(|insertion| insertion.node).collect()
    }
}

/// Side of the merge an entry comes from.
struct MergeEntry {
    node: NodeId,
    position: usize,
    removed: bool,
}

/// Compute the plan turning `previous` into `next`.
///
/// Keys in `next` must be unique; nodes of `next` are the ones to use when an
/// item cannot keep its previous node.
pub fn reconcile(previous: &[Slot], next: &[Slot], force_reset: bool) -> Plan {
    let previous_index: HashMap<&str, usize> =
        previous.iter().enumerate().map(|(i, slot)| (slot.key.as_str(), i)).collect();
    let next_keys: HashSet<&str> = next.iter().map(|slot| slot.key.as_str()).collect();

    let mut plan = Plan::default();
    let mut fresh: HashSet<NodeId> = HashSet::new();
    // previous index -> (node after replacement, new position)
    let mut matched: HashMap<usize, (NodeId, usize)> = HashMap::new();
    let mut last_in_order: Option<usize> = None;

    for slot in next {
        let Some(&index) = previous_index.get(slot.key.as_str()) else {
            fresh.insert(slot.node);
            plan.sequence.push(slot.clone());
            continue;
        };

        let old = &previous[index];
        let node = if !force_reset && old.hash == slot.hash {
            plan.retained.push(old.node);
            old.node
        } else {
            plan.replaced.push(Replacement {
                old: old.node,
                new: slot.node,
            });
            slot.node
        };

        if last_in_order.is_none_or(|last| index > last) {
            last_in_order = Some(index);
            matched.insert(index, (node, slot.position));
        } else {
            fresh.insert(node);
        }

        plan.sequence.push(Slot {
            node,
            ..slot.clone()
        });
    }

    let old_order: Vec<MergeEntry> = previous
        .iter()
        .enumerate()
        .filter_map(|(i, slot)| {
            if let Some(&(node, position)) = matched.get(&i) {
                Some(MergeEntry {
                    node,
                    position,
                    removed: false,
                })
            } else if next_keys.contains(slot.key.as_str()) {
                None
            } else {
                plan.removed.push(slot.node);
                Some(MergeEntry {
                    node: slot.node,
                    position: slot.position,
                    removed: true,
                })
            }
        })
        .collect();

    plan.inserted = merge_insertions(&old_order, &plan.sequence, &fresh);
    plan.full_replace = force_reset || plan.removed.len() == previous.len();
    plan
}

fn merge_insertions(old: &[MergeEntry], next: &[Slot], fresh: &HashSet<NodeId>) -> Vec<Insertion> {
    let mut insertions = Vec::new();
    let mut last: Option<NodeId> = None;
    let (mut i, mut j) = (0, 0);

    while i < old.len() || j < next.len() {
        let current = match (old.get(i), next.get(j)) {
            (Some(o), Some(n)) if o.node == n.node => {
                i += 1;
                j += 1;
                n.node
            }
            (Some(o), Some(n))
                if !fresh.contains(&n.node) || (o.removed && o.position < n.position) =>
            {
                i += 1;
                o.node
            }
            (_, Some(n)) => {
                j += 1;
                n.node
            }
            (Some(o), None) => {
                i += 1;
                o.node
            }
            (None, None) => break,
        };

        if fresh.contains(&current) {
            insertions.push(Insertion {
                node: current,
                anchor: last.map_or(Anchor::Prepend, Anchor::After),
            });
        }
        last = Some(current);
    }

    insertions
}
