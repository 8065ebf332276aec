//! Applying reconciliation plans to a host yields the planned order.

use repeatkit::host::{Host, ItemNode, MemoryHost, NodeId};
use repeatkit::reconcile::{Plan, Slot, reconcile};

/// Slots from `(key, node, hash)` triples, positions in order.
fn slots(items: &[(&str, u64, u64)]) -> Vec<Slot> {
    items
        .iter()
        .enumerate()
        .map(|(position, &(key, node, hash))| Slot {
            key: key.to_string(),
            node: NodeId(node),
            hash,
            position,
        })
        .collect()
}

fn item(node: NodeId) -> ItemNode {
    ItemNode {
        id: node,
        markup: format!("<i>{node}</i>"),
    }
}

fn apply(host: &mut MemoryHost, plan: &Plan) {
    if plan.full_replace {
        let items: Vec<ItemNode> = plan.sequence.iter().map(|slot| item(slot.node)).collect();
        host.replace_items(&items);
        return;
    }
    for replacement in &plan.replaced {
        host.replace_item(replacement.old, &item(replacement.new));
    }
    for insertion in &plan.inserted {
        host.insert_item(&item(insertion.node), insertion.anchor);
    }
    for node in &plan.removed {
        host.detach_item(*node);
    }
}

fn assert_applies(previous: &[(&str, u64, u64)], next: &[(&str, u64, u64)]) -> Plan {
    let previous = slots(previous);
    let next = slots(next);
    let mut host = MemoryHost::new();
    host.replace_items(&previous.iter().map(|slot| item(slot.node)).collect::<Vec<_>>());

    let plan = reconcile(&previous, &next, false);
    apply(&mut host, &plan);

    let planned: Vec<NodeId> = plan.sequence.iter().map(|slot| slot.node).collect();
    assert_eq!(host.item_ids(), planned);
    let keys: Vec<&str> = plan.sequence.iter().map(|slot| slot.key.as_str()).collect();
    let expected: Vec<&str> = next.iter().map(|slot| slot.key.as_str()).collect();
    assert_eq!(keys, expected);
    plan
}

#[test]
fn test_reversal() {
    let plan = assert_applies(&[("a", 1, 1), ("b", 2, 2), ("c", 3, 3)], &[
        ("c", 3, 3),
        ("b", 2, 2),
        ("a", 1, 1),
    ]);
    assert!(plan.removed.is_empty());
    assert_eq!(plan.retained.len(), 3);
}

#[test]
fn test_rotation() {
    let plan = assert_applies(&[("a", 1, 1), ("b", 2, 2), ("c", 3, 3)], &[
        ("b", 2, 2),
        ("c", 3, 3),
        ("a", 1, 1),
    ]);
    assert_eq!(plan.inserted.len(), 1);
}

#[test]
fn test_mixed_moves_removals_and_additions() {
    let plan = assert_applies(&[("a", 1, 1), ("b", 2, 2), ("c", 3, 3), ("d", 4, 4)], &[
        ("d", 4, 4),
        ("a", 1, 1),
        ("c", 3, 3),
        ("x", 5, 5),
    ]);
    assert_eq!(plan.removed, vec![NodeId(2)]);
    assert!(!plan.full_replace);
}

#[test]
fn test_interleaved_additions() {
    let plan = assert_applies(&[("a", 1, 1), ("b", 2, 2)], &[
        ("x", 3, 3),
        ("a", 1, 1),
        ("y", 4, 4),
        ("b", 2, 2),
        ("z", 5, 5),
    ]);
    assert_eq!(plan.inserted.len(), 3);
    assert_eq!(plan.retained, vec![NodeId(1), NodeId(2)]);
}

#[test]
fn test_changed_item_that_also_moved() {
    let plan = assert_applies(&[("a", 1, 1), ("b", 2, 2)], &[("b", 3, 20), ("a", 1, 1)]);
    assert_eq!(plan.replaced.len(), 1);
    assert_eq!(plan.replaced[0].old, NodeId(2));
}

#[test]
fn test_everything_replaced() {
    let plan = assert_applies(&[("a", 1, 1)], &[("b", 2, 2), ("c", 3, 3)]);
    assert!(plan.full_replace);
}
