// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileStats {
    pub reused: usize,
    pub created: usize,
    pub removed: usize,
}

/// Join `existing` items against `next_keys` by key. Matched items are moved
/// into the new order, keys without a match are built with `create`, and
/// existing items that nothing claimed are dropped. Repeated keys claim
/// existing items first-come.
pub fn reconcile<T, K, F, C>(
    existing: Vec<T>,
    key_of: F,
    next_keys: &[K],
    mut create: C,
) -> (Vec<T>, ReconcileStats)
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
    C: FnMut(&K) -> T,
{
    let mut by_key: HashMap<K, VecDeque<usize>> = HashMap::new();
    for (position, item) in existing.iter().enumerate() {
        by_key.entry(key_of(item)).or_default().push_back(position);
    }

    let mut slots: Vec<Option<T>> = existing.into_iter().map(Some).collect();
    let mut stats = ReconcileStats::default();
    let mut items = Vec::with_capacity(next_keys.len());

    for key in next_keys {
        let claimed = by_key
            .get_mut(key)
            .and_then(VecDeque::pop_front)
            .and_then(|position| slots[position].take());
        match claimed {
            Some(item) => {
                stats.reused += 1;
                items.push(item);
            }
            None => {
                stats.created += 1;
                items.push(create(key));
            }
        }
    }

    stats.removed = slots.iter().filter(|slot| slot.is_some()).count();
    (items, stats)
}
