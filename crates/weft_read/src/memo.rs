use alloc::sync::Arc;
use core::any::TypeId;
use std::sync::OnceLock;

use dashmap::DashMap;
use weft_utils::hash::NoOpHashState;

/// A compute-once-per-type memo table.
///
/// Looking a slot up only holds a shard lock long enough to clone the slot
/// handle; the computation itself runs under the slot's [`OnceLock`].
/// Concurrent first requests for one type run exactly one computation and all
/// observe its result, while requests for other types proceed independently.
pub(crate) struct Memo<V> {
    slots: DashMap<TypeId, Arc<OnceLock<V>>, NoOpHashState>,
}

impl<V: Clone> Memo<V> {
    pub(crate) fn new() -> Self {
        Self {
            slots: DashMap::with_hasher(NoOpHashState),
        }
    }

    pub(crate) fn get_or_init(&self, key: TypeId, init: impl FnOnce() -> V) -> V {
        // The shard guard is released at the end of this statement.
        let slot = Arc::clone(self.slots.entry(key).or_default().value());
        slot.get_or_init(init).clone()
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn clear(&self) {
        self.slots.clear();
    }
}

impl<V: Clone> Default for Memo<V> {
    fn default() -> Self {
        Self::new()
    }
}
