use alloc::sync::Arc;
use core::fmt;
use core::hash::Hash;

use indexmap::map::Entry;
use indexmap::{Equivalent, IndexMap};
use weft_utils::hash::FixedHashState;

/// An insertion-ordered table with the crate's fixed hasher.
pub type Table<K, V> = IndexMap<K, V, FixedHashState>;

// -----------------------------------------------------------------------------
// Layered

/// A shared, immutable base table plus a private overlay, composed on lookup.
///
/// The overlay stores `None` for base keys that were removed. Iteration yields
/// base keys in base order (with overlay values where overridden), then
/// overlay-only keys in first-insertion order; [`position`](Self::position)
/// follows the same order.
///
/// Cloning shares the base and copies the overlay.
pub(crate) struct Layered<K, V> {
    base: Option<Arc<Table<K, V>>>,
    overlay: Table<K, Option<V>>,
}

impl<K: Hash + Eq, V> Layered<K, V> {
    pub(crate) fn new(base: Option<Arc<Table<K, V>>>) -> Self {
        Self {
            base,
            overlay: IndexMap::with_hasher(FixedHashState),
        }
    }

    pub(crate) fn get<Q: ?Sized + Hash + Equivalent<K>>(&self, key: &Q) -> Option<&V> {
        match self.overlay.get(key) {
            Some(value) => value.as_ref(),
            None => self.base.as_ref()?.get(key),
        }
    }

    #[inline]
    pub(crate) fn contains_key<Q: ?Sized + Hash + Equivalent<K>>(&self, key: &Q) -> bool {
        self.get(key).is_some()
    }

    /// Inserts or overrides `key`; returns the value it replaces, if visible.
    ///
    /// An overridden key keeps its position.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Option<V>
    where
        V: Clone,
    {
        match self.overlay.entry(key) {
            Entry::Occupied(mut e) => e.insert(Some(value)),
            Entry::Vacant(e) => {
                let previous = self.base.as_ref().and_then(|b| b.get(e.key())).cloned();
                e.insert(Some(value));
                previous
            }
        }
    }

    /// Hides `key`; returns whether it was visible.
    pub(crate) fn remove<Q: ?Sized + Hash + Equivalent<K>>(&mut self, key: &Q) -> bool
    where
        K: Clone,
    {
        if let Some(slot) = self.overlay.get_mut(key) {
            return slot.take().is_some();
        }
        match self.base.as_ref().and_then(|b| b.get_key_value(key)) {
            Some((k, _)) => {
                let k = k.clone();
                self.overlay.insert(k, None);
                true
            }
            None => false,
        }
    }

    /// The value under `key`, seeded from the base or `init` on first access.
    pub(crate) fn get_or_insert_with(&mut self, key: K, init: impl FnOnce() -> V) -> &mut V
    where
        V: Clone,
    {
        let slot = match self.overlay.entry(key) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => {
                let seed = self.base.as_ref().and_then(|b| b.get(e.key())).cloned();
                e.insert(seed)
            }
        };
        slot.get_or_insert_with(init)
    }

    /// Drops the base layer and replaces every entry.
    pub(crate) fn replace_all(&mut self, entries: impl IntoIterator<Item = (K, V)>) {
        self.base = None;
        self.overlay.clear();
        self.overlay
            .extend(entries.into_iter().map(|(k, v)| (k, Some(v))));
    }

    /// Rank of `key` in iteration order, if visible.
    pub(crate) fn position<Q: ?Sized + Hash + Equivalent<K>>(&self, key: &Q) -> Option<usize> {
        let base_len = self.base.as_ref().map_or(0, |b| b.len());
        let in_base = self.base.as_ref().and_then(|b| b.get_index_of(key));
        match (in_base, self.overlay.get_full(key)) {
            (_, Some((_, _, None))) => None,
            (Some(index), _) => Some(index),
            (None, Some((index, _, Some(_)))) => Some(base_len + index),
            (None, None) => None,
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        let base = self
            .base
            .iter()
            .flat_map(|b| b.iter())
            .filter_map(|(k, v)| match self.overlay.get(k) {
                Some(overridden) => overridden.as_ref().map(|o| (k, o)),
                None => Some((k, v)),
            });
        let overlay = self
            .overlay
            .iter()
            .filter(|(k, _)| !self.base.as_ref().is_some_and(|b| b.contains_key(*k)))
            .filter_map(|(k, v)| v.as_ref().map(|v| (k, v)));
        base.chain(overlay)
    }

    pub(crate) fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(k, _)| k)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.iter().count()
    }

    /// The visible entries as one table, in iteration order.
    pub(crate) fn flatten(&self) -> Table<K, V>
    where
        K: Clone,
        V: Clone,
    {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    /// Whether lookups still consult a base layer.
    #[cfg(test)]
    pub(crate) fn has_base(&self) -> bool {
        self.base.is_some()
    }
}

impl<K: Clone, V: Clone> Clone for Layered<K, V> {
    fn clone(&self) -> Self {
        Self {
            base: self.base.clone(),
            overlay: self.overlay.clone(),
        }
    }
}

impl<K: Hash + Eq + fmt::Debug, V: fmt::Debug> fmt::Debug for Layered<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
