use core::any::TypeId;
use core::fmt;

use hashbrown::hash_map::Entry;

use crate::hash::{HashMap, NoOpHashState};

// -----------------------------------------------------------------------------
// TypeIdMap

/// Values keyed by [`TypeId`], hashed with [`NoOpHashState`].
///
/// Keys are taken by value; a `TypeId` is already a well-mixed hash.
///
/// ```
/// use core::any::TypeId;
/// use weft_utils::TypeIdMap;
///
/// let mut names = TypeIdMap::new();
/// names.insert(TypeId::of::<u8>(), "u8");
/// assert_eq!(names.get(TypeId::of::<u8>()), Some(&"u8"));
/// assert!(names.get(TypeId::of::<u16>()).is_none());
/// ```
pub struct TypeIdMap<V> {
    table: HashMap<TypeId, V, NoOpHashState>,
}

impl<V> TypeIdMap<V> {
    #[inline]
    pub const fn new() -> Self {
        Self {
            table: HashMap::with_hasher(NoOpHashState),
        }
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            table: HashMap::with_capacity_and_hasher(capacity, NoOpHashState),
        }
    }

    /// Stores `init()` under `key` unless the key is taken.
    ///
    /// `init` only runs for a vacant key. Returns whether it ran.
    pub fn try_insert(&mut self, key: TypeId, init: impl FnOnce() -> V) -> bool {
        match self.table.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(init());
                true
            }
        }
    }

    #[inline]
    pub fn insert(&mut self, key: TypeId, value: V) -> Option<V> {
        self.table.insert(key, value)
    }

    #[inline]
    pub fn remove(&mut self, key: TypeId) -> Option<V> {
        self.table.remove(&key)
    }

    #[inline]
    pub fn get(&self, key: TypeId) -> Option<&V> {
        self.table.get(&key)
    }

    #[inline]
    pub fn get_mut(&mut self, key: TypeId) -> Option<&mut V> {
        self.table.get_mut(&key)
    }

    #[inline]
    pub fn contains(&self, key: TypeId) -> bool {
        self.table.contains_key(&key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Entries in unspecified order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (TypeId, &V)> {
        self.table.iter().map(|(key, value)| (*key, value))
    }

    pub fn values(&self) -> impl ExactSizeIterator<Item = &V> {
        self.table.values()
    }
}

impl<V> IntoIterator for TypeIdMap<V> {
    type Item = (TypeId, V);
    type IntoIter = hashbrown::hash_map::IntoIter<TypeId, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.table.into_iter()
    }
}

impl<V> Default for TypeIdMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> Clone for TypeIdMap<V> {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for TypeIdMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.table.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use core::any::TypeId;

    use super::TypeIdMap;

    #[test]
    fn vacant_keys_only_run_init() {
        let mut map = TypeIdMap::new();
        let mut runs = 0;
        assert!(map.try_insert(TypeId::of::<u8>(), || {
            runs += 1;
            1
        }));
        assert!(!map.try_insert(TypeId::of::<u8>(), || {
            runs += 1;
            2
        }));
        assert_eq!(runs, 1);
        assert_eq!(map.get(TypeId::of::<u8>()), Some(&1));

        assert_eq!(map.remove(TypeId::of::<u8>()), Some(1));
        assert!(map.is_empty());
    }
}
