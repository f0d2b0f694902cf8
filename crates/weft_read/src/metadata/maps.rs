use alloc::string::String;
use alloc::sync::Arc;
use core::fmt;

use indexmap::IndexMap;
use weft_utils::hash::FixedHashState;

use crate::injector::Injector;
use crate::metadata::AttributeDescriptor;

// -----------------------------------------------------------------------------
// AttributeMap

/// The attributes of a type and all its ancestors, keyed by display name.
///
/// Order is most-derived type first, declaration order within a type. A
/// shadowed ancestor attribute is stored under `"<DeclaringSimpleName>.<name>"`.
///
/// Equality compares keys, descriptors *and* order.
#[derive(Clone, Default)]
pub struct AttributeMap {
    entries: IndexMap<String, AttributeDescriptor, FixedHashState>,
}

impl AttributeMap {
    pub(crate) fn from_entries(entries: IndexMap<String, AttributeDescriptor, FixedHashState>) -> Self {
        Self { entries }
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&AttributeDescriptor> {
        self.entries.get(key)
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl ExactSizeIterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &AttributeDescriptor)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl PartialEq for AttributeMap {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl Eq for AttributeMap {}

impl fmt::Debug for AttributeMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

// -----------------------------------------------------------------------------
// InjectorMap

/// The resolved [`Injector`] of every writable attribute in an [`AttributeMap`],
/// under the same keys and in the same order.
#[derive(Clone, Default)]
pub struct InjectorMap {
    entries: IndexMap<String, Arc<dyn Injector>, FixedHashState>,
}

impl InjectorMap {
    pub(crate) fn from_entries(entries: IndexMap<String, Arc<dyn Injector>, FixedHashState>) -> Self {
        Self { entries }
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&Arc<dyn Injector>> {
        self.entries.get(key)
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl ExactSizeIterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &Arc<dyn Injector>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl fmt::Debug for InjectorMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
