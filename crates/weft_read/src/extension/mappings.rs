use alloc::string::String;

use weft_introspect::info::Type;

use crate::extension::layered::{Layered, Table};

/// Per-type renames from declared attribute names to external setter names.
///
/// Consulted by [`InjectorFactory`](crate::injector::InjectorFactory)
/// implementations when choosing how to write an attribute.
#[derive(Clone, Debug)]
pub struct NonStandardMappings {
    table: Layered<Type, Table<String, String>>,
}

impl NonStandardMappings {
    pub(crate) fn new(table: Layered<Type, Table<String, String>>) -> Self {
        Self { table }
    }

    /// The external name `declared` maps to on `ty`, if any.
    pub fn get(&self, ty: Type, declared: &str) -> Option<&str> {
        self.table.get(&ty)?.get(declared).map(String::as_str)
    }

    /// Whether `ty` has any mapping.
    pub fn contains_type(&self, ty: Type) -> bool {
        self.table.get(&ty).is_some_and(|m| !m.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Type, &str, &str)> {
        self.table
            .iter()
            .flat_map(|(ty, m)| m.iter().map(|(k, v)| (*ty, k.as_str(), v.as_str())))
    }

    pub(crate) fn flatten(&self) -> Table<Type, Table<String, String>> {
        self.table.flatten()
    }

    pub(crate) fn set(&mut self, ty: Type, declared: String, external: String) {
        self.table
            .get_or_insert_with(ty, Table::default)
            .insert(declared, external);
    }
}
