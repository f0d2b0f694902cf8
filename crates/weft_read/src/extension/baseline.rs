use alloc::borrow::ToOwned;
use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use core::fmt;

use weft_introspect::info::Type;
use weft_introspect::registry::TypeRegistry;
use weft_utils::collections::SealFlag;

use crate::extension::layered::Table;
use crate::extension::{ClassFactory, CustomReader, ExtensionRegistry, NameSet};
use crate::{ConfigError, Warning};

// -----------------------------------------------------------------------------
// Baseline

/// An immutable set of extension tables shared by many configurations.
///
/// Each [`ExtensionRegistry`] created from a baseline reads through to it and
/// keeps its own changes in a private overlay, so a baseline is never
/// modified after [`BaselineBuilder::build`].
pub struct Baseline {
    pub(crate) aliases: Arc<Table<String, Type>>,
    pub(crate) coercions: Arc<Table<Type, Type>>,
    pub(crate) custom_readers: Arc<Table<Type, Arc<dyn CustomReader>>>,
    pub(crate) factories: Arc<Table<Type, Arc<dyn ClassFactory>>>,
    pub(crate) non_referenceable: Arc<Table<Type, ()>>,
    pub(crate) not_custom_read: Arc<Table<Type, ()>>,
    pub(crate) excluded: Arc<Table<Type, NameSet>>,
    pub(crate) injector_excluded: Arc<Table<Type, NameSet>>,
    pub(crate) mappings: Arc<Table<Type, Table<String, String>>>,
    pub(crate) warnings: Box<[Warning]>,
}

impl Baseline {
    /// A baseline with every table empty.
    pub fn empty() -> Self {
        Self {
            aliases: Arc::default(),
            coercions: Arc::default(),
            custom_readers: Arc::default(),
            factories: Arc::default(),
            non_referenceable: Arc::default(),
            not_custom_read: Arc::default(),
            excluded: Arc::default(),
            injector_excluded: Arc::default(),
            mappings: Arc::default(),
            warnings: Box::new([]),
        }
    }

    #[inline]
    pub fn builder(types: &TypeRegistry) -> BaselineBuilder<'_> {
        BaselineBuilder::new(types)
    }

    /// Rows skipped while building this baseline.
    #[inline]
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    #[inline]
    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }
}

impl fmt::Debug for Baseline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Baseline")
            .field("aliases", &self.aliases.len())
            .field("coercions", &self.coercions.len())
            .field("custom_readers", &self.custom_readers.len())
            .field("factories", &self.factories.len())
            .field("non_referenceable", &self.non_referenceable.len())
            .field("not_custom_read", &self.not_custom_read.len())
            .field("excluded", &self.excluded.len())
            .field("injector_excluded", &self.injector_excluded.len())
            .field("mappings", &self.mappings.len())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// BaselineBuilder

/// Builds a [`Baseline`] from static string tables.
///
/// Type names are resolved against a [`TypeRegistry`] by path or unambiguous
/// simple name. Rows naming unknown types, and rows with empty fields, are
/// logged, recorded as [`Warning`]s, and skipped.
///
/// # Example
///
/// ```
/// use weft_introspect::registry::TypeRegistry;
/// use weft_read::extension::Baseline;
///
/// let types = TypeRegistry::new();
/// let mut builder = Baseline::builder(&types);
/// builder
///     .aliases([("alloc::string::String", "string"), ("u64", "long")])
///     .aliases([("no::such::Type", "nope")]);
///
/// let baseline = builder.build();
/// assert_eq!(baseline.alias_count(), 2);
/// assert_eq!(baseline.warnings().len(), 1);
/// ```
pub struct BaselineBuilder<'r> {
    types: &'r TypeRegistry,
    draft: ExtensionRegistry,
}

impl<'r> BaselineBuilder<'r> {
    pub fn new(types: &'r TypeRegistry) -> Self {
        Self {
            types,
            draft: ExtensionRegistry::new(SealFlag::new()),
        }
    }

    /// `(type name, alias)` rows. A later row rebinding an alias wins.
    pub fn aliases<'a>(&mut self, rows: impl IntoIterator<Item = (&'a str, &'a str)>) -> &mut Self {
        for (type_name, alias) in rows {
            let (type_name, alias) = (type_name.trim(), alias.trim());
            let result = self.draft.set_alias_by_name(self.types, type_name, alias);
            self.soften(result, "alias", || format!("{type_name} = {alias}"));
        }
        self
    }

    /// `(source type name, destination type name)` rows.
    pub fn coercions<'a>(&mut self, rows: impl IntoIterator<Item = (&'a str, &'a str)>) -> &mut Self {
        for (source, destination) in rows {
            let (source, destination) = (source.trim(), destination.trim());
            let result = self.draft.set_coercion_by_name(self.types, source, destination);
            self.soften(result, "coercion", || format!("{source} = {destination}"));
        }
        self
    }

    /// Type names whose values are always written inline.
    pub fn non_referenceable<'a>(&mut self, type_names: impl IntoIterator<Item = &'a str>) -> &mut Self {
        for type_name in type_names {
            if let Some(ty) = self.resolve("non-referenceable", type_name) {
                let result = self.draft.mark_non_referenceable(ty);
                self.soften(result, "non-referenceable", || type_name.to_owned());
            }
        }
        self
    }

    /// Type names that never pick up an inherited custom reader.
    pub fn not_custom_read<'a>(&mut self, type_names: impl IntoIterator<Item = &'a str>) -> &mut Self {
        for type_name in type_names {
            if let Some(ty) = self.resolve("not-custom-read", type_name) {
                let result = self.draft.mark_not_custom_read(ty);
                self.soften(result, "not-custom-read", || type_name.to_owned());
            }
        }
        self
    }

    /// `(type name, comma-separated attribute names)` rows.
    pub fn exclusions<'a>(&mut self, rows: impl IntoIterator<Item = (&'a str, &'a str)>) -> &mut Self {
        for (type_name, names) in rows {
            if let Some(ty) = self.resolve("exclusion", type_name) {
                let result = self.draft.exclude_attributes(ty, split_names(names));
                self.soften(result, "exclusion", || format!("{type_name} = {names}"));
            }
        }
        self
    }

    /// `(type name, comma-separated attribute names)` rows, for injection only.
    pub fn injector_exclusions<'a>(&mut self, rows: impl IntoIterator<Item = (&'a str, &'a str)>) -> &mut Self {
        for (type_name, names) in rows {
            if let Some(ty) = self.resolve("injector exclusion", type_name) {
                let result = self.draft.exclude_injector_attributes(ty, split_names(names));
                self.soften(result, "injector exclusion", || format!("{type_name} = {names}"));
            }
        }
        self
    }

    /// `(type name, declared attribute name, setter name)` rows.
    pub fn mappings<'a>(&mut self, rows: impl IntoIterator<Item = (&'a str, &'a str, &'a str)>) -> &mut Self {
        for (type_name, declared, external) in rows {
            let (declared, external) = (declared.trim(), external.trim());
            if let Some(ty) = self.resolve("non-standard mapping", type_name) {
                let result = self.draft.set_non_standard_mapping(ty, declared, external);
                self.soften(result, "non-standard mapping", || {
                    format!("{type_name}: {declared} -> {external}")
                });
            }
        }
        self
    }

    pub fn custom_reader(&mut self, ty: Type, reader: Arc<dyn CustomReader>) -> &mut Self {
        let result = self.draft.set_custom_reader(ty, reader);
        self.soften(result, "custom reader", || ty.path().to_owned());
        self
    }

    pub fn factory(&mut self, ty: Type, factory: Arc<dyn ClassFactory>) -> &mut Self {
        let result = self.draft.set_factory(ty, factory);
        self.soften(result, "factory", || ty.path().to_owned());
        self
    }

    /// Rows skipped so far.
    #[inline]
    pub fn warnings(&self) -> &[Warning] {
        self.draft.warnings()
    }

    pub fn build(&self) -> Arc<Baseline> {
        let baseline = self.draft.snapshot();
        log::debug!("{baseline:?} built with {} warnings", baseline.warnings.len());
        Arc::new(baseline)
    }

    fn resolve(&mut self, table: &'static str, type_name: &str) -> Option<Type> {
        let type_name = type_name.trim();
        if type_name.is_empty() {
            self.draft.report(Warning::MalformedEntry {
                table,
                entry: String::new(),
            });
            return None;
        }
        self.draft.resolve_type(self.types, type_name, table)
    }

    fn soften<T>(&mut self, result: Result<T, ConfigError>, table: &'static str, entry: impl FnOnce() -> String) {
        if let Err(err) = result {
            log::debug!("{table} entry rejected: {err}");
            self.draft.report(Warning::MalformedEntry { table, entry: entry() });
        }
    }
}

fn split_names(names: &str) -> impl Iterator<Item = &str> {
    names.split(',').map(str::trim).filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;
    use alloc::vec::Vec;

    use weft_introspect::info::{Type, Typed};
    use weft_utils::collections::SealFlag;

    use crate::Warning;
    use crate::extension::{Baseline, ExtensionRegistry};
    use crate::fixtures::{self, Animal, ArrayList, Dog, EmptyList};

    fn baseline() -> Arc<Baseline> {
        let types = fixtures::registry();
        let mut builder = Baseline::builder(&types);
        builder
            .aliases([("Dog", "dog"), ("Animal", "animal"), ("Unicorn", "unicorn"), ("", "blank")])
            .coercions([("EmptyList", "ArrayList")])
            .exclusions([("Dog", "breed, , name")])
            .non_referenceable(["Animal"]);
        builder.build()
    }

    #[test]
    fn unknown_and_malformed_rows_are_skipped() {
        let baseline = baseline();
        assert_eq!(baseline.alias_count(), 2);
        assert_eq!(
            baseline.warnings(),
            [
                Warning::UnknownType {
                    type_name: "Unicorn".into(),
                    table: "alias",
                },
                Warning::MalformedEntry {
                    table: "alias",
                    entry: " = blank".into(),
                },
            ]
        );
    }

    #[test]
    fn registries_read_through_and_overlay() {
        let baseline = baseline();
        let mut first = ExtensionRegistry::with_baseline(&baseline, SealFlag::new());
        let second = ExtensionRegistry::with_baseline(&baseline, SealFlag::new());

        assert_eq!(first.type_for_alias("dog"), Some(Type::of::<Dog>()));
        assert_eq!(first.coerced_type_for(Type::of::<EmptyList>()), Some(Type::of::<ArrayList>()));
        assert!(first.is_non_referenceable(Animal::type_info()));
        assert_eq!(
            first.excluded_attributes(Type::of::<Dog>()).into_iter().collect::<Vec<_>>(),
            ["breed", "name"]
        );

        first.remove_alias("dog").unwrap();
        first.set_alias::<Animal>("dog").unwrap();
        assert_eq!(first.type_for_alias("dog"), Some(Type::of::<Animal>()));
        assert_eq!(second.type_for_alias("dog"), Some(Type::of::<Dog>()));

        // The removed alias was rebound in its baseline slot.
        assert_eq!(first.aliases().map(|(a, _)| a).collect::<Vec<_>>(), ["dog", "animal"]);
    }
}
