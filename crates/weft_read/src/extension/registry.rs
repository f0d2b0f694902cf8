use alloc::borrow::ToOwned;
use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use indexmap::IndexSet;
use weft_introspect::info::{Type, TypeInfo, TypeKind, Typed};
use weft_introspect::registry::{TypeMeta, TypeRegistry, TypeTraitFromValue};
use weft_utils::collections::SealFlag;
use weft_utils::hash::FixedHashState;

use crate::extension::closest::closest;
use crate::extension::layered::Layered;
use crate::extension::{Baseline, ClassFactory, CustomReader, EnumFactory, NonStandardMappings};
use crate::memo::Memo;
use crate::{ConfigError, Warning};

/// An ordered set of attribute names.
pub type NameSet = IndexSet<String, FixedHashState>;

// -----------------------------------------------------------------------------
// ExtensionRegistry

/// Type-level extension points of a reader configuration.
///
/// Every table is layered over an optional shared [`Baseline`]. Mutators
/// check the configuration's [`SealFlag`] first and return
/// [`ConfigError::Frozen`] once it is sealed, without touching any state.
///
/// Soft failures (unknown type names, alias conflicts) are logged with
/// `log::warn!`, recorded in [`warnings`](Self::warnings), and never returned
/// as errors.
///
/// Closest-type lookups ([`custom_reader_for`](Self::custom_reader_for),
/// [`factory_for`](Self::factory_for)) are memoized per type once the
/// registry is frozen, misses included.
pub struct ExtensionRegistry {
    seal: SealFlag,
    aliases: Layered<String, Type>,
    coercions: Layered<Type, Type>,
    custom_readers: Layered<Type, Arc<dyn CustomReader>>,
    factories: Layered<Type, Arc<dyn ClassFactory>>,
    non_referenceable: Layered<Type, ()>,
    not_custom_read: Layered<Type, ()>,
    excluded: Layered<Type, NameSet>,
    injector_excluded: Layered<Type, NameSet>,
    mappings: NonStandardMappings,
    enum_factory: Arc<dyn ClassFactory>,
    reader_cache: Memo<Option<Type>>,
    factory_cache: Memo<Option<Type>>,
    warnings: Vec<Warning>,
}

impl ExtensionRegistry {
    /// An empty registry governed by `seal`.
    pub fn new(seal: SealFlag) -> Self {
        Self::with_baseline(&Baseline::empty(), seal)
    }

    /// A registry whose tables start out as `baseline`.
    pub fn with_baseline(baseline: &Baseline, seal: SealFlag) -> Self {
        Self {
            seal,
            aliases: Layered::new(Some(Arc::clone(&baseline.aliases))),
            coercions: Layered::new(Some(Arc::clone(&baseline.coercions))),
            custom_readers: Layered::new(Some(Arc::clone(&baseline.custom_readers))),
            factories: Layered::new(Some(Arc::clone(&baseline.factories))),
            non_referenceable: Layered::new(Some(Arc::clone(&baseline.non_referenceable))),
            not_custom_read: Layered::new(Some(Arc::clone(&baseline.not_custom_read))),
            excluded: Layered::new(Some(Arc::clone(&baseline.excluded))),
            injector_excluded: Layered::new(Some(Arc::clone(&baseline.injector_excluded))),
            mappings: NonStandardMappings::new(Layered::new(Some(Arc::clone(&baseline.mappings)))),
            enum_factory: Arc::new(EnumFactory),
            reader_cache: Memo::new(),
            factory_cache: Memo::new(),
            warnings: Vec::new(),
        }
    }

    /// A mutable copy governed by `seal`.
    ///
    /// Overlays are copied, baselines and strategy instances are shared,
    /// caches start empty.
    pub fn fork(&self, seal: SealFlag) -> Self {
        Self {
            seal,
            aliases: self.aliases.clone(),
            coercions: self.coercions.clone(),
            custom_readers: self.custom_readers.clone(),
            factories: self.factories.clone(),
            non_referenceable: self.non_referenceable.clone(),
            not_custom_read: self.not_custom_read.clone(),
            excluded: self.excluded.clone(),
            injector_excluded: self.injector_excluded.clone(),
            mappings: self.mappings.clone(),
            enum_factory: Arc::clone(&self.enum_factory),
            reader_cache: Memo::new(),
            factory_cache: Memo::new(),
            warnings: self.warnings.clone(),
        }
    }

    // ---------------------------------------------------------------------
    // Lifecycle

    #[inline]
    pub fn seal_flag(&self) -> &SealFlag {
        &self.seal
    }

    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.seal.is_sealed()
    }

    /// Seals the registry and drops memoized lookups. Idempotent.
    pub fn freeze(&self) {
        if self.seal.seal() {
            log::trace!("extension registry frozen");
        }
        self.reader_cache.clear();
        self.factory_cache.clear();
    }

    /// Soft failures reported so far, oldest first.
    #[inline]
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    fn check(&self, operation: &'static str) -> Result<(), ConfigError> {
        if self.seal.is_sealed() {
            return Err(ConfigError::Frozen { operation });
        }
        Ok(())
    }

    pub(crate) fn report(&mut self, warning: Warning) {
        log::warn!("{warning}");
        self.warnings.push(warning);
    }

    /// Resolves a type path or unambiguous simple name, reporting unknown names.
    pub(crate) fn resolve_type(&mut self, types: &TypeRegistry, type_name: &str, table: &'static str) -> Option<Type> {
        let found = types.resolve(type_name).map(TypeMeta::ty);
        if found.is_none() {
            self.report(Warning::UnknownType {
                type_name: type_name.to_owned(),
                table,
            });
        }
        found
    }

    // ---------------------------------------------------------------------
    // Aliases

    /// Binds `alias` to `T`.
    pub fn set_alias<T: Typed + ?Sized>(&mut self, alias: &str) -> Result<(), ConfigError> {
        self.set_alias_type(T::type_info().ty(), alias)
    }

    /// Binds `alias` to `ty`. Rebinding to another type wins, with an
    /// [`AliasConflict`](Warning::AliasConflict) warning.
    pub fn set_alias_type(&mut self, ty: Type, alias: &str) -> Result<(), ConfigError> {
        self.check("set an alias")?;
        non_empty(alias, "alias must not be empty")?;

        if let Some(existing) = self.aliases.insert(alias.to_owned(), ty)
            && existing != ty
        {
            self.report(Warning::AliasConflict {
                alias: alias.to_owned(),
                existing: existing.path().to_owned(),
                replacement: ty.path().to_owned(),
            });
        }
        Ok(())
    }

    /// Binds `alias` to the type registered under `type_name`.
    ///
    /// Returns `Ok(false)` and reports a warning if the type is unknown.
    pub fn set_alias_by_name(
        &mut self,
        types: &TypeRegistry,
        type_name: &str,
        alias: &str,
    ) -> Result<bool, ConfigError> {
        self.check("set an alias")?;
        non_empty(type_name, "type name must not be empty")?;
        non_empty(alias, "alias must not be empty")?;

        match self.resolve_type(types, type_name, "alias") {
            Some(ty) => self.set_alias_type(ty, alias).map(|()| true),
            None => Ok(false),
        }
    }

    /// Adds `(type name, alias)` rows whose alias is not bound yet.
    ///
    /// Returns the number of aliases added. Malformed rows and unknown types
    /// are reported and skipped.
    pub fn add_aliases_if_absent<'a>(
        &mut self,
        types: &TypeRegistry,
        rows: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<usize, ConfigError> {
        self.check("add aliases")?;

        let mut added = 0;
        for (type_name, alias) in rows {
            let (type_name, alias) = (type_name.trim(), alias.trim());
            if type_name.is_empty() || alias.is_empty() {
                self.report(Warning::MalformedEntry {
                    table: "alias",
                    entry: alias_row(type_name, alias),
                });
                continue;
            }
            if self.aliases.contains_key(alias) {
                continue;
            }
            if let Some(ty) = self.resolve_type(types, type_name, "alias") {
                self.aliases.insert(alias.to_owned(), ty);
                added += 1;
            }
        }
        Ok(added)
    }

    /// Replaces every alias, baseline included.
    pub fn replace_aliases(&mut self, entries: impl IntoIterator<Item = (String, Type)>) -> Result<(), ConfigError> {
        self.check("replace aliases")?;
        self.aliases.replace_all(entries);
        Ok(())
    }

    /// Unbinds `alias`; returns whether it was bound.
    pub fn remove_alias(&mut self, alias: &str) -> Result<bool, ConfigError> {
        self.check("remove an alias")?;
        Ok(self.aliases.remove(alias))
    }

    /// The type path `alias` stands for, or `alias` itself.
    pub fn type_name_for_alias<'a>(&'a self, alias: &'a str) -> &'a str {
        self.aliases.get(alias).map_or(alias, |ty| ty.path())
    }

    #[inline]
    pub fn type_for_alias(&self, alias: &str) -> Option<Type> {
        self.aliases.get(alias).copied()
    }

    /// The first alias bound to the type with path `type_path`.
    pub fn alias_of_type(&self, type_path: &str) -> Option<&str> {
        self.aliases
            .iter()
            .find(|(_, ty)| ty.path() == type_path)
            .map(|(alias, _)| alias.as_str())
    }

    pub fn aliases(&self) -> impl Iterator<Item = (&str, Type)> {
        self.aliases.iter().map(|(alias, ty)| (alias.as_str(), *ty))
    }

    // ---------------------------------------------------------------------
    // Coercions

    /// Reads values declared as `S` into `D` instead.
    pub fn set_coercion<S: Typed + ?Sized, D: Typed + ?Sized>(&mut self) -> Result<(), ConfigError> {
        self.set_coercion_type(S::type_info().ty(), D::type_info().ty())
    }

    pub fn set_coercion_type(&mut self, source: Type, destination: Type) -> Result<(), ConfigError> {
        self.check("set a coercion")?;
        self.coercions.insert(source, destination);
        Ok(())
    }

    /// Returns `Ok(false)` and reports a warning if either type is unknown.
    pub fn set_coercion_by_name(
        &mut self,
        types: &TypeRegistry,
        source: &str,
        destination: &str,
    ) -> Result<bool, ConfigError> {
        self.check("set a coercion")?;
        non_empty(source, "coercion source must not be empty")?;
        non_empty(destination, "coercion destination must not be empty")?;

        let source = self.resolve_type(types, source, "coercion");
        let destination = self.resolve_type(types, destination, "coercion");
        match (source, destination) {
            (Some(s), Some(d)) => self.set_coercion_type(s, d).map(|()| true),
            _ => Ok(false),
        }
    }

    pub fn replace_coercions(&mut self, entries: impl IntoIterator<Item = (Type, Type)>) -> Result<(), ConfigError> {
        self.check("replace coercions")?;
        self.coercions.replace_all(entries);
        Ok(())
    }

    #[inline]
    pub fn coerced_type_for(&self, ty: Type) -> Option<Type> {
        self.coercions.get(&ty).copied()
    }

    #[inline]
    pub fn is_coerced(&self, ty: Type) -> bool {
        self.coercions.contains_key(&ty)
    }

    // ---------------------------------------------------------------------
    // Custom readers

    pub fn set_custom_reader(&mut self, ty: Type, reader: Arc<dyn CustomReader>) -> Result<(), ConfigError> {
        self.check("set a custom reader")?;
        self.custom_readers.insert(ty, reader);
        Ok(())
    }

    /// Replaces every custom reader, baseline included.
    pub fn replace_custom_readers(
        &mut self,
        entries: impl IntoIterator<Item = (Type, Arc<dyn CustomReader>)>,
    ) -> Result<(), ConfigError> {
        self.check("replace custom readers")?;
        self.custom_readers.replace_all(entries);
        Ok(())
    }

    #[inline]
    pub fn has_exact_custom_reader(&self, ty: Type) -> bool {
        self.custom_readers.contains_key(&ty)
    }

    /// The reader registered for `info` or its closest supertype.
    pub fn custom_reader_for(&self, info: &'static TypeInfo) -> Option<Arc<dyn CustomReader>> {
        let key = self.closest_cached(&self.reader_cache, &self.custom_readers, info)?;
        self.custom_readers.get(&key).cloned()
    }

    // ---------------------------------------------------------------------
    // Factories

    pub fn set_factory(&mut self, ty: Type, factory: Arc<dyn ClassFactory>) -> Result<(), ConfigError> {
        self.check("set a factory")?;
        self.factories.insert(ty, factory);
        Ok(())
    }

    /// Replaces every factory, baseline included.
    pub fn replace_factories(
        &mut self,
        entries: impl IntoIterator<Item = (Type, Arc<dyn ClassFactory>)>,
    ) -> Result<(), ConfigError> {
        self.check("replace factories")?;
        self.factories.replace_all(entries);
        Ok(())
    }

    #[inline]
    pub fn has_exact_factory(&self, ty: Type) -> bool {
        self.factories.contains_key(&ty)
    }

    /// The factory registered for `info` or its closest supertype.
    ///
    /// Enums without one fall back to an [`EnumFactory`] if `types` gives
    /// them a [`TypeTraitFromValue`].
    pub fn factory_for(&self, info: &'static TypeInfo, types: &TypeRegistry) -> Option<Arc<dyn ClassFactory>> {
        if let Some(key) = self.closest_cached(&self.factory_cache, &self.factories, info) {
            return self.factories.get(&key).cloned();
        }
        let from_value = types.get_type_trait::<TypeTraitFromValue>(info.type_id());
        (info.kind() == TypeKind::Enum && from_value.is_some()).then(|| Arc::clone(&self.enum_factory))
    }

    fn closest_cached<V>(
        &self,
        cache: &Memo<Option<Type>>,
        table: &Layered<Type, V>,
        info: &'static TypeInfo,
    ) -> Option<Type> {
        if self.is_frozen() {
            cache.get_or_init(info.type_id(), || closest(table, info))
        } else {
            closest(table, info)
        }
    }

    // ---------------------------------------------------------------------
    // Custom reading opt-out

    /// Keeps `ty` from picking up an inherited custom reader.
    pub fn mark_not_custom_read(&mut self, ty: Type) -> Result<(), ConfigError> {
        self.check("mark a type as not custom read")?;
        self.not_custom_read.insert(ty, ());
        Ok(())
    }

    pub fn replace_not_custom_read(&mut self, types: impl IntoIterator<Item = Type>) -> Result<(), ConfigError> {
        self.check("replace the not-custom-read types")?;
        self.not_custom_read.replace_all(types.into_iter().map(|ty| (ty, ())));
        Ok(())
    }

    #[inline]
    pub fn is_excluded_from_custom_reading(&self, ty: Type) -> bool {
        self.not_custom_read.contains_key(&ty)
    }

    // ---------------------------------------------------------------------
    // Reference tracking

    pub fn mark_non_referenceable(&mut self, ty: Type) -> Result<(), ConfigError> {
        self.check("mark a type as non-referenceable")?;
        self.non_referenceable.insert(ty, ());
        Ok(())
    }

    /// Whether values of `info` are always written inline.
    ///
    /// Numbers, text, temporals and enums (on the type or any parent) always
    /// are; other types only when marked.
    pub fn is_non_referenceable(&self, info: &'static TypeInfo) -> bool {
        self.non_referenceable.contains_key(&info.ty()) || info.ancestors().any(|t| t.kind().is_value_like())
    }

    // ---------------------------------------------------------------------
    // Attribute exclusions

    /// Hides the named attributes of `ty` (and of its ancestors, when viewed
    /// from `ty`) from attribute discovery.
    pub fn exclude_attributes<S: Into<String>>(
        &mut self,
        ty: Type,
        names: impl IntoIterator<Item = S>,
    ) -> Result<(), ConfigError> {
        self.check("exclude attributes")?;
        self.excluded
            .get_or_insert_with(ty, NameSet::default)
            .extend(names.into_iter().map(Into::into));
        Ok(())
    }

    /// Like [`exclude_attributes`](Self::exclude_attributes), for injection only.
    pub fn exclude_injector_attributes<S: Into<String>>(
        &mut self,
        ty: Type,
        names: impl IntoIterator<Item = S>,
    ) -> Result<(), ConfigError> {
        self.check("exclude injector attributes")?;
        self.injector_excluded
            .get_or_insert_with(ty, NameSet::default)
            .extend(names.into_iter().map(Into::into));
        Ok(())
    }

    /// Names excluded for `ty` by either table.
    pub fn excluded_attributes(&self, ty: Type) -> IndexSet<&str, FixedHashState> {
        self.excluded_names(ty).collect()
    }

    pub(crate) fn excluded_names(&self, ty: Type) -> impl Iterator<Item = &str> {
        let general = self.excluded.get(&ty).into_iter().flatten();
        let injector = self.injector_excluded.get(&ty).into_iter().flatten();
        general.chain(injector).map(String::as_str)
    }

    // ---------------------------------------------------------------------
    // Non-standard mappings

    /// Routes attribute `declared` of `ty` to the setter method `external`.
    pub fn set_non_standard_mapping(&mut self, ty: Type, declared: &str, external: &str) -> Result<(), ConfigError> {
        self.check("set a non-standard mapping")?;
        non_empty(declared, "declared attribute name must not be empty")?;
        non_empty(external, "external name must not be empty")?;
        self.mappings.set(ty, declared.to_owned(), external.to_owned());
        Ok(())
    }

    #[inline]
    pub fn non_standard_mappings(&self) -> &NonStandardMappings {
        &self.mappings
    }

    // ---------------------------------------------------------------------
    // Snapshot

    pub(crate) fn snapshot(&self) -> Baseline {
        Baseline {
            aliases: Arc::new(self.aliases.flatten()),
            coercions: Arc::new(self.coercions.flatten()),
            custom_readers: Arc::new(self.custom_readers.flatten()),
            factories: Arc::new(self.factories.flatten()),
            non_referenceable: Arc::new(self.non_referenceable.flatten()),
            not_custom_read: Arc::new(self.not_custom_read.flatten()),
            excluded: Arc::new(self.excluded.flatten()),
            injector_excluded: Arc::new(self.injector_excluded.flatten()),
            mappings: Arc::new(self.mappings.flatten()),
            warnings: self.warnings.clone().into_boxed_slice(),
        }
    }
}

impl fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionRegistry")
            .field("frozen", &self.is_frozen())
            .field("aliases", &self.aliases)
            .field("coercions", &self.coercions)
            .field("custom_readers", &self.custom_readers.keys().collect::<Vec<_>>())
            .field("factories", &self.factories.keys().collect::<Vec<_>>())
            .field("non_referenceable", &self.non_referenceable.keys().collect::<Vec<_>>())
            .field("not_custom_read", &self.not_custom_read.keys().collect::<Vec<_>>())
            .field("excluded", &self.excluded)
            .field("injector_excluded", &self.injector_excluded)
            .field("mappings", &self.mappings)
            .finish_non_exhaustive()
    }
}

fn non_empty(value: &str, message: &'static str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::InvalidArgument(message));
    }
    Ok(())
}

fn alias_row(type_name: &str, alias: &str) -> String {
    format!("{type_name} = {alias}")
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::sync::Arc;
    use alloc::vec::Vec;
    use core::any::Any;

    use serde_json::{Value, json};
    use weft_introspect::info::{Type, TypeInfo, Typed};
    use weft_introspect::registry::TypeRegistry;
    use weft_utils::collections::SealFlag;

    use super::ExtensionRegistry;
    use crate::extension::{ClassFactory, CustomReader};
    use crate::fixtures::{self, Animal, ArrayList, Color, Dog, EmptyList, Pet, Robot, Talker, Walker};
    use crate::{BoxError, ConfigError, Warning};

    fn reader(tag: &'static str) -> Arc<dyn CustomReader> {
        Arc::new(move |_: Value, _: &'static TypeInfo| -> Result<Box<dyn Any + Send>, BoxError> { Ok(Box::new(tag)) })
    }

    fn tag_of(reader: &dyn CustomReader) -> &'static str {
        let out = reader.read(Value::Null, Dog::type_info()).unwrap();
        *out.downcast::<&'static str>().unwrap()
    }

    struct Blank;

    impl ClassFactory for Blank {
        fn new_instance(&self, _: &'static TypeInfo, _: &Value, _: &TypeRegistry) -> Result<Box<dyn Any + Send>, BoxError> {
            Ok(Box::new(Dog::default()))
        }
    }

    #[test]
    fn alias_conflict_last_write_wins() {
        let types = fixtures::registry();
        let mut registry = ExtensionRegistry::new(SealFlag::new());

        assert!(registry.set_alias_by_name(&types, "Dog", "Foo").unwrap());
        assert!(registry.set_alias_by_name(&types, "Robot", "Foo").unwrap());

        assert_eq!(registry.type_for_alias("Foo"), Some(Type::of::<Robot>()));
        assert_eq!(registry.type_name_for_alias("Foo"), Type::of::<Robot>().path());
        assert_eq!(registry.alias_of_type(Type::of::<Robot>().path()), Some("Foo"));
        assert_eq!(registry.alias_of_type(Type::of::<Dog>().path()), None);
        assert!(matches!(
            registry.warnings(),
            [Warning::AliasConflict { alias, .. }] if alias == "Foo"
        ));

        // Rebinding to the same type is not a conflict.
        registry.set_alias::<Robot>("Foo").unwrap();
        assert_eq!(registry.warnings().len(), 1);
    }

    #[test]
    fn unknown_alias_type_is_skipped() {
        let types = fixtures::registry();
        let mut registry = ExtensionRegistry::new(SealFlag::new());

        assert!(!registry.set_alias_by_name(&types, "com.example.Missing", "Missing").unwrap());
        assert_eq!(registry.type_name_for_alias("Missing"), "Missing");
        assert!(matches!(registry.warnings(), [Warning::UnknownType { table: "alias", .. }]));
        assert_eq!(
            registry.set_alias::<Dog>(""),
            Err(ConfigError::InvalidArgument("alias must not be empty"))
        );
    }

    #[test]
    fn extended_aliases_never_override() {
        let types = fixtures::registry();
        let mut registry = ExtensionRegistry::new(SealFlag::new());
        registry.set_alias::<Dog>("pet").unwrap();

        let added = registry
            .add_aliases_if_absent(&types, [("Robot", "pet"), ("Robot", "bot"), ("", "x")])
            .unwrap();
        assert_eq!(added, 1);
        assert_eq!(registry.type_for_alias("pet"), Some(Type::of::<Dog>()));
        assert_eq!(registry.type_for_alias("bot"), Some(Type::of::<Robot>()));
        assert!(matches!(registry.warnings(), [Warning::MalformedEntry { .. }]));
    }

    #[test]
    fn coercions() {
        let types = fixtures::registry();
        let mut registry = ExtensionRegistry::new(SealFlag::new());
        registry.set_coercion::<EmptyList, ArrayList>().unwrap();

        assert_eq!(registry.coerced_type_for(Type::of::<EmptyList>()), Some(Type::of::<ArrayList>()));
        assert_eq!(registry.coerced_type_for(Type::of::<Dog>()), None);
        assert!(registry.is_coerced(Type::of::<EmptyList>()));

        assert!(!registry.set_coercion_by_name(&types, "Dog", "Cat").unwrap());
        assert!(!registry.is_coerced(Type::of::<Dog>()));
    }

    #[test]
    fn closest_custom_reader() {
        let mut registry = ExtensionRegistry::new(SealFlag::new());
        registry.set_custom_reader(Type::of::<Animal>(), reader("animal")).unwrap();

        assert!(!registry.has_exact_custom_reader(Type::of::<Dog>()));
        assert_eq!(tag_of(&*registry.custom_reader_for(Dog::type_info()).unwrap()), "animal");

        registry.set_custom_reader(Type::of::<Dog>(), reader("dog")).unwrap();
        assert_eq!(tag_of(&*registry.custom_reader_for(Dog::type_info()).unwrap()), "dog");
        assert!(registry.custom_reader_for(Robot::type_info()).is_none());
    }

    #[test]
    fn frozen_lookups_are_memoized() {
        let mut registry = ExtensionRegistry::new(SealFlag::new());
        registry.set_custom_reader(Type::of::<dyn Pet>(), reader("pet")).unwrap();
        registry.set_custom_reader(Type::of::<dyn Talker>(), reader("talker")).unwrap();
        registry.freeze();

        assert_eq!(tag_of(&*registry.custom_reader_for(Robot::type_info()).unwrap()), "talker");
        assert_eq!(tag_of(&*registry.custom_reader_for(Dog::type_info()).unwrap()), "pet");
        assert!(registry.custom_reader_for(EmptyList::type_info()).is_none());
        assert_eq!(registry.reader_cache.len(), 3);

        // A second freeze only drops memoized results.
        registry.freeze();
        assert_eq!(registry.reader_cache.len(), 0);
        assert_eq!(tag_of(&*registry.custom_reader_for(Robot::type_info()).unwrap()), "talker");
    }

    #[test]
    fn factories_fall_back_to_enums() {
        let types = fixtures::registry();
        let mut registry = ExtensionRegistry::new(SealFlag::new());
        registry.set_factory(Type::of::<dyn Walker>(), Arc::new(Blank)).unwrap();

        let walker = registry.factory_for(Robot::type_info(), &types).unwrap();
        assert!(!walker.is_object_final());
        assert!(registry.factory_for(Dog::type_info(), &types).is_none());

        let color = registry.factory_for(Color::type_info(), &types).unwrap();
        assert!(color.is_object_final());
        let green = color.new_instance(Color::type_info(), &json!("Green"), &types).unwrap();
        assert_eq!(*green.downcast::<Color>().unwrap(), Color::Green);

        registry.replace_factories([]).unwrap();
        assert!(registry.factory_for(Robot::type_info(), &types).is_none());
    }

    #[test]
    fn value_like_types_are_never_referenced() {
        let mut registry = ExtensionRegistry::new(SealFlag::new());
        assert!(registry.is_non_referenceable(u64::type_info()));
        assert!(registry.is_non_referenceable(String::type_info()));
        assert!(registry.is_non_referenceable(Color::type_info()));
        assert!(!registry.is_non_referenceable(Dog::type_info()));

        registry.mark_non_referenceable(Type::of::<Dog>()).unwrap();
        assert!(registry.is_non_referenceable(Dog::type_info()));
        assert!(!registry.is_non_referenceable(Animal::type_info()));
    }

    #[test]
    fn custom_reading_opt_out() {
        let mut registry = ExtensionRegistry::new(SealFlag::new());
        registry.mark_not_custom_read(Type::of::<Dog>()).unwrap();
        assert!(registry.is_excluded_from_custom_reading(Type::of::<Dog>()));

        registry.replace_not_custom_read([Type::of::<Robot>()]).unwrap();
        assert!(!registry.is_excluded_from_custom_reading(Type::of::<Dog>()));
        assert!(registry.is_excluded_from_custom_reading(Type::of::<Robot>()));
    }

    #[test]
    fn exclusions_are_a_union() {
        let mut registry = ExtensionRegistry::new(SealFlag::new());
        registry.exclude_attributes(Type::of::<Dog>(), ["name", "breed"]).unwrap();
        registry.exclude_injector_attributes(Type::of::<Dog>(), ["breed", "age"]).unwrap();

        let excluded = registry.excluded_attributes(Type::of::<Dog>());
        assert_eq!(excluded.into_iter().collect::<Vec<_>>(), ["name", "breed", "age"]);
        assert!(registry.excluded_attributes(Type::of::<Animal>()).is_empty());
    }

    #[test]
    fn frozen_registry_rejects_every_mutation() {
        let types = fixtures::registry();
        let mut registry = ExtensionRegistry::new(SealFlag::new());
        registry.set_alias::<Dog>("dog").unwrap();
        registry.freeze();
        registry.freeze();
        assert!(registry.is_frozen());

        for _ in 0..2 {
            assert!(matches!(registry.set_alias::<Robot>("dog"), Err(ConfigError::Frozen { .. })));
            assert!(matches!(registry.remove_alias("dog"), Err(ConfigError::Frozen { .. })));
            assert!(matches!(
                registry.set_alias_by_name(&types, "Missing", "missing"),
                Err(ConfigError::Frozen { .. })
            ));
            assert!(matches!(
                registry.add_aliases_if_absent(&types, [("Missing", "missing")]),
                Err(ConfigError::Frozen { .. })
            ));
            assert!(matches!(
                registry.set_coercion_by_name(&types, "Missing", "Dog"),
                Err(ConfigError::Frozen { .. })
            ));
            assert!(matches!(
                registry.set_coercion::<EmptyList, ArrayList>(),
                Err(ConfigError::Frozen { .. })
            ));
            assert!(matches!(
                registry.set_custom_reader(Type::of::<Dog>(), reader("dog")),
                Err(ConfigError::Frozen { .. })
            ));
            assert!(matches!(
                registry.exclude_attributes(Type::of::<Dog>(), ["name"]),
                Err(ConfigError::Frozen { .. })
            ));
            assert!(matches!(
                registry.set_non_standard_mapping(Type::of::<Dog>(), "name", "rename"),
                Err(ConfigError::Frozen { .. })
            ));
        }

        assert_eq!(registry.type_for_alias("dog"), Some(Type::of::<Dog>()));
        assert!(!registry.is_coerced(Type::of::<EmptyList>()));
        assert!(registry.excluded_attributes(Type::of::<Dog>()).is_empty());
        assert!(registry.warnings().is_empty());
    }

    #[test]
    fn forks_are_independent() {
        let mut original = ExtensionRegistry::new(SealFlag::new());
        original.set_alias::<Dog>("dog").unwrap();
        original.freeze();

        let mut fork = original.fork(SealFlag::new());
        assert!(!fork.is_frozen());
        fork.set_alias::<Robot>("bot").unwrap();
        fork.remove_alias("dog").unwrap();

        assert_eq!(original.type_for_alias("dog"), Some(Type::of::<Dog>()));
        assert_eq!(original.type_for_alias("bot"), None);
        assert_eq!(fork.aliases().collect::<Vec<_>>(), [("bot", Type::of::<Robot>())]);
    }
}
