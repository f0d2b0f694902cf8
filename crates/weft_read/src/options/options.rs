use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use indexmap::IndexMap;
use serde_json::Value;
use weft_introspect::info::{Type, TypeInfo, Typed};
use weft_introspect::registry::{TypeMeta, TypeRegistry};
use weft_utils::collections::{SealFlag, SealableVec};
use weft_utils::hash::FixedHashState;

use crate::Warning;
use crate::extension::{ClassFactory, CustomReader, ExtensionRegistry};
use crate::filter::{AttributeFilter, EnumAttributeFilter, StaticAttributeFilter};
use crate::injector::{InjectorFactory, MethodInjectorFactory};
use crate::metadata::{AttributeMap, InjectorMap, MetadataRules, TypeMetadataCache};
use crate::options::{Converter, MissingFieldHandler, ReadSettings, ReturnType};

// -----------------------------------------------------------------------------
// ReadOptions

/// A frozen reader configuration.
///
/// Produced by [`ReadOptionsBuilder::build`](crate::ReadOptionsBuilder::build)
/// and shared as an `Arc` by every concurrent read. It exposes accessors only;
/// the attribute and injector maps it hands out are built on first request
/// per type and memoized.
pub struct ReadOptions {
    pub(crate) types: TypeRegistry,
    pub(crate) extensions: ExtensionRegistry,
    pub(crate) injector_factories: SealableVec<Arc<dyn InjectorFactory>>,
    pub(crate) attribute_filters: SealableVec<Arc<dyn AttributeFilter>>,
    pub(crate) settings: ReadSettings,
    pub(crate) unknown_type: Option<&'static TypeInfo>,
    pub(crate) missing_field_handler: Option<Arc<dyn MissingFieldHandler>>,
    pub(crate) custom_options: IndexMap<String, Value, FixedHashState>,
    pub(crate) converters: IndexMap<(Type, Type), Converter, FixedHashState>,
    pub(crate) seal: SealFlag,
    pub(crate) metadata: TypeMetadataCache,
}

impl ReadOptions {
    /// A mutable draft with the default strategies, sealed together with `extensions`.
    pub(crate) fn draft(types: TypeRegistry, extensions: ExtensionRegistry) -> Self {
        let seal = extensions.seal_flag().clone();
        let factories: Vec<Arc<dyn InjectorFactory>> = alloc::vec![Arc::new(MethodInjectorFactory)];
        let filters: Vec<Arc<dyn AttributeFilter>> =
            alloc::vec![Arc::new(StaticAttributeFilter), Arc::new(EnumAttributeFilter)];
        Self {
            types,
            extensions,
            injector_factories: SealableVec::from_vec(factories, seal.clone()),
            attribute_filters: SealableVec::from_vec(filters, seal.clone()),
            settings: ReadSettings::default(),
            unknown_type: None,
            missing_field_handler: None,
            custom_options: IndexMap::with_hasher(FixedHashState),
            converters: IndexMap::with_hasher(FixedHashState),
            seal,
            metadata: TypeMetadataCache::new(),
        }
    }

    /// An empty placeholder, left behind when a draft is moved out.
    pub(crate) fn vacant() -> Self {
        let seal = SealFlag::new();
        Self {
            types: TypeRegistry::empty(),
            extensions: ExtensionRegistry::new(seal.clone()),
            injector_factories: SealableVec::new(seal.clone()),
            attribute_filters: SealableVec::new(seal.clone()),
            settings: ReadSettings::default(),
            unknown_type: None,
            missing_field_handler: None,
            custom_options: IndexMap::with_hasher(FixedHashState),
            converters: IndexMap::with_hasher(FixedHashState),
            seal,
            metadata: TypeMetadataCache::new(),
        }
    }

    /// A mutable deep copy governed by `seal`, with empty caches.
    pub(crate) fn fork(&self, seal: SealFlag) -> Self {
        Self {
            types: self.types.clone(),
            extensions: self.extensions.fork(seal.clone()),
            injector_factories: self.injector_factories.fork(seal.clone()),
            attribute_filters: self.attribute_filters.fork(seal.clone()),
            settings: self.settings.clone(),
            unknown_type: self.unknown_type,
            missing_field_handler: self.missing_field_handler.clone(),
            custom_options: self.custom_options.clone(),
            converters: self.converters.clone(),
            seal,
            metadata: TypeMetadataCache::new(),
        }
    }

    /// Seals every table and starts from empty caches.
    pub(crate) fn freeze(&mut self) {
        self.seal.seal();
        self.extensions.freeze();
        self.metadata = TypeMetadataCache::new();
    }

    fn rules(&self) -> MetadataRules<'_> {
        MetadataRules {
            extensions: &self.extensions,
            filters: self.attribute_filters.as_slice(),
            factories: self.injector_factories.as_slice(),
        }
    }

    // ---------------------------------------------------------------------
    // Attribute level

    /// Every attribute of `info` and its ancestors that takes part in reading.
    pub fn attributes_of(&self, info: &'static TypeInfo) -> Arc<AttributeMap> {
        self.metadata.attributes_of(info, &self.rules())
    }

    #[inline]
    pub fn attributes_of_type<T: Typed + ?Sized>(&self) -> Arc<AttributeMap> {
        self.attributes_of(T::type_info())
    }

    /// The injector of every writable attribute of `info`.
    pub fn injectors_of(&self, info: &'static TypeInfo) -> Arc<InjectorMap> {
        self.metadata.injectors_of(info, &self.rules())
    }

    #[inline]
    pub fn injectors_of_type<T: Typed + ?Sized>(&self) -> Arc<InjectorMap> {
        self.injectors_of(T::type_info())
    }

    // ---------------------------------------------------------------------
    // Type level

    /// Resolves an alias, type path or unambiguous simple name.
    pub fn resolve_type(&self, name: &str) -> Option<&'static TypeInfo> {
        let name = self.extensions.type_name_for_alias(name);
        self.types.resolve(name).map(TypeMeta::type_info)
    }

    #[inline]
    pub fn type_name_for_alias<'a>(&'a self, alias: &'a str) -> &'a str {
        self.extensions.type_name_for_alias(alias)
    }

    #[inline]
    pub fn coerced_type_for(&self, ty: Type) -> Option<Type> {
        self.extensions.coerced_type_for(ty)
    }

    #[inline]
    pub fn is_non_referenceable(&self, info: &'static TypeInfo) -> bool {
        self.extensions.is_non_referenceable(info)
    }

    #[inline]
    pub fn is_excluded_from_custom_reading(&self, ty: Type) -> bool {
        self.extensions.is_excluded_from_custom_reading(ty)
    }

    #[inline]
    pub fn custom_reader_for(&self, info: &'static TypeInfo) -> Option<Arc<dyn CustomReader>> {
        self.extensions.custom_reader_for(info)
    }

    #[inline]
    pub fn factory_for(&self, info: &'static TypeInfo) -> Option<Arc<dyn ClassFactory>> {
        self.extensions.factory_for(info, &self.types)
    }

    /// The converter registered for reading a `source` value as `target`.
    #[inline]
    pub fn converter(&self, source: Type, target: Type) -> Option<&Converter> {
        self.converters.get(&(source, target))
    }

    // ---------------------------------------------------------------------
    // Components

    #[inline]
    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    #[inline]
    pub fn extensions(&self) -> &ExtensionRegistry {
        &self.extensions
    }

    #[inline]
    pub fn injector_factories(&self) -> &[Arc<dyn InjectorFactory>] {
        self.injector_factories.as_slice()
    }

    #[inline]
    pub fn attribute_filters(&self) -> &[Arc<dyn AttributeFilter>] {
        self.attribute_filters.as_slice()
    }

    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.seal.is_sealed()
    }

    #[inline]
    pub fn warnings(&self) -> &[Warning] {
        self.extensions.warnings()
    }

    // ---------------------------------------------------------------------
    // Settings

    #[inline]
    pub fn settings(&self) -> &ReadSettings {
        &self.settings
    }

    #[inline]
    pub fn max_depth(&self) -> usize {
        self.settings.max_depth
    }

    #[inline]
    pub fn fail_on_unknown_type(&self) -> bool {
        self.settings.fail_on_unknown_type
    }

    #[inline]
    pub fn close_stream(&self) -> bool {
        self.settings.close_stream
    }

    #[inline]
    pub fn allow_nan_and_infinity(&self) -> bool {
        self.settings.allow_nan_and_infinity
    }

    #[inline]
    pub fn return_type(&self) -> ReturnType {
        self.settings.return_type
    }

    /// The type unknown type names are read into, if any.
    #[inline]
    pub fn unknown_type(&self) -> Option<&'static TypeInfo> {
        self.unknown_type
    }

    #[inline]
    pub fn missing_field_handler(&self) -> Option<&dyn MissingFieldHandler> {
        self.missing_field_handler.as_deref()
    }

    #[inline]
    pub fn custom_option(&self, key: &str) -> Option<&Value> {
        self.custom_options.get(key)
    }

    pub fn custom_options(&self) -> impl ExactSizeIterator<Item = (&str, &Value)> {
        self.custom_options.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl fmt::Debug for ReadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadOptions")
            .field("frozen", &self.is_frozen())
            .field("settings", &self.settings)
            .field("types", &self.types.len())
            .field("extensions", &self.extensions)
            .field("injector_factories", &self.injector_factories.len())
            .field("attribute_filters", &self.attribute_filters.len())
            .field("unknown_type", &self.unknown_type.map(TypeInfo::type_path))
            .field("custom_options", &self.custom_options)
            .field("cached_types", &self.metadata.len())
            .finish_non_exhaustive()
    }
}
