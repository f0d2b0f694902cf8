use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use core::mem;

use serde_json::Value;
use weft_introspect::info::{Type, TypeInfo, Typed};
use weft_introspect::registry::{FromType, GetTypeMeta, TypeRegistry, TypeTrait};
use weft_utils::collections::SealFlag;

use crate::extension::{Baseline, ClassFactory, CustomReader, ExtensionRegistry};
use crate::filter::AttributeFilter;
use crate::injector::InjectorFactory;
use crate::options::{Converter, MissingFieldHandler, ReadOptions, ReadSettings, ReturnType};
use crate::{ConfigError, Warning};

// -----------------------------------------------------------------------------
// ReadOptionsBuilder

enum State {
    Draft(Box<ReadOptions>),
    Built(Arc<ReadOptions>),
}

/// The mutable phase of a reader configuration.
///
/// Every mutator returns `Result<&mut Self, ConfigError>` so calls chain
/// with `?`. [`build`](Self::build) ends the mutable phase for good: later
/// calls to `build` return the same [`ReadOptions`], and every mutator fails
/// with [`ConfigError::Frozen`].
///
/// # Example
///
/// ```
/// use weft_read::{ConfigError, ReadOptionsBuilder};
///
/// let mut builder = ReadOptionsBuilder::new();
/// builder.max_depth(64)?.fail_on_unknown_type(true)?;
///
/// let options = builder.build();
/// assert_eq!(options.max_depth(), 64);
/// assert!(std::sync::Arc::ptr_eq(&options, &builder.build()));
/// assert!(matches!(builder.max_depth(8), Err(ConfigError::Frozen { .. })));
/// # Ok::<(), ConfigError>(())
/// ```
pub struct ReadOptionsBuilder {
    state: State,
}

impl Default for ReadOptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadOptionsBuilder {
    /// Built-in scalar types, no extension tables, default strategies.
    pub fn new() -> Self {
        Self::with_types(TypeRegistry::new(), &Baseline::empty())
    }

    /// Extension tables start out as `baseline`.
    pub fn with_baseline(baseline: &Baseline) -> Self {
        Self::with_types(TypeRegistry::new(), baseline)
    }

    pub fn with_types(types: TypeRegistry, baseline: &Baseline) -> Self {
        let extensions = ExtensionRegistry::with_baseline(baseline, SealFlag::new());
        Self::from_draft(ReadOptions::draft(types, extensions))
    }

    /// A mutable copy of `options`; changes to it never reach `options`.
    pub fn from_options(options: &ReadOptions) -> Self {
        Self::from_draft(options.fork(SealFlag::new()))
    }

    fn from_draft(draft: ReadOptions) -> Self {
        Self {
            state: State::Draft(Box::new(draft)),
        }
    }

    /// Freezes the configuration.
    ///
    /// The first call seals every table and moves the draft into the returned
    /// [`ReadOptions`], with empty derived caches. Later calls return the
    /// same `Arc`.
    pub fn build(&mut self) -> Arc<ReadOptions> {
        let options = match &mut self.state {
            State::Built(options) => return Arc::clone(options),
            State::Draft(draft) => {
                draft.freeze();
                Arc::new(mem::replace(&mut **draft, ReadOptions::vacant()))
            }
        };
        log::debug!("read options frozen: {options:?}");
        self.state = State::Built(Arc::clone(&options));
        options
    }

    #[inline]
    pub fn is_built(&self) -> bool {
        matches!(self.state, State::Built(_))
    }

    /// Soft failures reported so far.
    pub fn warnings(&self) -> &[Warning] {
        match &self.state {
            State::Draft(draft) => draft.warnings(),
            State::Built(options) => options.warnings(),
        }
    }

    fn draft(&mut self, operation: &'static str) -> Result<&mut ReadOptions, ConfigError> {
        match &mut self.state {
            State::Draft(draft) => Ok(&mut **draft),
            State::Built(_) => Err(ConfigError::Frozen { operation }),
        }
    }

    // ---------------------------------------------------------------------
    // Types

    /// Registers `T`, its supertypes and dependencies.
    pub fn register_type<T: GetTypeMeta + ?Sized>(&mut self) -> Result<&mut Self, ConfigError> {
        self.draft("register a type")?.types.register::<T>();
        Ok(self)
    }

    /// Attaches the capability `D` to `T`, registering `T` first if needed.
    pub fn register_type_trait<T: GetTypeMeta, D: TypeTrait + FromType<T>>(
        &mut self,
    ) -> Result<&mut Self, ConfigError> {
        let types = &mut self.draft("register a type trait")?.types;
        types.register::<T>();
        types.register_type_trait::<T, D>();
        Ok(self)
    }

    /// Direct access to the extension tables while the draft is open.
    pub fn extensions_mut(&mut self) -> Result<&mut ExtensionRegistry, ConfigError> {
        Ok(&mut self.draft("modify extensions")?.extensions)
    }

    // ---------------------------------------------------------------------
    // Extensions

    pub fn alias<T: Typed + ?Sized>(&mut self, alias: &str) -> Result<&mut Self, ConfigError> {
        self.draft("set an alias")?.extensions.set_alias::<T>(alias)?;
        Ok(self)
    }

    /// Binds `alias` to a registered type name; unknown names are reported
    /// as warnings and skipped.
    pub fn alias_by_name(&mut self, type_name: &str, alias: &str) -> Result<&mut Self, ConfigError> {
        let draft = self.draft("set an alias")?;
        draft
            .extensions
            .set_alias_by_name(&draft.types, type_name, alias)?;
        Ok(self)
    }

    /// Adds `(type name, alias)` rows whose alias is not bound yet.
    pub fn aliases_if_absent<'a>(
        &mut self,
        rows: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<&mut Self, ConfigError> {
        let draft = self.draft("add aliases")?;
        draft.extensions.add_aliases_if_absent(&draft.types, rows)?;
        Ok(self)
    }

    pub fn remove_alias(&mut self, alias: &str) -> Result<&mut Self, ConfigError> {
        self.draft("remove an alias")?.extensions.remove_alias(alias)?;
        Ok(self)
    }

    pub fn coercion<S: Typed + ?Sized, D: Typed + ?Sized>(&mut self) -> Result<&mut Self, ConfigError> {
        self.draft("set a coercion")?.extensions.set_coercion::<S, D>()?;
        Ok(self)
    }

    pub fn coercion_by_name(&mut self, source: &str, destination: &str) -> Result<&mut Self, ConfigError> {
        let draft = self.draft("set a coercion")?;
        draft
            .extensions
            .set_coercion_by_name(&draft.types, source, destination)?;
        Ok(self)
    }

    pub fn custom_reader(&mut self, ty: Type, reader: Arc<dyn CustomReader>) -> Result<&mut Self, ConfigError> {
        self.draft("set a custom reader")?
            .extensions
            .set_custom_reader(ty, reader)?;
        Ok(self)
    }

    pub fn factory(&mut self, ty: Type, factory: Arc<dyn ClassFactory>) -> Result<&mut Self, ConfigError> {
        self.draft("set a factory")?.extensions.set_factory(ty, factory)?;
        Ok(self)
    }

    pub fn not_custom_read(&mut self, ty: Type) -> Result<&mut Self, ConfigError> {
        self.draft("mark a type as not custom read")?
            .extensions
            .mark_not_custom_read(ty)?;
        Ok(self)
    }

    pub fn non_referenceable(&mut self, ty: Type) -> Result<&mut Self, ConfigError> {
        self.draft("mark a type as non-referenceable")?
            .extensions
            .mark_non_referenceable(ty)?;
        Ok(self)
    }

    pub fn exclude_attributes<S: Into<String>>(
        &mut self,
        ty: Type,
        names: impl IntoIterator<Item = S>,
    ) -> Result<&mut Self, ConfigError> {
        self.draft("exclude attributes")?
            .extensions
            .exclude_attributes(ty, names)?;
        Ok(self)
    }

    pub fn exclude_injector_attributes<S: Into<String>>(
        &mut self,
        ty: Type,
        names: impl IntoIterator<Item = S>,
    ) -> Result<&mut Self, ConfigError> {
        self.draft("exclude injector attributes")?
            .extensions
            .exclude_injector_attributes(ty, names)?;
        Ok(self)
    }

    pub fn non_standard_mapping(&mut self, ty: Type, declared: &str, external: &str) -> Result<&mut Self, ConfigError> {
        self.draft("set a non-standard mapping")?
            .extensions
            .set_non_standard_mapping(ty, declared, external)?;
        Ok(self)
    }

    // ---------------------------------------------------------------------
    // Strategies

    /// Appends an injector factory; earlier factories take precedence.
    pub fn add_injector_factory(&mut self, factory: Arc<dyn InjectorFactory>) -> Result<&mut Self, ConfigError> {
        self.draft("add an injector factory")?
            .injector_factories
            .push(factory)?;
        Ok(self)
    }

    pub fn add_attribute_filter(&mut self, filter: Arc<dyn AttributeFilter>) -> Result<&mut Self, ConfigError> {
        self.draft("add an attribute filter")?
            .attribute_filters
            .push(filter)?;
        Ok(self)
    }

    pub fn clear_injector_factories(&mut self) -> Result<&mut Self, ConfigError> {
        self.draft("clear injector factories")?
            .injector_factories
            .clear()?;
        Ok(self)
    }

    pub fn clear_attribute_filters(&mut self) -> Result<&mut Self, ConfigError> {
        self.draft("clear attribute filters")?
            .attribute_filters
            .clear()?;
        Ok(self)
    }

    // ---------------------------------------------------------------------
    // Settings

    /// Replaces every scalar setting.
    pub fn settings(&mut self, settings: ReadSettings) -> Result<&mut Self, ConfigError> {
        self.draft("replace settings")?.settings = settings;
        Ok(self)
    }

    pub fn max_depth(&mut self, max_depth: usize) -> Result<&mut Self, ConfigError> {
        self.draft("set the max depth")?.settings.max_depth = max_depth;
        Ok(self)
    }

    pub fn fail_on_unknown_type(&mut self, fail: bool) -> Result<&mut Self, ConfigError> {
        self.draft("set fail on unknown type")?
            .settings
            .fail_on_unknown_type = fail;
        Ok(self)
    }

    pub fn close_stream(&mut self, close: bool) -> Result<&mut Self, ConfigError> {
        self.draft("set close stream")?.settings.close_stream = close;
        Ok(self)
    }

    pub fn allow_nan_and_infinity(&mut self, allow: bool) -> Result<&mut Self, ConfigError> {
        self.draft("set allow NaN and infinity")?
            .settings
            .allow_nan_and_infinity = allow;
        Ok(self)
    }

    pub fn return_type(&mut self, return_type: ReturnType) -> Result<&mut Self, ConfigError> {
        self.draft("set the return type")?.settings.return_type = return_type;
        Ok(self)
    }

    /// Reads unknown type names into `T`.
    pub fn unknown_type<T: Typed + ?Sized>(&mut self) -> Result<&mut Self, ConfigError> {
        self.unknown_type_info(Some(T::type_info()))
    }

    pub fn unknown_type_info(&mut self, info: Option<&'static TypeInfo>) -> Result<&mut Self, ConfigError> {
        self.draft("set the unknown type")?.unknown_type = info;
        Ok(self)
    }

    pub fn missing_field_handler(&mut self, handler: Arc<dyn MissingFieldHandler>) -> Result<&mut Self, ConfigError> {
        self.draft("set the missing field handler")?
            .missing_field_handler = Some(handler);
        Ok(self)
    }

    /// Sets an application-defined option; a `null` value removes it.
    pub fn custom_option(&mut self, key: &str, value: Value) -> Result<&mut Self, ConfigError> {
        let draft = self.draft("set a custom option")?;
        if key.is_empty() {
            return Err(ConfigError::InvalidArgument("custom option key must not be empty"));
        }
        if value.is_null() {
            draft.custom_options.shift_remove(key);
        } else {
            draft.custom_options.insert(key.into(), value);
        }
        Ok(self)
    }

    /// Overrides how a `source` value is read as `target`.
    pub fn converter(&mut self, source: Type, target: Type, converter: Converter) -> Result<&mut Self, ConfigError> {
        self.draft("set a converter")?
            .converters
            .insert((source, target), converter);
        Ok(self)
    }
}

impl core::fmt::Debug for ReadOptionsBuilder {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match &self.state {
            State::Draft(draft) => f.debug_tuple("Draft").field(draft).finish(),
            State::Built(options) => f.debug_tuple("Built").field(options).finish(),
        }
    }
}
