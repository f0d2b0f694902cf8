use core::any::TypeId;
use core::fmt;

use weft_utils::TypeIdMap;
use weft_utils::hash::{FixedHashState, HashMap, HashSet, NoOpHashState};

use crate::info::{TypeInfo, Typed};
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeTrait};

// -----------------------------------------------------------------------------
// NameIndex

/// Path and simple-name lookup for registered types.
///
/// A simple name claimed by a second type is kept as `None` so it stays
/// ambiguous even if more types with that name arrive.
#[derive(Clone)]
struct NameIndex {
    paths: HashMap<&'static str, TypeId>,
    names: HashMap<&'static str, Option<TypeId>>,
}

impl NameIndex {
    const fn new() -> Self {
        Self {
            paths: HashMap::with_hasher(FixedHashState),
            names: HashMap::with_hasher(FixedHashState),
        }
    }

    fn add(&mut self, meta: &TypeMeta) {
        let ty = meta.ty();
        self.paths.insert(ty.path(), ty.id());
        self.names
            .entry(ty.name())
            .and_modify(|slot| *slot = None)
            .or_insert(Some(ty.id()));
    }

    fn by_path(&self, path: &str) -> Option<TypeId> {
        self.paths.get(path).copied()
    }

    fn by_name(&self, name: &str) -> Option<TypeId> {
        self.names.get(name).copied().flatten()
    }

    fn is_ambiguous(&self, name: &str) -> bool {
        matches!(self.names.get(name), Some(None))
    }
}

// -----------------------------------------------------------------------------
// TypeRegistry

/// A store of described types, indexed by [`TypeId`], full path and simple name.
///
/// Name-based tables (aliases, coercions, exclusions) are resolved through it.
/// A simple name shared by two registered types becomes *ambiguous* and
/// only resolves through the full path from then on.
///
/// Supertypes pulled in by [`register`](Self::register) get a bare entry.
/// Registering such a type itself later fills in its [`GetTypeMeta`]
/// traits, so the outcome does not depend on registration order.
///
/// # Example
///
/// ```
/// use weft_introspect::registry::TypeRegistry;
///
/// let registry = TypeRegistry::new();
///
/// let by_path = registry.resolve("alloc::string::String").unwrap();
/// let by_name = registry.resolve("String").unwrap();
/// assert_eq!(by_path.ty(), by_name.ty());
/// assert!(registry.resolve("Missing").is_none());
/// ```
#[derive(Clone)]
pub struct TypeRegistry {
    metas: TypeIdMap<TypeMeta>,
    index: NameIndex,
    bare: HashSet<TypeId, NoOpHashState>,
}

impl Default for TypeRegistry {
    /// See [`TypeRegistry::new`].
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// A registry without any types.
    pub const fn empty() -> Self {
        Self {
            metas: TypeIdMap::new(),
            index: NameIndex::new(),
            bare: HashSet::with_hasher(NoOpHashState),
        }
    }

    /// A registry holding the built-in scalars listed in [`impls`](crate::impls).
    pub fn new() -> Self {
        let mut registry = Self::empty();
        crate::impls::register_scalars(&mut registry);
        registry
    }

    /// Adds a fresh entry and indexes its names. Returns `false` if `id` is known.
    fn add(&mut self, id: TypeId, meta: impl FnOnce() -> TypeMeta) -> bool {
        let index = &mut self.index;
        self.metas.try_insert(id, || {
            let meta = meta();
            index.add(&meta);
            meta
        })
    }

    /// Registers `T` if it is not registered yet, together with its supertypes
    /// and the dependencies named by [`GetTypeMeta::register_dependencies`].
    ///
    /// Returns `false` if `T` was already registered through this method or
    /// [`insert_type_meta`](Self::insert_type_meta). A bare entry left by
    /// [`register_info`](Self::register_info) is completed instead: traits it
    /// already carries are kept, the others are added.
    pub fn register<T: GetTypeMeta + ?Sized>(&mut self) -> bool {
        let id = TypeId::of::<T>();
        if self.bare.remove(&id) {
            if let Some(meta) = self.metas.get_mut(id) {
                meta.absorb(T::get_type_meta());
            }
        } else if !self.add(id, T::get_type_meta) {
            return false;
        }
        self.add_supertypes(T::type_info());
        T::register_dependencies(self);
        true
    }

    /// Registers a bare entry for a descriptor and, recursively, its supertypes.
    ///
    /// Returns `false` if the type was already present.
    pub fn register_info(&mut self, info: &'static TypeInfo) -> bool {
        if !self.add(info.type_id(), || TypeMeta::from_info(info)) {
            return false;
        }
        self.bare.insert(info.type_id());
        self.add_supertypes(info);
        true
    }

    fn add_supertypes(&mut self, info: &'static TypeInfo) {
        for supertype in info.supertypes() {
            self.register_info(supertype);
        }
    }

    /// Inserts an entry, replacing any previous one for the same type.
    ///
    /// Supertypes are not registered.
    pub fn insert_type_meta(&mut self, meta: TypeMeta) {
        if !self.metas.contains(meta.type_id()) {
            self.index.add(&meta);
        }
        self.bare.remove(&meta.type_id());
        self.metas.insert(meta.type_id(), meta);
    }

    /// Attaches the capability `D` to the already registered `T`.
    ///
    /// Returns `false` if `T` is not registered.
    pub fn register_type_trait<T: Typed, D: TypeTrait + FromType<T>>(&mut self) -> bool {
        let Some(meta) = self.metas.get_mut(TypeId::of::<T>()) else {
            return false;
        };
        meta.insert_trait(D::from_type());
        true
    }

    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.metas.contains(type_id)
    }

    #[inline]
    pub fn get(&self, type_id: TypeId) -> Option<&TypeMeta> {
        self.metas.get(type_id)
    }

    pub fn get_with_type_path(&self, type_path: &str) -> Option<&TypeMeta> {
        self.get(self.index.by_path(type_path)?)
    }

    /// Returns `None` for unknown and for ambiguous simple names.
    pub fn get_with_type_name(&self, type_name: &str) -> Option<&TypeMeta> {
        self.get(self.index.by_name(type_name)?)
    }

    /// Looks `name` up as a full path first, then as a simple name.
    pub fn resolve(&self, name: &str) -> Option<&TypeMeta> {
        let id = self.index.by_path(name).or_else(|| self.index.by_name(name))?;
        self.get(id)
    }

    /// Returns `true` if `type_name` is the simple name of more than one registered type.
    ///
    /// ```
    /// # use weft_introspect::info::{Type, TypeInfo, TypeInfoCell, TypeKind, Typed};
    /// # use weft_introspect::registry::TypeRegistry;
    /// struct A;
    /// struct B;
    ///
    /// static A_INFO: TypeInfoCell = TypeInfoCell::new();
    /// static B_INFO: TypeInfoCell = TypeInfoCell::new();
    ///
    /// let a = A_INFO.get_or_init(|| TypeInfo::with_type(Type::named::<A>("one::Item"), TypeKind::Struct));
    /// let b = B_INFO.get_or_init(|| TypeInfo::with_type(Type::named::<B>("two::Item"), TypeKind::Struct));
    ///
    /// let mut registry = TypeRegistry::empty();
    /// registry.register_info(a);
    /// registry.register_info(b);
    /// assert!(registry.is_ambiguous("Item"));
    /// assert!(registry.resolve("Item").is_none());
    /// assert!(registry.resolve("two::Item").is_some());
    /// ```
    pub fn is_ambiguous(&self, type_name: &str) -> bool {
        self.index.is_ambiguous(type_name)
    }

    pub fn get_type_trait<T: TypeTrait>(&self, type_id: TypeId) -> Option<&T> {
        self.get(type_id)?.get_trait::<T>()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.metas.len()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &TypeMeta> {
        self.metas.values()
    }

    /// Entries carrying the capability `T`, with the capability.
    pub fn iter_with_trait<T: TypeTrait>(&self) -> impl Iterator<Item = (&TypeMeta, &T)> {
        self.iter()
            .filter_map(|meta| meta.get_trait::<T>().map(|t| (meta, t)))
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.index.paths.keys()).finish()
    }
}
