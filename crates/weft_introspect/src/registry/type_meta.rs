use alloc::boxed::Box;
use core::any::TypeId;

use weft_utils::TypeIdMap;

use crate::info::{Type, TypeInfo, TypeKind, Typed};
use crate::registry::{TypeRegistry, TypeTrait};

// -----------------------------------------------------------------------------
// TypeMeta

/// Registry entry for one type: its [`TypeInfo`] and a [`TypeTrait`] table.
///
/// # Example
///
/// ```
/// use weft_introspect::registry::{FromType, TypeMeta, TypeTraitDefault};
///
/// let mut meta = TypeMeta::of::<String>();
/// meta.insert_trait::<TypeTraitDefault>(FromType::<String>::from_type());
///
/// let f = meta.get_trait::<TypeTraitDefault>().unwrap();
/// let s = f.default().downcast::<String>().unwrap();
/// assert_eq!(*s, "");
/// ```
pub struct TypeMeta {
    ty: Type,
    type_info: &'static TypeInfo,
    traits: TypeIdMap<Box<dyn TypeTrait>>,
}

impl TypeMeta {
    /// Creates an entry for `T` with an empty trait table.
    #[inline]
    pub fn of<T: Typed + ?Sized>() -> Self {
        Self::from_info(T::type_info())
    }

    /// Creates an entry from a descriptor with an empty trait table.
    #[inline]
    pub fn from_info(type_info: &'static TypeInfo) -> Self {
        Self {
            ty: type_info.ty(),
            type_info,
            traits: TypeIdMap::new(),
        }
    }

    #[inline(always)]
    pub const fn type_info(&self) -> &'static TypeInfo {
        self.type_info
    }

    #[inline(always)]
    pub const fn ty(&self) -> Type {
        self.ty
    }

    #[inline]
    pub const fn type_id(&self) -> TypeId {
        self.ty.id()
    }

    #[inline]
    pub const fn type_path(&self) -> &'static str {
        self.ty.path()
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.ty.name()
    }

    #[inline]
    pub const fn kind(&self) -> TypeKind {
        self.type_info.kind()
    }

    /// Inserts or replaces a [`TypeTrait`].
    #[inline]
    pub fn insert_trait<T: TypeTrait>(&mut self, data: T) {
        self.traits.insert(TypeId::of::<T>(), Box::new(data));
    }

    #[inline]
    pub fn get_trait<T: TypeTrait>(&self) -> Option<&T> {
        self.traits
            .get(TypeId::of::<T>())
            .and_then(|t| (**t).downcast_ref())
    }

    #[inline]
    pub fn has_trait<T: TypeTrait>(&self) -> bool {
        self.traits.contains(TypeId::of::<T>())
    }

    #[inline]
    pub fn trait_len(&self) -> usize {
        self.traits.len()
    }

    /// Moves over the traits of `other` this entry does not carry yet.
    pub(crate) fn absorb(&mut self, other: TypeMeta) {
        for (id, type_trait) in other.traits {
            self.traits.try_insert(id, || type_trait);
        }
    }
}

impl Clone for TypeMeta {
    fn clone(&self) -> Self {
        let mut traits = TypeIdMap::with_capacity(self.trait_len());
        for (id, type_trait) in self.traits.iter() {
            traits.insert(id, (**type_trait).clone_type_trait());
        }

        Self {
            ty: self.ty,
            type_info: self.type_info,
            traits,
        }
    }
}

impl core::fmt::Debug for TypeMeta {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TypeMeta")
            .field("ty", &self.ty)
            .field("traits", &self.trait_len())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// GetTypeMeta

/// Produces the [`TypeMeta`] a type is registered with.
///
/// The default gives a bare entry; override [`get_type_meta`](Self::get_type_meta)
/// to attach capabilities.
///
/// ```
/// use weft_introspect::info::{TypeInfo, TypeInfoCell, TypeKind, Typed};
/// use weft_introspect::registry::{FromType, GetTypeMeta, TypeMeta, TypeRegistry, TypeTraitDefault};
///
/// #[derive(Default)]
/// struct Config;
///
/// impl Typed for Config {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: TypeInfoCell = TypeInfoCell::new();
///         CELL.get_or_init(|| TypeInfo::new::<Self>(TypeKind::Struct))
///     }
/// }
///
/// impl GetTypeMeta for Config {
///     fn get_type_meta() -> TypeMeta {
///         let mut meta = TypeMeta::of::<Self>();
///         meta.insert_trait::<TypeTraitDefault>(FromType::<Self>::from_type());
///         meta
///     }
/// }
///
/// let mut registry = TypeRegistry::empty();
/// registry.register::<Config>();
/// assert!(registry.get_with_type_name("Config").unwrap().has_trait::<TypeTraitDefault>());
/// ```
pub trait GetTypeMeta: Typed {
    fn get_type_meta() -> TypeMeta {
        TypeMeta::of::<Self>()
    }

    /// Registers types this one depends on. Supertypes are registered automatically.
    fn register_dependencies(_registry: &mut TypeRegistry) {}
}
