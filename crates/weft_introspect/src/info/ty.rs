use core::any::{Any, TypeId};
use core::fmt;
use core::hash::{Hash, Hasher};

// -----------------------------------------------------------------------------
// Type

/// The identity of a runtime type: its [`TypeId`] plus a readable path.
///
/// Equality and hashing only look at the [`TypeId`]; the path is carried
/// for name-based lookups and diagnostics.
///
/// # Examples
///
/// ```
/// use weft_introspect::info::Type;
///
/// let ty = Type::of::<String>();
/// assert_eq!(ty.path(), "alloc::string::String");
/// assert_eq!(ty.name(), "String");
/// assert!(ty.is::<String>());
/// ```
#[derive(Clone, Copy)]
pub struct Type {
    id: TypeId,
    path: &'static str,
    name: &'static str,
}

impl Type {
    /// Creates the [`Type`] of `T`, using [`core::any::type_name`] as its path.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::named::<T>(core::any::type_name::<T>())
    }

    /// Creates the [`Type`] of `T` under an explicit path.
    ///
    /// Useful when the path seen by a wire format differs from the Rust one.
    ///
    /// ```
    /// use weft_introspect::info::Type;
    ///
    /// struct Foo;
    /// let ty = Type::named::<Foo>("com.example.Foo");
    /// assert_eq!(ty.name(), "Foo");
    /// ```
    pub fn named<T: ?Sized + 'static>(path: &'static str) -> Self {
        Self {
            id: TypeId::of::<T>(),
            path,
            name: simple_name(path),
        }
    }

    #[inline(always)]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// The full path, unique per type.
    #[inline(always)]
    pub const fn path(&self) -> &'static str {
        self.path
    }

    /// The last path segment without generics; may be shared by several types.
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline(always)]
    pub fn is<T: ?Sized + Any>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for Type {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Type {}

impl Hash for Type {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path)
    }
}

/// `dyn a::B<C> + Send` -> `B`, `com.x.Foo` -> `Foo`.
fn simple_name(path: &'static str) -> &'static str {
    let path = path.strip_prefix("dyn ").unwrap_or(path);
    let end = path.find(['<', ' ']).unwrap_or(path.len());
    let base = &path[..end];
    let start = match (base.rfind("::"), base.rfind('.')) {
        (Some(a), Some(b)) => (a + 2).max(b + 1),
        (Some(a), None) => a + 2,
        (None, Some(b)) => b + 1,
        (None, None) => 0,
    };
    &base[start..]
}
