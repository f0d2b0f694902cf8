use std::sync::OnceLock;

use crate::info::TypeInfo;

// -----------------------------------------------------------------------------
// Typed

/// A type that can describe itself with a static [`TypeInfo`].
///
/// Interfaces are described by implementing this trait for `dyn Trait`.
///
/// # Examples
///
/// ```
/// use weft_introspect::info::{AttributeInfo, TypeInfo, TypeInfoCell, TypeKind, Typed};
///
/// #[derive(Default)]
/// struct Point { x: i32, y: i32 }
///
/// impl Typed for Point {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: TypeInfoCell = TypeInfoCell::new();
///         CELL.get_or_init(|| {
///             TypeInfo::new::<Self>(TypeKind::Struct).with_attributes([
///                 AttributeInfo::new::<Self, i32>("x", |p| &mut p.x),
///                 AttributeInfo::new::<Self, i32>("y", |p| &mut p.y),
///             ])
///         })
///     }
/// }
///
/// let info = Point::type_info();
/// assert_eq!(info.name(), "Point");
/// assert_eq!(info.attribute("y").unwrap().name(), "y");
/// ```
pub trait Typed: 'static {
    fn type_info() -> &'static TypeInfo;
}

// -----------------------------------------------------------------------------
// TypeInfoCell

/// Static storage for one [`TypeInfo`], built on first access.
///
/// Only suitable for non-generic types: a `static` inside a generic function
/// is shared by every instantiation.
pub struct TypeInfoCell(OnceLock<TypeInfo>);

impl TypeInfoCell {
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    #[inline]
    pub fn get_or_init(&self, f: impl FnOnce() -> TypeInfo) -> &TypeInfo {
        self.0.get_or_init(f)
    }
}
