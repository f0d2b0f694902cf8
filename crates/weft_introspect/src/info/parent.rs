use alloc::sync::Arc;
use core::any::Any;
use core::fmt;

use crate::info::{Type, TypeInfo, Typed};

/// Maps a derived instance to the ancestor value embedded in it.
trait Upcast: Send + Sync + 'static {
    fn upcast<'a>(&self, value: &'a mut dyn Any) -> Option<&'a mut dyn Any>;
}

struct UpcastFn<T, P> {
    f: fn(&mut T) -> &mut P,
}

impl<T: Any, P: Any> Upcast for UpcastFn<T, P> {
    fn upcast<'a>(&self, value: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        let value = value.downcast_mut::<T>()?;
        Some((self.f)(value))
    }
}

/// Link from a type to its direct supertype.
///
/// Rust models inheritance by composition, so the parent is a value embedded
/// in the child; the link carries the accessor that reaches it. That is how an
/// attribute declared by an ancestor gets written on a derived instance.
///
/// # Examples
///
/// ```
/// use weft_introspect::info::ParentInfo;
///
/// let parent = ParentInfo::new::<(u8, u16), u16>(|pair| &mut pair.1);
/// assert!(parent.ty().is::<u16>());
///
/// let mut pair = (1_u8, 2_u16);
/// let inner = parent.upcast(&mut pair).unwrap();
/// assert_eq!(inner.downcast_ref::<u16>(), Some(&2));
/// ```
#[derive(Clone)]
pub struct ParentInfo {
    ty: Type,
    info: fn() -> &'static TypeInfo,
    upcast: Arc<dyn Upcast>,
}

impl ParentInfo {
    /// Declares `P` as the parent of `T`, reachable through `f`.
    pub fn new<T: Any, P: Typed>(f: fn(&mut T) -> &mut P) -> Self {
        Self {
            ty: Type::of::<P>(),
            info: P::type_info,
            upcast: Arc::new(UpcastFn { f }),
        }
    }

    #[inline]
    pub const fn ty(&self) -> Type {
        self.ty
    }

    /// The parent's descriptor, built on first access.
    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        (self.info)()
    }

    /// Returns the embedded parent value, or `None` if `value` is not the child type.
    #[inline]
    pub fn upcast<'a>(&self, value: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        self.upcast.upcast(value)
    }
}

impl fmt::Debug for ParentInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ParentInfo").field(&self.ty).finish()
    }
}
