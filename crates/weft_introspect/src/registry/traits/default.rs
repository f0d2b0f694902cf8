use alloc::boxed::Box;
use core::any::Any;

use crate::info::Typed;
use crate::registry::FromType;

/// Builds the [`Default`] value of a registered type, type-erased.
///
/// Attribute injection needs a target before any field is written; this is
/// where it comes from when no factory is registered.
///
/// ```
/// use weft_introspect::registry::{TypeRegistry, TypeTraitDefault};
///
/// let registry = TypeRegistry::new();
/// let zero = registry.resolve("u32").and_then(|meta| meta.get_trait::<TypeTraitDefault>()).unwrap();
/// assert_eq!(zero.default().downcast_ref::<u32>(), Some(&0));
/// ```
#[derive(Clone)]
pub struct TypeTraitDefault {
    func: fn() -> Box<dyn Any + Send>,
}

impl TypeTraitDefault {
    #[inline]
    pub fn default(&self) -> Box<dyn Any + Send> {
        (self.func)()
    }
}

impl<T: Default + Typed + Send> FromType<T> for TypeTraitDefault {
    fn from_type() -> Self {
        Self {
            func: || Box::new(T::default()),
        }
    }
}
