use alloc::boxed::Box;
use core::any::Any;

/// A capability attached to a registered type, stored in its [`TypeMeta`].
///
/// Any `Clone + Send + Sync + 'static` type qualifies.
///
/// [`TypeMeta`]: crate::registry::TypeMeta
pub trait TypeTrait: Any + Send + Sync {
    fn clone_type_trait(&self) -> Box<dyn TypeTrait>;
}

impl<T: Clone + Any + Send + Sync> TypeTrait for T {
    fn clone_type_trait(&self) -> Box<dyn TypeTrait> {
        Box::new(self.clone())
    }
}

impl dyn TypeTrait {
    #[inline]
    pub fn is<T: TypeTrait>(&self) -> bool {
        let any: &dyn Any = self;
        any.is::<T>()
    }

    #[inline]
    pub fn downcast_ref<T: TypeTrait>(&self) -> Option<&T> {
        let any: &dyn Any = self;
        any.downcast_ref()
    }

    #[inline]
    pub fn downcast_mut<T: TypeTrait>(&mut self) -> Option<&mut T> {
        let any: &mut dyn Any = self;
        any.downcast_mut()
    }
}

impl core::fmt::Debug for dyn TypeTrait {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("TypeTrait")
    }
}
