use alloc::borrow::Cow;
use alloc::format;
use alloc::sync::Arc;

use crate::BoxError;
use crate::extension::NonStandardMappings;
use crate::injector::{Injector, MethodInjector};
use crate::metadata::AttributeDescriptor;

// -----------------------------------------------------------------------------
// InjectorFactory

/// Attempts to produce an [`Injector`] for one attribute.
///
/// - `Ok(Some(_))`: this factory handles the attribute.
/// - `Ok(None)` or `Err(_)`: declines; the next factory is tried.
///
/// `key` is the name the attribute is stored under, which differs from the
/// declared name for shadowed ancestor attributes.
pub trait InjectorFactory: Send + Sync {
    fn create(
        &self,
        attribute: &AttributeDescriptor,
        key: &str,
        mappings: &NonStandardMappings,
    ) -> Result<Option<Arc<dyn Injector>>, BoxError>;
}

// -----------------------------------------------------------------------------
// MethodInjectorFactory

/// Routes attributes to setter methods.
///
/// A non-standard mapping registered for the declaring type always wins.
/// Otherwise attributes without a write accessor fall back to a method
/// named `set_<name>`, if the declaring type has one.
#[derive(Clone, Copy, Debug, Default)]
pub struct MethodInjectorFactory;

impl InjectorFactory for MethodInjectorFactory {
    fn create(
        &self,
        attribute: &AttributeDescriptor,
        key: &str,
        mappings: &NonStandardMappings,
    ) -> Result<Option<Arc<dyn Injector>>, BoxError> {
        let declaring = attribute.declaring();

        let method_name = match mappings.get(declaring.ty(), attribute.name()) {
            Some(mapped) => Cow::Borrowed(mapped),
            None if !attribute.info().is_writable() => Cow::Owned(format!("set_{}", attribute.name())),
            None => return Ok(None),
        };

        match declaring.method(&method_name) {
            Some(method) => Ok(Some(Arc::new(MethodInjector::new(key, attribute.clone(), method)))),
            None => Err(format!("`{}` has no method `{method_name}`", declaring.type_path()).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use weft_introspect::info::{Type, Typed};
    use weft_utils::collections::SealFlag;

    use super::{InjectorFactory, MethodInjectorFactory};
    use crate::extension::ExtensionRegistry;
    use crate::fixtures::Person;
    use crate::metadata::AttributeDescriptor;

    fn descriptor(name: &str) -> AttributeDescriptor {
        let info = Person::type_info();
        AttributeDescriptor::new(info.attribute(name).unwrap(), info, [])
    }

    #[test]
    fn method_factory_resolution() {
        let mut extensions = ExtensionRegistry::new(SealFlag::new());
        let mappings = extensions.non_standard_mappings();

        // Writable and unmapped: left to the field injector.
        assert!(MethodInjectorFactory.create(&descriptor("title"), "title", mappings).unwrap().is_none());
        // Not writable: falls back to `set_<name>`.
        let nickname = MethodInjectorFactory
            .create(&descriptor("nickname"), "nickname", mappings)
            .unwrap()
            .unwrap();
        assert_eq!(nickname.key(), "nickname");
        // Not writable and no setter: declines with an error.
        assert!(MethodInjectorFactory.create(&descriptor("id"), "id", mappings).is_err());

        extensions
            .set_non_standard_mapping(Type::of::<Person>(), "title", "missing")
            .unwrap();
        let mappings = extensions.non_standard_mappings();
        assert!(MethodInjectorFactory.create(&descriptor("title"), "title", mappings).is_err());
    }
}
