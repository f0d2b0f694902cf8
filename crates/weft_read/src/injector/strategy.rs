use alloc::string::String;
use core::any::Any;
use core::fmt;

use serde_json::Value;
use weft_introspect::info::{MethodInfo, Type};

use crate::InjectError;
use crate::metadata::AttributeDescriptor;

// -----------------------------------------------------------------------------
// Injector

/// Writes an externally supplied value into one attribute of a target instance.
///
/// `target` is always an instance of the type the injector map was built
/// for, which may be more derived than the attribute's declaring type.
pub trait Injector: Send + Sync + fmt::Debug {
    /// The key this injector is stored under in its [`InjectorMap`](crate::metadata::InjectorMap).
    fn key(&self) -> &str;

    fn attribute(&self) -> &AttributeDescriptor;

    #[inline]
    fn declaring_type(&self) -> Type {
        self.attribute().declaring_type()
    }

    fn inject(&self, target: &mut dyn Any, value: Value) -> Result<(), InjectError>;
}

// -----------------------------------------------------------------------------
// FieldInjector

/// Writes through the attribute's own accessor.
#[derive(Clone, Debug)]
pub struct FieldInjector {
    key: String,
    attribute: AttributeDescriptor,
}

impl FieldInjector {
    /// Returns `None` if the attribute has no write accessor.
    pub fn new(key: impl Into<String>, attribute: AttributeDescriptor) -> Option<Self> {
        if !attribute.info().is_writable() {
            return None;
        }
        Some(Self {
            key: key.into(),
            attribute,
        })
    }
}

impl Injector for FieldInjector {
    #[inline]
    fn key(&self) -> &str {
        &self.key
    }

    #[inline]
    fn attribute(&self) -> &AttributeDescriptor {
        &self.attribute
    }

    fn inject(&self, target: &mut dyn Any, value: Value) -> Result<(), InjectError> {
        self.attribute.write(&self.key, target, value)
    }
}

// -----------------------------------------------------------------------------
// MethodInjector

/// Calls a setter declared by the attribute's declaring type.
#[derive(Clone)]
pub struct MethodInjector {
    key: String,
    attribute: AttributeDescriptor,
    method: &'static MethodInfo,
}

impl MethodInjector {
    pub fn new(key: impl Into<String>, attribute: AttributeDescriptor, method: &'static MethodInfo) -> Self {
        Self {
            key: key.into(),
            attribute,
            method,
        }
    }

    #[inline]
    pub fn method(&self) -> &'static MethodInfo {
        self.method
    }
}

impl Injector for MethodInjector {
    #[inline]
    fn key(&self) -> &str {
        &self.key
    }

    #[inline]
    fn attribute(&self) -> &AttributeDescriptor {
        &self.attribute
    }

    fn inject(&self, target: &mut dyn Any, value: Value) -> Result<(), InjectError> {
        let declaring = self
            .attribute
            .target(target)
            .ok_or_else(|| InjectError::TargetMismatch {
                attribute: self.key.clone(),
                expected: self.attribute.declaring().type_path(),
            })?;
        self.method
            .invoke(declaring, value)
            .map_err(|source| InjectError::Access {
                attribute: self.key.clone(),
                source,
            })
    }
}

impl fmt::Debug for MethodInjector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodInjector")
            .field("key", &self.key)
            .field("method", &self.method.name())
            .finish()
    }
}
