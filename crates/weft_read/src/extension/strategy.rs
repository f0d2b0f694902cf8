use alloc::boxed::Box;
use alloc::format;
use core::any::Any;

use serde_json::Value;
use weft_introspect::info::TypeInfo;
use weft_introspect::registry::{TypeRegistry, TypeTraitFromValue};

use crate::BoxError;

// -----------------------------------------------------------------------------
// CustomReader

/// Reads a whole JSON value into an instance of `target`, bypassing
/// attribute injection.
///
/// Registered against a type; also applies to every type assignable to it
/// that has no closer registration.
pub trait CustomReader: Send + Sync {
    fn read(&self, value: Value, target: &'static TypeInfo) -> Result<Box<dyn Any + Send>, BoxError>;
}

impl<F> CustomReader for F
where
    F: Fn(Value, &'static TypeInfo) -> Result<Box<dyn Any + Send>, BoxError> + Send + Sync,
{
    #[inline]
    fn read(&self, value: Value, target: &'static TypeInfo) -> Result<Box<dyn Any + Send>, BoxError> {
        self(value, target)
    }
}

// -----------------------------------------------------------------------------
// ClassFactory

/// Creates the instance a JSON object is read into.
pub trait ClassFactory: Send + Sync {
    /// `value` is the JSON node being read; `types` resolves nested type names.
    fn new_instance(
        &self,
        info: &'static TypeInfo,
        value: &Value,
        types: &TypeRegistry,
    ) -> Result<Box<dyn Any + Send>, BoxError>;

    /// `true` if the created instance is complete and attribute injection
    /// must be skipped.
    #[inline]
    fn is_object_final(&self) -> bool {
        false
    }
}

// -----------------------------------------------------------------------------
// EnumFactory

/// Builds enum values whole, through their registered [`TypeTraitFromValue`].
#[derive(Clone, Copy, Debug, Default)]
pub struct EnumFactory;

impl ClassFactory for EnumFactory {
    fn new_instance(
        &self,
        info: &'static TypeInfo,
        value: &Value,
        types: &TypeRegistry,
    ) -> Result<Box<dyn Any + Send>, BoxError> {
        let from_value = types
            .get_type_trait::<TypeTraitFromValue>(info.type_id())
            .ok_or_else(|| format!("enum `{}` cannot be built from a value", info.type_path()))?;
        Ok(from_value.from_value(value.clone())?)
    }

    #[inline]
    fn is_object_final(&self) -> bool {
        true
    }
}
