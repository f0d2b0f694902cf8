use alloc::sync::Arc;
use core::any::Any;
use core::fmt;

use bitflags::bitflags;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::AccessError;
use crate::info::Type;

// -----------------------------------------------------------------------------
// AttributeAccess

/// Writes a JSON value into one slot of a type-erased instance.
///
/// Implementations are created by [`AttributeInfo::new`] and
/// [`MethodInfo::setter`] from plain function pointers.
pub trait AttributeAccess: Send + Sync + 'static {
    fn write(&self, target: &mut dyn Any, value: Value) -> Result<(), AccessError>;
}

struct FieldAccess<T, F> {
    get: fn(&mut T) -> &mut F,
}

impl<T: Any, F: DeserializeOwned + 'static> AttributeAccess for FieldAccess<T, F> {
    fn write(&self, target: &mut dyn Any, value: Value) -> Result<(), AccessError> {
        let target = downcast::<T>(target)?;
        *(self.get)(target) = serde_json::from_value(value)?;
        Ok(())
    }
}

struct SetterAccess<T, F> {
    set: fn(&mut T, F),
}

impl<T: Any, F: DeserializeOwned + 'static> AttributeAccess for SetterAccess<T, F> {
    fn write(&self, target: &mut dyn Any, value: Value) -> Result<(), AccessError> {
        let target = downcast::<T>(target)?;
        (self.set)(target, serde_json::from_value(value)?);
        Ok(())
    }
}

#[inline]
fn downcast<T: Any>(target: &mut dyn Any) -> Result<&mut T, AccessError> {
    target
        .downcast_mut::<T>()
        .ok_or(AccessError::TargetMismatch {
            expected: core::any::type_name::<T>(),
        })
}

// -----------------------------------------------------------------------------
// AttributeFlags

bitflags! {
    /// Static properties of an attribute.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct AttributeFlags: u8 {
        /// Belongs to the type, not to instances.
        const STATIC    = 1 << 0;
        /// Generated by tooling rather than declared by the author.
        const SYNTHETIC = 1 << 1;
    }
}

// -----------------------------------------------------------------------------
// AttributeInfo

/// A named, typed slot declared by a type.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use weft_introspect::info::AttributeInfo;
///
/// #[derive(Default)]
/// struct Point { x: i32 }
///
/// let info = AttributeInfo::new::<Point, i32>("x", |p| &mut p.x);
///
/// let mut point = Point::default();
/// info.write(&mut point, json!(7)).unwrap();
/// assert_eq!(point.x, 7);
/// assert!(info.value_type().is::<i32>());
/// ```
#[derive(Clone)]
pub struct AttributeInfo {
    name: &'static str,
    value_type: Type,
    flags: AttributeFlags,
    access: Option<Arc<dyn AttributeAccess>>,
}

impl AttributeInfo {
    /// A writable instance attribute of `T` with value type `F`.
    pub fn new<T: Any, F: DeserializeOwned + 'static>(
        name: &'static str,
        get: fn(&mut T) -> &mut F,
    ) -> Self {
        Self {
            name,
            value_type: Type::of::<F>(),
            flags: AttributeFlags::empty(),
            access: Some(Arc::new(FieldAccess { get })),
        }
    }

    /// A static attribute: visible to introspection, never written.
    pub fn constant<F: 'static>(name: &'static str) -> Self {
        Self {
            name,
            value_type: Type::of::<F>(),
            flags: AttributeFlags::STATIC,
            access: None,
        }
    }

    /// Marks the attribute as generated.
    #[inline]
    pub fn synthetic(mut self) -> Self {
        self.flags |= AttributeFlags::SYNTHETIC;
        self
    }

    /// Replaces the flags.
    #[inline]
    pub fn with_flags(mut self, flags: AttributeFlags) -> Self {
        self.flags = flags;
        self
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn value_type(&self) -> Type {
        self.value_type
    }

    #[inline]
    pub const fn flags(&self) -> AttributeFlags {
        self.flags
    }

    #[inline]
    pub const fn is_static(&self) -> bool {
        self.flags.contains(AttributeFlags::STATIC)
    }

    #[inline]
    pub const fn is_synthetic(&self) -> bool {
        self.flags.contains(AttributeFlags::SYNTHETIC)
    }

    /// Returns `true` if the attribute has a write accessor.
    #[inline]
    pub fn is_writable(&self) -> bool {
        self.access.is_some()
    }

    /// Converts `value` and stores it in `target`.
    ///
    /// `target` must be an instance of the type that declares the attribute.
    pub fn write(&self, target: &mut dyn Any, value: Value) -> Result<(), AccessError> {
        match &self.access {
            Some(access) => access.write(target, value),
            None => Err(AccessError::NotWritable {
                attribute: self.name,
            }),
        }
    }
}

impl fmt::Debug for AttributeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeInfo")
            .field("name", &self.name)
            .field("value_type", &self.value_type)
            .field("flags", &self.flags)
            .field("writable", &self.is_writable())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// MethodInfo

/// A named single-argument setter method.
#[derive(Clone)]
pub struct MethodInfo {
    name: &'static str,
    arg_type: Type,
    access: Arc<dyn AttributeAccess>,
}

impl MethodInfo {
    /// A setter on `T` taking one `F`.
    ///
    /// ```
    /// use serde_json::json;
    /// use weft_introspect::info::MethodInfo;
    ///
    /// #[derive(Default)]
    /// struct Label { text: String }
    ///
    /// let method = MethodInfo::setter::<Label, String>("set_text", |l, v| l.text = v.to_uppercase());
    ///
    /// let mut label = Label::default();
    /// method.invoke(&mut label, json!("hi")).unwrap();
    /// assert_eq!(label.text, "HI");
    /// ```
    pub fn setter<T: Any, F: DeserializeOwned + 'static>(
        name: &'static str,
        set: fn(&mut T, F),
    ) -> Self {
        Self {
            name,
            arg_type: Type::of::<F>(),
            access: Arc::new(SetterAccess { set }),
        }
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn arg_type(&self) -> Type {
        self.arg_type
    }

    pub fn invoke(&self, target: &mut dyn Any, value: Value) -> Result<(), AccessError> {
        self.access.write(target, value)
    }
}

impl fmt::Debug for MethodInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodInfo")
            .field("name", &self.name)
            .field("arg_type", &self.arg_type)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use serde_json::json;

    use super::{AttributeFlags, AttributeInfo};
    use crate::AccessError;

    #[derive(Default)]
    struct Sample {
        count: u8,
        label: String,
    }

    #[test]
    fn write_converts_value() {
        let count = AttributeInfo::new::<Sample, u8>("count", |s| &mut s.count);
        let label = AttributeInfo::new::<Sample, String>("label", |s| &mut s.label);

        let mut sample = Sample::default();
        count.write(&mut sample, json!(3)).unwrap();
        label.write(&mut sample, json!("x")).unwrap();
        assert_eq!(sample.count, 3);
        assert_eq!(sample.label, "x");

        assert!(matches!(
            count.write(&mut sample, json!("three")),
            Err(AccessError::Value(_))
        ));
        assert!(matches!(
            count.write(&mut 0_u32, json!(1)),
            Err(AccessError::TargetMismatch { .. })
        ));
    }

    #[test]
    fn constants_are_static_and_read_only() {
        let info = AttributeInfo::constant::<u64>("VERSION").synthetic();
        assert!(info.is_static());
        assert!(info.is_synthetic());
        assert_eq!(info.flags(), AttributeFlags::STATIC | AttributeFlags::SYNTHETIC);
        assert!(matches!(
            info.write(&mut Sample::default(), json!(1)),
            Err(AccessError::NotWritable { attribute: "VERSION" })
        ));
    }
}
