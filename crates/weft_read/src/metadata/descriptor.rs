use alloc::boxed::Box;
use core::any::Any;
use core::fmt;

use serde_json::Value;
use weft_introspect::info::{AttributeInfo, ParentInfo, Type, TypeInfo};

use crate::InjectError;

/// One attribute as seen from a concrete (possibly more derived) type.
///
/// Besides the attribute and its declaring type, it records the parent links
/// leading from the viewing type down to the declaring one, so the attribute
/// can be written on an instance of the viewing type.
#[derive(Clone)]
pub struct AttributeDescriptor {
    info: &'static AttributeInfo,
    declaring: &'static TypeInfo,
    path: Box<[&'static ParentInfo]>,
}

impl AttributeDescriptor {
    /// An attribute of `declaring`, reached from a derived type through `path`.
    pub fn new(
        info: &'static AttributeInfo,
        declaring: &'static TypeInfo,
        path: impl Into<Box<[&'static ParentInfo]>>,
    ) -> Self {
        Self {
            info,
            declaring,
            path: path.into(),
        }
    }

    /// The declared attribute name (not the key it is stored under).
    #[inline]
    pub fn name(&self) -> &'static str {
        self.info.name()
    }

    #[inline]
    pub fn info(&self) -> &'static AttributeInfo {
        self.info
    }

    #[inline]
    pub fn declaring(&self) -> &'static TypeInfo {
        self.declaring
    }

    #[inline]
    pub fn declaring_type(&self) -> Type {
        self.declaring.ty()
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.info.is_static()
    }

    /// Number of parent links between the viewing type and the declaring type.
    #[inline]
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Follows the parent links from an instance of the viewing type to the
    /// embedded value of the declaring type.
    pub fn target<'a>(&self, instance: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        self.path
            .iter()
            .try_fold(instance, |value, parent| parent.upcast(value))
    }

    /// Writes `value` into this attribute of `instance`.
    pub fn write(&self, key: &str, instance: &mut dyn Any, value: Value) -> Result<(), InjectError> {
        let target = self
            .target(instance)
            .ok_or_else(|| InjectError::TargetMismatch {
                attribute: key.into(),
                expected: self.declaring.type_path(),
            })?;
        self.info
            .write(target, value)
            .map_err(|source| InjectError::Access {
                attribute: key.into(),
                source,
            })
    }
}

/// Descriptors are equal when they denote the same declared attribute.
impl PartialEq for AttributeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.declaring == other.declaring && self.name() == other.name()
    }
}

impl Eq for AttributeDescriptor {}

impl fmt::Debug for AttributeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.declaring.name(), self.name())
    }
}
