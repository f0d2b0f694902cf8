//! Predicates that hide attributes from discovery.
//!
//! Filters run for every declared attribute of every type in an ancestor
//! walk, on top of the explicit exclusion tables. An `Err` from a filter means
//! the filter does not apply to that attribute.

use weft_introspect::info::{AttributeInfo, TypeInfo, TypeKind};

use crate::BoxError;

/// Decides whether an attribute is excluded regardless of exclusion tables.
pub trait AttributeFilter: Send + Sync {
    fn excludes(&self, attribute: &AttributeInfo, declaring: &TypeInfo) -> Result<bool, BoxError>;
}

/// Excludes static attributes.
#[derive(Clone, Copy, Debug, Default)]
pub struct StaticAttributeFilter;

impl AttributeFilter for StaticAttributeFilter {
    #[inline]
    fn excludes(&self, attribute: &AttributeInfo, _: &TypeInfo) -> Result<bool, BoxError> {
        Ok(attribute.is_static())
    }
}

/// Excludes synthetic attributes and the internals of enum types.
///
/// Enum values are built whole by a factory, never attribute by attribute.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnumAttributeFilter;

impl AttributeFilter for EnumAttributeFilter {
    #[inline]
    fn excludes(&self, attribute: &AttributeInfo, declaring: &TypeInfo) -> Result<bool, BoxError> {
        Ok(attribute.is_synthetic() || declaring.kind() == TypeKind::Enum)
    }
}
