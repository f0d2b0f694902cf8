use core::fmt;

/// The broad category a type belongs to.
///
/// The read path uses it for decisions that do not depend on the concrete
/// type, such as whether instances can take part in reference tracking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// A type with named attributes.
    Struct,
    /// A closed set of named constants.
    Enum,
    /// A `dyn Trait` type; has no attributes of its own.
    Interface,
    Number,
    Text,
    Temporal,
    Boolean,
    Collection,
    /// Anything whose inner layout is not described.
    Opaque,
}

impl TypeKind {
    /// Kinds that are treated as plain values, never as shared references.
    #[inline]
    pub const fn is_value_like(self) -> bool {
        matches!(self, Self::Number | Self::Text | Self::Temporal | Self::Enum)
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
