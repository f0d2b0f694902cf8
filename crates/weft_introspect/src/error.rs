use thiserror::Error;

/// Errors raised while writing a value through an attribute or setter descriptor.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AccessError {
    /// The target instance is not of the type the accessor was built for.
    #[error("expected a target of type `{expected}`")]
    TargetMismatch { expected: &'static str },
    /// The attribute has no write accessor (constants, synthetic slots).
    #[error("attribute `{attribute}` is not writable")]
    NotWritable { attribute: &'static str },
    /// The JSON value could not be converted to the attribute's type.
    #[error("invalid value: {0}")]
    Value(#[from] serde_json::Error),
}
