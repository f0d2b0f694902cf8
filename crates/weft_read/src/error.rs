use alloc::boxed::Box;
use alloc::string::String;

use thiserror::Error;
use weft_introspect::AccessError;
use weft_utils::collections::SealedError;

/// Error type of speculative extension points.
///
/// An `Err` from an [`InjectorFactory`](crate::injector::InjectorFactory) or an
/// [`AttributeFilter`](crate::filter::AttributeFilter) means "does not apply";
/// it is logged and never propagated.
pub type BoxError = Box<dyn core::error::Error + Send + Sync>;

// -----------------------------------------------------------------------------
// ConfigError

/// A caller contract violation while configuring a reader.
///
/// Returned before any state is touched.
#[non_exhaustive]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A mutator was called after the configuration was frozen.
    #[error("cannot {operation}: the read options are frozen")]
    Frozen { operation: &'static str },
    /// A required argument was empty.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}

impl From<SealedError> for ConfigError {
    #[inline]
    fn from(_: SealedError) -> Self {
        ConfigError::Frozen {
            operation: "modify a sealed list",
        }
    }
}

// -----------------------------------------------------------------------------
// InjectError

/// Failure to write a value through an [`Injector`](crate::injector::Injector).
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum InjectError {
    /// The instance is not of the type the injector was resolved for.
    #[error("cannot inject `{attribute}`: the target is not a `{expected}`")]
    TargetMismatch {
        attribute: String,
        expected: &'static str,
    },
    #[error("cannot inject `{attribute}`: {source}")]
    Access {
        attribute: String,
        #[source]
        source: AccessError,
    },
}

// -----------------------------------------------------------------------------
// Warning

/// A soft registration failure: reported and logged, never fatal.
#[non_exhaustive]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A table row named a type that is not registered.
    #[error("unknown type `{type_name}`, {table} entry skipped")]
    UnknownType {
        type_name: String,
        table: &'static str,
    },
    /// An alias was rebound to another type; the new binding wins.
    #[error("non-unique alias `{alias}`: assigned to `{replacement}`, was `{existing}`")]
    AliasConflict {
        alias: String,
        existing: String,
        replacement: String,
    },
    /// A table row was empty or incomplete.
    #[error("malformed {table} entry `{entry}`")]
    MalformedEntry {
        table: &'static str,
        entry: String,
    },
}
