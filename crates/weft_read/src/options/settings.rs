use alloc::boxed::Box;
use alloc::sync::Arc;
use core::any::Any;

use serde::Deserialize;
use serde_json::Value;

use crate::BoxError;

// -----------------------------------------------------------------------------
// ReadSettings

/// The scalar part of a reader configuration.
///
/// Missing fields take their defaults, so a partial JSON document is a valid
/// configuration:
///
/// ```
/// use weft_read::options::{ReadSettings, ReturnType};
///
/// let settings: ReadSettings = serde_json::from_str(r#"{ "return_type": "json_values" }"#).unwrap();
/// assert_eq!(settings.return_type, ReturnType::JsonValues);
/// assert_eq!(settings.max_depth, 1000);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReadSettings {
    /// Nesting depth at which reading fails.
    pub max_depth: usize,
    /// Fail on a type name that does not resolve, instead of reading a map.
    pub fail_on_unknown_type: bool,
    /// Close the input once the root value is read.
    pub close_stream: bool,
    /// Accept `NaN` and `Infinity` literals.
    pub allow_nan_and_infinity: bool,
    pub return_type: ReturnType,
}

impl Default for ReadSettings {
    fn default() -> Self {
        Self {
            max_depth: 1000,
            fail_on_unknown_type: false,
            close_stream: true,
            allow_nan_and_infinity: false,
            return_type: ReturnType::default(),
        }
    }
}

/// What a read produces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnType {
    /// Typed instances, built through factories, readers and injectors.
    #[default]
    Instances,
    /// Plain JSON values; type metadata is only used for resolution.
    JsonValues,
}

// -----------------------------------------------------------------------------
// Callbacks

/// Called for a JSON field that has no injector on the target type.
pub trait MissingFieldHandler: Send + Sync {
    fn missing_field(&self, target: &mut dyn Any, field: &str, value: &Value);
}

impl<F> MissingFieldHandler for F
where
    F: Fn(&mut dyn Any, &str, &Value) + Send + Sync,
{
    #[inline]
    fn missing_field(&self, target: &mut dyn Any, field: &str, value: &Value) {
        self(target, field, value)
    }
}

/// Converts a JSON value into an instance of a target type.
pub type Converter = Arc<dyn Fn(&Value) -> Result<Box<dyn Any + Send>, BoxError> + Send + Sync>;
