mod default;
mod from_value;

pub use default::TypeTraitDefault;
pub use from_value::TypeTraitFromValue;
