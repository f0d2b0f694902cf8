//! [`Typed`](crate::info::Typed) and [`GetTypeMeta`](crate::registry::GetTypeMeta)
//! for built-in scalar types.
//!
//! ## Implemented Menu
//!
//! - Number: `i8`-`i128`, `u8`-`u128`, `isize`, `usize`, `f32`, `f64`
//! - Boolean: `bool`
//! - Text: `char`, `String`
//! - Temporal: `core::time::Duration`, `std::time::SystemTime`
//!
//! Every scalar carries [`TypeTraitFromValue`](crate::registry::TypeTraitFromValue);
//! all but `SystemTime` also carry [`TypeTraitDefault`](crate::registry::TypeTraitDefault).

mod scalar;

pub(crate) use scalar::register_scalars;
