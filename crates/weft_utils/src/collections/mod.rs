//! Collection types shared by the weft crates.
//!
//! ## Menu
//!
//! - [`SealableVec`]: a list whose mutators are rejected once its [`SealFlag`] is sealed.
//! - [`Cursor`] / [`SubRangeMut`]: views over a [`SealableVec`] that check the flag on every call.

mod sealable;

pub use sealable::{Cursor, SealFlag, SealableVec, SealedError, SubRangeMut};
