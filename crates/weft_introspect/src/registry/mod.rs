//! Name-to-type resolution and per-type capabilities.
//!
//! ## Menu
//!
//! - [`TypeTrait`]: a capability attached to a registered type.
//! - [`FromType`]: builds a `TypeTrait` for a concrete type.
//! - [`TypeMeta`]: a [`TypeInfo`](crate::info::TypeInfo) plus a `TypeTrait` table.
//! - [`GetTypeMeta`]: how a type produces its `TypeMeta`.
//! - [`TypeRegistry`]: stores `TypeMeta`s, indexed by id, path and simple name.
//! - TypeTraits:
//!     - [`TypeTraitDefault`]: creates a default instance.
//!     - [`TypeTraitFromValue`]: creates an instance from a whole JSON value.

// -----------------------------------------------------------------------------
// Modules

mod from_type;
mod traits;
mod type_meta;
mod type_registry;
mod type_trait;

// -----------------------------------------------------------------------------
// Exports

pub use from_type::FromType;
pub use traits::{TypeTraitDefault, TypeTraitFromValue};
pub use type_meta::{GetTypeMeta, TypeMeta};
pub use type_registry::TypeRegistry;
pub use type_trait::TypeTrait;
