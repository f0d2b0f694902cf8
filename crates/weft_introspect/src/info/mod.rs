//! Static type descriptors.
//!
//! ## Menu
//!
//! - [`Type`]: a [`TypeId`](core::any::TypeId) with its path and simple name.
//! - [`TypeKind`]: the broad category of a type.
//! - [`TypeInfo`]: kind, parent, interfaces, attributes and methods of one type.
//!     - [`ParentInfo`]: link to the direct supertype with its upcast accessor.
//!     - [`AttributeInfo`]: a named slot with [`AttributeFlags`] and an optional write accessor.
//!     - [`MethodInfo`]: a named single-argument setter.
//! - [`Typed`]: implemented by every described type, including `dyn Trait` interfaces.
//! - [`TypeInfoCell`]: static storage used to implement [`Typed`].

// -----------------------------------------------------------------------------
// Modules

mod attribute;
mod kind;
mod parent;
mod ty;
mod type_info;
mod typed;

// -----------------------------------------------------------------------------
// Exports

pub use attribute::{AttributeAccess, AttributeFlags, AttributeInfo, MethodInfo};
pub use kind::TypeKind;
pub use parent::ParentInfo;
pub use ty::Type;
pub use type_info::{Ancestors, TypeInfo};
pub use typed::{TypeInfoCell, Typed};
