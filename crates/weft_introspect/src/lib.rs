//! Runtime type descriptors for the `weft` read path.
//!
//! Rust has no runtime reflection, so every type that takes part in
//! deserialization describes itself once through [`Typed`](info::Typed):
//! its kind, its parent, the interfaces it implements, its attributes and the
//! setter methods it exposes. Those descriptors are static and are what the
//! higher layers walk, cache and resolve against.
//!
//! ## Menu
//!
//! - [`info`]: [`Type`](info::Type), [`TypeInfo`](info::TypeInfo) and the attribute,
//!   method and parent descriptors it is made of.
//! - [`registry`]: [`TypeRegistry`](registry::TypeRegistry), resolving type names to
//!   [`TypeMeta`](registry::TypeMeta) entries with a capability table.
//! - [`impls`]: descriptors for built-in scalar types.
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

extern crate alloc;
extern crate std;

// -----------------------------------------------------------------------------
// Modules

mod error;

pub mod impls;
pub mod info;
pub mod registry;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use error::AccessError;
