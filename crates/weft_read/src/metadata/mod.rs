//! Attribute discovery and injector resolution, memoized per type.
//!
//! ## Menu
//!
//! - [`AttributeDescriptor`]: one attribute as seen from a concrete type.
//! - [`AttributeMap`]: every visible attribute of a type and its ancestors, shadowing resolved.
//! - [`InjectorMap`]: the chosen [`Injector`](crate::injector::Injector) per attribute.
//! - [`TypeMetadataCache`]: builds both maps once per type under the current [`MetadataRules`].

mod cache;
mod descriptor;
mod maps;

pub use cache::{MetadataRules, TypeMetadataCache};
pub use descriptor::AttributeDescriptor;
pub use maps::{AttributeMap, InjectorMap};
