//! Type-level extension points: aliases, coercions, custom readers,
//! factories, reference tracking and attribute exclusions.
//!
//! ## Menu
//!
//! - [`ExtensionRegistry`]: the per-configuration tables and their lookups.
//! - [`Baseline`] / [`BaselineBuilder`]: immutable tables shared by many registries.
//! - [`CustomReader`], [`ClassFactory`], [`EnumFactory`]: strategies registered per type.
//! - [`NonStandardMappings`]: attribute to setter renames used by injector factories.
//!
//! Custom readers and factories registered for a type also apply to the
//! types assignable to it. A lookup picks the exact registration if there is
//! one, else the nearest registered supertype; among supertypes at the same
//! distance, the one registered first wins.

mod baseline;
mod closest;
mod layered;
mod mappings;
mod registry;
mod strategy;

pub use baseline::{Baseline, BaselineBuilder};
pub use layered::Table;
pub use mappings::NonStandardMappings;
pub use registry::{ExtensionRegistry, NameSet};
pub use strategy::{ClassFactory, CustomReader, EnumFactory};
