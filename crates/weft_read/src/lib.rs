//! Attribute discovery, injector resolution and extension lookup for the
//! `weft` read path.
//!
//! A reader configuration goes through two phases. A [`ReadOptionsBuilder`]
//! accumulates registrations; [`ReadOptionsBuilder::build`] freezes it into an
//! [`Arc<ReadOptions>`](alloc::sync::Arc) that is shared by every concurrent
//! read. The frozen options answer two kinds of questions:
//!
//! - type level, through the [`ExtensionRegistry`]: aliases, coercions,
//!   reference tracking, and the closest registered custom reader or factory;
//! - attribute level, through [`ReadOptions::attributes_of`] and
//!   [`ReadOptions::injectors_of`], built once per type and cached.
//!
//! ## Menu
//!
//! - [`injector`]: [`Injector`] strategies and the [`InjectorFactory`] chain.
//! - [`filter`]: [`AttributeFilter`]s applied during attribute discovery.
//! - [`metadata`]: [`AttributeMap`], [`InjectorMap`] and the [`TypeMetadataCache`].
//! - [`extension`]: the two-tier [`ExtensionRegistry`] and its [`Baseline`].
//! - [`options`]: [`ReadSettings`], [`ReadOptionsBuilder`] and [`ReadOptions`].
//!
//! [`Injector`]: injector::Injector
//! [`InjectorFactory`]: injector::InjectorFactory
//! [`AttributeFilter`]: filter::AttributeFilter
//! [`AttributeMap`]: metadata::AttributeMap
//! [`InjectorMap`]: metadata::InjectorMap
//! [`TypeMetadataCache`]: metadata::TypeMetadataCache
//! [`ExtensionRegistry`]: extension::ExtensionRegistry
//! [`Baseline`]: extension::Baseline
//! [`ReadSettings`]: options::ReadSettings
//! [`ReadOptionsBuilder`]: options::ReadOptionsBuilder
//! [`ReadOptions`]: options::ReadOptions
//! [`ReadOptionsBuilder::build`]: options::ReadOptionsBuilder::build
//! [`ReadOptions::attributes_of`]: options::ReadOptions::attributes_of
//! [`ReadOptions::injectors_of`]: options::ReadOptions::injectors_of
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

extern crate alloc;
extern crate std;

// -----------------------------------------------------------------------------
// Modules

mod error;
mod memo;

pub mod extension;
pub mod filter;
pub mod injector;
pub mod metadata;
pub mod options;

#[cfg(test)]
pub(crate) mod fixtures;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use error::{BoxError, ConfigError, InjectError, Warning};
pub use options::{ReadOptions, ReadOptionsBuilder};
