//! Strategies that write one JSON value into one attribute of an instance.
//!
//! ## Menu
//!
//! - [`Injector`]: the strategy interface.
//!     - [`FieldInjector`]: writes through the attribute's own accessor; the fallback.
//!     - [`MethodInjector`]: calls a setter method of the declaring type.
//! - [`InjectorFactory`]: tries to produce an `Injector` for an attribute, or declines.
//!     - [`MethodInjectorFactory`]: resolves setters by non-standard mapping or `set_<name>`.
//!
//! Factories are tried in registration order; the first one returning an
//! injector wins. A factory that returns `Err` is treated as declining.

mod factory;
mod strategy;

pub use factory::{InjectorFactory, MethodInjectorFactory};
pub use strategy::{FieldInjector, Injector, MethodInjector};
