//! The two phases of a reader configuration.
//!
//! ## Menu
//!
//! - [`ReadOptionsBuilder`]: mutable; accumulates types, extensions, strategies and settings.
//! - [`ReadOptions`]: frozen; shared by concurrent reads, answers type and attribute queries.
//! - [`ReadSettings`]: the scalar settings, loadable with `serde`.
//!
//! The builder owns a single [`SealFlag`](weft_utils::collections::SealFlag)
//! shared by every table of the draft. Building seals it, so the moved
//! tables reject mutation even through paths that bypass the builder.

mod builder;
mod options;
mod settings;

pub use builder::ReadOptionsBuilder;
pub use options::ReadOptions;
pub use settings::{Converter, MissingFieldHandler, ReadSettings, ReturnType};
