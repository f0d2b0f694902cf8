//! Small building blocks shared by the `weft` crates.
//!
//! - [`hash`]: fixed-seed hash containers built on *hashbrown* and *foldhash*.
//! - [`TypeIdMap`]: a map keyed by [`TypeId`](core::any::TypeId).
//! - [`collections`]: [`SealableVec`](collections::SealableVec), a list whose
//!   mutators are switched off by an externally owned [`SealFlag`](collections::SealFlag).
#![no_std]

// -----------------------------------------------------------------------------
// No STD Support

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod typeid_map;

pub mod collections;
pub mod hash;

// -----------------------------------------------------------------------------
// Top-level exports

pub use typeid_map::TypeIdMap;
