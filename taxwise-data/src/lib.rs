//! Configuration loading for the tax engine.
//!
//! Regime presets are compiled into `taxwise-core`; this crate lets a
//! deployment override their slab tables from CSV at start-up.

mod loader;

pub use loader::{SlabRecord, SlabTableLoader, SlabTableLoaderError};
