// Metal domain module
// Contains the metal record, its update payloads, and query types

#![allow(clippy::module_inception)]

pub mod metal;
pub mod query;

// Re-export main types for convenience
pub use metal::{Metal, MetalPatch, MetalUpdate};
pub use query::{ListOptions, MetalFilter, MetalPage, SortField, SortOrder};
