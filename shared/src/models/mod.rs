//! Data models
//!
//! Shared between the reorder core, the HTTP client and the settings
//! frontend (via API). Identifiers are opaque strings.

pub mod field;
pub mod object;

// Re-exports
pub use field::*;
pub use object::*;
