//! Data access
//!
//! Handles:
//! - The read-only query contract every view depends on
//! - In-memory rows and JSON snapshots
//! - PostgREST (Supabase) over HTTP

pub mod memory;
pub mod rest;
pub mod source;

pub use memory::*;
pub use rest::RestSource;
pub use source::*;
