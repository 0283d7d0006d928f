//! pia-core
//!
//! Pure domain types and storage key conventions.
//! No AWS SDK dependency; this is the shared vocabulary of the PIA system.

pub mod keys;
pub mod models;
