//! pia-aggregate
//!
//! Read-only derivations over one assessment bundle: the completion
//! percentage, the denormalized preview tree, and the portable export
//! payload that revisions store.

pub mod action_plan;
pub mod error;
pub mod export;
pub mod preview;
pub mod progress;
pub mod summary;
pub mod translate;
