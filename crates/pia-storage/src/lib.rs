//! pia-storage
//!
//! Persistence for assessments, their child records, and revisions.
//! [`store::PiaStore`] is the seam; [`memory::MemoryStore`] backs tests and
//! single-process use, [`s3::S3Store`] keeps JSON objects in an S3 bucket.

pub mod client;
pub mod error;
pub mod memory;
pub mod s3;
pub mod store;

pub use store::{ArchiveFilter, PiaStore};
