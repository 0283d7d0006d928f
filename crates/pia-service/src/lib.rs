//! pia-service
//!
//! The operations collaborators call: assessment lifecycle and data entry,
//! revision snapshots and restore, and the sorted assessment listing.

pub mod error;
pub mod lifecycle;
pub mod listing;
pub mod preferences;
pub mod revisions;

pub use error::ServiceError;
pub use lifecycle::{AssessmentManager, EvaluationInput, ReplaceOptions};
pub use listing::{Listing, ListingEntry, ListingMode};
pub use preferences::{DisplayMode, Preferences, SortKey, SortOrder};
pub use revisions::RevisionService;
