pub mod answers;
pub mod evaluations;
pub mod health;
pub mod measures;
pub mod pias;
pub mod revisions;
pub mod structure;
