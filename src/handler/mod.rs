//! Request handler module
//!
//! Responsible for request routing dispatch: the JSON conversion endpoints
//! and the bundled static front-end.

pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
