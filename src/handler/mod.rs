//! Request handler module
//!
//! Dispatches each request through the redirect rule table, falling through
//! to static file serving on a miss.

pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
