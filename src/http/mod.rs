//! HTTP protocol layer module
//!
//! Protocol-level building blocks shared by rule responses and the static
//! fallthrough.

pub mod cache;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use response::{
    build_304_response, build_404_response, build_405_response, build_410_response,
    build_413_response, build_500_response, build_cached_response, build_options_response,
    build_redirect_response,
};
