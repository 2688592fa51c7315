//! HTTP client module with status classification.

mod client;
mod status;

pub use client::{CONNECT_TIMEOUT, HttpClient, REQUEST_TIMEOUT};
pub use status::{HttpFailure, classify_error};
