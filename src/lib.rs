pub mod commands;
pub mod error;
pub mod http;
pub mod index;
pub mod package;
pub mod query;
pub mod runtime;
pub mod source;
