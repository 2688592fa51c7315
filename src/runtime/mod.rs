//! Runtime abstraction for system operations.
//!
//! Everything the tool needs from the host besides the network goes through
//! this trait, so tests can substitute a mock.
//!
//! # Structure
//!
//! - `fs` - File access for local index files
//! - `user` - User interaction (credential prompt)

mod fs;
mod user;

use anyhow::Result;
use std::io::Read;
use std::path::Path;

#[cfg_attr(test, mockall::automock)]
pub trait Runtime: Send + Sync {
    // File System
    fn open(&self, path: &Path) -> Result<Box<dyn Read + Send>>;

    // User interaction
    /// Print `prompt` to standard error and read one line from standard input,
    /// without the trailing line break.
    fn prompt(&self, prompt: &str) -> Result<String>;
}

pub struct RealRuntime;

impl Runtime for RealRuntime {
    fn open(&self, path: &Path) -> Result<Box<dyn Read + Send>> {
        self.open_impl(path)
    }

    fn prompt(&self, prompt: &str) -> Result<String> {
        self.prompt_impl(prompt)
    }
}
