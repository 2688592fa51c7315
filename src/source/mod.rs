//! Index sources.
//!
//! A source names one repository index: a label shown in the report, a
//! location (URL or local path) and whether fetching it needs credentials.

mod fetch;

use anyhow::Result;
use async_trait::async_trait;
use std::fmt;
use std::path::Path;

pub use fetch::{AUTH_USERNAME, IndexFetcher};

/// Label given to the source created from `--local-apkindex`.
pub const LOCAL_SOURCE_NAME: &str = "local";

/// Default index locations, in report order: (label, location, requires auth).
const DEFAULT_SOURCES: [(&str, &str, bool); 3] = [
    (
        "wolfi",
        "https://packages.wolfi.dev/os/x86_64/APKINDEX.tar.gz",
        false,
    ),
    (
        "enterprise-packages",
        "https://apk.cgr.dev/chainguard-private/x86_64/APKINDEX.tar.gz",
        true,
    ),
    (
        "extra-packages",
        "https://apk.cgr.dev/extra-packages/x86_64/APKINDEX.tar.gz",
        true,
    ),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub name: String,
    pub location: String,
    pub requires_auth: bool,
}

impl Source {
    pub fn new(name: impl Into<String>, location: impl Into<String>, requires_auth: bool) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            requires_auth,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.location)
    }
}

/// The public wolfi index followed by the two authenticated Chainguard indices.
pub fn default_sources() -> Vec<Source> {
    DEFAULT_SOURCES
        .iter()
        .map(|(name, location, auth)| Source::new(*name, *location, *auth))
        .collect()
}

/// A single source reading a local `APKINDEX.tar.gz`.
pub fn local_source(path: &Path) -> Source {
    Source::new(LOCAL_SOURCE_NAME, path.to_string_lossy(), false)
}

/// Retrieves the raw archive bytes of a source.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FetchIndex: Send + Sync {
    async fn fetch(&self, source: &Source) -> Result<Vec<u8>>;
}
