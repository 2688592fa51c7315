use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use log::debug;
use std::io::Read;
use std::path::Path;

use super::{FetchIndex, Source};
use crate::http::HttpClient;
use crate::runtime::Runtime;

/// Username paired with the token for HTTP Basic authentication.
pub const AUTH_USERNAME: &str = "user";

#[derive(Debug, PartialEq, Eq)]
enum Location<'a> {
    Http(&'a str),
    File(&'a Path),
}

fn parse_location(location: &str) -> Result<Location<'_>> {
    match location.split_once("://") {
        Some((scheme, rest)) => match scheme.to_ascii_lowercase().as_str() {
            "http" | "https" => Ok(Location::Http(location)),
            "file" => Ok(Location::File(Path::new(rest))),
            other => bail!("unsupported scheme {:?} in {}", other, location),
        },
        None => Ok(Location::File(Path::new(location))),
    }
}

/// Fetches index archives over HTTP(S) or from the local file system.
pub struct IndexFetcher<R: Runtime> {
    runtime: R,
    http: HttpClient,
    auth_token: Option<String>,
}

impl<R: Runtime> IndexFetcher<R> {
    pub fn new(runtime: R, http: HttpClient, auth_token: Option<String>) -> Self {
        Self {
            runtime,
            http,
            auth_token,
        }
    }

    async fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        let mut reader = self.runtime.open(path)?;
        let display = path.display().to_string();
        tokio::task::spawn_blocking(move || -> Result<Vec<u8>> {
            let mut bytes = Vec::new();
            reader
                .read_to_end(&mut bytes)
                .with_context(|| format!("failed to read {}", display))?;
            Ok(bytes)
        })
        .await
        .context("index read task failed")?
    }
}

#[async_trait]
impl<R: Runtime> FetchIndex for IndexFetcher<R> {
    #[tracing::instrument(skip(self, source), fields(source = %source.name))]
    async fn fetch(&self, source: &Source) -> Result<Vec<u8>> {
        match parse_location(&source.location)? {
            Location::Http(url) => {
                let auth = match (&self.auth_token, source.requires_auth) {
                    (Some(token), true) => Some((AUTH_USERNAME, token.as_str())),
                    (None, true) => {
                        debug!("No token available for {}, sending anonymous request", source.name);
                        None
                    }
                    (_, false) => None,
                };
                self.http.get_bytes(url, auth).await
            }
            Location::File(path) => {
                debug!("Reading {} index from {}", source.name, path.display());
                self.read_file(path).await
            }
        }
    }
}
