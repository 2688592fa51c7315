use anyhow::Result;
use log::debug;

use std::path::PathBuf;

use crate::{
    error::StatusError,
    http::HttpClient,
    runtime::Runtime,
    source::{FetchIndex, IndexFetcher, Source, default_sources, local_source},
};

pub const TOKEN_PROMPT: &str = "Specifying an auth token is required. Use `chainctl auth token --audience apk.cgr.dev` to get the required token. Please enter token now - alternatively, you can also specify this via --auth-token flag or by setting HTTP_AUTH environment variable: ";

const DEFAULT_MAX_CONCURRENT: usize = 4;

/// `wolfi-package-status/<version> (<os>; <arch>)`
pub fn user_agent() -> String {
    format!(
        "wolfi-package-status/{} ({}; {})",
        env!("PKGSTATUS_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

/// Upper bound of sources processed at once.
pub fn default_max_concurrent() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(DEFAULT_MAX_CONCURRENT)
}

pub struct Config<F: FetchIndex> {
    pub fetcher: F,
    pub sources: Vec<Source>,
    pub max_concurrent: usize,
}

impl<F: FetchIndex> Config<F> {
    pub fn with_fetcher(fetcher: F, sources: Vec<Source>) -> Self {
        Self {
            fetcher,
            sources,
            max_concurrent: default_max_concurrent(),
        }
    }
}

impl<R: Runtime> Config<IndexFetcher<R>> {
    /// Assembles the source list and the fetcher.
    ///
    /// A token is only resolved when some source needs one: the given token
    /// first, else an interactive prompt. An empty answer is fatal.
    pub fn new(
        runtime: R,
        local_index: Option<PathBuf>,
        auth_token: Option<String>,
    ) -> Result<Self> {
        let sources = match &local_index {
            Some(path) => vec![local_source(path)],
            None => default_sources(),
        };

        let auth_token = if sources.iter().any(|s| s.requires_auth) {
            Some(resolve_token(&runtime, auth_token)?)
        } else {
            None
        };

        let http = HttpClient::build(&user_agent())?;
        let fetcher = IndexFetcher::new(runtime, http, auth_token);

        Ok(Self::with_fetcher(fetcher, sources))
    }
}

fn resolve_token<R: Runtime>(runtime: &R, auth_token: Option<String>) -> Result<String> {
    let token = match auth_token.filter(|t| !t.trim().is_empty()) {
        Some(token) => token,
        None => runtime.prompt(TOKEN_PROMPT)?,
    };
    let token = token.trim().to_string();
    if token.is_empty() {
        return Err(StatusError::AuthRequired.into());
    }

    debug!(
        "Using auth token for authentication ({} characters)",
        token.chars().count()
    );
    Ok(token)
}
