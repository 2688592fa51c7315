use anyhow::Result;
use std::path::PathBuf;

use crate::{
    package::{RenderOptions, Renderer},
    query::QuerySet,
    runtime::Runtime,
};

pub mod config;
mod status;

pub use status::{RunSummary, run};

use config::Config;

/// Report package versions from the default sources, or from a single local
/// index, to standard output.
#[tracing::instrument(skip(runtime, queries, auth_token))]
pub async fn status<R: Runtime + 'static>(
    runtime: R,
    queries: QuerySet,
    options: RenderOptions,
    local_index: Option<PathBuf>,
    auth_token: Option<String>,
) -> Result<RunSummary> {
    let config = Config::new(runtime, local_index, auth_token)?;
    let mut out = std::io::stdout();
    let mut err = std::io::stderr();
    run(config, queries, &options, &Renderer::new(), &mut out, &mut err).await
}
