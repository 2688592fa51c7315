use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::io::Write;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinSet;

use crate::{
    error::StatusError,
    index::{PackageRecord, decode_index},
    package::{RenderOptions, Renderer, ResultStore},
    query::QuerySet,
    source::{FetchIndex, Source},
};

use super::config::Config;

/// How many sources contributed to a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl RunSummary {
    /// True when there was at least one source and none of them succeeded.
    pub fn all_failed(&self) -> bool {
        self.succeeded == 0 && self.failed > 0
    }
}

/// Records a source kept for the unfiltered listing; `None` once they went
/// into the store.
type SourceOutcome = std::result::Result<Option<Vec<PackageRecord>>, StatusError>;

/// Fetch, decode and classify every configured source concurrently, then
/// render once all of them are done.
///
/// Per-source failures are written to `err` as a single
/// `Encountered errors: ...` line and do not stop the other sources.
/// Without queries every decoded record is listed, source by source.
#[tracing::instrument(skip_all, fields(sources = config.sources.len()))]
pub async fn run<F, W, E>(
    config: Config<F>,
    queries: QuerySet,
    options: &RenderOptions,
    renderer: &Renderer,
    out: &mut W,
    err: &mut E,
) -> Result<RunSummary>
where
    F: FetchIndex + 'static,
    W: Write,
    E: Write,
{
    let Config {
        fetcher,
        sources,
        max_concurrent,
    } = config;

    let fetcher = Arc::new(fetcher);
    let store = Arc::new(ResultStore::new());
    let queries = Arc::new(queries);
    let semaphore = Arc::new(Semaphore::new(max_concurrent.max(1)));

    let mut workers = JoinSet::new();
    for (idx, source) in sources.iter().cloned().enumerate() {
        let fetcher = Arc::clone(&fetcher);
        let store = Arc::clone(&store);
        let queries = Arc::clone(&queries);
        let semaphore = Arc::clone(&semaphore);

        workers.spawn(async move {
            let _permit = match acquire_slot(semaphore, &source).await {
                Ok(permit) => permit,
                Err(e) => return (idx, Err(e)),
            };
            let outcome = process_source(fetcher.as_ref(), source, store, queries).await;
            (idx, outcome)
        });
    }

    let mut outcomes: Vec<Option<SourceOutcome>> = sources.iter().map(|_| None).collect();
    let mut panicked = Vec::new();
    while let Some(joined) = workers.join_next().await {
        match joined {
            Ok((idx, outcome)) => outcomes[idx] = Some(outcome),
            Err(join_err) => {
                warn!("Source worker panicked: {}", join_err);
                panicked.push(join_err.to_string());
            }
        }
    }

    let mut summary = RunSummary::default();
    let mut errors = Vec::new();
    let mut listings = Vec::new();
    for (source, outcome) in sources.iter().zip(outcomes) {
        match outcome {
            Some(Ok(records)) => {
                summary.succeeded += 1;
                if let Some(records) = records {
                    listings.push((source, records));
                }
            }
            Some(Err(e)) => {
                summary.failed += 1;
                errors.push(e.to_string());
            }
            None => summary.failed += 1,
        }
    }
    errors.extend(panicked.into_iter().map(|e| format!("source worker panicked: {}", e)));

    if !errors.is_empty() {
        let message = errors.join("; ");
        warn!("Encountered errors: {}", message);
        writeln!(err, "Encountered errors: {}", message)
            .context("Failed to write diagnostics")?;
    }
    info!(
        "{} of {} sources processed successfully",
        summary.succeeded,
        sources.len()
    );

    if queries.is_empty() {
        for (source, records) in listings {
            for record in &records {
                renderer
                    .render_record(record, &source.name, options.show_parent_package, out)
                    .context("Failed to write output")?;
            }
        }
        return Ok(summary);
    }

    let mut results = store.take_results();
    debug!("Collected results for {} packages", results.len());
    results.sort();
    renderer.print(results, options, out)?;

    Ok(summary)
}

/// Wait for a worker slot. A closed semaphore fails the source instead of
/// letting it run unbounded.
async fn acquire_slot(
    semaphore: Arc<Semaphore>,
    source: &Source,
) -> std::result::Result<OwnedSemaphorePermit, StatusError> {
    semaphore.acquire_owned().await.map_err(|e| {
        debug!("Semaphore closed before {} could start", source.name);
        StatusError::Fetch {
            repository: source.name.clone(),
            message: e.to_string(),
        }
    })
}

#[tracing::instrument(skip_all, fields(source = %source.name))]
async fn process_source<F: FetchIndex>(
    fetcher: &F,
    source: Source,
    store: Arc<ResultStore>,
    queries: Arc<QuerySet>,
) -> SourceOutcome {
    let bytes = fetcher
        .fetch(&source)
        .await
        .map_err(|e| StatusError::Fetch {
            repository: source.name.clone(),
            message: format!("{:#}", e),
        })?;
    debug!("Fetched {} bytes for {}", bytes.len(), source.name);

    let repository = source.name.clone();
    let decoded = tokio::task::spawn_blocking(move || -> Result<Option<Vec<PackageRecord>>> {
        let records = decode_index(bytes.as_slice())?;
        if queries.is_empty() {
            return Ok(Some(records));
        }

        let stored = records
            .iter()
            .filter(|record| store.add_package_meta(&queries, record, &repository))
            .count();
        debug!(
            "{} of {} records from {} matched",
            stored,
            records.len(),
            repository
        );
        Ok(None)
    })
    .await;

    match decoded {
        Ok(Ok(records)) => Ok(records),
        Ok(Err(e)) => Err(StatusError::Decode {
            repository: source.name,
            message: format!("{:#}", e),
        }),
        Err(join_err) => Err(StatusError::Decode {
            repository: source.name,
            message: join_err.to_string(),
        }),
    }
}
