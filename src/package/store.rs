use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use log::trace;

use crate::index::PackageRecord;
use crate::query::QuerySet;

use super::{PackageData, PackageMeta, PackageResults, SubPackageMeta};

/// How a record relates to the active queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Classification {
    /// The record's own name matches
    Primary,
    /// Only the record's origin matches
    SubPackage,
}

fn classify(queries: &QuerySet, record: &PackageRecord) -> Option<Classification> {
    if queries.matches(&record.name) {
        Some(Classification::Primary)
    } else if !record.origin.is_empty() && queries.matches(&record.origin) {
        Some(Classification::SubPackage)
    } else {
        None
    }
}

/// Shared result map filled concurrently by the per-repository workers.
///
/// The map is only reachable through [`ResultStore::add_package_meta`] while
/// workers run, and is handed over whole by [`ResultStore::take_results`]
/// once they have all finished.
#[derive(Debug, Default)]
pub struct ResultStore {
    packages: Mutex<BTreeMap<String, PackageData>>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, PackageData>> {
        // Every critical section leaves the map consistent, so a panic in
        // another worker does not invalidate it.
        self.packages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Classify `record` against `queries` and merge it into the store.
    ///
    /// A record whose name matches is filed as a version of that name, even if
    /// its origin matches too. Otherwise a record whose origin matches is filed
    /// as a sub package of the origin. Anything else is dropped.
    ///
    /// Returns true if the record was stored.
    pub fn add_package_meta(
        &self,
        queries: &QuerySet,
        record: &PackageRecord,
        repository: &str,
    ) -> bool {
        let Some(class) = classify(queries, record) else {
            return false;
        };

        let meta = PackageMeta {
            build_time: record.build_time,
            origin: record.origin.clone(),
            repository: repository.to_string(),
            version: record.version.clone(),
        };

        let mut packages = self.lock();
        match class {
            Classification::Primary => {
                trace!("{} {} matched in {}", record.name, record.version, repository);
                packages
                    .entry(record.name.clone())
                    .or_default()
                    .versions
                    .push(meta);
            }
            Classification::SubPackage => {
                trace!(
                    "{} {} matched as sub package of {} in {}",
                    record.name, record.version, record.origin, repository
                );
                packages
                    .entry(record.origin.clone())
                    .or_default()
                    .sub_packages
                    .push(SubPackageMeta {
                        meta,
                        name: record.name.clone(),
                    });
            }
        }
        true
    }

    /// Number of package names collected so far.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Move the collected data out, leaving the store empty.
    pub fn take_results(&self) -> PackageResults {
        PackageResults::new(std::mem::take(&mut *self.lock()))
    }
}
