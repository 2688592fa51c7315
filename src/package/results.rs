use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{PackageData, PackageMeta, SubPackageMeta, version};

/// Aggregated results, owned by a single thread once all workers are done.
///
/// Keys iterate in ascending lexicographic order, which is also the order
/// they are rendered in.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(transparent)]
pub struct PackageResults {
    packages: BTreeMap<String, PackageData>,
}

impl PackageResults {
    pub fn new(packages: BTreeMap<String, PackageData>) -> Self {
        Self { packages }
    }

    pub fn get(&self, name: &str) -> Option<&PackageData> {
        self.packages.get(name)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PackageData)> {
        self.packages.iter()
    }

    /// Sort versions oldest first, and sub packages by name then version.
    ///
    /// Equal versions are ordered by repository label, then build time, so the
    /// result does not depend on the order repositories finished in.
    pub fn sort(&mut self) {
        for data in self.packages.values_mut() {
            data.versions.sort_by(compare_meta);
            data.sub_packages.sort_by(|a, b| {
                a.name
                    .cmp(&b.name)
                    .then_with(|| compare_meta(&a.meta, &b.meta))
            });
        }
    }

    /// Reduce every package to its newest version. Must run after [`sort`](Self::sort).
    ///
    /// Sub packages are narrowed to the ones built at the same version in the
    /// same repository as the retained parent version. Packages that only
    /// collected sub packages keep the newest entry of each sub package name.
    pub fn trim_to_latest(&mut self) {
        for data in self.packages.values_mut() {
            match data.versions.pop() {
                Some(latest) => {
                    data.sub_packages.retain(|s| {
                        s.meta.version == latest.version && s.meta.repository == latest.repository
                    });
                    data.versions = vec![latest];
                }
                None => {
                    // Sorted by name then version: the last entry of each run wins
                    let mut newest: Vec<SubPackageMeta> = Vec::with_capacity(data.sub_packages.len());
                    for sub in data.sub_packages.drain(..) {
                        match newest.last_mut() {
                            Some(prev) if prev.name == sub.name => *prev = sub,
                            _ => newest.push(sub),
                        }
                    }
                    data.sub_packages = newest;
                }
            }
        }
    }
}

fn compare_meta(a: &PackageMeta, b: &PackageMeta) -> Ordering {
    version::compare(&a.version, &b.version)
        .then_with(|| a.repository.cmp(&b.repository))
        .then_with(|| a.build_time.cmp(&b.build_time))
}
