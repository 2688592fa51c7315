//! Aggregated package version information.
//!
//! This module provides the result model shared by the aggregation,
//! sorting and rendering stages, plus the APK version ordering they rely on.

mod render;
mod results;
mod store;
pub mod version;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use render::{RenderOptions, Renderer};
pub use results::PackageResults;
pub use store::ResultStore;

/// One observed version of a package in one repository.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PackageMeta {
    #[serde(rename = "BuildTime")]
    pub build_time: DateTime<Utc>,
    #[serde(rename = "Origin")]
    pub origin: String,
    #[serde(rename = "Repository")]
    pub repository: String,
    #[serde(rename = "Version")]
    pub version: String,
}

/// One observed version of a sub package, filed under its origin package.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SubPackageMeta {
    #[serde(flatten)]
    pub meta: PackageMeta,
    pub name: String,
}

/// Everything collected for a single package name.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct PackageData {
    pub versions: Vec<PackageMeta>,
    #[serde(rename = "subpackages")]
    pub sub_packages: Vec<SubPackageMeta>,
}
