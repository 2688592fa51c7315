//! Text and JSON rendering of aggregated results.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use chrono_humanize::HumanTime;

use crate::index::PackageRecord;

use super::{PackageMeta, PackageResults};

/// Display switches for a status run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Show every collected version instead of only the newest
    pub list_all_versions: bool,
    /// Emit a JSON document instead of text
    pub json: bool,
    /// Append the origin package to every version line
    pub show_parent_package: bool,
    /// List sub packages below their origin package
    pub show_sub_packages: bool,
}

/// Renders results relative to a fixed point in time.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    now: DateTime<Utc>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    /// Renderer whose relative times are computed against `now`.
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    fn timestamp(&self, time: DateTime<Utc>) -> String {
        format!(
            "{} - {}",
            HumanTime::from(time - self.now),
            time.format("%Y-%m-%d %H:%M:%S %z %Z")
        )
    }

    /// Trim (unless all versions were requested) and render sorted results.
    pub fn print<W: Write>(
        &self,
        mut results: PackageResults,
        options: &RenderOptions,
        out: &mut W,
    ) -> Result<()> {
        if !options.list_all_versions {
            results.trim_to_latest();
        }
        if options.json {
            self.render_json(&results, out)
        } else {
            self.render_text(&results, options, out)
                .context("Failed to write output")
        }
    }

    pub fn render_json<W: Write>(&self, results: &PackageResults, out: &mut W) -> Result<()> {
        let json = serde_json::to_string_pretty(results).context("Error marshalling JSON")?;
        writeln!(out, "{}", json).context("Failed to write output")?;
        Ok(())
    }

    pub fn render_text<W: Write>(
        &self,
        results: &PackageResults,
        options: &RenderOptions,
        out: &mut W,
    ) -> std::io::Result<()> {
        for (name, data) in results.iter() {
            writeln!(out, "The versions of package {} are:", name)?;
            for v in &data.versions {
                writeln!(
                    out,
                    "\t{} ({}) in {} repository{}",
                    v.version,
                    self.timestamp(v.build_time),
                    v.repository,
                    parent_suffix(options.show_parent_package, &v.origin)
                )?;
            }
            if options.show_sub_packages && !data.sub_packages.is_empty() {
                writeln!(out, "\tSub packages:")?;
                for s in &data.sub_packages {
                    let PackageMeta {
                        build_time,
                        repository,
                        version,
                        ..
                    } = &s.meta;
                    writeln!(
                        out,
                        "\t{} {} ({}) in {} repository",
                        s.name,
                        version,
                        self.timestamp(*build_time),
                        repository
                    )?;
                }
            }
        }
        Ok(())
    }

    /// One line for an unfiltered listing of a raw index record.
    pub fn render_record<W: Write>(
        &self,
        record: &PackageRecord,
        repository: &str,
        show_parent_package: bool,
        out: &mut W,
    ) -> std::io::Result<()> {
        writeln!(
            out,
            "{} version {} ({}) in {} repository{}",
            record.name,
            record.version,
            self.timestamp(record.build_time),
            repository,
            parent_suffix(show_parent_package, &record.origin)
        )
    }
}

fn parent_suffix(show: bool, origin: &str) -> String {
    if show {
        format!(" - Parent/Origin package: {}", origin)
    } else {
        String::new()
    }
}
