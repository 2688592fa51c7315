//! APKINDEX archive decoding.
//!
//! An `APKINDEX.tar.gz` is one or more concatenated gzip members (a signature
//! segment followed by the index segment) that together form a single tar
//! stream. The `APKINDEX` entry in that stream holds the package records.

mod apkindex;

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use flate2::read::MultiGzDecoder;
use log::debug;
use std::io::Read;
use tar::Archive;

pub use apkindex::parse_index;

/// Name of the tar entry holding the package records.
pub const INDEX_ENTRY: &str = "APKINDEX";

/// Metadata for one package entry of an index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRecord {
    pub name: String,
    pub version: String,
    /// Package this one was built alongside; empty if unknown
    pub origin: String,
    pub build_time: DateTime<Utc>,
}

/// Decode an `APKINDEX.tar.gz` stream into its package records, in index order.
#[tracing::instrument(skip(reader))]
pub fn decode_index<R: Read>(reader: R) -> Result<Vec<PackageRecord>> {
    let mut archive = Archive::new(MultiGzDecoder::new(reader));

    for entry in archive.entries().context("Failed to read index archive")? {
        let mut entry = entry.context("Failed to read index archive entry")?;
        let is_index = entry
            .path()
            .map(|p| p.to_str() == Some(INDEX_ENTRY))
            .unwrap_or(false);
        if !is_index {
            debug!("Skipping archive entry {:?}", entry.path().ok());
            continue;
        }

        let mut text = String::new();
        entry
            .read_to_string(&mut text)
            .context("Failed to read APKINDEX entry")?;
        let records = parse_index(&text)?;
        debug!("Decoded {} package records", records.len());
        return Ok(records);
    }

    Err(anyhow!("archive does not contain an {} entry", INDEX_ENTRY))
}

#[cfg(test)]
pub(crate) mod test_support {
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;
    use tar::Builder;

    /// (name, version, origin, build time) of one fixture record
    pub type FixtureRecord<'a> = (&'a str, &'a str, &'a str, i64);

    pub fn index_text(records: &[FixtureRecord<'_>]) -> String {
        records
            .iter()
            .map(|(name, version, origin, time)| {
                format!(
                    "C:Q1abcdefghijklmnopqrstuvwxyz=\nP:{}\nV:{}\nA:x86_64\nS:1024\nI:4096\nT:{} package\no:{}\nt:{}\n",
                    name, version, name, origin, time
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn tar_bytes(files: &[(&str, &str)]) -> Vec<u8> {
        let mut builder = Builder::new(Vec::new());
        for (name, content) in files {
            let mut header = tar::Header::new_gnu();
            header.set_size(content.len() as u64);
            header.set_path(name).unwrap();
            header.set_cksum();
            builder.append(&header, content.as_bytes()).unwrap();
        }
        builder.into_inner().unwrap()
    }

    fn gzip(bytes: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(bytes).unwrap();
        encoder.finish().unwrap()
    }

    /// Build an `APKINDEX.tar.gz` holding the given records.
    pub fn index_archive(records: &[FixtureRecord<'_>]) -> Vec<u8> {
        gzip(&tar_bytes(&[
            ("DESCRIPTION", "test repository"),
            ("APKINDEX", &index_text(records)),
        ]))
    }
}
