use anyhow::{Result, anyhow, bail};
use chrono::{DateTime, Utc};
use log::debug;

use super::PackageRecord;

#[derive(Default)]
struct RecordBuilder {
    name: Option<String>,
    version: String,
    origin: String,
    build_time: Option<DateTime<Utc>>,
    line: usize,
}

impl RecordBuilder {
    fn is_empty(&self) -> bool {
        self.name.is_none() && self.version.is_empty() && self.origin.is_empty()
    }

    fn finish(self) -> Option<PackageRecord> {
        let empty = self.is_empty();
        let Some(name) = self.name.filter(|n| !n.is_empty()) else {
            if !empty {
                debug!("Dropping index record without a name ending at line {}", self.line);
            }
            return None;
        };
        Some(PackageRecord {
            name,
            version: self.version,
            origin: self.origin,
            build_time: self.build_time.unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
        })
    }
}

/// Parse the text of an `APKINDEX` entry.
///
/// Records are separated by blank lines and made of `K:value` lines with a
/// single character key. Records without a `P` (name) line are dropped.
pub fn parse_index(text: &str) -> Result<Vec<PackageRecord>> {
    let mut records = Vec::new();
    let mut current = RecordBuilder::default();

    for (idx, line) in text.lines().enumerate() {
        let lineno = idx + 1;
        if line.trim().is_empty() {
            records.extend(std::mem::take(&mut current).finish());
            continue;
        }

        let (key, value) = line
            .split_once(':')
            .filter(|(key, _)| key.len() == 1)
            .ok_or_else(|| anyhow!("malformed APKINDEX line {}: {:?}", lineno, line))?;
        current.line = lineno;

        match key {
            "P" => current.name = Some(value.to_string()),
            "V" => current.version = value.to_string(),
            "o" => current.origin = value.to_string(),
            "t" => {
                let secs: i64 = value
                    .trim()
                    .parse()
                    .map_err(|e| anyhow!("invalid build time on line {}: {}", lineno, e))?;
                let Some(time) = DateTime::<Utc>::from_timestamp(secs, 0) else {
                    bail!("build time out of range on line {}: {}", lineno, secs);
                };
                current.build_time = Some(time);
            }
            _ => {}
        }
    }
    records.extend(current.finish());

    Ok(records)
}
