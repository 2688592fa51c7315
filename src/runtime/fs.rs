//! File system operations.

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

use super::RealRuntime;

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) fn open_impl(&self, path: &Path) -> Result<Box<dyn Read + Send>> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("failed to open APKINDEX file {}", path.display()))?;
        Ok(Box::new(file))
    }
}

#[cfg(test)]
mod tests {
    use crate::runtime::{RealRuntime, Runtime};
    use std::io::Read;
    use tempfile::tempdir;

    #[test]
    fn test_real_runtime_open() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("APKINDEX.tar.gz");
        std::fs::write(&path, b"index bytes").unwrap();

        let mut content = Vec::new();
        RealRuntime
            .open(&path)
            .unwrap()
            .read_to_end(&mut content)
            .unwrap();
        assert_eq!(content, b"index bytes");
    }

    #[test]
    fn test_real_runtime_open_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.tar.gz");

        let err = RealRuntime.open(&path).err().unwrap();
        assert!(err.to_string().contains("missing.tar.gz"));
    }
}
