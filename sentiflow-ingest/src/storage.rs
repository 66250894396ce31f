//! Dataset object storage
//!
//! Buckets map to directories below a root folder and objects to files
//! inside them, so `bucket = "sentiment-raw"`, `file = "raw/sample_20k.csv"`
//! reads `<bucket_root>/sentiment-raw/raw/sample_20k.csv`.

use async_trait::async_trait;
use sentiflow_common::{Error, Result};
use std::path::{Component, Path, PathBuf};

/// Read access to dataset objects
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch the full content of one object
    async fn fetch(&self, bucket: &str, object: &str) -> Result<Vec<u8>>;
}

/// Filesystem-backed object store
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve an object to a file path, rejecting anything that could escape its bucket
    pub fn object_path(&self, bucket: &str, object: &str) -> Result<PathBuf> {
        if bucket.is_empty() || bucket.contains(['/', '\\']) || bucket == "." || bucket == ".." {
            return Err(Error::InvalidInput(format!("Invalid bucket name: {:?}", bucket)));
        }

        let object_path = Path::new(object);
        let all_normal = object_path
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if object.is_empty() || !all_normal {
            return Err(Error::InvalidInput(format!("Invalid object path: {:?}", object)));
        }

        Ok(self.root.join(bucket).join(object_path))
    }
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn fetch(&self, bucket: &str, object: &str) -> Result<Vec<u8>> {
        let path = self.object_path(bucket, object)?;
        tracing::debug!(path = %path.display(), "Fetching dataset object");

        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::NotFound(format!(
                "Object {}/{} does not exist",
                bucket, object
            ))),
            Err(e) => Err(Error::Io(e)),
        }
    }
}
