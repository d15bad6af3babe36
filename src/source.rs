use async_trait::async_trait;
use parking_lot::RwLock;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;

use crate::bucket::BucketRecord;
use crate::error::{Error, Result};

/// Authoritative list of buckets, as kept by the metadata store.
///
/// Implementations run the listing inside a single transaction and return
/// either the complete current set or an error, never a partial list.
#[async_trait]
pub trait BucketSource: Send + Sync {
    async fn list_buckets(&self) -> Result<Vec<BucketRecord>>;
}

#[async_trait]
impl<S: BucketSource + ?Sized> BucketSource for Arc<S> {
    async fn list_buckets(&self) -> Result<Vec<BucketRecord>> {
        (**self).list_buckets().await
    }
}

/// In-memory bucket listing. The whole list is replaced at once, so a
/// listing always sees one consistent version.
#[derive(Debug, Default)]
pub struct MemoryBucketSource {
    records: RwLock<Vec<BucketRecord>>,
}

impl MemoryBucketSource {
    pub fn new(records: Vec<BucketRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    pub fn set(&self, records: Vec<BucketRecord>) {
        *self.records.write() = records;
    }

    pub fn push(&self, record: BucketRecord) {
        self.records.write().push(record);
    }
}

#[async_trait]
impl BucketSource for MemoryBucketSource {
    async fn list_buckets(&self) -> Result<Vec<BucketRecord>> {
        Ok(self.records.read().clone())
    }
}

#[derive(Deserialize)]
struct Manifest {
    #[serde(default, rename = "bucket")]
    buckets: Vec<BucketRecord>,
}

/// Reads buckets from a TOML manifest of `[[bucket]]` tables.
///
/// The file is read in full on every listing; a single read is the
/// transaction boundary.
///
/// ```toml
/// [[bucket]]
/// id = "67e55044-10b1-426f-9247-bb680e5fe0c8"
/// name = "logs-eu"
/// endpoint_url = "https://s3.eu.example.com"
/// ```
pub struct FileBucketSource {
    path: PathBuf,
}

impl FileBucketSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl BucketSource for FileBucketSource {
    async fn list_buckets(&self) -> Result<Vec<BucketRecord>> {
        let raw = fs::read_to_string(&self.path).await.map_err(Error::from)?;
        let manifest: Manifest = toml::from_str(&raw)?;

        let mut seen = HashSet::with_capacity(manifest.buckets.len());
        for record in &manifest.buckets {
            if !seen.insert(record.id) {
                return Err(Error::Metadata(format!(
                    "duplicate bucket id {} in {}",
                    record.id,
                    self.path.display()
                )));
            }
        }

        Ok(manifest.buckets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use uuid::Uuid;

    const ID_A: &str = "67e55044-10b1-426f-9247-bb680e5fe0c8";
    const ID_B: &str = "0f8fad5b-d9cb-469f-a165-70867728950e";

    fn manifest_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_memory_source_replaces_whole_list() {
        let source =
            MemoryBucketSource::new(vec![BucketRecord::new(Uuid::new_v4(), "a", "minio:9000")]);
        assert_eq!(source.list_buckets().await.unwrap().len(), 1);

        source.push(BucketRecord::new(Uuid::new_v4(), "b", "minio:9000"));
        assert_eq!(source.list_buckets().await.unwrap().len(), 2);

        source.set(Vec::new());
        assert!(source.list_buckets().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_arc_source_delegates() {
        let source = Arc::new(MemoryBucketSource::new(vec![BucketRecord::new(
            Uuid::new_v4(),
            "a",
            "minio:9000",
        )]));
        let shared: Arc<dyn BucketSource> = source.clone();
        assert_eq!(shared.list_buckets().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_file_source_reads_manifest() {
        let file = manifest_file(&format!(
            r#"
            [[bucket]]
            id = "{ID_A}"
            name = "logs-eu"
            endpoint_url = "https://s3.eu.example.com"

            [[bucket]]
            id = "{ID_B}"
            name = "logs-us"
            endpoint_url = "minio.internal:9000"
            "#
        ));

        let records = FileBucketSource::new(file.path()).list_buckets().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "logs-eu");
        assert_eq!(records[1].endpoint_url, "minio.internal:9000");
    }

    #[tokio::test]
    async fn test_file_source_empty_manifest() {
        let file = manifest_file("");
        let records = FileBucketSource::new(file.path()).list_buckets().await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_file_source_rejects_duplicate_ids() {
        let file = manifest_file(&format!(
            r#"
            [[bucket]]
            id = "{ID_A}"
            name = "one"
            endpoint_url = "a:1"

            [[bucket]]
            id = "{ID_A}"
            name = "two"
            endpoint_url = "b:2"
            "#
        ));

        let err = FileBucketSource::new(file.path()).list_buckets().await.unwrap_err();
        assert!(matches!(err, Error::Metadata(_)));
    }

    #[tokio::test]
    async fn test_file_source_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileBucketSource::new(dir.path().join("buckets.toml"))
            .list_buckets()
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[tokio::test]
    async fn test_file_source_malformed() {
        let file = manifest_file(
            r#"
            [[bucket]]
            id = "not-a-uuid"
            name = "x"
            endpoint_url = "y"
            "#,
        );
        let err = FileBucketSource::new(file.path()).list_buckets().await.unwrap_err();
        assert!(matches!(err, Error::Toml(_)));
    }
}
