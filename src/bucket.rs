use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Shard key of a bucket.
pub type BucketId = Uuid;

/// A bucket as persisted by the metadata store.
///
/// `endpoint_url` may be a full URL (`https://s3.example.com:9000`) or a bare
/// host and port (`minio.internal:9000`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketRecord {
    pub id: BucketId,
    pub name: String,
    pub endpoint_url: String,
}

impl BucketRecord {
    pub fn new(id: BucketId, name: impl Into<String>, endpoint_url: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            endpoint_url: endpoint_url.into(),
        }
    }
}
