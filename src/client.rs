use crate::bucket::BucketId;
use crate::error::Result;

/// A transport bound to one bucket's host, plus the bucket it is scoped to.
///
/// Never mutated after construction. The registry hands these out behind an
/// `Arc`, so a client stays usable after a reload has replaced it.
#[derive(Debug)]
pub struct StorageClient<T> {
    bucket_id: BucketId,
    bucket_name: String,
    host: String,
    transport: T,
}

impl<T> StorageClient<T> {
    pub fn new(bucket_id: BucketId, bucket_name: String, host: String, transport: T) -> Self {
        Self {
            bucket_id,
            bucket_name,
            host,
            transport,
        }
    }

    pub fn bucket_id(&self) -> BucketId {
        self.bucket_id
    }

    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

/// Builds transports for a host using the process-wide credentials and
/// security settings the connector was created with.
pub trait Connector: Send + Sync {
    type Transport: Send + Sync + 'static;

    fn connect(&self, host: &str) -> Result<Self::Transport>;
}

#[cfg(feature = "aws")]
pub use self::aws::S3Connector;

#[cfg(feature = "aws")]
mod aws {
    use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
    use aws_sdk_s3::Client;

    use super::Connector;
    use crate::config::ClientConfig;
    use crate::error::{Error, Result};

    /// Connector for S3-compatible services using static credentials and
    /// path-style addressing.
    pub struct S3Connector {
        config: ClientConfig,
    }

    impl S3Connector {
        pub fn new(config: ClientConfig) -> Self {
            Self { config }
        }

        pub fn config(&self) -> &ClientConfig {
            &self.config
        }
    }

    impl Connector for S3Connector {
        type Transport = Client;

        fn connect(&self, host: &str) -> Result<Client> {
            if host.trim().is_empty() {
                return Err(Error::Client("endpoint host is empty".into()));
            }

            let endpoint = format!("{}://{}", self.config.scheme(), host);
            url::Url::parse(&endpoint)
                .map_err(|e| Error::Client(format!("invalid endpoint host {host:?}: {e}")))?;

            let credentials = Credentials::new(
                self.config.access_key.clone(),
                self.config.secret_key.clone(),
                None,
                None,
                "shardreg-static",
            );

            let conf = aws_sdk_s3::Config::builder()
                .behavior_version(BehaviorVersion::latest())
                .region(Region::new(self.config.region.clone()))
                .endpoint_url(endpoint)
                .credentials_provider(credentials)
                .force_path_style(true)
                .build();

            Ok(Client::from_conf(conf))
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_accessors() {
        let id = Uuid::new_v4();
        let client = StorageClient::new(id, "logs".into(), "minio:9000".into(), 7u8);
        assert_eq!(client.bucket_id(), id);
        assert_eq!(client.bucket_name(), "logs");
        assert_eq!(client.host(), "minio:9000");
        assert_eq!(*client.transport(), 7);
    }
}
