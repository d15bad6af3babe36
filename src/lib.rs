//! Registry of object-storage clients, one per bucket shard.
//!
//! Bucket metadata comes from a [`BucketSource`]; each record is turned into a
//! [`StorageClient`] by a [`Connector`]. The [`ShardedClientRegistry`] swaps the
//! whole set in atomically on every [`load`](ShardedClientRegistry::load) and
//! serves lookups to concurrent readers.

mod bucket;
mod client;
mod config;
mod endpoint;
mod error;
mod registry;
mod reload;
mod source;

pub use bucket::{BucketId, BucketRecord};
pub use client::{Connector, StorageClient};
#[cfg(feature = "aws")]
pub use client::S3Connector;
pub use config::ClientConfig;
pub use endpoint::extract_host;
pub use error::{Error, Result};
pub use registry::ShardedClientRegistry;
pub use reload::spawn_periodic_reload;
pub use source::{BucketSource, FileBucketSource, MemoryBucketSource};
