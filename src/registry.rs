use parking_lot::RwLock;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info};

use crate::bucket::{BucketId, BucketRecord};
use crate::client::{Connector, StorageClient};
use crate::endpoint::extract_host;
use crate::error::{Error, Result};
use crate::source::BucketSource;

type ClientMap<T> = HashMap<BucketId, Arc<StorageClient<T>>>;

struct Shards<T> {
    /// Number of successful loads swapped in so far. Zero means unloaded.
    generation: u64,
    clients: ClientMap<T>,
}

/// Maps bucket ids to ready storage clients built from the bucket source.
///
/// The mapping is rebuilt wholesale by [`load`](Self::load) and read by any
/// number of concurrent callers through [`get`](Self::get) and
/// [`get_all`](Self::get_all). Readers only ever see the result of one
/// complete load.
pub struct ShardedClientRegistry<S, C: Connector> {
    source: S,
    connector: C,
    shards: RwLock<Shards<C::Transport>>,
}

impl<S, C> ShardedClientRegistry<S, C>
where
    S: BucketSource,
    C: Connector,
{
    pub fn new(source: S, connector: C) -> Self {
        Self {
            source,
            connector,
            shards: RwLock::new(Shards {
                generation: 0,
                clients: HashMap::new(),
            }),
        }
    }

    /// Rebuilds every client from the bucket source and swaps them in.
    ///
    /// The listing and client construction run without holding the lock.
    /// Any error leaves the current mapping untouched. Dropping the returned
    /// future before it completes has no effect on the registry either.
    pub async fn load(&self) -> Result<()> {
        debug!("listing buckets");
        let records = self.source.list_buckets().await?;
        let clients = self.build(records)?;
        self.replace(clients);
        Ok(())
    }

    /// Like [`load`](Self::load), but gives up with [`Error::Cancelled`] as
    /// soon as `cancelled` resolves.
    pub async fn load_until<F>(&self, cancelled: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            _ = cancelled => Err(Error::Cancelled),
            result = self.load() => result,
        }
    }

    fn build(&self, records: Vec<BucketRecord>) -> Result<ClientMap<C::Transport>> {
        let mut clients = HashMap::with_capacity(records.len());

        for record in records {
            let host = extract_host(&record.endpoint_url)?;
            let transport = self.connector.connect(&host)?;
            debug!(bucket_id = %record.id, bucket = %record.name, %host, "built storage client");

            let client = StorageClient::new(record.id, record.name, host, transport);
            clients.insert(record.id, Arc::new(client));
        }

        Ok(clients)
    }

    fn replace(&self, clients: ClientMap<C::Transport>) {
        let count = clients.len();
        let mut shards = self.shards.write();
        shards.generation += 1;
        shards.clients = clients;
        info!(generation = shards.generation, buckets = count, "bucket clients loaded");
    }

    /// Returns the client for `bucket_id`, or [`Error::ClientNotFound`] when
    /// the current mapping has no such bucket.
    pub fn get(&self, bucket_id: BucketId) -> Result<Arc<StorageClient<C::Transport>>> {
        self.shards
            .read()
            .clients
            .get(&bucket_id)
            .cloned()
            .ok_or(Error::ClientNotFound(bucket_id))
    }

    /// Snapshot of all clients, in no particular order.
    pub fn get_all(&self) -> Vec<Arc<StorageClient<C::Transport>>> {
        self.shards.read().clients.values().cloned().collect()
    }

    pub fn bucket_ids(&self) -> Vec<BucketId> {
        self.shards.read().clients.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.shards.read().clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.read().clients.is_empty()
    }

    pub fn is_loaded(&self) -> bool {
        self.generation() > 0
    }

    pub fn generation(&self) -> u64 {
        self.shards.read().generation
    }
}
