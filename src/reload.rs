use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, warn};

use crate::client::Connector;
use crate::registry::ShardedClientRegistry;
use crate::source::BucketSource;

/// Reloads `registry` every `every`, starting immediately.
///
/// A failed reload is logged and the registry keeps serving its previous
/// mapping until a later tick succeeds. Abort the returned handle to stop.
pub fn spawn_periodic_reload<S, C>(
    registry: Arc<ShardedClientRegistry<S, C>>,
    every: Duration,
) -> JoinHandle<()>
where
    S: BucketSource + 'static,
    C: Connector + 'static,
{
    tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match registry.load().await {
                Ok(()) => debug!(generation = registry.generation(), "periodic reload done"),
                Err(e) => warn!(error = %e, "periodic reload failed, keeping previous bucket clients"),
            }
        }
    })
}
