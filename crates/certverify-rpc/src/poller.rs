//! Block Poller: periodic block height fetches for a display counter.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::gateway::ContractGateway;

/// Default delay between block height fetches.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Spawns the polling task.
pub struct BlockPoller;

impl BlockPoller {
    /// Fetch immediately, then every `interval`, until the handle is dropped.
    ///
    /// Fetches run one after another on a single task. A failed fetch
    /// publishes 0, which the UI shows as "syncing".
    pub fn spawn(gateway: Arc<ContractGateway>, rpc_url: String, interval: Duration) -> PollerHandle {
        let (tx, rx) = watch::channel(0u64);
        let url = rpc_url.clone();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let height = gateway.current_block_number(&url).await;
                debug!(url = %url, height, "polled block height");
                if tx.send(height).is_err() {
                    break;
                }
            }
        });

        PollerHandle { rpc_url, rx, task }
    }
}

/// A running poll. Dropping it stops the task and releases the timer.
pub struct PollerHandle {
    rpc_url: String,
    rx: watch::Receiver<u64>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// The endpoint being polled.
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// Most recently published height (0 before the first fetch completes).
    pub fn latest(&self) -> u64 {
        *self.rx.borrow()
    }

    /// A receiver that observes every published height.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.rx.clone()
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
