// Trajscope Integration Layer - Query Worker
//
// Drains the query queue filled by the edit dispatcher. Every request runs
// on its own task, so queries are concurrent and their completion order is
// unspecified. Failures are logged and dropped; nothing is retried.

use log::{debug, info, warn};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::{JoinHandle, JoinSet};

use super::adapter::QueryAdapter;
use super::query::QueryRequest;

/// Sending half handed to the dispatcher
pub type QuerySender = UnboundedSender<QueryRequest>;

/// Create the query queue.
///
/// Unbounded so that enqueueing from the edit path never waits.
pub fn query_channel() -> (QuerySender, UnboundedReceiver<QueryRequest>) {
    mpsc::unbounded_channel()
}

pub struct QueryWorker {
    adapter: Arc<dyn QueryAdapter>,
    queue: UnboundedReceiver<QueryRequest>,
}

impl QueryWorker {
    pub fn new(adapter: Arc<dyn QueryAdapter>, queue: UnboundedReceiver<QueryRequest>) -> Self {
        Self { adapter, queue }
    }

    /// Run on a background task until every sender is dropped
    pub fn spawn(self) -> JoinHandle<usize> {
        tokio::spawn(self.run())
    }

    /// Process requests until the queue closes, then wait for the ones
    /// still in flight.
    ///
    /// # Returns
    ///
    /// The number of requests dispatched.
    pub async fn run(mut self) -> usize {
        let mut in_flight = JoinSet::new();
        let mut dispatched = 0usize;
        info!("trajscope: query worker started ({})", self.adapter.name());

        loop {
            tokio::select! {
                request = self.queue.recv() => match request {
                    Some(request) => {
                        let adapter = Arc::clone(&self.adapter);
                        in_flight.spawn(async move {
                            match adapter.query(&request).await {
                                Ok(()) => debug!("trajscope: {} sent", request),
                                Err(e) => warn!("trajscope: {} failed: {}", request, e),
                            }
                        });
                        dispatched += 1;
                    }
                    None => break,
                },
                Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                    if let Err(e) = joined {
                        warn!("trajscope: query task aborted: {}", e);
                    }
                }
            }
        }

        while let Some(joined) = in_flight.join_next().await {
            if let Err(e) = joined {
                warn!("trajscope: query task aborted: {}", e);
            }
        }

        info!("trajscope: query worker stopped after {} queries", dispatched);
        dispatched
    }
}
