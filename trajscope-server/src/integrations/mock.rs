// Trajscope Integration Layer - Mock Adapter
//
// Mock implementation of QueryAdapter for unit testing.
// Allows tests to control responses, simulate failures, and verify calls.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::adapter::QueryAdapter;
use super::error::{IntegrationError, IntegrationResult};
use super::query::{QueryKind, QueryParams, QueryRequest, TrajectoryData};

/// Mock backend for testing the dispatcher and worker without a server.
///
/// `MockAdapter` allows tests to:
/// - Control what `fetch_trips()` returns
/// - Make every query fail
/// - Verify which queries were issued, with which parameters
///
/// Clones share their recorded state, so a test can keep one handle while
/// the worker owns another.
///
/// # Example
///
/// ```ignore
/// let mock = MockAdapter::new("test");
/// mock.query_point(&QueryParams::new([139.5, 35.5], 2)).await?;
/// assert_eq!(mock.point_count(), 1);
/// ```
#[derive(Clone)]
pub struct MockAdapter {
    name: String,

    /// Response to return from `fetch_trips()`
    trips_response: Arc<Mutex<IntegrationResult<TrajectoryData>>>,

    /// Error returned by every query, if set
    query_error: Arc<Mutex<Option<IntegrationError>>>,

    /// Every query received, in arrival order
    queries: Arc<Mutex<Vec<QueryRequest>>>,

    /// Sample sizes passed to `fetch_trips()`
    trips_requests: Arc<Mutex<Vec<usize>>>,

    /// Count of failed queries
    failure_count: Arc<AtomicUsize>,
}

impl MockAdapter {
    /// Create a new mock adapter.
    ///
    /// # Arguments
    ///
    /// * `name` - Name for this mock (used in logs and errors)
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            trips_response: Arc::new(Mutex::new(Ok(TrajectoryData::default()))),
            query_error: Arc::new(Mutex::new(None)),
            queries: Arc::new(Mutex::new(Vec::new())),
            trips_requests: Arc::new(Mutex::new(Vec::new())),
            failure_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Set the result `fetch_trips()` will return.
    pub fn set_trips_response(&self, response: IntegrationResult<TrajectoryData>) {
        *self.trips_response.lock().unwrap() = response;
    }

    /// Make every query fail with `error` (or succeed again with `None`).
    pub fn set_query_error(&self, error: Option<IntegrationError>) {
        *self.query_error.lock().unwrap() = error;
    }

    /// All queries received so far.
    pub fn queries(&self) -> Vec<QueryRequest> {
        self.queries.lock().unwrap().clone()
    }

    /// Number of point queries received.
    pub fn point_count(&self) -> usize {
        self.count(QueryKind::Point)
    }

    /// Number of trajectory queries received.
    pub fn trajectory_count(&self) -> usize {
        self.count(QueryKind::Trajectory)
    }

    /// Number of queries that returned an error.
    pub fn failure_count(&self) -> usize {
        self.failure_count.load(Ordering::Relaxed)
    }

    /// Sample sizes requested via `fetch_trips()`.
    pub fn trips_requests(&self) -> Vec<usize> {
        self.trips_requests.lock().unwrap().clone()
    }

    /// Reset all recorded calls.
    pub fn reset(&self) {
        self.queries.lock().unwrap().clear();
        self.trips_requests.lock().unwrap().clear();
        self.failure_count.store(0, Ordering::Relaxed);
    }

    fn count(&self, kind: QueryKind) -> usize {
        self.queries
            .lock()
            .unwrap()
            .iter()
            .filter(|q| q.kind == kind)
            .count()
    }

    fn record(&self, request: QueryRequest) -> IntegrationResult<()> {
        self.queries.lock().unwrap().push(request);
        match self.query_error.lock().unwrap().clone() {
            Some(err) => {
                self.failure_count.fetch_add(1, Ordering::Relaxed);
                Err(err)
            }
            None => Ok(()),
        }
    }
}

#[async_trait]
impl QueryAdapter for MockAdapter {
    async fn fetch_trips(&self, sample_size: usize) -> IntegrationResult<TrajectoryData> {
        self.trips_requests.lock().unwrap().push(sample_size);
        self.trips_response.lock().unwrap().clone()
    }

    async fn query_point(&self, params: &QueryParams) -> IntegrationResult<()> {
        self.record(QueryRequest::point(*params))
    }

    async fn query_trajectory(&self, params: &QueryParams) -> IntegrationResult<()> {
        self.record(QueryRequest::trajectory(*params))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
