// Trajscope Integration Layer - Adapter Trait
//
// Defines the QueryAdapter trait implemented by the HTTP backend client and
// by the mock used in tests.

use async_trait::async_trait;
use trajscope_utils::consts::DEFAULT_REQUEST_TIMEOUT_SECS;
use trajscope_utils::{Config, Endpoints};

use super::error::IntegrationResult;
use super::query::{QueryKind, QueryParams, QueryRequest, TrajectoryData};

/// Trait for the trajectory backend.
///
/// Queries are notifications: callers do not wait on them from the edit
/// path. The `QueryWorker` awaits them on its own tasks and only logs the
/// outcome.
///
/// # Example
///
/// ```ignore
/// let adapter = HttpAdapter::new(AdapterConfig::default())?;
/// let trips = adapter.fetch_trips(500).await?;
/// adapter.query_point(&QueryParams::new([139.5, 35.5], 0)).await?;
/// ```
#[async_trait]
pub trait QueryAdapter: Send + Sync {
    /// Fetch a batch of sample trajectories (`?n=<sample_size>`).
    ///
    /// # Returns
    ///
    /// * `Ok(TrajectoryData)` - The decoded JSON payload
    /// * `Err(IntegrationError)` - Transport failure, non-2xx status, or invalid JSON
    async fn fetch_trips(&self, sample_size: usize) -> IntegrationResult<TrajectoryData>;

    /// Notify the backend about a drawn or moved point.
    async fn query_point(&self, params: &QueryParams) -> IntegrationResult<()>;

    /// Notify the backend about a drawn or moved line.
    async fn query_trajectory(&self, params: &QueryParams) -> IntegrationResult<()>;

    /// Route a request to the matching query
    async fn query(&self, request: &QueryRequest) -> IntegrationResult<()> {
        match request.kind {
            QueryKind::Point => self.query_point(&request.params).await,
            QueryKind::Trajectory => self.query_trajectory(&request.params).await,
        }
    }

    /// Get the name of this adapter for logging and error messages.
    fn name(&self) -> &str;
}

/// Configuration for adapter behavior
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterConfig {
    /// Backend endpoint URLs
    pub endpoints: Endpoints,

    /// Timeout for a single request in seconds
    pub request_timeout_secs: u64,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl From<&Config> for AdapterConfig {
    fn from(config: &Config) -> Self {
        Self {
            endpoints: config.endpoints.clone(),
            request_timeout_secs: config.request_timeout_secs,
        }
    }
}
