// Trajscope Integration Layer - HTTP Adapter
//
// Talks to the trajectory backend with plain GET requests. Parameters go in
// the query string; query responses are drained and otherwise ignored.

use async_trait::async_trait;
use isahc::config::Configurable;
use isahc::{AsyncBody, AsyncReadResponseExt, HttpClient, Response};
use log::debug;
use std::time::Duration;
use url::Url;

use super::adapter::{AdapterConfig, QueryAdapter};
use super::error::{IntegrationError, IntegrationResult};
use super::query::{QueryParams, TrajectoryData};

/// Backend adapter over isahc.
///
/// One `HttpClient` is shared by all requests; isahc drives them on its own
/// agent thread, so requests from concurrent tasks run in parallel.
pub struct HttpAdapter {
    client: HttpClient,
    config: AdapterConfig,
}

impl HttpAdapter {
    pub fn new(config: AdapterConfig) -> IntegrationResult<Self> {
        // Reject bad endpoints up front rather than on the first query
        for endpoint in [
            &config.endpoints.trips,
            &config.endpoints.point,
            &config.endpoints.trajectory,
        ] {
            build_url(endpoint, std::iter::empty::<(&str, String)>())?;
        }

        let client = HttpClient::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| IntegrationError::Client(e.to_string()))?;

        Ok(Self { client, config })
    }

    async fn get(&self, url: &Url) -> IntegrationResult<Response<AsyncBody>> {
        let endpoint = endpoint_name(url);
        debug!("trajscope: GET {}", url);

        let response =
            self.client
                .get_async(url.as_str())
                .await
                .map_err(|e| IntegrationError::Request {
                    endpoint: endpoint.clone(),
                    message: e.to_string(),
                })?;

        let status = response.status();
        if !status.is_success() {
            return Err(IntegrationError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    async fn notify(&self, endpoint: &str, params: &QueryParams) -> IntegrationResult<()> {
        let url = build_url(endpoint, params.to_pairs())?;
        let mut response = self.get(&url).await?;
        response
            .consume()
            .await
            .map_err(|e| IntegrationError::Request {
                endpoint: endpoint_name(&url),
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl QueryAdapter for HttpAdapter {
    async fn fetch_trips(&self, sample_size: usize) -> IntegrationResult<TrajectoryData> {
        let url = build_url(
            &self.config.endpoints.trips,
            [("n", sample_size.to_string())],
        )?;
        let mut response = self.get(&url).await?;
        let body = response
            .text()
            .await
            .map_err(|e| IntegrationError::Request {
                endpoint: endpoint_name(&url),
                message: e.to_string(),
            })?;

        serde_json::from_str(&body)
            .map(TrajectoryData)
            .map_err(|e| IntegrationError::Parse {
                endpoint: endpoint_name(&url),
                message: e.to_string(),
            })
    }

    async fn query_point(&self, params: &QueryParams) -> IntegrationResult<()> {
        self.notify(&self.config.endpoints.point, params).await
    }

    async fn query_trajectory(&self, params: &QueryParams) -> IntegrationResult<()> {
        self.notify(&self.config.endpoints.trajectory, params).await
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// Endpoint URL with `pairs` appended as query parameters
pub fn build_url<I, K, V>(endpoint: &str, pairs: I) -> IntegrationResult<Url>
where
    I: IntoIterator,
    I::Item: std::borrow::Borrow<(K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let url = Url::parse_with_params(endpoint, pairs).map_err(|e| IntegrationError::InvalidUrl {
        url: endpoint.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(IntegrationError::InvalidUrl {
            url: endpoint.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}

/// URL without its query string, for log and error messages
fn endpoint_name(url: &Url) -> String {
    let mut bare = url.clone();
    bare.set_query(None);
    bare.to_string()
}
