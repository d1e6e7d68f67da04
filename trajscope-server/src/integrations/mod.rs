// Trajscope Integration Layer
//
// Outbound calls to the trajectory backend:
//
// - `GET <trips>?n=<sample_size>` once at startup
// - `GET <point>?lon=&lat=&id=` for drawn or moved points
// - `GET <trajectory>?lon=&lat=&id=` for drawn or moved lines
//
// # Architecture
//
// ```text
// EditDispatcher
//         │  QueryRequest (unbounded queue, never blocks)
//         ▼
// ┌───────────────────┐
// │    QueryWorker    │  ← one task per request, failures logged
// └───────────────────┘
//         │
//         ▼
// ┌───────────────────┐
// │   QueryAdapter    │  ← HttpAdapter (isahc) or MockAdapter
// └───────────────────┘
// ```

mod adapter;
mod error;
mod http;
mod mock;
mod query;
mod worker;

// Re-export public API
pub use adapter::{AdapterConfig, QueryAdapter};
pub use error::{IntegrationError, IntegrationResult};
pub use http::{build_url, HttpAdapter};
pub use mock::MockAdapter;
pub use query::{QueryKind, QueryParams, QueryRequest, TrajectoryData};
pub use worker::{query_channel, QuerySender, QueryWorker};
