// Trajscope server side
//
// Edit dispatching and the backend integrations it feeds.

pub mod dispatch;
pub mod integrations;

pub use dispatch::{EditDispatcher, EditOutcome, EditorState, LayerProps};
pub use integrations::{
    query_channel, AdapterConfig, HttpAdapter, IntegrationError, IntegrationResult, MockAdapter,
    QueryAdapter, QueryKind, QueryParams, QueryRequest, QueryWorker, TrajectoryData,
};
