// Trajscope Integration Layer - Query Types
//
// Outbound requests produced by the edit dispatcher and the trips payload
// returned at startup.

use serde::{Deserialize, Serialize};
use std::fmt;
use trajscope_utils::{Feature, Position};

/// Which backend query a request targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    /// `GET <point-query-endpoint>`
    Point,
    /// `GET <traj-query-endpoint>`
    Trajectory,
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKind::Point => write!(f, "point"),
            QueryKind::Trajectory => write!(f, "trajectory"),
        }
    }
}

/// Query string parameters shared by both queries
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueryParams {
    pub lon: f64,
    pub lat: f64,
    pub id: u64,
}

impl QueryParams {
    pub fn new(position: Position, id: u64) -> Self {
        Self {
            lon: position[0],
            lat: position[1],
            id,
        }
    }

    /// `lon`, `lat`, `id` in that order
    pub fn to_pairs(&self) -> [(&'static str, String); 3] {
        [
            ("lon", self.lon.to_string()),
            ("lat", self.lat.to_string()),
            ("id", self.id.to_string()),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub kind: QueryKind,
    pub params: QueryParams,
}

impl QueryRequest {
    pub fn point(params: QueryParams) -> Self {
        Self {
            kind: QueryKind::Point,
            params,
        }
    }

    pub fn trajectory(params: QueryParams) -> Self {
        Self {
            kind: QueryKind::Trajectory,
            params,
        }
    }

    /// Build a request for `feature`: its anchor position and its id.
    /// `None` if the feature has no anchor or no id yet.
    pub fn for_feature(kind: QueryKind, feature: &Feature) -> Option<Self> {
        let position = feature.geometry.anchor()?;
        let id = feature.properties.id?;
        Some(Self {
            kind,
            params: QueryParams::new(position, id),
        })
    }
}

impl fmt::Display for QueryRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} query (lon={}, lat={}, id={})",
            self.kind, self.params.lon, self.params.lat, self.params.id
        )
    }
}

/// Sample trajectories for the trips layer. Opaque to the core.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrajectoryData(pub serde_json::Value);

impl TrajectoryData {
    /// Number of trips when the payload is an array
    pub fn trip_count(&self) -> Option<usize> {
        self.0.as_array().map(Vec::len)
    }
}
