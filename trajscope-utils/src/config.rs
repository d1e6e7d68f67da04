// Trajscope Configuration
//
// Optional KDL config file. Every key is optional and falls back to the
// defaults in `consts`. CLI flags are applied on top by the binary.
//
// ```kdl
// endpoints {
//     trips "http://127.0.0.1:9999/randomsample"
//     point "http://127.0.0.1:9999/querypoint"
//     trajectory "http://127.0.0.1:9999/querytraj"
// }
// sample_size 500
// fps 60
// default_speed 10
// request_timeout 30
// view {
//     latitude 35.5
//     longitude 139.5
//     zoom 8
// }
// trail_length 1200
// ```

use kdl::{KdlDocument, KdlNode, KdlValue};
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::consts::*;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] kdl::KdlError),

    #[error("invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Backend endpoints queried over HTTP GET
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    /// Sample trajectories, `?n=<sample_size>`
    pub trips: String,
    /// Point query, `?lon=&lat=&id=`
    pub point: String,
    /// Trajectory query, `?lon=&lat=&id=`
    pub trajectory: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            trips: DEFAULT_TRIPS_URL.to_string(),
            point: DEFAULT_POINT_QUERY_URL.to_string(),
            trajectory: DEFAULT_TRAJ_QUERY_URL.to_string(),
        }
    }
}

/// Initial map camera, passed through to the rendering layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: f64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            latitude: DEFAULT_LATITUDE,
            longitude: DEFAULT_LONGITUDE,
            zoom: DEFAULT_ZOOM,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub endpoints: Endpoints,
    pub sample_size: usize,
    pub fps: u32,
    pub default_speed: u32,
    pub request_timeout_secs: u64,
    pub view: ViewState,
    pub trail_length: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            sample_size: DEFAULT_SAMPLE_SIZE,
            fps: DEFAULT_FPS,
            default_speed: DEFAULT_SPEED,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            view: ViewState::default(),
            trail_length: DEFAULT_TRAIL_LENGTH,
        }
    }
}

impl Config {
    /// Read and parse a KDL config file
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_kdl(&text)
    }

    /// Parse KDL text, filling missing keys with defaults
    pub fn from_kdl(text: &str) -> ConfigResult<Self> {
        let doc: KdlDocument = text.parse()?;
        let mut config = Config::default();

        for node in doc.nodes() {
            let key = node.name().value();
            match key {
                "endpoints" => {
                    if let Some(children) = node.children() {
                        config.apply_endpoints(children)?;
                    }
                }
                "view" => {
                    if let Some(children) = node.children() {
                        config.apply_view(children)?;
                    }
                }
                "sample_size" => config.sample_size = int_arg(node, key)?,
                "fps" => config.fps = int_arg(node, key)?,
                "default_speed" => config.default_speed = int_arg(node, key)?,
                "request_timeout" => config.request_timeout_secs = int_arg(node, key)?,
                "trail_length" => config.trail_length = int_arg(node, key)?,
                other => warn!("trajscope: ignoring unknown config key '{}'", other),
            }
        }

        config.validate()?;
        Ok(config)
    }

    fn apply_endpoints(&mut self, doc: &KdlDocument) -> ConfigResult<()> {
        for node in doc.nodes() {
            let key = node.name().value();
            match key {
                "trips" => self.endpoints.trips = string_arg(node, key)?,
                "point" => self.endpoints.point = string_arg(node, key)?,
                "trajectory" => self.endpoints.trajectory = string_arg(node, key)?,
                other => warn!("trajscope: ignoring unknown endpoint '{}'", other),
            }
        }
        Ok(())
    }

    fn apply_view(&mut self, doc: &KdlDocument) -> ConfigResult<()> {
        for node in doc.nodes() {
            let key = node.name().value();
            match key {
                "latitude" => self.view.latitude = float_arg(node, key)?,
                "longitude" => self.view.longitude = float_arg(node, key)?,
                "zoom" => self.view.zoom = float_arg(node, key)?,
                other => warn!("trajscope: ignoring unknown view key '{}'", other),
            }
        }
        Ok(())
    }

    /// Reject values the clock, scheduler or HTTP client cannot work with
    pub fn validate(&self) -> ConfigResult<()> {
        if self.fps == 0 {
            return Err(invalid("fps", "must be positive"));
        }
        if self.default_speed == 0 {
            return Err(invalid("default_speed", "must be positive"));
        }
        if self.request_timeout_secs == 0 {
            return Err(invalid("request_timeout", "must be positive"));
        }
        for (key, url) in [
            ("endpoints.trips", &self.endpoints.trips),
            ("endpoints.point", &self.endpoints.point),
            ("endpoints.trajectory", &self.endpoints.trajectory),
        ] {
            if url.trim().is_empty() {
                return Err(invalid(key, "must not be empty"));
            }
        }
        Ok(())
    }
}

fn invalid(key: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn first_arg<'a>(node: &'a KdlNode, key: &str) -> ConfigResult<&'a KdlValue> {
    node.entries()
        .iter()
        .find(|entry| entry.name().is_none())
        .map(|entry| entry.value())
        .ok_or_else(|| invalid(key, "missing value"))
}

fn string_arg(node: &KdlNode, key: &str) -> ConfigResult<String> {
    first_arg(node, key)?
        .as_string()
        .map(str::to_string)
        .ok_or_else(|| invalid(key, "expected a string"))
}

fn int_arg<T: TryFrom<i64>>(node: &KdlNode, key: &str) -> ConfigResult<T> {
    let value = first_arg(node, key)?
        .as_i64()
        .ok_or_else(|| invalid(key, "expected an integer"))?;
    T::try_from(value).map_err(|_| invalid(key, "out of range"))
}

fn float_arg(node: &KdlNode, key: &str) -> ConfigResult<f64> {
    let value = first_arg(node, key)?;
    value
        .as_f64()
        .or_else(|| value.as_i64().map(|i| i as f64))
        .ok_or_else(|| invalid(key, "expected a number"))
}
