//! Fixed values for playback, sampling and the default backend.

/// Length of the playback loop in simulated seconds (one day).
pub const LOOP_LENGTH: u32 = 86_400;

/// Simulated seconds advanced per frame while playing.
pub const DEFAULT_SPEED: u32 = 10;

/// Frames per second requested from the frame scheduler.
pub const DEFAULT_FPS: u32 = 60;

/// Number of trajectories sampled from the backend at startup.
pub const DEFAULT_SAMPLE_SIZE: usize = 500;

/// Timeout for a single backend request in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Seconds of trail drawn behind each moving trip.
pub const DEFAULT_TRAIL_LENGTH: u32 = 1200;

pub const DEFAULT_TRIPS_URL: &str = "http://127.0.0.1:9999/randomsample";
pub const DEFAULT_POINT_QUERY_URL: &str = "http://127.0.0.1:9999/querypoint";
pub const DEFAULT_TRAJ_QUERY_URL: &str = "http://127.0.0.1:9999/querytraj";

/// Initial map center (Tokyo area) and zoom.
pub const DEFAULT_LATITUDE: f64 = 35.5;
pub const DEFAULT_LONGITUDE: f64 = 139.5;
pub const DEFAULT_ZOOM: f64 = 8.0;

/// Saturation and value used for feature colors.
pub const FEATURE_COLOR_SATURATION: f64 = 0.8;
pub const FEATURE_COLOR_VALUE: f64 = 0.99;
