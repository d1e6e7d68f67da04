// Trajscope shared types
//
// Data model, constants and configuration shared by the client (animation)
// and server (edit dispatch, backend queries) crates.

pub mod color;
pub mod config;
pub mod consts;
pub mod event;
pub mod geo;
pub mod mode;

pub use color::{ColorPicker, Rgb};
pub use config::{Config, ConfigError, Endpoints, ViewState};
pub use event::{EditEvent, EditType, HoverEvent};
pub use geo::{Feature, FeatureCollection, FeatureProperties, Geometry, GeometryKind, Position};
pub use mode::InteractionMode;
