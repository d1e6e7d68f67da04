// Line protocol with the rendering/interaction layer.
//
// stdin: one JSON command per line, tagged by `type`.
// stdout: one JSON output per line, tagged by `type`.

use serde::{Deserialize, Serialize};
use trajscope_server::TrajectoryData;
use trajscope_utils::{EditEvent, FeatureCollection, HoverEvent, InteractionMode};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Pointer moved; `event` absent over empty map
    Hover {
        #[serde(default)]
        event: Option<HoverEvent>,
    },
    Edit {
        event: EditEvent,
    },
    /// Timeline slider dragged
    Scrub {
        value: u32,
    },
    /// Timeline slider released
    ScrubCommitted {
        value: u32,
    },
    DrawPoint,
    DrawTrajectory,
    SetMode {
        mode: InteractionMode,
    },
    Pause,
    Resume,
    Snapshot,
    Quit,
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, serde_json::Error> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(line).map(Some)
}

/// Application state as seen by the rendering layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot<'a> {
    pub time: u32,
    pub min_time: u32,
    pub max_time: u32,
    pub speed: u32,
    pub paused: bool,
    pub mode: InteractionMode,
    pub selected_indexes: &'a [usize],
    pub features: &'a FeatureCollection,
    pub trips_loaded: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Output<'a> {
    /// Written once at startup: initial camera and trail length
    View {
        latitude: f64,
        longitude: f64,
        zoom: f64,
        trail_length: u32,
    },
    /// Sample trajectories, once they arrive
    Trips { data: &'a TrajectoryData },
    /// Clock position after a tick (only with `--emit-frames`)
    Frame { time: u32 },
    /// Written after every applied command
    State(Snapshot<'a>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_command(r#"{"type":"pause"}"#).unwrap(), Some(Command::Pause));
        assert_eq!(
            parse_command(r#"{"type":"scrub","value":300}"#).unwrap(),
            Some(Command::Scrub { value: 300 })
        );
        assert_eq!(
            parse_command(r#"{"type":"set_mode","mode":"draw_line"}"#).unwrap(),
            Some(Command::SetMode {
                mode: InteractionMode::DrawLine
            })
        );
        assert_eq!(parse_command("   ").unwrap(), None);
    }

    #[test]
    fn test_parse_hover() {
        let command = parse_command(
            r#"{"type":"hover","event":{"index":0,"object":{"type":"Feature","geometry":{"type":"LineString","coordinates":[[0,0],[1,1]]},"properties":{"id":0}}}}"#,
        )
        .unwrap()
        .unwrap();
        match command {
            Command::Hover { event: Some(event) } => assert_eq!(event.feature_index(), Some(0)),
            other => panic!("unexpected {:?}", other),
        }

        assert_eq!(
            parse_command(r#"{"type":"hover"}"#).unwrap(),
            Some(Command::Hover { event: None })
        );
    }

    #[test]
    fn test_parse_edit() {
        let command = parse_command(
            r#"{"type":"edit","event":{"editType":"addFeature","updatedData":{"type":"FeatureCollection","features":[{"type":"Feature","geometry":{"type":"Point","coordinates":[139.5,35.5]},"properties":{}}]}}}"#,
        )
        .unwrap();
        assert!(matches!(command, Some(Command::Edit { .. })));
    }

    #[test]
    fn test_malformed_commands() {
        assert!(parse_command("not json").is_err());
        assert!(parse_command(r#"{"type":"explode"}"#).is_err());
        assert!(parse_command(r#"{"type":"scrub","value":-3}"#).is_err());
    }

    #[test]
    fn test_output_tags() {
        let frame = serde_json::to_string(&Output::Frame { time: 7 }).unwrap();
        assert_eq!(frame, r#"{"type":"frame","time":7}"#);

        let view = serde_json::to_value(Output::View {
            latitude: 35.5,
            longitude: 139.5,
            zoom: 8.0,
            trail_length: 1200,
        })
        .unwrap();
        assert_eq!(view["type"], "view");
        assert_eq!(view["trail_length"], 1200);
    }
}
