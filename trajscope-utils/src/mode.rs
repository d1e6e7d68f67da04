// Trajscope Interaction Modes
//
// Which drawing/editing behavior the interaction layer performs next.
// Transient UI state, never persisted.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Interaction mode handed to the editable geometry layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionMode {
    /// Pan and hover only
    #[default]
    View,
    /// Drag the selected feature
    Modify,
    /// Next click adds a point
    DrawPoint,
    /// Next clicks add a line string
    DrawLine,
}

impl InteractionMode {
    /// True for the modes that create new geometry
    pub fn is_drawing(&self) -> bool {
        matches!(self, InteractionMode::DrawPoint | InteractionMode::DrawLine)
    }
}

impl fmt::Display for InteractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InteractionMode::View => write!(f, "view"),
            InteractionMode::Modify => write!(f, "modify"),
            InteractionMode::DrawPoint => write!(f, "draw_point"),
            InteractionMode::DrawLine => write!(f, "draw_line"),
        }
    }
}
