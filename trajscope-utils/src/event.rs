// Trajscope Interaction Events
//
// Events reported by the external interaction/rendering layer.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::geo::{Feature, FeatureCollection};

/// Pointer hovering over a pickable object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoverEvent {
    /// Index of the hovered feature in the collection, `-1` when nothing
    /// was picked
    pub index: i64,
    /// The picked object, absent when hovering empty map
    #[serde(default)]
    pub object: Option<Feature>,
}

impl HoverEvent {
    pub fn new(index: usize, object: Feature) -> Self {
        Self {
            index: index as i64,
            object: Some(object),
        }
    }

    /// Collection index of the picked feature, if any
    pub fn feature_index(&self) -> Option<usize> {
        usize::try_from(self.index).ok()
    }
}

/// Kind of change reported with an edit event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EditType {
    /// The user finished drawing a new feature
    AddFeature,
    /// The user released a dragged feature
    FinishMovePosition,
    /// Anything else (intermediate drags, vertex edits, ...)
    Other(String),
}

impl From<String> for EditType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "addFeature" => EditType::AddFeature,
            "finishMovePosition" => EditType::FinishMovePosition,
            _ => EditType::Other(s),
        }
    }
}

impl From<EditType> for String {
    fn from(edit_type: EditType) -> Self {
        edit_type.to_string()
    }
}

impl fmt::Display for EditType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditType::AddFeature => write!(f, "addFeature"),
            EditType::FinishMovePosition => write!(f, "finishMovePosition"),
            EditType::Other(s) => write!(f, "{}", s),
        }
    }
}

/// A completed edit: the full updated collection plus what changed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditEvent {
    #[serde(rename = "updatedData")]
    pub updated_data: FeatureCollection,
    #[serde(rename = "editType")]
    pub edit_type: EditType,
}

impl EditEvent {
    pub fn new(updated_data: FeatureCollection, edit_type: EditType) -> Self {
        Self {
            updated_data,
            edit_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_edit_type_parsing() {
        assert_eq!(EditType::from("addFeature".to_string()), EditType::AddFeature);
        assert_eq!(
            EditType::from("finishMovePosition".to_string()),
            EditType::FinishMovePosition
        );
        assert_eq!(
            EditType::from("movePosition".to_string()),
            EditType::Other("movePosition".to_string())
        );
    }

    #[test]
    fn test_parse_edit_event() {
        let event: EditEvent = serde_json::from_value(json!({
            "updatedData": {
                "type": "FeatureCollection",
                "features": [{
                    "type": "Feature",
                    "geometry": {"type": "LineString", "coordinates": [[139.0, 35.0], [139.1, 35.1]]},
                    "properties": {}
                }]
            },
            "editType": "addFeature"
        }))
        .unwrap();

        assert_eq!(event.edit_type, EditType::AddFeature);
        assert_eq!(event.updated_data.len(), 1);
    }

    #[test]
    fn test_edit_type_serializes_as_string() {
        let value = serde_json::to_value(EditType::Other("addTentativePosition".into())).unwrap();
        assert_eq!(value, json!("addTentativePosition"));
        let value = serde_json::to_value(EditType::FinishMovePosition).unwrap();
        assert_eq!(value, json!("finishMovePosition"));
    }

    #[test]
    fn test_hover_without_object() {
        let hover: HoverEvent = serde_json::from_value(json!({"index": -1})).unwrap();
        assert!(hover.object.is_none());
        assert_eq!(hover.feature_index(), None);
    }

    #[test]
    fn test_hover_feature_index() {
        let hover = HoverEvent::new(4, Feature::point(0.0, 0.0));
        assert_eq!(hover.feature_index(), Some(4));
    }
}
