// Trajscope Editor State
//
// Everything the edit dispatcher owns: current interaction mode, the
// feature collection, the selection and the id counter.

use serde::Serialize;
use trajscope_utils::{ColorPicker, FeatureCollection, InteractionMode};

#[derive(Debug, Clone)]
pub struct EditorState {
    pub(crate) mode: InteractionMode,
    pub(crate) features: FeatureCollection,
    pub(crate) selected: Vec<usize>,
    pub(crate) next_id: u64,
    pub(crate) colors: ColorPicker,
}

impl EditorState {
    pub fn new() -> Self {
        Self::with_colors(ColorPicker::new())
    }

    pub fn with_colors(colors: ColorPicker) -> Self {
        Self {
            mode: InteractionMode::View,
            features: FeatureCollection::new(),
            selected: Vec::new(),
            next_id: 0,
            colors,
        }
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn features(&self) -> &FeatureCollection {
        &self.features
    }

    pub fn selected_indexes(&self) -> &[usize] {
        &self.selected
    }

    /// Id the next drawn feature will get
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Hand out the next id (post-increment)
    pub(crate) fn take_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only projection handed to the editable geometry layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayerProps<'a> {
    pub data: &'a FeatureCollection,
    pub mode: InteractionMode,
    pub selected_indexes: &'a [usize],
}

impl<'a> LayerProps<'a> {
    pub fn of(state: &'a EditorState) -> Self {
        Self {
            data: &state.features,
            mode: state.mode,
            selected_indexes: &state.selected,
        }
    }
}
