// Trajscope Edit Dispatch
//
// Hover/edit handling for the editable geometry layer. The layer itself
// (hit-testing, dragging, drawing) is external; it reports events through
// `on_hover`/`on_edit` and reads `LayerProps` back.

mod dispatcher;
mod state;

pub use dispatcher::{EditDispatcher, EditOutcome};
pub use state::{EditorState, LayerProps};
