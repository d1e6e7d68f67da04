// Trajscope client side
//
// Everything that drives playback: the animation clock, the frame timer,
// and the control panel (timeline slider, draw buttons).

pub mod animation;
pub mod control_panel;

pub use animation::{AnimationClock, AnimationEngine, FrameScheduler, FrameTick, FrameTicks};
pub use control_panel::{ControlPanel, ControlSurface, PanelEvent};
