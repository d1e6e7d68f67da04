// Trajscope Animation
// Playback clock and the frame timer that drives it

pub mod clock;
pub mod engine;
pub mod scheduler;

pub use clock::AnimationClock;
pub use engine::{AnimationEngine, AnimationFrame};
pub use scheduler::{FrameScheduler, FrameTick, FrameTicks, SchedulerError};
