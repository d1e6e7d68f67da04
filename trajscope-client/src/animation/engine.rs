// Trajscope Animation: engine trait and frame type
use std::time::{Duration, Instant};

/// State published to the rendering layer after one frame
#[derive(Debug, Clone, Copy)]
pub struct AnimationFrame {
    /// Time cursor after this frame
    pub time: u32,
    /// Speed the frame was advanced with (0 while paused)
    pub speed: u32,
    /// Frame timestamp for FPS calculation
    pub timestamp: Instant,
}

impl AnimationFrame {
    pub fn new(time: u32, speed: u32) -> Self {
        Self {
            time,
            speed,
            timestamp: Instant::now(),
        }
    }
}

/// Frame-based animation interface
pub trait AnimationEngine: Send + Sync {
    /// Advance by one display refresh and return the resulting frame.
    /// Returns None if the animation is complete (for finite animations)
    fn next_frame(&mut self) -> Option<AnimationFrame>;

    /// Get the target FPS for this animation
    fn target_fps(&self) -> u32;

    /// Get the frame duration based on target FPS
    fn frame_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.target_fps().max(1) as f64)
    }

    /// Reset animation to initial state
    fn reset(&mut self);
}
