// Trajscope Animation Clock
// Time cursor over a day-long loop, advanced once per display refresh.

use std::num::NonZeroU32;

use log::debug;
use trajscope_utils::consts::{DEFAULT_FPS, DEFAULT_SPEED, LOOP_LENGTH};

use super::engine::{AnimationEngine, AnimationFrame};

/// Playback clock driving the trips layer.
///
/// `time` always stays in `[0, loop_length)`. Speed is the number of
/// simulated seconds added per tick; zero means paused.
#[derive(Debug, Clone)]
pub struct AnimationClock {
    time: u32,
    speed: u32,
    loop_length: NonZeroU32,
    default_speed: NonZeroU32,
    fps: u32,
}

impl AnimationClock {
    pub fn new(loop_length: NonZeroU32, default_speed: NonZeroU32) -> Self {
        Self {
            time: 0,
            speed: default_speed.get(),
            loop_length,
            default_speed,
            fps: DEFAULT_FPS,
        }
    }

    /// Set custom FPS (the rate the scheduler is asked to tick at)
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    pub fn time(&self) -> u32 {
        self.time
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    pub fn loop_length(&self) -> u32 {
        self.loop_length.get()
    }

    pub fn default_speed(&self) -> u32 {
        self.default_speed.get()
    }

    pub fn is_paused(&self) -> bool {
        self.speed == 0
    }

    /// Advance by `speed`, wrapping at the loop length
    pub fn tick(&mut self) {
        self.time = self.wrap(u64::from(self.time) + u64::from(self.speed));
    }

    pub fn pause(&mut self) {
        self.speed = 0;
    }

    pub fn resume(&mut self) {
        self.speed = self.default_speed.get();
    }

    /// Jump to `time` (timeline scrubbing). Speed is left alone.
    pub fn set_time(&mut self, time: u32) {
        self.time = self.wrap(u64::from(time));
        debug!("trajscope: clock set to {}", self.time);
    }

    /// Explicit speed, e.g. for fast-forward. `0` pauses.
    pub fn set_speed(&mut self, speed: u32) {
        self.speed = speed;
    }

    fn wrap(&self, value: u64) -> u32 {
        // result < loop_length <= u32::MAX
        (value % u64::from(self.loop_length.get())) as u32
    }
}

impl Default for AnimationClock {
    fn default() -> Self {
        let loop_length = NonZeroU32::new(LOOP_LENGTH).unwrap_or(NonZeroU32::MIN);
        let default_speed = NonZeroU32::new(DEFAULT_SPEED).unwrap_or(NonZeroU32::MIN);
        Self::new(loop_length, default_speed)
    }
}

impl AnimationEngine for AnimationClock {
    fn next_frame(&mut self) -> Option<AnimationFrame> {
        self.tick();
        Some(AnimationFrame::new(self.time, self.speed))
    }

    fn target_fps(&self) -> u32 {
        self.fps
    }

    fn reset(&mut self) {
        self.time = 0;
        self.speed = self.default_speed.get();
    }
}
