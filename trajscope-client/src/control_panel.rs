// Trajscope Control Panel
//
// Timeline slider and draw buttons. Dragging the slider pauses playback on
// every intermediate value; releasing it resumes once.

use serde::{Deserialize, Serialize};
use trajscope_utils::InteractionMode;

use crate::animation::AnimationClock;

/// Input coming from the panel widgets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PanelEvent {
    /// Slider moved while still held
    Scrub(u32),
    /// Slider released
    ScrubCommitted(u32),
    /// "Draw a Trajectory" button
    DrawTrajectory,
    /// "Draw a Point" button
    DrawPoint,
}

/// Read-only view of the clock for the slider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlSurface {
    pub time: u32,
    pub min_time: u32,
    pub max_time: u32,
    pub speed: u32,
    pub paused: bool,
}

impl ControlSurface {
    pub fn of(clock: &AnimationClock) -> Self {
        Self {
            time: clock.time(),
            min_time: 0,
            max_time: clock.loop_length(),
            speed: clock.speed(),
            paused: clock.is_paused(),
        }
    }
}

#[derive(Debug, Default)]
pub struct ControlPanel;

impl ControlPanel {
    pub fn new() -> Self {
        Self
    }

    /// Apply a panel event to the clock.
    ///
    /// # Returns
    ///
    /// The interaction mode requested by a draw button, if any. The caller
    /// forwards it to the edit dispatcher.
    pub fn handle(&self, clock: &mut AnimationClock, event: PanelEvent) -> Option<InteractionMode> {
        match event {
            PanelEvent::Scrub(value) => {
                clock.set_time(value);
                clock.pause();
                None
            }
            PanelEvent::ScrubCommitted(value) => {
                clock.set_time(value);
                clock.resume();
                None
            }
            PanelEvent::DrawTrajectory => Some(InteractionMode::DrawLine),
            PanelEvent::DrawPoint => Some(InteractionMode::DrawPoint),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrub_pauses_each_change() {
        let panel = ControlPanel::new();
        let mut clock = AnimationClock::default();

        for value in [100, 200, 300] {
            assert_eq!(panel.handle(&mut clock, PanelEvent::Scrub(value)), None);
            assert_eq!(clock.time(), value);
            assert!(clock.is_paused());
        }

        clock.tick();
        assert_eq!(clock.time(), 300);
    }

    #[test]
    fn test_commit_resumes() {
        let panel = ControlPanel::new();
        let mut clock = AnimationClock::default();

        panel.handle(&mut clock, PanelEvent::Scrub(4000));
        panel.handle(&mut clock, PanelEvent::ScrubCommitted(4100));

        assert_eq!(clock.time(), 4100);
        assert_eq!(clock.speed(), clock.default_speed());
        clock.tick();
        assert_eq!(clock.time(), 4110);
    }

    #[test]
    fn test_draw_buttons_request_modes() {
        let panel = ControlPanel::new();
        let mut clock = AnimationClock::default();

        assert_eq!(
            panel.handle(&mut clock, PanelEvent::DrawTrajectory),
            Some(InteractionMode::DrawLine)
        );
        assert_eq!(
            panel.handle(&mut clock, PanelEvent::DrawPoint),
            Some(InteractionMode::DrawPoint)
        );
        // Buttons never touch playback
        assert_eq!(clock.time(), 0);
        assert!(!clock.is_paused());
    }

    #[test]
    fn test_control_surface_bounds() {
        let mut clock = AnimationClock::default();
        clock.set_time(42);
        clock.pause();

        let surface = ControlSurface::of(&clock);
        assert_eq!(
            surface,
            ControlSurface {
                time: 42,
                min_time: 0,
                max_time: 86_400,
                speed: 0,
                paused: true,
            }
        );
    }
}
