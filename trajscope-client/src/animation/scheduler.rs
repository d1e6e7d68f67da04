// Trajscope Frame Scheduler
//
// Explicit "run before the next frame" registration for a non-browser
// target. A timer task produces `FrameTick`s on a capacity-1 channel:
// the next tick is only armed after the previous one was taken, so at
// most one tick is ever pending. Cancelling (or dropping) the scheduler
// revokes the registration: a tick already buffered is discarded and the
// receiver yields `None` from then on.

use std::time::Duration;

use log::{debug, info};
use thiserror::Error;
use tokio::sync::mpsc::{self, Receiver};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("frame duration must be greater than zero")]
    ZeroFrameDuration,
}

/// One display refresh
#[derive(Debug, Clone, Copy)]
pub struct FrameTick {
    /// Sequence number, starting at 0
    pub seq: u64,
}

/// Receiving side of a `FrameScheduler`
pub struct FrameTicks {
    rx: Receiver<FrameTick>,
    cancel: CancellationToken,
}

impl FrameTicks {
    /// Wait for the next tick. `None` once the scheduler is cancelled or
    /// dropped, even if a tick was already waiting.
    pub async fn recv(&mut self) -> Option<FrameTick> {
        if self.cancel.is_cancelled() {
            return None;
        }
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            tick = self.rx.recv() => tick,
        }
    }
}

/// Handle to a running frame timer.
///
/// Must be created inside a tokio runtime.
pub struct FrameScheduler {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl FrameScheduler {
    /// Start ticking every `frame_duration`.
    ///
    /// # Returns
    ///
    /// The scheduler handle and the receiver the ticks arrive on.
    pub fn start(frame_duration: Duration) -> Result<(Self, FrameTicks), SchedulerError> {
        if frame_duration.is_zero() {
            return Err(SchedulerError::ZeroFrameDuration);
        }

        // capacity 1: a single pending tick at any time
        let (tick_tx, tick_rx) = mpsc::channel(1);
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let task = tokio::spawn(async move {
            let mut timer = interval(frame_duration);
            timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut seq = 0u64;

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = timer.tick() => {}
                }

                // Wait for the consumer to take the previous tick before
                // registering the next one.
                let permit = tokio::select! {
                    _ = token.cancelled() => break,
                    permit = tick_tx.reserve() => match permit {
                        Ok(permit) => permit,
                        Err(_) => break,
                    },
                };
                permit.send(FrameTick { seq });
                seq += 1;
            }
            debug!("trajscope: frame timer stopped after {} ticks", seq);
        });

        info!(
            "trajscope: frame scheduler started ({:?} per frame)",
            frame_duration
        );

        let ticks = FrameTicks {
            rx: tick_rx,
            cancel: cancel.clone(),
        };
        Ok((
            Self {
                cancel,
                task: Some(task),
            },
            ticks,
        ))
    }

    /// Start at `fps` frames per second
    pub fn start_at_fps(fps: u32) -> Result<(Self, FrameTicks), SchedulerError> {
        if fps == 0 {
            return Err(SchedulerError::ZeroFrameDuration);
        }
        Self::start(Duration::from_secs_f64(1.0 / fps as f64))
    }

    /// Revoke the pending registration. Idempotent.
    pub fn cancel(&mut self) {
        if !self.cancel.is_cancelled() {
            self.cancel.cancel();
            info!("trajscope: frame scheduler cancelled");
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Cancel and wait for the timer task to exit
    pub async fn shutdown(mut self) {
        self.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for FrameScheduler {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
