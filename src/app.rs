// Application state and event loop.
//
// `AppState` is the single owner of the clock, the edit dispatcher and the
// trips payload. Everything mutates it from one task: frame ticks, the
// startup trips fetch, and commands read from the interaction layer.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::Serialize;
use std::num::NonZeroU32;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use trajscope_client::animation::{AnimationClock, AnimationEngine, AnimationFrame};
use trajscope_client::{ControlPanel, ControlSurface, FrameScheduler, PanelEvent};
use trajscope_server::integrations::{query_channel, QueryAdapter, QueryWorker};
use trajscope_server::{EditDispatcher, TrajectoryData};
use trajscope_utils::consts::LOOP_LENGTH;
use trajscope_utils::Config;

use crate::protocol::{parse_command, Command, Output, Snapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct AppState {
    clock: AnimationClock,
    panel: ControlPanel,
    dispatcher: EditDispatcher,
    trips: Option<TrajectoryData>,
}

impl AppState {
    pub fn new(clock: AnimationClock, dispatcher: EditDispatcher) -> Self {
        Self {
            clock,
            panel: ControlPanel::new(),
            dispatcher,
            trips: None,
        }
    }

    pub fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    pub fn dispatcher(&self) -> &EditDispatcher {
        &self.dispatcher
    }

    pub fn set_trips(&mut self, trips: TrajectoryData) {
        self.trips = Some(trips);
    }

    /// One display refresh
    pub fn tick(&mut self) -> AnimationFrame {
        self.clock
            .next_frame()
            .unwrap_or_else(|| AnimationFrame::new(self.clock.time(), self.clock.speed()))
    }

    /// Apply one command from the interaction layer
    pub fn apply(&mut self, command: Command) -> Flow {
        match command {
            Command::Hover { event } => {
                if self.dispatcher.on_hover(event.as_ref()) {
                    debug!(
                        "trajscope: selected {:?}",
                        self.dispatcher.state().selected_indexes()
                    );
                }
            }
            Command::Edit { event } => {
                let outcome = self.dispatcher.on_edit(event);
                if let Some(query) = outcome.query {
                    debug!("trajscope: edit queued {}", query);
                }
            }
            Command::Scrub { value } => self.panel_event(PanelEvent::Scrub(value)),
            Command::ScrubCommitted { value } => {
                self.panel_event(PanelEvent::ScrubCommitted(value))
            }
            Command::DrawPoint => self.panel_event(PanelEvent::DrawPoint),
            Command::DrawTrajectory => self.panel_event(PanelEvent::DrawTrajectory),
            Command::SetMode { mode } => self.dispatcher.set_mode(mode),
            Command::Pause => self.clock.pause(),
            Command::Resume => self.clock.resume(),
            Command::Snapshot => {}
            Command::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    fn panel_event(&mut self, event: PanelEvent) {
        if let Some(mode) = self.panel.handle(&mut self.clock, event) {
            self.dispatcher.set_mode(mode);
        }
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        let surface = ControlSurface::of(&self.clock);
        let layer = self.dispatcher.layer_props();
        Snapshot {
            time: surface.time,
            min_time: surface.min_time,
            max_time: surface.max_time,
            speed: surface.speed,
            paused: surface.paused,
            mode: layer.mode,
            selected_indexes: layer.selected_indexes,
            features: layer.data,
            trips_loaded: self.trips.is_some(),
        }
    }
}

/// Build the playback clock from config
pub fn clock_from_config(config: &Config) -> Result<AnimationClock> {
    let loop_length = NonZeroU32::new(LOOP_LENGTH).context("loop length must be positive")?;
    let default_speed =
        NonZeroU32::new(config.default_speed).context("default_speed must be positive")?;
    Ok(AnimationClock::new(loop_length, default_speed).with_fps(config.fps))
}

pub struct RunOptions {
    /// Write a frame line on every tick
    pub emit_frames: bool,
}

/// Run until the input ends or a `quit` command arrives.
///
/// Startup trips fetch and backend queries never block the loop; their
/// failures are logged and playback carries on.
pub async fn run<R, W>(
    config: &Config,
    options: &RunOptions,
    adapter: Arc<dyn QueryAdapter>,
    input: R,
    mut output: W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let clock = clock_from_config(config)?;
    let (scheduler, mut ticks) = FrameScheduler::start_at_fps(config.fps)?;

    let (query_tx, query_rx) = query_channel();
    let worker = QueryWorker::new(Arc::clone(&adapter), query_rx).spawn();

    let trips_adapter = Arc::clone(&adapter);
    let sample_size = config.sample_size;
    let mut trips_task = tokio::spawn(async move { trips_adapter.fetch_trips(sample_size).await });
    let mut trips_pending = true;

    let mut state = AppState::new(clock, EditDispatcher::new(query_tx));

    // Output and input failures end the loop but still go through teardown
    let result = async {
        write_line(
            &mut output,
            &Output::View {
                latitude: config.view.latitude,
                longitude: config.view.longitude,
                zoom: config.view.zoom,
                trail_length: config.trail_length,
            },
        )
        .await?;

        let mut lines = input.lines();
        loop {
            tokio::select! {
                Some(_) = ticks.recv() => {
                    let frame = state.tick();
                    if options.emit_frames {
                        write_line(&mut output, &Output::Frame { time: frame.time }).await?;
                    }
                }
                joined = &mut trips_task, if trips_pending => {
                    trips_pending = false;
                    match joined {
                        Ok(Ok(trips)) => {
                            match trips.trip_count() {
                                Some(count) => info!("trajscope: loaded {} trips", count),
                                None => info!("trajscope: loaded trips payload"),
                            }
                            write_line(&mut output, &Output::Trips { data: &trips }).await?;
                            state.set_trips(trips);
                        }
                        Ok(Err(e)) => warn!("trajscope: could not load trips: {}", e),
                        Err(e) => warn!("trajscope: trips fetch aborted: {}", e),
                    }
                }
                line = lines.next_line() => {
                    let Some(line) = line.context("reading commands")? else {
                        info!("trajscope: input closed");
                        break;
                    };
                    match parse_command(&line) {
                        Ok(Some(command)) => {
                            if state.apply(command) == Flow::Quit {
                                break;
                            }
                            write_line(&mut output, &Output::State(state.snapshot())).await?;
                        }
                        Ok(None) => {}
                        Err(e) => warn!("trajscope: skipping malformed command: {}", e),
                    }
                }
            }
        }
        Ok::<(), anyhow::Error>(())
    }
    .await;

    scheduler.shutdown().await;
    if trips_pending {
        trips_task.abort();
    }

    // Dropping the dispatcher closes the query queue; the worker finishes
    // whatever is still in flight.
    drop(state);
    match worker.await {
        Ok(dispatched) => debug!("trajscope: {} queries dispatched", dispatched),
        Err(e) => warn!("trajscope: query worker failed: {}", e),
    }
    result
}

async fn write_line<W, T>(output: &mut W, value: &T) -> Result<()>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let mut line = serde_json::to_vec(value)?;
    line.push(b'\n');
    output.write_all(&line).await.context("writing output")?;
    output.flush().await.context("writing output")?;
    Ok(())
}
