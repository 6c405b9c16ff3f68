use crate::cube::{Cube, CubeTarget};
use blocky_common::Transform;
use blocky_kernel::{
    AnimationConfig, AppState, Config, FrameClock, SceneArena, compose_blocky_animal,
    update_animation_angles,
};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Numerator of the fps readout. Kept at 10000 for compatibility with the
/// established telemetry format, so the figure is ten times real fps.
pub const FPS_NUMERATOR_MS: f64 = 10_000.0;

/// Per-frame timing readout, rendered as `"<ms> ms: fps: <fps>"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTelemetry {
    pub duration: Duration,
}

impl FrameTelemetry {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    /// Whole milliseconds, floored.
    pub fn duration_ms(&self) -> u64 {
        self.duration.as_millis() as u64
    }

    /// `floor(10000 / duration_ms)` over the unrounded duration. `None` for a
    /// zero-length frame.
    pub fn fps(&self) -> Option<u64> {
        let ms = self.duration.as_nanos() as f64 / 1_000_000.0;
        (ms > 0.0).then(|| (FPS_NUMERATOR_MS / ms).floor() as u64)
    }
}

impl fmt::Display for FrameTelemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.fps() {
            Some(fps) => write!(f, "{} ms: fps: {}", self.duration_ms(), fps),
            None => write!(f, "{} ms: fps: inf", self.duration_ms()),
        }
    }
}

/// Clear, upload the global rotation, compose the animal into `arena` and
/// draw every node in order. Returns the number of cubes drawn.
///
/// This is also the immediate re-render path for UI input between ticks.
/// A composition error is logged; whatever was composed before it is drawn.
pub fn render_scene(
    state: &AppState,
    arena: &mut SceneArena,
    target: &mut impl CubeTarget,
) -> usize {
    target.clear();

    let mut global = Transform::IDENTITY;
    global.rotate(state.global_angle, 0.0, 1.0, 0.0);
    target.set_global_rotation(&global);

    if let Err(e) = compose_blocky_animal(state, arena) {
        tracing::warn!("scene composition incomplete: {e}");
    }

    arena
        .nodes()
        .iter()
        .filter(|node| Cube::from_node(node).render(target))
        .count()
}

/// Outcome of one scheduler iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub frame_index: u64,
    /// Seconds since the scheduler started, as fed to the oscillators.
    pub seconds: f64,
    pub cubes_drawn: usize,
    pub telemetry: FrameTelemetry,
}

/// What the host wants after a frame has been published.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameSignal {
    Continue,
    Terminate,
}

/// Why [`FrameScheduler::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Cancelled { frames: u64 },
    Terminated { frames: u64 },
}

/// Single-threaded cancellation flag shared between the loop and its host.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// The environment a [`FrameScheduler::run`] loop renders into.
pub trait FrameHost {
    type Target: CubeTarget;

    fn target(&mut self) -> &mut Self::Target;

    /// Hand the finished frame to the display. Called before telemetry.
    fn present(&mut self) {}

    /// Text sink for the timing readout.
    fn publish_telemetry(&mut self, report: &FrameReport);

    /// Block until the next frame is due, or ask the loop to stop.
    fn wait_for_next_frame(&mut self) -> FrameSignal;
}

/// Per-frame driver: time → animation → render → telemetry.
///
/// Frames never overlap and never queue; a slow frame simply delays the next.
#[derive(Debug)]
pub struct FrameScheduler {
    clock: FrameClock,
    animation: AnimationConfig,
    arena: SceneArena,
    cancel: CancelToken,
    frame_index: u64,
}

impl FrameScheduler {
    pub fn new(config: &Config) -> Self {
        Self::with_clock(config, FrameClock::new())
    }

    pub fn with_clock(config: &Config, clock: FrameClock) -> Self {
        Self {
            clock,
            animation: config.animation,
            arena: SceneArena::new(config.scene_capacity),
            cancel: CancelToken::new(),
            frame_index: 0,
        }
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// The scene as composed by the most recent frame.
    pub fn arena(&self) -> &SceneArena {
        &self.arena
    }

    pub fn frames(&self) -> u64 {
        self.frame_index
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Run one iteration with `now` as the frame timestamp.
    pub fn frame(
        &mut self,
        state: &mut AppState,
        target: &mut impl CubeTarget,
        now: Instant,
    ) -> FrameReport {
        let seconds = self.clock.seconds_at(now);
        update_animation_angles(state, &self.animation, seconds);

        let started = Instant::now();
        let cubes_drawn = render_scene(state, &mut self.arena, target);
        let telemetry = FrameTelemetry::new(started.elapsed());

        let report = FrameReport {
            frame_index: self.frame_index,
            seconds,
            cubes_drawn,
            telemetry,
        };
        self.frame_index += 1;
        tracing::trace!("frame {}: {}", report.frame_index, telemetry);
        report
    }

    /// Loop until cancelled or the host asks to terminate.
    pub fn run<H: FrameHost>(&mut self, state: &mut AppState, host: &mut H) -> RunOutcome {
        let first = self.frame_index;
        tracing::info!("frame loop starting");
        let outcome = loop {
            if self.cancel.is_cancelled() {
                break RunOutcome::Cancelled {
                    frames: self.frame_index - first,
                };
            }

            let report = self.frame(state, host.target(), Instant::now());
            host.present();
            host.publish_telemetry(&report);

            if host.wait_for_next_frame() == FrameSignal::Terminate {
                break RunOutcome::Terminated {
                    frames: self.frame_index - first,
                };
            }
        };
        tracing::info!("frame loop stopped: {outcome:?}");
        outcome
    }
}
