//! Per-frame driver: clock, body placement, camera, submission.

use glam::Mat4;
use tracing::{debug, info, warn};

use crate::camera::Camera;
use crate::clock::{PlaybackClock, clamp_frame_time};
use crate::controls::ControlSnapshot;
use crate::error::FrameError;
use crate::scene::SceneGraph;
use crate::viewport::ViewportController;

/// Everything a backend needs to draw one frame.
pub struct Frame<'a> {
    pub index: u64,
    pub view_proj: Mat4,
    pub camera: &'a Camera,
    pub scene: &'a SceneGraph,
    pub sim_time: f64,
}

/// Destination of finished frames.
pub trait FrameSink {
    fn submit(&mut self, frame: &Frame<'_>) -> Result<(), FrameError>;
}

/// Result of one [`RenderLoop::step`].
#[derive(Clone, Debug, PartialEq)]
pub enum StepOutcome {
    /// The frame reached the sink.
    Presented { dt_sim: f64 },
    /// The sink skipped this frame; the loop keeps running.
    Skipped,
    /// The surface is zero-sized. Nothing advanced and nothing was submitted.
    SurfacePending,
    /// The loop was already stopped; nothing happened.
    Stopped,
    /// The sink lost its context; the loop has stopped.
    ContextLost(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

/// Drives the clock and the scene one frame at a time.
#[derive(Debug)]
pub struct RenderLoop {
    state: LoopState,
    clock: PlaybackClock,
    frame_index: u64,
    skipped_frames: u64,
    time_epoch: u64,
}

impl Default for RenderLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderLoop {
    pub fn new() -> Self {
        Self {
            state: LoopState::Running,
            clock: PlaybackClock::new(),
            frame_index: 0,
            skipped_frames: 0,
            time_epoch: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn clock(&self) -> &PlaybackClock {
        &self.clock
    }

    /// Frames handed to the sink, presented or skipped.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    pub fn skipped_frames(&self) -> u64 {
        self.skipped_frames
    }

    /// Stop for good. Later steps do nothing.
    pub fn stop(&mut self) {
        if self.state == LoopState::Running {
            info!(frames = self.frame_index, "render loop stopped");
        }
        self.state = LoopState::Stopped;
    }

    /// Run one frame.
    ///
    /// `controls` is the snapshot taken once for this frame; nothing in the
    /// step reads the live control state. While the viewport holds a deferred
    /// zero-sized surface the step does nothing and reports
    /// [`StepOutcome::SurfacePending`].
    pub fn step(
        &mut self,
        dt_wall: f64,
        controls: ControlSnapshot,
        scene: &mut SceneGraph,
        viewport: &mut ViewportController,
        sink: &mut dyn FrameSink,
    ) -> StepOutcome {
        if self.state == LoopState::Stopped {
            return StepOutcome::Stopped;
        }
        if let Some((width, height)) = viewport.deferred_size() {
            debug!(width, height, "surface pending, frame not drawn");
            return StepOutcome::SurfacePending;
        }

        if controls.time_epoch != self.time_epoch {
            self.time_epoch = controls.time_epoch;
            self.clock.reset();
            scene.reset_angles();
        }

        let dt_wall = clamp_frame_time(dt_wall);
        let dt_sim = self.clock.advance(dt_wall, controls.speed, controls.paused);
        scene.advance_bodies(dt_sim);
        scene.animate(dt_wall as f32, controls.paused);
        viewport.update(dt_wall as f32);

        let index = self.frame_index;
        let camera = viewport.camera();
        let frame = Frame {
            index,
            view_proj: camera.view_projection_matrix(),
            camera,
            scene,
            sim_time: self.clock.sim_time(),
        };
        let result = sink.submit(&frame);
        self.frame_index += 1;

        match result {
            Ok(()) => StepOutcome::Presented { dt_sim },
            Err(err) if err.is_recoverable() => {
                self.skipped_frames += 1;
                warn!(frame = index, %err, "frame skipped");
                StepOutcome::Skipped
            }
            Err(err) => {
                warn!(frame = index, %err, "stopping render loop");
                self.stop();
                StepOutcome::ContextLost(err.into_reason())
            }
        }
    }
}
