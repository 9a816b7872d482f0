//! The orbit view: records, controls, scene, viewport and loop in one place.

use std::fmt;

use tracing::{error, info};

use crate::clock::SpeedRange;
use crate::controls::{ControlCommand, ControlState, DEFAULT_SPEED_PRESETS};
use crate::error::ViewError;
use crate::record::{ApproachRecord, hazardous_count};
use crate::render_loop::{FrameSink, RenderLoop, StepOutcome};
use crate::scene::{SceneGraph, SceneSettings};
use crate::viewport::{Gesture, ViewportController, ViewportSettings};

/// Construction parameters of an [`OrbitView`].
#[derive(Clone, Debug)]
pub struct ViewSettings {
    pub scene: SceneSettings,
    pub viewport: ViewportSettings,
    pub initial_speed: f64,
    pub speed_range: SpeedRange,
    pub speed_presets: Vec<f64>,
    pub start_paused: bool,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            scene: SceneSettings::default(),
            viewport: ViewportSettings::default(),
            initial_speed: 10.0,
            speed_range: SpeedRange::default(),
            speed_presets: DEFAULT_SPEED_PRESETS.to_vec(),
            start_paused: false,
        }
    }
}

/// Whether the view can still draw.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewStatus {
    Live,
    /// Drawing is off for good; the reason is shown to the user.
    Degraded(String),
}

/// Object-count line shown next to the view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Readout {
    pub objects: usize,
    pub hazardous: usize,
}

impl fmt::Display for Readout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} objects in orbit · {} hazardous", self.objects, self.hazardous)
    }
}

pub struct OrbitView {
    records: Vec<ApproachRecord>,
    displayed: Vec<ApproachRecord>,
    controls: ControlState,
    scene: SceneGraph,
    viewport: ViewportController,
    render_loop: RenderLoop,
    status: ViewStatus,
}

impl OrbitView {
    pub fn new(settings: ViewSettings) -> Self {
        let mut controls = ControlState::new(
            settings.initial_speed,
            settings.speed_range,
            &settings.speed_presets,
        );
        controls.apply(ControlCommand::SetPaused(settings.start_paused));
        Self {
            records: Vec::new(),
            displayed: Vec::new(),
            controls,
            scene: SceneGraph::new(settings.scene),
            viewport: ViewportController::new(settings.viewport),
            render_loop: RenderLoop::new(),
            status: ViewStatus::Live,
        }
    }

    /// Replace the whole record set and rebuild the scene.
    pub fn set_records(&mut self, records: Vec<ApproachRecord>) {
        self.records = records;
        self.rebuild();
    }

    fn rebuild(&mut self) {
        self.displayed = self.controls.filter().apply(&self.records);
        self.scene.rebuild(&self.displayed);
        info!(
            total = self.records.len(),
            displayed = self.displayed.len(),
            filter = ?self.controls.filter(),
            "orbit view rebuilt"
        );
    }

    /// Apply a user command; a filter change rebuilds the scene.
    pub fn command(&mut self, command: ControlCommand) {
        if self.controls.apply(command).is_some() {
            self.rebuild();
        }
    }

    pub fn gesture(&mut self, gesture: Gesture) {
        self.viewport.gesture(gesture);
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), ViewError> {
        self.viewport.resize(width, height)
    }

    /// Run one frame. A degraded view does nothing.
    pub fn frame(&mut self, dt_wall: f64, sink: &mut dyn FrameSink) -> StepOutcome {
        if !self.is_live() {
            return StepOutcome::Stopped;
        }
        let snapshot = self.controls.snapshot();
        let outcome =
            self.render_loop
                .step(dt_wall, snapshot, &mut self.scene, &mut self.viewport, sink);
        if let StepOutcome::ContextLost(reason) = &outcome {
            self.degrade(ViewError::RenderContextUnavailable(reason.clone()));
        }
        outcome
    }

    /// Switch to the degraded state and stop the loop.
    pub fn degrade(&mut self, reason: ViewError) {
        error!(%reason, "orbit view degraded");
        self.render_loop.stop();
        self.status = ViewStatus::Degraded(reason.to_string());
    }

    pub fn stop(&mut self) {
        self.render_loop.stop();
    }

    pub fn status(&self) -> &ViewStatus {
        &self.status
    }

    pub fn is_live(&self) -> bool {
        self.status == ViewStatus::Live && self.render_loop.is_running()
    }

    pub fn readout(&self) -> Readout {
        Readout {
            objects: self.displayed.len(),
            hazardous: hazardous_count(&self.displayed),
        }
    }

    pub fn records(&self) -> &[ApproachRecord] {
        &self.records
    }

    /// Records currently in the scene, in scene order.
    pub fn displayed(&self) -> &[ApproachRecord] {
        &self.displayed
    }

    pub fn controls(&self) -> &ControlState {
        &self.controls
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn viewport(&self) -> &ViewportController {
        &self.viewport
    }

    pub fn render_loop(&self) -> &RenderLoop {
        &self.render_loop
    }

    pub fn reset_camera(&mut self) {
        self.viewport.reset();
    }
}
