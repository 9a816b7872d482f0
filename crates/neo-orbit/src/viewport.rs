//! Orbit-style viewport: rotate, pan and zoom around a target with damping,
//! plus resize handling for the display surface.
//!
//! Gestures accumulate into pending deltas. Each [`ViewportController::update`]
//! applies a damped share of what is pending, so a flick keeps coasting for a
//! few frames and the total motion still equals the input.

use glam::Vec3;
use tracing::{debug, warn};

use crate::camera::Camera;
use crate::error::ViewError;

/// Pitch stays this far away from straight up or down.
const POLE_MARGIN: f32 = 0.01;

/// Damping is specified per frame at this rate.
const DAMPING_REFERENCE_HZ: f32 = 60.0;

/// Pending deltas below this are dropped.
const SETTLE_EPSILON: f32 = 1e-5;

/// Camera framing and input response.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewportSettings {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Initial camera position; the camera looks at the origin.
    pub start_position: Vec3,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Fraction of the pending motion applied per 60 Hz frame. 0 disables damping.
    pub damping: f32,
    /// Radians per pixel of drag.
    pub rotate_sensitivity: f32,
    /// Scene units per pixel of drag, per unit of distance.
    pub pan_sensitivity: f32,
    /// Fractional distance change per wheel line.
    pub zoom_sensitivity: f32,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            fov_y_degrees: 60.0,
            near: 0.1,
            far: 10_000.0,
            start_position: Vec3::new(0.0, 100.0, 200.0),
            min_distance: 50.0,
            max_distance: 500.0,
            damping: 0.05,
            rotate_sensitivity: 0.005,
            pan_sensitivity: 0.0015,
            zoom_sensitivity: 0.05,
        }
    }
}

/// A single user input gesture, already in screen units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Gesture {
    /// Drag to orbit. Pixels.
    Rotate { dx: f32, dy: f32 },
    /// Drag to move the target. Pixels.
    Pan { dx: f32, dy: f32 },
    /// Wheel lines; positive zooms in.
    Zoom { lines: f32 },
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Pending {
    yaw: f32,
    pitch: f32,
    pan: Vec3,
    /// Natural log of the distance scale still to apply.
    log_zoom: f32,
}

impl Pending {
    fn scaled(self, k: f32) -> Self {
        Self {
            yaw: self.yaw * k,
            pitch: self.pitch * k,
            pan: self.pan * k,
            log_zoom: self.log_zoom * k,
        }
    }

    fn is_settled(&self) -> bool {
        self.yaw.abs() < SETTLE_EPSILON
            && self.pitch.abs() < SETTLE_EPSILON
            && self.pan.length_squared() < SETTLE_EPSILON * SETTLE_EPSILON
            && self.log_zoom.abs() < SETTLE_EPSILON
    }
}

/// Camera framing driven by gestures.
#[derive(Clone, Debug)]
pub struct ViewportController {
    settings: ViewportSettings,
    target: Vec3,
    yaw: f32,
    pitch: f32,
    distance: f32,
    pending: Pending,
    camera: Camera,
    surface: Option<(u32, u32)>,
    deferred_size: Option<(u32, u32)>,
}

impl ViewportController {
    pub fn new(settings: ViewportSettings) -> Self {
        let (min_distance, max_distance) = ordered(settings.min_distance, settings.max_distance);
        let settings = ViewportSettings {
            min_distance,
            max_distance,
            ..settings
        };
        let offset = settings.start_position;
        let distance = offset.length().clamp(min_distance, max_distance);
        let (yaw, pitch) = if offset.length_squared() > 1e-12 {
            let dir = offset.normalize();
            (dir.x.atan2(dir.z), dir.y.clamp(-1.0, 1.0).asin())
        } else {
            (0.0, 0.0)
        };

        let camera = Camera {
            fov_y: settings.fov_y_degrees.to_radians(),
            near: settings.near,
            far: settings.far,
            ..Camera::default()
        };
        let mut controller = Self {
            settings,
            target: Vec3::ZERO,
            yaw,
            pitch: clamp_pitch(pitch),
            distance,
            pending: Pending::default(),
            camera,
            surface: None,
            deferred_size: None,
        };
        controller.sync_camera();
        controller
    }

    pub fn settings(&self) -> &ViewportSettings {
        &self.settings
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Camera-to-target distance, always within `[min_distance, max_distance]`.
    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Last accepted surface size, `None` until a non-zero size arrives.
    pub fn surface_size(&self) -> Option<(u32, u32)> {
        self.surface
    }

    /// Zero-sized request waiting for a usable layout.
    pub fn deferred_size(&self) -> Option<(u32, u32)> {
        self.deferred_size
    }

    /// Queue a gesture. Takes effect over the following updates.
    pub fn gesture(&mut self, gesture: Gesture) {
        match gesture {
            Gesture::Rotate { dx, dy } => {
                self.pending.yaw -= dx * self.settings.rotate_sensitivity;
                self.pending.pitch += dy * self.settings.rotate_sensitivity;
            }
            Gesture::Pan { dx, dy } => {
                let scale = self.distance * self.settings.pan_sensitivity;
                let right = self.camera.right();
                let up = self.camera.up();
                self.pending.pan += (-right * dx + up * dy) * scale;
            }
            Gesture::Zoom { lines } => {
                let step = (1.0 - self.settings.zoom_sensitivity).clamp(0.01, 0.999);
                self.pending.log_zoom += step.ln() * lines;
            }
        }
    }

    /// Apply pending motion for a frame of `dt` wall-clock seconds.
    pub fn update(&mut self, dt: f32) {
        if self.pending.is_settled() {
            self.pending = Pending::default();
            return;
        }
        let share = if self.settings.damping <= 0.0 || self.settings.damping >= 1.0 {
            1.0
        } else {
            let frames = (dt.max(0.0) * DAMPING_REFERENCE_HZ).min(60.0);
            1.0 - (1.0 - self.settings.damping).powf(frames)
        };
        let step = self.pending.scaled(share);
        self.pending = self.pending.scaled(1.0 - share);

        self.yaw = (self.yaw + step.yaw).rem_euclid(std::f32::consts::TAU);
        self.pitch = clamp_pitch(self.pitch + step.pitch);
        self.distance = (self.distance * step.log_zoom.exp())
            .clamp(self.settings.min_distance, self.settings.max_distance);
        self.target = (self.target + step.pan).clamp_length_max(self.settings.max_distance);
        self.sync_camera();
    }

    /// Adopt a new surface size. Orientation, target and distance are kept;
    /// only the projection aspect changes.
    ///
    /// A zero dimension is rejected and remembered; the next non-zero resize
    /// replaces it.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), ViewError> {
        if width == 0 || height == 0 {
            warn!(width, height, "ignoring zero-sized surface, will retry on next resize");
            self.deferred_size = Some((width, height));
            return Err(ViewError::ZeroSizedSurface { width, height });
        }
        if self.deferred_size.take().is_some() {
            debug!(width, height, "deferred resize resolved");
        }
        self.surface = Some((width, height));
        self.camera.set_aspect_ratio(width as f32, height as f32);
        Ok(())
    }

    /// Return to the initial framing and drop pending motion.
    pub fn reset(&mut self) {
        let surface = self.surface;
        *self = Self::new(self.settings.clone());
        if let Some((w, h)) = surface {
            self.surface = surface;
            self.camera.set_aspect_ratio(w as f32, h as f32);
        }
    }

    fn sync_camera(&mut self) {
        let (sin_p, cos_p) = self.pitch.sin_cos();
        let (sin_y, cos_y) = self.yaw.sin_cos();
        let offset = Vec3::new(cos_p * sin_y, sin_p, cos_p * cos_y) * self.distance;
        self.camera.position = self.target + offset;
        self.camera.look_at(self.target);
    }
}

fn clamp_pitch(pitch: f32) -> f32 {
    let limit = std::f32::consts::FRAC_PI_2 - POLE_MARGIN;
    pitch.clamp(-limit, limit)
}

fn ordered(a: f32, b: f32) -> (f32, f32) {
    let lo = a.min(b).max(f32::EPSILON);
    (lo, a.max(b).max(lo))
}
