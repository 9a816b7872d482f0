//! Near-Earth-Object orbit view: approach records mapped to a continuously
//! advancing 3D scene under a signed, pausable playback speed.

pub mod camera;
pub mod clock;
pub mod controls;
pub mod error;
pub mod geometry;
pub mod lifecycle;
pub mod lighting;
pub mod record;
pub mod render_loop;
pub mod scene;
pub mod starfield;
pub mod view;
pub mod viewport;

pub use camera::Camera;
pub use clock::{MAX_FRAME_TIME, PlaybackClock, SpeedRange, advance};
pub use controls::{
    ControlCommand, ControlSnapshot, ControlState, DEFAULT_SPEED_PRESETS, RESET_SPEED,
};
pub use error::{FrameError, ViewError};
pub use geometry::{BodyShape, BodyStyle, OrbitPlacement, OrbitTuning, rgb, wrap_angle};
pub use lifecycle::{FrameRequest, FrameScheduler, RefreshTimer, ViewSession};
pub use lighting::{DirectionalLight, LightRig, PointLight, range_falloff};
pub use record::{
    ApproachRecord, KindFilter, ObjectKind, RawApproachRecord, RecordField, SortOrder,
    hazardous_count, sample_catalog, validate_all,
};
pub use render_loop::{Frame, FrameSink, LoopState, RenderLoop, StepOutcome};
pub use scene::{
    Body, BodyKey, CentralBody, OrbitCurve, OrbitKey, SceneGraph, ScenePair, SceneSettings,
    StaticWorld,
};
pub use starfield::{Star, StarfieldSpec, blackbody_to_rgb};
pub use view::{OrbitView, Readout, ViewSettings, ViewStatus};
pub use viewport::{Gesture, ViewportController, ViewportSettings};
