//! Mount/unmount of a view and its two suspension points: the next-frame
//! request and the periodic record refresh.
//!
//! [`ViewSession::teardown`] cancels both and drops the view. A session can
//! be mounted and torn down any number of times.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::error::ViewError;
use crate::render_loop::{FrameSink, StepOutcome};
use crate::view::OrbitView;

/// Ticket for a scheduled frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameRequest(pub u64);

/// Whatever delivers "draw now" callbacks: a window's redraw, a test counter.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameRequest;
    fn cancel_frame(&mut self, request: FrameRequest);
}

/// Fires every `interval`, driven by explicit `now` values.
#[derive(Clone, Debug)]
pub struct RefreshTimer {
    interval: Duration,
    next_due: Option<Instant>,
}

impl RefreshTimer {
    /// Default refresh period of the record source.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(300);

    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start counting from `now`. A zero interval leaves the timer disarmed.
    pub fn arm(&mut self, now: Instant) {
        if self.interval.is_zero() {
            self.next_due = None;
            return;
        }
        self.next_due = Some(now + self.interval);
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.next_due
    }

    /// Returns `true` once per elapsed interval and re-arms from `now`.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }
}

impl Default for RefreshTimer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL)
    }
}

/// Owns a mounted view together with its pending frame and refresh timer.
pub struct ViewSession<S: FrameScheduler> {
    scheduler: S,
    view: Option<OrbitView>,
    pending_frame: Option<FrameRequest>,
    refresh: RefreshTimer,
    mounts: u64,
}

impl<S: FrameScheduler> ViewSession<S> {
    pub fn new(scheduler: S, refresh_interval: Duration) -> Self {
        Self {
            scheduler,
            view: None,
            pending_frame: None,
            refresh: RefreshTimer::new(refresh_interval),
            mounts: 0,
        }
    }

    /// Mount `view`, replacing (and tearing down) any previous one. Requests
    /// the first frame and arms the refresh timer.
    pub fn mount(&mut self, view: OrbitView, now: Instant) {
        if self.view.is_some() {
            self.teardown();
        }
        self.view = Some(view);
        self.mounts += 1;
        self.refresh.arm(now);
        self.pending_frame = Some(self.scheduler.request_frame());
        debug!(mounts = self.mounts, "view mounted");
    }

    /// Cancel the pending frame and the refresh timer, then drop the view.
    pub fn teardown(&mut self) {
        if let Some(request) = self.pending_frame.take() {
            self.scheduler.cancel_frame(request);
        }
        self.refresh.cancel();
        if let Some(mut view) = self.view.take() {
            view.stop();
            info!("view torn down");
        }
    }

    /// Handle a delivered frame callback. Requests the next frame while the
    /// view is live and its surface has area.
    pub fn on_frame(&mut self, dt_wall: f64, sink: &mut dyn FrameSink) -> StepOutcome {
        self.pending_frame = None;
        let Some(view) = self.view.as_mut() else {
            return StepOutcome::Stopped;
        };
        let outcome = view.frame(dt_wall, sink);
        if view.is_live() && outcome != StepOutcome::SurfacePending {
            self.pending_frame = Some(self.scheduler.request_frame());
        }
        outcome
    }

    /// Resize the mounted view. A usable size restarts the frame chain if it
    /// stalled on a zero-sized surface.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), ViewError> {
        let Some(view) = self.view.as_mut() else {
            return Ok(());
        };
        view.resize(width, height)?;
        if view.is_live() && self.pending_frame.is_none() {
            self.pending_frame = Some(self.scheduler.request_frame());
        }
        Ok(())
    }

    /// `true` when the record source should be pulled again.
    pub fn poll_refresh(&mut self, now: Instant) -> bool {
        self.view.is_some() && self.refresh.poll(now)
    }

    pub fn is_mounted(&self) -> bool {
        self.view.is_some()
    }

    pub fn has_pending_frame(&self) -> bool {
        self.pending_frame.is_some()
    }

    pub fn refresh_timer(&self) -> &RefreshTimer {
        &self.refresh
    }

    pub fn view(&self) -> Option<&OrbitView> {
        self.view.as_ref()
    }

    pub fn view_mut(&mut self) -> Option<&mut OrbitView> {
        self.view.as_mut()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}

impl<S: FrameScheduler> Drop for ViewSession<S> {
    fn drop(&mut self) {
        self.teardown();
    }
}
