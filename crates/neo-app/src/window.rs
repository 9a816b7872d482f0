//! Window creation and event handling via winit.
//!
//! [`App`] implements winit's [`ApplicationHandler`]: it owns the window, the
//! [`SceneRenderer`] and a [`ViewSession`] whose frame requests become
//! window redraws.

use std::sync::Arc;
use std::time::Instant;

use neo_config::Config;
use neo_orbit::{
    ControlCommand, FrameRequest, FrameScheduler, OrbitView, StepOutcome, ViewError, ViewSession,
    ViewStatus,
};
use neo_render::SceneRenderer;
use tracing::{debug, error, info, instrument, warn};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::input::{KeyAction, PointerTracker, action_for_key};
use crate::settings::{ConfigWatch, refresh_interval, view_settings};
use crate::source::{RecordSource, pull_soft};

/// Returns [`WindowAttributes`] based on the given configuration.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ))
}

/// Frame scheduler backed by `Window::request_redraw`.
///
/// winit cannot retract a redraw, so cancelling only forgets the ticket; the
/// session ignores frames delivered after teardown.
#[derive(Debug, Default)]
pub struct WindowScheduler {
    window: Option<Arc<Window>>,
    issued: u64,
    outstanding: Option<FrameRequest>,
}

impl WindowScheduler {
    pub fn attach(&mut self, window: Arc<Window>) {
        self.window = Some(window);
    }

    pub fn outstanding(&self) -> Option<FrameRequest> {
        self.outstanding
    }

    pub fn issued(&self) -> u64 {
        self.issued
    }
}

impl FrameScheduler for WindowScheduler {
    fn request_frame(&mut self) -> FrameRequest {
        self.issued += 1;
        let request = FrameRequest(self.issued);
        self.outstanding = Some(request);
        if let Some(window) = &self.window {
            window.request_redraw();
        }
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        if self.outstanding == Some(request) {
            self.outstanding = None;
        }
    }
}

/// Window title: base title, readout and playback state, or the reason the
/// view stopped drawing.
pub fn window_title(base: &str, view: &OrbitView) -> String {
    match view.status() {
        ViewStatus::Degraded(reason) => format!("{base} | {reason}"),
        ViewStatus::Live => {
            let controls = view.controls();
            let state = if controls.paused() { " (paused)" } else { "" };
            format!(
                "{base} | {} | speed {:+}x{state}",
                view.readout(),
                controls.speed()
            )
        }
    }
}

pub struct App {
    config: Config,
    window: Option<Arc<Window>>,
    renderer: Option<SceneRenderer>,
    session: ViewSession<WindowScheduler>,
    source: Box<dyn RecordSource>,
    config_watch: Option<ConfigWatch>,
    pointer: PointerTracker,
    last_frame: Option<Instant>,
    title: String,
}

impl App {
    pub fn new(
        config: Config,
        source: Box<dyn RecordSource>,
        config_watch: Option<ConfigWatch>,
    ) -> Self {
        let session = ViewSession::new(WindowScheduler::default(), refresh_interval(&config));
        Self {
            title: config.window.title.clone(),
            config,
            window: None,
            renderer: None,
            session,
            source,
            config_watch,
            pointer: PointerTracker::new(),
            last_frame: None,
        }
    }

    /// Build the view, pull the first record set and create the renderer.
    /// A renderer failure degrades the view instead of exiting.
    fn mount(&mut self, window: Arc<Window>) {
        let mut view = OrbitView::new(view_settings(&self.config));
        view.command(ControlCommand::SetFilter(self.config.playback.filter));
        if let Some(records) = pull_soft(self.source.as_mut()) {
            view.set_records(records);
        }

        let size = window.inner_size();
        if let Err(e) = view.resize(size.width, size.height) {
            debug!("Initial surface not ready: {e}");
        }

        match SceneRenderer::new(window.clone(), self.config.window.vsync) {
            Ok(renderer) => self.renderer = Some(renderer),
            Err(e) => {
                error!("GPU initialization failed: {e}");
                view.degrade(ViewError::RenderContextUnavailable(e.to_string()));
            }
        }

        self.session.scheduler_mut().attach(window.clone());
        self.window = Some(window);
        self.last_frame = None;
        self.session.mount(view, Instant::now());
        self.refresh_title();
    }

    fn refresh_title(&mut self) {
        let (Some(window), Some(view)) = (&self.window, self.session.view()) else {
            return;
        };
        let title = window_title(&self.config.window.title, view);
        if title != self.title {
            window.set_title(&title);
            self.title = title;
        }
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, key: KeyCode) {
        if key == KeyCode::Escape {
            info!("Escape pressed, shutting down");
            self.session.teardown();
            event_loop.exit();
            return;
        }
        let Some(view) = self.session.view_mut() else {
            return;
        };
        match action_for_key(key) {
            Some(KeyAction::Control(command)) => {
                debug!(?command, "control command");
                view.command(command);
            }
            Some(KeyAction::ResetCamera) => view.reset_camera(),
            None => return,
        }
        self.refresh_title();
    }

    fn redraw(&mut self) {
        let now = Instant::now();
        let dt = self
            .last_frame
            .map_or(0.0, |last| now.duration_since(last).as_secs_f64());
        self.last_frame = Some(now);

        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };
        let outcome = self.session.on_frame(dt, renderer);
        if matches!(outcome, StepOutcome::ContextLost(_)) {
            warn!("Render context lost, releasing renderer");
            self.renderer = None;
        }
        self.refresh_title();
    }

    fn refresh_records(&mut self) {
        let Some(records) = pull_soft(self.source.as_mut()) else {
            return;
        };
        if let Some(view) = self.session.view_mut() {
            info!(count = records.len(), "refreshed approach records");
            view.set_records(records);
        }
        self.refresh_title();
    }

    /// Rebuild the view from an edited config, keeping the current records
    /// and kind filter. Without a renderer the new settings only take effect
    /// on the next start.
    fn apply_config(&mut self, config: Config) {
        self.config = config;
        let (Some(window), Some(renderer)) = (self.window.clone(), self.renderer.as_mut()) else {
            info!("config changed, applies on next start");
            return;
        };
        let Some(current) = self.session.view() else {
            return;
        };
        let filter = current.controls().filter();
        let records = current.records().to_vec();

        let mut view = OrbitView::new(view_settings(&self.config));
        view.command(ControlCommand::SetFilter(filter));
        view.set_records(records);
        let size = window.inner_size();
        if let Err(e) = view.resize(size.width, size.height) {
            debug!("Surface not ready after config change: {e}");
        }
        renderer.invalidate_scene();

        self.last_frame = None;
        self.session.mount(view, Instant::now());
        info!("view rebuilt from edited config");
        self.refresh_title();
    }

    fn poll_config(&mut self) {
        if let Some(config) = self.config_watch.as_mut().and_then(ConfigWatch::poll) {
            self.apply_config(config);
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let attrs = window_attributes_from_config(&self.config);
        match event_loop.create_window(attrs) {
            Ok(window) => self.mount(Arc::new(window)),
            Err(e) => {
                error!("Failed to create window: {e}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                self.session.teardown();
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                let (w, h) = (new_size.width, new_size.height);
                if let Err(e) = self.session.resize(w, h) {
                    debug!("Deferred resize: {e}");
                }
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(w, h);
                }
                info!("Window resized to {}x{}", w, h);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed
                    && !event.repeat
                    && let PhysicalKey::Code(code) = event.physical_key
                {
                    self.handle_key(event_loop, code);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let Some(gesture) = self.pointer.on_cursor_moved(position.x, position.y)
                    && let Some(view) = self.session.view_mut()
                {
                    view.gesture(gesture);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.pointer.on_button(button, state);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                if let Some(gesture) = self.pointer.on_scroll(delta)
                    && let Some(view) = self.session.view_mut()
                {
                    view.gesture(gesture);
                }
            }
            WindowEvent::CursorLeft { .. } => {
                self.pointer.on_cursor_left();
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.session.poll_refresh(Instant::now()) {
            self.refresh_records();
            self.poll_config();
        }
        let flow = match self.session.refresh_timer().next_due() {
            Some(due) => ControlFlow::WaitUntil(due),
            None => ControlFlow::Wait,
        };
        event_loop.set_control_flow(flow);
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.session.teardown();
        self.renderer = None;
    }
}

/// Create the event loop and run until the window closes. `config_watch`
/// re-reads the config file on every record refresh.
#[instrument(skip_all)]
pub fn run(
    config: Config,
    source: Box<dyn RecordSource>,
    config_watch: Option<ConfigWatch>,
) -> Result<(), winit::error::EventLoopError> {
    info!(source = %source.describe(), "starting orbit viewer");
    let event_loop = EventLoop::new()?;
    let mut app = App::new(config, source, config_watch);
    event_loop.run_app(&mut app)
}

#[cfg(test)]
mod tests {
    use super::*;
    use neo_orbit::{ViewSettings, sample_catalog};

    #[test]
    fn test_scheduler_without_window_issues_tickets() {
        let mut scheduler = WindowScheduler::default();
        let first = scheduler.request_frame();
        let second = scheduler.request_frame();
        assert_ne!(first, second);
        assert_eq!(scheduler.outstanding(), Some(second));
        scheduler.cancel_frame(first);
        assert_eq!(scheduler.outstanding(), Some(second));
        scheduler.cancel_frame(second);
        assert_eq!(scheduler.outstanding(), None);
        assert_eq!(scheduler.issued(), 2);
    }

    #[test]
    fn test_session_teardown_cancels_window_frame() {
        let mut session = ViewSession::new(WindowScheduler::default(), Default::default());
        session.mount(OrbitView::new(ViewSettings::default()), Instant::now());
        assert!(session.scheduler().outstanding().is_some());
        session.teardown();
        assert!(session.scheduler().outstanding().is_none());
    }

    #[test]
    fn test_title_shows_readout_and_speed() {
        let mut view = OrbitView::new(ViewSettings::default());
        view.set_records(sample_catalog());
        let title = window_title("NEO", &view);
        assert_eq!(title, "NEO | 10 objects in orbit · 6 hazardous | speed +10x");

        view.command(ControlCommand::TogglePause);
        view.command(ControlCommand::Reverse);
        let title = window_title("NEO", &view);
        assert!(title.ends_with("speed -10x (paused)"), "{title}");
    }

    #[test]
    fn test_title_shows_degraded_reason() {
        let mut view = OrbitView::new(ViewSettings::default());
        view.degrade(ViewError::RenderContextUnavailable("no adapter".into()));
        assert_eq!(
            window_title("NEO", &view),
            "NEO | render context unavailable: no adapter"
        );
    }
}
