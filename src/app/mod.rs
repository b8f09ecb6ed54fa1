mod egui_host;
mod input;
mod timing;

pub use egui_host::EguiFrameOutput;

use crate::assets::{AssetRoot, GltfLoader};
use crate::catalog::serialization::load_catalog;
use crate::catalog::{builtin_models, CatalogError};
use crate::config::{ConfigError, ViewerConfig};
use crate::render::RenderContext;
use crate::ui::UiAction;
use crate::viewer::{ViewerError, ViewerSession};
use egui_host::EguiHost;
use input::{key_action, KeyAction};
use timing::FrameTiming;

use clap::Parser;
use std::sync::Arc;
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Viewer(#[from] ViewerError),
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

#[derive(Debug, Default, PartialEq, Eq, Parser)]
#[command(name = "phoneview")]
#[command(about = "Interactive 3D phone model showcase")]
pub struct LaunchOptions {
    /// Catalog file path or http(s) URL; the built-in phones when absent
    pub catalog: Option<String>,

    /// Model id to show first instead of the first catalog entry
    #[arg(short, long)]
    pub model: Option<String>,
}

pub struct App {
    config: ViewerConfig,
    session: ViewerSession,
    window: Option<Arc<Window>>,
    egui: Option<EguiHost>,
    render: Option<RenderContext>,
    timing: FrameTiming,
}

impl App {
    fn new(config: ViewerConfig, session: ViewerSession) -> Self {
        let timing = FrameTiming::new(config.window_title.clone());
        Self {
            config,
            session,
            window: None,
            egui: None,
            render: None,
            timing,
        }
    }

    fn init_graphics(&mut self, window: Arc<Window>) -> Result<(), crate::render::RenderError> {
        let render = RenderContext::new(window.clone(), self.config.background)?;
        let size = window.inner_size();
        self.session.resize(size.width, size.height);
        self.egui = Some(EguiHost::new(&window, self.config.panel_width));
        self.render = Some(render);
        self.window = Some(window);
        Ok(())
    }

    fn handle_resize(&mut self, new_size: PhysicalSize<u32>) {
        if let Some(render) = &mut self.render {
            render.resize(new_size.width, new_size.height);
        }
        self.session.resize(new_size.width, new_size.height);
    }

    fn apply_action(&mut self, action: UiAction) {
        match action {
            UiAction::Select(id) => {
                // Rejections are logged by the session and leave it unchanged.
                let _ = self.session.select_model(&id);
            }
            UiAction::RotateLeft => {
                self.session.rotate_left();
            }
            UiAction::RotateRight => {
                self.session.rotate_right();
            }
            UiAction::ZoomIn => self.session.zoom_in(),
            UiAction::ZoomOut => self.session.zoom_out(),
            UiAction::Orbit { dx, dy, height } => self.session.camera_mut().drag(dx, dy, height),
            UiAction::Wheel(delta) if delta > 0.0 => self.session.zoom_out(),
            UiAction::Wheel(_) => self.session.zoom_in(),
        }
    }

    fn apply_key(&mut self, action: KeyAction, event_loop: &ActiveEventLoop) {
        let action = match action {
            KeyAction::Quit => {
                log::info!("Escape pressed, shutting down...");
                event_loop.exit();
                return;
            }
            KeyAction::RotateLeft => UiAction::RotateLeft,
            KeyAction::RotateRight => UiAction::RotateRight,
            KeyAction::ZoomIn => UiAction::ZoomIn,
            KeyAction::ZoomOut => UiAction::ZoomOut,
            KeyAction::SelectIndex(index) => {
                let Some(model) = self
                    .session
                    .catalog()
                    .and_then(|catalog| catalog.models().get(index))
                else {
                    return;
                };
                UiAction::Select(model.id.clone())
            }
        };
        self.apply_action(action);
    }

    fn frame(&mut self) {
        let Some(window) = self.window.clone() else {
            return;
        };
        self.session.update();

        let Some(egui) = self.egui.as_mut() else {
            return;
        };
        let panel = egui.frame(&window, &self.session);
        if let Some(render) = &mut self.render {
            if let Err(err) = render.render(&panel.output) {
                log::warn!("Frame skipped: {}", err);
            }
        }

        for action in panel.actions {
            self.apply_action(action);
        }

        let model_name = self
            .session
            .state()
            .current_model_id
            .as_deref()
            .and_then(|id| self.session.catalog()?.get(id))
            .map(|model| model.name.as_str());
        self.timing.tick(&window, Instant::now(), model_name);
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let [width, height] = self.config.window_size;
        let window_attrs = WindowAttributes::default()
            .with_title(self.config.window_title.as_str())
            .with_inner_size(PhysicalSize::new(width, height))
            .with_resizable(true);
        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                log::error!("Failed to create window: {}", err);
                event_loop.exit();
                return;
            }
        };
        log::info!(
            "Window created: {}x{}",
            window.inner_size().width,
            window.inner_size().height
        );

        if let Err(err) = self.init_graphics(window) {
            log::error!("Failed to initialise graphics: {}", err);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let consumed = match (&mut self.egui, &self.window) {
            (Some(egui), Some(window)) => egui.handle_window_event(window, &event),
            _ => false,
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, shutting down...");
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                let wants_keyboard = self.egui.as_ref().is_some_and(EguiHost::wants_keyboard);
                if consumed || wants_keyboard || event.state != ElementState::Pressed {
                    return;
                }
                if let Some(action) = key_action(event.physical_key) {
                    self.apply_key(action, event_loop);
                }
            }
            WindowEvent::Resized(new_size) => {
                log::debug!("Window resized to {}x{}", new_size.width, new_size.height);
                self.handle_resize(new_size);
            }
            WindowEvent::RedrawRequested => {
                self.frame();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn start(options: LaunchOptions) -> Result<(), AppError> {
    let config = ViewerConfig::from_env()?;
    let (models, root) = match options.catalog.as_deref() {
        Some(location) => {
            let source = load_catalog(location)?;
            log::info!("Catalog loaded from {}", location);
            (source.models, source.root)
        }
        None => (builtin_models(), AssetRoot::default()),
    };

    let mut session = ViewerSession::new(Box::new(GltfLoader::new(root)), &config);
    session.initialize(models, options.model.as_deref())?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);
    let mut app = App::new(config, session);
    event_loop.run_app(&mut app)?;
    Ok(())
}

pub fn run() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    // clap prints usage and exits on bad arguments.
    let options = LaunchOptions::parse();
    match start(options) {
        Ok(()) => log::info!("Goodbye!"),
        Err(err) => {
            log::error!("{}", err);
            std::process::exit(1);
        }
    }
}
