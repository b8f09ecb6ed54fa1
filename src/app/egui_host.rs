use crate::ui::{self, UiAction};
use crate::viewer::ViewerSession;
use winit::event::WindowEvent;
use winit::window::Window;

/// Tessellated egui output for the painter.
pub struct EguiFrameOutput {
    pub clipped_primitives: Vec<egui::ClippedPrimitive>,
    pub textures_delta: egui::TexturesDelta,
    pub pixels_per_point: f32,
    pub screen_size_px: [u32; 2],
}

/// One pass of the showcase panel: what to paint and what the user asked for.
pub struct PanelFrame {
    pub output: EguiFrameOutput,
    pub actions: Vec<UiAction>,
}

/// Bridges winit input into egui and runs the side panel over a session.
pub struct EguiHost {
    context: egui::Context,
    winit_state: egui_winit::State,
    panel_width: f32,
}

impl EguiHost {
    pub fn new(window: &Window, panel_width: f32) -> Self {
        let context = egui::Context::default();
        apply_showcase_style(&context);
        let winit_state = egui_winit::State::new(
            context.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            window.theme(),
            None,
        );
        Self {
            context,
            winit_state,
            panel_width,
        }
    }

    /// Returns true when egui consumed the event.
    pub fn handle_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.winit_state.on_window_event(window, event).consumed
    }

    /// True while a text field or other widget holds keyboard focus; shortcuts stay off.
    pub fn wants_keyboard(&self) -> bool {
        self.context.wants_keyboard_input()
    }

    pub fn frame(&mut self, window: &Window, session: &ViewerSession) -> PanelFrame {
        let raw_input = self.winit_state.take_egui_input(window);
        let panel_width = self.panel_width;
        let mut actions = Vec::new();
        let full_output = self.context.run(raw_input, |ctx| {
            actions = ui::show(ctx, session, panel_width);
        });
        self.winit_state
            .handle_platform_output(window, full_output.platform_output);

        let pixels_per_point = full_output.pixels_per_point;
        let size = window.inner_size();
        PanelFrame {
            output: EguiFrameOutput {
                clipped_primitives: self
                    .context
                    .tessellate(full_output.shapes, pixels_per_point),
                textures_delta: full_output.textures_delta,
                pixels_per_point,
                screen_size_px: [size.width.max(1), size.height.max(1)],
            },
            actions,
        }
    }
}

/// Light theme with roomier buttons to sit on the pale viewport background.
fn apply_showcase_style(context: &egui::Context) {
    context.set_visuals(egui::Visuals::light());
    context.style_mut(|style| {
        style.spacing.button_padding = egui::vec2(10.0, 6.0);
        style.spacing.item_spacing = egui::vec2(8.0, 8.0);
    });
}
