use crate::render::viewport::model_wireframe;
use crate::viewer::ViewerSession;
use egui::{Color32, RichText};

#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    Select(String),
    RotateLeft,
    RotateRight,
    ZoomIn,
    ZoomOut,
    /// Pointer drag over the viewport, in points.
    Orbit { dx: f32, dy: f32, height: f32 },
    /// Wheel over the viewport; positive scrolls away from the user.
    Wheel(f32),
}

const STATUS_COLOR: Color32 = Color32::from_rgb(192, 57, 43);

/// Draws the side panel and viewport for one frame and returns what the user asked for.
pub fn show(ctx: &egui::Context, session: &ViewerSession, panel_width: f32) -> Vec<UiAction> {
    let mut actions = Vec::new();
    let presentation = session.presentation();

    egui::SidePanel::left("model_panel")
        .exact_width(panel_width)
        .resizable(false)
        .show(ctx, |ui| {
            ui.heading("Phones");
            ui.add_space(4.0);
            for control in presentation.controls() {
                if ui
                    .selectable_label(control.active, control.label.as_str())
                    .clicked()
                {
                    actions.push(UiAction::Select(control.id.clone()));
                }
            }

            ui.separator();
            if presentation.loading_visible() {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading model...");
                });
                if let Some(progress) = presentation.loading_progress() {
                    ui.add(egui::ProgressBar::new(progress).show_percentage());
                }
            }

            if let Some(info) = presentation.info() {
                ui.label(RichText::new(info.name.as_str()).strong().size(18.0));
                ui.label(info.description.as_str());
                if !info.specs.is_empty() {
                    ui.add_space(4.0);
                    egui::Grid::new("model_specs")
                        .striped(true)
                        .num_columns(2)
                        .show(ui, |ui| {
                            for spec in &info.specs {
                                ui.label(spec.label.as_str());
                                ui.label(spec.value.as_str());
                                ui.end_row();
                            }
                        });
                }
            }
            if let Some(status) = presentation.status() {
                ui.add_space(4.0);
                ui.colored_label(STATUS_COLOR, status);
            }

            ui.separator();
            ui.horizontal_wrapped(|ui| {
                if ui.button("Rotate left").clicked() {
                    actions.push(UiAction::RotateLeft);
                }
                if ui.button("Rotate right").clicked() {
                    actions.push(UiAction::RotateRight);
                }
                if ui.button("Zoom in").clicked() {
                    actions.push(UiAction::ZoomIn);
                }
                if ui.button("Zoom out").clicked() {
                    actions.push(UiAction::ZoomOut);
                }
            });
        });

    let [r, g, b] = session.scene().background();
    let background = Color32::from_rgb(
        (r * 255.0).round() as u8,
        (g * 255.0).round() as u8,
        (b * 255.0).round() as u8,
    );
    egui::CentralPanel::default()
        .frame(egui::Frame::default().fill(background))
        .show(ctx, |ui| {
            let rect = ui.max_rect();
            let response = ui.allocate_rect(rect, egui::Sense::drag());
            if response.dragged() {
                let delta = response.drag_delta();
                actions.push(UiAction::Orbit {
                    dx: delta.x,
                    dy: delta.y,
                    height: rect.height(),
                });
            }
            if response.hovered() {
                let scroll = ui.input(|input| input.raw_scroll_delta.y);
                if scroll != 0.0 {
                    actions.push(UiAction::Wheel(-scroll));
                }
            }

            match session.active_node() {
                Some(node) => {
                    let shapes = model_wireframe(node, session.camera(), rect);
                    ui.painter().extend(shapes);
                }
                None => {
                    ui.painter().text(
                        rect.center(),
                        egui::Align2::CENTER_CENTER,
                        "No model loaded",
                        egui::FontId::proportional(16.0),
                        Color32::DARK_GRAY,
                    );
                }
            }
        });

    actions
}

#[cfg(test)]
mod tests {
    use super::show;
    use crate::viewer::tests::{initialized, session_with, ScriptedLoader};

    fn run_frame(session: &crate::viewer::ViewerSession) -> usize {
        let ctx = egui::Context::default();
        let mut count = usize::MAX;
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            count = show(ctx, session, 320.0).len();
        });
        count
    }

    #[test]
    fn idle_frame_emits_no_actions() {
        let loader = ScriptedLoader::default();
        let session = initialized(&loader);
        assert_eq!(run_frame(&session), 0);
    }

    #[test]
    fn panel_draws_before_initialize() {
        let loader = ScriptedLoader::default();
        let session = session_with(&loader);
        assert_eq!(run_frame(&session), 0);
    }

    #[test]
    fn panel_draws_while_loading() {
        let loader = ScriptedLoader::default();
        let mut session = initialized(&loader);
        session.select_model("B").unwrap();
        loader.progress(10, 40);
        session.update();
        assert_eq!(run_frame(&session), 0);
    }
}
