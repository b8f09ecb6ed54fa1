use std::time::{Duration, Instant};
use winit::window::Window;

const TITLE_REFRESH: Duration = Duration::from_millis(500);

/// Counts frames and refreshes the window title with the shown model and fps.
pub struct FrameTiming {
    last_title_update: Instant,
    frame_count: u32,
    base_title: String,
}

impl FrameTiming {
    pub fn new(base_title: String) -> Self {
        Self {
            last_title_update: Instant::now(),
            frame_count: 0,
            base_title,
        }
    }

    pub fn tick(&mut self, window: &Window, now: Instant, model_name: Option<&str>) {
        self.frame_count = self.frame_count.saturating_add(1);
        let elapsed = now.saturating_duration_since(self.last_title_update);
        if elapsed < TITLE_REFRESH {
            return;
        }
        let fps = self.frame_count as f32 / elapsed.as_secs_f32();
        window.set_title(&format_title(&self.base_title, model_name, fps));
        self.frame_count = 0;
        self.last_title_update = now;
    }
}

pub fn format_title(base: &str, model_name: Option<&str>, fps: f32) -> String {
    match model_name {
        Some(name) => format!("{base} - {name} - {fps:.1} fps"),
        None => format!("{base} - {fps:.1} fps"),
    }
}
