use crate::catalog::{Catalog, ModelDescriptor, SpecItem};

#[derive(Debug, Clone, PartialEq)]
pub struct SelectionControl {
    pub id: String,
    pub label: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    pub specs: Vec<SpecItem>,
}

/// What the UI shows. Written by the session, read by the panel each frame.
#[derive(Debug, Clone, Default)]
pub struct Presentation {
    loading_visible: bool,
    loading_progress: Option<f32>,
    info: Option<ModelInfo>,
    controls: Vec<SelectionControl>,
    status: Option<String>,
}

impl Presentation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_controls(&mut self, catalog: &Catalog) {
        self.controls = catalog
            .models()
            .iter()
            .map(|model| SelectionControl {
                id: model.id.clone(),
                label: model.name.clone(),
                active: false,
            })
            .collect();
    }

    pub fn show_loading(&mut self) {
        self.loading_visible = true;
        self.loading_progress = None;
    }

    pub fn hide_loading(&mut self) {
        self.loading_visible = false;
        self.loading_progress = None;
    }

    pub fn set_progress(&mut self, loaded: u64, total: Option<u64>) {
        self.loading_progress = match total {
            Some(total) if total > 0 => Some((loaded as f32 / total as f32).clamp(0.0, 1.0)),
            _ => None,
        };
    }

    pub fn show_info(&mut self, model: &ModelDescriptor) {
        self.info = Some(ModelInfo {
            id: model.id.clone(),
            name: model.name.clone(),
            description: model.description.clone(),
            specs: model.specs.clone(),
        });
    }

    /// Marks `id` active and every other control inactive.
    pub fn highlight(&mut self, id: &str) {
        for control in &mut self.controls {
            control.active = control.id == id;
        }
    }

    pub fn set_status(&mut self, status: Option<String>) {
        self.status = status;
    }

    pub fn loading_visible(&self) -> bool {
        self.loading_visible
    }

    pub fn loading_progress(&self) -> Option<f32> {
        self.loading_progress
    }

    pub fn info(&self) -> Option<&ModelInfo> {
        self.info.as_ref()
    }

    pub fn controls(&self) -> &[SelectionControl] {
        &self.controls
    }

    pub fn active_control(&self) -> Option<&str> {
        self.controls
            .iter()
            .find(|control| control.active)
            .map(|control| control.id.as_str())
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::Presentation;
    use crate::catalog::{builtin_models, Catalog};

    #[test]
    fn highlight_is_exclusive() {
        let catalog = Catalog::new(builtin_models()).unwrap();
        let mut presentation = Presentation::new();
        presentation.set_controls(&catalog);
        assert_eq!(presentation.controls().len(), 3);
        assert!(presentation.active_control().is_none());

        presentation.highlight("samsung_galaxy_s22_ultra");
        presentation.highlight("Samsung_Galaxy_Z_Flip_3");
        let active: Vec<_> = presentation
            .controls()
            .iter()
            .filter(|control| control.active)
            .collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].label, "Samsung Galaxy Z Flip 3");
    }

    #[test]
    fn progress_needs_a_known_total() {
        let mut presentation = Presentation::new();
        presentation.show_loading();
        presentation.set_progress(50, Some(200));
        assert_eq!(presentation.loading_progress(), Some(0.25));
        presentation.set_progress(50, None);
        assert_eq!(presentation.loading_progress(), None);
        presentation.set_progress(10, Some(0));
        assert_eq!(presentation.loading_progress(), None);
        presentation.hide_loading();
        assert!(!presentation.loading_visible());
    }
}
