//! Model swap controller.
//!
//! `ViewerSession` owns everything a model swap touches: the catalog, the
//! scene host, the orbit camera and the presentation model. Loads run
//! behind a `LoadTicket`; `update` drains the ticket once per frame on the
//! event-loop thread, so all mutation stays on that thread and `is_loading`
//! is the only guard needed.

mod nudge;
mod presentation;

pub use presentation::{ModelInfo, Presentation, SelectionControl};

use crate::assets::{AssetError, AssetLoader, LoadEvent, LoadTicket};
use crate::catalog::{Catalog, CatalogError, ModelDescriptor};
use crate::config::ViewerConfig;
use crate::render::OrbitCamera;
use crate::scene::{apply_model_transform, NodeHandle, SceneHost, SceneNode};

#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("unknown model id: {0}")]
    UnknownModel(String),
    #[error("selection of {requested} rejected while another model is loading")]
    RejectedConcurrentSelect { requested: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewerState {
    pub current_model_id: Option<String>,
    pub is_loading: bool,
    pub active_node: Option<NodeHandle>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// A load for the requested model is now in flight.
    Started,
    /// The requested model is already displayed; nothing was loaded.
    AlreadyShown,
}

/// How an in-flight load ended.
#[derive(Debug)]
pub enum Settlement {
    Loaded { id: String },
    Failed { id: String, error: AssetError },
}

struct PendingLoad {
    id: String,
    ticket: LoadTicket,
}

pub struct ViewerSession {
    catalog: Option<Catalog>,
    state: ViewerState,
    scene: SceneHost,
    camera: OrbitCamera,
    loader: Box<dyn AssetLoader>,
    pending: Option<PendingLoad>,
    presentation: Presentation,
}

impl ViewerSession {
    pub fn new(loader: Box<dyn AssetLoader>, config: &ViewerConfig) -> Self {
        Self {
            catalog: None,
            state: ViewerState::default(),
            scene: SceneHost::new(config.background, config.lights.clone()),
            camera: OrbitCamera::new(config.camera.clone()),
            loader,
            pending: None,
            presentation: Presentation::new(),
        }
    }

    /// Installs the catalog, publishes one selection control per model and
    /// starts loading `default_id` (or the first model).
    pub fn initialize(
        &mut self,
        models: Vec<ModelDescriptor>,
        default_id: Option<&str>,
    ) -> Result<Selection, ViewerError> {
        let catalog = Catalog::new(models)?;
        let default_id = match default_id {
            Some(id) if !catalog.contains(id) => {
                return Err(ViewerError::UnknownModel(id.to_string()));
            }
            Some(id) => id.to_string(),
            None => catalog.first().id.clone(),
        };
        log::info!(
            "Catalog ready with {} models, starting with '{}'",
            catalog.len(),
            default_id
        );
        self.presentation.set_controls(&catalog);
        self.catalog = Some(catalog);
        self.select_model(&default_id)
    }

    pub fn select_model(&mut self, id: &str) -> Result<Selection, ViewerError> {
        if self.state.is_loading {
            log::debug!("Ignoring selection of '{}' while a load is in flight", id);
            return Err(ViewerError::RejectedConcurrentSelect {
                requested: id.to_string(),
            });
        }
        let Some(descriptor) = self.catalog.as_ref().and_then(|catalog| catalog.get(id)) else {
            log::warn!("Selection of unknown model '{}' ignored", id);
            return Err(ViewerError::UnknownModel(id.to_string()));
        };
        if self.state.current_model_id.as_deref() == Some(id) {
            return Ok(Selection::AlreadyShown);
        }

        self.state.is_loading = true;
        self.presentation.show_loading();
        self.presentation.set_status(None);
        self.presentation.show_info(descriptor);
        self.presentation.highlight(id);

        log::info!("Loading model '{}' from {}", id, descriptor.asset_ref);
        let ticket = self.loader.load(&descriptor.asset_ref);
        self.pending = Some(PendingLoad {
            id: id.to_string(),
            ticket,
        });
        Ok(Selection::Started)
    }

    /// Per-frame tick: settles a finished load and advances camera damping.
    pub fn update(&mut self) -> Option<Settlement> {
        let settlement = self.poll_load();
        self.camera.update();
        settlement
    }

    /// Drains the in-flight ticket. Returns the settlement once the load ends.
    pub fn poll_load(&mut self) -> Option<Settlement> {
        loop {
            let event = self.pending.as_ref()?.ticket.try_next()?;
            match event {
                LoadEvent::Progress { loaded, total } => {
                    if let Some(pending) = &self.pending {
                        match total {
                            Some(total) if total > 0 => log::debug!(
                                "Loading '{}': {:.0}%",
                                pending.id,
                                loaded as f64 / total as f64 * 100.0
                            ),
                            _ => log::debug!("Loading '{}': {} bytes", pending.id, loaded),
                        }
                    }
                    self.presentation.set_progress(loaded, total);
                }
                LoadEvent::Loaded(node) => {
                    let pending = self.pending.take()?;
                    return Some(self.finish_loaded(pending.id, node));
                }
                LoadEvent::Failed(error) => {
                    let pending = self.pending.take()?;
                    return Some(self.finish_failed(pending.id, error));
                }
            }
        }
    }

    fn finish_loaded(&mut self, id: String, mut node: SceneNode) -> Settlement {
        if let Some(previous) = self.state.active_node.take() {
            self.scene.detach(previous);
        }
        let shadowed = match self.catalog.as_ref().and_then(|catalog| catalog.get(&id)) {
            Some(descriptor) => apply_model_transform(descriptor, &mut node),
            None => 0,
        };
        let (handle, stray) = self.scene.attach(node);
        debug_assert!(stray.is_none(), "scene held a model outside ViewerState");
        self.state.active_node = Some(handle);
        self.camera.reset();
        self.state.current_model_id = Some(id.clone());
        self.state.is_loading = false;
        self.presentation.hide_loading();
        log::info!("Model '{}' displayed ({} shadowed meshes)", id, shadowed);
        Settlement::Loaded { id }
    }

    // Optimistic info text for the failed model is left in place.
    fn finish_failed(&mut self, id: String, error: AssetError) -> Settlement {
        log::error!("Failed to load model '{}': {}", id, error);
        self.presentation.hide_loading();
        self.presentation
            .set_status(Some(format!("Could not load '{}': {}", id, error)));
        self.state.is_loading = false;
        Settlement::Failed { id, error }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.set_viewport(width, height);
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading
    }

    pub fn catalog(&self) -> Option<&Catalog> {
        self.catalog.as_ref()
    }

    pub fn scene(&self) -> &SceneHost {
        &self.scene
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }

    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    pub fn active_node(&self) -> Option<&SceneNode> {
        self.state
            .active_node
            .and_then(|handle| self.scene.node(handle))
    }
}
