mod gltf_loader;

pub use gltf_loader::{build_scene_node, GltfLoader};

use crate::scene::SceneNode;
use std::path::PathBuf;
use std::sync::mpsc;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to read asset at {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to fetch asset from {url}: {message}")]
    Fetch { url: String, message: String },
    #[error("failed to parse glTF {path}: {message}")]
    ParseGltf { path: String, message: String },
    #[error("glTF {path} contains no scene")]
    EmptyScene { path: String },
    #[error("failed to spawn asset loader thread: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("invalid asset url {asset_ref}: {message}")]
    InvalidUrl { asset_ref: String, message: String },
    #[error("asset loader for {asset_ref} stopped without a result")]
    Disconnected { asset_ref: String },
}

/// Where relative asset references resolve from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetRoot {
    Dir(PathBuf),
    /// Document URL; relative refs join against it the way a browser would.
    Url(Url),
}

impl Default for AssetRoot {
    fn default() -> Self {
        AssetRoot::Dir(PathBuf::from("."))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetLocation {
    File(PathBuf),
    Url(Url),
}

impl AssetRoot {
    pub fn resolve(&self, asset_ref: &str) -> Result<AssetLocation, AssetError> {
        let invalid = |err: url::ParseError| AssetError::InvalidUrl {
            asset_ref: asset_ref.to_string(),
            message: err.to_string(),
        };
        if is_absolute_url(asset_ref) {
            return Url::parse(asset_ref).map(AssetLocation::Url).map_err(invalid);
        }
        match self {
            AssetRoot::Dir(dir) => Ok(AssetLocation::File(dir.join(asset_ref))),
            AssetRoot::Url(base) => base.join(asset_ref).map(AssetLocation::Url).map_err(invalid),
        }
    }
}

fn is_absolute_url(asset_ref: &str) -> bool {
    asset_ref.starts_with("http://") || asset_ref.starts_with("https://")
}

/// Outcome reported by an in-flight load.
#[derive(Debug)]
pub enum LoadEvent {
    Progress { loaded: u64, total: Option<u64> },
    Loaded(SceneNode),
    Failed(AssetError),
}

/// Receiving half of one asynchronous load. Yields any number of progress
/// events followed by exactly one `Loaded` or `Failed`.
#[derive(Debug)]
pub struct LoadTicket {
    asset_ref: String,
    receiver: mpsc::Receiver<LoadEvent>,
}

/// Sending half handed to whatever performs the load.
#[derive(Debug, Clone)]
pub struct LoadReporter {
    sender: mpsc::Sender<LoadEvent>,
}

impl LoadTicket {
    pub fn channel(asset_ref: &str) -> (LoadReporter, LoadTicket) {
        let (sender, receiver) = mpsc::channel();
        (
            LoadReporter { sender },
            LoadTicket {
                asset_ref: asset_ref.to_string(),
                receiver,
            },
        )
    }

    /// A ticket that is already settled with `error`.
    pub fn failed(asset_ref: &str, error: AssetError) -> LoadTicket {
        let (reporter, ticket) = Self::channel(asset_ref);
        reporter.finish(Err(error));
        ticket
    }

    pub fn asset_ref(&self) -> &str {
        &self.asset_ref
    }

    /// Next pending event without blocking. A reporter dropped before
    /// settling surfaces as `Failed(Disconnected)`.
    pub fn try_next(&self) -> Option<LoadEvent> {
        match self.receiver.try_recv() {
            Ok(event) => Some(event),
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => {
                Some(LoadEvent::Failed(AssetError::Disconnected {
                    asset_ref: self.asset_ref.clone(),
                }))
            }
        }
    }
}

impl LoadReporter {
    /// Returns false once the ticket has been dropped.
    pub fn progress(&self, loaded: u64, total: Option<u64>) -> bool {
        self.sender
            .send(LoadEvent::Progress { loaded, total })
            .is_ok()
    }

    pub fn finish(self, result: Result<SceneNode, AssetError>) {
        let event = match result {
            Ok(node) => LoadEvent::Loaded(node),
            Err(err) => LoadEvent::Failed(err),
        };
        let _ = self.sender.send(event);
    }
}

/// Turns asset references into scene-graph nodes asynchronously.
pub trait AssetLoader {
    fn load(&self, asset_ref: &str) -> LoadTicket;
}
