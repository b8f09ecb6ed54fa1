use crate::assets::{AssetError, AssetLoader, AssetLocation, AssetRoot, LoadReporter, LoadTicket};
use crate::scene::{MeshInfo, SceneNode, Transform};
use glam::Vec3;
use std::io::Read;
use std::path::Path;
use std::thread;
use url::Url;

const READ_CHUNK_BYTES: usize = 64 * 1024;
/// Upper bound on the buffer reserved from a reported length; larger bodies grow as read.
const MAX_PREALLOC_BYTES: u64 = READ_CHUNK_BYTES as u64 * 256;

/// Loads `.glb`/`.gltf` assets on a worker thread per request.
#[derive(Debug, Clone, Default)]
pub struct GltfLoader {
    root: AssetRoot,
}

impl GltfLoader {
    pub fn new(root: AssetRoot) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &AssetRoot {
        &self.root
    }
}

impl AssetLoader for GltfLoader {
    fn load(&self, asset_ref: &str) -> LoadTicket {
        let (reporter, ticket) = LoadTicket::channel(asset_ref);
        let location = match self.root.resolve(asset_ref) {
            Ok(location) => location,
            Err(err) => return LoadTicket::failed(asset_ref, err),
        };
        let spawned = thread::Builder::new()
            .name("asset-load".to_string())
            .spawn(move || {
                let result = load_location(&location, &reporter);
                reporter.finish(result);
            });
        match spawned {
            Ok(_) => ticket,
            Err(err) => LoadTicket::failed(asset_ref, AssetError::Spawn(err)),
        }
    }
}

fn load_location(location: &AssetLocation, reporter: &LoadReporter) -> Result<SceneNode, AssetError> {
    let (label, bytes) = match location {
        AssetLocation::File(path) => {
            let label = path.display().to_string();
            let bytes = read_file(path, reporter).map_err(|source| AssetError::Read {
                path: label.clone(),
                source,
            })?;
            (label, bytes)
        }
        AssetLocation::Url(url) => (url.to_string(), fetch_url(url, reporter)?),
    };
    build_scene_node(&label, &bytes)
}

fn read_file(path: &Path, reporter: &LoadReporter) -> std::io::Result<Vec<u8>> {
    let file = std::fs::File::open(path)?;
    let total = file.metadata().ok().map(|meta| meta.len());
    read_with_progress(file, total, reporter)
}

fn fetch_url(url: &Url, reporter: &LoadReporter) -> Result<Vec<u8>, AssetError> {
    let response = ureq::get(url.as_str()).call().map_err(|err| AssetError::Fetch {
        url: url.to_string(),
        message: err.to_string(),
    })?;
    let total = response
        .header("Content-Length")
        .and_then(|value| value.parse::<u64>().ok());
    read_with_progress(response.into_reader(), total, reporter).map_err(|err| AssetError::Fetch {
        url: url.to_string(),
        message: err.to_string(),
    })
}

fn read_with_progress<R: Read>(
    mut reader: R,
    total: Option<u64>,
    reporter: &LoadReporter,
) -> std::io::Result<Vec<u8>> {
    // The reported length is untrusted.
    let reserve = total.map_or(0, |len| len.min(MAX_PREALLOC_BYTES)) as usize;
    let mut bytes = Vec::with_capacity(reserve);
    let mut chunk = vec![0u8; READ_CHUNK_BYTES];
    loop {
        let read = reader.read(&mut chunk)?;
        if read == 0 {
            break;
        }
        bytes.extend_from_slice(&chunk[..read]);
        reporter.progress(bytes.len() as u64, total);
    }
    Ok(bytes)
}

/// Parses glTF JSON or GLB bytes into a node tree rooted at a group named after `label`.
///
/// Only the document is read: mesh extents come from accessor min/max, so
/// external buffers and images are not fetched.
pub fn build_scene_node(label: &str, bytes: &[u8]) -> Result<SceneNode, AssetError> {
    let gltf = gltf::Gltf::from_slice(bytes).map_err(|err| AssetError::ParseGltf {
        path: label.to_string(),
        message: err.to_string(),
    })?;
    let scene = gltf
        .default_scene()
        .or_else(|| gltf.scenes().next())
        .ok_or_else(|| AssetError::EmptyScene {
            path: label.to_string(),
        })?;

    let name = Path::new(label)
        .file_stem()
        .and_then(|value| value.to_str())
        .unwrap_or("gltf");
    let mut root = SceneNode::group(name);
    root.children = scene.nodes().map(|node| convert_node(&node)).collect();
    Ok(root)
}

fn convert_node(node: &gltf::Node) -> SceneNode {
    let name = node
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("node_{}", node.index()));
    let (translation, rotation, scale) = node.transform().decomposed();
    let mut converted = SceneNode::group(&name);
    converted.transform = Transform::from_trs(translation, rotation, scale);
    converted.mesh = node.mesh().map(|mesh| mesh_info(&mesh));
    converted.children = node.children().map(|child| convert_node(&child)).collect();
    converted
}

fn mesh_info(mesh: &gltf::Mesh) -> MeshInfo {
    let mut bounds_min = Vec3::splat(f32::INFINITY);
    let mut bounds_max = Vec3::splat(f32::NEG_INFINITY);
    let mut vertex_count = 0;
    let mut primitive_count = 0;
    for primitive in mesh.primitives() {
        primitive_count += 1;
        // bounding_box() panics on primitives without positions.
        let Some(positions) = primitive.get(&gltf::Semantic::Positions) else {
            continue;
        };
        let bounds = primitive.bounding_box();
        bounds_min = bounds_min.min(Vec3::from_array(bounds.min));
        bounds_max = bounds_max.max(Vec3::from_array(bounds.max));
        vertex_count += positions.count();
    }
    if vertex_count == 0 {
        bounds_min = Vec3::ZERO;
        bounds_max = Vec3::ZERO;
    }
    MeshInfo {
        name: mesh
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("mesh_{}", mesh.index())),
        primitive_count,
        vertex_count,
        bounds_min,
        bounds_max,
    }
}

#[cfg(test)]
mod tests {
    use super::{build_scene_node, read_with_progress, GltfLoader};
    use crate::assets::{AssetError, AssetLoader, AssetRoot, LoadEvent, LoadTicket};
    use glam::Vec3;
    use std::time::{Duration, Instant};

    const PHONE_GLTF: &str = r#"{
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [ { "nodes": [0] } ],
        "nodes": [
            { "name": "Phone", "children": [1], "translation": [0.0, 1.0, 0.0] },
            { "name": "Body", "mesh": 0 }
        ],
        "meshes": [
            { "name": "BodyMesh", "primitives": [ { "attributes": { "POSITION": 0 } } ] }
        ],
        "accessors": [
            {
                "componentType": 5126,
                "count": 3,
                "type": "VEC3",
                "min": [-0.5, -1.0, -0.05],
                "max": [0.5, 1.0, 0.05]
            }
        ]
    }"#;

    fn wait_for_settle(ticket: &crate::assets::LoadTicket) -> LoadEvent {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            match ticket.try_next() {
                Some(LoadEvent::Progress { .. }) => continue,
                Some(event) => return event,
                None if Instant::now() > deadline => panic!("load never settled"),
                None => std::thread::sleep(Duration::from_millis(5)),
            }
        }
    }

    #[test]
    fn document_becomes_node_tree() {
        let root = build_scene_node("models/phone.gltf", PHONE_GLTF.as_bytes()).unwrap();
        assert_eq!(root.name, "phone");
        assert_eq!(root.children.len(), 1);

        let phone = &root.children[0];
        assert_eq!(phone.name, "Phone");
        assert_eq!(phone.transform.position, Vec3::new(0.0, 1.0, 0.0));
        assert!(!phone.is_mesh());

        let body = &phone.children[0];
        let mesh = body.mesh.as_ref().unwrap();
        assert_eq!(mesh.name, "BodyMesh");
        assert_eq!(mesh.vertex_count, 3);
        assert_eq!(mesh.bounds_min, Vec3::new(-0.5, -1.0, -0.05));
        assert_eq!(root.mesh_count(), 1);
    }

    #[test]
    fn invalid_bytes_are_parse_errors() {
        let result = build_scene_node("broken.glb", b"definitely not gltf");
        assert!(matches!(result, Err(AssetError::ParseGltf { .. })));
    }

    #[test]
    fn loader_reads_file_on_worker() {
        let mut dir = std::env::temp_dir();
        dir.push(format!("phoneview_gltf_{}", std::process::id()));
        std::fs::create_dir_all(dir.join("models")).unwrap();
        std::fs::write(dir.join("models/phone.gltf"), PHONE_GLTF).unwrap();

        let loader = GltfLoader::new(AssetRoot::Dir(dir.clone()));
        let ticket = loader.load("models/phone.gltf");
        match wait_for_settle(&ticket) {
            LoadEvent::Loaded(node) => assert_eq!(node.mesh_count(), 1),
            other => panic!("Expected Loaded, got {:?}", other),
        }

        let missing = loader.load("models/missing.glb");
        assert!(matches!(
            wait_for_settle(&missing),
            LoadEvent::Failed(AssetError::Read { .. })
        ));

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn oversized_length_hint_does_not_reserve_it() {
        let (reporter, ticket) = LoadTicket::channel("tiny.glb");
        let bytes = read_with_progress(&b"tiny"[..], Some(1u64 << 60), &reporter).unwrap();
        assert_eq!(bytes, b"tiny");
        assert!(bytes.capacity() <= super::MAX_PREALLOC_BYTES as usize);
        assert!(matches!(
            ticket.try_next(),
            Some(LoadEvent::Progress {
                loaded: 4,
                total: Some(_)
            })
        ));
    }

    #[test]
    fn unresolvable_reference_fails_the_ticket() {
        let loader = GltfLoader::new(AssetRoot::Url(
            url::Url::parse("http://localhost:5000/api/phones.json").unwrap(),
        ));
        let ticket = loader.load("http://[broken/a.glb");
        assert!(matches!(
            wait_for_settle(&ticket),
            LoadEvent::Failed(AssetError::InvalidUrl { .. })
        ));
    }
}
