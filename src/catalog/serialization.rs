use crate::assets::AssetRoot;
use crate::catalog::{CatalogError, ModelDescriptor, ModelScale, SpecItem};
use glam::Vec3;
use std::io::Read;
use std::path::Path;
use url::Url;

pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Debug, Clone, Copy, Default, serde::Serialize, serde::Deserialize)]
pub struct VectorData {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl From<VectorData> for Vec3 {
    fn from(value: VectorData) -> Self {
        Vec3::new(value.x, value.y, value.z)
    }
}

/// One entry of a catalog document, as written on disk.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ModelEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub specs: Option<serde_json::Map<String, serde_json::Value>>,
    pub path: String,
    #[serde(default)]
    pub scale: ModelScale,
    #[serde(default)]
    pub position: VectorData,
    #[serde(default)]
    pub rotation: VectorData,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CatalogDocument {
    pub models: Vec<ModelEntry>,
}

/// Parsed catalog plus the root its relative asset paths resolve against.
#[derive(Debug, Clone)]
pub struct CatalogSource {
    pub models: Vec<ModelDescriptor>,
    pub root: AssetRoot,
}

impl From<ModelEntry> for ModelDescriptor {
    fn from(entry: ModelEntry) -> Self {
        let specs = entry
            .specs
            .unwrap_or_default()
            .into_iter()
            .map(|(label, value)| SpecItem {
                label,
                value: match value {
                    serde_json::Value::String(text) => text,
                    other => other.to_string(),
                },
            })
            .collect();
        ModelDescriptor {
            id: entry.id,
            name: entry.name,
            description: entry.description,
            specs,
            asset_ref: entry.path,
            scale: entry.scale,
            position: entry.position.into(),
            rotation: entry.rotation.into(),
        }
    }
}

pub fn parse_catalog(json: &str) -> Result<Vec<ModelDescriptor>> {
    let document: CatalogDocument =
        serde_json::from_str(json).map_err(|err| CatalogError::EmptyCatalog {
            reason: format!("catalog document did not parse: {err}"),
        })?;
    if document.models.is_empty() {
        return Err(CatalogError::EmptyCatalog {
            reason: "document has an empty models array".to_string(),
        });
    }
    Ok(document.models.into_iter().map(ModelDescriptor::from).collect())
}

pub fn load_catalog_from_file(path: &Path) -> Result<CatalogSource> {
    let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let models = parse_catalog(&json)?;
    let root = path
        .parent()
        .map(|dir| AssetRoot::Dir(dir.to_path_buf()))
        .unwrap_or_default();
    Ok(CatalogSource { models, root })
}

pub fn fetch_catalog(url: &str) -> Result<CatalogSource> {
    let document_url = Url::parse(url).map_err(|err| CatalogError::Fetch {
        url: url.to_string(),
        message: err.to_string(),
    })?;
    let response = ureq::get(document_url.as_str()).call().map_err(|err| CatalogError::Fetch {
        url: url.to_string(),
        message: err.to_string(),
    })?;
    let mut json = String::new();
    response
        .into_reader()
        .read_to_string(&mut json)
        .map_err(|err| CatalogError::Fetch {
            url: url.to_string(),
            message: err.to_string(),
        })?;
    let models = parse_catalog(&json)?;
    Ok(CatalogSource {
        models,
        root: AssetRoot::Url(document_url),
    })
}

/// Loads a catalog from a file path or an `http(s)://` URL.
pub fn load_catalog(location: &str) -> Result<CatalogSource> {
    if is_remote(location) {
        fetch_catalog(location)
    } else {
        load_catalog_from_file(Path::new(location))
    }
}

pub fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::{load_catalog_from_file, parse_catalog};
    use crate::assets::AssetRoot;
    use crate::catalog::{CatalogError, ModelScale};
    use glam::Vec3;

    const PHONES_JSON: &str = r#"{
        "models": [
            {
                "id": "iphone_16_pro_max",
                "name": "iPhone 16 Pro Max",
                "description": "Flagship",
                "specs": { "Display": "6.9 inch", "Chip": "A18 Pro", "Weight": 227 },
                "path": "models/iphone_16_pro_max.glb",
                "scale": 3,
                "position": { "x": 0, "y": 0, "z": 0 },
                "rotation": { "x": 0, "y": 1.5707964, "z": 0 }
            },
            {
                "id": "flip",
                "name": "Flip",
                "path": "models/flip.glb",
                "scale": { "x": 1, "y": 2, "z": 1 },
                "position": { "x": 0, "y": -3, "z": 0 }
            }
        ]
    }"#;

    #[test]
    fn parse_document_with_specs() {
        let models = parse_catalog(PHONES_JSON).unwrap();
        assert_eq!(models.len(), 2);

        let iphone = &models[0];
        assert_eq!(iphone.asset_ref, "models/iphone_16_pro_max.glb");
        assert_eq!(iphone.scale, ModelScale::Uniform(3.0));
        assert_eq!(iphone.rotation, Vec3::new(0.0, 1.5707964, 0.0));
        let labels: Vec<&str> = iphone.specs.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, ["Display", "Chip", "Weight"]);
        assert_eq!(iphone.specs[2].value, "227");

        let flip = &models[1];
        assert!(flip.specs.is_empty());
        assert_eq!(flip.description, "");
        assert_eq!(flip.position, Vec3::new(0.0, -3.0, 0.0));
        assert_eq!(flip.rotation, Vec3::ZERO);
        assert_eq!(
            flip.scale,
            ModelScale::PerAxis {
                x: 1.0,
                y: 2.0,
                z: 1.0
            }
        );
    }

    #[test]
    fn empty_models_is_empty_catalog() {
        let result = parse_catalog(r#"{ "models": [] }"#);
        assert!(matches!(result, Err(CatalogError::EmptyCatalog { .. })));
    }

    #[test]
    fn garbage_is_empty_catalog() {
        let result = parse_catalog("<html>not json</html>");
        assert!(matches!(result, Err(CatalogError::EmptyCatalog { .. })));
    }

    #[test]
    fn load_from_file_sets_asset_root() {
        let mut dir = std::env::temp_dir();
        dir.push(format!("phoneview_catalog_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("phones.json");
        std::fs::write(&path, PHONES_JSON).unwrap();

        let source = load_catalog_from_file(&path).unwrap();
        assert_eq!(source.models.len(), 2);
        match &source.root {
            AssetRoot::Dir(root) => assert_eq!(root, &dir),
            other => panic!("Expected directory root, got {:?}", other),
        }

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn missing_file_is_read_error() {
        let path = std::env::temp_dir().join("phoneview_definitely_missing.json");
        assert!(matches!(
            load_catalog_from_file(&path),
            Err(CatalogError::Read { .. })
        ));
    }

    #[test]
    fn malformed_catalog_url_is_fetch_error() {
        assert!(matches!(
            super::fetch_catalog("http://[broken/phones.json"),
            Err(CatalogError::Fetch { .. })
        ));
    }
}
