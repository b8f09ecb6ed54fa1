pub mod serialization;

use glam::Vec3;
use std::collections::HashMap;
use std::f32::consts::FRAC_PI_2;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog has no usable models: {reason}")]
    EmptyCatalog { reason: String },
    #[error("duplicate model id in catalog: {0}")]
    DuplicateModel(String),
    #[error("model {id} has a non-positive scale")]
    InvalidScale { id: String },
    #[error("failed to read catalog at {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to fetch catalog from {url}: {message}")]
    Fetch { url: String, message: String },
}

/// Uniform or per-axis model scale.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum ModelScale {
    Uniform(f32),
    PerAxis { x: f32, y: f32, z: f32 },
}

impl ModelScale {
    pub fn to_vec3(self) -> Vec3 {
        match self {
            ModelScale::Uniform(value) => Vec3::splat(value),
            ModelScale::PerAxis { x, y, z } => Vec3::new(x, y, z),
        }
    }

    pub fn is_positive(self) -> bool {
        let v = self.to_vec3();
        v.x > 0.0 && v.y > 0.0 && v.z > 0.0 && v.is_finite()
    }
}

impl Default for ModelScale {
    fn default() -> Self {
        ModelScale::Uniform(1.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpecItem {
    pub label: String,
    pub value: String,
}

/// Immutable catalog entry describing one displayable model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDescriptor {
    pub id: String,
    pub name: String,
    pub description: String,
    pub specs: Vec<SpecItem>,
    pub asset_ref: String,
    pub scale: ModelScale,
    pub position: Vec3,
    /// Euler angles in radians, applied in XYZ order.
    pub rotation: Vec3,
}

impl ModelDescriptor {
    pub fn new(id: &str, name: &str, asset_ref: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            specs: Vec::new(),
            asset_ref: asset_ref.to_string(),
            scale: ModelScale::default(),
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_spec(mut self, label: &str, value: &str) -> Self {
        self.specs.push(SpecItem {
            label: label.to_string(),
            value: value.to_string(),
        });
        self
    }

    pub fn with_transform(mut self, scale: ModelScale, position: Vec3, rotation: Vec3) -> Self {
        self.scale = scale;
        self.position = position;
        self.rotation = rotation;
        self
    }
}

/// Ordered, id-indexed set of model descriptors. Never empty.
#[derive(Debug, Clone)]
pub struct Catalog {
    models: Vec<ModelDescriptor>,
    index: HashMap<String, usize>,
}

impl Catalog {
    pub fn new(models: Vec<ModelDescriptor>) -> Result<Self, CatalogError> {
        if models.is_empty() {
            return Err(CatalogError::EmptyCatalog {
                reason: "models list is empty".to_string(),
            });
        }
        let mut index = HashMap::with_capacity(models.len());
        for (position, model) in models.iter().enumerate() {
            if !model.scale.is_positive() {
                return Err(CatalogError::InvalidScale {
                    id: model.id.clone(),
                });
            }
            if index.insert(model.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateModel(model.id.clone()));
            }
        }
        Ok(Self { models, index })
    }

    pub fn models(&self) -> &[ModelDescriptor] {
        &self.models
    }

    pub fn get(&self, id: &str) -> Option<&ModelDescriptor> {
        self.index.get(id).map(|&position| &self.models[position])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn first(&self) -> &ModelDescriptor {
        &self.models[0]
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }
}

/// The three phones shipped with the viewer, resolved relative to the working directory.
pub fn builtin_models() -> Vec<ModelDescriptor> {
    vec![
        ModelDescriptor::new(
            "iphone_16_pro_max",
            "iPhone 16 Pro Max",
            "models/iphone_16_pro_max.glb",
        )
        .with_description(
            "The latest iPhone, with a powerful processor and a pro-grade camera system.",
        )
        .with_transform(
            ModelScale::Uniform(3.0),
            Vec3::ZERO,
            Vec3::new(0.0, FRAC_PI_2, 0.0),
        ),
        ModelDescriptor::new(
            "samsung_galaxy_s22_ultra",
            "Samsung Galaxy S22 Ultra",
            "models/samsung_galaxy_s22_ultra.glb",
        )
        .with_description("Samsung's flagship, with an S Pen stylus and a 108MP camera.")
        .with_transform(
            ModelScale::Uniform(1.1),
            Vec3::new(0.0, -3.0, 0.0),
            Vec3::ZERO,
        ),
        ModelDescriptor::new(
            "Samsung_Galaxy_Z_Flip_3",
            "Samsung Galaxy Z Flip 3",
            "models/Samsung_Galaxy_Z_Flip_3.glb",
        )
        .with_description("A foldable phone that pairs a retro flip design with modern hardware.")
        .with_transform(ModelScale::Uniform(6.0), Vec3::ZERO, Vec3::ZERO),
    ]
}
