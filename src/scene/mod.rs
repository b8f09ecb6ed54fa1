pub mod transform;

pub use transform::apply_model_transform;

use glam::{EulerRot, Mat4, Quat, Vec3};

/// Local transform of a scene-graph node. Rotation is Euler XYZ in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: Vec3::ONE,
    };

    pub fn from_trs(translation: [f32; 3], rotation: [f32; 4], scale: [f32; 3]) -> Self {
        let (x, y, z) = Quat::from_array(rotation).to_euler(EulerRot::XYZ);
        Self {
            position: Vec3::from_array(translation),
            rotation: Vec3::new(x, y, z),
            scale: Vec3::from_array(scale),
        }
    }

    pub fn matrix(&self) -> Mat4 {
        compose_transform_matrix(self.position, self.rotation, self.scale)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Geometry summary of a mesh node; vertex data stays with the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshInfo {
    pub name: String,
    pub primitive_count: usize,
    pub vertex_count: usize,
    pub bounds_min: Vec3,
    pub bounds_max: Vec3,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub name: String,
    pub transform: Transform,
    pub mesh: Option<MeshInfo>,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn group(name: &str) -> Self {
        Self {
            name: name.to_string(),
            transform: Transform::IDENTITY,
            mesh: None,
            cast_shadow: false,
            receive_shadow: false,
            children: Vec::new(),
        }
    }

    pub fn mesh(name: &str, mesh: MeshInfo) -> Self {
        Self {
            mesh: Some(mesh),
            ..Self::group(name)
        }
    }

    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn is_mesh(&self) -> bool {
        self.mesh.is_some()
    }

    /// Depth-first visit of this node and all descendants.
    pub fn traverse<F: FnMut(&SceneNode)>(&self, visit: &mut F) {
        visit(self);
        for child in &self.children {
            child.traverse(visit);
        }
    }

    pub fn traverse_mut<F: FnMut(&mut SceneNode)>(&mut self, visit: &mut F) {
        visit(self);
        for child in &mut self.children {
            child.traverse_mut(visit);
        }
    }

    pub fn mesh_count(&self) -> usize {
        let mut count = 0;
        self.traverse(&mut |node| {
            if node.is_mesh() {
                count += 1;
            }
        });
        count
    }

    /// World-space bounding boxes of every mesh in the subtree, as (min, max) pairs.
    pub fn world_mesh_bounds(&self) -> Vec<(Vec3, Vec3)> {
        let mut out = Vec::new();
        collect_world_bounds(self, Mat4::IDENTITY, &mut out);
        out
    }
}

fn collect_world_bounds(node: &SceneNode, parent: Mat4, out: &mut Vec<(Vec3, Vec3)>) {
    let world = parent * node.transform.matrix();
    if let Some(mesh) = &node.mesh {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for corner in box_corners(mesh.bounds_min, mesh.bounds_max) {
            let p = world.transform_point3(corner);
            min = min.min(p);
            max = max.max(p);
        }
        if min.is_finite() && max.is_finite() {
            out.push((min, max));
        }
    }
    for child in &node.children {
        collect_world_bounds(child, world, out);
    }
}

pub fn box_corners(min: Vec3, max: Vec3) -> [Vec3; 8] {
    [
        Vec3::new(min.x, min.y, min.z),
        Vec3::new(max.x, min.y, min.z),
        Vec3::new(max.x, max.y, min.z),
        Vec3::new(min.x, max.y, min.z),
        Vec3::new(min.x, min.y, max.z),
        Vec3::new(max.x, min.y, max.z),
        Vec3::new(max.x, max.y, max.z),
        Vec3::new(min.x, max.y, max.z),
    ]
}

/// Scene light. Colors are linear RGB; positions are world space.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Light {
    Ambient {
        color: [f32; 3],
        intensity: f32,
    },
    Directional {
        color: [f32; 3],
        intensity: f32,
        position: [f32; 3],
        #[serde(default)]
        cast_shadow: bool,
    },
    Point {
        color: [f32; 3],
        intensity: f32,
        position: [f32; 3],
    },
}

impl Light {
    pub fn intensity(&self) -> f32 {
        match self {
            Light::Ambient { intensity, .. }
            | Light::Directional { intensity, .. }
            | Light::Point { intensity, .. } => *intensity,
        }
    }

    pub fn casts_shadow(&self) -> bool {
        matches!(self, Light::Directional { cast_shadow: true, .. })
    }
}

/// White ambient fill, a shadow-casting key light and a dim point light on the left.
pub fn default_lights() -> Vec<Light> {
    vec![
        Light::Ambient {
            color: [1.0; 3],
            intensity: 0.7,
        },
        Light::Directional {
            color: [1.0; 3],
            intensity: 1.0,
            position: [5.0, 5.0, 5.0],
            cast_shadow: true,
        },
        Light::Point {
            color: [1.0; 3],
            intensity: 0.5,
            position: [-5.0, 0.0, 5.0],
        },
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle(u64);

/// Scene graph the viewer mutates. Holds at most one attached model.
#[derive(Debug)]
pub struct SceneHost {
    background: [f32; 3],
    lights: Vec<Light>,
    model: Option<(NodeHandle, SceneNode)>,
    next_handle: u64,
}

impl SceneHost {
    pub fn new(background: [f32; 3], lights: Vec<Light>) -> Self {
        Self {
            background,
            lights,
            model: None,
            next_handle: 1,
        }
    }

    pub fn background(&self) -> [f32; 3] {
        self.background
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// True when some light casts shadows onto the flagged meshes.
    pub fn has_shadow_caster(&self) -> bool {
        self.lights.iter().any(Light::casts_shadow)
    }

    /// Attaches `node`, returning any model that was attached before it.
    pub fn attach(&mut self, node: SceneNode) -> (NodeHandle, Option<SceneNode>) {
        let handle = NodeHandle(self.next_handle);
        self.next_handle += 1;
        let previous = self.model.replace((handle, node)).map(|(_, node)| node);
        (handle, previous)
    }

    pub fn detach(&mut self, handle: NodeHandle) -> Option<SceneNode> {
        match &self.model {
            Some((attached, _)) if *attached == handle => self.model.take().map(|(_, node)| node),
            _ => None,
        }
    }

    pub fn node(&self, handle: NodeHandle) -> Option<&SceneNode> {
        match &self.model {
            Some((attached, node)) if *attached == handle => Some(node),
            _ => None,
        }
    }

    pub fn node_mut(&mut self, handle: NodeHandle) -> Option<&mut SceneNode> {
        match &mut self.model {
            Some((attached, node)) if *attached == handle => Some(node),
            _ => None,
        }
    }

    pub fn attached_count(&self) -> usize {
        usize::from(self.model.is_some())
    }
}

pub fn compose_transform_matrix(position: Vec3, rotation: Vec3, scale: Vec3) -> Mat4 {
    let rotation = Quat::from_euler(EulerRot::XYZ, rotation.x, rotation.y, rotation.z);
    Mat4::from_scale_rotation_translation(scale, rotation, position)
}

#[cfg(test)]
mod tests {
    use super::{
        compose_transform_matrix, default_lights, Light, MeshInfo, SceneHost, SceneNode, Transform,
    };
    use glam::Vec3;

    fn unit_mesh(name: &str) -> SceneNode {
        SceneNode::mesh(
            name,
            MeshInfo {
                name: name.to_string(),
                primitive_count: 1,
                vertex_count: 8,
                bounds_min: Vec3::splat(-1.0),
                bounds_max: Vec3::splat(1.0),
            },
        )
    }

    #[test]
    fn attach_replaces_previous_model() {
        let mut host = SceneHost::new([0.9, 0.9, 0.9], Vec::new());
        let (first, previous) = host.attach(SceneNode::group("first"));
        assert!(previous.is_none());
        let (second, previous) = host.attach(SceneNode::group("second"));
        assert_eq!(previous.unwrap().name, "first");
        assert_eq!(host.attached_count(), 1);
        assert!(host.node(first).is_none());
        assert_eq!(host.node(second).unwrap().name, "second");
    }

    #[test]
    fn detach_with_stale_handle_is_ignored() {
        let mut host = SceneHost::new([0.0; 3], Vec::new());
        let (first, _) = host.attach(SceneNode::group("first"));
        let (second, _) = host.attach(SceneNode::group("second"));
        assert!(host.detach(first).is_none());
        assert_eq!(host.attached_count(), 1);
        assert_eq!(host.detach(second).unwrap().name, "second");
        assert_eq!(host.attached_count(), 0);
    }

    #[test]
    fn world_bounds_follow_parent_transform() {
        let mut root = SceneNode::group("root").with_child(unit_mesh("body"));
        root.transform.scale = Vec3::splat(2.0);
        root.transform.position = Vec3::new(0.0, 5.0, 0.0);
        let bounds = root.world_mesh_bounds();
        assert_eq!(bounds.len(), 1);
        let (min, max) = bounds[0];
        assert!((min - Vec3::new(-2.0, 3.0, -2.0)).length() < 1e-5);
        assert!((max - Vec3::new(2.0, 7.0, 2.0)).length() < 1e-5);
    }

    #[test]
    fn quaternion_import_round_trips_yaw() {
        let half = std::f32::consts::FRAC_PI_4;
        let transform = Transform::from_trs([1.0, 2.0, 3.0], [0.0, half.sin(), 0.0, half.cos()], [1.0; 3]);
        assert!((transform.rotation.y - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
        assert!(transform.rotation.x.abs() < 1e-5);
        assert_eq!(transform.position, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn compose_matrix_places_origin_at_position() {
        let m = compose_transform_matrix(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.3, 0.2, 0.1), Vec3::ONE);
        let origin = m.transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(1.0, 2.0, 3.0)).length() < 1e-6);
    }

    #[test]
    fn default_rig_has_one_shadow_caster() {
        let host = SceneHost::new([0.9, 0.9, 0.9], default_lights());
        assert_eq!(host.lights().len(), 3);
        assert!(host.has_shadow_caster());
        assert_eq!(host.lights().iter().filter(|light| light.casts_shadow()).count(), 1);
        assert!(!SceneHost::new([0.0; 3], Vec::new()).has_shadow_caster());
    }

    #[test]
    fn lights_deserialize_by_kind() {
        let lights: Vec<Light> = serde_json::from_str(
            r#"[
                { "kind": "ambient", "color": [1, 1, 1], "intensity": 0.4 },
                { "kind": "point", "color": [1, 0.5, 0], "intensity": 2, "position": [0, 3, 0] }
            ]"#,
        )
        .unwrap();
        assert_eq!(lights.len(), 2);
        assert_eq!(lights[0].intensity(), 0.4);
        match &lights[1] {
            Light::Point { position, .. } => assert_eq!(*position, [0.0, 3.0, 0.0]),
            other => panic!("Expected point light, got {:?}", other),
        }
    }
}
