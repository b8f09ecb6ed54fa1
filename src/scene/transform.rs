use crate::catalog::ModelDescriptor;
use crate::scene::SceneNode;

/// Applies the descriptor's scale, position and rotation to `node` and flags
/// every mesh in its subtree for shadow casting and receiving.
///
/// Returns the number of mesh nodes flagged.
pub fn apply_model_transform(descriptor: &ModelDescriptor, node: &mut SceneNode) -> usize {
    node.transform.scale = descriptor.scale.to_vec3();
    node.transform.position = descriptor.position;
    node.transform.rotation = descriptor.rotation;

    let mut flagged = 0;
    node.traverse_mut(&mut |child| {
        if child.is_mesh() {
            child.cast_shadow = true;
            child.receive_shadow = true;
            flagged += 1;
        }
    });
    flagged
}

#[cfg(test)]
mod tests {
    use super::apply_model_transform;
    use crate::catalog::{ModelDescriptor, ModelScale};
    use crate::scene::{MeshInfo, SceneNode};
    use glam::Vec3;
    use std::f32::consts::FRAC_PI_2;

    fn mesh(name: &str) -> SceneNode {
        SceneNode::mesh(
            name,
            MeshInfo {
                name: name.to_string(),
                primitive_count: 1,
                vertex_count: 3,
                bounds_min: Vec3::ZERO,
                bounds_max: Vec3::ONE,
            },
        )
    }

    fn phone_tree() -> SceneNode {
        SceneNode::group("phone")
            .with_child(mesh("body"))
            .with_child(SceneNode::group("camera_bump").with_child(mesh("lens")))
    }

    #[test]
    fn uniform_scale_and_yaw_are_applied() {
        let descriptor = ModelDescriptor::new("a", "A", "a.glb").with_transform(
            ModelScale::Uniform(3.0),
            Vec3::ZERO,
            Vec3::new(0.0, FRAC_PI_2, 0.0),
        );
        let mut node = phone_tree();

        let flagged = apply_model_transform(&descriptor, &mut node);

        assert_eq!(flagged, 2);
        assert_eq!(node.transform.scale, Vec3::new(3.0, 3.0, 3.0));
        assert_eq!(node.transform.position, Vec3::ZERO);
        assert_eq!(node.transform.rotation, Vec3::new(0.0, FRAC_PI_2, 0.0));
        node.traverse(&mut |child| {
            assert_eq!(child.cast_shadow, child.is_mesh(), "{}", child.name);
            assert_eq!(child.receive_shadow, child.is_mesh(), "{}", child.name);
        });
    }

    #[test]
    fn per_axis_scale_and_position_are_absolute() {
        let descriptor = ModelDescriptor::new("b", "B", "b.glb").with_transform(
            ModelScale::PerAxis {
                x: 1.0,
                y: 2.0,
                z: 0.5,
            },
            Vec3::new(0.0, -3.0, 0.0),
            Vec3::ZERO,
        );
        let mut node = phone_tree();
        node.transform.position = Vec3::new(9.0, 9.0, 9.0);
        node.transform.rotation = Vec3::new(1.0, 1.0, 1.0);

        apply_model_transform(&descriptor, &mut node);
        let once = node.clone();
        apply_model_transform(&descriptor, &mut node);

        assert_eq!(node.transform.position, Vec3::new(0.0, -3.0, 0.0));
        assert_eq!(node.transform.rotation, Vec3::ZERO);
        assert_eq!(node.transform.scale, Vec3::new(1.0, 2.0, 0.5));
        assert_eq!(node, once);
    }

    #[test]
    fn child_transforms_are_untouched() {
        let descriptor = ModelDescriptor::new("c", "C", "c.glb");
        let mut node = phone_tree();
        node.children[0].transform.position = Vec3::new(0.0, 0.1, 0.0);
        apply_model_transform(&descriptor, &mut node);
        assert_eq!(node.children[0].transform.position, Vec3::new(0.0, 0.1, 0.0));
    }
}
