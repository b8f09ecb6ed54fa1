use crate::render::OrbitCamera;
use crate::scene::{box_corners, SceneNode};
use egui::{Color32, Pos2, Rect, Shape, Stroke};
use glam::{Mat4, Vec3};

const MAX_MESH_BOXES: usize = 512;

const BOX_EDGES: [(usize, usize); 12] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 0),
    (4, 5),
    (5, 6),
    (6, 7),
    (7, 4),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

/// Projects a world-space point into `rect`. None when behind the near plane.
pub fn project_to_rect(view_proj: Mat4, point: Vec3, rect: Rect) -> Option<Pos2> {
    let clip = view_proj * point.extend(1.0);
    if clip.w <= 1e-4 {
        return None;
    }
    let ndc = clip.truncate() / clip.w;
    Some(Pos2::new(
        rect.left() + (ndc.x + 1.0) * 0.5 * rect.width(),
        rect.top() + (1.0 - ndc.y) * 0.5 * rect.height(),
    ))
}

/// Wireframe of every mesh bounding box in `node`, as seen by `camera`.
pub fn model_wireframe(node: &SceneNode, camera: &OrbitCamera, rect: Rect) -> Vec<Shape> {
    let view_proj = camera.view_projection();
    let stroke = Stroke::new(1.0, Color32::from_rgb(44, 62, 80));
    let mut shapes = Vec::new();
    for (min, max) in node.world_mesh_bounds().into_iter().take(MAX_MESH_BOXES) {
        let projected = box_corners(min, max).map(|corner| project_to_rect(view_proj, corner, rect));
        for (a, b) in BOX_EDGES {
            if let (Some(a), Some(b)) = (projected[a], projected[b]) {
                shapes.push(Shape::line_segment([a, b], stroke));
            }
        }
    }
    shapes
}
