use blocky_common::{Color, Transform};
use blocky_kernel::SceneNode;
use glam::Vec3;

/// Vertices in one unit-cube draw: 6 faces, 2 triangles each.
pub const UNIT_CUBE_VERTEX_COUNT: usize = 36;

/// Triangle list for the cube spanning `[0, 1]^3`, counter-clockwise when
/// seen from outside.
#[rustfmt::skip]
pub const UNIT_CUBE_VERTICES: [[f32; 3]; UNIT_CUBE_VERTEX_COUNT] = [
    // -Z
    [0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0],
    [0.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 0.0, 0.0],
    // +Z
    [0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 1.0],
    [0.0, 0.0, 1.0], [1.0, 1.0, 1.0], [0.0, 1.0, 1.0],
    // +Y
    [0.0, 1.0, 0.0], [0.0, 1.0, 1.0], [1.0, 1.0, 1.0],
    [0.0, 1.0, 0.0], [1.0, 1.0, 1.0], [1.0, 1.0, 0.0],
    // -Y
    [0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 1.0],
    [0.0, 0.0, 0.0], [1.0, 0.0, 1.0], [0.0, 0.0, 1.0],
    // -X
    [0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 1.0],
    [0.0, 0.0, 0.0], [0.0, 1.0, 1.0], [0.0, 1.0, 0.0],
    // +X
    [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 1.0, 1.0],
    [1.0, 0.0, 0.0], [1.0, 1.0, 1.0], [1.0, 0.0, 1.0],
];

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DrawError {
    #[error("no free draw slot this frame (capacity {capacity})")]
    SlotsExhausted { capacity: usize },
}

/// Immediate-mode sink for cube draws: the four shader symbols plus clear.
///
/// Calls arrive in frame order: `clear`, `set_global_rotation`, then per cube
/// `set_model_matrix`, `set_frag_color`, `draw_unit_cube`. Uniform values stay
/// bound until overwritten.
pub trait CubeTarget {
    /// Clear color and depth.
    fn clear(&mut self);
    fn set_global_rotation(&mut self, global: &Transform);
    fn set_model_matrix(&mut self, model: &Transform);
    fn set_frag_color(&mut self, color: Color);
    /// Draw the unit cube with the currently bound uniforms.
    fn draw_unit_cube(&mut self) -> Result<(), DrawError>;
}

/// A colored, transformed unit cube.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cube {
    pub matrix: Transform,
    pub color: Color,
}

impl Cube {
    pub fn new(matrix: Transform, color: Color) -> Self {
        Self { matrix, color }
    }

    pub fn from_node(node: &SceneNode) -> Self {
        Self::new(node.model, node.color)
    }

    /// Upload transform and color, then draw. A failed draw is logged and
    /// skipped. Returns whether the cube was drawn.
    pub fn render(&self, target: &mut impl CubeTarget) -> bool {
        target.set_model_matrix(&self.matrix);
        target.set_frag_color(self.color);
        match target.draw_unit_cube() {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("skipping cube draw: {e}");
                false
            }
        }
    }

    /// The 36 vertices as the vertex stage sees them: `global * model * v`.
    pub fn world_vertices(&self, global: &Transform) -> [Vec3; UNIT_CUBE_VERTEX_COUNT] {
        let m = global.then(&self.matrix);
        std::array::from_fn(|i| m.transform_point(Vec3::from_array(UNIT_CUBE_VERTICES[i])))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_cube_winding_faces_outward() {
        let center = Vec3::splat(0.5);
        for tri in UNIT_CUBE_VERTICES.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(Vec3::from_array);
            let normal = (b - a).cross(c - a);
            let outward = (a + b + c) / 3.0 - center;
            assert!(normal.dot(outward) > 0.0, "inward triangle {tri:?}");
        }
    }

    #[test]
    fn unit_cube_spans_zero_to_one() {
        let min = UNIT_CUBE_VERTICES
            .iter()
            .fold(Vec3::splat(f32::MAX), |acc, v| acc.min(Vec3::from_array(*v)));
        let max = UNIT_CUBE_VERTICES
            .iter()
            .fold(Vec3::splat(f32::MIN), |acc, v| acc.max(Vec3::from_array(*v)));
        assert_eq!(min, Vec3::ZERO);
        assert_eq!(max, Vec3::ONE);
    }

    #[test]
    fn composition_order_changes_vertices() {
        let mut translate_then_scale = Transform::IDENTITY;
        translate_then_scale.translate(0.5, -0.25, 0.1).scale(2.0, 3.0, 4.0);
        let mut scale_then_translate = Transform::IDENTITY;
        scale_then_translate.scale(2.0, 3.0, 4.0).translate(0.5, -0.25, 0.1);

        let a = Cube::new(translate_then_scale, Color::RED).world_vertices(&Transform::IDENTITY);
        let b = Cube::new(scale_then_translate, Color::RED).world_vertices(&Transform::IDENTITY);

        // Origin corner: T*S*0 = A, S*T*0 = S*A.
        assert_eq!(a[0], Vec3::new(0.5, -0.25, 0.1));
        assert_eq!(b[0], Vec3::new(1.0, -0.75, 0.4));
        assert_ne!(a, b);
    }

    #[test]
    fn global_rotation_applies_after_model() {
        let mut model = Transform::IDENTITY;
        model.translate(1.0, 0.0, 0.0);
        let mut global = Transform::IDENTITY;
        global.rotate(90.0, 0.0, 1.0, 0.0);

        let v = Cube::new(model, Color::WHITE).world_vertices(&global);
        // (0,0,0) -> model (1,0,0) -> rotate about Y (0,0,-1)
        assert!((v[0] - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-6);
    }
}
