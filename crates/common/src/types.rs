use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Linear RGBA color, components nominally in `0.0..=1.0`.
///
/// Values are passed to the fragment stage as-is; nothing clamps them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    pub const RED: Self = Self::new(1.0, 0.0, 0.0, 1.0);
    pub const YELLOW: Self = Self::new(1.0, 1.0, 0.0, 1.0);
    pub const MAGENTA: Self = Self::new(1.0, 0.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// A single step of a transform chain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TransformOp {
    Translate(Vec3),
    /// Rotation in degrees about an axis (need not be normalized).
    Rotate { degrees: f32, axis: Vec3 },
    Scale(Vec3),
}

impl TransformOp {
    pub fn translate(x: f32, y: f32, z: f32) -> Self {
        Self::Translate(Vec3::new(x, y, z))
    }

    pub fn rotate(degrees: f32, x: f32, y: f32, z: f32) -> Self {
        Self::Rotate {
            degrees,
            axis: Vec3::new(x, y, z),
        }
    }

    pub fn scale(x: f32, y: f32, z: f32) -> Self {
        Self::Scale(Vec3::new(x, y, z))
    }
}

/// Affine 4x4 model transform.
///
/// Composition is right-multiplicative: every call post-multiplies the
/// accumulated matrix, so an operation applied later acts on local vertices
/// *before* the operations applied earlier. `Transform` is `Copy`; copying one
/// forks its lineage and never aliases the original.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    matrix: Mat4,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        matrix: Mat4::IDENTITY,
    };

    pub fn from_mat4(matrix: Mat4) -> Self {
        Self { matrix }
    }

    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    /// Replace the whole matrix with a pure translation.
    pub fn set_translate(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.matrix = Mat4::from_translation(Vec3::new(x, y, z));
        self
    }

    pub fn translate(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.matrix *= Mat4::from_translation(Vec3::new(x, y, z));
        self
    }

    /// Rotate by `degrees` about `(x, y, z)`. A zero-length axis is a no-op.
    pub fn rotate(&mut self, degrees: f32, x: f32, y: f32, z: f32) -> &mut Self {
        if let Some(axis) = Vec3::new(x, y, z).try_normalize() {
            self.matrix *= Mat4::from_axis_angle(axis, degrees.to_radians());
        }
        self
    }

    pub fn scale(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.matrix *= Mat4::from_scale(Vec3::new(x, y, z));
        self
    }

    pub fn apply(&mut self, op: TransformOp) -> &mut Self {
        match op {
            TransformOp::Translate(v) => self.translate(v.x, v.y, v.z),
            TransformOp::Rotate { degrees, axis } => self.rotate(degrees, axis.x, axis.y, axis.z),
            TransformOp::Scale(v) => self.scale(v.x, v.y, v.z),
        }
    }

    pub fn apply_all(&mut self, ops: &[TransformOp]) -> &mut Self {
        for op in ops {
            self.apply(*op);
        }
        self
    }

    /// `self * other`: `other` acts first.
    pub fn then(&self, other: &Transform) -> Transform {
        Transform::from_mat4(self.matrix * other.matrix)
    }

    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.matrix.transform_point3(point)
    }

    /// Flat column-major element buffer, the layout shader uniforms expect.
    pub fn elements(&self) -> [f32; 16] {
        self.matrix.to_cols_array()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.matrix(), Mat4::IDENTITY);
        assert_eq!(t.transform_point(Vec3::new(1.0, 2.0, 3.0)), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn later_operations_apply_first() {
        let mut t = Transform::IDENTITY;
        t.translate(1.0, 0.0, 0.0).scale(2.0, 2.0, 2.0);
        // scale first, then translate
        assert_eq!(t.transform_point(Vec3::ONE), Vec3::new(3.0, 2.0, 2.0));
    }

    #[test]
    fn set_translate_discards_previous_state() {
        let mut t = Transform::IDENTITY;
        t.scale(5.0, 5.0, 5.0).set_translate(0.0, -0.5, 0.0);
        assert_eq!(t.transform_point(Vec3::ZERO), Vec3::new(0.0, -0.5, 0.0));
        assert_eq!(t.transform_point(Vec3::X), Vec3::new(1.0, -0.5, 0.0));
    }

    #[test]
    fn rotate_uses_degrees() {
        let mut t = Transform::IDENTITY;
        t.rotate(90.0, 0.0, 0.0, 1.0);
        let p = t.transform_point(Vec3::X);
        assert!((p - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn rotate_about_zero_axis_is_noop() {
        let mut t = Transform::IDENTITY;
        t.rotate(30.0, 0.0, 0.0, 0.0);
        assert_eq!(t, Transform::IDENTITY);
    }

    #[test]
    fn copies_do_not_alias() {
        let mut parent = Transform::IDENTITY;
        parent.translate(0.0, 1.0, 0.0);
        let before = parent.elements();

        let mut child = parent;
        child.scale(3.0, 3.0, 3.0);

        assert_eq!(parent.elements(), before);
        assert_ne!(child.elements(), before);
    }

    #[test]
    fn apply_all_matches_chained_calls() {
        let mut a = Transform::IDENTITY;
        a.apply_all(&[
            TransformOp::translate(0.0, 0.65, 0.0),
            TransformOp::rotate(20.0, 0.0, 0.0, 1.0),
            TransformOp::scale(0.3, 0.3, 0.3),
        ]);
        let mut b = Transform::IDENTITY;
        b.translate(0.0, 0.65, 0.0)
            .rotate(20.0, 0.0, 0.0, 1.0)
            .scale(0.3, 0.3, 0.3);
        assert_eq!(a.elements(), b.elements());
    }

    #[test]
    fn elements_are_column_major() {
        let mut t = Transform::IDENTITY;
        t.translate(4.0, 5.0, 6.0);
        let e = t.elements();
        assert_eq!(&e[12..15], &[4.0, 5.0, 6.0]);
    }
}
