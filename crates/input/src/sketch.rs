use blocky_common::Color;
use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShapeKind {
    #[default]
    Point,
    Triangle,
    Circle,
}

/// Current sketch selection. Snapshotted into each record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SketchBrush {
    pub kind: ShapeKind,
    pub color: Color,
    pub size: f32,
}

impl Default for SketchBrush {
    fn default() -> Self {
        Self {
            kind: ShapeKind::Point,
            color: Color::WHITE,
            size: 5.0,
        }
    }
}

/// One pointer-placed shape, in clip-space coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeRecord {
    pub kind: ShapeKind,
    pub color: Color,
    pub size: f32,
    pub coords: Vec2,
}

/// Append-only list of sketch shapes.
#[derive(Debug, Clone, Default)]
pub struct ShapeList {
    shapes: Vec<ShapeRecord>,
}

impl ShapeList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record stamped with the brush as it is right now.
    pub fn push(&mut self, brush: &SketchBrush, coords: Vec2) -> &ShapeRecord {
        self.shapes.push(ShapeRecord {
            kind: brush.kind,
            color: brush.color,
            size: brush.size,
            coords,
        });
        &self.shapes[self.shapes.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn shapes(&self) -> &[ShapeRecord] {
        &self.shapes
    }
}
