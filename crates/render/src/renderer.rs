use crate::cube::{CubeTarget, DrawError};
use blocky_common::{Color, Transform};
use std::fmt::Write;

/// One recorded cube draw with the uniforms bound at the time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawRecord {
    pub global: Transform,
    pub model: Transform,
    pub color: Color,
}

/// Debug text renderer: a [`CubeTarget`] that records draws instead of
/// rasterizing them.
///
/// Used by the CLI and by tests of the frame loop. An optional slot limit
/// makes `draw_unit_cube` fail once exceeded, like an exhausted GPU slot pool.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    global: Transform,
    model: Transform,
    color: Color,
    draws: Vec<DrawRecord>,
    clears: u64,
    slot_limit: Option<usize>,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slot_limit(limit: usize) -> Self {
        Self {
            slot_limit: Some(limit),
            ..Self::default()
        }
    }

    /// Draws since the last clear.
    pub fn draws(&self) -> &[DrawRecord] {
        &self.draws
    }

    pub fn clear_count(&self) -> u64 {
        self.clears
    }

    /// Human-readable dump of the current frame's draws.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== Frame (clears={}) ===", self.clears);
        let _ = writeln!(out, "Draws: {}", self.draws.len());
        for (i, draw) in self.draws.iter().enumerate() {
            let c = draw.color;
            let _ = writeln!(
                out,
                "  [{i}] color=({:.2}, {:.2}, {:.2}, {:.2})",
                c.r, c.g, c.b, c.a
            );
            let e = draw.model.elements();
            for col in e.chunks(4) {
                let _ = writeln!(
                    out,
                    "      {:>8.4} {:>8.4} {:>8.4} {:>8.4}",
                    col[0], col[1], col[2], col[3]
                );
            }
        }
        out
    }
}

impl CubeTarget for DebugTextRenderer {
    fn clear(&mut self) {
        self.draws.clear();
        self.clears += 1;
    }

    fn set_global_rotation(&mut self, global: &Transform) {
        self.global = *global;
    }

    fn set_model_matrix(&mut self, model: &Transform) {
        self.model = *model;
    }

    fn set_frag_color(&mut self, color: Color) {
        self.color = color;
    }

    fn draw_unit_cube(&mut self) -> Result<(), DrawError> {
        if let Some(capacity) = self.slot_limit {
            if self.draws.len() >= capacity {
                return Err(DrawError::SlotsExhausted { capacity });
            }
        }
        self.draws.push(DrawRecord {
            global: self.global,
            model: self.model,
            color: self.color,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube::Cube;

    #[test]
    fn debug_renderer_empty_frame() {
        let mut renderer = DebugTextRenderer::new();
        renderer.clear();
        let output = renderer.render_text();
        assert!(output.contains("clears=1"));
        assert!(output.contains("Draws: 0"));
    }

    #[test]
    fn records_bound_uniforms() {
        let mut renderer = DebugTextRenderer::new();
        let mut global = Transform::IDENTITY;
        global.rotate(30.0, 0.0, 1.0, 0.0);
        renderer.clear();
        renderer.set_global_rotation(&global);

        let mut m = Transform::IDENTITY;
        m.translate(1.0, 2.0, 3.0);
        assert!(Cube::new(m, Color::YELLOW).render(&mut renderer));

        let draw = renderer.draws()[0];
        assert_eq!(draw.global, global);
        assert_eq!(draw.model, m);
        assert_eq!(draw.color, Color::YELLOW);
        assert!(renderer.render_text().contains("Draws: 1"));
    }

    #[test]
    fn clear_drops_previous_draws() {
        let mut renderer = DebugTextRenderer::new();
        renderer.clear();
        Cube::new(Transform::IDENTITY, Color::RED).render(&mut renderer);
        renderer.clear();
        assert!(renderer.draws().is_empty());
        assert_eq!(renderer.clear_count(), 2);
    }

    #[test]
    fn slot_limit_skips_only_excess_draws() {
        let mut renderer = DebugTextRenderer::with_slot_limit(1);
        renderer.clear();
        assert!(Cube::new(Transform::IDENTITY, Color::RED).render(&mut renderer));
        assert!(!Cube::new(Transform::IDENTITY, Color::YELLOW).render(&mut renderer));
        assert_eq!(renderer.draws().len(), 1);
        assert_eq!(renderer.draws()[0].color, Color::RED);
    }
}
