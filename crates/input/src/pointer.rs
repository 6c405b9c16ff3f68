use glam::Vec2;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum InputError {
    #[error("surface has zero area ({width}x{height})")]
    EmptySurface { width: u32, height: u32 },
}

/// Drawing surface size in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Map a surface-relative pixel position to clip space.
///
/// Pixel Y grows downward, clip Y grows upward. Positions outside the surface
/// (drags that leave the window) map outside `[-1, 1]` unclamped.
pub fn to_clip_space(x: f64, y: f64, surface: SurfaceSize) -> Result<Vec2, InputError> {
    if surface.width == 0 || surface.height == 0 {
        return Err(InputError::EmptySurface {
            width: surface.width,
            height: surface.height,
        });
    }
    let half_w = surface.width as f64 / 2.0;
    let half_h = surface.height as f64 / 2.0;
    Ok(Vec2::new(
        ((x - half_w) / half_w) as f32,
        ((half_h - y) / half_h) as f32,
    ))
}
