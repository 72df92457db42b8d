use super::grid::{Pos, SpriteRef};

/// The draw seam between the core and a host rasterizer. The core decides
/// what to draw and in which order; pixel-exact placement is the renderer's
/// concern.
pub trait SpriteRenderer {
    fn draw_sprite(&mut self, sprite: &SpriteRef, world_pos: Pos, width_px: f32, height_px: f32);
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub sheet: String,
    pub x_offset: i32,
    pub y_offset: i32,
    pub z_index: i32,
    pub world_pos: Pos,
}

/// Renderer double that records draw calls in submission order.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub calls: Vec<DrawCall>,
}

impl SpriteRenderer for RecordingRenderer {
    fn draw_sprite(&mut self, sprite: &SpriteRef, world_pos: Pos, _width_px: f32, _height_px: f32) {
        self.calls.push(DrawCall {
            sheet: sprite.sheet.clone(),
            x_offset: sprite.x_offset,
            y_offset: sprite.y_offset,
            z_index: sprite.z_index,
            world_pos,
        });
    }
}
