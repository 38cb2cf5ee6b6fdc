//! 64x64 palette framebuffer and the pixel primitives everything draws with.
//!
//! Row 0 is the *bottom* of the screen, matching the world's z-up convention;
//! `copy_to_rgba` flips rows for presentation. Every write is bounds-checked
//! and silently dropped when off-surface, so callers never clip by hand.

pub const WIDTH: i32 = 64;
pub const HEIGHT: i32 = 64;

pub type Rgba = [u8; 4];

pub const PALETTE: [Rgba; 16] = [
    [0, 0, 0, 255],
    [227, 30, 96, 255], // brick red
    [96, 78, 189, 255], // purple
    [255, 68, 253, 255],
    [0, 163, 96, 255],
    [128, 128, 128, 255], // med gray
    [20, 207, 253, 255],
    [208, 195, 255, 255], // lavender
    [96, 114, 3, 255],
    [255, 106, 60, 255], // orange
    [156, 156, 156, 255], // lighter gray
    [255, 160, 208, 255], // pink
    [20, 245, 60, 255],
    [208, 221, 141, 255],
    [114, 255, 208, 255],
    [255, 255, 255, 255],
];

/// Linear blend between two colors, per channel.
pub fn fade(c1: Rgba, c2: Rgba, frac: f32) -> Rgba {
    let mut out = [0u8; 4];
    for i in 0..4 {
        let a = c1[i] as f32;
        let b = c2[i] as f32;
        out[i] = (a + (b - a) * frac) as u8;
    }
    out
}

/// A palette-indexed pixel image. `TRANSPARENT` entries are skipped on blit.
pub struct Sprite {
    pub width: i32,
    pub height: i32,
    pixels: Vec<u8>, // row 0 at the bottom
}

pub const TRANSPARENT: u8 = 0xff;

impl Sprite {
    pub fn new(width: i32, height: i32) -> Self {
        Sprite {
            width,
            height,
            pixels: vec![TRANSPARENT; (width * height) as usize],
        }
    }

    /// Builds a sprite from visual rows (top row first). Characters map to
    /// palette indices through `map`; anything unmapped is transparent.
    pub fn from_rows(rows: &[&str], map: &[(char, u8)]) -> Self {
        let height = rows.len() as i32;
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as i32;
        let mut sprite = Sprite::new(width, height);
        for (r, row) in rows.iter().enumerate() {
            let y = height - 1 - r as i32;
            for (x, ch) in row.chars().enumerate() {
                if let Some(&(_, index)) = map.iter().find(|(c, _)| *c == ch) {
                    sprite.set(x as i32, y, index);
                }
            }
        }
        sprite
    }

    pub fn set(&mut self, x: i32, y: i32, index: u8) {
        if x >= 0 && x < self.width && y >= 0 && y < self.height {
            self.pixels[(y * self.width + x) as usize] = index;
        }
    }

    #[inline(always)]
    pub fn at(&self, x: i32, y: i32) -> u8 {
        self.pixels[(y * self.width + x) as usize]
    }
}

pub struct Surface {
    pixels: Vec<Rgba>,
}

impl Surface {
    pub fn new() -> Self {
        Surface {
            pixels: vec![PALETTE[0]; (WIDTH * HEIGHT) as usize],
        }
    }

    #[inline(always)]
    pub fn set_pixel(&mut self, x: i32, y: i32, c: Rgba) {
        if x < 0 || x >= WIDTH || y < 0 || y >= HEIGHT {
            return;
        }
        self.pixels[(y * WIDTH + x) as usize] = c;
    }

    pub fn pixel(&self, x: i32, y: i32) -> Rgba {
        self.pixels[(y * WIDTH + x) as usize]
    }

    pub fn clear(&mut self, palette_index: u8) {
        self.pixels.fill(PALETTE[palette_index as usize]);
    }

    pub fn hlin(&mut self, left: i32, right: i32, y: i32, palette_index: u8) {
        self.hlin_rgb(left, right, y, PALETTE[palette_index as usize]);
    }

    pub fn hlin_rgb(&mut self, left: i32, right: i32, y: i32, c: Rgba) {
        if y < 0 || y >= HEIGHT {
            return;
        }
        for x in left.max(0)..=right.min(WIDTH - 1) {
            self.pixels[(y * WIDTH + x) as usize] = c;
        }
    }

    pub fn vlin(&mut self, bottom: i32, top: i32, x: i32, palette_index: u8) {
        if x < 0 || x >= WIDTH {
            return;
        }
        let c = PALETTE[palette_index as usize];
        for y in bottom.max(0)..=top.min(HEIGHT - 1) {
            self.pixels[(y * WIDTH + x) as usize] = c;
        }
    }

    pub fn draw_box(&mut self, left: i32, top: i32, right: i32, bottom: i32, palette_index: u8) {
        for y in bottom..=top {
            self.hlin(left, right, y, palette_index);
        }
    }

    /// Unscaled blit with optional centering.
    pub fn blit(&mut self, sprite: &Sprite, x: i32, y: i32, center_x: bool, center_y: bool) {
        let off_x = if center_x { sprite.width / 2 } else { 0 };
        let off_y = if center_y { sprite.height / 2 } else { 0 };
        for j in 0..sprite.height {
            for i in 0..sprite.width {
                let index = sprite.at(i, j);
                if index != TRANSPARENT {
                    self.set_pixel(x - off_x + i, y - off_y + j, PALETTE[index as usize]);
                }
            }
        }
    }

    /// Nearest-neighbour scaled blit, skipping rows below `clip_bottom`
    /// (terrain nearer the camera that already covered them).
    pub fn blit_scaled_clipped(
        &mut self,
        sprite: &Sprite,
        x: i32,
        y: i32,
        scale: f32,
        clip_bottom: i32,
        center_x: bool,
        center_y: bool,
    ) {
        let out_w = (sprite.width as f32 * scale) as i32;
        let out_h = (sprite.height as f32 * scale) as i32;
        let off_x = if center_x { out_w / 2 } else { 0 };
        let off_y = if center_y { out_h / 2 } else { 0 };
        for j in 0..out_h {
            let dest_y = y + j - off_y;
            if dest_y < clip_bottom || dest_y < 0 || dest_y >= HEIGHT {
                continue;
            }
            let src_y = (j as f32 / scale) as i32;
            for i in 0..out_w {
                let dest_x = x + i - off_x;
                if dest_x < 0 || dest_x >= WIDTH {
                    continue;
                }
                let src_x = (i as f32 / scale) as i32;
                let index = sprite.at(src_x.min(sprite.width - 1), src_y.min(sprite.height - 1));
                if index != TRANSPARENT {
                    self.set_pixel(dest_x, dest_y, PALETTE[index as usize]);
                }
            }
        }
    }

    /// Copies the frame into a top-row-first RGBA byte buffer for presentation.
    pub fn copy_to_rgba(&self, out: &mut [u8]) {
        debug_assert!(out.len() >= (WIDTH * HEIGHT * 4) as usize);
        for y in 0..HEIGHT {
            let src_row = (HEIGHT - 1 - y) * WIDTH;
            for x in 0..WIDTH {
                let c = self.pixels[(src_row + x) as usize];
                let dst = ((y * WIDTH + x) * 4) as usize;
                out[dst..dst + 4].copy_from_slice(&c);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_writes_are_dropped() {
        let mut s = Surface::new();
        s.set_pixel(-1, 0, PALETTE[15]);
        s.set_pixel(0, -1, PALETTE[15]);
        s.set_pixel(WIDTH, 0, PALETTE[15]);
        s.set_pixel(0, HEIGHT, PALETTE[15]);
        assert_eq!(s.pixel(0, 0), PALETTE[0]);
    }

    #[test]
    fn clear_floods_the_frame() {
        let mut s = Surface::new();
        s.set_pixel(10, 10, PALETTE[15]);
        s.clear(6);
        assert_eq!(s.pixel(0, 0), PALETTE[6]);
        assert_eq!(s.pixel(10, 10), PALETTE[6]);
        assert_eq!(s.pixel(WIDTH - 1, HEIGHT - 1), PALETTE[6]);
    }

    #[test]
    fn hlin_clips_to_visible_run() {
        let mut s = Surface::new();
        s.hlin(-10, 10, 5, 15);
        assert_eq!(s.pixel(0, 5), PALETTE[15]);
        assert_eq!(s.pixel(10, 5), PALETTE[15]);
        assert_eq!(s.pixel(11, 5), PALETTE[0]);
        // entirely off-screen row is a no-op
        s.hlin(0, 63, 200, 15);
    }

    #[test]
    fn vlin_fills_inclusive_span() {
        let mut s = Surface::new();
        s.vlin(2, 4, 7, 9);
        assert_eq!(s.pixel(7, 2), PALETTE[9]);
        assert_eq!(s.pixel(7, 4), PALETTE[9]);
        assert_eq!(s.pixel(7, 5), PALETTE[0]);
    }

    #[test]
    fn fade_blends_endpoints() {
        let a = [0, 0, 0, 255];
        let b = [255, 255, 255, 255];
        assert_eq!(fade(a, b, 0.0), a);
        assert_eq!(fade(a, b, 1.0), b);
        assert_eq!(fade(a, b, 0.5)[0], 127);
    }

    #[test]
    fn sprite_rows_are_flipped_to_bottom_origin() {
        let sprite = Sprite::from_rows(&["x.", ".x"], &[('x', 3)]);
        // top-left of the art is the highest row of the sprite
        assert_eq!(sprite.at(0, 1), 3);
        assert_eq!(sprite.at(1, 1), TRANSPARENT);
        assert_eq!(sprite.at(1, 0), 3);
    }

    #[test]
    fn blit_skips_transparent_and_clips() {
        let sprite = Sprite::from_rows(&["xx", "xx"], &[('x', 2)]);
        let mut s = Surface::new();
        s.blit(&sprite, 63, 0, false, false);
        assert_eq!(s.pixel(63, 0), PALETTE[2]);
        assert_eq!(s.pixel(63, 1), PALETTE[2]);
    }
}
