//! Procedurally built sprite set: traffic car liveries, roadside trees and
//! per-leg skyline backdrops. Pixel art is authored as rows of characters and
//! mapped onto the shared palette.

use crate::core::surface::{HEIGHT, Sprite, WIDTH};

pub struct SpriteSet {
    /// Twelve liveries; index 0 doubles as the player's car.
    pub cars: [Sprite; 12],
    pub trees: [Sprite; 5],
    pub backdrops: [Sprite; 8],
}

const CAR_BODY_COLORS: [u8; 12] = [9, 1, 2, 3, 4, 6, 7, 8, 11, 13, 14, 15];

pub fn build() -> SpriteSet {
    SpriteSet {
        cars: CAR_BODY_COLORS.map(build_car),
        trees: build_trees(),
        backdrops: std::array::from_fn(build_backdrop),
    }
}

fn build_car(body: u8) -> Sprite {
    Sprite::from_rows(
        &[
            "...BBB...",
            "..BBBBB..",
            ".BWWWWWB.",
            "BBBBBBBBB",
            "BBBBBBBBB",
            ".KK...KK.",
        ],
        &[('B', body), ('W', 0), ('K', 0)],
    )
}

fn build_trees() -> [Sprite; 5] {
    let map: &[(char, u8)] = &[('G', 4), ('L', 12), ('T', 8)];
    [
        Sprite::from_rows(
            &[
                "...G...", "..GGG..", "..GGG..", ".GGGGG.", ".GGGGG.", "GGGGGGG", "...T...",
                "...T...",
            ],
            map,
        ),
        Sprite::from_rows(
            &[".GGG.", "GGGGG", "GGGGG", ".GGG.", "..T..", "..T.."],
            map,
        ),
        Sprite::from_rows(
            &[".L.", "LGL", "GGG", "GGG", "GGG", ".G.", ".T."],
            map,
        ),
        Sprite::from_rows(&[".GGGG.", "GGGGGG", "GGGGGG", "..T..."], map),
        Sprite::from_rows(
            &[
                "...L...", "..LLL..", ".GGGGG.", "..LLL..", ".GGGGG.", "GGGGGGG", "...T...",
            ],
            map,
        ),
    ]
}

// Per-leg (sky, far ridge, near ridge) palette picks; the ground band is
// always dark grass so downhill crests never expose raw sky.
const BACKDROP_COLORS: [(u8, u8, u8); 8] = [
    (6, 5, 4),
    (6, 2, 4),
    (7, 2, 8),
    (6, 10, 5),
    (7, 2, 8),
    (6, 14, 4),
    (7, 5, 8),
    (11, 2, 0),
];

const GROUND_BAND_TOP: i32 = 44;
const SUN_COLOR: u8 = 9;

fn build_backdrop(leg_index: usize) -> Sprite {
    let (sky, far, near) = BACKDROP_COLORS[leg_index];
    let mut sprite = Sprite::new(WIDTH, HEIGHT);

    let i = leg_index as f32;
    let far_freq = 0.11 + 0.013 * i;
    let near_freq = 0.21 + 0.017 * i;
    let sun_x = 8 + (leg_index as i32 * 7) % 48;

    for x in 0..WIDTH {
        let fx = x as f32;
        let far_h = 53.0 + 4.0 * (fx * far_freq + i).sin() + 2.0 * (fx * 0.05 + 2.0 * i).sin();
        let near_h = 49.0 + 3.0 * (fx * near_freq + 3.0 * i).sin();
        for y in 0..HEIGHT {
            let color = if y < GROUND_BAND_TOP {
                crate::config::DARK_GRASS_COLOR
            } else if (y as f32) < near_h {
                near
            } else if (y as f32) < far_h {
                far
            } else {
                sky
            };
            sprite.set(x, y, color);
        }
    }

    // low sun disc
    for dy in -2i32..=2 {
        for dx in -2i32..=2 {
            if dx * dx + dy * dy <= 4 {
                let x = sun_x + dx;
                let y = 59 + dy;
                sprite.set(x, y, SUN_COLOR);
            }
        }
    }

    sprite
}
