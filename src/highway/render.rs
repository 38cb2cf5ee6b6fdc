//! Frame rendering: the forward road walk with the rising-horizon cull,
//! per-row road/rumble/grass fills with distance fade, and the far-to-near
//! painter's pass for trees, cars, shots and particles. HUD and the
//! attract/winner banners live here too.

use cgmath::Vector3;

use crate::assets::SpriteSet;
use crate::config::{
    CAR_SCALE, DARK_GRASS_COLOR, DARK_ROAD_COLOR, DARK_RUMBLE_COLOR, DRAW_DISTANCE,
    GRASS_FADE_RGBA, HUD_HITPOINT_COLOR, LIGHT_GRASS_COLOR, LIGHT_ROAD_COLOR, LIGHT_RUMBLE_COLOR,
    PARTICLE_SCALE, PARTICLE_Y_FACTOR, ROAD_FADE_RGBA, ROAD_WIDTH, RUMBLE_FRAC, RUMBLE_FADE_RGBA,
    SHOT_COLOR, SHOT_SCALE, TREE_SCALE, WORLD_CAMERA_HEIGHT,
};
use crate::core::font::{draw_text, text_width};
use crate::core::surface::{HEIGHT, PALETTE, Sprite, Surface, WIDTH, fade};
use crate::highway::camera::project;
use crate::highway::entities::{Projectile, RivalCar};
use crate::highway::track::{Shade, Track, fraction_within};

/// Points closer than this to the camera plane are clipped, never projected.
const NEAR_PLANE: f32 = 0.01;

fn interpolate(a: f32, b: f32, frac: f32) -> f32 {
    a + (b - a) * frac
}

/// Tiles the backdrop horizontally, scrolled by the sky offset.
pub fn draw_backdrop(surface: &mut Surface, backdrop: &Sprite, sky_offset: f32) {
    let mut px_offset = (WIDTH as f32 * sky_offset) as i32;
    while px_offset > 0 {
        px_offset -= backdrop.width;
    }
    loop {
        surface.blit(backdrop, px_offset, 0, false, false);
        if px_offset + backdrop.width >= WIDTH {
            return;
        }
        px_offset += backdrop.width;
    }
}

/// Projects and draws the road ahead of `track_position`, then paints
/// decorations and entities back-to-front so nearer content wins.
pub fn draw_road(
    surface: &mut Surface,
    track: &mut Track,
    cars: &[RivalCar],
    shots: &[Projectile],
    sprites: &SpriteSet,
    track_position: f32,
) {
    let count = track.segments.len();
    let track_length = track.length();
    let base_index = track.index_at(track_position);
    let base_frac = fraction_within(track_position);

    // Running curvature accumulator; the base segment contributes the part
    // the camera has already travelled through.
    let mut dx = -(track.segments[base_index].curve * base_frac);
    let mut x = 0.0f32;

    let base = &track.segments[base_index];
    let track_elev = interpolate(base.world1.z, base.world2.z, base_frac);
    let camera = Vector3::new(0.0, track_position, WORLD_CAMERA_HEIGHT + track_elev);

    let mut horizon = 0i32;
    let mut projected = [false; DRAW_DISTANCE];

    for n in 0..DRAW_DISTANCE {
        let fade_frac = n as f32 / DRAW_DISTANCE as f32;
        let index = (base_index + n) % count;
        let loops = ((base_index + n) / count) as f32;

        let (world1, world2, curve, shade) = {
            let segment = &track.segments[index];
            (segment.world1, segment.world2, segment.curve, segment.shade)
        };
        let forward2 = world2.y + loops * track_length;

        if forward2 - camera.y <= NEAR_PLANE {
            // Entirely behind the camera: keep the clip bookkeeping current
            // but never hand a non-positive depth to the projection.
            track.segments[index].clip_height = horizon;
            x += dx;
            dx += curve;
            continue;
        }
        let forward1 = (world1.y + loops * track_length).max(camera.y + NEAR_PLANE);

        let s1 = project(Vector3::new(-x, forward1, world1.z), camera);
        let s2 = project(Vector3::new(-x - dx, forward2, world2.z), camera);
        x += dx;
        dx += curve;

        let first_y = s1.y.floor() as i32;
        let last_y = s2.y.ceil() as i32;
        {
            let segment = &mut track.segments[index];
            segment.screen1 = s1;
            segment.screen2 = s2;
            segment.clip_height = first_y.max(horizon);
        }
        projected[n] = true;

        // Hidden behind nearer terrain; sprites may still poke above it.
        if last_y <= horizon {
            continue;
        }
        draw_segment_rows(surface, s1, s2, shade, fade_frac);
        horizon = last_y;
    }

    // Painter's pass: far to near, so closer sprites overwrite farther ones.
    for n in (0..DRAW_DISTANCE).rev() {
        if !projected[n] {
            continue;
        }
        let index = (base_index + n) % count;
        let (s1, s2, clip) = {
            let segment = &track.segments[index];
            (segment.screen1, segment.screen2, segment.clip_height)
        };
        let scale = s1.z;
        let width = ROAD_WIDTH * scale;
        let segment_x = s1.x;
        let segment_y = s1.y.floor() as i32;

        for deco in &track.segments[index].decorations {
            let tree = &sprites.trees[deco.tree_index];
            surface.blit_scaled_clipped(
                tree,
                (segment_x + width * deco.x_offset).floor() as i32,
                segment_y,
                scale * TREE_SCALE,
                clip,
                true,
                false,
            );
        }

        for &car_id in &track.segments[index].cars {
            let Some(car) = cars.iter().find(|c| c.id == car_id) else {
                continue;
            };
            let frac = car.segment_frac;
            let sy = interpolate(s1.y, s2.y, frac).floor() as i32;
            let sx = interpolate(s1.x, s2.x, frac);
            let sc = interpolate(s1.z, s2.z, frac);
            surface.blit_scaled_clipped(
                &sprites.cars[car.sprite_index],
                (sx + width * car.x_offset).round() as i32,
                sy,
                sc * CAR_SCALE,
                clip,
                true,
                false,
            );
        }

        for &shot_id in &track.segments[index].shots {
            let Some(shot) = shots.iter().find(|s| s.id == shot_id) else {
                continue;
            };
            let frac = shot.segment_frac;
            let sc = interpolate(s1.z, s2.z, frac);
            let sy = (interpolate(s1.y, s2.y, frac) + sc * SHOT_SCALE).floor() as i32;
            let road_x = interpolate(s1.x, s2.x, frac);
            let sx = (road_x + width * shot.x_offset).floor() as i32;
            if sy >= clip {
                surface.vlin(sy, sy, sx, SHOT_COLOR);
            }
        }

        for particle in &track.segments[index].particles {
            let sc = s1.z * PARTICLE_SCALE;
            let sy = (s1.y + particle.position.y * sc * PARTICLE_Y_FACTOR).floor() as i32;
            let sx = (s1.x + particle.position.x * width * sc).floor() as i32;
            if sy >= clip {
                surface.vlin(sy, sy, sx, particle.color_index);
            }
        }
    }
}

fn draw_segment_rows(surface: &mut Surface, s1: Vector3<f32>, s2: Vector3<f32>, shade: Shade, fade_frac: f32) {
    let (road, rumble, grass) = match shade {
        Shade::Dark => (DARK_ROAD_COLOR, DARK_RUMBLE_COLOR, DARK_GRASS_COLOR),
        Shade::Light => (LIGHT_ROAD_COLOR, LIGHT_RUMBLE_COLOR, LIGHT_GRASS_COLOR),
    };
    let road_rgb = fade(PALETTE[road as usize], ROAD_FADE_RGBA, fade_frac);
    let rumble_rgb = fade(PALETTE[rumble as usize], RUMBLE_FADE_RGBA, fade_frac);
    let grass_rgb = fade(PALETTE[grass as usize], GRASS_FADE_RGBA, fade_frac);

    let start = s1.y.floor() as i32;
    let end = s2.y.ceil() as i32;
    let span = s2.y - s1.y;

    for y in start.max(0)..=end.min(HEIGHT - 1) {
        let frac = if span.abs() < f32::EPSILON {
            0.0
        } else {
            (y as f32 - s1.y) / span
        };
        let width = interpolate(s1.z, s2.z, frac) * ROAD_WIDTH;
        let center = interpolate(s1.x, s2.x, frac);

        let road_left = (center - width).floor() as i32;
        let road_right = (center + width).floor() as i32;
        let rumble_left = (center - width * (1.0 + RUMBLE_FRAC)).floor() as i32;
        let rumble_right = (center + width * (1.0 + RUMBLE_FRAC)).floor() as i32;

        surface.hlin_rgb(road_left, road_right, y, road_rgb);
        surface.hlin_rgb(rumble_left, road_left - 1, y, rumble_rgb);
        surface.hlin_rgb(road_right + 1, rumble_right, y, rumble_rgb);
        surface.hlin_rgb(0, rumble_left - 1, y, grass_rgb);
        surface.hlin_rgb(rumble_right + 1, WIDTH - 1, y, grass_rgb);
    }
}

/// The player's car, fixed near the bottom of the screen and shifted by the
/// lateral offset.
pub fn draw_player_car(surface: &mut Surface, sprites: &SpriteSet, player_x: f32) {
    let screen_half_width = 50.0;
    let car_position = 32 + (player_x * screen_half_width).round() as i32;
    surface.blit(&sprites.cars[0], car_position, 5, true, false);
}

pub fn draw_hit_points(surface: &mut Surface, hit_points: i32) {
    for i in 0..hit_points {
        let box_size = 2;
        let box_spacing = 2;
        let right = 61 - (box_spacing + box_size) * i;
        let left = right - box_size;
        let top = HEIGHT - 1 - box_spacing;
        let bottom = top - box_size;
        surface.draw_box(left, top, right, bottom, HUD_HITPOINT_COLOR);
    }
}

/// One tick per authored traffic car, filled while the car is still on the
/// road.
pub fn draw_traffic_ticks(surface: &mut Surface, max_cars: usize, remaining: usize) {
    for i in 0..max_cars as i32 {
        let left = 2 + 2 * i;
        let top = 61;
        let bottom = top - 2;
        let color = if (i as usize) < remaining { 1 } else { 0 };
        surface.draw_box(left, top, left, bottom, color);
    }
}

pub fn draw_attract_overlay(surface: &mut Surface, show_prompt: bool) {
    let title = "HIGHWAY 64";
    draw_text(surface, title, (WIDTH - text_width(title)) / 2, 44, 15);
    if show_prompt {
        draw_text(surface, "PRESS FIRE", 2, 2, 0);
    }
}

pub fn draw_winner_overlay(surface: &mut Surface) {
    let banner = "WINNER";
    draw_text(surface, banner, (WIDTH - text_width(banner)) / 2, 30, 15);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets;
    use crate::highway::track::TrackBuilder;

    fn flat_track(segments: usize) -> Track {
        let mut b = TrackBuilder::new();
        b.add_straight(segments, 0.0);
        b.finish()
    }

    #[test]
    fn straight_road_is_centered_with_grass_at_the_edges() {
        let mut surface = Surface::new();
        let mut track = flat_track(100);
        let sprites = assets::build();
        draw_road(&mut surface, &mut track, &[], &[], &sprites, 0.0);

        // row 35 is mid-distance: road in the middle, grass at the edges
        let center = surface.pixel(32, 35);
        let edge = surface.pixel(0, 35);
        assert_ne!(center, edge);
        // grass is the greener of the two
        assert!(edge[1] > edge[0]);
        // road row symmetric around the center column
        assert_eq!(surface.pixel(30, 35), surface.pixel(34, 35));
    }

    #[test]
    fn sky_rows_are_left_untouched_on_a_flat_track() {
        let mut surface = Surface::new();
        let mut track = flat_track(100);
        let sprites = assets::build();
        draw_road(&mut surface, &mut track, &[], &[], &sprites, 0.0);
        // the horizon of a flat road sits below the top of the screen
        assert_eq!(surface.pixel(32, 60), PALETTE[0]);
        assert_eq!(surface.pixel(10, 63), PALETTE[0]);
    }

    #[test]
    fn clip_heights_rise_monotonically_over_drawn_segments() {
        let mut surface = Surface::new();
        let mut track = flat_track(100);
        let sprites = assets::build();
        draw_road(&mut surface, &mut track, &[], &[], &sprites, 0.0);

        let mut last = 0;
        for n in 0..DRAW_DISTANCE {
            let clip = track.segments[n].clip_height;
            assert!(clip >= last || clip == 0);
            last = last.max(clip);
        }
    }

    #[test]
    fn backdrop_tiles_across_the_full_width() {
        let mut surface = Surface::new();
        let sprites = assets::build();
        draw_backdrop(&mut surface, &sprites.backdrops[0], -30.0);
        for x in [0, 20, 40, 63] {
            assert_ne!(surface.pixel(x, 60), PALETTE[0]);
        }
    }

    #[test]
    fn player_car_lands_at_the_bottom_center() {
        let mut surface = Surface::new();
        let sprites = assets::build();
        draw_player_car(&mut surface, &sprites, 0.0);
        // some body pixel of the livery near the center column
        let mut found = false;
        for y in 0..12 {
            if surface.pixel(32, y) != PALETTE[0] {
                found = true;
            }
        }
        assert!(found);
    }
}
