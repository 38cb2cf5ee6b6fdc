use cgmath::Vector2;
use rand::Rng;
use rand::rngs::SmallRng;

use crate::config::{EXPLOSION_BASE_SPEED, EXPLOSION_COLORS, EXPLOSION_LIFETIME, EXPLOSION_PARTICLES};

/// Stable identifier for a traffic car; segments index cars by id, never by
/// reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CarId(pub u32);

/// Stable identifier for an in-flight projectile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShotId(pub u32);

#[derive(Debug)]
pub struct RivalCar {
    pub id: CarId,
    /// Lateral offset from the centerline, road edges at +-1.
    pub x_offset: f32,
    /// Forward distance along the track, wraps mod track length.
    pub track_position: f32,
    pub sprite_index: usize,
    pub speed: f32,
    /// Fraction through the containing segment, [0, 1).
    pub segment_frac: f32,
    pub hit: bool,
}

#[derive(Debug)]
pub struct Projectile {
    pub id: ShotId,
    pub x_offset: f32,
    pub track_position: f32,
    pub speed: f32,
    pub distance_remaining: f32,
    pub segment_frac: f32,
}

/// Short-lived explosion debris, local to its spawn segment.
#[derive(Debug, Clone)]
pub struct Particle {
    pub position: Vector2<f32>,
    pub velocity: Vector2<f32>,
    pub color_index: u8,
    pub seconds_remaining: f32,
}

/// Builds one explosion burst at a segment-local position: a fixed particle
/// count fanned over the upper half circle with randomized speed and colors
/// drawn from the explosion palette subset.
pub fn explosion_burst(x: f32, y: f32, rng: &mut SmallRng) -> Vec<Particle> {
    let mut particles = Vec::with_capacity(EXPLOSION_PARTICLES);
    for _ in 0..EXPLOSION_PARTICLES {
        let color_index = EXPLOSION_COLORS[rng.random_range(0..EXPLOSION_COLORS.len())];
        let speed = rng.random::<f32>() * EXPLOSION_BASE_SPEED;
        let angle = rng.random::<f32>() * std::f32::consts::PI;
        particles.push(Particle {
            position: Vector2::new(x, y),
            velocity: Vector2::new(angle.cos() * speed, angle.sin() * speed),
            color_index,
            seconds_remaining: EXPLOSION_LIFETIME,
        });
    }
    particles
}
