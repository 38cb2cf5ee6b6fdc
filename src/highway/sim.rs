//! Per-tick entity simulation: traffic, projectiles, particles and the
//! player-car collision check. Segment membership is kept transactional
//! (remove from the old segment, add to the new) and anything that dies
//! mid-pass is collected first and purged after the iteration.

use log::{debug, info};
use rand::rngs::SmallRng;

use crate::config::{
    CAR_VISUAL_OFFSET, OVERTAKE_WINDOW_FRAC, PARTICLE_GRAVITY, PLAYER_HIT_RADIUS, SHOT_HIT_RADIUS,
};
use crate::highway::entities::{CarId, Projectile, RivalCar, ShotId, explosion_burst};
use crate::highway::race::RaceState;
use crate::highway::track::{Track, fraction_within};

pub fn add_car_to_segment(track: &mut Track, segment_index: usize, id: CarId) {
    track.segments[segment_index].cars.push(id);
}

pub fn remove_car_from_segment(track: &mut Track, segment_index: usize, id: CarId) {
    track.segments[segment_index].cars.retain(|&c| c != id);
}

fn add_shot_to_segment(track: &mut Track, segment_index: usize, id: ShotId) {
    track.segments[segment_index].shots.push(id);
}

fn remove_shot_from_segment(track: &mut Track, segment_index: usize, id: ShotId) {
    track.segments[segment_index].shots.retain(|&s| s != id);
}

/// Spawns one explosion burst into a segment's particle set.
pub fn spawn_explosion(track: &mut Track, segment_index: usize, x: f32, y: f32, rng: &mut SmallRng) {
    let burst = explosion_burst(x, y, rng);
    track.segments[segment_index].particles.extend(burst);
}

/// Advances every traffic car: defensive lateral nudge when it is about to
/// overtake the player, forward motion with wraparound, and segment
/// re-indexing. Cars flagged hit are dropped from their segment and the
/// roster on this tick.
pub fn update_cars(
    cars: &mut Vec<RivalCar>,
    track: &mut Track,
    player_speed: f32,
    player_track_position: f32,
    player_x: f32,
    dt: f32,
) {
    let track_length = track.length();
    let mut dead: Vec<CarId> = Vec::new();

    for car in cars.iter_mut() {
        let old_index = track.index_at(car.track_position);

        if car.hit {
            dead.push(car.id);
            remove_car_from_segment(track, old_index, car.id);
            continue;
        }

        // About to pass the player: shift aside so the pass reads fair.
        if car.speed > player_speed {
            let mut player_ahead = player_track_position - car.track_position;
            while player_ahead < -track_length / 2.0 {
                player_ahead += track_length;
            }
            while player_ahead > track_length / 2.0 {
                player_ahead -= track_length;
            }
            if player_ahead > 0.0 && player_ahead < track_length * OVERTAKE_WINDOW_FRAC {
                car.x_offset = player_x + 1.0;
                if car.x_offset > 1.0 {
                    car.x_offset -= 2.0;
                }
            }
        }

        car.track_position = (car.track_position + car.speed * dt) % track_length;
        car.segment_frac = fraction_within(car.track_position);

        let new_index = track.index_at(car.track_position);
        if new_index != old_index {
            remove_car_from_segment(track, old_index, car.id);
            add_car_to_segment(track, new_index, car.id);
        }
    }

    cars.retain(|car| !dead.contains(&car.id));
}

/// Advances every projectile, expiring spent ones and testing the cars in
/// each projectile's new segment for a hit.
pub fn update_shots(
    shots: &mut Vec<Projectile>,
    cars: &mut [RivalCar],
    track: &mut Track,
    rng: &mut SmallRng,
    dt: f32,
) {
    let track_length = track.length();
    let mut dead: Vec<ShotId> = Vec::new();

    for shot in shots.iter_mut() {
        let old_index = track.index_at(shot.track_position);
        let travelled = shot.speed * dt;

        shot.track_position = (shot.track_position + travelled) % track_length;
        shot.distance_remaining -= travelled;
        if shot.distance_remaining <= 0.0 {
            remove_shot_from_segment(track, old_index, shot.id);
            dead.push(shot.id);
            continue;
        }

        shot.segment_frac = fraction_within(shot.track_position);
        let new_index = track.index_at(shot.track_position);

        let mut hit_car = false;
        let candidates = track.segments[new_index].cars.clone();
        for car_id in candidates {
            let Some(car) = cars.iter_mut().find(|c| c.id == car_id) else {
                continue;
            };
            if (car.x_offset - shot.x_offset).abs() < SHOT_HIT_RADIUS {
                debug!("shot {:?} hit car {:?}", shot.id, car.id);
                car.hit = true;
                dead.push(shot.id);
                hit_car = true;
                let x = car.x_offset;
                spawn_explosion(track, new_index, x, 0.0, rng);
                break;
            }
        }

        if hit_car {
            remove_shot_from_segment(track, old_index, shot.id);
        } else if new_index != old_index {
            remove_shot_from_segment(track, old_index, shot.id);
            add_shot_to_segment(track, new_index, shot.id);
        }
    }

    shots.retain(|shot| !dead.contains(&shot.id));
}

/// Integrates explosion debris per segment and reaps particles whose
/// lifetime or height has run out.
pub fn update_particles(track: &mut Track, dt: f32) {
    for segment in &mut track.segments {
        for particle in &mut segment.particles {
            particle.seconds_remaining -= dt;
            particle.velocity.y += PARTICLE_GRAVITY * dt;
            particle.position += particle.velocity * dt;
        }
        segment
            .particles
            .retain(|p| p.seconds_remaining >= 0.0 && p.position.y >= 0.0);
    }
}

/// Flags any traffic car sharing the player's forward-offset segment within
/// the lateral hit radius, and applies one unit of damage per contact.
pub fn detect_player_collision(
    cars: &mut [RivalCar],
    track: &mut Track,
    race: &mut RaceState,
    rng: &mut SmallRng,
) {
    let player_car_position = race.track_position + CAR_VISUAL_OFFSET;
    let segment_index = track.index_at(player_car_position);
    let candidates = track.segments[segment_index].cars.clone();

    for car_id in candidates {
        let Some(car) = cars.iter_mut().find(|c| c.id == car_id) else {
            continue;
        };
        if (car.x_offset - race.player_x).abs() < PLAYER_HIT_RADIUS {
            car.hit = true;
            let x = car.x_offset;
            spawn_explosion(track, segment_index, x, 0.0, rng);
            apply_damage(track, race, rng);
        }
    }
}

fn apply_damage(track: &mut Track, race: &mut RaceState, rng: &mut SmallRng) {
    race.hit_points -= 1;
    info!("player hit, {} hit points left", race.hit_points);
    if race.hit_points <= 0 {
        blow_up_player(track, race, rng);
    }
    race.speed = 0.0;
}

/// The player's destruction sequence: three bursts around the car.
fn blow_up_player(track: &mut Track, race: &RaceState, rng: &mut SmallRng) {
    let segment_index = track.index_at(race.track_position + CAR_VISUAL_OFFSET);
    spawn_explosion(track, segment_index, race.player_x - 0.3, 0.0, rng);
    spawn_explosion(track, segment_index, race.player_x + 0.3, 0.0, rng);
    spawn_explosion(track, segment_index, race.player_x, 0.2, rng);
}
