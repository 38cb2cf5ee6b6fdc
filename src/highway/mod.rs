//! The highway racing mode: owns the track, the race state, all entities and
//! the one RNG every random draw goes through, and runs the fixed per-tick
//! order of leg-advance check, input/physics, debug hooks, collision,
//! simulation and drawing.

pub mod camera;
pub mod entities;
pub mod race;
pub mod render;
pub mod sim;
pub mod track;

use log::debug;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::assets::{self, SpriteSet};
use crate::config::{
    ACCEL, BRAKE, CAR_VISUAL_OFFSET, CENTRIFUGAL, COAST_DECEL, DEATH_RESET_SECONDS, MAX_SPEED,
    OFF_ROAD_DECEL, OFF_ROAD_LIMIT, PLAYER_MAX_X, ROAD_EDGE_X, SHOT_RANGE, SHOT_SPEED,
    SKY_SPEED, SKY_START_OFFSET, TRAFFIC_MAX_SPEED, TRAFFIC_MIN_SPEED, TRAFFIC_SPAWN_LEAD,
    ATTRACT_PROMPT_DELAY, WINNER_DURATION,
};
use crate::core::input::InputState;
use crate::core::surface::Surface;
use crate::game::Mode;
use entities::{CarId, Projectile, RivalCar, ShotId};
use race::{Leg, RaceState};
use track::{Track, build_leg, fraction_within};

pub struct HighwayMode {
    race: RaceState,
    track: Track,
    cars: Vec<RivalCar>,
    shots: Vec<Projectile>,
    /// Authored car count of the current leg, for the HUD tick row.
    leg_car_count: usize,
    sprites: SpriteSet,
    rng: SmallRng,
    sky_offset: f32,
    next_car_id: u32,
    next_shot_id: u32,
}

impl HighwayMode {
    pub fn new(seed: Option<u64>) -> HighwayMode {
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        let mut mode = HighwayMode {
            race: RaceState::new(),
            track: Track { segments: Vec::new() },
            cars: Vec::new(),
            shots: Vec::new(),
            leg_car_count: 0,
            sprites: assets::build(),
            rng,
            sky_offset: SKY_START_OFFSET,
            next_car_id: 0,
            next_shot_id: 0,
        };
        mode.reset_road(Leg::first());
        mode
    }

    /// Rebuilds the current leg's track and traffic population.
    fn reset_road(&mut self, leg: Leg) {
        let plan = build_leg(leg, &mut self.rng);
        self.track = plan.track;
        self.cars.clear();
        self.shots.clear();
        self.leg_car_count = plan.car_count;
        self.race.laps_remaining = plan.laps_needed;
        self.race.backdrop_index = plan.backdrop_index;

        let track_length = self.track.length();
        let step = track_length / plan.car_count as f32;
        for i in 0..plan.car_count {
            let position = (i as f32 * step + TRAFFIC_SPAWN_LEAD) % track_length;
            let x = self.rng.random::<f32>() * 2.0 - 1.0;
            let speed = self
                .rng
                .random_range(TRAFFIC_MIN_SPEED..TRAFFIC_MAX_SPEED);
            self.add_car(x, position, i % self.sprites.cars.len(), speed);
        }
    }

    fn add_car(&mut self, x_offset: f32, track_position: f32, sprite_index: usize, speed: f32) {
        let id = CarId(self.next_car_id);
        self.next_car_id += 1;
        self.cars.push(RivalCar {
            id,
            x_offset,
            track_position,
            sprite_index,
            speed,
            segment_frac: fraction_within(track_position),
            hit: false,
        });
        let index = self.track.index_at(track_position);
        sim::add_car_to_segment(&mut self.track, index, id);
    }

    fn fire_shot(&mut self) {
        let id = ShotId(self.next_shot_id);
        self.next_shot_id += 1;
        let track_position =
            (self.race.track_position + CAR_VISUAL_OFFSET) % self.track.length();
        debug!("firing shot {:?}", id);
        self.shots.push(Projectile {
            id,
            x_offset: self.race.player_x,
            track_position,
            speed: self.race.speed + SHOT_SPEED,
            distance_remaining: SHOT_RANGE,
            segment_frac: fraction_within(track_position),
        });
        let index = self.track.index_at(track_position);
        self.track.segments[index].shots.push(id);
    }

    fn start_leg(&mut self, leg: Leg) {
        self.race.begin_leg(leg);
        self.sky_offset = SKY_START_OFFSET;
        self.reset_road(leg);
    }

    /// The current leg is over: move on, or crown the winner after the last.
    fn advance_leg(&mut self) {
        match self.race.leg.next() {
            Some(next) => self.start_leg(next),
            None => self.race.enter_winner(),
        }
    }

    fn apply_player_physics(&mut self, input: &InputState, dt: f32) {
        let segment_curve = self.track.segment_at(self.race.track_position).curve;
        let speed_frac = self.race.speed / MAX_SPEED;
        // full lateral travel crosses the track in one second at max speed
        let dx = dt * 2.0 * speed_frac;

        let (throttle, steering) = if self.race.is_racing() {
            (input.throttle(), input.steering())
        } else {
            (0.0, 0.0)
        };

        self.race.player_x += dx * steering;
        self.race.player_x += dx * speed_frac * segment_curve * CENTRIFUGAL;

        if throttle > 0.0 {
            self.race.speed += ACCEL * throttle * dt;
        } else if throttle < 0.0 {
            self.race.speed += BRAKE * throttle * dt;
        } else {
            self.race.speed += COAST_DECEL * dt;
        }

        if self.race.player_x.abs() > ROAD_EDGE_X && self.race.speed > OFF_ROAD_LIMIT {
            self.race.speed += OFF_ROAD_DECEL * dt;
        }

        self.race.player_x = self.race.player_x.clamp(-PLAYER_MAX_X, PLAYER_MAX_X);
        self.race.speed = self.race.speed.clamp(0.0, MAX_SPEED);

        if self.race.is_racing() && input.fire_just_pressed() {
            self.fire_shot();
        }
    }
}

impl Mode for HighwayMode {
    fn tick(&mut self, surface: &mut Surface, input: &InputState, dt: f32) {
        let track_length = self.track.length();
        self.race.track_position += self.race.speed * dt;
        if self.race.track_position >= track_length {
            self.race.track_position -= track_length;
            self.race.laps_remaining -= 1;
        }

        // Leg over: rebuild and skip the rest of the tick, dropping any
        // input that arrived on the advancing frame.
        if self.race.is_racing() && (self.race.laps_remaining <= 0 || self.cars.is_empty()) {
            self.advance_leg();
            return;
        }

        if self.race.player_alive() {
            self.apply_player_physics(input, dt);
        } else {
            self.race.speed /= 2.0;
            if self.race.speed < 1e-4 {
                self.race.speed = 0.0;
            }
            self.race.dead_timer += dt;
        }

        // Debug hooks: spawn a test burst ahead, or jump straight to a leg.
        if input.explosion_test() {
            let position = self.race.track_position + 40.0;
            let index = self.track.index_at(position);
            sim::spawn_explosion(&mut self.track, index, 0.0, 0.0, &mut self.rng);
        }
        if let Some(digit) = input.leg_select() {
            if let Some(leg) = Leg::from_index(digit as usize - 1) {
                self.start_leg(leg);
            }
        }

        sim::detect_player_collision(&mut self.cars, &mut self.track, &mut self.race, &mut self.rng);
        sim::update_shots(&mut self.shots, &mut self.cars, &mut self.track, &mut self.rng, dt);
        sim::update_cars(
            &mut self.cars,
            &mut self.track,
            self.race.speed,
            self.race.track_position,
            self.race.player_x,
            dt,
        );
        sim::update_particles(&mut self.track, dt);

        let player_curve = self.track.segment_at(self.race.track_position).curve;
        self.sky_offset += SKY_SPEED * player_curve * (self.race.speed / MAX_SPEED);

        render::draw_backdrop(
            surface,
            &self.sprites.backdrops[self.race.backdrop_index],
            self.sky_offset,
        );
        render::draw_road(
            surface,
            &mut self.track,
            &self.cars,
            &self.shots,
            &self.sprites,
            self.race.track_position,
        );
        if self.race.is_racing() {
            render::draw_player_car(surface, &self.sprites, self.race.player_x);
            render::draw_hit_points(surface, self.race.hit_points);
            render::draw_traffic_ticks(surface, self.leg_car_count, self.cars.len());
        }

        if self.race.dead_timer > DEATH_RESET_SECONDS {
            self.race.reset_to_attract();
        }

        if self.race.showing_attract {
            self.race.overlay_timer += dt;
            let prompting = self.race.overlay_timer > ATTRACT_PROMPT_DELAY;
            render::draw_attract_overlay(surface, prompting);
            if prompting && input.fire_just_pressed() {
                self.start_leg(Leg::first());
            }
        } else if self.race.showing_winner {
            self.race.overlay_timer += dt;
            render::draw_winner_overlay(surface);
            if self.race.overlay_timer > WINNER_DURATION {
                self.race.reset_to_attract();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input;

    const DT: f32 = 1.0 / 60.0;

    fn racing_mode() -> HighwayMode {
        let mut mode = HighwayMode::new(Some(11));
        mode.start_leg(Leg::first());
        mode
    }

    fn tick_idle(mode: &mut HighwayMode, surface: &mut Surface) {
        let input = input::init_state();
        mode.tick(surface, &input, DT);
    }

    #[test]
    fn attract_ignores_throttle_but_still_advances_the_world() {
        let mut mode = HighwayMode::new(Some(1));
        let mut surface = Surface::new();
        assert!(mode.race.showing_attract);

        let mut input = input::init_state();
        input.up = true;
        let before = mode.race.track_position;
        let speed_before = mode.race.speed;
        mode.tick(&mut surface, &input, DT);
        assert!(mode.race.track_position > before);
        // throttle is forced to zero, so speed only coasts down
        assert!(mode.race.speed <= speed_before);
    }

    #[test]
    fn fire_leaves_attract_for_the_first_leg() {
        let mut mode = HighwayMode::new(Some(2));
        let mut surface = Surface::new();
        let mut input = input::init_state();

        // too early: the prompt is not up yet
        input.fire_edge = true;
        mode.tick(&mut surface, &input, DT);
        assert!(mode.race.showing_attract);

        // wait out the prompt delay, then fire
        let idle = input::init_state();
        for _ in 0..((ATTRACT_PROMPT_DELAY / DT) as usize + 2) {
            mode.tick(&mut surface, &idle, DT);
        }
        input.fire_edge = true;
        mode.tick(&mut surface, &input, DT);
        assert!(!mode.race.showing_attract);
        assert_eq!(mode.race.leg, Leg::first());
        assert_eq!(mode.cars.len(), mode.leg_car_count);
    }

    #[test]
    fn completing_the_laps_advances_to_the_next_leg() {
        let mut mode = racing_mode();
        let mut surface = Surface::new();
        let first_count = mode.leg_car_count;

        mode.race.laps_remaining = 1;
        mode.race.track_position = mode.track.length() - 0.1;
        mode.race.speed = MAX_SPEED;
        tick_idle(&mut mode, &mut surface);

        assert_eq!(mode.race.leg, Leg::first().next().unwrap());
        assert!(mode.race.laps_remaining > 0);
        assert_eq!(mode.race.track_position, 0.0);
        assert_eq!(mode.cars.len(), mode.leg_car_count);
        assert!(mode.leg_car_count >= first_count);
    }

    #[test]
    fn clearing_out_the_traffic_also_ends_the_leg() {
        let mut mode = racing_mode();
        let mut surface = Surface::new();
        for car in &mut mode.cars {
            car.hit = true;
        }
        tick_idle(&mut mode, &mut surface); // purges the hit cars
        tick_idle(&mut mode, &mut surface); // notices the empty roster
        assert_eq!(mode.race.leg, Leg::first().next().unwrap());
    }

    #[test]
    fn finishing_the_last_leg_shows_the_winner_screen() {
        let mut mode = racing_mode();
        let mut surface = Surface::new();
        mode.start_leg(Leg::Eureka);
        mode.race.laps_remaining = 0;
        tick_idle(&mut mode, &mut surface);
        assert!(mode.race.showing_winner);

        // and the winner screen times back out to attract
        for _ in 0..((WINNER_DURATION / DT) as usize + 2) {
            tick_idle(&mut mode, &mut surface);
        }
        assert!(mode.race.showing_attract);
        assert_eq!(mode.race.leg, Leg::first());
    }

    #[test]
    fn dead_player_decays_to_a_stop_and_returns_to_attract() {
        let mut mode = racing_mode();
        let mut surface = Surface::new();
        mode.race.hit_points = 0;
        mode.race.speed = 40.0;

        tick_idle(&mut mode, &mut surface);
        assert!(mode.race.speed < 40.0);

        for _ in 0..((DEATH_RESET_SECONDS / DT) as usize + 2) {
            tick_idle(&mut mode, &mut surface);
        }
        assert!(mode.race.showing_attract);
        assert_eq!(mode.race.hit_points, crate::config::PLAYER_HIT_POINTS);
    }

    #[test]
    fn firing_spawns_a_shot_ahead_of_the_player() {
        let mut mode = racing_mode();
        let mut surface = Surface::new();
        let mut input = input::init_state();
        input.fire_edge = true;
        mode.tick(&mut surface, &input, DT);
        assert_eq!(mode.shots.len(), 1);
        let shot = &mode.shots[0];
        assert!(shot.speed > mode.race.speed);
        // the shot already flew for the remainder of the spawning tick
        assert!(shot.distance_remaining > SHOT_RANGE - 2.0);
        assert!(shot.distance_remaining < SHOT_RANGE);
    }

    #[test]
    fn leg_select_hook_jumps_to_the_requested_leg() {
        let mut mode = racing_mode();
        let mut surface = Surface::new();
        let mut input = input::init_state();
        input.leg_select_edge = Some(4);
        mode.tick(&mut surface, &input, DT);
        assert_eq!(mode.race.leg, Leg::from_index(3).unwrap());
        assert_eq!(mode.cars.len(), mode.leg_car_count);
    }

    #[test]
    fn same_seed_builds_the_same_traffic() {
        let collect = |seed| {
            let mode = HighwayMode::new(Some(seed));
            mode.cars
                .iter()
                .map(|c| (c.x_offset.to_bits(), c.speed.to_bits(), c.sprite_index))
                .collect::<Vec<_>>()
        };
        assert_eq!(collect(9), collect(9));
        assert!(!collect(9).is_empty());
    }

    #[test]
    fn every_car_sits_in_exactly_one_segment_after_many_ticks() {
        let mut mode = racing_mode();
        let mut surface = Surface::new();
        for _ in 0..120 {
            tick_idle(&mut mode, &mut surface);
        }
        for car in &mode.cars {
            let expected = mode.track.index_at(car.track_position);
            let homes: Vec<usize> = mode
                .track
                .segments
                .iter()
                .filter(|s| s.cars.contains(&car.id))
                .map(|s| s.index)
                .collect();
            assert_eq!(homes, vec![expected]);
        }
    }
}
