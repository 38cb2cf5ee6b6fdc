//! Track geometry: fixed-length segments appended by eased shape primitives,
//! plus the eight authored legs of the run.

use cgmath::Vector3;
use log::info;
use rand::Rng;
use rand::rngs::SmallRng;

use crate::config::{RUMBLE_LENGTH, SEGMENT_LENGTH};
use crate::highway::entities::{CarId, Particle, ShotId};
use crate::highway::race::Leg;

// Shape vocabulary for leg authoring.
const ROAD_SHORT: usize = 25;
const ROAD_MEDIUM: usize = 50;
const ROAD_LONG: usize = 100;

const CURVE_EASY: f32 = 0.02;
const CURVE_MEDIUM: f32 = 0.04;
const CURVE_HARD: f32 = 0.06;

const HILL_NONE: f32 = 0.0;
const HILL_LOW: f32 = 5.0;
const HILL_MEDIUM: f32 = 10.0;
const HILL_HIGH: f32 = 15.0;

pub const TREE_VARIANTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shade {
    Light,
    Dark,
}

/// A roadside sprite placement within a segment.
#[derive(Debug)]
pub struct Decoration {
    pub x_offset: f32,
    pub tree_index: usize,
}

/// The atomic track unit. World endpoints carry forward distance (y) and
/// elevation (z); the lateral component and the screen endpoints are filled
/// in by the renderer each frame. Cars and shots are indexed by id, particles
/// are owned outright.
pub struct Segment {
    pub index: usize,
    pub world1: Vector3<f32>,
    pub world2: Vector3<f32>,
    pub screen1: Vector3<f32>,
    pub screen2: Vector3<f32>,
    pub curve: f32,
    pub shade: Shade,
    pub clip_height: i32,
    pub decorations: Vec<Decoration>,
    pub cars: Vec<CarId>,
    pub shots: Vec<ShotId>,
    pub particles: Vec<Particle>,
}

/// A closed loop of contiguous segments. Never empty once built.
pub struct Track {
    pub segments: Vec<Segment>,
}

impl Track {
    pub fn length(&self) -> f32 {
        self.segments.len() as f32 * SEGMENT_LENGTH
    }

    /// Segment index containing `track_position`; pure in
    /// `track_position mod length`.
    pub fn index_at(&self, track_position: f32) -> usize {
        (track_position / SEGMENT_LENGTH) as usize % self.segments.len()
    }

    pub fn segment_at(&self, track_position: f32) -> &Segment {
        &self.segments[self.index_at(track_position)]
    }
}

/// Fraction of the way through the containing segment, [0, 1).
pub fn fraction_within(track_position: f32) -> f32 {
    (track_position % SEGMENT_LENGTH) / SEGMENT_LENGTH
}

pub fn ease_in(a: f32, b: f32, frac: f32) -> f32 {
    a + (b - a) * frac.powi(2)
}

pub fn ease_out(a: f32, b: f32, frac: f32) -> f32 {
    a + (b - a) * (1.0 - (1.0 - frac).powi(2))
}

pub fn ease_in_out(a: f32, b: f32, frac: f32) -> f32 {
    a + (b - a) * (0.5 - (frac * std::f32::consts::PI).cos() / 2.0)
}

/// Appends eased shape primitives and scatters decorations; `finish` yields
/// the closed loop. Elevation continuity is structural: every new segment
/// starts at the previous segment's end elevation.
pub struct TrackBuilder {
    segments: Vec<Segment>,
}

impl TrackBuilder {
    pub fn new() -> TrackBuilder {
        TrackBuilder { segments: Vec::new() }
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    fn last_elevation(&self) -> f32 {
        self.segments.last().map_or(0.0, |s| s.world2.z)
    }

    fn add_segment(&mut self, curve: f32, elevation: f32) {
        let n = self.segments.len();
        let shade = if (n / RUMBLE_LENGTH) % 2 == 1 {
            Shade::Dark
        } else {
            Shade::Light
        };
        self.segments.push(Segment {
            index: n,
            world1: Vector3::new(0.0, n as f32 * SEGMENT_LENGTH, self.last_elevation()),
            world2: Vector3::new(0.0, (n + 1) as f32 * SEGMENT_LENGTH, elevation),
            screen1: Vector3::new(0.0, 0.0, 0.0),
            screen2: Vector3::new(0.0, 0.0, 0.0),
            curve,
            shade,
            clip_height: 0,
            decorations: Vec::new(),
            cars: Vec::new(),
            shots: Vec::new(),
            particles: Vec::new(),
        });
    }

    pub fn add_straight(&mut self, count: usize, elevation: f32) {
        for _ in 0..count {
            self.add_segment(0.0, elevation);
        }
    }

    pub fn add_flat_turn(&mut self, enter: usize, hold: usize, leave: usize, curve: f32, elevation: f32) {
        for i in 0..enter {
            self.add_segment(ease_in(0.0, curve, i as f32 / enter as f32), elevation);
        }
        for _ in 0..hold {
            self.add_segment(curve, elevation);
        }
        for i in 0..leave {
            self.add_segment(ease_out(curve, 0.0, i as f32 / leave as f32), elevation);
        }
    }

    /// Curvature ease-in/hold/ease-out composed with a three-point elevation
    /// ease so both share phase boundaries.
    pub fn add_sloped_turn(&mut self, enter: usize, hold: usize, leave: usize, curve: f32, elevation: f32) {
        let first = self.last_elevation();
        let total = (enter + hold + leave) as f32;
        let second = (enter as f32 / total) * (elevation - first) + first;
        let third = ((enter + hold) as f32 / total) * (elevation - first) + first;

        for i in 0..enter {
            let frac = i as f32 / enter as f32;
            self.add_segment(ease_in(0.0, curve, frac), ease_in_out(first, second, frac));
        }
        for i in 0..hold {
            let frac = i as f32 / hold as f32;
            self.add_segment(curve, ease_in_out(second, third, frac));
        }
        for i in 0..leave {
            let frac = i as f32 / leave as f32;
            self.add_segment(ease_out(curve, 0.0, frac), ease_in_out(third, elevation, frac));
        }
    }

    /// Climbs to `elevation`, holds, and returns to the elevation that
    /// preceded the hill.
    pub fn add_straight_hill(&mut self, enter: usize, hold: usize, leave: usize, elevation: f32) {
        let base = self.last_elevation();
        for i in 0..enter {
            self.add_segment(0.0, ease_in_out(base, elevation, i as f32 / enter as f32));
        }
        for _ in 0..hold {
            self.add_segment(0.0, elevation);
        }
        for i in 0..leave {
            self.add_segment(0.0, ease_in_out(elevation, base, i as f32 / leave as f32));
        }
    }

    /// Monotonic elevation ease to `exit_elevation`.
    pub fn add_slope(&mut self, count: usize, exit_elevation: f32) {
        let start = self.last_elevation();
        for i in 0..count {
            self.add_segment(0.0, ease_in_out(start, exit_elevation, i as f32 / count as f32));
        }
    }

    pub fn add_left_curve(&mut self) {
        self.add_flat_turn(ROAD_MEDIUM, ROAD_MEDIUM, ROAD_MEDIUM, CURVE_EASY, self.last_elevation());
    }

    pub fn add_right_curve(&mut self) {
        self.add_flat_turn(ROAD_MEDIUM, ROAD_MEDIUM, ROAD_MEDIUM, -CURVE_EASY, self.last_elevation());
    }

    pub fn add_left_hairpin(&mut self) {
        self.add_flat_turn(ROAD_MEDIUM, ROAD_SHORT, ROAD_MEDIUM, CURVE_HARD, self.last_elevation());
    }

    pub fn add_right_hairpin(&mut self) {
        self.add_flat_turn(ROAD_MEDIUM, ROAD_SHORT, ROAD_MEDIUM, -CURVE_HARD, self.last_elevation());
    }

    pub fn add_s_curves(&mut self) {
        let elev = self.last_elevation();
        self.add_flat_turn(ROAD_MEDIUM, ROAD_MEDIUM, ROAD_MEDIUM, -CURVE_EASY, elev);
        self.add_flat_turn(ROAD_MEDIUM, ROAD_MEDIUM, ROAD_MEDIUM, CURVE_MEDIUM, elev);
        self.add_flat_turn(ROAD_MEDIUM, ROAD_MEDIUM, ROAD_MEDIUM, CURVE_EASY, elev);
        self.add_flat_turn(ROAD_MEDIUM, ROAD_MEDIUM, ROAD_MEDIUM, -CURVE_EASY, elev);
        self.add_flat_turn(ROAD_MEDIUM, ROAD_MEDIUM, ROAD_MEDIUM, -CURVE_MEDIUM, elev);
    }

    pub fn add_decoration(&mut self, segment_index: usize, x_offset: f32, tree_index: usize) {
        if let Some(segment) = self.segments.get_mut(segment_index) {
            segment.decorations.push(Decoration { x_offset, tree_index });
        }
    }

    /// Scatters trees on the right shoulder every `step` segments, at a
    /// lateral offset of `near` plus up to `spread` further out.
    pub fn scatter_right(&mut self, rng: &mut SmallRng, from: usize, to: usize, step: usize, near: f32, spread: f32) {
        let to = to.min(self.segments.len());
        for s in (from..to).step_by(step) {
            let x = rng.random::<f32>() * spread + near;
            let tree = rng.random_range(0..TREE_VARIANTS);
            self.add_decoration(s, x, tree);
        }
    }

    pub fn scatter_left(&mut self, rng: &mut SmallRng, from: usize, to: usize, step: usize, near: f32, spread: f32) {
        let to = to.min(self.segments.len());
        for s in (from..to).step_by(step) {
            let x = -(rng.random::<f32>() * spread + near);
            let tree = rng.random_range(0..TREE_VARIANTS);
            self.add_decoration(s, x, tree);
        }
    }

    pub fn scatter_both(&mut self, rng: &mut SmallRng, from: usize, to: usize, step: usize) {
        let to = to.min(self.segments.len());
        for s in (from..to).step_by(step) {
            let right = rng.random::<f32>() * 0.6 + 1.3;
            let tree = rng.random_range(0..TREE_VARIANTS);
            self.add_decoration(s, right, tree);
            let left = -(rng.random::<f32>() * 0.6 + 1.8);
            let tree = rng.random_range(0..TREE_VARIANTS);
            self.add_decoration(s, left, tree);
        }
    }

    /// Coin-flips each placement between the two shoulders.
    pub fn scatter_either(&mut self, rng: &mut SmallRng, from: usize, to: usize, step: usize) {
        let to = to.min(self.segments.len());
        for s in (from..to).step_by(step) {
            let x = if rng.random::<f32>() > 0.5 {
                rng.random::<f32>() * 0.6 + 1.3
            } else {
                -(rng.random::<f32>() * 0.6 + 1.8)
            };
            let tree = rng.random_range(0..TREE_VARIANTS);
            self.add_decoration(s, x, tree);
        }
    }

    pub fn finish(self) -> Track {
        assert!(!self.segments.is_empty(), "a track must have segments");
        Track { segments: self.segments }
    }
}

/// Everything a leg authors besides its geometry.
pub struct LegPlan {
    pub track: Track,
    pub backdrop_index: usize,
    pub car_count: usize,
    pub laps_needed: i32,
}

pub fn build_leg(leg: Leg, rng: &mut SmallRng) -> LegPlan {
    let (track, car_count, laps_needed) = match leg {
        Leg::Seattle => build_seattle(rng),
        Leg::Olympia => build_olympia(rng),
        Leg::Astoria => build_astoria(rng),
        Leg::Newport => build_newport(rng),
        Leg::Florence => build_florence(rng),
        Leg::GoldBeach => build_gold_beach(rng),
        Leg::CrescentCity => build_crescent_city(rng),
        Leg::Eureka => build_eureka(rng),
    };
    info!(
        "built leg {:?}: {} segments, {} cars, {} laps",
        leg,
        track.segments.len(),
        car_count,
        laps_needed
    );
    LegPlan {
        track,
        backdrop_index: leg.index(),
        car_count,
        laps_needed,
    }
}

fn build_seattle(rng: &mut SmallRng) -> (Track, usize, i32) {
    let mut b = TrackBuilder::new();
    b.add_right_curve();
    b.add_left_curve();
    b.add_straight(ROAD_SHORT, HILL_NONE);
    b.add_straight_hill(ROAD_LONG, ROAD_MEDIUM, ROAD_MEDIUM, HILL_MEDIUM);
    b.add_straight(ROAD_MEDIUM, HILL_NONE);
    b.add_straight_hill(ROAD_MEDIUM, ROAD_MEDIUM, ROAD_MEDIUM, HILL_HIGH);
    b.add_straight(ROAD_MEDIUM, HILL_NONE);
    b.add_left_curve();
    b.add_straight(ROAD_MEDIUM, HILL_NONE);
    b.add_s_curves();
    b.add_straight(ROAD_MEDIUM, HILL_NONE);

    b.scatter_right(rng, 30, 150, 4, 1.6, 0.4);
    b.scatter_left(rng, 160, 300, 4, 1.8, 0.6);
    b.scatter_both(rng, 525, 575, 4);
    b.scatter_both(rng, 775, 925, 4);
    b.scatter_either(rng, 975, 1725, 4);
    (b.finish(), 6, 3)
}

fn build_olympia(rng: &mut SmallRng) -> (Track, usize, i32) {
    let mut b = TrackBuilder::new();
    b.add_straight(ROAD_MEDIUM, HILL_NONE);
    b.add_decoration(1, 2.0, rng.random_range(0..TREE_VARIANTS));
    b.add_decoration(1, -2.0, rng.random_range(0..TREE_VARIANTS));
    b.scatter_left(rng, 25, b.segment_count(), 3, 1.5, 1.0);
    b.add_right_hairpin();

    let checkpoint = b.segment_count();
    b.add_straight(ROAD_MEDIUM, HILL_NONE);
    b.scatter_right(rng, checkpoint, b.segment_count(), 4, 1.5, 1.0);
    b.add_left_curve();
    b.add_straight(ROAD_MEDIUM, HILL_NONE);
    b.add_right_curve();
    b.add_straight(ROAD_MEDIUM, HILL_NONE);
    b.add_left_hairpin();
    b.add_straight_hill(ROAD_SHORT, ROAD_SHORT, ROAD_SHORT, HILL_LOW);
    b.add_flat_turn(ROAD_LONG, ROAD_LONG, ROAD_LONG, CURVE_EASY, HILL_NONE);

    let checkpoint = b.segment_count();
    b.add_straight(ROAD_SHORT, HILL_NONE);
    b.add_right_curve();
    b.scatter_both(rng, checkpoint, b.segment_count(), 7);
    b.add_straight(ROAD_MEDIUM, HILL_NONE);
    b.add_straight_hill(ROAD_LONG, ROAD_LONG, ROAD_LONG, HILL_MEDIUM);
    b.add_straight(ROAD_SHORT, HILL_NONE);
    (b.finish(), 8, 5)
}

fn build_astoria(rng: &mut SmallRng) -> (Track, usize, i32) {
    let mut b = TrackBuilder::new();
    b.add_straight(ROAD_LONG, HILL_NONE);
    b.add_right_curve();
    b.add_straight(ROAD_MEDIUM, HILL_NONE);
    b.add_right_hairpin();
    b.add_right_curve();
    b.add_straight(ROAD_SHORT, HILL_NONE);
    b.add_left_curve();
    b.add_straight(ROAD_MEDIUM, HILL_NONE);
    b.add_s_curves();
    b.add_straight(ROAD_MEDIUM, HILL_NONE);
    b.add_left_curve();
    b.add_straight_hill(ROAD_LONG, ROAD_MEDIUM, ROAD_MEDIUM, HILL_MEDIUM);
    b.add_left_curve();
    b.add_straight(ROAD_MEDIUM, HILL_NONE);
    b.add_left_curve();
    b.add_straight_hill(ROAD_MEDIUM, ROAD_MEDIUM, ROAD_MEDIUM, HILL_HIGH);
    b.add_left_curve();
    b.add_straight(ROAD_MEDIUM, HILL_NONE);

    b.scatter_right(rng, 30, 150, 4, 1.6, 0.4);
    b.scatter_left(rng, 160, 300, 4, 1.8, 0.6);
    b.scatter_both(rng, 525, 575, 4);
    b.scatter_both(rng, 775, 925, 4);
    b.scatter_either(rng, 975, 1725, 4);
    (b.finish(), 8, 5)
}

fn build_newport(rng: &mut SmallRng) -> (Track, usize, i32) {
    let mut b = TrackBuilder::new();
    b.add_straight(ROAD_LONG, HILL_NONE);

    let checkpoint = b.segment_count();
    b.add_flat_turn(ROAD_LONG, ROAD_SHORT, ROAD_LONG, -CURVE_EASY, HILL_NONE);
    b.add_straight(ROAD_SHORT, HILL_NONE);
    b.scatter_left(rng, checkpoint, b.segment_count(), 4, 1.5, 1.0);
    b.add_flat_turn(ROAD_SHORT, ROAD_MEDIUM, ROAD_LONG, CURVE_MEDIUM, HILL_NONE);
    b.add_straight(ROAD_SHORT, HILL_NONE);

    let checkpoint = b.segment_count();
    b.add_flat_turn(ROAD_SHORT, ROAD_SHORT, ROAD_SHORT, CURVE_MEDIUM, HILL_NONE);
    b.add_flat_turn(ROAD_SHORT, ROAD_MEDIUM, ROAD_SHORT, -CURVE_MEDIUM, HILL_NONE);
    b.add_flat_turn(ROAD_SHORT, ROAD_MEDIUM, ROAD_LONG, -CURVE_EASY, HILL_NONE);
    b.scatter_right(rng, checkpoint, b.segment_count(), 4, 1.5, 1.0);
    b.add_straight(ROAD_SHORT, HILL_NONE);
    b.add_straight_hill(ROAD_MEDIUM, ROAD_SHORT, ROAD_MEDIUM, HILL_MEDIUM);

    b.add_flat_turn(ROAD_MEDIUM, ROAD_SHORT, ROAD_SHORT, CURVE_HARD, HILL_NONE);
    b.add_flat_turn(ROAD_MEDIUM, ROAD_MEDIUM, ROAD_MEDIUM, -CURVE_MEDIUM, HILL_NONE);
    b.add_flat_turn(ROAD_MEDIUM, ROAD_LONG, ROAD_LONG, -CURVE_EASY, HILL_NONE);
    b.add_straight(ROAD_SHORT, HILL_NONE);
    b.add_straight_hill(ROAD_LONG, ROAD_MEDIUM, ROAD_SHORT, HILL_LOW);

    let checkpoint = b.segment_count();
    b.add_flat_turn(ROAD_MEDIUM, ROAD_LONG, ROAD_LONG, -CURVE_EASY, HILL_NONE);
    b.scatter_right(rng, checkpoint, b.segment_count(), 7, 1.5, 1.0);
    b.add_straight(ROAD_MEDIUM, HILL_NONE);
    b.add_flat_turn(ROAD_SHORT, ROAD_MEDIUM, ROAD_LONG, CURVE_EASY, HILL_NONE);
    b.add_straight(ROAD_MEDIUM, HILL_NONE);
    b.add_flat_turn(ROAD_LONG, ROAD_MEDIUM, ROAD_MEDIUM, CURVE_MEDIUM, HILL_NONE);

    let checkpoint = b.segment_count();
    b.add_straight(ROAD_MEDIUM, HILL_NONE);
    for s in (checkpoint..b.segment_count()).step_by(4) {
        let x = rng.random::<f32>() + 1.5;
        b.add_decoration(s, -x, rng.random_range(0..TREE_VARIANTS));
        b.add_decoration(s, x, rng.random_range(0..TREE_VARIANTS));
    }
    b.add_flat_turn(ROAD_SHORT, ROAD_SHORT, ROAD_SHORT, CURVE_HARD, HILL_NONE);
    b.add_decoration(1, 2.0, rng.random_range(0..TREE_VARIANTS));
    b.add_decoration(1, -2.0, rng.random_range(0..TREE_VARIANTS));
    (b.finish(), 8, 5)
}

fn build_florence(rng: &mut SmallRng) -> (Track, usize, i32) {
    let mut b = TrackBuilder::new();
    b.add_straight(ROAD_LONG, HILL_NONE);
    b.add_right_curve();
    b.add_straight(ROAD_LONG, HILL_NONE);
    b.add_right_curve();
    b.add_straight(ROAD_SHORT, HILL_NONE);
    b.add_right_hairpin();
    b.add_straight(ROAD_MEDIUM, HILL_NONE);
    b.add_left_curve();
    b.add_straight(ROAD_MEDIUM, HILL_NONE);
    b.add_left_curve();
    b.add_straight_hill(ROAD_MEDIUM, ROAD_MEDIUM, ROAD_MEDIUM, HILL_HIGH);
    b.add_s_curves();
    b.add_straight(ROAD_MEDIUM, HILL_NONE);
    b.add_right_hairpin();
    b.add_straight_hill(ROAD_LONG, ROAD_MEDIUM, ROAD_MEDIUM, HILL_MEDIUM);
    b.add_left_curve();
    b.add_straight(ROAD_MEDIUM, HILL_NONE);
    b.add_right_curve();
    b.add_straight(ROAD_MEDIUM, HILL_NONE);

    b.scatter_right(rng, 30, 150, 4, 1.6, 0.4);
    b.scatter_left(rng, 160, 300, 4, 1.8, 0.6);
    b.scatter_both(rng, 525, 575, 4);
    b.scatter_both(rng, 775, 925, 4);
    b.scatter_either(rng, 975, 1725, 4);
    (b.finish(), 10, 6)
}

fn build_gold_beach(rng: &mut SmallRng) -> (Track, usize, i32) {
    let mut b = TrackBuilder::new();
    b.add_straight(ROAD_LONG, HILL_NONE);
    b.add_left_curve();
    b.add_straight_hill(ROAD_MEDIUM, ROAD_MEDIUM, ROAD_MEDIUM, HILL_HIGH);
    b.add_s_curves();
    b.add_straight(ROAD_MEDIUM, HILL_NONE);
    b.add_right_hairpin();
    b.add_straight_hill(ROAD_LONG, ROAD_MEDIUM, ROAD_MEDIUM, HILL_MEDIUM);
    b.add_right_curve();
    b.add_straight(ROAD_LONG, HILL_NONE);
    b.add_right_curve();
    b.add_straight(ROAD_LONG, HILL_NONE);
    b.add_right_curve();
    b.add_straight(ROAD_SHORT, HILL_NONE);
    b.add_right_hairpin();
    b.add_straight(ROAD_MEDIUM, HILL_NONE);
    b.add_left_curve();
    b.add_straight(ROAD_MEDIUM, HILL_NONE);
    b.add_left_curve();
    b.add_straight(ROAD_MEDIUM, HILL_NONE);
    b.add_right_curve();
    b.add_straight(ROAD_MEDIUM, HILL_NONE);

    b.scatter_right(rng, 30, 150, 4, 1.6, 0.4);
    b.scatter_left(rng, 160, 300, 4, 1.8, 0.6);
    b.scatter_both(rng, 525, 575, 4);
    b.scatter_both(rng, 775, 925, 4);
    b.scatter_either(rng, 975, 1725, 4);
    (b.finish(), 10, 6)
}

fn build_crescent_city(rng: &mut SmallRng) -> (Track, usize, i32) {
    let mut b = TrackBuilder::new();
    b.add_straight(ROAD_LONG, HILL_NONE);
    b.add_straight(ROAD_LONG, HILL_NONE);
    b.add_right_curve();
    b.add_straight(ROAD_LONG, HILL_NONE);
    b.add_right_hairpin();
    b.add_straight(ROAD_MEDIUM, HILL_NONE);
    b.add_left_curve();
    b.add_straight(ROAD_MEDIUM, HILL_NONE);
    b.add_left_curve();
    b.add_straight(ROAD_MEDIUM, HILL_NONE);
    b.add_right_hairpin();
    b.add_straight_hill(ROAD_LONG, ROAD_MEDIUM, ROAD_MEDIUM, HILL_MEDIUM);
    b.add_left_curve();
    b.add_straight_hill(ROAD_MEDIUM, ROAD_MEDIUM, ROAD_MEDIUM, HILL_HIGH);
    b.add_s_curves();
    b.add_right_curve();
    b.add_straight(ROAD_SHORT, HILL_NONE);
    b.add_left_hairpin();
    b.add_straight(ROAD_MEDIUM, HILL_NONE);
    b.add_right_curve();
    b.add_straight(ROAD_MEDIUM, HILL_NONE);

    b.scatter_right(rng, 30, 150, 4, 1.6, 0.4);
    b.scatter_left(rng, 160, 300, 4, 1.8, 0.6);
    b.scatter_both(rng, 525, 575, 4);
    b.scatter_both(rng, 775, 925, 4);
    b.scatter_either(rng, 975, 1725, 4);
    (b.finish(), 12, 7)
}

fn build_eureka(rng: &mut SmallRng) -> (Track, usize, i32) {
    let mut b = TrackBuilder::new();
    b.add_straight(ROAD_MEDIUM, HILL_NONE);
    b.add_flat_turn(ROAD_SHORT, ROAD_MEDIUM, ROAD_SHORT, CURVE_EASY, HILL_NONE);
    b.add_straight(ROAD_MEDIUM, HILL_NONE);
    b.add_flat_turn(ROAD_SHORT, ROAD_SHORT, ROAD_SHORT, CURVE_MEDIUM, HILL_NONE);
    b.add_flat_turn(ROAD_SHORT, ROAD_SHORT, ROAD_SHORT, CURVE_MEDIUM, HILL_NONE);

    let checkpoint = b.segment_count();
    b.add_straight(ROAD_MEDIUM, HILL_NONE);
    b.scatter_left(rng, checkpoint, b.segment_count(), 7, 1.5, 1.0);
    b.add_right_curve();
    b.add_straight(ROAD_MEDIUM, HILL_NONE);
    b.add_right_curve();
    b.add_straight(ROAD_MEDIUM, HILL_NONE);
    b.add_flat_turn(ROAD_SHORT, ROAD_MEDIUM, ROAD_SHORT, -CURVE_EASY, HILL_NONE);
    b.add_straight(ROAD_MEDIUM, HILL_NONE);
    b.add_flat_turn(ROAD_SHORT, ROAD_LONG, ROAD_SHORT, CURVE_MEDIUM, HILL_NONE);

    let checkpoint = b.segment_count();
    b.add_slope(ROAD_MEDIUM, HILL_LOW);
    b.scatter_right(rng, checkpoint, b.segment_count(), 7, 1.5, 1.0);
    b.add_flat_turn(ROAD_SHORT, ROAD_MEDIUM, ROAD_LONG, CURVE_MEDIUM, HILL_LOW);
    b.add_slope(ROAD_LONG, HILL_HIGH);

    // the corkscrew
    let checkpoint = b.segment_count();
    b.add_sloped_turn(ROAD_MEDIUM, ROAD_MEDIUM, ROAD_MEDIUM, -CURVE_EASY, HILL_MEDIUM);
    b.add_sloped_turn(ROAD_MEDIUM, ROAD_MEDIUM, ROAD_MEDIUM, CURVE_HARD, HILL_LOW);
    b.add_sloped_turn(ROAD_MEDIUM, ROAD_MEDIUM, ROAD_MEDIUM, -CURVE_HARD, HILL_NONE);
    for s in (checkpoint..b.segment_count()).step_by(7) {
        let x = rng.random::<f32>() + 1.5;
        b.add_decoration(s, -x, rng.random_range(0..TREE_VARIANTS));
        b.add_decoration(s, x, rng.random_range(0..TREE_VARIANTS));
    }

    b.add_straight(ROAD_MEDIUM, HILL_NONE);
    b.add_left_curve();
    let checkpoint = b.segment_count();
    b.add_straight(ROAD_MEDIUM, HILL_NONE);
    b.add_right_curve();
    b.add_straight(ROAD_MEDIUM, HILL_NONE);
    b.scatter_right(rng, checkpoint, b.segment_count(), 7, 1.5, 1.0);
    b.add_flat_turn(ROAD_SHORT, ROAD_MEDIUM, ROAD_MEDIUM, CURVE_MEDIUM, HILL_NONE);
    b.add_straight(ROAD_LONG, HILL_NONE);
    b.add_decoration(1, 2.0, rng.random_range(0..TREE_VARIANTS));
    b.add_decoration(1, -2.0, rng.random_range(0..TREE_VARIANTS));
    (b.finish(), 16, 10)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SEGMENT_LENGTH;
    use rand::SeedableRng;

    fn small_track() -> Track {
        let mut b = TrackBuilder::new();
        b.add_straight(10, 0.0);
        b.finish()
    }

    #[test]
    fn every_leg_upholds_the_length_invariant() {
        for leg in Leg::ALL {
            let mut rng = SmallRng::seed_from_u64(1);
            let plan = build_leg(leg, &mut rng);
            let track = &plan.track;
            assert!(!track.segments.is_empty());
            assert!((track.length() - track.segments.len() as f32 * SEGMENT_LENGTH).abs() < 1e-3);
            for (i, segment) in track.segments.iter().enumerate() {
                assert_eq!(segment.index, i);
            }
        }
    }

    #[test]
    fn elevation_is_continuous_including_wraparound() {
        for leg in Leg::ALL {
            let mut rng = SmallRng::seed_from_u64(2);
            let track = build_leg(leg, &mut rng).track;
            for pair in track.segments.windows(2) {
                assert_eq!(pair[0].world2.z, pair[1].world1.z);
            }
            let last = track.segments.last().unwrap();
            let first = &track.segments[0];
            assert!(
                (last.world2.z - first.world1.z).abs() < 1e-3,
                "{:?} does not close its elevation loop",
                leg
            );
        }
    }

    #[test]
    fn shade_bands_alternate_at_the_band_length() {
        let mut b = TrackBuilder::new();
        b.add_straight(RUMBLE_LENGTH * 4, 0.0);
        let track = b.finish();
        for segment in &track.segments {
            let expected = if (segment.index / RUMBLE_LENGTH) % 2 == 1 {
                Shade::Dark
            } else {
                Shade::Light
            };
            assert_eq!(segment.shade, expected);
        }
        assert_ne!(track.segments[0].shade, track.segments[RUMBLE_LENGTH].shade);
    }

    #[test]
    fn index_at_is_pure_in_position_mod_length() {
        let track = small_track();
        let length = track.length();
        for p in [0.0f32, 0.3, 5.0, 13.7, 19.999] {
            assert_eq!(track.index_at(p), track.index_at(p + length));
            assert_eq!(track.index_at(p), track.index_at(p + 3.0 * length));
        }
    }

    #[test]
    fn fraction_within_is_idempotent_under_wraparound() {
        let track = small_track();
        let length = track.length();
        let p = 7.3f32;
        let base = fraction_within(p);
        let wrapped = fraction_within((p + length) % length);
        assert!((base - wrapped).abs() < 1e-5);
    }

    #[test]
    fn ease_functions_hit_their_endpoints() {
        assert_eq!(ease_in(1.0, 5.0, 0.0), 1.0);
        assert_eq!(ease_in(1.0, 5.0, 1.0), 5.0);
        assert_eq!(ease_out(1.0, 5.0, 0.0), 1.0);
        assert_eq!(ease_out(1.0, 5.0, 1.0), 5.0);
        assert!((ease_in_out(0.0, 2.0, 0.5) - 1.0).abs() < 1e-5);
        assert!(ease_in_out(0.0, 2.0, 0.0).abs() < 1e-5);
    }

    #[test]
    fn zero_length_phases_add_nothing() {
        let mut b = TrackBuilder::new();
        b.add_flat_turn(0, 0, 0, CURVE_HARD, 0.0);
        b.add_straight(1, 0.0);
        assert_eq!(b.segment_count(), 1);
    }

    #[test]
    fn decoration_scatter_is_reproducible_under_a_seed() {
        let collect = |seed: u64| {
            let mut rng = SmallRng::seed_from_u64(seed);
            let track = build_leg(Leg::Seattle, &mut rng).track;
            track
                .segments
                .iter()
                .flat_map(|s| s.decorations.iter().map(|d| (s.index, d.x_offset.to_bits(), d.tree_index)))
                .collect::<Vec<_>>()
        };
        let a = collect(42);
        let b = collect(42);
        assert!(!a.is_empty());
        assert_eq!(a, b);
    }
}
