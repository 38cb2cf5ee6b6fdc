use log::info;

use crate::config::{PLAYER_HIT_POINTS, START_SPEED};

/// The eight stops of the coastal run, raced in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leg {
    Seattle = 0,
    Olympia = 1,
    Astoria = 2,
    Newport = 3,
    Florence = 4,
    GoldBeach = 5,
    CrescentCity = 6,
    Eureka = 7,
}

impl Leg {
    pub const ALL: [Leg; 8] = [
        Leg::Seattle,
        Leg::Olympia,
        Leg::Astoria,
        Leg::Newport,
        Leg::Florence,
        Leg::GoldBeach,
        Leg::CrescentCity,
        Leg::Eureka,
    ];

    pub fn first() -> Leg {
        Leg::Seattle
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Leg> {
        Leg::ALL.get(index).copied()
    }

    /// The leg after this one, or `None` past the finish in Eureka.
    pub fn next(self) -> Option<Leg> {
        Leg::from_index(self.index() + 1)
    }
}

/// Per-leg race bookkeeping plus the presentation flags. Attract and winner
/// both keep the world animating; they only gate input and overlays.
#[derive(Debug)]
pub struct RaceState {
    pub leg: Leg,
    pub laps_remaining: i32,
    pub hit_points: i32,
    pub dead_timer: f32,
    pub showing_attract: bool,
    pub showing_winner: bool,
    /// Shared timer for the attract prompt delay and the winner display.
    pub overlay_timer: f32,
    pub backdrop_index: usize,
    /// Camera position along the track, wraps mod track length.
    pub track_position: f32,
    pub player_x: f32,
    pub speed: f32,
}

impl RaceState {
    pub fn new() -> RaceState {
        let mut state = RaceState {
            leg: Leg::first(),
            laps_remaining: 0,
            hit_points: PLAYER_HIT_POINTS,
            dead_timer: 0.0,
            showing_attract: true,
            showing_winner: false,
            overlay_timer: 0.0,
            backdrop_index: 0,
            track_position: 0.0,
            player_x: 0.0,
            speed: START_SPEED,
        };
        state.reset_to_attract();
        state
    }

    pub fn reset_to_attract(&mut self) {
        info!("returning to attract");
        self.showing_attract = true;
        self.showing_winner = false;
        self.hit_points = PLAYER_HIT_POINTS;
        self.dead_timer = 0.0;
        self.overlay_timer = 0.0;
        self.speed = START_SPEED;
        self.track_position = 0.0;
        self.player_x = 0.0;
        self.leg = Leg::first();
    }

    /// Resets the player for a fresh leg; the caller rebuilds track and
    /// traffic and applies the leg's authored laps/backdrop.
    pub fn begin_leg(&mut self, leg: Leg) {
        info!("starting leg {:?}", leg);
        self.leg = leg;
        self.showing_attract = false;
        self.showing_winner = false;
        self.hit_points = PLAYER_HIT_POINTS;
        self.dead_timer = 0.0;
        self.overlay_timer = 0.0;
        self.speed = START_SPEED;
        self.track_position = 0.0;
        self.player_x = 0.0;
    }

    pub fn enter_winner(&mut self) {
        info!("race complete");
        self.showing_winner = true;
        self.overlay_timer = 0.0;
    }

    pub fn is_racing(&self) -> bool {
        !self.showing_attract && !self.showing_winner
    }

    pub fn player_alive(&self) -> bool {
        self.hit_points > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legs_run_in_order_and_stop_at_the_finish() {
        let mut leg = Leg::first();
        let mut visited = vec![leg];
        while let Some(next) = leg.next() {
            visited.push(next);
            leg = next;
        }
        assert_eq!(visited, Leg::ALL.to_vec());
        assert_eq!(leg, Leg::Eureka);
    }

    #[test]
    fn from_index_round_trips() {
        for leg in Leg::ALL {
            assert_eq!(Leg::from_index(leg.index()), Some(leg));
        }
        assert_eq!(Leg::from_index(8), None);
    }

    #[test]
    fn begin_leg_resets_player_but_keeps_target_leg() {
        let mut state = RaceState::new();
        state.hit_points = 1;
        state.track_position = 123.0;
        state.player_x = -1.5;
        state.begin_leg(Leg::Newport);
        assert_eq!(state.leg, Leg::Newport);
        assert!(state.is_racing());
        assert_eq!(state.hit_points, PLAYER_HIT_POINTS);
        assert_eq!(state.track_position, 0.0);
        assert_eq!(state.player_x, 0.0);
        assert_eq!(state.speed, START_SPEED);
    }

    #[test]
    fn attract_and_winner_are_not_racing() {
        let mut state = RaceState::new();
        assert!(!state.is_racing());
        state.begin_leg(Leg::first());
        assert!(state.is_racing());
        state.enter_winner();
        assert!(!state.is_racing());
    }
}
