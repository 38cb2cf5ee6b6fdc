// Tuning constants for the highway mode. Palette indices refer to
// core::surface::PALETTE.

// Road scene colors
pub const DARK_GRASS_COLOR: u8 = 4;
pub const LIGHT_GRASS_COLOR: u8 = 12;
pub const DARK_ROAD_COLOR: u8 = 5;
pub const LIGHT_ROAD_COLOR: u8 = 10;
pub const DARK_RUMBLE_COLOR: u8 = 1;
pub const LIGHT_RUMBLE_COLOR: u8 = 15;
pub const SHOT_COLOR: u8 = 0;
pub const HUD_HITPOINT_COLOR: u8 = 9;

// Distance fade targets (RGBA), blended in by draw-distance fraction
pub const ROAD_FADE_RGBA: [u8; 4] = [128, 128, 128, 255];
pub const RUMBLE_FADE_RGBA: [u8; 4] = [255, 128, 128, 255];
pub const GRASS_FADE_RGBA: [u8; 4] = [128, 255, 128, 255];

// Track geometry
pub const SEGMENT_LENGTH: f32 = 2.0;
pub const RUMBLE_LENGTH: usize = 4; // segments per light/dark band
pub const ROAD_WIDTH: f32 = 2.4; // projected half-width multiplier
pub const RUMBLE_FRAC: f32 = 0.3; // rumble strip width relative to road

// Camera
pub const CAMERA_FOV_DEGREES: f32 = 45.0;
pub const WORLD_CAMERA_HEIGHT: f32 = 2.0;
pub const DRAW_DISTANCE: usize = 40; // segments projected per frame

// Player car physics
pub const MAX_SPEED: f32 = 60.0;
pub const ACCEL: f32 = 10.0;
pub const BRAKE: f32 = 15.0;
pub const COAST_DECEL: f32 = -1.0;
pub const OFF_ROAD_DECEL: f32 = -3.0;
pub const OFF_ROAD_LIMIT: f32 = 20.0; // off-road slowdown only above this speed
pub const CENTRIFUGAL: f32 = 30.0; // lateral push through a curve
pub const PLAYER_MAX_X: f32 = 2.0;
pub const ROAD_EDGE_X: f32 = 1.0;
pub const START_SPEED: f32 = 15.0;
pub const PLAYER_HIT_POINTS: i32 = 3;
pub const CAR_VISUAL_OFFSET: f32 = 7.0; // player sprite sits this far ahead of the camera

// Projectiles
pub const SHOT_SPEED: f32 = 30.0; // added on top of player speed
pub const SHOT_RANGE: f32 = 100.0;
pub const SHOT_HIT_RADIUS: f32 = 0.25;

// Player collision
pub const PLAYER_HIT_RADIUS: f32 = 0.3;

// Traffic
pub const TRAFFIC_MIN_SPEED: f32 = 5.0;
pub const TRAFFIC_MAX_SPEED: f32 = 30.0;
pub const TRAFFIC_SPAWN_LEAD: f32 = 75.0; // world units ahead of segment 0
pub const OVERTAKE_WINDOW_FRAC: f32 = 0.1; // forward window, fraction of track length

// Particles
pub const EXPLOSION_PARTICLES: usize = 400;
pub const EXPLOSION_BASE_SPEED: f32 = 2.0;
pub const EXPLOSION_LIFETIME: f32 = 1.5;
pub const EXPLOSION_COLORS: [u8; 10] = [0, 1, 3, 5, 7, 9, 10, 11, 13, 15];
pub const PARTICLE_GRAVITY: f32 = -1.0;

// Renderer scale factors
pub const TREE_SCALE: f32 = 1.0 / 9.0;
pub const CAR_SCALE: f32 = 1.0 / 22.3;
pub const SHOT_SCALE: f32 = 1.0 / 10.0;
pub const PARTICLE_SCALE: f32 = 1.0 / 4.0;
pub const PARTICLE_Y_FACTOR: f32 = 12.0;

// Sky
pub const SKY_SPEED: f32 = 0.3;
pub const SKY_START_OFFSET: f32 = -30.0;

// Presentation timers
pub const ATTRACT_PROMPT_DELAY: f32 = 2.0; // seconds before "PRESS FIRE" accepts input
pub const WINNER_DURATION: f32 = 5.0;
pub const DEATH_RESET_SECONDS: f32 = 4.0;

// Frame pacing
pub const MAX_DELTA_TIME: f32 = 0.1;
