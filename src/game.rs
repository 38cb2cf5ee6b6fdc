use crate::core::input::InputState;
use crate::core::surface::Surface;

/// The contract every game mode shares: one synchronous tick per rendered
/// frame, drawing into the surface before it is presented. The top-level
/// loop owns exactly one mode and passes everything in explicitly.
pub trait Mode {
    fn tick(&mut self, surface: &mut Surface, input: &InputState, dt: f32);
}
