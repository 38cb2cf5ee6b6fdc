use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Keyboard-backed input: held direction keys become steering/throttle axes
/// in [-1, 1]; fire and debug keys are edge-triggered and cleared once per
/// frame by `end_frame`.
#[derive(Default)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub fire_edge: bool,
    pub leg_select_edge: Option<u8>, // 1-8
    pub explosion_test_edge: bool,
}

pub fn init_state() -> InputState {
    InputState::default()
}

impl InputState {
    pub fn steering(&self) -> f32 {
        (self.right as i32 - self.left as i32) as f32
    }

    pub fn throttle(&self) -> f32 {
        (self.up as i32 - self.down as i32) as f32
    }

    pub fn fire_just_pressed(&self) -> bool {
        self.fire_edge
    }

    pub fn leg_select(&self) -> Option<u8> {
        self.leg_select_edge
    }

    pub fn explosion_test(&self) -> bool {
        self.explosion_test_edge
    }

    /// Clears edge-triggered state. Call once after every tick.
    pub fn end_frame(&mut self) {
        self.fire_edge = false;
        self.leg_select_edge = None;
        self.explosion_test_edge = false;
    }
}

pub fn handle_keyboard_input(event: &KeyEvent, state: &mut InputState) {
    let PhysicalKey::Code(code) = event.physical_key else {
        return;
    };
    let is_pressed = event.state == ElementState::Pressed;

    let held = match code {
        KeyCode::ArrowUp | KeyCode::KeyW => Some(&mut state.up),
        KeyCode::ArrowDown | KeyCode::KeyS => Some(&mut state.down),
        KeyCode::ArrowLeft | KeyCode::KeyA => Some(&mut state.left),
        KeyCode::ArrowRight | KeyCode::KeyD => Some(&mut state.right),
        _ => None,
    };
    if let Some(slot) = held {
        *slot = is_pressed;
        return;
    }

    // Edges fire on the initial press only, never on OS key repeat.
    if !is_pressed || event.repeat {
        return;
    }
    match code {
        KeyCode::Space | KeyCode::Enter | KeyCode::KeyZ => state.fire_edge = true,
        KeyCode::KeyX => state.explosion_test_edge = true,
        KeyCode::Digit1 => state.leg_select_edge = Some(1),
        KeyCode::Digit2 => state.leg_select_edge = Some(2),
        KeyCode::Digit3 => state.leg_select_edge = Some(3),
        KeyCode::Digit4 => state.leg_select_edge = Some(4),
        KeyCode::Digit5 => state.leg_select_edge = Some(5),
        KeyCode::Digit6 => state.leg_select_edge = Some(6),
        KeyCode::Digit7 => state.leg_select_edge = Some(7),
        KeyCode::Digit8 => state.leg_select_edge = Some(8),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axes_are_zero_at_rest_and_saturate_held() {
        let mut state = init_state();
        assert_eq!(state.steering(), 0.0);
        assert_eq!(state.throttle(), 0.0);
        state.right = true;
        state.up = true;
        assert_eq!(state.steering(), 1.0);
        assert_eq!(state.throttle(), 1.0);
        state.left = true;
        assert_eq!(state.steering(), 0.0);
    }

    #[test]
    fn edges_clear_at_end_of_frame() {
        let mut state = init_state();
        state.fire_edge = true;
        state.leg_select_edge = Some(3);
        assert!(state.fire_just_pressed());
        state.end_frame();
        assert!(!state.fire_just_pressed());
        assert_eq!(state.leg_select(), None);
    }
}
