//! Device-agnostic input sampling
//!
//! The host reads its keyboard/gamepad however it likes and fills an
//! [`InputState`] once per frame; [`sample`] reduces that to the two values
//! the controller consumes. Missing devices degrade to neutral input.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Raw device state for one frame, as reported by the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Dedicated jump button (gamepad face button etc.)
    pub jump_button: bool,
    /// Analog stick, if a gamepad is in use; overrides the digital keys
    pub stick: Option<Vec2>,
}

/// The sampled input the controller actually consumes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputSample {
    /// Directional input; {-1,0,1} per axis from keys, or the raw stick
    pub move_dir: Vec2,
    /// Jump held this frame (up key or jump button)
    pub jump_held: bool,
}

fn axis(positive: bool, negative: bool) -> f32 {
    (positive as i32 - negative as i32) as f32
}

/// Reduce raw device state to directional input and jump-hold. Pure.
pub fn sample(state: &InputState) -> InputSample {
    let move_dir = match state.stick {
        Some(stick) => stick,
        None => Vec2::new(axis(state.right, state.left), axis(state.up, state.down)),
    };

    InputSample {
        move_dir,
        jump_held: state.up || state.jump_button,
    }
}
