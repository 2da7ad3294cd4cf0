//! Keyboard camera controls, polled once per frame.
//!
//! | key   | effect                   |
//! |-------|--------------------------|
//! | E / Q | move forwards / backwards |
//! | A / D | yaw left / right          |
//! | S / W | pitch down / up           |

use prism_engine::input::{InputState, Key};
use prism_engine::scene::Camera;

/// World units per frame.
pub const MOVE_STEP: f32 = 0.1;
/// Radians per frame.
pub const TURN_STEP: f32 = 0.04;

/// Applies every held control key to `camera`. Returns whether it moved.
pub fn apply_controls(input: &InputState, camera: &mut Camera) -> bool {
    let mut moved = false;
    let mut held = |key: Key| {
        let down = input.key_down(key);
        moved |= down;
        down
    };

    let forwards = axis(held(Key::E), held(Key::Q));
    let phi = axis(held(Key::A), held(Key::D));
    let theta = axis(held(Key::S), held(Key::W));

    if forwards != 0.0 {
        camera.move_forwards(forwards * MOVE_STEP);
    }
    if phi != 0.0 {
        camera.adjust_phi(phi * TURN_STEP);
    }
    if theta != 0.0 {
        camera.adjust_theta(theta * TURN_STEP);
    }
    moved
}

fn axis(positive: bool, negative: bool) -> f32 {
    positive as u8 as f32 - negative as u8 as f32
}
