//! DOM event wiring. Each browser event maps to one visualizer entry point.

mod controls;
mod keyboard;
mod media;

pub use controls::{load_source, wire_controls, wire_gesture_unlock, wire_resize};
pub use keyboard::wire_global_keydown;
