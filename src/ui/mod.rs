/// Keyboard input parsing.
pub mod controls;
/// Text frame rendering.
pub mod render;

pub use self::controls::{ControlInput, parse_input};
pub use self::render::{format_clock, render_frame, status_line};
