//! X11 backend: XRecord listening, XTest injection.

mod display;
mod listen;
mod simulate;

pub use display::cursor_position;
pub use listen::{run_hook, stop_hook};
pub use simulate::{button_down, button_up, move_cursor};
