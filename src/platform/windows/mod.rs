//! Windows platform implementation.

mod display;
mod listen;
mod simulate;
mod xinput;

pub use display::cursor_position;
pub use listen::{run_hook, stop_hook};
pub use simulate::{button_down, button_up, move_cursor};
pub use xinput::XInputSource;
