//! The injection seam between the forwarder and the OS.

use crate::error::Result;
use crate::platform;

/// Synthetic pointer injection and cursor queries.
///
/// The forwarder is written once against this trait; production code uses
/// [`SystemInjector`], tests use a recording mock. Injection is fire-and-forget:
/// the OS calls give no useful failure signal, so callers log errors and move on
/// rather than retrying.
pub trait ClickInjector: Send + Sync {
    /// Query the current cursor position in screen coordinates.
    fn cursor_position(&self) -> Result<(f64, f64)>;

    /// Move the cursor to the given screen coordinates.
    fn move_cursor(&self, x: f64, y: f64) -> Result<()>;

    /// Inject a hardware-level left-button down at the current cursor position.
    fn button_down(&self) -> Result<()>;

    /// Inject a hardware-level left-button up at the current cursor position.
    fn button_up(&self) -> Result<()>;
}

/// Injector backed by the real OS injection API (SendInput / XTest).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemInjector;

impl SystemInjector {
    /// Create a system injector.
    pub fn new() -> Self {
        Self
    }
}

impl ClickInjector for SystemInjector {
    fn cursor_position(&self) -> Result<(f64, f64)> {
        platform::cursor_position()
    }

    fn move_cursor(&self, x: f64, y: f64) -> Result<()> {
        platform::move_cursor(x, y)
    }

    fn button_down(&self) -> Result<()> {
        platform::button_down()
    }

    fn button_up(&self) -> Result<()> {
        platform::button_up()
    }
}
