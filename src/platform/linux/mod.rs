//! Linux platform implementation.
//!
//! The X11 backend (XRecord for listening, XTest for injection) sits behind
//! the `x11` feature so the core library builds without the X development
//! libraries. Without the feature every platform call reports the missing
//! capability at startup instead.

#[cfg(feature = "x11")]
mod x11;

#[cfg(feature = "x11")]
pub use x11::*;

// If the X11 feature is not enabled, provide stub implementations
#[cfg(not(feature = "x11"))]
mod stub {
    use crate::error::{Error, Result};
    use crate::hook::HookEventHandler;
    use std::sync::Arc;
    use std::sync::atomic::AtomicBool;

    const REMEDY: &str =
        "no Linux input backend enabled; build with the 'x11' feature (requires libX11/libXtst)";

    pub fn run_hook<H: HookEventHandler + 'static>(
        _running: &Arc<AtomicBool>,
        _handler: H,
    ) -> Result<()> {
        Err(Error::CapabilityMissing(REMEDY.into()))
    }

    pub fn stop_hook() -> Result<()> {
        Ok(())
    }

    pub fn cursor_position() -> Result<(f64, f64)> {
        Err(Error::CapabilityMissing(REMEDY.into()))
    }

    pub fn move_cursor(_x: f64, _y: f64) -> Result<()> {
        Err(Error::CapabilityMissing(REMEDY.into()))
    }

    pub fn button_down() -> Result<()> {
        Err(Error::CapabilityMissing(REMEDY.into()))
    }

    pub fn button_up() -> Result<()> {
        Err(Error::CapabilityMissing(REMEDY.into()))
    }
}

#[cfg(not(feature = "x11"))]
pub use stub::*;
