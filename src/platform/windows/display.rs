//! Windows cursor queries.

use crate::error::{Error, Result};
use windows::Win32::Foundation::POINT;
use windows::Win32::UI::WindowsAndMessaging::GetCursorPos;

/// Get the current cursor position in screen coordinates.
pub fn cursor_position() -> Result<(f64, f64)> {
    let mut point = POINT::default();
    unsafe { GetCursorPos(&mut point) }
        .map_err(|e| Error::Platform(format!("GetCursorPos failed: {e}")))?;
    Ok((point.x as f64, point.y as f64))
}
