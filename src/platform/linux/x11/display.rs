//! X11 cursor queries.

use crate::error::{Error, Result};
use std::os::raw::c_int;
use std::ptr::null;
use x11::xlib;

const FALSE: c_int = 0;

/// Get the current cursor position in root-window coordinates.
pub fn cursor_position() -> Result<(f64, f64)> {
    with_display(|display| {
        let screen = unsafe { xlib::XDefaultScreen(display) };
        let root = unsafe { xlib::XRootWindow(display, screen) };

        let mut root_return = 0u64;
        let mut child_return = 0u64;
        let mut root_x: c_int = 0;
        let mut root_y: c_int = 0;
        let mut win_x: c_int = 0;
        let mut win_y: c_int = 0;
        let mut mask: u32 = 0;

        let result = unsafe {
            xlib::XQueryPointer(
                display,
                root,
                &mut root_return,
                &mut child_return,
                &mut root_x,
                &mut root_y,
                &mut win_x,
                &mut win_y,
                &mut mask,
            )
        };

        if result == FALSE {
            Err(Error::Platform("XQueryPointer failed".into()))
        } else {
            Ok((root_x as f64, root_y as f64))
        }
    })
}

pub(super) fn with_display<T>(f: impl FnOnce(*mut xlib::Display) -> Result<T>) -> Result<T> {
    unsafe {
        let display = xlib::XOpenDisplay(null());
        if display.is_null() {
            return Err(Error::Platform("XOpenDisplay failed".into()));
        }
        let result = f(display);
        xlib::XCloseDisplay(display);
        result
    }
}
