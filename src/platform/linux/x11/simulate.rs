//! X11 click injection using XTest.

use super::display::with_display;
use crate::error::{Error, Result};
use std::os::raw::c_int;
use x11::xlib;
use x11::xtest;

const TRUE: c_int = 1;
const FALSE: c_int = 0;

/// X11 button code for the left mouse button.
const LEFT_BUTTON: u32 = 1;

fn fake_button(is_press: c_int) -> Result<()> {
    with_display(|display| {
        let result = unsafe { xtest::XTestFakeButtonEvent(display, LEFT_BUTTON, is_press, 0) };
        unsafe {
            xlib::XFlush(display);
            xlib::XSync(display, FALSE);
        }
        if result == 0 {
            Err(Error::InjectFailed("XTestFakeButtonEvent failed".into()))
        } else {
            Ok(())
        }
    })
}

/// Inject a left-button press at the current cursor position.
pub fn button_down() -> Result<()> {
    fake_button(TRUE)
}

/// Inject a left-button release at the current cursor position.
pub fn button_up() -> Result<()> {
    fake_button(FALSE)
}

/// Move the cursor to a position.
pub fn move_cursor(x: f64, y: f64) -> Result<()> {
    let x_int = if x.is_finite() {
        x.clamp(c_int::MIN as f64, c_int::MAX as f64).round() as c_int
    } else {
        0
    };
    let y_int = if y.is_finite() {
        y.clamp(c_int::MIN as f64, c_int::MAX as f64).round() as c_int
    } else {
        0
    };

    with_display(|display| {
        let result = unsafe { xtest::XTestFakeMotionEvent(display, 0, x_int, y_int, 0) };
        unsafe {
            xlib::XFlush(display);
            xlib::XSync(display, FALSE);
        }
        if result == 0 {
            Err(Error::InjectFailed("XTestFakeMotionEvent failed".into()))
        } else {
            Ok(())
        }
    })
}
