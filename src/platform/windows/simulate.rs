//! Windows click injection using SendInput.

use crate::error::{Error, Result};
use std::mem::size_of;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    INPUT, INPUT_0, INPUT_MOUSE, MOUSE_EVENT_FLAGS, MOUSEEVENTF_ABSOLUTE, MOUSEEVENTF_LEFTDOWN,
    MOUSEEVENTF_LEFTUP, MOUSEEVENTF_MOVE, MOUSEEVENTF_VIRTUALDESK, MOUSEINPUT, SendInput,
};
use windows::Win32::UI::WindowsAndMessaging::{
    GetSystemMetrics, SM_CXVIRTUALSCREEN, SM_CYVIRTUALSCREEN,
};

/// Send a mouse event
fn sim_mouse_event(flags: MOUSE_EVENT_FLAGS, dx: i32, dy: i32) -> Result<()> {
    let input = INPUT {
        r#type: INPUT_MOUSE,
        Anonymous: INPUT_0 {
            mi: MOUSEINPUT {
                dx,
                dy,
                mouseData: 0,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    };

    let inputs = [input];
    let result = unsafe { SendInput(&inputs, size_of::<INPUT>() as i32) };

    if result != 1 {
        Err(Error::InjectFailed(
            "SendInput failed for mouse event".into(),
        ))
    } else {
        Ok(())
    }
}

/// Inject a left-button press at the current cursor position.
pub fn button_down() -> Result<()> {
    sim_mouse_event(MOUSEEVENTF_LEFTDOWN, 0, 0)
}

/// Inject a left-button release at the current cursor position.
pub fn button_up() -> Result<()> {
    sim_mouse_event(MOUSEEVENTF_LEFTUP, 0, 0)
}

/// Move the cursor to a position.
pub fn move_cursor(x: f64, y: f64) -> Result<()> {
    let width = unsafe { GetSystemMetrics(SM_CXVIRTUALSCREEN) };
    let height = unsafe { GetSystemMetrics(SM_CYVIRTUALSCREEN) };

    if width == 0 || height == 0 {
        return Err(Error::InjectFailed("failed to get screen metrics".into()));
    }

    let normalized_x = ((x as i32 + 1) * 65535) / width;
    let normalized_y = ((y as i32 + 1) * 65535) / height;

    sim_mouse_event(
        MOUSEEVENTF_MOVE | MOUSEEVENTF_ABSOLUTE | MOUSEEVENTF_VIRTUALDESK,
        normalized_x,
        normalized_y,
    )
}
