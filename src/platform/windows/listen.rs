//! Windows pointer listening using a low-level mouse hook.

use crate::error::{Error, Result};
use crate::hook::{HookEventHandler, RawHook};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use windows::Win32::Foundation::{LPARAM, LRESULT, WPARAM};
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, GetMessageW, HC_ACTION, HHOOK, MSG, MSLLHOOKSTRUCT, PostThreadMessageW,
    SetWindowsHookExW, UnhookWindowsHookEx, WH_MOUSE_LL, WM_LBUTTONDOWN, WM_LBUTTONUP, WM_QUIT,
};

// Wrapper for HHOOK to make it Send + Sync
#[derive(Clone, Copy)]
struct SendableHHOOK(HHOOK);

// SAFETY: HHOOK is just a handle/pointer that the Windows API owns.
// It's safe to send between threads because Windows handles are thread-safe.
unsafe impl Send for SendableHHOOK {}
unsafe impl Sync for SendableHHOOK {}

/// Stored handler for the callback
static HANDLER: Mutex<Option<Box<dyn HookEventHandler>>> = Mutex::new(None);

/// Flag to signal stopping
static STOP_FLAG: Mutex<Option<Arc<AtomicBool>>> = Mutex::new(None);

/// Hook handle
static MOUSE_HOOK: Mutex<Option<SendableHHOOK>> = Mutex::new(None);

/// Thread ID for message posting
static THREAD_ID: Mutex<u32> = Mutex::new(0);

/// Get point from MSLLHOOKSTRUCT
unsafe fn get_mouse_point(lpdata: LPARAM) -> (i32, i32) {
    let mouse = unsafe { *(lpdata.0 as *const MSLLHOOKSTRUCT) };
    (mouse.pt.x, mouse.pt.y)
}

/// Convert a hook message to a hook notification. Only left-button
/// transitions are of interest.
unsafe fn convert_event(wparam: WPARAM, lparam: LPARAM) -> Option<RawHook> {
    let msg = wparam.0 as u32;
    match msg {
        WM_LBUTTONDOWN => {
            let (x, y) = unsafe { get_mouse_point(lparam) };
            Some(RawHook::Button {
                pressed: true,
                x: x as f64,
                y: y as f64,
            })
        }
        WM_LBUTTONUP => {
            let (x, y) = unsafe { get_mouse_point(lparam) };
            Some(RawHook::Button {
                pressed: false,
                x: x as f64,
                y: y as f64,
            })
        }
        _ => None,
    }
}

/// Mouse hook callback
unsafe extern "system" fn mouse_callback(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    if code == HC_ACTION as i32 {
        // Check stop flag
        if let Ok(guard) = STOP_FLAG.lock()
            && let Some(ref flag) = *guard
            && !flag.load(Ordering::SeqCst)
            && let Ok(thread_id) = THREAD_ID.lock()
        {
            let _ = unsafe { PostThreadMessageW(*thread_id, WM_QUIT, WPARAM(0), LPARAM(0)) };
        }

        if let Some(event) = unsafe { convert_event(wparam, lparam) }
            && let Ok(guard) = HANDLER.lock()
            && let Some(ref handler) = *guard
        {
            handler.handle(event);
        }
    }

    let hook = MOUSE_HOOK.lock().ok().and_then(|g| g.map(|h| h.0));
    unsafe { CallNextHookEx(hook, code, wparam, lparam) }
}

/// Run the pointer hook (blocking).
pub fn run_hook<H: HookEventHandler + 'static>(
    running: &Arc<AtomicBool>,
    handler: H,
) -> Result<()> {
    // Store handler and stop flag
    {
        let mut h = HANDLER
            .lock()
            .map_err(|_| Error::ThreadError("mutex poisoned".into()))?;
        *h = Some(Box::new(handler));
    }
    {
        let mut s = STOP_FLAG
            .lock()
            .map_err(|_| Error::ThreadError("mutex poisoned".into()))?;
        *s = Some(running.clone());
    }

    // Store current thread ID for stopping
    {
        let mut tid = THREAD_ID
            .lock()
            .map_err(|_| Error::ThreadError("mutex poisoned".into()))?;
        *tid = unsafe { GetCurrentThreadId() };
    }

    // Set up the low-level mouse hook
    let mouse_hook = unsafe {
        SetWindowsHookExW(WH_MOUSE_LL, Some(mouse_callback), None, 0)
            .map_err(|e| Error::HookStartFailed(format!("failed to set mouse hook: {e}")))?
    };
    {
        let mut mh = MOUSE_HOOK
            .lock()
            .map_err(|_| Error::ThreadError("mutex poisoned".into()))?;
        *mh = Some(SendableHHOOK(mouse_hook));
    }

    // Announce the hook
    if let Ok(guard) = HANDLER.lock()
        && let Some(ref handler) = *guard
    {
        handler.handle(RawHook::Enabled);
    }

    // Message loop
    let mut msg = MSG::default();
    unsafe {
        while GetMessageW(&mut msg, None, 0, 0).as_bool() {
            // Check stop flag
            if let Ok(guard) = STOP_FLAG.lock()
                && let Some(ref flag) = *guard
                && !flag.load(Ordering::SeqCst)
            {
                break;
            }
        }
    }

    if let Ok(guard) = HANDLER.lock()
        && let Some(ref handler) = *guard
    {
        handler.handle(RawHook::Disabled);
    }

    // Clean up the hook
    unsafe {
        if let Ok(mut mh) = MOUSE_HOOK.lock()
            && let Some(hook) = mh.take()
        {
            let _ = UnhookWindowsHookEx(hook.0);
        }
    }

    // Clean up handler
    {
        let mut h = HANDLER
            .lock()
            .map_err(|_| Error::ThreadError("mutex poisoned".into()))?;
        *h = None;
    }
    {
        let mut s = STOP_FLAG
            .lock()
            .map_err(|_| Error::ThreadError("mutex poisoned".into()))?;
        *s = None;
    }

    Ok(())
}

/// Stop the pointer hook.
pub fn stop_hook() -> Result<()> {
    if let Ok(thread_id) = THREAD_ID.lock()
        && *thread_id != 0
    {
        unsafe {
            let _ = PostThreadMessageW(*thread_id, WM_QUIT, WPARAM(0), LPARAM(0));
        }
    }
    Ok(())
}
