//! X11 pointer listening using XRecord.
//!
//! Only button events are recorded; left-button transitions are forwarded to
//! the stored handler, everything else is ignored at the record-range level.

use crate::error::{Error, Result};
use crate::hook::{HookEventHandler, RawHook};
use std::os::raw::{c_char, c_int, c_uchar, c_ulong};
use std::ptr::null;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use x11::xlib;
use x11::xrecord;

/// Stored handler for the callback
static HANDLER: Mutex<Option<Box<dyn HookEventHandler>>> = Mutex::new(None);

/// Flag to signal stopping
static STOP_FLAG: Mutex<Option<Arc<AtomicBool>>> = Mutex::new(None);

/// XRecord context for stopping the hook
static CONTEXT: Mutex<Option<xrecord::XRecordContext>> = Mutex::new(None);

const FALSE: c_int = 0;
const LEFT_BUTTON: u8 = 1;

/// XRecord data structure for events
#[repr(C)]
struct XRecordDatum {
    type_: u8,
    code: u8,
    _rest: u64,
    _1: bool,
    _2: bool,
    _3: bool,
    root_x: i16,
    root_y: i16,
    _event_x: i16,
    _event_y: i16,
    _state: u16,
}

/// Convert an X11 button event to a hook notification.
fn convert_event(type_: c_int, code: u8, x: f64, y: f64) -> Option<RawHook> {
    match type_ {
        t if t == xlib::ButtonPress && code == LEFT_BUTTON => Some(RawHook::Button {
            pressed: true,
            x,
            y,
        }),
        t if t == xlib::ButtonRelease && code == LEFT_BUTTON => Some(RawHook::Button {
            pressed: false,
            x,
            y,
        }),
        _ => None,
    }
}

/// XRecord callback
unsafe extern "C" fn record_callback(
    _null: *mut c_char,
    raw_data: *mut xrecord::XRecordInterceptData,
) {
    unsafe {
        let data = match raw_data.as_ref() {
            Some(d) => d,
            None => return,
        };

        if data.category != xrecord::XRecordFromServer {
            xrecord::XRecordFreeData(raw_data);
            return;
        }

        // Check stop flag
        if let Ok(guard) = STOP_FLAG.lock()
            && let Some(ref flag) = *guard
            && !flag.load(Ordering::SeqCst)
        {
            xrecord::XRecordFreeData(raw_data);
            return;
        }

        // Parse the event data
        #[allow(clippy::cast_ptr_alignment)]
        let xdatum = match (data.data as *const XRecordDatum).as_ref() {
            Some(d) => d,
            None => {
                xrecord::XRecordFreeData(raw_data);
                return;
            }
        };

        let type_ = xdatum.type_ as c_int;
        let code = xdatum.code;
        let x = xdatum.root_x as f64;
        let y = xdatum.root_y as f64;

        if let Some(event) = convert_event(type_, code, x, y)
            && let Ok(guard) = HANDLER.lock()
            && let Some(ref handler) = *guard
        {
            handler.handle(event);
        }

        xrecord::XRecordFreeData(raw_data);
    }
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

    unsafe {
        // Open display
        let dpy_control = xlib::XOpenDisplay(null());
        if dpy_control.is_null() {
            return Err(Error::CapabilityMissing(
                "failed to open X display; is an X server running?".into(),
            ));
        }

        // Check for RECORD extension
        let extension_name = c"RECORD";
        let extension = xlib::XInitExtension(dpy_control, extension_name.as_ptr());
        if extension.is_null() {
            xlib::XCloseDisplay(dpy_control);
            return Err(Error::CapabilityMissing(
                "XRecord extension not available on this X server".into(),
            ));
        }

        // Record only pointer button events
        let mut record_range: xrecord::XRecordRange = *xrecord::XRecordAllocRange();
        record_range.device_events.first = xlib::ButtonPress as c_uchar;
        record_range.device_events.last = xlib::ButtonRelease as c_uchar;

        // Create context
        let mut record_all_clients: c_ulong = xrecord::XRecordAllClients;
        let context = xrecord::XRecordCreateContext(
            dpy_control,
            0,
            &mut record_all_clients,
            1,
            &mut &mut record_range as *mut &mut xrecord::XRecordRange
                as *mut *mut xrecord::XRecordRange,
            1,
        );

        if context == 0 {
            xlib::XCloseDisplay(dpy_control);
            return Err(Error::HookStartFailed(
                "failed to create XRecord context".into(),
            ));
        }

        xlib::XSync(dpy_control, FALSE);

        // Store context for stop_hook to use
        {
            let mut c = CONTEXT
                .lock()
                .map_err(|_| Error::ThreadError("context mutex poisoned".into()))?;
            *c = Some(context);
        }

        // Announce the hook
        if let Ok(guard) = HANDLER.lock()
            && let Some(ref handler) = *guard
        {
            handler.handle(RawHook::Enabled);
        }

        // Run the record loop
        let result =
            xrecord::XRecordEnableContext(dpy_control, context, Some(record_callback), &mut 0);

        if let Ok(guard) = HANDLER.lock()
            && let Some(ref handler) = *guard
        {
            handler.handle(RawHook::Disabled);
        }

        // Clean up
        xrecord::XRecordDisableContext(dpy_control, context);
        xrecord::XRecordFreeContext(dpy_control, context);
        xlib::XCloseDisplay(dpy_control);

        if result == 0 {
            return Err(Error::HookStartFailed(
                "failed to enable XRecord context".into(),
            ));
        }
    }

    // Clean up handler and statics
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
    {
        let mut c = CONTEXT
            .lock()
            .map_err(|_| Error::ThreadError("mutex poisoned".into()))?;
        *c = None;
    }

    Ok(())
}

/// Stop the pointer hook.
pub fn stop_hook() -> Result<()> {
    // Signal the stop flag to tell the XRecord loop to exit
    if let Ok(guard) = STOP_FLAG.lock()
        && let Some(ref flag) = *guard
    {
        flag.store(false, Ordering::SeqCst);
    }

    // XRecordDisableContext needs to be called from a separate control display
    // connection to unblock XRecordEnableContext on the data connection
    unsafe {
        if let Ok(ctx_guard) = CONTEXT.lock()
            && let Some(ctx) = *ctx_guard
        {
            let dpy_control = xlib::XOpenDisplay(null());
            if !dpy_control.is_null() {
                xrecord::XRecordDisableContext(dpy_control, ctx);
                xlib::XCloseDisplay(dpy_control);
            }
        }
    }

    Ok(())
}
