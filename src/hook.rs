//! Discrete event source backed by the OS pointer hook.
//!
//! The platform hook delivers left-button press/release callbacks on its own
//! thread; a bounded channel turns those into the pull-style [`SampleSource`]
//! the drive loop expects. The callback uses `try_send` so a slow consumer can
//! never block OS input delivery.

use crate::error::{Error, Result};
use crate::platform;
use crate::sample::InputSample;
use crate::source::{SampleSource, SourcePoll};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Events buffered between the hook callback and the sample loop.
const EVENT_BUFFER: usize = 64;

/// How long `poll` waits for a hook event before reporting an idle tick,
/// which is what keeps the drive loop responsive to shutdown.
const IDLE_WAIT: Duration = Duration::from_millis(100);

/// The platform hooks store their callback in process-wide statics, so only
/// one hook may be live at a time.
static HOOK_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Raw notification from the platform hook.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum RawHook {
    /// The hook is installed and listening.
    Enabled,
    /// The hook was torn down.
    Disabled,
    /// A left-button transition at the given screen position.
    Button { pressed: bool, x: f64, y: f64 },
}

/// Trait the platform listen implementations call back into.
pub(crate) trait HookEventHandler: Send + Sync {
    fn handle(&self, event: RawHook);
}

impl<F> HookEventHandler for F
where
    F: Fn(RawHook) + Send + Sync,
{
    fn handle(&self, event: RawHook) {
        self(event);
    }
}

/// Sample source over the OS-level pointer hook (mouse, touchpad, emulated
/// clicks alike).
pub struct HookSource {
    rx: Receiver<RawHook>,
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
    failure: Arc<Mutex<Option<Error>>>,
}

impl HookSource {
    /// Install the pointer hook on a background thread and start listening.
    ///
    /// Fails with [`Error::AlreadyRunning`] while another `HookSource` is
    /// live in this process.
    pub fn start() -> Result<Self> {
        if HOOK_ACTIVE.swap(true, Ordering::SeqCst) {
            return Err(Error::AlreadyRunning);
        }

        let (tx, rx) = mpsc::sync_channel(EVENT_BUFFER);
        let running = Arc::new(AtomicBool::new(true));
        let failure: Arc<Mutex<Option<Error>>> = Arc::new(Mutex::new(None));

        let thread = {
            let running = running.clone();
            let failure = failure.clone();
            thread::spawn(move || {
                let handler = move |event: RawHook| {
                    // Drop events rather than block the OS callback.
                    let _ = tx.try_send(event);
                };
                if let Err(e) = platform::run_hook(&running, handler) {
                    if let Ok(mut slot) = failure.lock() {
                        *slot = Some(e);
                    }
                }
                running.store(false, Ordering::SeqCst);
            })
        };

        Ok(Self {
            rx,
            running,
            thread: Some(thread),
            failure,
        })
    }

    /// Stop the hook and wait for its thread to finish.
    ///
    /// Fails with [`Error::NotRunning`] when the hook thread already exited
    /// on its own (its failure, if any, was reported through `poll`). Teardown
    /// still completes via `Drop`.
    pub fn stop(mut self) -> Result<()> {
        if !self.running.load(Ordering::SeqCst) {
            return Err(Error::NotRunning);
        }
        self.stop_inner()
    }

    fn stop_inner(&mut self) -> Result<()> {
        if self.running.swap(false, Ordering::SeqCst) {
            platform::stop_hook()?;
        }

        if let Some(handle) = self.thread.take() {
            handle
                .join()
                .map_err(|_| Error::ThreadError("failed to join hook thread".into()))?;
        }

        HOOK_ACTIVE.store(false, Ordering::SeqCst);
        Ok(())
    }
}

impl Drop for HookSource {
    fn drop(&mut self) {
        let _ = self.stop_inner();
    }
}

impl SampleSource for HookSource {
    fn name(&self) -> &str {
        "system pointer hook"
    }

    fn poll(&mut self) -> Result<SourcePoll> {
        match self.rx.recv_timeout(IDLE_WAIT) {
            Ok(RawHook::Enabled) => Ok(SourcePoll::Attached(self.name().to_string())),
            Ok(RawHook::Disabled) => Ok(SourcePoll::Detached),
            Ok(RawHook::Button { pressed, x, y }) => {
                Ok(SourcePoll::Sample(InputSample::digital(pressed).at(x, y)))
            }
            Err(RecvTimeoutError::Timeout) => Ok(SourcePoll::Idle),
            Err(RecvTimeoutError::Disconnected) => {
                // The hook thread is gone; surface whatever killed it.
                let stored = self.failure.lock().ok().and_then(|mut slot| slot.take());
                Err(stored.unwrap_or_else(|| {
                    Error::HookStopFailed("hook thread exited unexpectedly".into())
                }))
            }
        }
    }
}

#[cfg(test)]
#[cfg(all(target_os = "linux", not(feature = "x11")))]
mod tests {
    use super::*;

    #[test]
    fn test_single_live_hook_per_process() {
        let first = HookSource::start().unwrap();
        assert!(matches!(HookSource::start(), Err(Error::AlreadyRunning)));

        // The stub backend fails the hook thread immediately, so by now the
        // source is dead and stop reports it.
        thread::sleep(Duration::from_millis(50));
        assert!(matches!(first.stop(), Err(Error::NotRunning)));

        // Teardown freed the slot for the next hook.
        let again = HookSource::start().unwrap();
        drop(again);
    }
}
