//! The `SampleSource` capability interface and the adapter drive loop.
//!
//! Three interchangeable adapters feed the forwarder: the discrete mouse hook
//! ([`HookSource`](crate::hook::HookSource)), the direct XInput poll source
//! (Windows), and the generic gamepad poll source (`gilrs` feature). The
//! forwarder is agnostic to which one it is driven by.

use crate::error::Result;
use crate::forwarder::{Forwarder, Status};
use crate::inject::ClickInjector;
use crate::sample::InputSample;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Outcome of one poll of a sample source.
#[derive(Debug, Clone, PartialEq)]
pub enum SourcePoll {
    /// A fresh observation of the input state.
    Sample(InputSample),
    /// Nothing to report this tick. Poll-style sources sleep their poll or
    /// retry interval before returning this.
    Idle,
    /// A device was bound; the source is now delivering samples.
    Attached(String),
    /// The bound device disappeared. The source keeps searching for a
    /// replacement on its own retry interval; this is never fatal.
    Detached,
}

/// A stream of input samples with one method: get the next observation,
/// blocking or sleeping as appropriate for the underlying API.
pub trait SampleSource {
    /// Human-readable label for status lines.
    fn name(&self) -> &str;

    /// Poll for the next observation.
    ///
    /// Errors returned here are fatal (missing capability, hook teardown); a
    /// merely absent device is [`SourcePoll::Detached`] followed by
    /// [`SourcePoll::Idle`] ticks until it reappears.
    fn poll(&mut self) -> Result<SourcePoll>;
}

/// Adapter lifecycle: searching for a device, or bound and delivering samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterState {
    /// No device bound.
    Searching,
    /// Device bound, polling or listening.
    Active,
}

/// Drive a source into a forwarder until the `running` flag clears.
///
/// Edges are processed in arrival order on the calling thread. On disconnect
/// any held synthetic button is released before the adapter goes back to
/// searching, and the same force-release runs once more on the way out so a
/// Ctrl-C can never leave the pointer stuck down.
pub fn run<S, I>(source: &mut S, forwarder: &Forwarder<I>, running: &Arc<AtomicBool>) -> Result<()>
where
    S: SampleSource,
    I: ClickInjector + 'static,
{
    let mut state = AdapterState::Searching;

    let result = loop {
        if !running.load(Ordering::SeqCst) {
            break Ok(());
        }

        match source.poll() {
            Ok(SourcePoll::Sample(sample)) => {
                if state == AdapterState::Searching {
                    // Sources normally announce themselves with Attached
                    // first, but a sample is proof enough of a bound device.
                    state = AdapterState::Active;
                    forwarder.notify_status(&Status::SourceBound {
                        name: source.name().to_string(),
                    });
                }
                if let Some(edge) = forwarder.offer(&sample) {
                    log::debug!("{}: {:?} edge", source.name(), edge);
                }
            }
            Ok(SourcePoll::Idle) => {}
            Ok(SourcePoll::Attached(name)) => {
                if state == AdapterState::Searching {
                    state = AdapterState::Active;
                    forwarder.notify_status(&Status::SourceBound { name });
                }
            }
            Ok(SourcePoll::Detached) => {
                if state == AdapterState::Active {
                    state = AdapterState::Searching;
                    // The device can no longer deliver the release edge, so
                    // synthesize it before searching again.
                    forwarder.force_release();
                    forwarder.notify_status(&Status::SourceLost);
                }
            }
            Err(e) => break Err(e),
        }
    };

    forwarder.force_release();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::forwarder::{ClickStyle, ForwarderConfig};
    use crate::sample::InputSample;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Action {
        Down,
        Up,
    }

    #[derive(Clone, Default)]
    struct RecordingInjector {
        actions: Arc<Mutex<Vec<Action>>>,
    }

    impl RecordingInjector {
        fn actions(&self) -> Vec<Action> {
            self.actions.lock().unwrap().clone()
        }
    }

    impl ClickInjector for RecordingInjector {
        fn cursor_position(&self) -> Result<(f64, f64)> {
            Ok((0.0, 0.0))
        }

        fn move_cursor(&self, _x: f64, _y: f64) -> Result<()> {
            Ok(())
        }

        fn button_down(&self) -> Result<()> {
            self.actions.lock().unwrap().push(Action::Down);
            Ok(())
        }

        fn button_up(&self) -> Result<()> {
            self.actions.lock().unwrap().push(Action::Up);
            Ok(())
        }
    }

    /// Replays a fixed script, then clears the running flag.
    struct ScriptedSource {
        script: VecDeque<SourcePoll>,
        running: Arc<AtomicBool>,
    }

    impl ScriptedSource {
        fn new(script: Vec<SourcePoll>, running: Arc<AtomicBool>) -> Self {
            Self {
                script: script.into(),
                running,
            }
        }
    }

    impl SampleSource for ScriptedSource {
        fn name(&self) -> &str {
            "scripted"
        }

        fn poll(&mut self) -> Result<SourcePoll> {
            match self.script.pop_front() {
                Some(poll) => Ok(poll),
                None => {
                    self.running.store(false, Ordering::SeqCst);
                    Ok(SourcePoll::Idle)
                }
            }
        }
    }

    fn hold_forwarder(
        statuses: Arc<Mutex<Vec<Status>>>,
    ) -> (Forwarder<RecordingInjector>, RecordingInjector) {
        let injector = RecordingInjector::default();
        let forwarder = Forwarder::with_status(
            injector.clone(),
            ForwarderConfig {
                threshold: 30,
                style: ClickStyle::Hold,
            },
            move |status: &Status| {
                statuses.lock().unwrap().push(status.clone());
            },
        );
        (forwarder, injector)
    }

    #[test]
    fn test_disconnect_forces_release_and_reconnect_is_quiet() {
        let running = Arc::new(AtomicBool::new(true));
        let statuses = Arc::new(Mutex::new(Vec::new()));
        let (forwarder, injector) = hold_forwarder(statuses.clone());

        let mut source = ScriptedSource::new(
            vec![
                SourcePoll::Attached("pad".into()),
                SourcePoll::Sample(InputSample::analog(200).with_sequence(1)),
                SourcePoll::Detached,
                SourcePoll::Idle,
                SourcePoll::Attached("pad".into()),
                SourcePoll::Sample(InputSample::analog(0).with_sequence(1)),
            ],
            running.clone(),
        );

        run(&mut source, &forwarder, &running).unwrap();

        // One down from the press, one up forced by the disconnect, and no
        // spurious press after the reconnect.
        assert_eq!(injector.actions(), vec![Action::Down, Action::Up]);

        let statuses = statuses.lock().unwrap();
        let transitions: Vec<_> = statuses
            .iter()
            .filter(|s| matches!(s, Status::SourceBound { .. } | Status::SourceLost))
            .collect();
        assert!(matches!(transitions[0], Status::SourceBound { .. }));
        assert!(matches!(transitions[1], Status::SourceLost));
        assert!(matches!(transitions[2], Status::SourceBound { .. }));
    }

    #[test]
    fn test_shutdown_releases_held_button() {
        let running = Arc::new(AtomicBool::new(true));
        let statuses = Arc::new(Mutex::new(Vec::new()));
        let (forwarder, injector) = hold_forwarder(statuses);

        let mut source = ScriptedSource::new(
            vec![
                SourcePoll::Attached("pad".into()),
                SourcePoll::Sample(InputSample::analog(255).with_sequence(1)),
            ],
            running.clone(),
        );

        run(&mut source, &forwarder, &running).unwrap();

        assert_eq!(injector.actions(), vec![Action::Down, Action::Up]);
        assert!(!forwarder.is_down());
    }

    #[test]
    fn test_sample_while_searching_binds_source() {
        let running = Arc::new(AtomicBool::new(true));
        let statuses = Arc::new(Mutex::new(Vec::new()));
        let (forwarder, _injector) = hold_forwarder(statuses.clone());

        let mut source = ScriptedSource::new(
            vec![SourcePoll::Sample(InputSample::analog(0).with_sequence(1))],
            running.clone(),
        );

        run(&mut source, &forwarder, &running).unwrap();

        let statuses = statuses.lock().unwrap();
        assert!(
            statuses
                .iter()
                .any(|s| matches!(s, Status::SourceBound { .. }))
        );
    }

    #[test]
    fn test_detached_while_searching_is_noop() {
        let running = Arc::new(AtomicBool::new(true));
        let statuses = Arc::new(Mutex::new(Vec::new()));
        let (forwarder, injector) = hold_forwarder(statuses.clone());

        let mut source = ScriptedSource::new(
            vec![SourcePoll::Detached, SourcePoll::Idle, SourcePoll::Detached],
            running.clone(),
        );

        run(&mut source, &forwarder, &running).unwrap();

        assert!(injector.actions().is_empty());
        assert!(statuses.lock().unwrap().is_empty());
    }
}
