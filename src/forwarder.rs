//! Edge detection and debounced synthetic click emission.
//!
//! This is the one reusable piece of the whole tool: a two-state debouncer that
//! turns a stream of [`InputSample`]s into exactly one hardware-level down/up
//! pair per physical activation. Source adapters feed it; the
//! [`ClickInjector`] carries out the actual OS calls.

use crate::inject::ClickInjector;
use crate::sample::InputSample;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Pause between moving the cursor and pressing, so the move lands first.
const MOVE_SETTLE: Duration = Duration::from_millis(1);

/// Hold-off after a tap completes before the next press edge is accepted.
/// Tunable; this is the only guard against double-firing on bouncy hardware.
const TAP_REARM: Duration = Duration::from_millis(20);

/// A transition of the logical pressed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Activation crossed the threshold upward.
    Press,
    /// Activation crossed the threshold downward.
    Release,
}

/// How down/up pairs are produced from edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickStyle {
    /// Down on the press edge, up on the matching release edge, no artificial
    /// delay. For sources that track press and release separately.
    Hold,
    /// A full down-dwell-up pair per press edge, emitted on a fire-and-forget
    /// worker thread. For sources that deliver one discrete click event.
    Tap {
        /// Fixed delay held between the synthetic down and up.
        dwell: Duration,
    },
}

/// Fixed build-time configuration for a [`Forwarder`].
#[derive(Debug, Clone, Copy)]
pub struct ForwarderConfig {
    /// Analog activation threshold (strict `value > threshold`). Ignored by
    /// digital samples.
    pub threshold: u8,
    /// Emission style.
    pub style: ClickStyle,
}

impl Default for ForwarderConfig {
    fn default() -> Self {
        Self {
            threshold: 30,
            style: ClickStyle::Hold,
        }
    }
}

/// Observational status events, for the per-edge narration on stdout.
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    /// A source bound its device and is now active.
    SourceBound {
        /// Human-readable device/source label.
        name: String,
    },
    /// The bound device disappeared; the source is searching again.
    SourceLost,
    /// A synthetic left-button down was injected at the given position.
    ButtonDown { x: f64, y: f64 },
    /// A synthetic left-button up was injected at the given position.
    ButtonUp { x: f64, y: f64 },
}

/// Trait for observing forwarder status.
///
/// Called with internal forwarder state held; keep implementations quick and
/// do not call back into the forwarder.
pub trait StatusHandler: Send + Sync {
    /// Called for each status event.
    fn handle_status(&self, status: &Status);
}

/// Implement StatusHandler for closures.
impl<F> StatusHandler for F
where
    F: Fn(&Status) + Send + Sync,
{
    fn handle_status(&self, status: &Status) {
        self(status);
    }
}

/// The single mutable entity: last-known logical state plus emission guards.
#[derive(Debug, Default)]
struct ForwarderState {
    /// Last-known logical pressed state; flips only on a genuine edge.
    is_pressed: bool,
    /// True while one down-then-up emission is in flight. Press edges arriving
    /// while set are dropped, not queued.
    in_flight: bool,
    /// True while a synthetic down has been injected and its matching up has
    /// not. `force_release` emits an up exactly when this is set.
    down_held: bool,
    /// Sequence id of the last processed polled sample.
    last_sequence: Option<u64>,
    /// Bumped once per spawned tap worker. A worker may only emit or clear
    /// guards while the stored generation still matches its own, so a stale
    /// worker surviving a force-release cannot touch a newer tap's state.
    tap_generation: u64,
}

struct Inner<I: ClickInjector> {
    injector: I,
    config: ForwarderConfig,
    state: Mutex<ForwarderState>,
    status: Option<Box<dyn StatusHandler>>,
}

/// Debounced edge-triggered click forwarder.
///
/// Cheap to clone; clones share the same state, so a tap worker thread and the
/// sample loop always agree on what is in flight.
pub struct Forwarder<I: ClickInjector + 'static> {
    inner: Arc<Inner<I>>,
}

impl<I: ClickInjector + 'static> Clone for Forwarder<I> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<I: ClickInjector + 'static> Forwarder<I> {
    /// Create a forwarder with no status observer.
    pub fn new(injector: I, config: ForwarderConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                injector,
                config,
                state: Mutex::new(ForwarderState::default()),
                status: None,
            }),
        }
    }

    /// Create a forwarder that reports status through `handler`.
    pub fn with_status<H: StatusHandler + 'static>(
        injector: I,
        config: ForwarderConfig,
        handler: H,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                injector,
                config,
                state: Mutex::new(ForwarderState::default()),
                status: Some(Box::new(handler)),
            }),
        }
    }

    /// Feed one sample through the edge detector and emit as configured.
    ///
    /// Returns the edge this sample produced, if any. A press edge that was
    /// suppressed by the in-flight guard still reports `Edge::Press`; the
    /// emission side effects are what get suppressed.
    pub fn offer(&self, sample: &InputSample) -> Option<Edge> {
        let inner = &self.inner;
        let Ok(mut st) = inner.state.lock() else {
            return None;
        };

        if let Some(seq) = sample.sequence {
            if st.last_sequence == Some(seq) {
                // Unchanged device state; nothing to recompute.
                return None;
            }
            st.last_sequence = Some(seq);
        }

        let pressed = sample.activation.is_active(inner.config.threshold);
        if pressed == st.is_pressed {
            return None;
        }
        // Commit before any emission so an asynchronous tap worker can never
        // see this edge again.
        st.is_pressed = pressed;

        if pressed {
            if st.in_flight {
                log::debug!("press edge dropped: emission already in flight");
                return Some(Edge::Press);
            }
            st.in_flight = true;
            match inner.config.style {
                ClickStyle::Hold => {
                    st.down_held = true;
                    let (x, y) = sample
                        .position
                        .or_else(|| inner.injector.cursor_position().ok())
                        .unwrap_or((0.0, 0.0));
                    if let Err(e) = inner.injector.button_down() {
                        log::warn!("button down injection failed: {e}");
                    }
                    inner.notify(&Status::ButtonDown { x, y });
                }
                ClickStyle::Tap { dwell } => {
                    st.tap_generation = st.tap_generation.wrapping_add(1);
                    let generation = st.tap_generation;
                    let position = sample.position;
                    drop(st);
                    let worker = Arc::clone(inner);
                    thread::spawn(move || worker.tap(position, dwell, generation));
                }
            }
            Some(Edge::Press)
        } else {
            if inner.config.style == ClickStyle::Hold {
                if st.down_held {
                    st.down_held = false;
                    st.in_flight = false;
                    if let Err(e) = inner.injector.button_up() {
                        log::warn!("button up injection failed: {e}");
                    }
                    let (x, y) = inner.injector.cursor_position().unwrap_or((0.0, 0.0));
                    inner.notify(&Status::ButtonUp { x, y });
                } else {
                    // Release with no down in flight (e.g. the button was
                    // already held at startup). Never emit an unmatched up.
                    log::debug!("release edge dropped: no down in flight");
                }
            }
            Some(Edge::Release)
        }
    }

    /// Emit the matching up for a held synthetic down, if there is one.
    ///
    /// Called on device disconnect and on shutdown. Leaving this out would
    /// leave the pointer stuck down system-wide, so it is safe to call
    /// unconditionally: with no down held it does nothing.
    pub fn force_release(&self) {
        let inner = &self.inner;
        let Ok(mut st) = inner.state.lock() else {
            return;
        };
        st.is_pressed = false;
        st.in_flight = false;
        if st.down_held {
            st.down_held = false;
            if let Err(e) = inner.injector.button_up() {
                log::warn!("button up injection failed: {e}");
            }
            let (x, y) = inner.injector.cursor_position().unwrap_or((0.0, 0.0));
            inner.notify(&Status::ButtonUp { x, y });
        }
    }

    /// Whether a synthetic down is currently held without its matching up.
    pub fn is_down(&self) -> bool {
        self.inner
            .state
            .lock()
            .map(|st| st.down_held)
            .unwrap_or(false)
    }

    pub(crate) fn notify_status(&self, status: &Status) {
        self.inner.notify(status);
    }
}

impl<I: ClickInjector> Inner<I> {
    fn notify(&self, status: &Status) {
        if let Some(handler) = &self.status {
            handler.handle_status(status);
        }
    }

    /// Tap worker: full down-dwell-up pair, fire-and-forget.
    ///
    /// Each worker is stamped with the generation it was spawned under and
    /// re-checks it after every sleep; a worker that lost its generation (a
    /// force-release followed by a fresh press) backs off without touching
    /// the state it no longer owns. Sleeps happen outside the state lock so
    /// the sample loop is never blocked by a dwelling tap.
    fn tap(self: Arc<Self>, position: Option<(f64, f64)>, dwell: Duration, generation: u64) {
        let (x, y) = match position {
            Some(p) => p,
            None => self.injector.cursor_position().unwrap_or((0.0, 0.0)),
        };

        {
            let Ok(st) = self.state.lock() else {
                return;
            };
            if !st.in_flight || st.tap_generation != generation {
                // Force-released before the worker got scheduled.
                return;
            }
            if let Err(e) = self.injector.move_cursor(x, y) {
                log::warn!("cursor move failed: {e}");
            }
        }

        thread::sleep(MOVE_SETTLE);

        {
            let Ok(mut st) = self.state.lock() else {
                return;
            };
            if !st.in_flight || st.tap_generation != generation {
                return;
            }
            if let Err(e) = self.injector.button_down() {
                log::warn!("button down injection failed: {e}");
            }
            st.down_held = true;
            self.notify(&Status::ButtonDown { x, y });
        }

        thread::sleep(dwell);

        {
            let Ok(mut st) = self.state.lock() else {
                return;
            };
            if st.tap_generation != generation {
                // A newer tap owns the down/up pair now.
                return;
            }
            if st.down_held {
                st.down_held = false;
                if let Err(e) = self.injector.button_up() {
                    log::warn!("button up injection failed: {e}");
                }
                self.notify(&Status::ButtonUp { x, y });
            }
        }

        thread::sleep(TAP_REARM);
        if let Ok(mut st) = self.state.lock()
            && st.tap_generation == generation
        {
            st.in_flight = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::sample::InputSample;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Action {
        Move,
        Down,
        Up,
    }

    #[derive(Clone, Default)]
    struct MockInjector {
        actions: Arc<Mutex<Vec<Action>>>,
    }

    impl MockInjector {
        fn actions(&self) -> Vec<Action> {
            self.actions.lock().unwrap().clone()
        }
    }

    impl ClickInjector for MockInjector {
        fn cursor_position(&self) -> Result<(f64, f64)> {
            Ok((100.0, 200.0))
        }

        fn move_cursor(&self, _x: f64, _y: f64) -> Result<()> {
            self.actions.lock().unwrap().push(Action::Move);
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

    fn hold_forwarder(threshold: u8) -> (Forwarder<MockInjector>, MockInjector) {
        let injector = MockInjector::default();
        let forwarder = Forwarder::new(
            injector.clone(),
            ForwarderConfig {
                threshold,
                style: ClickStyle::Hold,
            },
        );
        (forwarder, injector)
    }

    fn tap_forwarder(dwell_ms: u64) -> (Forwarder<MockInjector>, MockInjector) {
        let injector = MockInjector::default();
        let forwarder = Forwarder::new(
            injector.clone(),
            ForwarderConfig {
                threshold: 30,
                style: ClickStyle::Tap {
                    dwell: Duration::from_millis(dwell_ms),
                },
            },
        );
        (forwarder, injector)
    }

    #[test]
    fn test_hold_emits_one_pair_per_activation() {
        let (forwarder, injector) = hold_forwarder(30);

        assert_eq!(
            forwarder.offer(&InputSample::analog(0).with_sequence(1)),
            None
        );
        assert_eq!(
            forwarder.offer(&InputSample::analog(50).with_sequence(2)),
            Some(Edge::Press)
        );
        // Same packet number: skipped entirely.
        assert_eq!(
            forwarder.offer(&InputSample::analog(50).with_sequence(2)),
            None
        );
        assert_eq!(
            forwarder.offer(&InputSample::analog(0).with_sequence(3)),
            Some(Edge::Release)
        );

        assert_eq!(injector.actions(), vec![Action::Down, Action::Up]);
    }

    #[test]
    fn test_hold_unchanged_state_with_new_sequence_is_noop() {
        let (forwarder, injector) = hold_forwarder(30);

        forwarder.offer(&InputSample::analog(50).with_sequence(1));
        // New packet, same side of the threshold: edge detector stays quiet.
        assert_eq!(
            forwarder.offer(&InputSample::analog(200).with_sequence(2)),
            None
        );
        forwarder.offer(&InputSample::analog(0).with_sequence(3));

        assert_eq!(injector.actions(), vec![Action::Down, Action::Up]);
    }

    #[test]
    fn test_hold_alternates_down_and_up() {
        let (forwarder, injector) = hold_forwarder(30);

        for (seq, value) in [0u8, 100, 0, 200, 10, 255, 0].into_iter().enumerate() {
            forwarder.offer(&InputSample::analog(value).with_sequence(seq as u64));
        }

        let actions = injector.actions();
        assert_eq!(actions.len(), 6);
        for pair in actions.chunks(2) {
            assert_eq!(pair, [Action::Down, Action::Up]);
        }
    }

    #[test]
    fn test_idle_skip_suppresses_change_hidden_behind_stale_sequence() {
        let (forwarder, injector) = hold_forwarder(30);

        forwarder.offer(&InputSample::analog(50).with_sequence(1));
        // A stale packet never gets as far as the threshold comparison.
        assert_eq!(
            forwarder.offer(&InputSample::analog(0).with_sequence(1)),
            None
        );
        assert_eq!(injector.actions(), vec![Action::Down]);
        assert!(forwarder.is_down());
    }

    #[test]
    fn test_force_release_emits_exactly_one_up() {
        let (forwarder, injector) = hold_forwarder(30);

        forwarder.offer(&InputSample::analog(255).with_sequence(1));
        assert!(forwarder.is_down());

        forwarder.force_release();
        forwarder.force_release();
        assert!(!forwarder.is_down());
        assert_eq!(injector.actions(), vec![Action::Down, Action::Up]);
    }

    #[test]
    fn test_release_after_force_release_is_noop() {
        let (forwarder, injector) = hold_forwarder(30);

        forwarder.offer(&InputSample::digital(true));
        forwarder.force_release();
        // The physical release arrives after shutdown already released for us.
        assert_eq!(forwarder.offer(&InputSample::digital(false)), None);
        assert_eq!(injector.actions(), vec![Action::Down, Action::Up]);
    }

    #[test]
    fn test_force_release_without_down_is_silent() {
        let (forwarder, injector) = hold_forwarder(30);
        forwarder.force_release();
        assert!(injector.actions().is_empty());
    }

    #[test]
    fn test_tap_emits_move_down_up() {
        let (forwarder, injector) = tap_forwarder(10);

        forwarder.offer(&InputSample::digital(true).at(5.0, 6.0));
        thread::sleep(Duration::from_millis(150));

        assert_eq!(
            injector.actions(),
            vec![Action::Move, Action::Down, Action::Up]
        );
    }

    #[test]
    fn test_tap_suppresses_reentrant_press() {
        let (forwarder, injector) = tap_forwarder(80);

        forwarder.offer(&InputSample::digital(true).at(5.0, 6.0));
        thread::sleep(Duration::from_millis(20));
        // Physical release and a second press while the first tap is still
        // dwelling: the second press must not start another pair.
        forwarder.offer(&InputSample::digital(false).at(5.0, 6.0));
        forwarder.offer(&InputSample::digital(true).at(5.0, 6.0));
        thread::sleep(Duration::from_millis(250));

        assert_eq!(
            injector.actions(),
            vec![Action::Move, Action::Down, Action::Up]
        );
    }

    #[test]
    fn test_tap_force_release_mid_dwell() {
        let (forwarder, injector) = tap_forwarder(500);

        forwarder.offer(&InputSample::digital(true).at(5.0, 6.0));
        thread::sleep(Duration::from_millis(50));
        assert_eq!(injector.actions(), vec![Action::Move, Action::Down]);

        forwarder.force_release();
        assert_eq!(
            injector.actions(),
            vec![Action::Move, Action::Down, Action::Up]
        );

        // The worker waking up later must not emit a second up.
        thread::sleep(Duration::from_millis(700));
        assert_eq!(
            injector.actions(),
            vec![Action::Move, Action::Down, Action::Up]
        );
    }

    #[test]
    fn test_stale_tap_worker_does_not_cut_new_press_short() {
        let (forwarder, injector) = tap_forwarder(600);

        forwarder.offer(&InputSample::digital(true).at(1.0, 2.0));
        thread::sleep(Duration::from_millis(100));
        forwarder.force_release();

        // Physical release and a fresh press while the first worker is still
        // dwelling: the first worker must not emit this press's up when it
        // wakes at its own dwell deadline.
        forwarder.offer(&InputSample::digital(false).at(1.0, 2.0));
        forwarder.offer(&InputSample::digital(true).at(3.0, 4.0));

        // First worker's dwell elapsed, second one's has not.
        thread::sleep(Duration::from_millis(550));
        assert_eq!(
            injector.actions(),
            vec![Action::Move, Action::Down, Action::Up, Action::Move, Action::Down]
        );

        // The second tap completes on its own schedule.
        thread::sleep(Duration::from_millis(300));
        assert_eq!(
            injector.actions(),
            vec![
                Action::Move,
                Action::Down,
                Action::Up,
                Action::Move,
                Action::Down,
                Action::Up
            ]
        );
    }

    #[test]
    fn test_offer_is_not_blocked_by_dwelling_tap() {
        let (forwarder, _injector) = tap_forwarder(300);

        forwarder.offer(&InputSample::digital(true).at(0.0, 0.0));
        thread::sleep(Duration::from_millis(50));

        // The worker sleeps its dwell without the state lock held.
        let start = std::time::Instant::now();
        forwarder.offer(&InputSample::digital(false));
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[test]
    fn test_press_then_interrupt_emits_up_on_shutdown() {
        let (forwarder, injector) = hold_forwarder(30);

        forwarder.offer(&InputSample::analog(0).with_sequence(1));
        forwarder.offer(&InputSample::analog(255).with_sequence(2));
        assert_eq!(injector.actions(), vec![Action::Down]);

        // Interrupt arrives before any release sample does.
        forwarder.force_release();
        assert_eq!(injector.actions(), vec![Action::Down, Action::Up]);
    }
}
