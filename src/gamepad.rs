//! Generic multi-device gamepad poll source over `gilrs`.
//!
//! Tolerates hot-unplug: a disconnect of the bound pad reports
//! [`SourcePoll::Detached`] (which makes the drive loop force-release any held
//! click) and the next connected pad is bound automatically.

use crate::error::{Error, Result};
use crate::sample::InputSample;
use crate::source::{SampleSource, SourcePoll};
use gilrs::{Button, Event as GilrsEvent, EventType, GamepadId, Gilrs};
use std::thread;
use std::time::Duration;

/// Sleep between empty event-queue polls.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(8);

/// Right-trigger source over whatever gamepad `gilrs` finds first.
pub struct GamepadSource {
    gilrs: Gilrs,
    active: Option<GamepadId>,
    sequence: u64,
    poll_interval: Duration,
}

impl GamepadSource {
    /// Initialize the gamepad backend.
    ///
    /// Fails with [`Error::CapabilityMissing`] when the platform gamepad
    /// subsystem is unavailable; an *absent pad* is not a failure, the source
    /// simply keeps searching.
    pub fn new() -> Result<Self> {
        let gilrs = Gilrs::new().map_err(|e| {
            Error::CapabilityMissing(format!(
                "gamepad backend unavailable ({e}); check that your platform is supported by gilrs"
            ))
        })?;
        Ok(Self {
            gilrs,
            active: None,
            sequence: 0,
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
    }

    /// Override the idle poll interval.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

impl SampleSource for GamepadSource {
    fn name(&self) -> &str {
        "gamepad (gilrs)"
    }

    fn poll(&mut self) -> Result<SourcePoll> {
        if self.active.is_none() {
            // Bind a pad that was already connected at startup.
            let first = self
                .gilrs
                .gamepads()
                .next()
                .map(|(id, pad)| (id, pad.name().to_string()));
            if let Some((id, name)) = first {
                self.active = Some(id);
                return Ok(SourcePoll::Attached(name));
            }
        }

        while let Some(GilrsEvent { id, event, .. }) = self.gilrs.next_event() {
            match event {
                EventType::Connected if self.active.is_none() => {
                    self.active = Some(id);
                    let name = self.gilrs.gamepad(id).name().to_string();
                    return Ok(SourcePoll::Attached(name));
                }
                EventType::Disconnected if self.active == Some(id) => {
                    self.active = None;
                    return Ok(SourcePoll::Detached);
                }
                EventType::ButtonChanged(Button::RightTrigger2, value, _)
                    if self.active == Some(id) =>
                {
                    self.sequence += 1;
                    let magnitude = (value.clamp(0.0, 1.0) * 255.0).round() as u8;
                    return Ok(SourcePoll::Sample(
                        InputSample::analog(magnitude).with_sequence(self.sequence),
                    ));
                }
                // Other buttons, axes, and events from non-active pads.
                _ => {}
            }
        }

        thread::sleep(self.poll_interval);
        Ok(SourcePoll::Idle)
    }
}
