//! # clickrelay
//!
//! A debounced, edge-triggered forwarder that converts emulated pointer or
//! gamepad-trigger input into hardware-level left mouse clicks.
//!
//! Some handhelds emulate mouse clicks in a way the OS ignores while physical
//! keys are held. This crate watches an input source for activation edges and
//! re-emits each one as a real injected click, with a single in-flight guard
//! so rapid-fire edges can never flood the system with synthetic events.
//!
//! ## Quick Start
//!
//! Forward every left-click event as a literal injected click (the mouse-hook
//! variant):
//!
//! ```no_run
//! use clickrelay::{
//!     ClickStyle, Forwarder, ForwarderConfig, HookSource, SystemInjector, run,
//! };
//! use std::sync::Arc;
//! use std::sync::atomic::AtomicBool;
//! use std::time::Duration;
//!
//! let forwarder = Forwarder::new(
//!     SystemInjector::new(),
//!     ForwarderConfig {
//!         threshold: 30,
//!         style: ClickStyle::Tap {
//!             dwell: Duration::from_millis(10),
//!         },
//!     },
//! );
//!
//! let running = Arc::new(AtomicBool::new(true));
//! let mut source = HookSource::start().expect("failed to start hook");
//! run(&mut source, &forwarder, &running).expect("forwarder failed");
//! ```
//!
//! ## Architecture
//!
//! Three interchangeable [`SampleSource`] adapters (OS pointer hook, direct
//! XInput polling on Windows, generic gamepad polling behind the `gilrs`
//! feature) feed one [`Forwarder`], which owns the edge detector and the
//! mutex-guarded emission state. The [`ClickInjector`] trait is the seam to
//! the OS injection API, so the whole core is testable with a mock.

pub mod error;
pub mod forwarder;
#[cfg(feature = "gilrs")]
pub mod gamepad;
pub mod hook;
pub mod inject;
pub mod sample;
pub mod source;

mod platform;

// Re-exports
pub use error::{Error, Result};
pub use forwarder::{ClickStyle, Edge, Forwarder, ForwarderConfig, Status, StatusHandler};
#[cfg(feature = "gilrs")]
pub use gamepad::GamepadSource;
pub use hook::HookSource;
pub use inject::{ClickInjector, SystemInjector};
pub use sample::{Activation, InputSample};
pub use source::{AdapterState, SampleSource, SourcePoll, run};

#[cfg(target_os = "windows")]
pub use platform::XInputSource;
