//! Error types for the click forwarder.

use thiserror::Error;

/// Result type alias for clickrelay operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while capturing input or injecting clicks.
///
/// Recoverable conditions (a source searching for its device, a transient
/// disconnect) are *not* errors; they are reported through
/// [`SourcePoll`](crate::source::SourcePoll) and retried locally. Only
/// conditions that prevent the forwarder from doing its job at all end up here.
#[derive(Debug, Error)]
pub enum Error {
    /// A hook source is already running.
    #[error("hook is already running")]
    AlreadyRunning,

    /// A hook source is not running.
    #[error("hook is not running")]
    NotRunning,

    /// Failed to install the input hook.
    #[error("failed to start hook: {0}")]
    HookStartFailed(String),

    /// Failed to tear down the input hook.
    #[error("failed to stop hook: {0}")]
    HookStopFailed(String),

    /// Failed to inject a synthetic pointer event.
    #[error("failed to inject click: {0}")]
    InjectFailed(String),

    /// A required OS capability or backend is absent. Fatal at startup; the
    /// message names the missing capability and how to get it.
    #[error("missing capability: {0}")]
    CapabilityMissing(String),

    /// Platform-specific error.
    #[error("platform error: {0}")]
    Platform(String),

    /// Thread-related error.
    #[error("thread error: {0}")]
    ThreadError(String),
}
