//! The capture contract shared by every capturing mechanism in this crate.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Tried to read captured data from {name} without starting capturing first")]
    NotCapturing { name: String },

    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Reader thread for {stream} panicked")]
    PumpPanicked { stream: String },

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Something that can be told to start capturing and later queried for what it captured.
///
/// Every implementation in this crate:
/// - resets its buffer when `capture` is called again (reset-and-restart),
/// - returns [`CaptureError::NotCapturing`] from `captured_data` before the first `capture`,
/// - keeps the last buffer readable after capturing ends.
#[cfg_attr(test, mockall::automock)]
pub trait Capturable {
    /// Start capturing. Output reaching the captured channel after this returns is retained.
    fn capture(&self) -> Result<(), CaptureError>;

    /// Everything captured since the last `capture`, as text.
    ///
    /// Invalid UTF-8 is replaced with U+FFFD.
    fn captured_data(&self) -> Result<String, CaptureError>;
}

/// Runs `action` with capturing active and returns what it produced.
pub fn capture_during<C, F>(capturable: &C, action: F) -> Result<String, CaptureError>
where
    C: Capturable + ?Sized,
    F: FnOnce(),
{
    capturable.capture()?;
    action();
    capturable.captured_data()
}
