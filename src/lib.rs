//! syscap - capture output and read it back as text
//!
//! Everything that can be captured implements [`Capturable`]: start capturing, then read
//! what was captured. This crate provides capturing for wrapped writers, for the process's
//! stdout and stderr (when written through [`stdout()`] and [`stderr()`]), for `tracing`
//! output, and for child processes.

pub mod capturable;
pub mod cli;
pub mod command;
pub mod config;
pub mod log_capture;
pub mod system;
pub mod utils;
pub mod writer;

pub use capturable::{Capturable, CaptureError, capture_during};
pub use command::{CapturedRun, CommandCapture};
pub use config::{CaptureConfig, StreamSelection};
pub use log_capture::LogCapture;
pub use system::{StreamGuard, SystemStream, SystemWriter, stderr, stdout};
pub use writer::CapturingWriter;
