//! Capture of formatted `tracing` output.

use crate::capturable::{Capturable, CaptureError};
use crate::writer::CapturingWriter;
use std::io;
use tracing::{Level, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

/// Log sink that keeps formatted events while capturing and discards them otherwise.
///
/// ```
/// use syscap::{Capturable, LogCapture};
///
/// let logs = LogCapture::new();
/// logs.capture().unwrap();
/// tracing::subscriber::with_default(logs.subscriber(), || {
///     tracing::info!("deleted 3 files");
/// });
/// assert!(logs.captured_data().unwrap().contains("deleted 3 files"));
/// ```
#[derive(Clone)]
pub struct LogCapture {
    writer: CapturingWriter<io::Sink>,
}

impl LogCapture {
    pub fn new() -> Self {
        Self {
            writer: CapturingWriter::with_name("log", io::sink()),
        }
    }

    /// Subscriber that formats every event at TRACE and above into this capture.
    pub fn subscriber(&self) -> impl Subscriber + Send + Sync + 'static {
        self.subscriber_with_level(Level::TRACE)
    }

    /// Subscriber that formats events at `level` and above into this capture.
    pub fn subscriber_with_level(&self, level: Level) -> impl Subscriber + Send + Sync + 'static {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::default().add_directive(level.into()))
            .with_target(false)
            .with_ansi(false)
            .without_time()
            .with_writer(self.clone())
            .finish()
    }

    /// Captured log output split into lines.
    pub fn captured_lines(&self) -> Result<Vec<String>, CaptureError> {
        Ok(self
            .captured_data()?
            .lines()
            .map(str::to_string)
            .collect())
    }
}

impl Default for LogCapture {
    fn default() -> Self {
        Self::new()
    }
}

impl Capturable for LogCapture {
    fn capture(&self) -> Result<(), CaptureError> {
        self.writer.capture()
    }

    fn captured_data(&self) -> Result<String, CaptureError> {
        self.writer.captured_data()
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = CapturingWriter<io::Sink>;

    fn make_writer(&'a self) -> Self::Writer {
        self.writer.clone()
    }
}
