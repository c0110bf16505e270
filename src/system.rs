//! Process-wide capturable stdout and stderr.
//!
//! Code that wants its output to be capturable writes through [`stdout()`] or [`stderr()`]
//! instead of `print!`. Tests take a [`StreamGuard`] on the stream, which serialises captures
//! of that stream across threads and releases the capture when dropped.

use crate::capturable::{Capturable, CaptureError};
use crate::writer::CapturingWriter;
use std::fmt;
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};
use tracing::debug;

type SharedWriter = CapturingWriter<Box<dyn Write + Send>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemStream {
    Stdout,
    Stderr,
}

impl fmt::Display for SystemStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout => f.write_str("stdout"),
            Self::Stderr => f.write_str("stderr"),
        }
    }
}

fn shared_writer(stream: SystemStream) -> &'static SharedWriter {
    static STDOUT: OnceLock<SharedWriter> = OnceLock::new();
    static STDERR: OnceLock<SharedWriter> = OnceLock::new();

    match stream {
        SystemStream::Stdout => STDOUT.get_or_init(|| {
            CapturingWriter::with_name("stdout", Box::new(io::stdout()) as Box<dyn Write + Send>)
        }),
        SystemStream::Stderr => STDERR.get_or_init(|| {
            CapturingWriter::with_name("stderr", Box::new(io::stderr()) as Box<dyn Write + Send>)
        }),
    }
}

fn guard_lock(stream: SystemStream) -> &'static Mutex<()> {
    static STDOUT_GUARD: Mutex<()> = Mutex::new(());
    static STDERR_GUARD: Mutex<()> = Mutex::new(());

    match stream {
        SystemStream::Stdout => &STDOUT_GUARD,
        SystemStream::Stderr => &STDERR_GUARD,
    }
}

/// Handle to the process-wide capturable stdout.
pub fn stdout() -> SystemWriter {
    SystemWriter::new(SystemStream::Stdout)
}

/// Handle to the process-wide capturable stderr.
pub fn stderr() -> SystemWriter {
    SystemWriter::new(SystemStream::Stderr)
}

/// Writer over one of the process's standard streams that honours active captures.
#[derive(Clone)]
pub struct SystemWriter {
    stream: SystemStream,
    writer: SharedWriter,
}

impl SystemWriter {
    fn new(stream: SystemStream) -> Self {
        Self {
            stream,
            writer: shared_writer(stream).clone(),
        }
    }

    pub fn stream(&self) -> SystemStream {
        self.stream
    }
}

impl Write for SystemWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Exclusive capture of a standard stream for the lifetime of the guard.
///
/// Acquiring blocks until any other guard on the same stream is dropped. Acquiring clears
/// whatever an earlier guard captured, so `captured_data` fails until `capture` is called.
///
/// The exclusive lock is not reentrant: acquiring a second guard on a stream from the thread
/// that already holds a guard on it deadlocks. Guards on different streams do not interact.
pub struct StreamGuard {
    stream: SystemStream,
    muted: bool,
    writer: &'static SharedWriter,
    _exclusive: MutexGuard<'static, ()>,
}

impl StreamGuard {
    /// Takes the stream. Captured output is still forwarded to the real stream.
    pub fn acquire(stream: SystemStream) -> Self {
        Self::take(stream, false)
    }

    /// Takes the stream. Captured output is not forwarded to the real stream.
    pub fn acquire_muted(stream: SystemStream) -> Self {
        Self::take(stream, true)
    }

    /// Takes the stream and starts capturing right away.
    pub fn capturing(stream: SystemStream) -> Self {
        let guard = Self::acquire(stream);
        guard.begin();
        guard
    }

    /// Takes the stream and starts a muted capture right away.
    pub fn capturing_muted(stream: SystemStream) -> Self {
        let guard = Self::acquire_muted(stream);
        guard.begin();
        guard
    }

    pub fn stream(&self) -> SystemStream {
        self.stream
    }

    fn take(stream: SystemStream, muted: bool) -> Self {
        let exclusive = guard_lock(stream)
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let writer = shared_writer(stream);
        writer.reset();
        debug!("Acquired {}", stream);
        Self {
            stream,
            muted,
            writer,
            _exclusive: exclusive,
        }
    }

    fn begin(&self) {
        if self.muted {
            self.writer.capture_muted();
        } else {
            self.writer.start();
        }
    }
}

impl Capturable for StreamGuard {
    fn capture(&self) -> Result<(), CaptureError> {
        self.begin();
        Ok(())
    }

    fn captured_data(&self) -> Result<String, CaptureError> {
        self.writer.captured_data()
    }
}

impl Drop for StreamGuard {
    fn drop(&mut self) {
        self.writer.release();
        debug!("Released {}", self.stream);
    }
}
