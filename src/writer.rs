//! A tee writer that forwards to its target and records what passes through while capturing.

use crate::capturable::{Capturable, CaptureError};
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CaptureState {
    Idle,
    Capturing { muted: bool },
    Released,
}

struct Inner<W> {
    target: W,
    state: CaptureState,
    buffer: Vec<u8>,
}

/// Wraps a writer so that output written through it can be captured.
///
/// Clones share the same target and buffer, so one clone can be handed to the code
/// producing output while another reads back what was captured.
///
/// - Before `capture`, writes are only forwarded.
/// - While capturing, writes are recorded and forwarded, unless muted.
/// - After `release`, writes are only forwarded again and the buffer stays readable.
pub struct CapturingWriter<W> {
    name: Arc<str>,
    inner: Arc<Mutex<Inner<W>>>,
}

impl<W> Clone for CapturingWriter<W> {
    fn clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<W> CapturingWriter<W> {
    pub fn new(target: W) -> Self {
        Self::with_name("writer", target)
    }

    /// Creates a writer whose name shows up in errors and log messages.
    pub fn with_name(name: impl Into<String>, target: W) -> Self {
        Self {
            name: Arc::from(name.into()),
            inner: Arc::new(Mutex::new(Inner {
                target,
                state: CaptureState::Idle,
                buffer: Vec::new(),
            })),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Starts recording. Output keeps flowing to the target.
    pub fn start(&self) {
        self.begin(false);
    }

    /// Starts recording and stops forwarding to the target until released.
    pub fn capture_muted(&self) {
        self.begin(true);
    }

    /// Stops recording. The captured data remains readable.
    pub fn release(&self) {
        let released = {
            let mut inner = self.lock();
            match inner.state {
                CaptureState::Capturing { .. } => {
                    inner.state = CaptureState::Released;
                    Some(inner.buffer.len())
                }
                CaptureState::Idle | CaptureState::Released => None,
            }
        };
        if let Some(len) = released {
            debug!("Released capture of {} ({} bytes)", self.name, len);
        }
    }

    /// Drops any captured data and returns to the never-captured state.
    pub(crate) fn reset(&self) {
        let mut inner = self.lock();
        inner.buffer.clear();
        inner.state = CaptureState::Idle;
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self.lock().state, CaptureState::Capturing { .. })
    }

    /// Number of bytes recorded since the last capture started.
    pub fn captured_len(&self) -> usize {
        self.lock().buffer.len()
    }

    /// Raw bytes recorded since the last capture started.
    pub fn captured_bytes(&self) -> Result<Vec<u8>, CaptureError> {
        let inner = self.lock();
        if inner.state == CaptureState::Idle {
            return Err(self.not_capturing());
        }
        Ok(inner.buffer.clone())
    }

    // Log before switching state: the active subscriber may write into this buffer.
    fn begin(&self, muted: bool) {
        let discarded = self.captured_len();
        if discarded > 0 {
            debug!("Restarting capture of {}, discarding {} bytes", self.name, discarded);
        }
        debug!("Capturing {} (muted: {})", self.name, muted);

        let mut inner = self.lock();
        inner.buffer.clear();
        inner.state = CaptureState::Capturing { muted };
    }

    fn not_capturing(&self) -> CaptureError {
        CaptureError::NotCapturing {
            name: self.name.to_string(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<W>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W> Capturable for CapturingWriter<W> {
    fn capture(&self) -> Result<(), CaptureError> {
        self.start();
        Ok(())
    }

    fn captured_data(&self) -> Result<String, CaptureError> {
        let bytes = self.captured_bytes()?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl<W: Write> Write for CapturingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut inner = self.lock();
        match inner.state {
            CaptureState::Capturing { muted } => {
                if !muted {
                    inner.target.write_all(buf)?;
                }
                inner.buffer.extend_from_slice(buf);
                Ok(buf.len())
            }
            CaptureState::Idle | CaptureState::Released => inner.target.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.lock().target.flush()
    }
}
