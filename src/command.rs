//! Capture of a child process's stdout and stderr.

use crate::capturable::{Capturable, CaptureError};
use crate::config::{CaptureConfig, StreamSelection};
use crate::system::{self, SystemStream, SystemWriter};
use crate::writer::CapturingWriter;
use std::ffi::{OsStr, OsString};
use std::fmt::Write as _;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use tracing::{debug, info};

/// Writer a child stream is pumped into; forwards to the matching process-wide stream.
pub type ChildStreamWriter = CapturingWriter<SystemWriter>;

/// Runs a program and captures what it writes to stdout and stderr.
#[derive(Debug, Clone)]
pub struct CommandCapture {
    program: OsString,
    args: Vec<OsString>,
    current_dir: Option<PathBuf>,
    config: CaptureConfig,
}

impl CommandCapture {
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self {
            program: program.as_ref().to_os_string(),
            args: Vec::new(),
            current_dir: None,
            config: CaptureConfig::default(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    pub fn config(mut self, config: CaptureConfig) -> Self {
        self.config = config;
        self
    }

    /// Spawns the program and blocks until it exits and both pipes are drained.
    ///
    /// Unselected streams are forwarded but not recorded, so reading them reports
    /// [`CaptureError::NotCapturing`].
    pub fn run(&self) -> Result<CapturedRun, CaptureError> {
        let program = self.program.to_string_lossy().into_owned();

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.current_dir {
            command.current_dir(dir);
        }

        let child = command.spawn().map_err(|source| CaptureError::Spawn {
            program: program.clone(),
            source,
        })?;
        let mut child = RunningChild::new(child);
        debug!("Started '{}' (pid {})", program, child.process.id());

        let stdout = self.stream_writer(SystemStream::Stdout, self.config.stream.includes_stdout());
        let stderr = self.stream_writer(SystemStream::Stderr, self.config.stream.includes_stderr());

        let stdout_pump = child
            .process
            .stdout
            .take()
            .map(|pipe| pump(pipe, stdout.clone()));
        let stderr_pump = child
            .process
            .stderr
            .take()
            .map(|pipe| pump(pipe, stderr.clone()));

        join_pump(stdout_pump, SystemStream::Stdout)?;
        join_pump(stderr_pump, SystemStream::Stderr)?;
        let status = child.process.wait()?;

        stdout.release();
        stderr.release();
        info!("'{}' exited with {}", program, status);

        Ok(CapturedRun {
            program,
            status,
            stdout,
            stderr,
        })
    }

    fn stream_writer(&self, stream: SystemStream, selected: bool) -> ChildStreamWriter {
        let target = match stream {
            SystemStream::Stdout => system::stdout(),
            SystemStream::Stderr => system::stderr(),
        };
        let writer = CapturingWriter::with_name(format!("child {}", stream), target);
        if selected {
            if self.config.muted {
                writer.capture_muted();
            } else {
                writer.start();
            }
        }
        writer
    }
}

fn pump<R>(mut pipe: R, mut writer: ChildStreamWriter) -> JoinHandle<io::Result<u64>>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let copied = io::copy(&mut pipe, &mut writer)?;
        io::Write::flush(&mut writer)?;
        Ok(copied)
    })
}

fn join_pump(
    pump: Option<JoinHandle<io::Result<u64>>>,
    stream: SystemStream,
) -> Result<(), CaptureError> {
    let Some(handle) = pump else {
        return Ok(());
    };
    let copied = handle
        .join()
        .map_err(|_| CaptureError::PumpPanicked {
            stream: stream.to_string(),
        })??;
    debug!("Drained {} bytes from child {}", copied, stream);
    Ok(())
}

/// Child process that is killed if it is still running when dropped.
struct RunningChild {
    process: Child,
}

impl RunningChild {
    fn new(process: Child) -> Self {
        Self { process }
    }
}

impl Drop for RunningChild {
    fn drop(&mut self) {
        if let Ok(None) = self.process.try_wait() {
            let _ = self.process.kill();
            let _ = self.process.wait();
        }
    }
}

/// Result of [`CommandCapture::run`].
pub struct CapturedRun {
    pub program: String,
    pub status: ExitStatus,
    pub stdout: ChildStreamWriter,
    pub stderr: ChildStreamWriter,
}

impl CapturedRun {
    /// Exit code of the child, or 1 when it was terminated by a signal.
    pub fn exit_code(&self) -> i32 {
        self.status.code().unwrap_or(1)
    }

    /// Plain text report of the selected streams.
    ///
    /// Each stream gets a `--- <stream> (<n> bytes) ---` header followed by its captured text.
    pub fn report(&self, selection: StreamSelection) -> Result<String, CaptureError> {
        let mut report = String::new();
        if selection.includes_stdout() {
            append_section(&mut report, SystemStream::Stdout, &self.stdout)?;
        }
        if selection.includes_stderr() {
            append_section(&mut report, SystemStream::Stderr, &self.stderr)?;
        }
        Ok(report)
    }
}

fn append_section(
    report: &mut String,
    stream: SystemStream,
    writer: &ChildStreamWriter,
) -> Result<(), CaptureError> {
    let data = writer.captured_data()?;
    let _ = writeln!(report, "--- {} ({} bytes) ---", stream, writer.captured_len());
    report.push_str(&data);
    if !data.is_empty() && !data.ends_with('\n') {
        report.push('\n');
    }
    Ok(())
}
