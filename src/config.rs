use std::fmt;

/// Which output streams of a child process end up in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum StreamSelection {
    Stdout,
    Stderr,
    #[default]
    Both,
}

impl StreamSelection {
    pub fn includes_stdout(self) -> bool {
        matches!(self, Self::Stdout | Self::Both)
    }

    pub fn includes_stderr(self) -> bool {
        matches!(self, Self::Stderr | Self::Both)
    }
}

impl fmt::Display for StreamSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
            Self::Both => "both",
        };
        f.write_str(name)
    }
}

/// Configuration for capture operations
#[derive(Debug, Clone, Default)]
pub struct CaptureConfig {
    /// Record output without forwarding it to its original destination.
    pub muted: bool,

    /// Streams to capture. Streams that are not selected are still forwarded.
    pub stream: StreamSelection,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_forwards_and_captures_both_streams() {
        let config = CaptureConfig::default();
        assert!(!config.muted);
        assert!(config.stream.includes_stdout());
        assert!(config.stream.includes_stderr());
    }

    #[test]
    fn single_stream_selection_excludes_the_other() {
        assert!(!StreamSelection::Stdout.includes_stderr());
        assert!(!StreamSelection::Stderr.includes_stdout());
        assert_eq!(StreamSelection::Stderr.to_string(), "stderr");
    }
}
