use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SplitError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Argument(String),

    #[error("file not found: {}", .path.display())]
    FileNotFound { path: PathBuf },

    #[error("cue parse: line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("cue parse: {0}")]
    Sheet(String),

    #[error("output file already exists: {} (use --overwrite)", .path.display())]
    OutputExists { path: PathBuf },

    #[error("can only add cover art to mp3 and flac, not .{extension}")]
    UnsupportedFormat { extension: String },

    #[error("failed to start {}: {source}", .program.display())]
    ToolSpawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{step} failed ({status}): {stderr}")]
    ToolFailed {
        step: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("{failed} of {total} tracks failed")]
    TrackFailures { failed: usize, total: usize },

    #[error(transparent)]
    Prompt(#[from] dialoguer::Error),

    #[error(transparent)]
    Logger(#[from] log::SetLoggerError),
}

impl SplitError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}
