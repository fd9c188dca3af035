use clap::Parser;
use std::path::{Path, PathBuf};

use crate::ffmpeg::DEFAULT_PROGRAM;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub(crate) struct Args {
    /// Directory holding the CUE sheet and the audio file
    #[arg(value_name = "DIR")]
    pub(crate) dir: PathBuf,
    /// CUE sheet name inside DIR; `.cue` is appended when missing
    #[arg(value_name = "CUE")]
    pub(crate) cue: String,
    /// Audio file to split instead of the one named by the sheet
    #[arg(long, value_name = "FILE")]
    pub(crate) audio: Option<PathBuf>,
    #[arg(long, value_name = "ENCODING")]
    pub(crate) cue_encoding: Option<String>,
    #[arg(long, value_name = "PATH", env = "CUE_SPLIT_FFMPEG", default_value = DEFAULT_PROGRAM)]
    pub(crate) ffmpeg: PathBuf,
    #[arg(short = 'o', long)]
    pub(crate) overwrite: bool,
    /// Print the plan and the ffmpeg commands without running them
    #[arg(short = 'n', long)]
    pub(crate) dry_run: bool,
    #[arg(short = 'v', long)]
    pub(crate) verbose: bool,
}

pub(crate) fn cue_file_name(raw: &str) -> String {
    let has_extension = raw.len() >= 4
        && raw.is_char_boundary(raw.len() - 4)
        && raw[raw.len() - 4..].eq_ignore_ascii_case(".cue");
    if has_extension {
        raw.to_string()
    } else {
        format!("{}.cue", raw)
    }
}

pub(crate) fn display_path(base: Option<&Path>, path: &Path) -> PathBuf {
    if let Some(base) = base
        && let Ok(rel) = path.strip_prefix(base)
    {
        if rel.as_os_str().is_empty() {
            return PathBuf::from(".");
        }
        return rel.to_path_buf();
    }
    path.to_path_buf()
}
