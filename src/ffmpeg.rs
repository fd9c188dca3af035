use log::debug;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::Result;
use crate::error::SplitError;
use crate::types::{AlbumInfo, Track};

pub(crate) const DEFAULT_PROGRAM: &str = "ffmpeg";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ContainerFormat {
    Mp3,
    Flac,
    Other(String),
}

impl ContainerFormat {
    pub(crate) fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "mp3" => Self::Mp3,
            "flac" => Self::Flac,
            _ => Self::Other(ext),
        }
    }

    pub(crate) fn name(&self) -> &str {
        match self {
            Self::Mp3 => "mp3",
            Self::Flac => "flac",
            Self::Other(ext) => ext,
        }
    }

    fn tag_flags(&self) -> &'static [&'static str] {
        match self {
            Self::Mp3 => &["-id3v2_version", "3"],
            Self::Flac | Self::Other(_) => &[],
        }
    }

    fn cover_flags(&self) -> Option<&'static [&'static str]> {
        match self {
            Self::Mp3 => Some(&["-id3v2_version", "3"]),
            Self::Flac => Some(&["-disposition:v", "attached_pic"]),
            Self::Other(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    ExtractCover,
    Cut(usize),
    EmbedCover(usize),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExtractCover => write!(f, "cover extraction"),
            Self::Cut(number) => write!(f, "cutting track {}", number),
            Self::EmbedCover(number) => write!(f, "embedding cover into track {}", number),
        }
    }
}

/// One ffmpeg run: the argument vector plus the file it is expected to produce.
#[derive(Debug, Clone)]
pub(crate) struct Invocation {
    pub(crate) step: Step,
    pub(crate) args: Vec<OsString>,
    pub(crate) output: PathBuf,
}

impl Invocation {
    fn new(step: Step, overwrite: bool) -> Self {
        let mut invocation = Self {
            step,
            args: Vec::new(),
            output: PathBuf::new(),
        };
        invocation
            .args(["-hide_banner", "-nostdin", "-loglevel", "error"])
            .arg(if overwrite { "-y" } else { "-n" });
        invocation
    }

    fn arg(&mut self, value: impl AsRef<OsStr>) -> &mut Self {
        self.args.push(value.as_ref().to_os_string());
        self
    }

    fn args<I, S>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        for value in values {
            self.arg(value);
        }
        self
    }

    fn metadata(&mut self, key: &str, value: &str) -> &mut Self {
        self.arg("-metadata").arg(format!("{}={}", key, value))
    }

    fn finish(mut self, output: &Path) -> Self {
        self.arg(output);
        self.output = output.to_path_buf();
        self
    }

    pub(crate) fn command_line(&self, program: &Path) -> String {
        let mut parts = vec![quote(program.as_os_str())];
        parts.extend(self.args.iter().map(|arg| quote(arg)));
        parts.join(" ")
    }
}

pub(crate) fn extract_cover(audio: &Path, cover: &Path, overwrite: bool) -> Invocation {
    let mut invocation = Invocation::new(Step::ExtractCover, overwrite);
    invocation
        .arg("-i")
        .arg(audio)
        .args(["-an", "-c:v", "copy"]);
    invocation.finish(cover)
}

pub(crate) fn cut_track(
    audio: &Path,
    track: &Track,
    album: &AlbumInfo,
    format: &ContainerFormat,
    overwrite: bool,
) -> Invocation {
    let mut invocation = Invocation::new(Step::Cut(track.number), overwrite);
    invocation
        .arg("-i")
        .arg(audio)
        .arg("-ss")
        .arg(track.start.to_string());
    if let Some(end) = track.end {
        invocation.arg("-to").arg(end.to_string());
    }
    invocation
        .args(["-map", "0:a", "-c", "copy"])
        .args(format.tag_flags())
        .metadata("title", &track.title);
    if let Some(performer) = album.performer.as_deref() {
        invocation.metadata("artist", performer);
    }
    invocation
        .metadata("album", &album.title)
        .metadata("track", &track.number.to_string());
    invocation.finish(&track.output_path)
}

/// Remuxes the renamed track with the cover image back into the final file name.
pub(crate) fn embed_cover(
    track: &Track,
    cover: &Path,
    format: &ContainerFormat,
    overwrite: bool,
) -> Result<Invocation> {
    let flags = format
        .cover_flags()
        .ok_or_else(|| SplitError::UnsupportedFormat {
            extension: format.name().to_string(),
        })?;
    let mut invocation = Invocation::new(Step::EmbedCover(track.number), overwrite);
    invocation
        .arg("-i")
        .arg(&track.temp_path)
        .arg("-i")
        .arg(cover)
        .args(["-map", "0:0", "-map", "1:0", "-c", "copy"])
        .args(flags)
        .args(["-metadata:s:v", "comment=Cover (front)"]);
    Ok(invocation.finish(&track.output_path))
}

pub(crate) trait Transcoder {
    fn run(&mut self, invocation: &Invocation) -> Result<()>;
}

pub(crate) struct Ffmpeg {
    program: PathBuf,
}

impl Ffmpeg {
    pub(crate) fn new(program: PathBuf) -> Self {
        Self { program }
    }

    pub(crate) fn program(&self) -> &Path {
        &self.program
    }
}

impl Transcoder for Ffmpeg {
    fn run(&mut self, invocation: &Invocation) -> Result<()> {
        debug!("{}", invocation.command_line(&self.program));
        let output = Command::new(&self.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| SplitError::ToolSpawn {
                program: self.program.clone(),
                source,
            })?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(SplitError::ToolFailed {
            step: invocation.step.to_string(),
            status: output.status,
            stderr: stderr
                .lines()
                .rev()
                .find(|line| !line.trim().is_empty())
                .unwrap_or("no error output")
                .trim()
                .to_string(),
        })
    }
}

fn quote(value: &OsStr) -> String {
    let text = value.to_string_lossy();
    let plain = !text.is_empty()
        && text
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || "-_.,:/=+@%".contains(ch));
    if plain {
        text.into_owned()
    } else {
        format!("'{}'", text.replace('\'', r"'\''"))
    }
}
