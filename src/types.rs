use encoding_rs::Encoding;
use std::path::PathBuf;

use crate::timecode::Timecode;

#[derive(Debug, Clone)]
pub(crate) struct CueDocument {
    /// Album title first, then one title per track.
    pub(crate) titles: Vec<String>,
    /// `INDEX 01` start of every track, aligned with `titles[1..]`.
    pub(crate) indices: Vec<Timecode>,
    pub(crate) performer: Option<String>,
    pub(crate) audio_file: String,
    pub(crate) encoding: &'static Encoding,
}

impl CueDocument {
    pub(crate) fn album_title(&self) -> &str {
        self.titles.first().map(String::as_str).unwrap_or_default()
    }

    pub(crate) fn track_titles(&self) -> &[String] {
        self.titles.get(1..).unwrap_or_default()
    }

    pub(crate) fn track_count(&self) -> usize {
        self.indices.len()
    }
}

#[derive(Debug, Clone)]
pub(crate) struct AlbumInfo {
    pub(crate) title: String,
    pub(crate) performer: Option<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct Track {
    pub(crate) number: usize,
    pub(crate) title: String,
    pub(crate) output_path: PathBuf,
    pub(crate) temp_path: PathBuf,
    pub(crate) start: Timecode,
    /// `None` for the final track, which runs to the end of the file.
    pub(crate) end: Option<Timecode>,
}
