use encoding_rs::Encoding;
use indicatif::ProgressBar;
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use crate::Result;
use crate::cue::parse_cue_file;
use crate::error::SplitError;
use crate::ffmpeg::{ContainerFormat, Invocation, Transcoder, cut_track, embed_cover, extract_cover};
use crate::plan::{COVER_FILE_NAME, album_dir_name, plan_tracks};
use crate::types::{AlbumInfo, CueDocument, Track};

pub(crate) struct SplitOptions {
    pub(crate) dir: PathBuf,
    pub(crate) cue_name: String,
    pub(crate) cue_encoding: Option<&'static Encoding>,
    pub(crate) audio: Option<PathBuf>,
    pub(crate) overwrite: bool,
}

/// Asks the user for a replacement when the audio file named by the sheet is missing.
pub(crate) trait AudioPrompt {
    fn ask(&mut self, missing: &Path) -> Result<String>;
}

pub(crate) struct Plan {
    document: CueDocument,
    encoding_autodetected: bool,
    album: AlbumInfo,
    audio_path: PathBuf,
    format: ContainerFormat,
    output_dir: PathBuf,
    cover_path: PathBuf,
    tracks: Vec<Track>,
    overwrite: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TrackOutcome {
    Cut,
    Embedded,
    CutFailed(String),
    EmbedFailed(String),
}

impl TrackOutcome {
    pub(crate) fn is_failure(&self) -> bool {
        matches!(self, Self::CutFailed(_) | Self::EmbedFailed(_))
    }
}

/// What a run produced, in place of process-wide flags.
#[derive(Debug, Clone)]
pub(crate) struct SplitReport {
    pub(crate) cover_extracted: bool,
    pub(crate) outcomes: Vec<TrackOutcome>,
    pub(crate) unsupported_format: Option<String>,
}

impl SplitReport {
    pub(crate) fn failed(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.is_failure()).count()
    }

    pub(crate) fn into_result(self) -> Result<()> {
        if let Some(extension) = self.unsupported_format {
            return Err(SplitError::UnsupportedFormat { extension });
        }
        let failed = self.failed();
        if failed > 0 {
            return Err(SplitError::TrackFailures {
                failed,
                total: self.outcomes.len(),
            });
        }
        Ok(())
    }
}

impl Plan {
    pub(crate) fn document(&self) -> &CueDocument {
        &self.document
    }

    pub(crate) fn encoding_autodetected(&self) -> bool {
        self.encoding_autodetected
    }

    pub(crate) fn album(&self) -> &AlbumInfo {
        &self.album
    }

    pub(crate) fn audio_path(&self) -> &Path {
        &self.audio_path
    }

    pub(crate) fn format(&self) -> &ContainerFormat {
        &self.format
    }

    pub(crate) fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub(crate) fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Every invocation a run would make if the cover extraction succeeds.
    pub(crate) fn invocations(&self) -> Vec<Invocation> {
        let mut invocations = vec![extract_cover(&self.audio_path, &self.cover_path, self.overwrite)];
        invocations.extend(self.tracks.iter().map(|track| self.cut_invocation(track)));
        invocations.extend(
            self.tracks
                .iter()
                .filter_map(|track| embed_cover(track, &self.cover_path, &self.format, self.overwrite).ok()),
        );
        invocations
    }

    pub(crate) fn execute(
        &self,
        transcoder: &mut dyn Transcoder,
        progress: Option<&ProgressBar>,
    ) -> Result<SplitReport> {
        ensure_output_paths_available(&self.tracks, self.overwrite)?;
        fs::create_dir_all(&self.output_dir)?;

        let cover_extracted = self.try_extract_cover(transcoder)?;
        advance(progress, "cutting");

        let mut outcomes = Vec::with_capacity(self.tracks.len());
        for track in &self.tracks {
            outcomes.push(self.cut(transcoder, track)?);
            advance(progress, "cutting");
        }

        let mut unsupported_format = None;
        if cover_extracted {
            if let Some(pb) = progress {
                pb.inc_length(self.tracks.len() as u64);
            }
            unsupported_format = self.embed_all(transcoder, &mut outcomes, progress)?;
        } else {
            info!("no cover art found in {}, skipping embedding", self.audio_path.display());
        }

        Ok(SplitReport {
            cover_extracted,
            outcomes,
            unsupported_format,
        })
    }

    fn cut_invocation(&self, track: &Track) -> Invocation {
        cut_track(&self.audio_path, track, &self.album, &self.format, self.overwrite)
    }

    fn try_extract_cover(&self, transcoder: &mut dyn Transcoder) -> Result<bool> {
        let existed = is_nonempty_file(&self.cover_path);
        let invocation = extract_cover(&self.audio_path, &self.cover_path, self.overwrite);
        match transcoder.run(&invocation) {
            Ok(()) => Ok(is_nonempty_file(&self.cover_path)),
            Err(err @ SplitError::ToolSpawn { .. }) => Err(err),
            Err(err) => {
                debug!("cover extraction: {}", err);
                Ok(existed && is_nonempty_file(&self.cover_path))
            }
        }
    }

    fn cut(&self, transcoder: &mut dyn Transcoder, track: &Track) -> Result<TrackOutcome> {
        match transcoder.run(&self.cut_invocation(track)) {
            Ok(()) => {
                info!("{}", track.output_path.display());
                Ok(TrackOutcome::Cut)
            }
            Err(err @ SplitError::ToolSpawn { .. }) => Err(err),
            Err(err) => {
                warn!("{}", err);
                Ok(TrackOutcome::CutFailed(err.to_string()))
            }
        }
    }

    /// Returns the container extension when it cannot carry a cover.
    fn embed_all(
        &self,
        transcoder: &mut dyn Transcoder,
        outcomes: &mut [TrackOutcome],
        progress: Option<&ProgressBar>,
    ) -> Result<Option<String>> {
        for (track, outcome) in self.tracks.iter().zip(outcomes.iter_mut()) {
            if *outcome != TrackOutcome::Cut {
                advance(progress, "embedding cover");
                continue;
            }
            let invocation = match embed_cover(track, &self.cover_path, &self.format, self.overwrite) {
                Ok(invocation) => invocation,
                Err(SplitError::UnsupportedFormat { extension }) => {
                    warn!("can only add cover art to mp3 and flac, leaving tracks without cover");
                    return Ok(Some(extension));
                }
                Err(err) => return Err(err),
            };

            fs::rename(&track.output_path, &track.temp_path)?;
            match transcoder.run(&invocation) {
                Ok(()) => {
                    fs::remove_file(&track.temp_path)?;
                    *outcome = TrackOutcome::Embedded;
                }
                Err(err) => {
                    restore_track(track)?;
                    if matches!(err, SplitError::ToolSpawn { .. }) {
                        return Err(err);
                    }
                    warn!("{}", err);
                    *outcome = TrackOutcome::EmbedFailed(err.to_string());
                }
            }
            advance(progress, "embedding cover");
        }
        Ok(None)
    }
}

pub(crate) fn prepare_split(options: SplitOptions, prompt: &mut dyn AudioPrompt) -> Result<Plan> {
    if !options.dir.is_dir() {
        return Err(SplitError::FileNotFound { path: options.dir });
    }

    let (document, encoding_autodetected) =
        parse_cue_file(&options.dir, &options.cue_name, options.cue_encoding)?;

    let declared = options
        .audio
        .clone()
        .unwrap_or_else(|| PathBuf::from(&document.audio_file));
    let audio_path = resolve_audio_file(&options.dir, &declared, prompt)?;
    let format = ContainerFormat::from_path(&audio_path);
    let extension = audio_path
        .extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_default();

    let output_dir = options.dir.join(album_dir_name(&document, &audio_path));
    let tracks = plan_tracks(&document, &output_dir, &extension);
    let album = AlbumInfo {
        title: document.album_title().to_string(),
        performer: document.performer.clone(),
    };

    Ok(Plan {
        cover_path: output_dir.join(COVER_FILE_NAME),
        document,
        encoding_autodetected,
        album,
        audio_path,
        format,
        output_dir,
        tracks,
        overwrite: options.overwrite,
    })
}

/// Looks for the audio file, then asks once for a corrected name. A second miss is final.
fn resolve_audio_file(dir: &Path, declared: &Path, prompt: &mut dyn AudioPrompt) -> Result<PathBuf> {
    let first = dir.join(declared);
    if first.is_file() {
        return Ok(first);
    }

    warn!("cannot locate audio file {}", first.display());
    let answer = prompt.ask(&first)?;
    let second = dir.join(answer.trim());
    if second.is_file() {
        Ok(second)
    } else {
        Err(SplitError::FileNotFound { path: second })
    }
}

fn ensure_output_paths_available(tracks: &[Track], overwrite: bool) -> Result<()> {
    if overwrite {
        return Ok(());
    }
    match tracks.iter().find(|track| track.output_path.exists()) {
        Some(track) => Err(SplitError::OutputExists {
            path: track.output_path.clone(),
        }),
        None => Ok(()),
    }
}

fn restore_track(track: &Track) -> Result<()> {
    if track.output_path.exists() {
        fs::remove_file(&track.output_path)?;
    }
    fs::rename(&track.temp_path, &track.output_path)?;
    Ok(())
}

fn is_nonempty_file(path: &Path) -> bool {
    fs::metadata(path)
        .map(|meta| meta.is_file() && meta.len() > 0)
        .unwrap_or(false)
}

fn advance(progress: Option<&ProgressBar>, message: &'static str) {
    if let Some(pb) = progress {
        pb.set_message(message);
        pb.inc(1);
    }
}
