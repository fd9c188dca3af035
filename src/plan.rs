use log::warn;
use std::path::{Path, PathBuf};

use crate::sanitize::sanitize_filename;
use crate::timecode::Timecode;
use crate::types::{CueDocument, Track};

pub(crate) const COVER_FILE_NAME: &str = "cover.jpg";

pub(crate) fn number_prefixes(count: usize) -> Vec<String> {
    let width = count.to_string().len();
    (1..=count)
        .map(|number| format!("{:0width$}", number, width = width))
        .collect()
}

/// Pairs every start with the next track's start. The last track is open-ended.
pub(crate) fn track_bounds(indices: &[Timecode]) -> Vec<(Timecode, Option<Timecode>)> {
    indices
        .iter()
        .enumerate()
        .map(|(idx, start)| (*start, indices.get(idx + 1).copied()))
        .collect()
}

pub(crate) fn album_dir_name(document: &CueDocument, audio_path: &Path) -> String {
    let name = sanitize_filename(document.album_title());
    if is_usable_name(&name) {
        return name;
    }
    let stem = audio_path
        .file_stem()
        .map(|stem| sanitize_filename(&stem.to_string_lossy()))
        .unwrap_or_default();
    if is_usable_name(&stem) {
        stem
    } else {
        "album".to_string()
    }
}

pub(crate) fn plan_tracks(document: &CueDocument, output_dir: &Path, extension: &str) -> Vec<Track> {
    warn_on_unordered_indices(&document.indices);

    let prefixes = number_prefixes(document.track_count());
    let bounds = track_bounds(&document.indices);
    document
        .track_titles()
        .iter()
        .zip(prefixes)
        .zip(bounds)
        .enumerate()
        .map(|(idx, ((title, prefix), (start, end)))| {
            let base = track_base_name(&prefix, title);
            Track {
                number: idx + 1,
                output_path: output_path(output_dir, &base, extension),
                temp_path: output_path(output_dir, &format!("temp {}", base), extension),
                title: title.clone(),
                start,
                end,
            }
        })
        .collect()
}

fn track_base_name(prefix: &str, title: &str) -> String {
    let name = sanitize_filename(title);
    if is_usable_name(&name) {
        format!("{} {}", prefix, name)
    } else {
        prefix.to_string()
    }
}

fn output_path(dir: &Path, base: &str, extension: &str) -> PathBuf {
    if extension.is_empty() {
        dir.join(base)
    } else {
        dir.join(format!("{}.{}", base, extension))
    }
}

fn is_usable_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".."
}

fn warn_on_unordered_indices(indices: &[Timecode]) {
    for (idx, pair) in indices.windows(2).enumerate() {
        if pair[1] <= pair[0] {
            warn!(
                "track {} starts at {} which is not after track {} ({})",
                idx + 2,
                pair[1],
                idx + 1,
                pair[0]
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{album_dir_name, number_prefixes, plan_tracks, track_bounds};
    use crate::cue::parse_cue_from_str;
    use crate::timecode::Timecode;
    use std::path::Path;

    #[test]
    fn prefixes_share_the_width_of_the_track_count() {
        assert_eq!(number_prefixes(9), ["1", "2", "3", "4", "5", "6", "7", "8", "9"]);
        let ten = number_prefixes(10);
        assert_eq!(ten.first().map(String::as_str), Some("01"));
        assert_eq!(ten.last().map(String::as_str), Some("10"));
        assert!(number_prefixes(120).iter().all(|p| p.len() == 3));
        assert!(number_prefixes(0).is_empty());
    }

    #[test]
    fn every_track_ends_where_the_next_begins() {
        let indices: Vec<Timecode> = (0..5).map(|i| Timecode::from_msf(i * 3, 7, 11)).collect();
        let bounds = track_bounds(&indices);
        assert_eq!(bounds.len(), indices.len());
        for (idx, (start, end)) in bounds.iter().enumerate() {
            assert_eq!(*start, indices[idx]);
            assert_eq!(*end, indices.get(idx + 1).copied());
        }
        assert!(bounds.last().unwrap().1.is_none());
    }

    #[test]
    fn plans_names_and_paths() {
        let doc = parse_cue_from_str(
            "TITLE \"Rock/Pop: Live\"\nFILE \"album.flac\" WAVE\nTITLE \"Intro?\"\nINDEX 01 00:00:00\nTITLE \"***\"\nINDEX 01 03:45:37\n",
        )
        .unwrap();
        let dir_name = album_dir_name(&doc, Path::new("album.flac"));
        assert_eq!(dir_name, "Rock-Pop Live");

        let out = Path::new("/music").join(&dir_name);
        let tracks = plan_tracks(&doc, &out, "flac");
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].output_path, out.join("1 Intro.flac"));
        assert_eq!(tracks[0].temp_path, out.join("temp 1 Intro.flac"));
        assert_eq!(tracks[0].end, Some(tracks[1].start));
        assert_eq!(tracks[1].output_path, out.join("2.flac"));
        assert_eq!(tracks[1].title, "***");
        assert_eq!(tracks[1].number, 2);
        assert!(tracks[1].end.is_none());
        assert_ne!(tracks[0].temp_path, tracks[1].temp_path);
    }

    #[test]
    fn album_dir_falls_back_to_audio_stem() {
        let doc = parse_cue_from_str(
            "TITLE \"::\"\nFILE \"x.mp3\" MP3\nTITLE \"T\"\nINDEX 01 00:00:00\n",
        )
        .unwrap();
        assert_eq!(album_dir_name(&doc, Path::new("/in/My Rip.mp3")), "My Rip");
    }
}
