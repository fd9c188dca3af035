use encoding_rs::{Encoding, UTF_8, WINDOWS_1251};
use log::debug;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::Result;
use crate::error::SplitError;
use crate::timecode::Timecode;
use crate::types::CueDocument;

/// Only the track start index is kept; pregaps (`INDEX 00`) and sub-indices are skipped.
const TRACK_START_INDEX: u32 = 1;

pub(crate) fn resolve_encoding(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.as_bytes())
        .ok_or_else(|| SplitError::Argument(format!("unsupported cue encoding: {}", label)))
}

pub(crate) fn parse_cue_file(
    dir: &Path,
    cue_name: &str,
    encoding: Option<&'static Encoding>,
) -> Result<(CueDocument, bool)> {
    let path = dir.join(cue_name);
    let contents = fs::read(&path).map_err(|err| match err.kind() {
        ErrorKind::NotFound | ErrorKind::NotADirectory => SplitError::FileNotFound { path },
        _ => SplitError::Io(err),
    })?;
    let (encoding, autodetected) = match encoding {
        Some(enc) => (enc, false),
        None => (detect_cue_encoding(&contents), true),
    };
    parse_cue_from_bytes(&contents, encoding).map(|doc| (doc, autodetected))
}

#[cfg(test)]
pub(crate) fn parse_cue_from_str(contents: &str) -> Result<CueDocument> {
    parse_cue_from_bytes(contents.as_bytes(), UTF_8)
}

fn parse_cue_from_bytes(contents: &[u8], encoding: &'static Encoding) -> Result<CueDocument> {
    let (decoded, used, had_errors) = encoding.decode(contents);
    if had_errors {
        debug!("cue sheet has bytes that are not valid {}", used.name());
    }
    parse_cue_text(&decoded, used)
}

fn detect_cue_encoding(bytes: &[u8]) -> &'static Encoding {
    if let Some((bom, _)) = Encoding::for_bom(bytes) {
        return bom;
    }
    if std::str::from_utf8(bytes).is_ok() {
        UTF_8
    } else {
        WINDOWS_1251
    }
}

fn parse_cue_text(text: &str, encoding: &'static Encoding) -> Result<CueDocument> {
    let mut titles = Vec::new();
    let mut indices = Vec::new();
    let mut performer = None;
    let mut audio_file = None;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let (keyword, rest) = split_keyword(raw.trim());
        match keyword {
            "TITLE" => titles.push(required_value(rest, line_no, keyword)?),
            "INDEX" => {
                if let Some(start) = parse_index(rest, line_no)? {
                    indices.push(start);
                }
            }
            "PERFORMER" => {
                if performer.is_none() {
                    performer = Some(required_value(rest, line_no, keyword)?);
                }
            }
            "FILE" => {
                if audio_file.is_none() {
                    audio_file = Some(parse_file_name(rest, line_no)?);
                }
            }
            _ => {}
        }
    }

    let audio_file =
        audio_file.ok_or_else(|| SplitError::Sheet("no FILE entry found".to_string()))?;
    if indices.is_empty() {
        return Err(SplitError::Sheet("cue sheet has no tracks".to_string()));
    }
    if titles.len() != indices.len() + 1 {
        return Err(SplitError::Sheet(format!(
            "found {} TITLE entries for {} tracks; expected an album title plus one per track",
            titles.len(),
            indices.len()
        )));
    }

    Ok(CueDocument {
        titles,
        indices,
        performer,
        audio_file,
        encoding,
    })
}

fn split_keyword(line: &str) -> (&str, &str) {
    match line.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest.trim()),
        None => (line, ""),
    }
}

fn required_value(rest: &str, line_no: usize, keyword: &str) -> Result<String> {
    if rest.is_empty() {
        return Err(SplitError::parse(line_no, format!("{} without a value", keyword)));
    }
    Ok(unquote(rest).to_string())
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(value)
}

fn parse_index(rest: &str, line_no: usize) -> Result<Option<Timecode>> {
    let mut tokens = rest.split_whitespace();
    let (Some(number), Some(time)) = (tokens.next(), tokens.next()) else {
        return Err(SplitError::parse(line_no, "INDEX line is too short"));
    };
    let number: u32 = number
        .parse()
        .map_err(|_| SplitError::parse(line_no, format!("invalid index number {:?}", number)))?;
    if number != TRACK_START_INDEX {
        return Ok(None);
    }
    Timecode::parse_msf(time)
        .map(Some)
        .map_err(|message| SplitError::parse(line_no, message))
}

/// Strips the quotes and the trailing file type token (`WAVE`, `MP3`, ...).
fn parse_file_name(rest: &str, line_no: usize) -> Result<String> {
    let name = if let Some(quoted) = rest.strip_prefix('"') {
        match quoted.find('"') {
            Some(end) => &quoted[..end],
            None => return Err(SplitError::parse(line_no, "FILE name is missing its closing quote")),
        }
    } else {
        match rest.rsplit_once(char::is_whitespace) {
            Some((name, _file_type)) => name.trim(),
            None => rest,
        }
    };

    if name.is_empty() {
        return Err(SplitError::parse(line_no, "FILE without a file name"));
    }
    Ok(name.to_string())
}
