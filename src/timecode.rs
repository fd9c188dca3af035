use std::fmt;

pub(crate) const FRAMES_PER_SECOND: u32 = 75;

/// A position inside the source audio, stored as CUE frames.
///
/// Renders as `HH:MM:SS.fraction`, the form ffmpeg accepts for `-ss`/`-to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct Timecode {
    frames: u64,
}

impl Timecode {
    pub(crate) fn from_msf(minutes: u32, seconds: u32, frames: u32) -> Self {
        let total_seconds = minutes as u64 * 60 + seconds as u64;
        Self {
            frames: total_seconds * FRAMES_PER_SECOND as u64 + frames as u64,
        }
    }

    /// Parses a CUE `mm:ss:ff` offset. Minutes may exceed 59.
    pub(crate) fn parse_msf(value: &str) -> Result<Self, String> {
        let mut parts = value.trim().split(':');
        let (Some(m), Some(s), Some(f), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(format!("expected mm:ss:ff, got {:?}", value));
        };

        let field = |text: &str, name: &str| -> Result<u32, String> {
            if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
                return Err(format!("invalid {} in {:?}", name, value));
            }
            text.parse()
                .map_err(|_| format!("invalid {} in {:?}", name, value))
        };

        let minutes = field(m, "minutes")?;
        let seconds = field(s, "seconds")?;
        let frames = field(f, "frames")?;
        if seconds >= 60 {
            return Err(format!("seconds out of range in {:?}", value));
        }
        if frames >= FRAMES_PER_SECOND {
            return Err(format!("frames out of range in {:?}", value));
        }
        Ok(Self::from_msf(minutes, seconds, frames))
    }

    pub(crate) fn total_frames(&self) -> u64 {
        self.frames
    }

    pub(crate) fn hours(&self) -> u64 {
        self.total_seconds() / 3600
    }

    pub(crate) fn minutes(&self) -> u64 {
        (self.total_seconds() / 60) % 60
    }

    pub(crate) fn seconds(&self) -> u64 {
        self.total_seconds() % 60
    }

    pub(crate) fn frame(&self) -> u64 {
        self.frames % FRAMES_PER_SECOND as u64
    }

    fn total_seconds(&self) -> u64 {
        self.frames / FRAMES_PER_SECOND as u64
    }

    /// Digits after the decimal point of `frame / 75`, dot included.
    fn fraction(&self) -> String {
        let quotient = self.frame() as f64 / FRAMES_PER_SECOND as f64;
        let rendered = quotient.to_string();
        match rendered.find('.') {
            Some(dot) => rendered[dot..].to_string(),
            None => ".0".to_string(),
        }
    }
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}{}",
            self.hours(),
            self.minutes(),
            self.seconds(),
            self.fraction()
        )
    }
}
