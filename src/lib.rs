pub type Result<T> = std::result::Result<T, SplitError>;

mod app;
mod cli;
mod cue;
mod error;
mod ffmpeg;
mod output;
mod plan;
mod sanitize;
mod split;
mod timecode;
mod types;
mod ui;

pub use app::run;
pub use error::SplitError;
