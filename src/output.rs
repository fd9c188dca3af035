use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use owo_colors::OwoColorize;
use std::path::Path;

use crate::cli::display_path;
use crate::ffmpeg::Ffmpeg;
use crate::split::{Plan, SplitReport, TrackOutcome};
use crate::timecode::Timecode;

pub(crate) fn print_plan(plan: &Plan, display_base: Option<&Path>) {
    let document = plan.document();
    let album = plan.album();

    println!("{}", "Plan".bold());
    println!(
        "  {} {} ({})",
        "Audio:".cyan(),
        display_path(display_base, plan.audio_path()).display(),
        plan.format().name()
    );
    let encoding_label = if plan.encoding_autodetected() {
        format!("{} {}", document.encoding.name(), "(autodetected)".dimmed())
    } else {
        document.encoding.name().to_string()
    };
    println!("  {} {}", "CUE encoding:".cyan(), encoding_label.green());
    println!("  {} {}", "Album:".cyan(), album.title.yellow());
    if let Some(performer) = album.performer.as_deref() {
        println!("  {} {}", "Performer:".cyan(), performer.yellow());
    }
    println!(
        "  {} {}",
        "Output:".cyan(),
        display_path(display_base, plan.output_dir()).display().to_string().blue()
    );
    println!("  {} {}", "Tracks:".cyan(), plan.tracks().len());

    for track in plan.tracks() {
        let file_name = track
            .output_path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| track.output_path.display().to_string());
        println!(
            "{} {}",
            file_name.bold(),
            format_span(track.start, track.end).dimmed()
        );
    }
}

pub(crate) fn print_commands(plan: &Plan, ffmpeg: &Ffmpeg) {
    println!("{}", "Commands".bold());
    for invocation in plan.invocations() {
        println!("  {}", invocation.command_line(ffmpeg.program()));
    }
}

pub(crate) fn print_summary(plan: &Plan, report: &SplitReport, display_base: Option<&Path>) {
    for (track, outcome) in plan.tracks().iter().zip(&report.outcomes) {
        let target = display_path(display_base, &track.output_path);
        match outcome {
            TrackOutcome::Cut | TrackOutcome::Embedded => {}
            TrackOutcome::CutFailed(reason) => {
                eprintln!("{} {}: {}", "Failed".red().bold(), target.display(), reason);
            }
            TrackOutcome::EmbedFailed(reason) => {
                eprintln!(
                    "{} {} (kept without cover): {}",
                    "Cover".yellow().bold(),
                    target.display(),
                    reason
                );
            }
        }
    }

    let written = report.outcomes.len() - report.failed();
    let cover = if !report.cover_extracted {
        "no cover art".dimmed().to_string()
    } else if let Some(extension) = report.unsupported_format.as_deref() {
        format!("cover not embedded into .{}", extension).yellow().to_string()
    } else {
        "cover embedded".green().to_string()
    };
    println!(
        "{} {}/{} tracks in {}, {}",
        "Done".green().bold(),
        written,
        report.outcomes.len(),
        display_path(display_base, plan.output_dir()).display(),
        cover
    );
}

pub(crate) fn make_progress_bar(steps: u64) -> ProgressBar {
    let pb = ProgressBar::with_draw_target(Some(steps), ProgressDrawTarget::stderr_with_hz(10));
    let style = ProgressStyle::with_template("{bar:40.cyan/blue} {pos:>3}/{len:<3} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-");
    pb.set_style(style);
    pb.set_message("extracting cover");
    pb
}

pub(crate) fn finish_progress(progress: &mut Option<ProgressBar>, message: &str) {
    if let Some(pb) = progress.take() {
        pb.finish_with_message(message.to_string());
    }
}

fn format_span(start: Timecode, end: Option<Timecode>) -> String {
    match end {
        Some(end) => {
            let length = end.total_frames().saturating_sub(start.total_frames());
            format!(
                "{} ({}-{})",
                format_msf(length),
                format_msf(start.total_frames()),
                format_msf(end.total_frames())
            )
        }
        None => format!("({}-end)", format_msf(start.total_frames())),
    }
}

pub(crate) fn format_msf(frames: u64) -> String {
    let total_seconds = frames / 75;
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    let frames = frames % 75;
    format!("{:02}:{:02}:{:02}", minutes, seconds, frames)
}
