use clap::Parser;
use indicatif::MultiProgress;
use indicatif_log_bridge::LogWrapper;
use log::LevelFilter;

use crate::Result;
use crate::cli::{Args, cue_file_name};
use crate::cue::resolve_encoding;
use crate::ffmpeg::Ffmpeg;
use crate::output::{finish_progress, make_progress_bar, print_commands, print_plan, print_summary};
use crate::split::{SplitOptions, prepare_split};
use crate::ui::TerminalPrompt;

pub fn run() -> Result<()> {
    let args = Args::parse();
    let multi = init_logging(args.verbose)?;

    let encoding = match args.cue_encoding.as_deref() {
        Some(label) => Some(resolve_encoding(label)?),
        None => None,
    };

    let options = SplitOptions {
        dir: args.dir.clone(),
        cue_name: cue_file_name(&args.cue),
        cue_encoding: encoding,
        audio: args.audio.clone(),
        overwrite: args.overwrite,
    };
    let plan = prepare_split(options, &mut TerminalPrompt)?;

    let display_base = Some(args.dir.as_path());
    print_plan(&plan, display_base);

    let mut ffmpeg = Ffmpeg::new(args.ffmpeg.clone());
    if args.dry_run {
        print_commands(&plan, &ffmpeg);
        return Ok(());
    }

    let steps = plan.tracks().len() as u64 + 1;
    let mut progress = Some(multi.add(make_progress_bar(steps)));
    match plan.execute(&mut ffmpeg, progress.as_ref()) {
        Ok(report) => {
            finish_progress(&mut progress, "done");
            print_summary(&plan, &report, display_base);
            report.into_result()
        }
        Err(err) => {
            finish_progress(&mut progress, "aborted");
            Err(err)
        }
    }
}

fn init_logging(verbose: bool) -> Result<MultiProgress> {
    let default_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let logger = env_logger::builder()
        .filter_level(default_level)
        .format_timestamp(None)
        .format_target(false)
        .parse_default_env()
        .build();

    let level = logger.filter();
    let multi = MultiProgress::new();
    LogWrapper::new(multi.clone(), logger).try_init()?;
    log::set_max_level(level);
    Ok(multi)
}
