use owo_colors::OwoColorize;

fn main() {
    if let Err(err) = cue_split::run() {
        eprintln!("{} {}", "error:".red().bold(), err);
        std::process::exit(1);
    }
}
