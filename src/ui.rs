use dialoguer::Input;
use owo_colors::OwoColorize;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::Path;

use crate::Result;
use crate::split::AudioPrompt;

const AUDIO_PROMPT: &str = "Enter audio file name";

/// Reads a replacement audio file name from standard input.
pub(crate) struct TerminalPrompt;

impl AudioPrompt for TerminalPrompt {
    fn ask(&mut self, missing: &Path) -> Result<String> {
        eprintln!(
            "{} {}",
            "Cannot locate audio file".yellow().bold(),
            missing.display()
        );
        if io::stdin().is_terminal() && io::stderr().is_terminal() {
            let answer: String = Input::new().with_prompt(AUDIO_PROMPT).interact_text()?;
            return Ok(answer);
        }
        read_answer(&mut io::stdin().lock(), &mut io::stderr())
    }
}

/// Line-based fallback for piped or redirected input.
fn read_answer(input: &mut impl BufRead, output: &mut impl Write) -> Result<String> {
    write!(output, "{}: ", AUDIO_PROMPT)?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(answer.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::read_answer;
    use std::io::Cursor;

    #[test]
    fn reads_one_line_and_prints_the_question() {
        let mut input = Cursor::new("  real.flac \nignored.flac\n");
        let mut output = Vec::new();
        let answer = read_answer(&mut input, &mut output).unwrap();
        assert_eq!(answer, "real.flac");
        assert_eq!(String::from_utf8(output).unwrap(), "Enter audio file name: ");
    }

    #[test]
    fn closed_input_gives_an_empty_answer() {
        let mut output = Vec::new();
        let answer = read_answer(&mut Cursor::new(""), &mut output).unwrap();
        assert!(answer.is_empty());
    }
}
