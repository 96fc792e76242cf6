use std::fmt::Display;
use std::io::{self, BufRead, Write};

/// Line-based console: every question is written to `output`, every answer
/// read from `input`.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn say(&mut self, line: impl Display) -> io::Result<()> {
        writeln!(self.output, "{line}")
    }

    /// Free text, line terminator stripped. End of input is an `UnexpectedEof` error.
    pub fn ask_text(&mut self, message: &str) -> io::Result<String> {
        write!(self.output, "{message}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(line)
    }

    /// Asks until the answer is a plain non-negative number from `allowed`.
    pub fn ask_choice(&mut self, message: &str, allowed: &[u32]) -> io::Result<u32> {
        loop {
            let raw = self.ask_text(message)?;
            if let Some(value) = parse_choice(&raw).filter(|value| allowed.contains(value)) {
                return Ok(value);
            }
            self.say(format!("Invalid input. Enter one of: {allowed:?}"))?;
        }
    }

    /// Single shot: only an exact `y` counts as yes.
    pub fn ask_yes_no(&mut self, message: &str) -> io::Result<bool> {
        let raw = self.ask_text(&format!("{message} (y/N): "))?;
        Ok(raw == "y")
    }
}

fn parse_choice(raw: &str) -> Option<u32> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}
