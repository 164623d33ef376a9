use std::fmt::Display;
use std::io::{self, BufRead, IsTerminal, Write};

use super::theme::Theme;

/// Line-oriented terminal I/O. Generic over the streams so sessions can be
/// driven from a script in tests.
pub(crate) struct Console<R, W> {
    input: R,
    output: W,
    theme: Theme,
    /// Read passwords from the tty without echo instead of from `input`.
    hide_passwords: bool,
}

impl Console<io::StdinLock<'static>, io::Stdout> {
    pub(crate) fn stdio(theme: Theme) -> Self {
        let stdin = io::stdin();
        let hide_passwords = stdin.is_terminal();
        Self {
            input: stdin.lock(),
            output: io::stdout(),
            theme,
            hide_passwords,
        }
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    #[cfg(test)]
    pub(crate) fn new(input: R, output: W, theme: Theme) -> Self {
        Self {
            input,
            output,
            theme,
            hide_passwords: false,
        }
    }

    pub(crate) fn theme(&self) -> Theme {
        self.theme
    }

    /// Print `label` and read one line without its line ending.
    /// `None` means the input is exhausted.
    pub(crate) fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed_len);
        Ok(Some(line))
    }

    pub(crate) fn prompt_password(&mut self, label: &str) -> io::Result<Option<String>> {
        if !self.hide_passwords {
            return self.prompt(label);
        }
        self.output.flush()?;
        match rpassword::prompt_password(label) {
            Ok(password) => Ok(Some(password)),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub(crate) fn say(&mut self, text: impl Display) -> io::Result<()> {
        writeln!(self.output, "{text}")
    }

    pub(crate) fn success(&mut self, text: &str) -> io::Result<()> {
        let painted = self.theme.success(text);
        self.say(painted)
    }

    pub(crate) fn error(&mut self, text: impl Display) -> io::Result<()> {
        let painted = self.theme.error(&text.to_string());
        self.say(painted)
    }

    /// Write pre-rendered text (e.g. a table) verbatim.
    pub(crate) fn write_block(&mut self, block: &str) -> io::Result<()> {
        write!(self.output, "{block}")?;
        self.output.flush()
    }

    #[cfg(test)]
    pub(crate) fn into_output(self) -> W {
        self.output
    }
}
