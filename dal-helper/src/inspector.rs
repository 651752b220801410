//! Minimal inspection session, used when the caller does not plug in its own
//! [`InteractiveHost`].
//!
//! On a terminal, input comes from `rustyline` (line editing, history, Ctrl-C
//! clears the line). Any [`BufRead`] can stand in for it via [`Lines`].

use std::fmt::Display;
use std::io::{self, BufRead, Write};

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::dispatch::InteractiveHost;

const PROMPT: &str = ">>> ";

/// One read from the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// A line of text, without the trailing newline.
    Line(String),
    /// The current line was abandoned (Ctrl-C).
    Interrupted,
    /// No more input (Ctrl-D or end of stream).
    Eof,
}

/// Where the session reads its commands from.
pub trait LineReader {
    /// Show `prompt` and read one line.
    ///
    /// `out` is the session's output stream, for readers that do not draw their
    /// own prompt.
    ///
    /// # Errors
    ///
    /// Terminal or stream I/O failures.
    fn read_line(&mut self, prompt: &str, out: &mut dyn Write) -> anyhow::Result<Input>;
}

/// Terminal line editor with in-memory history.
pub struct Editor(DefaultEditor);

impl Editor {
    /// Attach to the controlling terminal.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be configured.
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self(DefaultEditor::new()?))
    }
}

impl LineReader for Editor {
    fn read_line(&mut self, prompt: &str, _out: &mut dyn Write) -> anyhow::Result<Input> {
        match self.0.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    self.0.add_history_entry(line.as_str())?;
                }
                Ok(Input::Line(line))
            }
            Err(ReadlineError::Interrupted) => Ok(Input::Interrupted),
            Err(ReadlineError::Eof) => Ok(Input::Eof),
            Err(e) => Err(e.into()),
        }
    }
}

/// Reads lines from any buffered stream, writing the prompt to the session output.
#[derive(Debug)]
pub struct Lines<R>(R);

impl<R: BufRead> Lines<R> {
    /// Wrap a stream.
    pub fn new(input: R) -> Self {
        Self(input)
    }
}

impl<R: BufRead> LineReader for Lines<R> {
    fn read_line(&mut self, prompt: &str, out: &mut dyn Write) -> anyhow::Result<Input> {
        write!(out, "{prompt}")?;
        out.flush()?;

        let mut line = String::new();
        if self.0.read_line(&mut line)? == 0 {
            return Ok(Input::Eof);
        }
        Ok(Input::Line(line.trim_end_matches(['\r', '\n']).to_owned()))
    }
}

/// Answers commands until `exit`, `quit` or end of input.
///
/// Commands:
/// - the binding name (e.g. `dal`): print the DAL's rendering
/// - `help`: list commands
/// - `exit` / `quit`: end the session
#[derive(Debug)]
pub struct Inspector<L, W> {
    reader: L,
    output: W,
}

impl Inspector<Editor, io::Stdout> {
    /// Session on the terminal, printing to stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if the line editor cannot be created.
    pub fn stdio() -> anyhow::Result<Self> {
        Ok(Self::with_reader(Editor::new()?, io::stdout()))
    }
}

impl<R: BufRead, W: Write> Inspector<Lines<R>, W> {
    /// Session over plain streams.
    pub fn new(input: R, output: W) -> Self {
        Self::with_reader(Lines::new(input), output)
    }
}

impl<L: LineReader, W: Write> Inspector<L, W> {
    /// Session over a custom line reader.
    pub fn with_reader(reader: L, output: W) -> Self {
        Self { reader, output }
    }

    /// Give back the output stream.
    pub fn into_output(self) -> W {
        self.output
    }

    fn help(&mut self, binding: &str) -> io::Result<()> {
        writeln!(self.output, "  {binding:<8} show the {binding} object")?;
        writeln!(self.output, "  help     show this message")?;
        writeln!(self.output, "  exit     leave the session (also: quit, Ctrl-D)")
    }
}

impl<L: LineReader, W: Write, T: Display> InteractiveHost<T> for Inspector<L, W> {
    fn embed(&mut self, header: &str, binding: &str, dal: &T) -> anyhow::Result<()> {
        writeln!(self.output, "{header}")?;

        loop {
            let line = match self.reader.read_line(PROMPT, &mut self.output)? {
                Input::Line(line) => line,
                Input::Interrupted => continue,
                Input::Eof => {
                    writeln!(self.output)?;
                    break;
                }
            };

            match line.trim() {
                "" => {}
                "exit" | "quit" => break,
                "help" => self.help(binding)?,
                cmd if cmd == binding => writeln!(self.output, "{dal}")?,
                cmd => writeln!(
                    self.output,
                    "unknown command '{cmd}', type 'help' for a list"
                )?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::io::Cursor;

    struct Dal;

    impl Display for Dal {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("Dal(3 items)")
        }
    }

    /// Replays canned reads, then reports end of input.
    struct Scripted(VecDeque<Input>);

    impl LineReader for Scripted {
        fn read_line(&mut self, _prompt: &str, _out: &mut dyn Write) -> anyhow::Result<Input> {
            Ok(self.0.pop_front().unwrap_or(Input::Eof))
        }
    }

    fn session(input: &str) -> String {
        let mut inspector = Inspector::new(Cursor::new(input.to_owned()), Vec::new());
        inspector.embed("hello", "dal", &Dal).unwrap();
        String::from_utf8(inspector.into_output()).unwrap()
    }

    #[test]
    fn test_prints_header_and_binding() {
        let out = session("dal\nexit\n");
        assert!(out.starts_with("hello\n"), "got: {out}");
        assert!(out.contains("Dal(3 items)"), "got: {out}");
    }

    #[test]
    fn test_ends_on_eof() {
        let out = session("dal\n");
        assert_eq!(out.matches(PROMPT).count(), 2);
    }

    #[test]
    fn test_stops_reading_after_quit() {
        let out = session("quit\ndal\n");
        assert!(!out.contains("Dal(3 items)"), "got: {out}");
    }

    #[test]
    fn test_unknown_command_and_help() {
        let out = session("ls\nhelp\n");
        assert!(out.contains("unknown command 'ls'"), "got: {out}");
        assert!(out.contains("show the dal object"), "got: {out}");
    }

    #[test]
    fn test_interrupt_keeps_session_open() {
        let script = Scripted(VecDeque::from([
            Input::Interrupted,
            Input::Line("dal".to_owned()),
            Input::Interrupted,
        ]));
        let mut inspector = Inspector::with_reader(script, Vec::new());

        inspector.embed("hello", "dal", &Dal).unwrap();

        let out = String::from_utf8(inspector.into_output()).unwrap();
        assert_eq!(out, "hello\nDal(3 items)\n\n");
    }

    #[test]
    fn test_lines_strips_newline_and_reports_eof() {
        let mut lines = Lines::new(Cursor::new("dal\r\n"));
        let mut out = Vec::new();

        assert_eq!(
            lines.read_line(PROMPT, &mut out).unwrap(),
            Input::Line("dal".to_owned())
        );
        assert_eq!(lines.read_line(PROMPT, &mut out).unwrap(), Input::Eof);
        assert_eq!(String::from_utf8(out).unwrap(), format!("{PROMPT}{PROMPT}"));
    }
}
