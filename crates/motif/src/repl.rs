//! Line-at-a-time interpreter session for the interactive front-end.

use crate::{error::ParseError, interp::Interp, io::HostIo, parse, value::Value};

/// Outcome of evaluating one REPL line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplOutcome {
    /// The line's final statement produced a value worth echoing.
    Value(String),
    /// The line evaluated to null; nothing to echo.
    Quiet,
    /// Parse or runtime failure, already formatted for display.
    Error(String),
}

/// An interactive session: a persistent interpreter whose global environment
/// and module cache survive across lines.
pub struct Repl {
    interp: Interp,
}

impl Repl {
    #[must_use]
    pub fn new() -> Self {
        Self { interp: Interp::new() }
    }

    #[must_use]
    pub fn with_io(io: Box<dyn HostIo>) -> Self {
        Self {
            interp: Interp::with_io(io),
        }
    }

    /// Parses and evaluates one input line in the persistent global
    /// environment.
    pub fn eval_line(&mut self, src: &str) -> ReplOutcome {
        let program = match parse::parse(src) {
            Ok(program) => program,
            Err(error) => return ReplOutcome::Error(parse_error_line(&error)),
        };
        match self.interp.run(&program) {
            Ok(Value::Null) => ReplOutcome::Quiet,
            Ok(value) => ReplOutcome::Value(value.to_string()),
            Err(error) => ReplOutcome::Error(error.to_string()),
        }
    }
}

impl Default for Repl {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_error_line(error: &ParseError) -> String {
    format!("Parse error: {error}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_state_persists_across_lines() {
        let mut repl = Repl::new();
        assert_eq!(repl.eval_line("var x = 20"), ReplOutcome::Quiet);
        assert_eq!(repl.eval_line("x + 1"), ReplOutcome::Value("21".to_owned()));
    }

    #[test]
    fn errors_do_not_kill_the_session() {
        let mut repl = Repl::new();
        assert!(matches!(repl.eval_line("nope"), ReplOutcome::Error(_)));
        assert_eq!(repl.eval_line("1 + 1"), ReplOutcome::Value("2".to_owned()));
    }
}
