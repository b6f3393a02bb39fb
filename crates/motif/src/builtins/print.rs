//! `print`, `println`, and `input`.

use std::rc::Rc;

use crate::{io::HostIo, value::Value};

/// Writes the space-separated string forms of the arguments plus a newline.
/// `println` shares this implementation.
pub(super) fn print(args: &[Value], io: &mut dyn HostIo) -> Value {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            io.stdout_push(' ');
        }
        io.stdout_write(&arg.to_string());
    }
    io.stdout_push('\n');
    Value::Null
}

/// Reads one line from standard input, newline stripped. An optional argument
/// is printed first as a prompt. End of input yields the empty string.
pub(super) fn input(args: &[Value], io: &mut dyn HostIo) -> Value {
    if let Some(prompt) = args.first() {
        io.stdout_write(&prompt.to_string());
    }
    match io.stdin_line() {
        Some(line) => Value::str(line.trim_end_matches(['\n', '\r'])),
        None => Value::Str(Rc::from("")),
    }
}
