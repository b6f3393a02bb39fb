//! String and tuple length/slice builtins.

use super::arity_ok;
use crate::{io::HostIo, value::Value};

/// Byte length of a string, or element count of a tuple.
pub(super) fn len(args: &[Value], io: &mut dyn HostIo) -> Value {
    if !arity_ok(args, 1, "len", io) {
        return Value::Null;
    }
    match &args[0] {
        Value::Str(s) => Value::Int(s.len() as i64),
        Value::Tuple(tuple) => Value::Int(tuple.len() as i64),
        _ => Value::Null,
    }
}

/// `substr(s, start, length)` — byte slice with saturating bounds.
pub(super) fn substr(args: &[Value], io: &mut dyn HostIo) -> Value {
    if !arity_ok(args, 3, "substr", io) {
        return Value::Null;
    }
    let (Value::Str(s), Value::Int(start), Value::Int(length)) = (&args[0], &args[1], &args[2]) else {
        return Value::Null;
    };
    let bytes = s.as_bytes();
    let total = bytes.len() as i64;
    let start = (*start).clamp(0, total);
    let length = (*length).max(0).min(total - start);
    let slice = &bytes[start as usize..(start + length) as usize];
    Value::str(String::from_utf8_lossy(slice))
}

/// Concatenation of every string argument; non-strings are skipped.
pub(super) fn concat(args: &[Value], _io: &mut dyn HostIo) -> Value {
    let mut out = String::new();
    for arg in args {
        if let Value::Str(s) = arg {
            out.push_str(s);
        }
    }
    Value::str(out)
}
