//! Numeric builtins.

use super::arity_ok;
use crate::{io::HostIo, value::Value};

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Int(i) => Some(*i as f64),
        Value::Float(x) => Some(*x),
        _ => None,
    }
}

pub(super) fn abs(args: &[Value], io: &mut dyn HostIo) -> Value {
    if !arity_ok(args, 1, "abs", io) {
        return Value::Null;
    }
    match &args[0] {
        Value::Int(i) => Value::Int(i.wrapping_abs()),
        Value::Float(x) => Value::Float(x.abs()),
        _ => Value::Null,
    }
}

pub(super) fn sqrt(args: &[Value], io: &mut dyn HostIo) -> Value {
    if !arity_ok(args, 1, "sqrt", io) {
        return Value::Null;
    }
    match as_f64(&args[0]) {
        Some(x) => Value::Float(x.sqrt()),
        None => Value::Null,
    }
}

pub(super) fn pow(args: &[Value], io: &mut dyn HostIo) -> Value {
    if !arity_ok(args, 2, "pow", io) {
        return Value::Null;
    }
    match (as_f64(&args[0]), as_f64(&args[1])) {
        (Some(base), Some(exp)) => Value::Float(base.powf(exp)),
        _ => Value::Null,
    }
}

pub(super) fn floor(args: &[Value], io: &mut dyn HostIo) -> Value {
    if !arity_ok(args, 1, "floor", io) {
        return Value::Null;
    }
    match as_f64(&args[0]) {
        Some(x) => Value::Int(x.floor() as i64),
        None => Value::Null,
    }
}

pub(super) fn ceil(args: &[Value], io: &mut dyn HostIo) -> Value {
    if !arity_ok(args, 1, "ceil", io) {
        return Value::Null;
    }
    match as_f64(&args[0]) {
        Some(x) => Value::Int(x.ceil() as i64),
        None => Value::Null,
    }
}

pub(super) fn min(args: &[Value], io: &mut dyn HostIo) -> Value {
    if !arity_ok(args, 2, "min", io) {
        return Value::Null;
    }
    if let (Value::Int(a), Value::Int(b)) = (&args[0], &args[1]) {
        return Value::Int(*a.min(b));
    }
    match (as_f64(&args[0]), as_f64(&args[1])) {
        (Some(a), Some(b)) => Value::Float(if a < b { a } else { b }),
        _ => Value::Null,
    }
}

pub(super) fn max(args: &[Value], io: &mut dyn HostIo) -> Value {
    if !arity_ok(args, 2, "max", io) {
        return Value::Null;
    }
    if let (Value::Int(a), Value::Int(b)) = (&args[0], &args[1]) {
        return Value::Int(*a.max(b));
    }
    match (as_f64(&args[0]), as_f64(&args[1])) {
        (Some(a), Some(b)) => Value::Float(if a > b { a } else { b }),
        _ => Value::Null,
    }
}
