//! Builtin functions registered into the global environment at start-up.
//!
//! Each builtin is a variant of [`Builtin`]; calling dispatches through
//! [`Builtin::call`] to the grouped implementations in the submodules.
//! Builtins never raise: a bad argument reports on the host error sink and
//! the call evaluates to null (`assert` is the exception — it terminates the
//! process).

mod convert;
mod math;
mod print;
mod strings;

use strum::{Display, EnumIter, IntoEnumIterator as _, IntoStaticStr};

pub(crate) use convert::{float_prefix, int_prefix};

use crate::{env::Env, io::HostIo, value::Value};

/// Enumerates every builtin function.
///
/// The strum derives give each variant its registered name (`IsNull` →
/// `is_null`, `TypeOf` → `type_of`, …).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Builtin {
    Print,
    Println,
    Input,
    Int,
    Float,
    String,
    Bool,
    IsNull,
    IsInt,
    IsFloat,
    IsString,
    TypeOf,
    Type,
    Abs,
    Sqrt,
    Pow,
    Floor,
    Ceil,
    Min,
    Max,
    Len,
    Substr,
    Concat,
    Assert,
}

impl Builtin {
    /// The name this builtin is registered under.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Calls this builtin with an already-evaluated argument vector.
    pub fn call(self, args: &[Value], io: &mut dyn HostIo) -> Value {
        match self {
            Self::Print | Self::Println => print::print(args, io),
            Self::Input => print::input(args, io),
            Self::Int => convert::int(args, io),
            Self::Float => convert::float(args, io),
            Self::String => convert::string(args, io),
            Self::Bool => convert::bool_of(args, io),
            Self::IsNull => convert::is_null(args, io),
            Self::IsInt => convert::is_int(args, io),
            Self::IsFloat => convert::is_float(args, io),
            Self::IsString => convert::is_string(args, io),
            Self::TypeOf => convert::type_of(args, io),
            Self::Type => convert::type_value(args, io),
            Self::Abs => math::abs(args, io),
            Self::Sqrt => math::sqrt(args, io),
            Self::Pow => math::pow(args, io),
            Self::Floor => math::floor(args, io),
            Self::Ceil => math::ceil(args, io),
            Self::Min => math::min(args, io),
            Self::Max => math::max(args, io),
            Self::Len => strings::len(args, io),
            Self::Substr => strings::substr(args, io),
            Self::Concat => strings::concat(args, io),
            Self::Assert => assert_builtin(args, io),
        }
    }
}

/// Installs every builtin into `env`.
pub fn register(env: &Env) {
    for builtin in Builtin::iter() {
        env.define(builtin.name(), Value::Builtin(builtin));
    }
}

/// Reports an arity shortfall on the host error sink. The caller returns null
/// when this is false.
fn arity_ok(args: &[Value], expected: usize, name: &str, io: &mut dyn HostIo) -> bool {
    if args.len() < expected {
        io.stderr_line(&format!(
            "builtin {name}: expected {expected} args, got {}",
            args.len()
        ));
        return false;
    }
    true
}

/// `assert(cond[, message])` — terminates the process with exit code 1 when
/// the condition is falsy.
fn assert_builtin(args: &[Value], io: &mut dyn HostIo) -> Value {
    if !arity_ok(args, 1, "assert", io) {
        return Value::Null;
    }
    if !args[0].is_truthy() {
        if let Some(Value::Str(message)) = args.get(1) {
            io.stderr_line(&format!("Assertion failed: {message}"));
        } else {
            io.stderr_line("Assertion failed");
        }
        std::process::exit(1);
    }
    Value::Null
}
