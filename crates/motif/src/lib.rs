//! Motif: a tree-walking interpreter for a small expression-oriented
//! language with user-defined record types ("patterns"), first-class tuples
//! with optional field names, an `import … of … as …` module system, and
//! `yield` as a loop-accumulator mechanism.
//!
//! The pipeline is source text → [`lex::Lexer`] → [`parse::parse`] →
//! [`interp::Interp`], which walks the tree against chained
//! reference-counted environments and produces [`value::Value`]s. Output and
//! diagnostics go through the [`io::HostIo`] seam so hosts (and tests) can
//! capture them.
//!
//! ```
//! use motif::{CollectIo, Interp, parse};
//!
//! let io = CollectIo::default();
//! let mut interp = Interp::with_io(Box::new(io.clone()));
//! let program = parse("println(1 + 2 * 3)").unwrap();
//! interp.run(&program).unwrap();
//! assert_eq!(io.stdout(), "7\n");
//! ```

pub mod ast;
pub mod builtins;
pub mod env;
pub mod error;
pub mod interp;
pub mod io;
pub mod lex;
pub mod modules;
pub mod parse;
pub mod repl;
pub mod value;

pub use crate::{
    builtins::Builtin,
    env::Env,
    error::{EvalResult, Flow, ParseError, RunError, RunResult},
    interp::Interp,
    io::{CollectIo, HostIo, StdIo},
    lex::{Lexer, Token, TokenKind},
    parse::parse,
    repl::{Repl, ReplOutcome},
    value::Value,
};
