//! Syntax tree produced by the parser.
//!
//! Nodes are immutable after construction. Function declarations are
//! reference-counted so function values can share their declaration with the
//! tree that produced it; everything else is owned by its parent node.

use std::rc::Rc;

use strum::{Display, IntoStaticStr};

/// A source position (1-based line and column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CodeLoc {
    pub line: u32,
    pub col: u32,
}

/// One syntax node: a kind plus its source position.
#[derive(Debug, Clone)]
pub struct Ast {
    pub loc: CodeLoc,
    pub kind: AstKind,
}

impl Ast {
    #[must_use]
    pub fn new(kind: AstKind, loc: CodeLoc) -> Self {
        Self { loc, kind }
    }
}

/// Binary operators, lowest kinds of precedence handled by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
pub enum BinOp {
    #[strum(serialize = "||")]
    Or,
    #[strum(serialize = "&&")]
    And,
    #[strum(serialize = "|")]
    BitOr,
    #[strum(serialize = "^")]
    BitXor,
    #[strum(serialize = "&")]
    BitAnd,
    #[strum(serialize = "==")]
    Eq,
    #[strum(serialize = "!=")]
    Ne,
    #[strum(serialize = "<")]
    Lt,
    #[strum(serialize = ">")]
    Gt,
    #[strum(serialize = "<=")]
    Le,
    #[strum(serialize = ">=")]
    Ge,
    #[strum(serialize = "<<")]
    Shl,
    #[strum(serialize = ">>")]
    Shr,
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "-")]
    Sub,
    #[strum(serialize = "*")]
    Mul,
    #[strum(serialize = "/")]
    Div,
    #[strum(serialize = "%")]
    Rem,
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum UnOp {
    #[strum(serialize = "-")]
    Neg,
    #[strum(serialize = "!")]
    Not,
    #[strum(serialize = "~")]
    BitNot,
}

/// Attribute keywords accepted after `::`.
///
/// Parsed and retained; attributes do not gate execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Attrs {
    pub is_static: bool,
    pub is_const: bool,
    pub is_constexpr: bool,
}

/// A type annotation: optional result name (`name:type`), type name, and
/// optional template arguments. Annotations are recorded, never checked.
#[derive(Debug, Clone, Default)]
pub struct TypeAnn {
    pub loc: CodeLoc,
    /// Result name for named return slots, e.g. the `r` of `:(r:i32)`.
    pub name: Option<Rc<str>>,
    /// The type name itself; absent when the annotation was empty.
    pub ty: Option<Rc<str>>,
    /// Template arguments of the type, e.g. the `i32` of `vec<i32>`.
    pub args: Option<Vec<Ast>>,
}

/// Return annotation of a function: a single type or a named tuple of types.
#[derive(Debug, Clone)]
pub enum RetAnn {
    Single(TypeAnn),
    Tuple(Vec<TypeAnn>),
}

/// Parameter passing qualifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamQual {
    Copy,
    Move,
}

/// One function parameter.
#[derive(Debug, Clone)]
pub struct Param {
    pub loc: CodeLoc,
    pub name: Option<Rc<str>>,
    pub qualifier: Option<ParamQual>,
    pub type_ann: Option<TypeAnn>,
    pub attrs: Attrs,
    /// Default value expression; parsed and retained, not evaluated at calls.
    pub default: Option<Ast>,
}

/// One template parameter of a `<…>` declaration.
#[derive(Debug, Clone)]
pub struct TemplateParam {
    pub loc: CodeLoc,
    pub name: Rc<str>,
    pub ty: Option<Rc<str>>,
    pub is_variadic: bool,
    pub default: Option<Ast>,
}

/// A `<…>` template parameter list on a declaration.
#[derive(Debug, Clone)]
pub struct TemplateDecl {
    pub loc: CodeLoc,
    pub params: Vec<TemplateParam>,
}

/// A function declaration, shared between the tree and function values.
#[derive(Debug)]
pub struct FnDecl {
    pub loc: CodeLoc,
    /// Identifier or quoted custom-operator name.
    pub name: Rc<str>,
    pub tmpl: Option<TemplateDecl>,
    pub params: Vec<Param>,
    pub ret: Option<RetAnn>,
    pub attrs: Attrs,
    pub is_pub: bool,
    pub body: Vec<Ast>,
}

/// One element of a tuple literal. The parser fills `name` for the
/// `name: expr` form; `name = expr` elements stay plain assignments and are
/// recognized by the evaluator.
#[derive(Debug, Clone)]
pub struct TupleItem {
    pub name: Option<Rc<str>>,
    pub value: Ast,
}

/// One arm of a `switch`; `test` is `None` for `default`.
#[derive(Debug, Clone)]
pub struct SwitchCase {
    pub loc: CodeLoc,
    pub test: Option<Ast>,
    pub body: Vec<Ast>,
}

/// One item of an `import … of …` list.
#[derive(Debug, Clone)]
pub struct ImportItem {
    pub loc: CodeLoc,
    pub name: Rc<str>,
    pub alias: Option<Rc<str>>,
}

/// The kinds of syntax node.
#[derive(Debug, Clone)]
pub enum AstKind {
    // Literals
    Null,
    Int(i64),
    Float(f64),
    Str(Rc<str>),

    Ident(Rc<str>),

    Binary {
        op: BinOp,
        lhs: Box<Ast>,
        rhs: Box<Ast>,
    },
    Unary {
        op: UnOp,
        operand: Box<Ast>,
    },
    Assign {
        target: Box<Ast>,
        value: Box<Ast>,
    },
    /// `cond ? then : alt` — the colon arm is optional.
    Ternary {
        cond: Box<Ast>,
        then: Box<Ast>,
        alt: Option<Box<Ast>>,
    },
    Copy(Box<Ast>),
    Move(Box<Ast>),

    Member {
        object: Box<Ast>,
        field: Rc<str>,
    },
    Index {
        object: Box<Ast>,
        index: Box<Ast>,
    },
    Call {
        callee: Box<Ast>,
        args: Vec<Ast>,
    },
    /// `base<args…>` postfix instantiation, or the bare `<args…>` prefix form
    /// (no base). Template arguments are erased at runtime.
    TemplateInst {
        base: Option<Box<Ast>>,
        args: Vec<TypeAnn>,
    },

    Tuple(Vec<TupleItem>),
    /// Brace-delimited block; evaluates in a fresh child scope.
    Scope(Vec<Ast>),

    FnDecl(Rc<FnDecl>),
    VarDecl {
        name: Rc<str>,
        tmpl: Option<TemplateDecl>,
        type_ann: Option<TypeAnn>,
        attrs: Attrs,
        is_pub: bool,
        init: Option<Box<Ast>>,
    },
    PatDecl {
        name: Rc<str>,
        tmpl: Option<TemplateDecl>,
        bases: Vec<Rc<str>>,
        attrs: Attrs,
        is_pub: bool,
        body: Vec<Ast>,
    },
    Import {
        /// Dotted module path, e.g. `a.b.c`.
        path: Rc<str>,
        alias: Option<Rc<str>>,
        items: Vec<ImportItem>,
    },

    For {
        var: Rc<str>,
        iterable: Box<Ast>,
        body: Vec<Ast>,
    },
    While {
        /// Leading `while (cond)`, checked before each iteration.
        pre: Option<Box<Ast>>,
        body: Vec<Ast>,
        /// Trailing `while (cond)`, checked after each iteration.
        post: Option<Box<Ast>>,
    },
    Switch {
        selector: Box<Ast>,
        cases: Vec<SwitchCase>,
    },

    Break,
    Yield(Option<Box<Ast>>),
    Return(Option<Box<Ast>>),
}
