//! Tree-walking evaluator.
//!
//! Evaluation is a strict left-to-right, depth-first walk over the AST. Each
//! node produces a [`Flow`]: the computed value, or a `return`/`break`/`yield`
//! signal for an enclosing frame to consume. Runtime errors travel as the
//! `Err` arm and carry the offending node's position.

use std::{cell::RefCell, path::PathBuf, rc::Rc};

use smallvec::SmallVec;

use crate::{
    ast::{Ast, AstKind, BinOp, CodeLoc, ImportItem, SwitchCase, TupleItem, UnOp},
    builtins::{self, float_prefix, int_prefix},
    env::Env,
    error::{EvalResult, Flow, RunError, RunResult},
    io::{HostIo, StdIo},
    modules::{CacheEntry, ModuleCache, module_name},
    parse,
    value::{Function, Module, PatDef, PatInstance, Tuple, TypeValue, Value},
};

/// Unwraps a normal evaluation result; any signal returns from the enclosing
/// frame untouched.
macro_rules! propagate {
    ($result:expr) => {
        match $result? {
            Flow::Normal(value) => value,
            other => return Ok(other),
        }
    };
}

/// The interpreter: global environment, module cache, and host I/O.
pub struct Interp {
    global: Rc<Env>,
    modules: ModuleCache,
    io: Box<dyn HostIo>,
}

impl Interp {
    /// An interpreter bound to the process streams, with every builtin
    /// registered in the global environment.
    #[must_use]
    pub fn new() -> Self {
        Self::with_io(Box::new(StdIo))
    }

    /// An interpreter writing through the given host I/O implementation.
    #[must_use]
    pub fn with_io(io: Box<dyn HostIo>) -> Self {
        let global = Env::root();
        builtins::register(&global);
        Self {
            global,
            modules: ModuleCache::new(),
            io,
        }
    }

    /// The global environment (builtins plus top-level definitions).
    #[must_use]
    pub fn global(&self) -> &Rc<Env> {
        &self.global
    }

    /// Changes the directory dotted imports resolve against. Defaults to the
    /// current working directory.
    pub fn set_module_root(&mut self, root: impl Into<PathBuf>) {
        self.modules.set_root(root);
    }

    /// Runs a parsed program in the global environment and returns its value.
    ///
    /// Top-level `return` yields its value as that statement's result and
    /// execution continues; a top-level `break`/`yield` ends the program with
    /// its value.
    pub fn run(&mut self, program: &[Ast]) -> RunResult<Value> {
        let global = Rc::clone(&self.global);
        Ok(self.eval_program(program, &global)?.into_value())
    }

    fn eval_program(&mut self, program: &[Ast], env: &Rc<Env>) -> EvalResult {
        let mut result = Value::Null;
        for stmt in program {
            match self.eval(stmt, env)? {
                Flow::Normal(value) | Flow::Return(value) => result = value,
                stop @ (Flow::Break(_) | Flow::Yield(_)) => return Ok(stop),
            }
        }
        Ok(Flow::Normal(result))
    }

    /// Evaluates a statement sequence; the block's value is the last
    /// statement's value, and any signal stops the block.
    fn eval_block(&mut self, stmts: &[Ast], env: &Rc<Env>) -> EvalResult {
        let mut result = Value::Null;
        for stmt in stmts {
            match self.eval(stmt, env)? {
                Flow::Normal(value) => result = value,
                other => return Ok(other),
            }
        }
        Ok(Flow::Normal(result))
    }

    fn eval(&mut self, node: &Ast, env: &Rc<Env>) -> EvalResult {
        match &node.kind {
            AstKind::Null => Ok(Flow::Normal(Value::Null)),
            AstKind::Int(i) => Ok(Flow::Normal(Value::Int(*i))),
            AstKind::Float(x) => Ok(Flow::Normal(Value::Float(*x))),
            AstKind::Str(s) => Ok(Flow::Normal(Value::Str(Rc::clone(s)))),

            AstKind::Ident(name) => match env.lookup(name) {
                Some(value) => Ok(Flow::Normal(value)),
                None => Err(RunError::new(format!("undefined variable '{name}'"), node.loc)),
            },

            AstKind::Assign { target, value } => self.eval_assign(target, value, env, node.loc),

            AstKind::Unary { op, operand } => {
                let value = propagate!(self.eval(operand, env));
                Ok(Flow::Normal(unary_op(*op, &value, node.loc)?))
            }

            AstKind::Binary { op, lhs, rhs } => {
                // && and || short-circuit; everything else evaluates both sides
                if matches!(op, BinOp::And | BinOp::Or) {
                    let left = propagate!(self.eval(lhs, env));
                    let decided = match op {
                        BinOp::And => !left.is_truthy(),
                        _ => left.is_truthy(),
                    };
                    let result = if decided {
                        matches!(op, BinOp::Or)
                    } else {
                        propagate!(self.eval(rhs, env)).is_truthy()
                    };
                    return Ok(Flow::Normal(Value::Bool(result)));
                }
                let left = propagate!(self.eval(lhs, env));
                let right = propagate!(self.eval(rhs, env));
                Ok(Flow::Normal(binary_op(*op, &left, &right, node.loc)?))
            }

            AstKind::Ternary { cond, then, alt } => {
                let cond_value = propagate!(self.eval(cond, env));
                if cond_value.is_truthy() {
                    self.eval(then, env)
                } else if let Some(alt) = alt {
                    self.eval(alt, env)
                } else {
                    Ok(Flow::Normal(Value::Null))
                }
            }

            AstKind::Copy(operand) => {
                let value = propagate!(self.eval(operand, env));
                Ok(Flow::Normal(value.deep_copy()))
            }
            // `move` has no consumption semantics yet; it evaluates its operand
            AstKind::Move(operand) => self.eval(operand, env),

            AstKind::Member { object, field } => {
                let object_value = propagate!(self.eval(object, env));
                let found = match &object_value {
                    Value::PatInst(inst) => inst
                        .def
                        .field_index(field)
                        .and_then(|i| inst.fields.borrow().get(i).cloned()),
                    Value::Scope(scope) => scope.lookup(field),
                    Value::Module(module) => module.env.lookup(field),
                    Value::Tuple(tuple) => tuple.get_named(field),
                    _ => None,
                };
                match found {
                    Some(value) => Ok(Flow::Normal(value)),
                    None => Err(RunError::new(format!("no member '{field}'"), node.loc)),
                }
            }

            AstKind::Index { object, index } => {
                let object_value = propagate!(self.eval(object, env));
                let index_value = propagate!(self.eval(index, env));
                match (&object_value, &index_value) {
                    (Value::Tuple(tuple), Value::Int(raw)) => {
                        let elems = tuple.elems.borrow();
                        let index = normalize_index(*raw, elems.len())
                            .ok_or_else(|| RunError::new("tuple index out of range", node.loc))?;
                        Ok(Flow::Normal(elems[index].clone()))
                    }
                    _ => Err(RunError::new("index not supported for this type", node.loc)),
                }
            }

            AstKind::Call { callee, args } => {
                let callee_value = propagate!(self.eval(callee, env));
                let mut arg_values: SmallVec<[Value; 4]> = SmallVec::with_capacity(args.len());
                for arg in args {
                    arg_values.push(propagate!(self.eval(arg, env)));
                }
                self.call_value(&callee_value, &arg_values, node.loc)
            }

            AstKind::Tuple(items) => self.eval_tuple(items, env),

            AstKind::Scope(body) => {
                let scope_env = Env::child(env);
                self.eval_block(body, &scope_env)
            }

            AstKind::FnDecl(decl) => {
                let function = Value::Function(Rc::new(Function {
                    decl: Rc::clone(decl),
                    closure: Rc::clone(env),
                    name: Rc::clone(&decl.name),
                }));
                env.define(&decl.name, function);
                Ok(Flow::Normal(Value::Null))
            }

            AstKind::VarDecl { name, init, .. } => {
                let value = match init {
                    Some(expr) => propagate!(self.eval(expr, env)),
                    None => Value::Null,
                };
                env.define(name, value);
                Ok(Flow::Normal(Value::Null))
            }

            AstKind::PatDecl { name, body, .. } => {
                declare_pattern(name, body, env);
                Ok(Flow::Normal(Value::Null))
            }

            AstKind::Import { path, alias, items } => {
                self.resolve_import(path, alias.as_deref(), items, env);
                Ok(Flow::Normal(Value::Null))
            }

            AstKind::For { var, iterable, body } => self.eval_for(var, iterable, body, env),

            AstKind::While { pre, body, post } => {
                let mut result = Value::Null;
                loop {
                    if let Some(cond) = pre {
                        if !propagate!(self.eval(cond, env)).is_truthy() {
                            break;
                        }
                    }
                    let loop_env = Env::child(env);
                    match self.eval_block(body, &loop_env)? {
                        Flow::Break(_) => break,
                        Flow::Yield(value) => {
                            // a yielding iteration skips the trailing check
                            result = value;
                            continue;
                        }
                        Flow::Return(value) => return Ok(Flow::Return(value)),
                        Flow::Normal(_) => {}
                    }
                    if let Some(cond) = post {
                        if !propagate!(self.eval(cond, env)).is_truthy() {
                            break;
                        }
                    }
                }
                Ok(Flow::Normal(result))
            }

            AstKind::Switch { selector, cases } => self.eval_switch(selector, cases, env),

            AstKind::Break => Ok(Flow::Break(Value::Null)),
            AstKind::Yield(value) => {
                let value = match value {
                    Some(expr) => propagate!(self.eval(expr, env)),
                    None => Value::Null,
                };
                Ok(Flow::Yield(value))
            }
            AstKind::Return(value) => {
                let value = match value {
                    Some(expr) => propagate!(self.eval(expr, env)),
                    None => Value::Null,
                };
                Ok(Flow::Return(value))
            }

            // Template arguments are erased at runtime: the argument list acts
            // as a type annotation in value position. A name bound in the
            // environment wins; otherwise a fresh type value carries the name.
            AstKind::TemplateInst { base: _, args } => {
                if let Some(ty_name) = args.first().and_then(|ann| ann.ty.as_ref()) {
                    if let Some(value) = env.lookup(ty_name) {
                        return Ok(Flow::Normal(value));
                    }
                    return Ok(Flow::Normal(Value::Type(Rc::new(TypeValue {
                        name: Rc::clone(ty_name),
                        pat: None,
                    }))));
                }
                Ok(Flow::Normal(Value::Null))
            }
        }
    }

    fn eval_assign(&mut self, target: &Ast, value: &Ast, env: &Rc<Env>, loc: CodeLoc) -> EvalResult {
        let rhs = propagate!(self.eval(value, env));
        match &target.kind {
            AstKind::Ident(name) => {
                env.assign(name, rhs.clone());
                Ok(Flow::Normal(rhs))
            }
            AstKind::Member { object, field } => {
                let object_value = propagate!(self.eval(object, env));
                match &object_value {
                    Value::PatInst(inst) => {
                        if let Some(index) = inst.def.field_index(field) {
                            inst.fields.borrow_mut()[index] = rhs.clone();
                            return Ok(Flow::Normal(rhs));
                        }
                        Err(RunError::new("cannot assign to member", target.loc))
                    }
                    Value::Scope(scope) => {
                        scope.assign(field, rhs.clone());
                        Ok(Flow::Normal(rhs))
                    }
                    Value::Module(module) => {
                        module.env.assign(field, rhs.clone());
                        Ok(Flow::Normal(rhs))
                    }
                    _ => Err(RunError::new("cannot assign to member", target.loc)),
                }
            }
            AstKind::Index { object, index } => {
                let object_value = propagate!(self.eval(object, env));
                let index_value = propagate!(self.eval(index, env));
                match (&object_value, &index_value) {
                    (Value::Tuple(tuple), Value::Int(raw)) => {
                        let mut elems = tuple.elems.borrow_mut();
                        let index = normalize_index(*raw, elems.len())
                            .ok_or_else(|| RunError::new("tuple index out of range", target.loc))?;
                        elems[index] = rhs.clone();
                        drop(elems);
                        Ok(Flow::Normal(rhs))
                    }
                    _ => Err(RunError::new("index not supported for this type", target.loc)),
                }
            }
            _ => Err(RunError::new("invalid assignment target", loc)),
        }
    }

    fn eval_tuple(&mut self, items: &[TupleItem], env: &Rc<Env>) -> EvalResult {
        let mut elems = Vec::with_capacity(items.len());
        let mut names: Vec<Option<Rc<str>>> = Vec::with_capacity(items.len());
        let mut any_named = false;
        for item in items {
            // `name = expr` inside a tuple literal is a named element, not an
            // assignment
            let (name, value) = if let Some(name) = &item.name {
                (Some(Rc::clone(name)), propagate!(self.eval(&item.value, env)))
            } else if let AstKind::Assign { target, value } = &item.value.kind {
                if let AstKind::Ident(name) = &target.kind {
                    (Some(Rc::clone(name)), propagate!(self.eval(value, env)))
                } else {
                    (None, propagate!(self.eval(&item.value, env)))
                }
            } else {
                (None, propagate!(self.eval(&item.value, env)))
            };
            any_named = any_named || name.is_some();
            names.push(name);
            elems.push(value);
        }
        let names = if any_named { Some(names) } else { None };
        Ok(Flow::Normal(Value::Tuple(Rc::new(Tuple::new(elems, names)))))
    }

    fn eval_for(&mut self, var: &str, iterable: &Ast, body: &[Ast], env: &Rc<Env>) -> EvalResult {
        let iterable_value = propagate!(self.eval(iterable, env));
        let mut result = Value::Null;
        match &iterable_value {
            Value::Tuple(tuple) => {
                let len = tuple.len();
                for i in 0..len {
                    let Some(item) = tuple.elems.borrow().get(i).cloned() else {
                        break;
                    };
                    let loop_env = Env::child(env);
                    loop_env.define(var, item);
                    match self.eval_block(body, &loop_env)? {
                        Flow::Break(_) => break,
                        Flow::Yield(value) => result = value,
                        Flow::Return(value) => return Ok(Flow::Return(value)),
                        Flow::Normal(_) => {}
                    }
                }
            }
            Value::Int(n) => {
                for i in 0..*n {
                    let loop_env = Env::child(env);
                    loop_env.define(var, Value::Int(i));
                    match self.eval_block(body, &loop_env)? {
                        Flow::Break(_) => break,
                        Flow::Yield(value) => result = value,
                        Flow::Return(value) => return Ok(Flow::Return(value)),
                        Flow::Normal(_) => {}
                    }
                }
            }
            // non-iterable: zero iterations
            _ => {}
        }
        Ok(Flow::Normal(result))
    }

    fn eval_switch(&mut self, selector: &Ast, cases: &[SwitchCase], env: &Rc<Env>) -> EvalResult {
        let selector_value = propagate!(self.eval(selector, env));
        let mut result = Value::Null;
        for case in cases {
            let matched = match &case.test {
                None => true,
                Some(test) => {
                    let test_value = propagate!(self.eval(test, env));
                    selector_value.equals(&test_value)
                }
            };
            if matched {
                let case_env = Env::child(env);
                match self.eval_block(&case.body, &case_env)? {
                    Flow::Normal(value) | Flow::Break(value) => result = value,
                    other => return Ok(other),
                }
                break;
            }
        }
        Ok(Flow::Normal(result))
    }

    fn call_value(&mut self, callee: &Value, args: &[Value], loc: CodeLoc) -> EvalResult {
        match callee {
            Value::Builtin(builtin) => Ok(Flow::Normal(builtin.call(args, self.io.as_mut()))),

            Value::Function(function) => {
                let call_env = Env::child(&function.closure);
                for (i, param) in function.decl.params.iter().enumerate() {
                    // missing arguments bind null; extras are dropped
                    let value = args.get(i).cloned().unwrap_or(Value::Null);
                    call_env.define(param.name.as_deref().unwrap_or("_"), value);
                }
                match self.eval_block(&function.decl.body, &call_env)? {
                    Flow::Return(value) | Flow::Normal(value) => Ok(Flow::Normal(value)),
                    other => Ok(other),
                }
            }

            Value::Module(module) => match &module.pat {
                Some(def) => {
                    let fields = (0..def.fields.len())
                        .map(|i| args.get(i).cloned().unwrap_or(Value::Null))
                        .collect();
                    Ok(Flow::Normal(Value::PatInst(Rc::new(PatInstance {
                        def: Rc::clone(def),
                        fields: RefCell::new(fields),
                    }))))
                }
                None => Err(RunError::new("not a callable value", loc)),
            },

            Value::Type(ty) => Ok(Flow::Normal(convert_call(&ty.name, args))),

            _ => Err(RunError::new("not a callable value", loc)),
        }
    }

    // ------------------------------------------------------------- modules

    fn resolve_import(&mut self, dotted: &str, alias: Option<&str>, items: &[ImportItem], env: &Rc<Env>) {
        let path = self.modules.resolve(dotted);
        let module = self.load_module(&path);
        if items.is_empty() {
            let last_segment = dotted.rsplit('.').next().unwrap_or(dotted);
            env.define(alias.unwrap_or(last_segment), module);
            return;
        }
        if let Value::Module(loaded) = &module {
            for item in items {
                if let Some(value) = loaded.env.lookup(&item.name) {
                    env.define(item.alias.as_deref().unwrap_or(&item.name), value);
                }
            }
        }
    }

    /// Loads a module by file path: cache hit returns the shared module,
    /// otherwise the file is read, parsed, and evaluated in a fresh child of
    /// the global environment. Failures are reported on the host error sink
    /// and substituted with null.
    fn load_module(&mut self, path: &str) -> Value {
        match self.modules.get(path) {
            Some(CacheEntry::Loaded(module)) => return module,
            Some(CacheEntry::Loading) => {
                self.io.stderr_line(&format!("Circular import of module {path}"));
                return Value::Null;
            }
            None => {}
        }

        let src = match std::fs::read_to_string(path) {
            Ok(src) => src,
            Err(_) => {
                self.io.stderr_line(&format!("Module not found: {path}"));
                return Value::Null;
            }
        };
        let program = match parse::parse(&src) {
            Ok(program) => program,
            Err(error) => {
                self.io.stderr_line(&format!("Parse error in module {path}: {error}"));
                return Value::Null;
            }
        };

        self.modules.mark_loading(path);
        let module_env = Env::child(&self.global);
        if let Err(error) = self.eval_program(&program, &module_env) {
            self.io.stderr_line(&format!("Runtime error in module {path}: {error}"));
            self.modules.abandon(path);
            return Value::Null;
        }

        let module = Value::Module(Rc::new(Module {
            name: Rc::from(module_name(path).as_str()),
            env: module_env,
            pat: None,
        }));
        self.modules.finish(path, module.clone());
        module
    }
}

impl Default for Interp {
    fn default() -> Self {
        Self::new()
    }
}

/// Declares a pattern: record the field order from the body's variable
/// declarations, then define every method in a parentless environment the
/// methods themselves close over. The result is a module value carrying the
/// pattern definition, bound under the pattern's name.
fn declare_pattern(name: &Rc<str>, body: &[Ast], env: &Rc<Env>) {
    let mut fields = Vec::new();
    for stmt in body {
        if let AstKind::VarDecl { name: field, .. } = &stmt.kind {
            fields.push(Rc::clone(field));
        }
    }

    let pat_env = Env::root();
    pat_env.define("__name__", Value::Str(Rc::clone(name)));
    let def = Rc::new(PatDef {
        name: Rc::clone(name),
        fields,
        methods: Some(Rc::clone(&pat_env)),
    });

    for stmt in body {
        if let AstKind::FnDecl(decl) = &stmt.kind {
            let method = Value::Function(Rc::new(Function {
                decl: Rc::clone(decl),
                closure: Rc::clone(&pat_env),
                name: Rc::clone(&decl.name),
            }));
            pat_env.define(&decl.name, method);
        }
    }

    let module = Value::Module(Rc::new(Module {
        name: Rc::clone(name),
        env: pat_env,
        pat: Some(def),
    }));
    env.define(name, module);
}

/// Arithmetic promotes to float when either side is a float; integers use
/// two's-complement wrapping. Comparisons are numeric-only; `==`/`!=` use the
/// value-equality relation; bitwise operators are integer-only; `+` also
/// concatenates two strings.
fn binary_op(op: BinOp, l: &Value, r: &Value, loc: CodeLoc) -> RunResult<Value> {
    let unsupported = || RunError::new("unsupported binary operation", loc);
    match op {
        BinOp::Add => match (l, r) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_add(*b))),
            (Value::Str(a), Value::Str(b)) => {
                let mut out = String::with_capacity(a.len() + b.len());
                out.push_str(a);
                out.push_str(b);
                Ok(Value::str(out))
            }
            _ => {
                let (a, b) = numeric_pair(l, r).ok_or_else(unsupported)?;
                Ok(Value::Float(a + b))
            }
        },
        BinOp::Sub => match (l, r) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_sub(*b))),
            _ => {
                let (a, b) = numeric_pair(l, r).ok_or_else(unsupported)?;
                Ok(Value::Float(a - b))
            }
        },
        BinOp::Mul => match (l, r) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_mul(*b))),
            _ => {
                let (a, b) = numeric_pair(l, r).ok_or_else(unsupported)?;
                Ok(Value::Float(a * b))
            }
        },
        BinOp::Div => match (l, r) {
            (Value::Int(a), Value::Int(b)) => {
                if *b == 0 {
                    return Err(RunError::new("division by zero", loc));
                }
                Ok(Value::Int(a.wrapping_div(*b)))
            }
            _ => {
                let (a, b) = numeric_pair(l, r).ok_or_else(unsupported)?;
                Ok(Value::Float(a / b))
            }
        },
        BinOp::Rem => match (l, r) {
            (Value::Int(a), Value::Int(b)) => {
                if *b == 0 {
                    return Err(RunError::new("modulo by zero", loc));
                }
                Ok(Value::Int(a.wrapping_rem(*b)))
            }
            // no float modulo
            _ => Err(unsupported()),
        },
        BinOp::Lt | BinOp::Gt | BinOp::Le | BinOp::Ge => {
            let result = match (l, r) {
                (Value::Int(a), Value::Int(b)) => compare(op, *a, *b),
                _ => {
                    let (a, b) = numeric_pair(l, r).ok_or_else(unsupported)?;
                    compare(op, a, b)
                }
            };
            Ok(Value::Bool(result))
        }
        BinOp::Eq => Ok(Value::Bool(l.equals(r))),
        BinOp::Ne => Ok(Value::Bool(!l.equals(r))),
        // eager fallback; the evaluator short-circuits these before calling
        BinOp::And => Ok(Value::Bool(l.is_truthy() && r.is_truthy())),
        BinOp::Or => Ok(Value::Bool(l.is_truthy() || r.is_truthy())),
        BinOp::BitAnd => int_pair(l, r).map(|(a, b)| Value::Int(a & b)).ok_or_else(unsupported),
        BinOp::BitOr => int_pair(l, r).map(|(a, b)| Value::Int(a | b)).ok_or_else(unsupported),
        BinOp::BitXor => int_pair(l, r).map(|(a, b)| Value::Int(a ^ b)).ok_or_else(unsupported),
        BinOp::Shl => int_pair(l, r)
            .map(|(a, b)| Value::Int(a.wrapping_shl(b as u32)))
            .ok_or_else(unsupported),
        BinOp::Shr => int_pair(l, r)
            .map(|(a, b)| Value::Int(a.wrapping_shr(b as u32)))
            .ok_or_else(unsupported),
    }
}

fn unary_op(op: UnOp, value: &Value, loc: CodeLoc) -> RunResult<Value> {
    let unsupported = || RunError::new("unsupported unary op", loc);
    match op {
        UnOp::Neg => match value {
            Value::Int(i) => Ok(Value::Int(i.wrapping_neg())),
            Value::Float(x) => Ok(Value::Float(-x)),
            _ => Err(unsupported()),
        },
        UnOp::Not => Ok(Value::Bool(!value.is_truthy())),
        UnOp::BitNot => match value {
            Value::Int(i) => Ok(Value::Int(!i)),
            _ => Err(unsupported()),
        },
    }
}

fn numeric_pair(l: &Value, r: &Value) -> Option<(f64, f64)> {
    let as_f64 = |value: &Value| match value {
        Value::Int(i) => Some(*i as f64),
        Value::Float(x) => Some(*x),
        _ => None,
    };
    Some((as_f64(l)?, as_f64(r)?))
}

fn int_pair(l: &Value, r: &Value) -> Option<(i64, i64)> {
    match (l, r) {
        (Value::Int(a), Value::Int(b)) => Some((*a, *b)),
        _ => None,
    }
}

fn compare<T: PartialOrd>(op: BinOp, a: T, b: T) -> bool {
    match op {
        BinOp::Lt => a < b,
        BinOp::Gt => a > b,
        BinOp::Le => a <= b,
        _ => a >= b,
    }
}

/// Negative indices count from the end; `None` means out of range.
fn normalize_index(raw: i64, len: usize) -> Option<usize> {
    let len = len as i64;
    let index = if raw < 0 { raw + len } else { raw };
    if index < 0 || index >= len {
        return None;
    }
    Some(index as usize)
}

/// Calling a type value performs a one-argument conversion dispatched on the
/// type name's first character (`i*`/`u*` → integer, `f*` → float, `string` →
/// string form). Anything else evaluates to null.
fn convert_call(type_name: &str, args: &[Value]) -> Value {
    if args.len() != 1 {
        return Value::Null;
    }
    let arg = &args[0];
    match type_name.as_bytes().first().copied() {
        Some(b'i' | b'u') => match arg {
            Value::Int(i) => Value::Int(*i),
            Value::Float(x) => Value::Int(*x as i64),
            Value::Str(s) => Value::Int(int_prefix(s)),
            _ => Value::Null,
        },
        Some(b'f') => match arg {
            Value::Float(x) => Value::Float(*x),
            Value::Int(i) => Value::Float(*i as f64),
            Value::Str(s) => Value::Float(float_prefix(s)),
            _ => Value::Null,
        },
        _ if type_name == "string" => Value::str(arg.to_string()),
        _ => Value::Null,
    }
}
