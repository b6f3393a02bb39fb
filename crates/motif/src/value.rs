use std::{cell::RefCell, fmt, rc::Rc};

use crate::{ast::FnDecl, builtins::Builtin, env::Env};

/// A runtime value.
///
/// Compound values are reference-counted handles; cloning a `Value` is always
/// cheap and shares the underlying object. Tuple elements and pattern-instance
/// fields sit behind `RefCell` so member and index assignment can store
/// through a shared handle.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Rc<str>),
    Tuple(Rc<Tuple>),
    /// Tagged single-value wrapper. Reserved; nothing constructs these yet.
    Variant(Rc<Variant>),
    Function(Rc<Function>),
    Builtin(Builtin),
    PatInst(Rc<PatInstance>),
    /// A first-class scope carrying its environment.
    Scope(Rc<Env>),
    Module(Rc<Module>),
    Type(Rc<TypeValue>),
    /// Two-state optional wrapper; absent optionals are falsy.
    Optional(Rc<OptionalValue>),
}

/// An ordered tuple, optionally with per-element field names.
///
/// When `names` is present it is parallel to the element vector; positional
/// elements keep a `None` slot.
#[derive(Debug)]
pub struct Tuple {
    pub elems: RefCell<Vec<Value>>,
    pub names: Option<Vec<Option<Rc<str>>>>,
}

impl Tuple {
    #[must_use]
    pub fn new(elems: Vec<Value>, names: Option<Vec<Option<Rc<str>>>>) -> Self {
        Self {
            elems: RefCell::new(elems),
            names,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elems.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elems.borrow().is_empty()
    }

    /// Looks an element up by field name.
    #[must_use]
    pub fn get_named(&self, name: &str) -> Option<Value> {
        let names = self.names.as_ref()?;
        let index = names.iter().position(|n| n.as_deref() == Some(name))?;
        self.elems.borrow().get(index).cloned()
    }
}

/// Reserved tagged wrapper.
#[derive(Debug)]
pub struct Variant {
    pub tag: i32,
    pub value: Value,
}

/// A user function: shared declaration, capturing environment, and name.
#[derive(Debug)]
pub struct Function {
    pub decl: Rc<FnDecl>,
    pub closure: Rc<Env>,
    pub name: Rc<str>,
}

/// A pattern (record type) definition: field names in declaration order plus
/// the environment its methods close over. Shared by every instance; the
/// definition outlives them all.
#[derive(Debug)]
pub struct PatDef {
    pub name: Rc<str>,
    pub fields: Vec<Rc<str>>,
    pub methods: Option<Rc<Env>>,
}

impl PatDef {
    #[must_use]
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| &**field == name)
    }
}

/// A value constructed by calling a pattern. The field vector always has the
/// definition's field count; unsupplied fields hold null.
#[derive(Debug)]
pub struct PatInstance {
    pub def: Rc<PatDef>,
    pub fields: RefCell<Vec<Value>>,
}

/// A module: loaded from a file, or synthesized by a `pat` declaration (in
/// which case `pat` carries the constructor's definition).
#[derive(Debug)]
pub struct Module {
    pub name: Rc<str>,
    pub env: Rc<Env>,
    pub pat: Option<Rc<PatDef>>,
}

/// A reflective type value, usable as a conversion callable.
#[derive(Debug)]
pub struct TypeValue {
    pub name: Rc<str>,
    pub pat: Option<Rc<PatDef>>,
}

/// Present-or-absent wrapper.
#[derive(Debug)]
pub struct OptionalValue {
    pub present: bool,
    pub value: Value,
}

impl Value {
    #[must_use]
    pub fn str(text: impl AsRef<str>) -> Self {
        Self::Str(Rc::from(text.as_ref()))
    }

    /// null, false, numeric zero, the empty string, and absent optionals are
    /// falsy; everything else is truthy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Int(i) => *i != 0,
            Self::Float(x) => *x != 0.0,
            Self::Str(s) => !s.is_empty(),
            Self::Optional(opt) => opt.present,
            _ => true,
        }
    }

    /// The value-equality relation behind `==`: structural for scalars and
    /// strings (ints and floats cross-promote), handle identity for compound
    /// values.
    #[must_use]
    pub fn equals(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Int(a), Self::Float(b)) => *a as f64 == *b,
            (Self::Float(a), Self::Int(b)) => *a == *b as f64,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Tuple(a), Self::Tuple(b)) => Rc::ptr_eq(a, b),
            (Self::Variant(a), Self::Variant(b)) => Rc::ptr_eq(a, b),
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            (Self::Builtin(a), Self::Builtin(b)) => a == b,
            (Self::PatInst(a), Self::PatInst(b)) => Rc::ptr_eq(a, b),
            (Self::Scope(a), Self::Scope(b)) => Rc::ptr_eq(a, b),
            (Self::Module(a), Self::Module(b)) => Rc::ptr_eq(a, b),
            (Self::Type(a), Self::Type(b)) => Rc::ptr_eq(a, b),
            (Self::Optional(a), Self::Optional(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Structural deep copy: strings, tuples, pattern instances, and
    /// optionals are cloned recursively; functions, scopes, modules, types,
    /// and builtins copy as fresh handles (environments are identity).
    #[must_use]
    pub fn deep_copy(&self) -> Self {
        match self {
            Self::Str(s) => Self::Str(Rc::from(&**s)),
            Self::Tuple(tuple) => {
                let elems = tuple.elems.borrow().iter().map(Self::deep_copy).collect();
                Self::Tuple(Rc::new(Tuple::new(elems, tuple.names.clone())))
            }
            Self::PatInst(inst) => {
                let fields = inst.fields.borrow().iter().map(Self::deep_copy).collect();
                Self::PatInst(Rc::new(PatInstance {
                    def: Rc::clone(&inst.def),
                    fields: RefCell::new(fields),
                }))
            }
            Self::Optional(opt) => Self::Optional(Rc::new(OptionalValue {
                present: opt.present,
                value: opt.value.deep_copy(),
            })),
            _ => self.clone(),
        }
    }

    /// The kind name `type_of` reports.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::Bool(_) => "bool",
            Self::Tuple(_) => "tuple",
            Self::Variant(_) => "variant",
            Self::Function(_) => "function",
            Self::PatInst(_) => "pat_inst",
            Self::Scope(_) => "scope",
            Self::Builtin(_) => "builtin_fn",
            Self::Optional(_) => "optional",
            Self::Type(_) => "type",
            Self::Module(_) => "module",
        }
    }

    /// A type value reflecting this value's runtime type; pattern instances
    /// carry their definition through.
    #[must_use]
    pub fn reflect_type(&self) -> Self {
        let plain = |name: &str| {
            Self::Type(Rc::new(TypeValue {
                name: Rc::from(name),
                pat: None,
            }))
        };
        match self {
            Self::Null => plain("null"),
            Self::Int(_) => plain("i64"),
            Self::Float(_) => plain("f64"),
            Self::Str(_) => plain("string"),
            Self::Bool(_) => plain("bool"),
            Self::Tuple(_) => plain("tuple"),
            Self::Variant(_) => plain("variant"),
            Self::Scope(_) => plain("scope"),
            Self::Optional(_) => plain("optional"),
            Self::Type(_) => plain("type"),
            Self::Builtin(_) => plain("function"),
            Self::Function(function) => Self::Type(Rc::new(TypeValue {
                name: Rc::clone(&function.name),
                pat: None,
            })),
            Self::PatInst(inst) => Self::Type(Rc::new(TypeValue {
                name: Rc::clone(&inst.def.name),
                pat: Some(Rc::clone(&inst.def)),
            })),
            Self::Module(module) => Self::Type(Rc::new(TypeValue {
                name: Rc::clone(&module.name),
                pat: None,
            })),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => f.write_str(if *b { "true" } else { "false" }),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => {
                let mut buffer = ryu::Buffer::new();
                f.write_str(buffer.format(*x))
            }
            Self::Str(s) => f.write_str(s),
            Self::Tuple(tuple) => {
                f.write_str("(")?;
                let elems = tuple.elems.borrow();
                for (i, elem) in elems.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    if let Some(Some(name)) = tuple.names.as_ref().and_then(|names| names.get(i)) {
                        write!(f, "{name}: ")?;
                    }
                    write!(f, "{elem}")?;
                }
                f.write_str(")")
            }
            Self::Variant(variant) => write!(f, "variant({}, {})", variant.tag, variant.value),
            Self::Function(function) => write!(f, "<fn:{}>", function.name),
            Self::Builtin(builtin) => write!(f, "<builtin:{builtin}>"),
            Self::PatInst(inst) => {
                write!(f, "{}{{", inst.def.name)?;
                let fields = inst.fields.borrow();
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    if let Some(name) = inst.def.fields.get(i) {
                        write!(f, "{name}: ")?;
                    }
                    write!(f, "{field}")?;
                }
                f.write_str("}")
            }
            Self::Scope(_) => f.write_str("<scope>"),
            Self::Module(module) => write!(f, "<module:{}>", module.name),
            Self::Type(ty) => write!(f, "<type:{}>", ty.name),
            Self::Optional(opt) => {
                if opt.present {
                    write!(f, "some({})", opt.value)
                } else {
                    f.write_str("none")
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(!Value::Int(0).is_truthy());
        assert!(!Value::Float(0.0).is_truthy());
        assert!(!Value::str("").is_truthy());
        assert!(Value::Int(-1).is_truthy());
        assert!(Value::str("x").is_truthy());
        assert!(Value::Tuple(Rc::new(Tuple::new(vec![], None))).is_truthy());
    }

    #[test]
    fn equality_promotes_numbers_and_uses_identity_for_tuples() {
        assert!(Value::Int(2).equals(&Value::Float(2.0)));
        assert!(!Value::Int(2).equals(&Value::str("2")));

        let tuple = Value::Tuple(Rc::new(Tuple::new(vec![Value::Int(1)], None)));
        assert!(tuple.equals(&tuple.clone()));
        let other = Value::Tuple(Rc::new(Tuple::new(vec![Value::Int(1)], None)));
        assert!(!tuple.equals(&other));
    }

    #[test]
    fn deep_copy_detaches_tuples() {
        let tuple = Rc::new(Tuple::new(vec![Value::Int(1), Value::Int(2)], None));
        let original = Value::Tuple(Rc::clone(&tuple));
        let copied = original.deep_copy();
        tuple.elems.borrow_mut()[0] = Value::Int(99);
        if let Value::Tuple(copy) = copied {
            assert!(matches!(copy.elems.borrow()[0], Value::Int(1)));
        } else {
            panic!("copy changed kind");
        }
    }

    #[test]
    fn rendering() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::Float(3.0).to_string(), "3.0");
        let tuple = Value::Tuple(Rc::new(Tuple::new(
            vec![Value::Int(1), Value::str("x")],
            Some(vec![Some(Rc::from("a")), None]),
        )));
        assert_eq!(tuple.to_string(), "(a: 1, x)");
    }
}
