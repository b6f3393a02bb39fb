use std::{cell::RefCell, fmt, rc::Rc};

use ahash::AHashMap;

use crate::value::Value;

/// One lexical scope: a table of bindings plus a handle to the parent scope.
///
/// Environments are reference-counted; a child keeps its parent alive, and
/// function values keep their capturing environment alive through the same
/// handle. Release is deterministic at the last handle drop.
pub struct Env {
    parent: Option<Rc<Env>>,
    bindings: RefCell<AHashMap<Rc<str>, Value>>,
}

impl Env {
    /// Creates a parentless scope (the global scope, or a pattern's method
    /// scope).
    #[must_use]
    pub fn root() -> Rc<Self> {
        Rc::new(Self {
            parent: None,
            bindings: RefCell::new(AHashMap::new()),
        })
    }

    /// Creates a child scope of `parent`.
    #[must_use]
    pub fn child(parent: &Rc<Self>) -> Rc<Self> {
        Rc::new(Self {
            parent: Some(Rc::clone(parent)),
            bindings: RefCell::new(AHashMap::new()),
        })
    }

    /// Walks scopes leaf-to-root and returns the first binding for `name`.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Value> {
        let mut scope = self;
        loop {
            if let Some(value) = scope.bindings.borrow().get(name) {
                return Some(value.clone());
            }
            match &scope.parent {
                Some(parent) => scope = parent.as_ref(),
                None => return None,
            }
        }
    }

    /// Binds `name` in this scope, replacing any existing binding here.
    pub fn define(&self, name: &str, value: Value) {
        self.bindings.borrow_mut().insert(Rc::from(name), value);
    }

    /// Replaces the binding in the nearest scope that defines `name`, or
    /// defines it in this scope when no scope does.
    pub fn assign(&self, name: &str, value: Value) {
        let mut scope = self;
        loop {
            if scope.bindings.borrow().contains_key(name) {
                scope.bindings.borrow_mut().insert(Rc::from(name), value);
                return;
            }
            match &scope.parent {
                Some(parent) => scope = parent.as_ref(),
                None => break,
            }
        }
        self.define(name, value);
    }
}

// Bindings can hold functions whose closures point back at this environment,
// so Debug prints names only.
impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<Rc<str>> = self.bindings.borrow().keys().cloned().collect();
        f.debug_struct("Env")
            .field("names", &names)
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_walks_to_parent() {
        let root = Env::root();
        root.define("x", Value::Int(1));
        let inner = Env::child(&root);
        assert!(matches!(inner.lookup("x"), Some(Value::Int(1))));
        assert!(inner.lookup("y").is_none());
    }

    #[test]
    fn define_shadows_only_current_scope() {
        let root = Env::root();
        root.define("x", Value::Int(1));
        let inner = Env::child(&root);
        inner.define("x", Value::Int(2));
        assert!(matches!(inner.lookup("x"), Some(Value::Int(2))));
        assert!(matches!(root.lookup("x"), Some(Value::Int(1))));
    }

    #[test]
    fn assign_updates_nearest_defining_scope() {
        let root = Env::root();
        root.define("x", Value::Int(1));
        let inner = Env::child(&root);
        inner.assign("x", Value::Int(5));
        assert!(matches!(root.lookup("x"), Some(Value::Int(5))));

        // no defining scope: lands in the current one
        inner.assign("fresh", Value::Int(9));
        assert!(root.lookup("fresh").is_none());
        assert!(matches!(inner.lookup("fresh"), Some(Value::Int(9))));
    }
}
