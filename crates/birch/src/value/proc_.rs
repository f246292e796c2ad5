//! Procs: closures over a captured `Scope`.
//!
//! Modeled after `crates/monty/src/function.rs`/`callable.rs`'s split,
//! shrunk to fit a tree-walking evaluator: no bytecode (`Function::code`),
//! no cell variables or slot layout — a `Proc`'s body is just the AST node
//! it closed over, evaluated directly against a child of its capture scope.

use std::rc::Rc;

use crate::ast::Node;
use crate::intern::Symbol;
use crate::scope::Scope;

pub struct ProcValue {
    pub params: Vec<Symbol>,
    pub body: Rc<Node>,
    /// The scope the proc closed over. Outlives the `Proc` itself by
    /// shared ownership.
    pub capture_scope: Scope,
}

impl std::fmt::Debug for ProcValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#<Proc arity={}>", self.params.len())
    }
}

impl ProcValue {
    pub fn new(params: Vec<Symbol>, body: Rc<Node>, capture_scope: Scope) -> Self {
        Self {
            params,
            body,
            capture_scope,
        }
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }
}
