//! Shared test scaffolding for the integration suites.

use std::cell::Cell;
use std::rc::Rc;

use birch::{eval_source, Result, Scope, Value, ViewModel};

/// A view-model with no methods of its own: bare identifiers and
/// implicit-receiver calls fail with `NameError`/`NoMethodError` unless
/// they resolve as locals or built-in methods.
#[derive(Debug)]
pub struct NoHost;

impl ViewModel for NoHost {
    fn call(&self, _name: &str, _args: &[Value]) -> Option<Result<Value>> {
        None
    }
}

/// A view-model exposing a handful of named values as zero-arg methods,
/// the way a host template's data context would (`items`, `name`, ...).
#[derive(Debug)]
pub struct Fields(pub Vec<(&'static str, Value)>);

impl ViewModel for Fields {
    fn call(&self, name: &str, _args: &[Value]) -> Option<Result<Value>> {
        self.0.iter().find(|(n, _)| *n == name).map(|(_, v)| Ok(v.clone()))
    }
}

pub fn eval(src: &str) -> Result<Value> {
    let scope = Scope::new(Rc::new(NoHost));
    eval_source(src, &scope)
}

pub fn eval_ok(src: &str) -> Value {
    eval(src).unwrap_or_else(|e| panic!("eval({src:?}) failed: {e}"))
}

pub fn eval_with(fields: Vec<(&'static str, Value)>, src: &str) -> Result<Value> {
    let scope = Scope::new(Rc::new(Fields(fields)));
    eval_source(src, &scope)
}

/// A view-model exposing a zero-arg `bump` method that records one call
/// per invocation, so a test can assert exactly how many elements an
/// early-terminating combinator actually visited.
#[derive(Debug, Default)]
pub struct CountingHost {
    calls: Cell<i64>,
}

impl CountingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> i64 {
        self.calls.get()
    }
}

impl ViewModel for CountingHost {
    fn call(&self, name: &str, _args: &[Value]) -> Option<Result<Value>> {
        match name {
            "bump" => {
                self.calls.set(self.calls.get() + 1);
                Some(Ok(Value::Boolean(true)))
            }
            _ => None,
        }
    }
}
