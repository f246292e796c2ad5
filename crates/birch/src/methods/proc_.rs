//! Proc methods: `call`/`arity`.
//!
//! `call` defers to `crate::eval::call_proc`, the only code that knows how
//! to run a proc's captured body against its captured scope.

use std::sync::OnceLock;

use crate::error::{Error, Result};
use crate::value::Value;

use super::{BlockCaller, MethodTable};

pub(super) fn table() -> &'static MethodTable {
    static TABLE: OnceLock<MethodTable> = OnceLock::new();
    TABLE.get_or_init(build)
}

fn build() -> MethodTable {
    let mut t = MethodTable::new();
    t.register("call", call);
    t.register("arity", arity);
    t
}

fn call(recv: &Value, args: &[Value], _block: Option<&BlockCaller>, depth: usize) -> Result<Value> {
    match recv {
        Value::Proc(p) => crate::eval::call_proc(p, args, depth + 1),
        _ => unreachable!("proc table only dispatched for Value::Proc"),
    }
}

fn arity(recv: &Value, _args: &[Value], _block: Option<&BlockCaller>, _depth: usize) -> Result<Value> {
    match recv {
        Value::Proc(p) => Ok(Value::Number(crate::value::make_number(p.arity() as f64))),
        _ => Err(Error::type_error("not a Proc")),
    }
}
