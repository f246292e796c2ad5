//! The base method table shared by every value, regardless of variant —
//! the last tier dispatch falls back to when nothing more specific matches.
//!
//! Grounded on `crates/monty/src/types/object.rs`'s `BASE_METHODS` table:
//! the handful of operations every object answers to (equality, string
//! conversion) live here once instead of being duplicated per type.

use std::sync::OnceLock;

use crate::error::Result;
use crate::value::Value;

use super::{BlockCaller, MethodTable};

pub(super) fn table() -> &'static MethodTable {
    static TABLE: OnceLock<MethodTable> = OnceLock::new();
    TABLE.get_or_init(build)
}

fn build() -> MethodTable {
    let mut t = MethodTable::new();
    t.register("==", eq);
    t.register("!=", ne);
    t.register("!", not);
    t.register("to_s", to_s);
    t.register("inspect", inspect);
    t.register("nil?", is_nil);
    t.register("class", class_name);
    t
}

fn not(recv: &Value, _args: &[Value], _block: Option<&BlockCaller>, _depth: usize) -> Result<Value> {
    Ok(Value::Boolean(!recv.truthy()))
}

fn eq(recv: &Value, args: &[Value], _block: Option<&BlockCaller>, _depth: usize) -> Result<Value> {
    let other = arg(args, 0)?;
    Ok(Value::Boolean(recv.value_eq(other)))
}

fn ne(recv: &Value, args: &[Value], _block: Option<&BlockCaller>, _depth: usize) -> Result<Value> {
    let other = arg(args, 0)?;
    Ok(Value::Boolean(!recv.value_eq(other)))
}

fn to_s(recv: &Value, _args: &[Value], _block: Option<&BlockCaller>, _depth: usize) -> Result<Value> {
    Ok(Value::string(recv.to_s()))
}

fn inspect(recv: &Value, _args: &[Value], _block: Option<&BlockCaller>, _depth: usize) -> Result<Value> {
    Ok(Value::string(recv.inspect()))
}

fn is_nil(recv: &Value, _args: &[Value], _block: Option<&BlockCaller>, _depth: usize) -> Result<Value> {
    Ok(Value::Boolean(matches!(recv, Value::Nil)))
}

fn class_name(recv: &Value, _args: &[Value], _block: Option<&BlockCaller>, _depth: usize) -> Result<Value> {
    Ok(Value::string(recv.type_name()))
}

fn arg(args: &[Value], index: usize) -> Result<&Value> {
    args.get(index)
        .ok_or_else(|| crate::error::Error::argument(format!("expected at least {} argument(s)", index + 1)))
}
