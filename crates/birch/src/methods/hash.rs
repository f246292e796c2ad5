//! Hash methods, grounded on `crates/monty/src/types/dict.rs`'s `Dict`
//! method set.

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
    t.register("[]", get);
    t.register("[]=", set);
    t.register("==", eq);
    t.register("!=", ne);
    t.register("keys", keys);
    t.register("values", values);
    t.register("fetch", fetch);
    t.register("include?", includes);
    t.alias("has_key?", "include?");
    t.register("size", size);
    t.alias("length", "size");
    t.register("empty?", is_empty);
    t.register("to_a", to_a);
    t.register("to_h", to_h);
    t.register("to_s", to_s);
    t.register("merge", merge);
    t
}

fn this(recv: &Value) -> &crate::value::HashValue {
    match recv {
        Value::Hash(h) => h,
        _ => unreachable!("hash table only dispatched for Value::Hash"),
    }
}

fn get(recv: &Value, args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    let key = args.first().ok_or_else(|| Error::argument("expected a key"))?;
    Ok(this(recv).get(key).unwrap_or(Value::Nil))
}

fn set(recv: &Value, args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    let key = args.first().ok_or_else(|| Error::argument("expected a key"))?.clone();
    let value = args.get(1).ok_or_else(|| Error::argument("expected a value"))?.clone();
    this(recv).set(key, value.clone());
    Ok(value)
}

fn eq(recv: &Value, args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(Value::Boolean(args.first().is_some_and(|o| recv.value_eq(o))))
}

fn ne(recv: &Value, args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(Value::Boolean(!args.first().is_some_and(|o| recv.value_eq(o))))
}

fn keys(recv: &Value, _args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(Value::array(this(recv).keys()))
}

fn values(recv: &Value, _args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(Value::array(this(recv).values()))
}

fn fetch(recv: &Value, args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    let key = args.first().ok_or_else(|| Error::argument("expected a key"))?;
    match this(recv).get(key) {
        Some(v) => Ok(v),
        None => match args.get(1) {
            Some(default) => Ok(default.clone()),
            None => Err(Error::Index {
                index: 0,
                len: this(recv).len(),
            }),
        },
    }
}

fn includes(recv: &Value, args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    let key = args.first().ok_or_else(|| Error::argument("expected a key"))?;
    Ok(Value::Boolean(this(recv).contains_key(key)))
}

fn size(recv: &Value, _args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(Value::Number(crate::value::make_number(this(recv).len() as f64)))
}

fn is_empty(recv: &Value, _args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(Value::Boolean(this(recv).is_empty()))
}

fn to_a(recv: &Value, _args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    let pairs = this(recv).pairs().into_iter().map(|(k, v)| Value::array(vec![k, v])).collect();
    Ok(Value::array(pairs))
}

fn to_h(recv: &Value, _args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(recv.clone())
}

fn to_s(recv: &Value, _args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(Value::string(recv.inspect()))
}

fn merge(recv: &Value, args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    let other = match args.first() {
        Some(Value::Hash(h)) => h,
        Some(other) => {
            return Err(Error::type_error(format!(
                "no implicit conversion of {} into Hash",
                other.type_name()
            )))
        }
        None => return Err(Error::argument("expected a Hash argument")),
    };
    let mut pairs = this(recv).pairs();
    for (k, v) in other.pairs() {
        if let Some(slot) = pairs.iter_mut().find(|(ek, _)| ek.value_eq(&k)) {
            slot.1 = v;
        } else {
            pairs.push((k, v));
        }
    }
    Ok(Value::hash(pairs))
}
