//! Array methods, grounded on `crates/monty/src/types/list.rs`'s `List`
//! method set, with mutation methods (`push`/`pop`) mutating the shared
//! `RefCell<Vec<Value>>` in place, matching that file's own in-place `List`
//! mutation.

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
    t.register("+", concat);
    t.register("*", repeat);
    t.register("[]", index);
    t.register("==", eq);
    t.register("!=", ne);
    t.register("<=>", cmp);
    t.register("length", length);
    t.alias("size", "length");
    t.register("push", push);
    t.alias("<<", "push");
    t.register("pop", pop);
    t.register("first", first);
    t.register("last", last);
    t.register("reverse", reverse);
    t.register("sort", sort);
    t.register("include?", includes);
    t.register("empty?", is_empty);
    t.register("to_a", to_a);
    t.register("to_s", to_s);
    t.register("join", join);
    t
}

fn this(recv: &Value) -> std::cell::Ref<'_, Vec<Value>> {
    match recv {
        Value::Array(a) => a.items.borrow(),
        _ => unreachable!("array table only dispatched for Value::Array"),
    }
}

fn arg_items(args: &[Value], index: usize) -> Result<Vec<Value>> {
    match args.get(index) {
        Some(Value::Array(a)) => Ok(a.items.borrow().clone()),
        Some(other) => Err(Error::type_error(format!(
            "no implicit conversion of {} into Array",
            other.type_name()
        ))),
        None => Err(Error::argument("expected an Array argument")),
    }
}

fn concat(recv: &Value, args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    let mut out = this(recv).clone();
    out.extend(arg_items(args, 0)?);
    Ok(Value::array(out))
}

fn repeat(recv: &Value, args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    let n = args.first().ok_or_else(|| Error::argument("expected 1 argument"))?.as_number()?;
    if n < 0.0 {
        return Err(Error::argument("negative argument"));
    }
    let items = this(recv);
    let mut out = Vec::with_capacity(items.len() * n as usize);
    for _ in 0..n as usize {
        out.extend(items.iter().cloned());
    }
    Ok(Value::array(out))
}

fn index(recv: &Value, args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    let items = this(recv);
    let len = items.len() as i64;
    let i = args.first().ok_or_else(|| Error::argument("expected an index"))?.as_number()? as i64;
    let i = if i < 0 { i + len } else { i };
    if i < 0 || i >= len {
        return Ok(Value::Nil);
    }
    Ok(items[i as usize].clone())
}

fn eq(recv: &Value, args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(Value::Boolean(args.first().is_some_and(|o| recv.value_eq(o))))
}

fn ne(recv: &Value, args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(Value::Boolean(!args.first().is_some_and(|o| recv.value_eq(o))))
}

fn cmp(recv: &Value, args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    match args.first().and_then(|o| recv.compare(o)) {
        Some(std::cmp::Ordering::Less) => Ok(Value::Number(crate::value::make_number(-1.0))),
        Some(std::cmp::Ordering::Equal) => Ok(Value::Number(crate::value::make_number(0.0))),
        Some(std::cmp::Ordering::Greater) => Ok(Value::Number(crate::value::make_number(1.0))),
        None => Ok(Value::Nil),
    }
}

fn length(recv: &Value, _args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(Value::Number(crate::value::make_number(this(recv).len() as f64)))
}

fn push(recv: &Value, args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    match recv {
        Value::Array(a) => {
            a.items.borrow_mut().extend_from_slice(args);
            Ok(recv.clone())
        }
        _ => unreachable!("array table only dispatched for Value::Array"),
    }
}

fn pop(recv: &Value, _args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    match recv {
        Value::Array(a) => Ok(a.items.borrow_mut().pop().unwrap_or(Value::Nil)),
        _ => unreachable!("array table only dispatched for Value::Array"),
    }
}

fn first(recv: &Value, _args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(this(recv).first().cloned().unwrap_or(Value::Nil))
}

fn last(recv: &Value, _args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(this(recv).last().cloned().unwrap_or(Value::Nil))
}

fn reverse(recv: &Value, _args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    let mut out = this(recv).clone();
    out.reverse();
    Ok(Value::array(out))
}

fn sort(recv: &Value, _args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    let mut out = this(recv).clone();
    sort_by_compare(&mut out)?;
    Ok(Value::array(out))
}

pub(super) fn sort_by_compare(items: &mut [Value]) -> Result<()> {
    let mut err = None;
    items.sort_by(|a, b| match a.compare(b) {
        Some(o) => o,
        None => {
            if err.is_none() {
                err = Some(Error::argument(format!(
                    "comparison of {} with {} failed",
                    a.type_name(),
                    b.type_name()
                )));
            }
            std::cmp::Ordering::Equal
        }
    });
    match err {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn includes(recv: &Value, args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    let needle = args.first().ok_or_else(|| Error::argument("expected 1 argument"))?;
    Ok(Value::Boolean(this(recv).iter().any(|v| v.value_eq(needle))))
}

fn is_empty(recv: &Value, _args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(Value::Boolean(this(recv).is_empty()))
}

fn to_a(recv: &Value, _args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(recv.clone())
}

fn to_s(recv: &Value, _args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(Value::string(recv.inspect()))
}

fn join(recv: &Value, args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    let sep = match args.first() {
        Some(Value::String(s)) => s.as_str().to_owned(),
        Some(other) => {
            return Err(Error::type_error(format!(
                "no implicit conversion of {} into String",
                other.type_name()
            )))
        }
        None => String::new(),
    };
    let parts: Vec<String> = this(recv).iter().map(Value::to_s).collect();
    Ok(Value::string(parts.join(&sep)))
}
