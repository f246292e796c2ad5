//! String methods, grounded on `crates/monty/src/value.rs`'s inline
//! `InternString` operator impls (concatenation, repetition, comparison)
//! plus the usual case/whitespace/predicate helpers a string type needs
//! beyond what a bytecode-level value enum surfaces as methods (that model
//! compiles string method calls to dedicated opcodes instead of a
//! name-keyed table).

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
    t.register("<", lt);
    t.register("<=", le);
    t.register(">", gt);
    t.register(">=", ge);
    t.register("length", length);
    t.alias("size", "length");
    t.register("upcase", upcase);
    t.register("downcase", downcase);
    t.register("split", split);
    t.register("strip", strip);
    t.register("include?", includes);
    t.register("empty?", is_empty);
    t.register("to_i", to_i);
    t.register("to_f", to_f);
    t.register("to_s", to_s);
    t
}

fn this(recv: &Value) -> &str {
    match recv {
        Value::String(s) => s.as_str(),
        _ => unreachable!("string table only dispatched for Value::String"),
    }
}

fn arg_str(args: &[Value], index: usize) -> Result<String> {
    match args.get(index) {
        Some(Value::String(s)) => Ok(s.as_str().to_owned()),
        Some(other) => Err(Error::type_error(format!(
            "no implicit conversion of {} into String",
            other.type_name()
        ))),
        None => Err(Error::argument("expected a String argument")),
    }
}

fn concat(recv: &Value, args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(Value::string(format!("{}{}", this(recv), arg_str(args, 0)?)))
}

fn repeat(recv: &Value, args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    let n = args.first().ok_or_else(|| Error::argument("expected 1 argument"))?.as_number()?;
    if n < 0.0 {
        return Err(Error::argument("negative argument"));
    }
    Ok(Value::string(this(recv).repeat(n as usize)))
}

fn index(recv: &Value, args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    let chars: Vec<char> = this(recv).chars().collect();
    let len = chars.len() as i64;
    let start = args.first().ok_or_else(|| Error::argument("expected an index"))?.as_number()? as i64;
    let start = if start < 0 { start + len } else { start };
    if start < 0 || start > len {
        return Ok(Value::Nil);
    }
    let count = match args.get(1) {
        Some(v) => v.as_number()? as i64,
        None => 1,
    };
    if count < 0 || start == len {
        return Ok(Value::Nil);
    }
    let end = (start + count).min(len);
    let slice: String = chars[start as usize..end as usize].iter().collect();
    Ok(Value::string(slice))
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

fn lt(recv: &Value, args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(Value::Boolean(this(recv) < arg_str(args, 0)?.as_str()))
}

fn le(recv: &Value, args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(Value::Boolean(this(recv) <= arg_str(args, 0)?.as_str()))
}

fn gt(recv: &Value, args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(Value::Boolean(this(recv) > arg_str(args, 0)?.as_str()))
}

fn ge(recv: &Value, args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(Value::Boolean(this(recv) >= arg_str(args, 0)?.as_str()))
}

fn length(recv: &Value, _args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(Value::Number(crate::value::make_number(this(recv).chars().count() as f64)))
}

fn upcase(recv: &Value, _args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(Value::string(this(recv).to_uppercase()))
}

fn downcase(recv: &Value, _args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(Value::string(this(recv).to_lowercase()))
}

fn split(recv: &Value, args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    let pieces: Vec<Value> = match args.first() {
        None => this(recv).split_whitespace().map(Value::string).collect(),
        Some(Value::String(sep)) if sep.as_str().is_empty() => {
            this(recv).chars().map(|c| Value::string(c.to_string())).collect()
        }
        Some(Value::String(sep)) => this(recv).split(sep.as_str()).map(Value::string).collect(),
        Some(other) => {
            return Err(Error::type_error(format!(
                "no implicit conversion of {} into String",
                other.type_name()
            )))
        }
    };
    Ok(Value::array(pieces))
}

fn strip(recv: &Value, _args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(Value::string(this(recv).trim().to_owned()))
}

fn includes(recv: &Value, args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(Value::Boolean(this(recv).contains(arg_str(args, 0)?.as_str())))
}

fn is_empty(recv: &Value, _args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(Value::Boolean(this(recv).is_empty()))
}

fn to_i(recv: &Value, _args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(Value::Number(crate::value::make_number(leading_number(this(recv)).trunc())))
}

fn to_f(recv: &Value, _args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(Value::Number(crate::value::make_number(leading_number(this(recv)))))
}

fn to_s(recv: &Value, _args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(Value::string(this(recv).to_owned()))
}

/// Ruby's lenient `String#to_i`/`#to_f`: parse as much of a leading numeric
/// prefix as possible, `0` if there is none.
fn leading_number(s: &str) -> f64 {
    let s = s.trim_start();
    let mut end = 0;
    let bytes = s.as_bytes();
    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let mut saw_digit = false;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        saw_digit = true;
    }
    if end < bytes.len() && bytes[end] == b'.' && bytes.get(end + 1).is_some_and(u8::is_ascii_digit) {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }
    if !saw_digit {
        return 0.0;
    }
    s[..end].parse().unwrap_or(0.0)
}
