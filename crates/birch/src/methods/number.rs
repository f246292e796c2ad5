//! Number methods: arithmetic, bitwise, and comparison operators desugared
//! from `ast::BinOp`/`UnOp`, plus the conversion and predicate methods
//! `Number.cpp` exposes.
//!
//! `&`/`|`/`^`/`<<`/`>>` truncate both operands to a signed 32-bit integer
//! before operating and widen the result back to `f64`, pinned to that
//! width for portability (see `DESIGN.md`).

use std::sync::OnceLock;

use crate::error::{Error, Result};
use crate::value::{make_number, NumberExt, Value};

use super::{BlockCaller, MethodTable};

pub(super) fn table() -> &'static MethodTable {
    static TABLE: OnceLock<MethodTable> = OnceLock::new();
    TABLE.get_or_init(build)
}

fn build() -> MethodTable {
    let mut t = MethodTable::new();
    t.register("+", add);
    t.register("-", sub);
    t.register("*", mul);
    t.register("/", div);
    t.register("%", modulo);
    t.register("**", pow);
    t.register("-@", neg);
    t.register("~", bit_not);
    t.register("<<", shift_l);
    t.register(">>", shift_r);
    t.register("&", bit_and);
    t.register("|", bit_or);
    t.register("^", bit_xor);
    t.register("<", lt);
    t.register("<=", le);
    t.register(">", gt);
    t.register(">=", ge);
    t.register("<=>", cmp);
    t.register("==", eq);
    t.register("!=", ne);
    t.register("to_s", to_s);
    t.register("to_i", to_i);
    t.alias("truncate", "to_i");
    t.alias("to_int", "to_i");
    t.register("to_f", to_f);
    t.register("abs", abs);
    t.register("ceil", ceil);
    t.register("floor", floor);
    t.register("round", round_method);
    t.register("zero?", is_zero);
    t.register("nan?", is_nan);
    t.register("finite?", is_finite);
    t.register("infinite?", is_infinite);
    t
}

fn this(recv: &Value) -> f64 {
    match recv {
        Value::Number(n) => n.get(),
        _ => unreachable!("number table only dispatched for Value::Number"),
    }
}

fn operand(args: &[Value]) -> Result<f64> {
    args.first()
        .ok_or_else(|| Error::argument("expected 1 argument"))?
        .as_number()
}

fn add(recv: &Value, args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(Value::Number(make_number(this(recv) + operand(args)?)))
}

fn sub(recv: &Value, args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(Value::Number(make_number(this(recv) - operand(args)?)))
}

fn mul(recv: &Value, args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(Value::Number(make_number(this(recv) * operand(args)?)))
}

/// `ZeroDivisionError` is scoped to integer divide/modulo by zero;
/// `Number.cpp`'s `div`/`mod` have no such check and just compute plain
/// IEEE-754 `v / 0.0`/`fmod`. Since this model has one `Number` variant for
/// both Ruby's `Integer` and `Float`, the distinction is recovered from
/// whether both operands happen to be whole numbers: integer-valued zero
/// division errors, float-valued zero division follows IEEE-754
/// (`Infinity`/`-Infinity`/`NaN`).
fn is_integral(v: f64) -> bool {
    v.is_finite() && v.fract() == 0.0
}

fn div(recv: &Value, args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    let lhs = this(recv);
    let rhs = operand(args)?;
    if rhs == 0.0 && is_integral(lhs) && is_integral(rhs) {
        return Err(Error::ZeroDivision);
    }
    Ok(Value::Number(make_number(lhs / rhs)))
}

fn modulo(recv: &Value, args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    let lhs = this(recv);
    let rhs = operand(args)?;
    if rhs == 0.0 && is_integral(lhs) && is_integral(rhs) {
        return Err(Error::ZeroDivision);
    }
    // Ruby-style modulo: result takes the sign of the divisor.
    let r = lhs % rhs;
    let r = if r != 0.0 && (r < 0.0) != (rhs < 0.0) { r + rhs } else { r };
    Ok(Value::Number(make_number(r)))
}

fn pow(recv: &Value, args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(Value::Number(make_number(this(recv).powf(operand(args)?))))
}

fn neg(recv: &Value, _args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(Value::Number(make_number(-this(recv))))
}

fn as_i32(v: f64) -> i32 {
    v as i64 as i32
}

fn bit_not(recv: &Value, _args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(Value::Number(make_number(!as_i32(this(recv)) as f64)))
}

fn shift_l(recv: &Value, args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    let shift = (as_i32(operand(args)?)).rem_euclid(32) as u32;
    Ok(Value::Number(make_number((as_i32(this(recv)).wrapping_shl(shift)) as f64)))
}

fn shift_r(recv: &Value, args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    let shift = (as_i32(operand(args)?)).rem_euclid(32) as u32;
    Ok(Value::Number(make_number((as_i32(this(recv)).wrapping_shr(shift)) as f64)))
}

fn bit_and(recv: &Value, args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(Value::Number(make_number((as_i32(this(recv)) & as_i32(operand(args)?)) as f64)))
}

fn bit_or(recv: &Value, args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(Value::Number(make_number((as_i32(this(recv)) | as_i32(operand(args)?)) as f64)))
}

fn bit_xor(recv: &Value, args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(Value::Number(make_number((as_i32(this(recv)) ^ as_i32(operand(args)?)) as f64)))
}

fn lt(recv: &Value, args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(Value::Boolean(this(recv) < operand(args)?))
}

fn le(recv: &Value, args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(Value::Boolean(this(recv) <= operand(args)?))
}

fn gt(recv: &Value, args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(Value::Boolean(this(recv) > operand(args)?))
}

fn ge(recv: &Value, args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(Value::Boolean(this(recv) >= operand(args)?))
}

fn cmp(recv: &Value, args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    match this(recv).partial_cmp(&operand(args)?) {
        Some(std::cmp::Ordering::Less) => Ok(Value::Number(make_number(-1.0))),
        Some(std::cmp::Ordering::Equal) => Ok(Value::Number(make_number(0.0))),
        Some(std::cmp::Ordering::Greater) => Ok(Value::Number(make_number(1.0))),
        None => Ok(Value::Nil),
    }
}

fn eq(recv: &Value, args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(Value::Boolean(args.first().is_some_and(|o| recv.value_eq(o))))
}

fn ne(recv: &Value, args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(Value::Boolean(!args.first().is_some_and(|o| recv.value_eq(o))))
}

fn to_s(recv: &Value, _args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(Value::string(crate::value::number_to_s(this(recv))))
}

fn to_i(recv: &Value, _args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(Value::Number(make_number(this(recv).trunc())))
}

fn to_f(recv: &Value, _args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(Value::Number(make_number(this(recv))))
}

fn abs(recv: &Value, _args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(Value::Number(make_number(this(recv).abs())))
}

fn ceil(recv: &Value, _args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(Value::Number(make_number(this(recv).ceil())))
}

fn floor(recv: &Value, _args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(Value::Number(make_number(this(recv).floor())))
}

fn round_method(recv: &Value, args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    let ndigits = match args.first() {
        Some(v) => v.as_number()? as i64,
        None => 0,
    };
    Ok(Value::Number(make_number(crate::value::round(this(recv), ndigits))))
}

fn is_zero(recv: &Value, _args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(Value::Boolean(this(recv) == 0.0))
}

fn is_nan(recv: &Value, _args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(Value::Boolean(this(recv).is_nan()))
}

fn is_finite(recv: &Value, _args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(Value::Boolean(this(recv).is_finite()))
}

fn is_infinite(recv: &Value, _args: &[Value], _b: Option<&BlockCaller>, _d: usize) -> Result<Value> {
    Ok(if this(recv).is_infinite() {
        Value::Number(make_number(if this(recv) > 0.0 { 1.0 } else { -1.0 }))
    } else {
        Value::Nil
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(v: f64) -> Value {
        Value::Number(make_number(v))
    }

    #[test]
    fn modulo_takes_sign_of_divisor() {
        let r = modulo(&n(-7.0), &[n(3.0)], None, 0).unwrap();
        assert_eq!(r.as_number().unwrap(), 2.0);
    }

    #[test]
    fn integer_division_by_zero_is_zero_division_error() {
        assert_eq!(div(&n(1.0), &[n(0.0)], None, 0).unwrap_err(), Error::ZeroDivision);
    }

    #[test]
    fn float_division_by_zero_follows_ieee_754() {
        let r = div(&n(1.5), &[n(0.0)], None, 0).unwrap();
        assert_eq!(r.as_number().unwrap(), f64::INFINITY);
    }

    #[test]
    fn bitwise_and_truncates_to_32_bits() {
        let r = bit_and(&n(6.0), &[n(3.0)], None, 0).unwrap();
        assert_eq!(r.as_number().unwrap(), 2.0);
    }
}
