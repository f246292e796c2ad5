//! Combinators shared by every enumerable value (`Array`, `Hash`,
//! `Enumerator`), all implemented in terms of `each`.
//!
//! Grounded on `crates/monty/src/types/py_trait.rs`'s `Iterable` fallback
//! table and `Enumerator.cpp`'s lazy `each`-forwarding model: any method
//! here that is called without a block returns a further `Enumerator`
//! instead of eagerly materializing a result, so a chain like
//! `.each.with_index` never allocates an intermediate collection.

use std::rc::Rc;
use std::sync::OnceLock;

use crate::error::{Error, Result};
use crate::value::{make_number, EnumeratorValue, Value};

use super::array::sort_by_compare;
use super::{for_each_item, BlockCaller, MethodTable};

pub(super) fn table() -> &'static MethodTable {
    static TABLE: OnceLock<MethodTable> = OnceLock::new();
    TABLE.get_or_init(build)
}

fn build() -> MethodTable {
    let mut t = MethodTable::new();
    t.register("each", each);
    t.register("each_with_index", each_with_index);
    t.register("all?", all);
    t.register("any?", any);
    t.register("none?", none);
    t.register("map", map);
    t.alias("collect", "map");
    t.register("select", select);
    t.alias("filter", "select");
    t.register("reject", reject);
    t.register("reduce", reduce);
    t.alias("inject", "reduce");
    t.register("find", find);
    t.alias("detect", "find");
    t.register("to_a", to_a);
    t.register("to_h", to_h);
    t.register("count", count);
    t.register("min", min);
    t.register("max", max);
    t.register("sort", sort);
    t.register("sort_by", sort_by);
    t.register("group_by", group_by);
    t.register("include?", includes);
    t
}

fn as_enumerator(recv: &Value, selector: &'static str, args: Vec<Value>) -> Value {
    Value::Enumerator(Rc::new(EnumeratorValue::new(recv.clone(), selector, args)))
}

fn each(recv: &Value, _args: &[Value], block: Option<&BlockCaller>, depth: usize) -> Result<Value> {
    match block {
        None => Ok(as_enumerator(recv, "each", vec![])),
        Some(block) => {
            for_each_item(recv, depth, &mut |item| {
                block(&[item])?;
                Ok(true)
            })?;
            Ok(recv.clone())
        }
    }
}

fn each_with_index(recv: &Value, _args: &[Value], block: Option<&BlockCaller>, depth: usize) -> Result<Value> {
    match block {
        None => Ok(as_enumerator(recv, "each_with_index", vec![])),
        Some(block) => {
            let mut i = 0i64;
            for_each_item(recv, depth, &mut |item| {
                block(&[item, Value::Number(make_number(i as f64))])?;
                i += 1;
                Ok(true)
            })?;
            Ok(recv.clone())
        }
    }
}

fn all(recv: &Value, _args: &[Value], block: Option<&BlockCaller>, depth: usize) -> Result<Value> {
    let mut result = true;
    for_each_item(recv, depth, &mut |item| {
        let keep = match block {
            Some(b) => b(&[item])?.truthy(),
            None => item.truthy(),
        };
        if !keep {
            result = false;
        }
        Ok(result)
    })?;
    Ok(Value::Boolean(result))
}

fn any(recv: &Value, _args: &[Value], block: Option<&BlockCaller>, depth: usize) -> Result<Value> {
    let mut result = false;
    for_each_item(recv, depth, &mut |item| {
        let hit = match block {
            Some(b) => b(&[item])?.truthy(),
            None => item.truthy(),
        };
        if hit {
            result = true;
        }
        Ok(!result)
    })?;
    Ok(Value::Boolean(result))
}

fn none(recv: &Value, args: &[Value], block: Option<&BlockCaller>, depth: usize) -> Result<Value> {
    let any = any(recv, args, block, depth)?;
    Ok(Value::Boolean(!any.truthy()))
}

fn map(recv: &Value, _args: &[Value], block: Option<&BlockCaller>, depth: usize) -> Result<Value> {
    match block {
        None => Ok(as_enumerator(recv, "map", vec![])),
        Some(block) => {
            let mut out = Vec::new();
            for_each_item(recv, depth, &mut |item| {
                out.push(block(&[item])?);
                Ok(true)
            })?;
            Ok(Value::array(out))
        }
    }
}

fn select(recv: &Value, _args: &[Value], block: Option<&BlockCaller>, depth: usize) -> Result<Value> {
    match block {
        None => Ok(as_enumerator(recv, "select", vec![])),
        Some(block) => {
            let mut out = Vec::new();
            for_each_item(recv, depth, &mut |item| {
                if block(&[item.clone()])?.truthy() {
                    out.push(item);
                }
                Ok(true)
            })?;
            Ok(Value::array(out))
        }
    }
}

fn reject(recv: &Value, _args: &[Value], block: Option<&BlockCaller>, depth: usize) -> Result<Value> {
    match block {
        None => Ok(as_enumerator(recv, "reject", vec![])),
        Some(block) => {
            let mut out = Vec::new();
            for_each_item(recv, depth, &mut |item| {
                if !block(&[item.clone()])?.truthy() {
                    out.push(item);
                }
                Ok(true)
            })?;
            Ok(Value::array(out))
        }
    }
}

fn reduce(recv: &Value, args: &[Value], block: Option<&BlockCaller>, depth: usize) -> Result<Value> {
    let block = block.ok_or_else(|| Error::argument("reduce requires a block"))?;
    let mut acc: Option<Value> = args.first().cloned();
    for_each_item(recv, depth, &mut |item| {
        acc = Some(match acc.take() {
            Some(a) => block(&[a, item])?,
            None => item,
        });
        Ok(true)
    })?;
    Ok(acc.unwrap_or(Value::Nil))
}

fn find(recv: &Value, _args: &[Value], block: Option<&BlockCaller>, depth: usize) -> Result<Value> {
    let block = block.ok_or_else(|| Error::argument("find requires a block"))?;
    let mut found = Value::Nil;
    for_each_item(recv, depth, &mut |item| {
        if block(&[item.clone()])?.truthy() {
            found = item;
            return Ok(false);
        }
        Ok(true)
    })?;
    Ok(found)
}

fn to_a(recv: &Value, _args: &[Value], _block: Option<&BlockCaller>, depth: usize) -> Result<Value> {
    let mut out = Vec::new();
    for_each_item(recv, depth, &mut |item| {
        out.push(item);
        Ok(true)
    })?;
    Ok(Value::array(out))
}

/// `to_h` requires every yielded element to be a 2-element `[key, value]`
/// pair; a non-Array element is a `TypeError`, an Array of the wrong length
/// is an `ArgumentError`.
fn to_h(recv: &Value, _args: &[Value], block: Option<&BlockCaller>, depth: usize) -> Result<Value> {
    let mut pairs = Vec::new();
    let mut err = None;
    for_each_item(recv, depth, &mut |item| {
        let item = match block {
            Some(b) => b(&[item]),
            None => Ok(item),
        };
        let item = match item {
            Ok(v) => v,
            Err(e) => {
                err = Some(e);
                return Ok(false);
            }
        };
        match &item {
            Value::Array(a) => {
                let items = a.items.borrow();
                if items.len() != 2 {
                    err = Some(Error::argument(format!(
                        "element has wrong array length (expected 2, was {})",
                        items.len()
                    )));
                    return Ok(false);
                }
                pairs.push((items[0].clone(), items[1].clone()));
            }
            other => {
                err = Some(Error::type_error(format!(
                    "wrong element type {} (expected Array)",
                    other.type_name()
                )));
                return Ok(false);
            }
        }
        Ok(true)
    })?;
    if let Some(e) = err {
        return Err(e);
    }
    Ok(Value::hash(pairs))
}

fn count(recv: &Value, _args: &[Value], block: Option<&BlockCaller>, depth: usize) -> Result<Value> {
    let mut n = 0i64;
    for_each_item(recv, depth, &mut |item| {
        let keep = match block {
            Some(b) => b(&[item])?.truthy(),
            None => true,
        };
        if keep {
            n += 1;
        }
        Ok(true)
    })?;
    Ok(Value::Number(make_number(n as f64)))
}

fn min(recv: &Value, _args: &[Value], _block: Option<&BlockCaller>, depth: usize) -> Result<Value> {
    let items = to_a(recv, &[], None, depth)?.as_array_items()?;
    let mut best: Option<Value> = None;
    for item in items {
        best = Some(match best {
            None => item,
            Some(b) => {
                if matches!(item.compare(&b), Some(std::cmp::Ordering::Less)) {
                    item
                } else {
                    b
                }
            }
        });
    }
    Ok(best.unwrap_or(Value::Nil))
}

fn max(recv: &Value, _args: &[Value], _block: Option<&BlockCaller>, depth: usize) -> Result<Value> {
    let items = to_a(recv, &[], None, depth)?.as_array_items()?;
    let mut best: Option<Value> = None;
    for item in items {
        best = Some(match best {
            None => item,
            Some(b) => {
                if matches!(item.compare(&b), Some(std::cmp::Ordering::Greater)) {
                    item
                } else {
                    b
                }
            }
        });
    }
    Ok(best.unwrap_or(Value::Nil))
}

fn sort(recv: &Value, _args: &[Value], _block: Option<&BlockCaller>, depth: usize) -> Result<Value> {
    let mut items = to_a(recv, &[], None, depth)?.as_array_items()?;
    sort_by_compare(&mut items)?;
    Ok(Value::array(items))
}

fn sort_by(recv: &Value, _args: &[Value], block: Option<&BlockCaller>, depth: usize) -> Result<Value> {
    let block = block.ok_or_else(|| Error::argument("sort_by requires a block"))?;
    let items = to_a(recv, &[], None, depth)?.as_array_items()?;
    let mut keyed: Vec<(Value, Value)> = Vec::with_capacity(items.len());
    for item in items {
        let key = block(&[item.clone()])?;
        keyed.push((key, item));
    }
    let mut err = None;
    keyed.sort_by(|(ka, _), (kb, _)| match ka.compare(kb) {
        Some(o) => o,
        None => {
            if err.is_none() {
                err = Some(Error::argument("comparison failed"));
            }
            std::cmp::Ordering::Equal
        }
    });
    if let Some(e) = err {
        return Err(e);
    }
    Ok(Value::array(keyed.into_iter().map(|(_, v)| v).collect()))
}

fn group_by(recv: &Value, _args: &[Value], block: Option<&BlockCaller>, depth: usize) -> Result<Value> {
    let block = block.ok_or_else(|| Error::argument("group_by requires a block"))?;
    let mut groups: Vec<(Value, Vec<Value>)> = Vec::new();
    for_each_item(recv, depth, &mut |item| {
        let key = block(&[item.clone()])?;
        match groups.iter_mut().find(|(k, _)| k.value_eq(&key)) {
            Some((_, bucket)) => bucket.push(item),
            None => groups.push((key, vec![item])),
        }
        Ok(true)
    })?;
    Ok(Value::hash(
        groups.into_iter().map(|(k, items)| (k, Value::array(items))).collect(),
    ))
}

fn includes(recv: &Value, args: &[Value], _block: Option<&BlockCaller>, depth: usize) -> Result<Value> {
    let needle = args.first().ok_or_else(|| Error::argument("expected 1 argument"))?;
    let mut found = false;
    for_each_item(recv, depth, &mut |item| {
        if item.value_eq(needle) {
            found = true;
            return Ok(false);
        }
        Ok(true)
    })?;
    Ok(Value::Boolean(found))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(v: f64) -> Value {
        Value::Number(make_number(v))
    }

    #[test]
    fn all_is_false_when_any_element_is_falsy() {
        let a = Value::array(vec![n(1.0), n(2.0), Value::Nil, n(3.0)]);
        let r = all(&a, &[], None, 0).unwrap();
        assert_eq!(r.truthy(), false);
    }

    #[test]
    fn to_h_of_pairs_builds_a_hash() {
        let a = Value::array(vec![
            Value::array(vec![n(1.0), n(6.0)]),
            Value::array(vec![n(2.0), n(7.0)]),
            Value::array(vec![n(3.0), n(8.0)]),
        ]);
        let r = to_h(&a, &[], None, 0).unwrap();
        assert_eq!(r.inspect(), "{1 => 6, 2 => 7, 3 => 8}");
    }

    #[test]
    fn to_h_on_non_array_element_is_type_error() {
        let a = Value::array(vec![n(1.0)]);
        let err = to_h(&a, &[], None, 0).unwrap_err();
        assert!(matches!(err, Error::Type { .. }));
    }

    #[test]
    fn to_h_on_wrong_length_pair_is_argument_error() {
        let a = Value::array(vec![Value::array(vec![n(1.0)])]);
        let err = to_h(&a, &[], None, 0).unwrap_err();
        assert!(matches!(err, Error::Argument { .. }));
    }

    #[test]
    fn find_stops_at_first_match() {
        let calls = std::cell::RefCell::new(0);
        let a = Value::array(vec![n(1.0), n(2.0), n(3.0)]);
        let block: &BlockCaller = &|args: &[Value]| {
            *calls.borrow_mut() += 1;
            Ok(Value::Boolean(args[0].as_number().unwrap() == 2.0))
        };
        let r = find(&a, &[], Some(block), 0).unwrap();
        assert_eq!(r.as_number().unwrap(), 2.0);
        assert_eq!(*calls.borrow(), 2);
    }
}
