//! Method dispatch: per-type method tables plus the layered fallback that
//! lets any value answer `==`/`to_s`/`inspect` and lets any enumerable
//! value answer `map`/`select`/etc.
//!
//! Grounded on `crates/monty/src/types/py_trait.rs`'s layered trait-table
//! lookup (`PyTrait` per type, falling back to a shared base), generalized
//! from static trait objects to runtime string tables since this crate
//! resolves method names at eval time rather than compile time. Dispatch
//! tries, in order: the receiver's variant-specific table, then (if the
//! receiver is enumerable) the shared `enumerable` combinator table, then
//! (for `Object` receivers) the host's own `ViewModel::call`, then the
//! shared `object` base table.

mod array;
mod enumerable;
mod hash;
mod number;
mod object;
mod proc_;
mod string;

use std::sync::OnceLock;

use ahash::AHashMap;

use crate::error::{Error, Result};
use crate::value::Value;

/// Evaluation/dispatch recursion past this depth is reported as a
/// `StackError` rather than overflowing the native call stack. A bytecode
/// interpreter would bound an explicit operand stack instead; this is the
/// equivalent guard for a tree-walker that recurses on the native stack.
pub const MAX_EVAL_DEPTH: usize = 512;

/// A block (or proc) a method can invoke zero or more times against its
/// own arguments, e.g. `each`'s per-element callback. Supplied by the
/// evaluator, which is the only place that knows how to run a `Proc`'s
/// body against a scope.
pub type BlockCaller<'a> = dyn Fn(&[Value]) -> Result<Value> + 'a;

pub type MethodFn = fn(&Value, &[Value], Option<&BlockCaller>, usize) -> Result<Value>;

pub struct MethodTable {
    methods: AHashMap<&'static str, MethodFn>,
}

impl MethodTable {
    fn new() -> Self {
        Self {
            methods: AHashMap::default(),
        }
    }

    fn register(&mut self, name: &'static str, f: MethodFn) {
        self.methods.insert(name, f);
    }

    /// Registers `alias` to resolve to whatever `existing` currently points
    /// at. Must be called after `existing` is registered.
    fn alias(&mut self, alias: &'static str, existing: &'static str) {
        let f = *self
            .methods
            .get(existing)
            .unwrap_or_else(|| panic!("alias target `{existing}` not yet registered"));
        self.methods.insert(alias, f);
    }

    fn lookup(&self, name: &str) -> Option<MethodFn> {
        self.methods.get(name).copied()
    }
}

fn variant_table(receiver: &Value) -> &'static MethodTable {
    match receiver {
        Value::Number(_) => number::table(),
        Value::String(_) => string::table(),
        Value::Array(_) => array::table(),
        Value::Hash(_) => hash::table(),
        Value::Proc(_) => proc_::table(),
        Value::Nil | Value::Boolean(_) | Value::Symbol(_) | Value::Enumerator(_) | Value::Object(_) => {
            empty_table()
        }
    }
}

fn empty_table() -> &'static MethodTable {
    static TABLE: OnceLock<MethodTable> = OnceLock::new();
    TABLE.get_or_init(|| MethodTable::new())
}

/// Resolves and invokes `name` on `receiver`. `depth` is the current
/// evaluator recursion depth; dispatch refuses to proceed once it exceeds
/// `MAX_EVAL_DEPTH`, and combinators that invoke `block` pass `depth + 1`
/// back through it.
pub fn dispatch(
    receiver: &Value,
    name: &str,
    args: &[Value],
    block: Option<&BlockCaller>,
    depth: usize,
) -> Result<Value> {
    if depth > MAX_EVAL_DEPTH {
        return Err(Error::Stack);
    }
    if let Some(f) = variant_table(receiver).lookup(name) {
        return f(receiver, args, block, depth);
    }
    if receiver.is_enumerable() {
        if let Some(f) = enumerable::table().lookup(name) {
            return f(receiver, args, block, depth);
        }
    }
    if let Value::Object(vm) = receiver {
        if let Some(result) = vm.call(name, args) {
            return result;
        }
    }
    if let Some(f) = object::table().lookup(name) {
        return f(receiver, args, block, depth);
    }
    Err(Error::no_method(receiver.type_name(), name))
}

/// Calls `each` on `receiver`, forwarding every yielded value to `f`, and
/// stopping as soon as `f` reports it is done (returns `Ok(false)`) — the
/// shared iteration primitive behind every `enumerable` combinator.
pub(crate) fn for_each_item(
    receiver: &Value,
    depth: usize,
    f: &mut dyn FnMut(Value) -> Result<bool>,
) -> Result<()> {
    match receiver {
        Value::Array(a) => {
            for item in a.items.borrow().clone() {
                if !f(item)? {
                    break;
                }
            }
            Ok(())
        }
        Value::Hash(h) => {
            for (k, v) in h.pairs() {
                if !f(Value::array(vec![k, v]))? {
                    break;
                }
            }
            Ok(())
        }
        Value::Enumerator(e) => forward_each(&e.receiver, &e.selector, &e.prefix_args, depth, f),
        // A host view-model cannot be iterated this way: `ViewModel::call`
        // takes no block argument, so there is no channel through which a
        // host-defined `each` could invoke `f` per element. Host enumerables
        // are not supported; a `Value::Object` reaches the `NoMethodError`
        // arm below like any other non-enumerable receiver.
        other => Err(Error::no_method(other.type_name(), "each")),
    }
}

/// Dispatches `selector` on `receiver` with a block that forwards each
/// yielded value to `f`, stopping as soon as `f` reports it is done.
fn forward_each(
    receiver: &Value,
    selector: &str,
    prefix_args: &[Value],
    depth: usize,
    f: &mut dyn FnMut(Value) -> Result<bool>,
) -> Result<()> {
    let stop_flag = std::cell::RefCell::new(false);
    let f_cell = std::cell::RefCell::new(f);
    let forward: &BlockCaller = &|block_args: &[Value]| {
        if *stop_flag.borrow() {
            return Ok(Value::Nil);
        }
        let yielded = if block_args.len() == 1 {
            block_args[0].clone()
        } else {
            Value::array(block_args.to_vec())
        };
        if !(*f_cell.borrow_mut())(yielded)? {
            *stop_flag.borrow_mut() = true;
        }
        Ok(Value::Nil)
    };
    dispatch(receiver, selector, prefix_args, Some(forward), depth + 1)?;
    Ok(())
}
