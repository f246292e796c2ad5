//! The tree-walking expression evaluator.
//!
//! Grounded on `crates/monty/src/vm.rs`'s dispatch loop, replayed as direct
//! AST recursion instead of a bytecode fetch-execute cycle (there is no
//! separate compile stage). Left-to-right argument evaluation, short-circuit
//! `&&`/`||`, and the depth-bounded `StackError` guard all mirror that
//! file's evaluation order and resource limits.

use std::rc::Rc;

use crate::ast::{BinOp, Block, Node, UnOp};
use crate::error::{Error, Result};
use crate::intern::Symbol;
use crate::methods::{dispatch, BlockCaller, MAX_EVAL_DEPTH};
use crate::scope::Scope;
use crate::value::{ProcValue, Value};

/// Evaluates `node` against `scope`. Callers at the API boundary
/// (`crate::render`/`crate::eval`) start `depth` at `0`.
pub fn eval_node(node: &Node, scope: &Scope, depth: usize) -> Result<Value> {
    if depth > MAX_EVAL_DEPTH {
        return Err(Error::Stack);
    }
    match node {
        Node::Literal(v) => Ok(v.clone()),
        Node::ArrayLit(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(eval_node(item, scope, depth + 1)?);
            }
            Ok(Value::array(out))
        }
        Node::HashLit(pairs) => {
            let mut out = Vec::with_capacity(pairs.len());
            for (k, v) in pairs {
                out.push((eval_node(k, scope, depth + 1)?, eval_node(v, scope, depth + 1)?));
            }
            Ok(Value::hash(out))
        }
        Node::LocalRead(name) => match scope.get(*name) {
            Some(v) => Ok(v),
            None => eval_implicit_call(*name, scope, depth),
        },
        Node::LocalWrite(name, value) => {
            let v = eval_node(value, scope, depth + 1)?;
            scope.set(*name, v.clone());
            Ok(v)
        }
        Node::MethodCall {
            receiver,
            name,
            args,
            block,
        } => eval_method_call(receiver.as_deref(), name, args, block.as_ref(), scope, depth),
        Node::Index { receiver, args } => {
            let recv = eval_node(receiver, scope, depth + 1)?;
            let arg_values = eval_args(args, scope, depth)?;
            dispatch(&recv, "[]", &arg_values, None, depth + 1)
        }
        Node::BinOp(op, lhs, rhs) => eval_binop(*op, lhs, rhs, scope, depth),
        Node::UnOp(op, operand) => {
            let v = eval_node(operand, scope, depth + 1)?;
            dispatch(&v, op.method_name(), &[], None, depth + 1)
        }
        Node::Ternary(cond, then_branch, else_branch) => {
            if eval_node(cond, scope, depth + 1)?.truthy() {
                eval_node(then_branch, scope, depth + 1)
            } else {
                eval_node(else_branch, scope, depth + 1)
            }
        }
    }
}

/// A bare identifier with no local binding is a zero-arg method call on the
/// implicit receiver: `self.call(name, &[])`, reported as
/// a `NameError` (not `NoMethodError`) if no such method exists either,
/// since from the author's perspective this looked like a variable
/// reference.
fn eval_implicit_call(name: Symbol, scope: &Scope, depth: usize) -> Result<Value> {
    let text = name.as_str();
    dispatch(&Value::Object(implicit_receiver(scope)), &text, &[], None, depth + 1)
        .map_err(|err| match err {
            Error::NoMethod { .. } => Error::Name { name: text },
            other => other,
        })
}

fn implicit_receiver(scope: &Scope) -> Rc<dyn crate::value::ViewModel> {
    scope.root_view_model().clone()
}

fn eval_args(args: &[Node], scope: &Scope, depth: usize) -> Result<Vec<Value>> {
    let mut out = Vec::with_capacity(args.len());
    for a in args {
        out.push(eval_node(a, scope, depth + 1)?);
    }
    Ok(out)
}

fn eval_method_call(
    receiver: Option<&Node>,
    name: &str,
    args: &[Node],
    block: Option<&Block>,
    scope: &Scope,
    depth: usize,
) -> Result<Value> {
    // `lambda { |..| .. }` / `proc { |..| .. }` with no explicit receiver
    // and no args materialize their block directly as a `Value::Proc`
    // rather than dispatching it as an implicit-receiver call, matching
    // how the original attaches a trailing `Proc` object wherever a block
    // is expected (`original_source/source/types/Enumerator.cpp`'s
    // `args2.back()` cast) and giving callers something they can store,
    // pass around, and invoke later via `.call`.
    if receiver.is_none() && args.is_empty() && matches!(name, "lambda" | "proc") {
        if let Some(block) = block {
            return Ok(Value::Proc(Rc::new(ProcValue::new(
                block.params.clone(),
                block.body.clone(),
                scope.clone(),
            ))));
        }
    }
    let recv = match receiver {
        Some(r) => eval_node(r, scope, depth + 1)?,
        None => Value::Object(implicit_receiver(scope)),
    };
    let arg_values = eval_args(args, scope, depth)?;
    match block {
        None => dispatch(&recv, name, &arg_values, None, depth + 1),
        Some(block) => {
            let caller = block_caller(block, scope, depth);
            let block_ref: &BlockCaller = &caller;
            dispatch(&recv, name, &arg_values, Some(block_ref), depth + 1)
        }
    }
}

/// Builds a closure that invokes a parsed block with arguments bound
/// positionally against its own child scope, since a block
/// is lexically attached to one call site rather than carrying its own
/// capture (unlike a `Proc` literal, which owns one).
fn block_caller<'a>(block: &'a Block, outer: &'a Scope, depth: usize) -> impl Fn(&[Value]) -> Result<Value> + 'a {
    move |args: &[Value]| {
        let inner = outer.push();
        for (i, param) in block.params.iter().enumerate() {
            inner.set(*param, args.get(i).cloned().unwrap_or(Value::Nil));
        }
        eval_node(&block.body, &inner, depth + 1)
    }
}

/// Invokes a `Proc` value's `call`: a child of its captured scope, with
/// parameters bound positionally.
pub fn call_proc(proc: &Rc<ProcValue>, args: &[Value], depth: usize) -> Result<Value> {
    if depth > MAX_EVAL_DEPTH {
        return Err(Error::Stack);
    }
    let inner = proc.capture_scope.push();
    for (i, param) in proc.params.iter().enumerate() {
        inner.set(*param, args.get(i).cloned().unwrap_or(Value::Nil));
    }
    eval_node(&proc.body, &inner, depth + 1)
}

fn eval_binop(op: BinOp, lhs: &Node, rhs: &Node, scope: &Scope, depth: usize) -> Result<Value> {
    match op {
        BinOp::And => {
            let l = eval_node(lhs, scope, depth + 1)?;
            if !l.truthy() {
                return Ok(l);
            }
            eval_node(rhs, scope, depth + 1)
        }
        BinOp::Or => {
            let l = eval_node(lhs, scope, depth + 1)?;
            if l.truthy() {
                return Ok(l);
            }
            eval_node(rhs, scope, depth + 1)
        }
        _ => {
            let l = eval_node(lhs, scope, depth + 1)?;
            let r = eval_node(rhs, scope, depth + 1)?;
            dispatch(&l, op.method_name(), &[r], None, depth + 1)
        }
    }
}
