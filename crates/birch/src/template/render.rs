//! The render driver, walking a `Part` tree against a `Scope` and writing
//! to an output buffer exactly as
//! `TemplatePartsList::render`/`TemplateForExpr::render`/
//! `TemplateIfExpr::render` do in the original.

use crate::error::Result;
use crate::eval::eval_node;
use crate::intern::Symbol;
use crate::methods::{for_each_item, MAX_EVAL_DEPTH};
use crate::scope::Scope;
use crate::value::Value;

use super::Part;

/// Renders `part` against `scope`, returning the accumulated output.
/// Fatal on the first error — there is no local recovery mid-render.
pub fn render(part: &Part, scope: &Scope) -> Result<String> {
    let mut buf = String::new();
    render_into(part, scope, &mut buf, 0)?;
    Ok(buf)
}

fn render_into(part: &Part, scope: &Scope, buf: &mut String, depth: usize) -> Result<()> {
    if depth > MAX_EVAL_DEPTH {
        return Err(crate::error::Error::Stack);
    }
    match part {
        Part::PartsList(parts) => {
            for p in parts {
                render_into(p, scope, buf, depth + 1)?;
            }
            Ok(())
        }
        Part::Text(text) => {
            buf.push_str(text);
            Ok(())
        }
        Part::OutputExpr(expr) => {
            let value = eval_node(expr, scope, depth + 1)?;
            buf.push_str(&value.to_s());
            Ok(())
        }
        Part::ForExpr { iterable, params, body } => render_for(iterable, params, body, scope, buf, depth),
        Part::IfExpr { branches, else_body } => render_if(branches, else_body.as_deref(), scope, buf, depth),
    }
}

fn render_for(
    iterable: &crate::ast::Node,
    params: &[Symbol],
    body: &Part,
    scope: &Scope,
    buf: &mut String,
    depth: usize,
) -> Result<()> {
    let collection = eval_node(iterable, scope, depth + 1)?;
    let mut failure = None;
    let iterated = for_each_item(&collection, depth, &mut |item| {
        let child = scope.push();
        bind_loop_params(&child, params, &item);
        match render_into(body, &child, buf, depth + 1) {
            Ok(()) => Ok(true),
            Err(e) => {
                failure = Some(e);
                Ok(false)
            }
        }
    });
    // A value with no `each` method at all is not an Enumerable, which is
    // reported as `TypeError` rather than the `NoMethodError`
    // `for_each_item` raises for dispatch on `each` itself.
    match iterated {
        Err(crate::error::Error::NoMethod { name, .. }) if name == "each" => {
            return Err(crate::error::Error::type_error(format!(
                "no implicit conversion of {} into an Enumerable",
                collection.type_name()
            )));
        }
        Err(e) => return Err(e),
        Ok(()) => {}
    }
    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Destructures a yielded element across `for`-loop parameter names: a
/// single parameter binds the whole element; multiple parameters expect
/// an `Array` element and bind positionally, padding missing trailing
/// elements with `nil`.
fn bind_loop_params(scope: &Scope, params: &[Symbol], item: &Value) {
    match params {
        [] => {}
        [only] => scope.set(*only, item.clone()),
        many => {
            let parts = match item {
                Value::Array(a) => a.items.borrow().clone(),
                other => vec![other.clone()],
            };
            for (i, name) in many.iter().enumerate() {
                scope.set(*name, parts.get(i).cloned().unwrap_or(Value::Nil));
            }
        }
    }
}

fn render_if(
    branches: &[(crate::ast::Node, Part)],
    else_body: Option<&Part>,
    scope: &Scope,
    buf: &mut String,
    depth: usize,
) -> Result<()> {
    for (cond, body) in branches {
        if eval_node(cond, scope, depth + 1)?.truthy() {
            return render_into(body, scope, buf, depth + 1);
        }
    }
    if let Some(else_body) = else_body {
        render_into(else_body, scope, buf, depth + 1)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinOp, Node};
    use crate::value::{make_number, ViewModel};
    use std::rc::Rc;

    #[derive(Debug)]
    struct Empty;
    impl ViewModel for Empty {
        fn call(&self, _name: &str, _args: &[Value]) -> Option<Result<Value>> {
            None
        }
    }

    fn scope() -> Scope {
        Scope::new(Rc::new(Empty))
    }

    #[test]
    fn text_and_output_expr_concatenate_in_order() {
        let part = Part::PartsList(vec![
            Part::text("count: "),
            Part::OutputExpr(Node::BinOp(
                BinOp::Add,
                Box::new(Node::literal(Value::Number(make_number(1.0)))),
                Box::new(Node::literal(Value::Number(make_number(2.0)))),
            )),
        ]);
        assert_eq!(render(&part, &scope()).unwrap(), "count: 3");
    }

    #[test]
    fn for_expr_renders_body_once_per_element_with_fresh_bindings() {
        let x = Symbol::intern("x");
        let part = Part::ForExpr {
            iterable: Node::ArrayLit(vec![
                Node::literal(Value::Number(make_number(1.0))),
                Node::literal(Value::Number(make_number(2.0))),
                Node::literal(Value::Number(make_number(3.0))),
            ]),
            params: vec![x],
            body: Box::new(Part::PartsList(vec![
                Part::text("<p>"),
                Part::OutputExpr(Node::LocalRead(x)),
                Part::text("</p>"),
            ])),
        };
        assert_eq!(render(&part, &scope()).unwrap(), "<p>1</p><p>2</p><p>3</p>");
    }

    #[test]
    fn if_expr_falls_through_to_else_when_every_branch_is_falsy() {
        let part = Part::IfExpr {
            branches: vec![(Node::literal(Value::Boolean(false)), Part::text("yes"))],
            else_body: Some(Box::new(Part::text("no"))),
        };
        assert_eq!(render(&part, &scope()).unwrap(), "no");
    }

    #[test]
    fn for_expr_with_two_params_destructures_array_elements() {
        let k = Symbol::intern("k");
        let v = Symbol::intern("v");
        let part = Part::ForExpr {
            iterable: Node::literal(Value::hash(vec![(Value::string("a"), Value::Number(make_number(1.0)))])),
            params: vec![k, v],
            body: Box::new(Part::PartsList(vec![
                Part::OutputExpr(Node::LocalRead(k)),
                Part::text("="),
                Part::OutputExpr(Node::LocalRead(v)),
                Part::text(";"),
            ])),
        };
        assert_eq!(render(&part, &scope()).unwrap(), "a=1;");
    }
}
