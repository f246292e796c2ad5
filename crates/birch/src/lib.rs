//! A small Ruby/Slim-flavored expression language and template render
//! core.
//!
//! The public surface mirrors `crates/monty/src/lib.rs`: one line per
//! re-exported item, modules declared up top. `eval_source` parses and
//! evaluates one expression; `render` walks a pre-built `template::Part`
//! tree. Neither function logs or retries — every failure is a plain
//! `Err` returned to the caller.

pub mod ast;
pub mod error;
pub mod eval;
pub mod intern;
pub mod lexer;
pub mod methods;
pub mod parser;
pub mod scope;
pub mod template;
pub mod token;
pub mod value;

pub use error::{Error, Result};
pub use eval::{call_proc, eval_node};
pub use intern::Symbol;
pub use parser::parse;
pub use scope::Scope;
pub use template::{render, Part};
pub use value::{Value, ViewModel};

/// Parses and evaluates `source` as a single expression against `scope`'s
/// already-bound locals.
pub fn eval_source(source: &str, scope: &Scope) -> Result<Value> {
    let locals = scope.bound_names();
    let node = parser::parse(source, &locals)?;
    eval::eval_node(&node, scope, 0)
}
