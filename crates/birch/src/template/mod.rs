//! The template part tree, pinned from
//! `examples/original_source/include/slim/template/TemplateParts.hpp`: five
//! node kinds, each with an inert `to_string()` pretty-printer independent
//! of `render`. Building the HTML-specific line lexer and tag builder that
//! would normally produce this tree from `.slim` source is out of scope —
//! callers construct a `Part` tree directly, the way a host template
//! compiler would hand one to this crate.

mod render;

pub use render::render;

use std::fmt;

use crate::ast::Node;
use crate::intern::Symbol;

/// One node of a parsed template body.
#[derive(Debug, Clone)]
pub enum Part {
    /// A sequence of parts rendered/stringified in order
    /// (`TemplatePartsList`).
    PartsList(Vec<Part>),
    /// Literal text emitted as-is (`TemplateText`).
    Text(String),
    /// `expr`, evaluated and its `to_s()` written to the output
    /// (`TemplateOutputExpr`).
    OutputExpr(Node),
    /// `for param(s) in iterable: body`, one child-scope render per
    /// yielded element (`TemplateForExpr`).
    ForExpr {
        iterable: Node,
        params: Vec<Symbol>,
        body: Box<Part>,
    },
    /// `if cond: body (elsif cond: body)* (else: body)?`
    /// (`TemplateIfExpr`/`TemplateCondExpr`). `branches` holds the `if` arm
    /// followed by every `elsif` arm in source order.
    IfExpr {
        branches: Vec<(Node, Part)>,
        else_body: Option<Box<Part>>,
    },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text(text.into())
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Part::PartsList(parts) => {
                for p in parts {
                    write!(f, "{p}")?;
                }
                Ok(())
            }
            Part::Text(t) => write!(f, "{t}"),
            Part::OutputExpr(_) => write!(f, "#{{...}}"),
            Part::ForExpr { body, .. } => write!(f, "for ... in ...\n{body}"),
            Part::IfExpr { branches, else_body } => {
                for (i, (_, body)) in branches.iter().enumerate() {
                    let kw = if i == 0 { "if" } else { "elsif" };
                    write!(f, "{kw} ...\n{body}")?;
                }
                if let Some(else_body) = else_body {
                    write!(f, "else\n{else_body}")?;
                }
                Ok(())
            }
        }
    }
}
