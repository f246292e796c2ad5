//! The expression AST.
//!
//! Node shapes are grounded structurally on
//! `navicore-cem3/compiler/src/ast.rs` (an `Identifier`-carrying, source
//! position-aware tree), trimmed to the operator/node set this language
//! needs — no type annotations, no effect rows, none of `cem3`'s
//! static-typing machinery (this is a dynamically typed language; static
//! typing of expressions is out of scope).

use std::rc::Rc;

use strum::IntoStaticStr;

use crate::intern::Symbol;
use crate::value::Value;

/// A binary operator, desugared to a method name at eval time. The
/// enum-to-dispatch-string mapping uses `strum`'s `IntoStaticStr`, the same
/// pattern `crates/monty/src/value.rs` uses for its `Attr` enum (a
/// per-variant `#[strum(serialize = ..)]` name, resolved to `&'static str`
/// with no allocation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr)]
pub enum BinOp {
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "-")]
    Sub,
    #[strum(serialize = "*")]
    Mul,
    #[strum(serialize = "/")]
    Div,
    #[strum(serialize = "%")]
    Mod,
    #[strum(serialize = "**")]
    Pow,
    #[strum(serialize = "<<")]
    ShiftL,
    #[strum(serialize = ">>")]
    ShiftR,
    #[strum(serialize = "&")]
    BitAnd,
    #[strum(serialize = "|")]
    BitOr,
    #[strum(serialize = "^")]
    BitXor,
    #[strum(serialize = "<")]
    Lt,
    #[strum(serialize = "<=")]
    Le,
    #[strum(serialize = ">")]
    Gt,
    #[strum(serialize = ">=")]
    Ge,
    #[strum(serialize = "==")]
    Eq,
    #[strum(serialize = "!=")]
    Ne,
    #[strum(serialize = "<=>")]
    Cmp,
    #[strum(serialize = "&&")]
    And,
    #[strum(serialize = "||")]
    Or,
}

impl BinOp {
    /// The method name this operator desugars to, except `&&`/`||` which
    /// never dispatch (they short-circuit in `eval`).
    pub fn method_name(self) -> &'static str {
        self.into()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr)]
pub enum UnOp {
    #[strum(serialize = "-@")]
    Neg,
    #[strum(serialize = "!")]
    Not,
    #[strum(serialize = "~")]
    BitNot,
}

impl UnOp {
    pub fn method_name(self) -> &'static str {
        self.into()
    }
}

/// A parsed block attached to a method call: `{|p1, p2| body}` or
/// `do |p1, p2| body end`.
#[derive(Debug, Clone)]
pub struct Block {
    pub params: Vec<Symbol>,
    pub body: Rc<Node>,
}

/// One expression AST node.
#[derive(Debug, Clone)]
pub enum Node {
    Literal(Value),
    ArrayLit(Vec<Node>),
    HashLit(Vec<(Node, Node)>),
    /// A bare identifier already known (at parse time) to be a local
    /// variable, per the parser's threaded set of known local names.
    LocalRead(Symbol),
    LocalWrite(Symbol, Box<Node>),
    /// `receiver.name(args) [block]`. `receiver: None` means "the implicit
    /// receiver" (`self`, i.e. a bare identifier resolved as a zero-arg
    /// method call, or an operator's implicit LHS dispatch).
    MethodCall {
        receiver: Option<Box<Node>>,
        name: String,
        args: Vec<Node>,
        block: Option<Block>,
    },
    Index {
        receiver: Box<Node>,
        args: Vec<Node>,
    },
    BinOp(BinOp, Box<Node>, Box<Node>),
    UnOp(UnOp, Box<Node>),
    Ternary(Box<Node>, Box<Node>, Box<Node>),
}

impl Node {
    pub fn literal(v: Value) -> Self {
        Node::Literal(v)
    }
}
