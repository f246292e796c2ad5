//! The recursive-descent, precedence-climbing expression parser.
//!
//! Grounded structurally on `navicore-cem3/compiler/src/parser.rs`'s
//! Pratt-style `parse_expr`/`parse_binary` split, here walking a twelve-level
//! precedence table (tightest to loosest: primary/postfix incl. `**` →
//! `* / %` → `+ -` → `<< >>` → `&` → `| ^` → relational → equality → `&&` →
//! `||` → ternary). Keywords (`true`, `false`, `nil`, `do`, `end`) are not
//! distinct tokens — the lexer has no keyword concept — they're ordinary
//! `Token::Symbol` text the parser recognizes by value, matching the
//! minimal token set in `token.rs`.

use ahash::AHashSet;

use crate::ast::{BinOp, Block, Node, UnOp};
use crate::error::{Error, Result};
use crate::intern::Symbol;
use crate::lexer::Lexer;
use crate::token::Token;

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    /// Stack of name sets already known to be locals at this point in the
    /// parse, innermost (current block) last. A bare identifier resolves
    /// to `LocalRead` if it's in any frame, else to an implicit-receiver
    /// method call.
    known_locals: Vec<AHashSet<Symbol>>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, preregistered_locals: &[Symbol]) -> Result<Self> {
        let mut lexer = Lexer::new(source);
        let current = lexer.next()?;
        Ok(Parser {
            lexer,
            current,
            known_locals: vec![preregistered_locals.iter().copied().collect()],
        })
    }

    /// Parses one full expression, erroring if input remains afterward.
    pub fn parse_expression(&mut self) -> Result<Node> {
        let node = self.ternary()?;
        if self.current != Token::End {
            return Err(self.err(format!("unexpected trailing {}", self.current.describe())));
        }
        Ok(node)
    }

    fn err(&self, message: impl Into<String>) -> Error {
        Error::syntax(message, self.lexer.position())
    }

    fn advance(&mut self) -> Result<Token> {
        let next = self.lexer.next()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn advance_method_name(&mut self) -> Result<Token> {
        let next = self.lexer.next_method_name()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn expect(&mut self, tok: &Token) -> Result<()> {
        if &self.current == tok {
            self.advance()?;
            Ok(())
        } else {
            Err(self.err(format!(
                "expected {}, found {}",
                tok.describe(),
                self.current.describe()
            )))
        }
    }

    fn is_local(&self, name: Symbol) -> bool {
        self.known_locals.iter().rev().any(|frame| frame.contains(&name))
    }

    fn ternary(&mut self) -> Result<Node> {
        let cond = self.or()?;
        if self.current == Token::Question {
            self.advance()?;
            let then_branch = self.ternary()?;
            self.expect(&Token::Colon)?;
            let else_branch = self.ternary()?;
            Ok(Node::Ternary(Box::new(cond), Box::new(then_branch), Box::new(else_branch)))
        } else {
            Ok(cond)
        }
    }

    fn or(&mut self) -> Result<Node> {
        let mut node = self.and()?;
        while self.current == Token::LogicalOr {
            self.advance()?;
            let rhs = self.and()?;
            node = Node::BinOp(BinOp::Or, Box::new(node), Box::new(rhs));
        }
        Ok(node)
    }

    fn and(&mut self) -> Result<Node> {
        let mut node = self.equality()?;
        while self.current == Token::LogicalAnd {
            self.advance()?;
            let rhs = self.equality()?;
            node = Node::BinOp(BinOp::And, Box::new(node), Box::new(rhs));
        }
        Ok(node)
    }

    fn equality(&mut self) -> Result<Node> {
        let mut node = self.relational()?;
        loop {
            let op = match self.current {
                Token::CmpEq => BinOp::Eq,
                Token::CmpNe => BinOp::Ne,
                Token::Cmp => BinOp::Cmp,
                _ => break,
            };
            self.advance()?;
            let rhs = self.relational()?;
            node = Node::BinOp(op, Box::new(node), Box::new(rhs));
        }
        Ok(node)
    }

    fn relational(&mut self) -> Result<Node> {
        let mut node = self.bitor()?;
        loop {
            let op = match self.current {
                Token::CmpLt => BinOp::Lt,
                Token::CmpLe => BinOp::Le,
                Token::CmpGt => BinOp::Gt,
                Token::CmpGe => BinOp::Ge,
                _ => break,
            };
            self.advance()?;
            let rhs = self.bitor()?;
            node = Node::BinOp(op, Box::new(node), Box::new(rhs));
        }
        Ok(node)
    }

    fn bitor(&mut self) -> Result<Node> {
        let mut node = self.bitand()?;
        loop {
            let op = match self.current {
                Token::Bar => BinOp::BitOr,
                Token::Caret => BinOp::BitXor,
                _ => break,
            };
            self.advance()?;
            let rhs = self.bitand()?;
            node = Node::BinOp(op, Box::new(node), Box::new(rhs));
        }
        Ok(node)
    }

    fn bitand(&mut self) -> Result<Node> {
        let mut node = self.shift()?;
        while self.current == Token::Amp {
            self.advance()?;
            let rhs = self.shift()?;
            node = Node::BinOp(BinOp::BitAnd, Box::new(node), Box::new(rhs));
        }
        Ok(node)
    }

    fn shift(&mut self) -> Result<Node> {
        let mut node = self.additive()?;
        loop {
            let op = match self.current {
                Token::ShiftL => BinOp::ShiftL,
                Token::ShiftR => BinOp::ShiftR,
                _ => break,
            };
            self.advance()?;
            let rhs = self.additive()?;
            node = Node::BinOp(op, Box::new(node), Box::new(rhs));
        }
        Ok(node)
    }

    fn additive(&mut self) -> Result<Node> {
        let mut node = self.multiplicative()?;
        loop {
            let op = match self.current {
                Token::Plus => BinOp::Add,
                Token::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance()?;
            let rhs = self.multiplicative()?;
            node = Node::BinOp(op, Box::new(node), Box::new(rhs));
        }
        Ok(node)
    }

    fn multiplicative(&mut self) -> Result<Node> {
        let mut node = self.unary()?;
        loop {
            let op = match self.current {
                Token::Mul => BinOp::Mul,
                Token::Div => BinOp::Div,
                Token::Mod => BinOp::Mod,
                _ => break,
            };
            self.advance()?;
            let rhs = self.unary()?;
            node = Node::BinOp(op, Box::new(node), Box::new(rhs));
        }
        Ok(node)
    }

    /// Unary operators bind looser than `**` (`-2 ** 2` parses as
    /// `-(2 ** 2)`), so this falls through to `power` whenever the current
    /// token isn't itself a unary operator.
    fn unary(&mut self) -> Result<Node> {
        let op = match self.current {
            Token::Minus => Some(UnOp::Neg),
            Token::LogicalNot => Some(UnOp::Not),
            Token::Tilde => Some(UnOp::BitNot),
            _ => None,
        };
        match op {
            Some(op) => {
                self.advance()?;
                let operand = self.unary()?;
                Ok(Node::UnOp(op, Box::new(operand)))
            }
            None => self.power(),
        }
    }

    fn power(&mut self) -> Result<Node> {
        let base = self.postfix()?;
        if self.current == Token::StarStar {
            self.advance()?;
            let exponent = self.unary()?;
            Ok(Node::BinOp(BinOp::Pow, Box::new(base), Box::new(exponent)))
        } else {
            Ok(base)
        }
    }

    fn postfix(&mut self) -> Result<Node> {
        let mut node = self.primary()?;
        loop {
            match self.current {
                Token::Dot => {
                    self.advance_method_name()?;
                    let name = match self.advance()? {
                        Token::Symbol(s) => s,
                        other => return Err(self.err(format!("expected a method name, found {}", other.describe()))),
                    };
                    let args = self.call_args()?;
                    let block = self.block()?;
                    node = Node::MethodCall {
                        receiver: Some(Box::new(node)),
                        name,
                        args,
                        block,
                    };
                }
                Token::LBracket => {
                    self.advance()?;
                    let args = self.comma_separated(&Token::RBracket)?;
                    self.expect(&Token::RBracket)?;
                    node = Node::Index {
                        receiver: Box::new(node),
                        args,
                    };
                }
                _ => break,
            }
        }
        Ok(node)
    }

    /// Parenthesized call arguments, if present: `(a, b)`. Returns an empty
    /// list if there is no `(` at all (`receiver.name` with no parens is a
    /// zero-arg call).
    fn call_args(&mut self) -> Result<Vec<Node>> {
        if self.current != Token::LParen {
            return Ok(Vec::new());
        }
        self.advance()?;
        let args = self.comma_separated(&Token::RParen)?;
        self.expect(&Token::RParen)?;
        Ok(args)
    }

    fn comma_separated(&mut self, terminator: &Token) -> Result<Vec<Node>> {
        let mut out = Vec::new();
        if &self.current == terminator {
            return Ok(out);
        }
        loop {
            out.push(self.ternary()?);
            if self.current == Token::Comma {
                self.advance()?;
            } else {
                break;
            }
        }
        Ok(out)
    }

    /// An optional block attached to a call: `{ |a, b| body }` or
    /// `do |a, b| body end`. Brace blocks are only reachable here, in
    /// postfix position right after a call's arguments — never in
    /// `primary`, where a bare `{` instead starts a Hash literal.
    fn block(&mut self) -> Result<Option<Block>> {
        if self.current == Token::LBrace {
            self.advance()?;
            let block = self.block_body()?;
            self.expect(&Token::RBrace)?;
            Ok(Some(block))
        } else if self.is_keyword("do") {
            self.advance()?;
            let block = self.block_body_keyword("end")?;
            Ok(Some(block))
        } else {
            Ok(None)
        }
    }

    fn is_keyword(&self, kw: &str) -> bool {
        matches!(&self.current, Token::Symbol(s) if s == kw)
    }

    fn block_params(&mut self) -> Result<Vec<Symbol>> {
        if self.current != Token::Bar {
            return Ok(Vec::new());
        }
        self.advance()?;
        let mut params = Vec::new();
        if self.current != Token::Bar {
            loop {
                match self.advance()? {
                    Token::Symbol(s) => params.push(Symbol::intern(&s)),
                    other => return Err(self.err(format!("expected a parameter name, found {}", other.describe()))),
                }
                if self.current == Token::Comma {
                    self.advance()?;
                } else {
                    break;
                }
            }
        }
        self.expect(&Token::Bar)?;
        Ok(params)
    }

    fn block_body(&mut self) -> Result<Block> {
        let params = self.block_params()?;
        self.known_locals.push(params.iter().copied().collect());
        let result = self.ternary();
        self.known_locals.pop();
        Ok(Block {
            params,
            body: std::rc::Rc::new(result?),
        })
    }

    fn block_body_keyword(&mut self, end_keyword: &str) -> Result<Block> {
        let params = self.block_params()?;
        self.known_locals.push(params.iter().copied().collect());
        let result = self.ternary();
        self.known_locals.pop();
        let body = result?;
        if !self.is_keyword(end_keyword) {
            return Err(self.err(format!("expected `{end_keyword}`, found {}", self.current.describe())));
        }
        self.advance()?;
        Ok(Block {
            params,
            body: std::rc::Rc::new(body),
        })
    }

    fn primary(&mut self) -> Result<Node> {
        match self.advance()? {
            Token::Number(text) => {
                let v: f64 = text.parse().map_err(|_| self.err(format!("invalid number literal `{text}`")))?;
                Ok(Node::literal(crate::value::Value::Number(crate::value::make_number(v))))
            }
            Token::String(text) => Ok(Node::literal(crate::value::Value::string(text))),
            Token::Colon => match self.advance()? {
                Token::Symbol(s) => Ok(Node::literal(crate::value::Value::symbol(&s))),
                other => Err(self.err(format!("expected a symbol name, found {}", other.describe()))),
            },
            Token::LParen => {
                let inner = self.ternary()?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            Token::LBracket => {
                let items = self.comma_separated(&Token::RBracket)?;
                self.expect(&Token::RBracket)?;
                Ok(Node::ArrayLit(items))
            }
            Token::LBrace => {
                let pairs = self.hash_pairs()?;
                self.expect(&Token::RBrace)?;
                Ok(Node::HashLit(pairs))
            }
            Token::Symbol(text) => self.identifier_primary(text),
            other => Err(self.err(format!("unexpected {}", other.describe()))),
        }
    }

    fn identifier_primary(&mut self, text: String) -> Result<Node> {
        match text.as_str() {
            "true" => return Ok(Node::literal(crate::value::Value::Boolean(true))),
            "false" => return Ok(Node::literal(crate::value::Value::Boolean(false))),
            "nil" => return Ok(Node::literal(crate::value::Value::Nil)),
            _ => {}
        }
        let sym = Symbol::intern(&text);
        if self.is_local(sym) {
            return Ok(Node::LocalRead(sym));
        }
        let args = self.call_args()?;
        let block = self.block()?;
        Ok(Node::MethodCall {
            receiver: None,
            name: text,
            args,
            block,
        })
    }

    fn hash_pairs(&mut self) -> Result<Vec<(Node, Node)>> {
        let mut out = Vec::new();
        if self.current == Token::RBrace {
            return Ok(out);
        }
        loop {
            let key = self.ternary()?;
            self.expect(&Token::Assign)?;
            self.expect(&Token::CmpGt)?;
            let value = self.ternary()?;
            out.push((key, value));
            if self.current == Token::Comma {
                self.advance()?;
            } else {
                break;
            }
        }
        Ok(out)
    }
}

/// Parses `source` as a complete expression. `preregistered_locals` is
/// typically a template scope's already-bound names (`Scope::bound_names`),
/// so references to enclosing `for`-loop variables resolve as `LocalRead`
/// rather than implicit method calls.
pub fn parse(source: &str, preregistered_locals: &[Symbol]) -> Result<Node> {
    Parser::new(source, preregistered_locals)?.parse_expression()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(src: &str) -> Node {
        parse(src, &[]).unwrap()
    }

    #[test]
    fn arithmetic_precedence_binds_mul_tighter_than_add() {
        let node = parse_ok("1 + 2 * 3");
        match node {
            Node::BinOp(BinOp::Add, _, rhs) => {
                assert!(matches!(*rhs, Node::BinOp(BinOp::Mul, _, _)));
            }
            _ => panic!("expected Add at the top"),
        }
    }

    #[test]
    fn unary_minus_binds_looser_than_power() {
        let node = parse_ok("-2 ** 2");
        match node {
            Node::UnOp(UnOp::Neg, inner) => {
                assert!(matches!(*inner, Node::BinOp(BinOp::Pow, _, _)));
            }
            _ => panic!("expected a top-level Neg"),
        }
    }

    #[test]
    fn bare_identifier_not_in_scope_is_an_implicit_call() {
        let node = parse_ok("greeting");
        match node {
            Node::MethodCall { receiver: None, name, .. } => assert_eq!(name, "greeting"),
            _ => panic!("expected an implicit-receiver call"),
        }
    }

    #[test]
    fn preregistered_local_resolves_to_local_read() {
        let name = Symbol::intern("x");
        let node = Parser::new("x", &[name]).unwrap().parse_expression().unwrap();
        assert!(matches!(node, Node::LocalRead(sym) if sym == name));
    }

    #[test]
    fn block_params_are_local_only_within_the_block() {
        let node = parse_ok("items.map { |x| x }");
        match node {
            Node::MethodCall { block: Some(b), .. } => {
                assert_eq!(b.params.len(), 1);
                assert!(matches!(*b.body, Node::LocalRead(_)));
            }
            _ => panic!("expected a call with a block"),
        }
    }

    #[test]
    fn do_end_block_is_equivalent_to_braces() {
        let node = parse_ok("items.each do |x| x end");
        assert!(matches!(node, Node::MethodCall { block: Some(_), .. }));
    }

    #[test]
    fn hash_literal_parses_fat_arrow_pairs() {
        let node = parse_ok("{ 1 => 2, 3 => 4 }");
        match node {
            Node::HashLit(pairs) => assert_eq!(pairs.len(), 2),
            _ => panic!("expected a hash literal"),
        }
    }

    #[test]
    fn ternary_is_right_associative_via_recursive_branches() {
        let node = parse_ok("true ? 1 : false ? 2 : 3");
        assert!(matches!(node, Node::Ternary(_, _, _)));
    }

    #[test]
    fn trailing_garbage_after_expression_is_a_syntax_error() {
        assert!(parse("1 2", &[]).is_err());
    }
}
