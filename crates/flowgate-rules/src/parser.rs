//! Parser descendente recursivo.
//!
//! ```text
//! or    := and (('||' | 'or') and)*
//! and   := unary (('&&' | 'and') unary)*
//! unary := ('!' | 'not') unary | cmp
//! cmp   := operand (op operand)?
//! operand := '-' operand | atom
//! atom  := number | string | true | false | null | ident | '(' or ')'
//! ```
//!
//! La negación lógica cubre la comparación completa: `!a > 1` es `!(a > 1)`.
//! El anidamiento (`!`, `-`, paréntesis) está acotado por [`MAX_DEPTH`].

use serde_json::Value;

use crate::error::RuleError;
use crate::lexer::{tokenize, Spanned, Token};

pub const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CmpOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Value),
    Var(String),
    Not(Box<Expr>),
    Neg(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Cmp(CmpOp, Box<Expr>, Box<Expr>),
}

pub fn parse(src: &str) -> Result<Expr, RuleError> {
    let tokens = tokenize(src)?;
    if tokens.is_empty() {
        return Err(RuleError::parse(0, "empty condition"));
    }
    let mut p = Parser { tokens,
                         pos: 0,
                         depth: 0,
                         len: src.len() };
    let expr = p.or()?;
    match p.peek() {
        None => Ok(expr),
        Some((off, tok)) => Err(RuleError::parse(*off, format!("unexpected token {tok:?}"))),
    }
}

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    depth: usize,
    len: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Spanned> {
        self.tokens.get(self.pos)
    }

    fn offset(&self) -> usize {
        self.peek().map(|(o, _)| *o).unwrap_or(self.len)
    }

    /// Entra un nivel de anidamiento; falla al superar `MAX_DEPTH`.
    fn nested<T>(&mut self, offset: usize, f: impl FnOnce(&mut Self) -> Result<T, RuleError>) -> Result<T, RuleError> {
        if self.depth >= MAX_DEPTH {
            return Err(RuleError::parse(offset, format!("nesting deeper than {MAX_DEPTH}")));
        }
        self.depth += 1;
        let out = f(self);
        self.depth -= 1;
        out
    }

    fn eat(&mut self, tok: &Token) -> bool {
        if matches!(self.peek(), Some((_, t)) if t == tok) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn or(&mut self) -> Result<Expr, RuleError> {
        let mut left = self.and()?;
        while self.eat(&Token::Or) {
            let right = self.and()?;
            left = Expr::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn and(&mut self) -> Result<Expr, RuleError> {
        let mut left = self.unary()?;
        while self.eat(&Token::And) {
            let right = self.unary()?;
            left = Expr::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn unary(&mut self) -> Result<Expr, RuleError> {
        let offset = self.offset();
        if self.eat(&Token::Not) {
            return self.nested(offset, |p| Ok(Expr::Not(Box::new(p.unary()?))));
        }
        self.cmp()
    }

    fn cmp(&mut self) -> Result<Expr, RuleError> {
        let left = self.operand()?;
        let op = match self.peek() {
            Some((_, Token::Eq)) => CmpOp::Eq,
            Some((_, Token::Ne)) => CmpOp::Ne,
            Some((_, Token::Lt)) => CmpOp::Lt,
            Some((_, Token::Le)) => CmpOp::Le,
            Some((_, Token::Gt)) => CmpOp::Gt,
            Some((_, Token::Ge)) => CmpOp::Ge,
            _ => return Ok(left),
        };
        self.pos += 1;
        let right = self.operand()?;
        Ok(Expr::Cmp(op, Box::new(left), Box::new(right)))
    }

    fn operand(&mut self) -> Result<Expr, RuleError> {
        let offset = self.offset();
        if self.eat(&Token::Minus) {
            return self.nested(offset, |p| Ok(Expr::Neg(Box::new(p.operand()?))));
        }
        self.atom()
    }

    fn atom(&mut self) -> Result<Expr, RuleError> {
        let offset = self.offset();
        let Some((_, tok)) = self.tokens.get(self.pos).cloned() else {
            return Err(RuleError::parse(offset, "unexpected end of condition"));
        };
        self.pos += 1;
        match tok {
            Token::Number(n) => Ok(Expr::Literal(number(offset, n)?)),
            Token::Str(s) => Ok(Expr::Literal(Value::String(s))),
            Token::True => Ok(Expr::Literal(Value::Bool(true))),
            Token::False => Ok(Expr::Literal(Value::Bool(false))),
            Token::Null => Ok(Expr::Literal(Value::Null)),
            Token::Ident(name) => Ok(Expr::Var(name)),
            Token::LParen => {
                let inner = self.nested(offset, Self::or)?;
                if !self.eat(&Token::RParen) {
                    return Err(RuleError::parse(self.offset(), "expected ')'"));
                }
                Ok(inner)
            }
            other => Err(RuleError::parse(offset, format!("unexpected token {other:?}"))),
        }
    }
}

/// Enteros exactos se conservan como enteros JSON.
fn number(offset: usize, n: f64) -> Result<Value, RuleError> {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        return Ok(Value::from(n as i64));
    }
    serde_json::Number::from_f64(n).map(Value::Number)
                                   .ok_or_else(|| RuleError::parse(offset, "number out of range"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn precedence_and_binds_tighter_than_or() {
        let e = parse("a || b && c").unwrap();
        assert_eq!(e,
                   Expr::Or(Box::new(Expr::Var("a".into())),
                            Box::new(Expr::And(Box::new(Expr::Var("b".into())), Box::new(Expr::Var("c".into()))))));
    }

    #[test]
    fn comparison_with_negative_literal() {
        let e = parse("delta > -3").unwrap();
        assert_eq!(e,
                   Expr::Cmp(CmpOp::Gt,
                             Box::new(Expr::Var("delta".into())),
                             Box::new(Expr::Neg(Box::new(Expr::Literal(json!(3)))))));
    }

    #[test]
    fn not_covers_whole_comparison() {
        let e = parse("not a > 1").unwrap();
        assert_eq!(e,
                   Expr::Not(Box::new(Expr::Cmp(CmpOp::Gt,
                                                Box::new(Expr::Var("a".into())),
                                                Box::new(Expr::Literal(json!(1)))))));
    }

    #[test]
    fn oversized_literal_never_becomes_null() {
        let src = format!("x == {}", "9".repeat(400));
        assert_eq!(parse(&src).unwrap_err(), RuleError::parse(5, "number out of range"));
        assert!(matches!(parse("x == 1e999"), Err(RuleError::Parse { .. })));
    }

    #[test]
    fn deep_nesting_is_an_error_not_an_overflow() {
        let bangs = format!("{}a", "!".repeat(10_000));
        assert!(matches!(parse(&bangs), Err(RuleError::Parse { offset: 64, .. })));
        let parens = format!("{}a{}", "(".repeat(10_000), ")".repeat(10_000));
        assert!(matches!(parse(&parens), Err(RuleError::Parse { offset: 64, .. })));
        let minus = format!("x > {}1", "-".repeat(10_000));
        assert!(matches!(parse(&minus), Err(RuleError::Parse { .. })));
        assert!(parse(&format!("{}a{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH))).is_ok());
    }

    #[test]
    fn errors_point_at_offending_token() {
        assert!(matches!(parse(""), Err(RuleError::Parse { offset: 0, .. })));
        assert!(matches!(parse("(a > 1"), Err(RuleError::Parse { offset: 6, .. })));
        assert!(matches!(parse("a > 1 b"), Err(RuleError::Parse { offset: 6, .. })));
        assert!(matches!(parse("a >"), Err(RuleError::Parse { offset: 3, .. })));
    }
}
