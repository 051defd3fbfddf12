//! Tokenizador de condiciones.

use crate::error::RuleError;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Str(String),
    Ident(String),
    True,
    False,
    Null,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Not,
    Minus,
    LParen,
    RParen,
}

/// Token con su offset en bytes dentro de la expresión.
pub type Spanned = (usize, Token);

pub fn tokenize(src: &str) -> Result<Vec<Spanned>, RuleError> {
    let bytes = src.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i] as char;
        let start = i;
        match c {
            c if c.is_ascii_whitespace() => {
                i += 1;
                continue;
            }
            '(' => out.push((start, Token::LParen)),
            ')' => out.push((start, Token::RParen)),
            '-' => out.push((start, Token::Minus)),
            '=' | '!' | '<' | '>' => {
                let eq_next = bytes.get(i + 1) == Some(&b'=');
                let tok = match (c, eq_next) {
                    ('=', true) => Token::Eq,
                    ('!', true) => Token::Ne,
                    ('<', true) => Token::Le,
                    ('>', true) => Token::Ge,
                    ('!', false) => Token::Not,
                    ('<', false) => Token::Lt,
                    ('>', false) => Token::Gt,
                    _ => return Err(RuleError::parse(start, "expected '=='")),
                };
                if eq_next {
                    i += 1;
                }
                out.push((start, tok));
            }
            '&' | '|' => {
                if bytes.get(i + 1) != Some(&bytes[i]) {
                    return Err(RuleError::parse(start, format!("expected '{c}{c}'")));
                }
                i += 1;
                out.push((start, if c == '&' { Token::And } else { Token::Or }));
            }
            '"' | '\'' => {
                let (s, next) = lex_string(src, i)?;
                out.push((start, Token::Str(s)));
                i = next;
                continue;
            }
            c if c.is_ascii_digit() => {
                let mut end = i;
                while end < bytes.len() && (bytes[end].is_ascii_digit() || bytes[end] == b'.') {
                    end += 1;
                }
                let text = &src[i..end];
                let n = text.parse::<f64>()
                            .map_err(|_| RuleError::parse(start, format!("invalid number '{text}'")))?;
                if !n.is_finite() {
                    return Err(RuleError::parse(start, "number out of range"));
                }
                out.push((start, Token::Number(n)));
                i = end;
                continue;
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut end = i;
                while end < bytes.len() && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'_' || bytes[end] == b'.') {
                    end += 1;
                }
                let word = &src[i..end];
                out.push((start, keyword(word)));
                i = end;
                continue;
            }
            other => return Err(RuleError::parse(start, format!("unexpected character '{other}'"))),
        }
        i += 1;
    }
    Ok(out)
}

fn keyword(word: &str) -> Token {
    match word {
        "true" => Token::True,
        "false" => Token::False,
        "null" => Token::Null,
        "and" => Token::And,
        "or" => Token::Or,
        "not" => Token::Not,
        _ => Token::Ident(word.to_string()),
    }
}

/// Lee un string entre comillas (simples o dobles) con escapes `\\`, `\"`,
/// `\'`, `\n`, `\t` y `\r`. Devuelve el contenido y el offset posterior a
/// la comilla de cierre.
fn lex_string(src: &str, open: usize) -> Result<(String, usize), RuleError> {
    let quote = src.as_bytes()[open] as char;
    let mut out = String::new();
    let mut chars = src[open + 1..].char_indices();
    while let Some((off, ch)) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some((_, 'n')) => out.push('\n'),
                Some((_, 't')) => out.push('\t'),
                Some((_, 'r')) => out.push('\r'),
                Some((_, esc @ ('\\' | '"' | '\''))) => out.push(esc),
                Some((esc_off, esc)) => {
                    return Err(RuleError::parse(open + 1 + esc_off, format!("unknown escape '\\{esc}'")))
                }
                None => break,
            },
            c if c == quote => return Ok((out, open + 1 + off + 1)),
            c => out.push(c),
        }
    }
    Err(RuleError::parse(open, "unterminated string"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<Token> {
        tokenize(src).unwrap().into_iter().map(|(_, t)| t).collect()
    }

    #[test]
    fn operators_and_literals() {
        assert_eq!(kinds("a.b >= 10.5 && !ok || x != 'y'"),
                   vec![Token::Ident("a.b".into()),
                        Token::Ge,
                        Token::Number(10.5),
                        Token::And,
                        Token::Not,
                        Token::Ident("ok".into()),
                        Token::Or,
                        Token::Ident("x".into()),
                        Token::Ne,
                        Token::Str("y".into())]);
    }

    #[test]
    fn word_operators_and_escapes() {
        assert_eq!(kinds(r#"not a and "q\"t" or null"#),
                   vec![Token::Not, Token::Ident("a".into()), Token::And, Token::Str("q\"t".into()), Token::Or, Token::Null]);
    }

    #[test]
    fn reports_offsets() {
        assert_eq!(tokenize("a = 1").unwrap_err(), RuleError::parse(2, "expected '=='"));
        assert_eq!(tokenize("a & b").unwrap_err(), RuleError::parse(2, "expected '&&'"));
        assert!(matches!(tokenize("'open").unwrap_err(), RuleError::Parse { offset: 0, .. }));
        assert!(matches!(tokenize("a # b").unwrap_err(), RuleError::Parse { offset: 2, .. }));
    }

    #[test]
    fn control_escapes_decode_and_unknown_ones_fail() {
        assert_eq!(kinds(r"'a\nb\tc'"), vec![Token::Str("a\nb\tc".into())]);
        assert_eq!(tokenize(r"'a\qb'").unwrap_err(), RuleError::parse(3, "unknown escape '\\q'"));
    }

    #[test]
    fn oversized_number_is_rejected() {
        let huge = format!("x == {}", "9".repeat(400));
        assert_eq!(tokenize(&huge).unwrap_err(), RuleError::parse(5, "number out of range"));
    }
}
