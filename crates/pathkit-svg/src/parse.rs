//! Operand readers shared by the transform, path and viewBox parsers.

use pathkit_lexer::{lex, Lexer, Token, TokenKind};

use crate::error::{SvgError, SvgResult};

/// Convert a `Number` token to `f64`.
///
/// Accepts everything the lexer emits as a number, including `0x` hex
/// integers. Overflowing literals are rejected rather than turned into
/// infinities.
pub(crate) fn parse_number(token: &Token) -> SvgResult<f64> {
    if token.kind != TokenKind::Number {
        return Err(unexpected(token, "number"));
    }

    let text = token.text.as_str();
    let (negative, unsigned) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let value = if let Some(hex) = unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))
    {
        i64::from_str_radix(hex, 16)
            .map(|v| v as f64)
            .map_err(|e| number_error(text, e.to_string()))?
    } else {
        unsigned
            .parse::<f64>()
            .map_err(|e| number_error(text, e.to_string()))?
    };

    if !value.is_finite() {
        return Err(number_error(text, "out of range"));
    }

    Ok(if negative { -value } else { value })
}

fn number_error(text: &str, reason: impl Into<String>) -> SvgError {
    SvgError::Number {
        text: text.to_string(),
        reason: reason.into(),
    }
}

/// Error for a token that is not what the grammar wants.
///
/// Lexer `Error` tokens become `Lex` errors so the caller can tell a bad
/// character from a misplaced but valid token.
pub(crate) fn unexpected(token: &Token, expected: &str) -> SvgError {
    match token.kind {
        TokenKind::Error => SvgError::Lex {
            offset: token.offset,
            found: token.text.clone(),
        },
        _ => SvgError::grammar(format!("expected {expected}, found {token}")),
    }
}

fn end_of_input(expected: &str) -> SvgError {
    SvgError::grammar(format!("expected {expected}, found end of input"))
}

/// Skip separators and read one number.
pub(crate) fn expect_number(lexer: &mut Lexer<'_>) -> SvgResult<f64> {
    lexer.skip_separators();
    match lexer.next_token() {
        Some(token) => parse_number(&token),
        None => Err(end_of_input("number")),
    }
}

/// Skip separators and report whether a number follows.
pub(crate) fn at_number(lexer: &mut Lexer<'_>) -> bool {
    lexer.skip_separators();
    lexer.peek_kind() == Some(TokenKind::Number)
}

/// Read `( n1 n2 ... )` with exactly `count` numbers.
pub(crate) fn paren_number_list(
    lexer: &mut Lexer<'_>,
    function: &str,
    count: usize,
) -> SvgResult<Vec<f64>> {
    lexer.consume_while(TokenKind::Whitespace);
    match lexer.next_token() {
        Some(token) if token.kind == TokenKind::Parenthesis && token.text == "(" => {}
        Some(token) => return Err(unexpected(&token, "opening parenthesis")),
        None => return Err(end_of_input("opening parenthesis")),
    }

    let mut nums = Vec::with_capacity(count);
    loop {
        lexer.skip_separators();
        let Some(token) = lexer.next_token() else {
            return Err(end_of_input("closing parenthesis"));
        };
        match token.kind {
            TokenKind::Number if nums.len() < count => nums.push(parse_number(&token)?),
            TokenKind::Parenthesis if token.text == ")" => {
                if nums.len() == count {
                    return Ok(nums);
                }
                return Err(SvgError::grammar(format!(
                    "{function} expects {count} arguments, found {}",
                    nums.len()
                )));
            }
            TokenKind::Number => {
                return Err(SvgError::grammar(format!(
                    "{function} expects {count} arguments, found more"
                )))
            }
            _ => return Err(unexpected(&token, "number or closing parenthesis")),
        }
    }
}

/// Parse a whitespace/comma separated list of numbers, e.g. a viewBox.
pub(crate) fn number_list(name: &str, text: &str) -> SvgResult<Vec<f64>> {
    let mut lexer = lex(name, text);
    let mut nums = Vec::new();
    loop {
        lexer.skip_separators();
        let Some(token) = lexer.next_token() else {
            return Ok(nums);
        };
        match token.kind {
            TokenKind::EndOfStream => return Ok(nums),
            _ => nums.push(parse_number(&token)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(text: &str) -> SvgResult<f64> {
        let token = lex("test", text).next_token().unwrap();
        parse_number(&token)
    }

    #[test]
    fn parses_decimal_and_exponent() {
        assert_eq!(number("-1.5").unwrap(), -1.5);
        assert_eq!(number("+2e2").unwrap(), 200.0);
        assert_eq!(number(".25").unwrap(), 0.25);
    }

    #[test]
    fn parses_hex() {
        assert_eq!(number("0x1F").unwrap(), 31.0);
        assert_eq!(number("-0x10").unwrap(), -16.0);
    }

    #[test]
    fn malformed_numbers() {
        assert!(matches!(number("-"), Err(SvgError::Number { .. })));
        assert!(matches!(number("0x"), Err(SvgError::Number { .. })));
        assert!(matches!(number("1e"), Err(SvgError::Number { .. })));
        assert!(matches!(number("1e999"), Err(SvgError::Number { .. })));
    }

    #[test]
    fn non_number_token_is_grammar_error() {
        assert!(matches!(number("M"), Err(SvgError::Grammar(_))));
        assert!(matches!(number("#"), Err(SvgError::Lex { offset: 0, .. })));
    }

    #[test]
    fn paren_list_arity() {
        let mut lexer = lex("test", "(1, 2)");
        assert_eq!(paren_number_list(&mut lexer, "translate", 2).unwrap(), vec![1.0, 2.0]);

        let mut lexer = lex("test", "(1)");
        assert!(matches!(
            paren_number_list(&mut lexer, "translate", 2),
            Err(SvgError::Grammar(_))
        ));

        let mut lexer = lex("test", "(1 2 3)");
        assert!(matches!(
            paren_number_list(&mut lexer, "translate", 2),
            Err(SvgError::Grammar(_))
        ));

        let mut lexer = lex("test", "(1 2");
        assert!(matches!(
            paren_number_list(&mut lexer, "translate", 2),
            Err(SvgError::Grammar(_))
        ));
    }

    #[test]
    fn number_lists() {
        assert_eq!(
            number_list("viewBox", "0 0, 100 50").unwrap(),
            vec![0.0, 0.0, 100.0, 50.0]
        );
        assert!(number_list("viewBox", "").unwrap().is_empty());
        assert!(number_list("viewBox", "0 0 a 1").is_err());
    }
}
