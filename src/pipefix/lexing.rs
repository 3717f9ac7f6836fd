//! Lexer
//!
//!     Turns one placeholder expression into a flat token sequence using the logos lexer.
//!     This is the source of every token stream; all later stages are transformations over
//!     what this produces.
//!
//! Token Rules
//!
//!     - Whitespace is skipped.
//!     - `(` and `)` are Paren tokens.
//!     - `== != >= <= && || ??` are matched before their one-character prefixes, so `>=`
//!       is never split into `>` and `=`.
//!     - `+ - * / > < ! : ?` are single-character operators.
//!     - Numbers are digits with at most one decimal point: no sign, no exponent. `1.2.3`
//!       lexes as `1.2`, `.`, `3`.
//!     - Identifiers start with a letter, `_` or `$` and continue with letters, digits, `_`
//!       and `.`, which covers dotted paths such as `Vars.order.total`.
//!     - Anything else becomes a one-character Variable token. The lexer never fails.

use crate::pipefix::token::{Token, TokenKind};
use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"\s+")]
enum RawToken {
    #[token("(")]
    #[token(")")]
    Paren,

    #[token("==")]
    #[token("!=")]
    #[token(">=")]
    #[token("<=")]
    #[token("&&")]
    #[token("||")]
    #[token("??")]
    #[token("+")]
    #[token("-")]
    #[token("*")]
    #[token("/")]
    #[token(">")]
    #[token("<")]
    #[token("!")]
    #[token(":")]
    #[token("?")]
    Operator,

    #[regex(r"[0-9]+(\.[0-9]*)?")]
    Number,

    #[regex(r"[\p{L}_$][\p{L}\p{Nd}_.]*")]
    Identifier,
}

impl RawToken {
    fn kind(self) -> TokenKind {
        match self {
            RawToken::Paren => TokenKind::Paren,
            RawToken::Operator => TokenKind::Operator,
            RawToken::Number => TokenKind::Number,
            RawToken::Identifier => TokenKind::Variable,
        }
    }
}

/// Tokenize one expression
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut offset = 0;
    let mut lexer = RawToken::lexer(source);

    while let Some(result) = lexer.next() {
        match result {
            Ok(raw) => tokens.push(Token::new(raw.kind(), lexer.slice())),
            Err(()) => {
                // Stray character: emit it on its own and restart right after it
                let start = offset + lexer.span().start;
                let Some(ch) = source[start..].chars().next() else {
                    break;
                };
                tokens.push(Token::variable(ch));
                offset = start + ch.len_utf8();
                lexer = RawToken::lexer(&source[offset..]);
            }
        }
    }

    tokens
}

/// True when the token stream holds at least one operator, i.e. the expression needs
/// converting at all
pub fn has_operator(tokens: &[Token]) -> bool {
    tokens.iter().any(|t| t.kind == TokenKind::Operator)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_simple_arithmetic() {
        let tokens = tokenize("2 + 3 * 4");
        assert_eq!(texts(&tokens), vec!["2", "+", "3", "*", "4"]);
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Number,
                TokenKind::Operator,
                TokenKind::Number,
                TokenKind::Operator,
                TokenKind::Number
            ]
        );
    }

    #[test]
    fn test_whitespace_is_optional() {
        assert_eq!(texts(&tokenize("a+b")), vec!["a", "+", "b"]);
        assert_eq!(texts(&tokenize("  a \t+\n b ")), vec!["a", "+", "b"]);
    }

    #[test]
    fn test_two_char_operators_win() {
        let tokens = tokenize("a>=b!=c&&d||e??f<=g==h");
        assert_eq!(
            texts(&tokens),
            vec!["a", ">=", "b", "!=", "c", "&&", "d", "||", "e", "??", "f", "<=", "g", "==", "h"]
        );
    }

    #[test]
    fn test_single_char_operators() {
        let tokens = tokenize("!a ? b : c");
        assert_eq!(texts(&tokens), vec!["!", "a", "?", "b", ":", "c"]);
        assert!(tokens
            .iter()
            .filter(|t| t.text != "a" && t.text != "b" && t.text != "c")
            .all(|t| t.kind == TokenKind::Operator));
    }

    #[test]
    fn test_numbers() {
        assert_eq!(texts(&tokenize("3.14")), vec!["3.14"]);
        assert_eq!(texts(&tokenize("1.")), vec!["1."]);
        assert_eq!(texts(&tokenize("1.2.3")), vec!["1.2", ".", "3"]);
        assert_eq!(kinds(&tokenize("1.2.3"))[1], TokenKind::Variable);
    }

    #[test]
    fn test_dotted_identifiers() {
        let tokens = tokenize("Vars.order.total_2 + $x");
        assert_eq!(texts(&tokens), vec!["Vars.order.total_2", "+", "$x"]);
        assert_eq!(tokens[0].kind, TokenKind::Variable);
        assert_eq!(tokens[2].kind, TokenKind::Variable);
    }

    #[test]
    fn test_parens() {
        let tokens = tokenize("(a)");
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::Paren, TokenKind::Variable, TokenKind::Paren]
        );
    }

    #[test]
    fn test_unknown_characters_become_variables() {
        let tokens = tokenize("a = b & c | d");
        assert_eq!(texts(&tokens), vec!["a", "=", "b", "&", "c", "|", "d"]);
        assert!(tokens.iter().all(|t| t.kind == TokenKind::Variable));
    }

    #[test]
    fn test_unknown_character_before_identifier() {
        let tokens = tokenize("#abc");
        assert_eq!(texts(&tokens), vec!["#", "abc"]);
    }

    #[test]
    fn test_non_ascii() {
        let tokens = tokenize("prix€ + 1");
        assert_eq!(texts(&tokens), vec!["prix", "€", "+", "1"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn test_has_operator() {
        assert!(has_operator(&tokenize("a + b")));
        assert!(!has_operator(&tokenize(".Name | upper")));
        assert!(!has_operator(&tokenize("Vars.x")));
    }
}
