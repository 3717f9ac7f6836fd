//! Token model shared by every conversion stage.
//!
//!     The lexer produces Number, Variable, Operator and Paren tokens. The ternary pass adds a
//!     fourth, synthetic kind: a Ternary token that stands in for a whole `cond ? a : b` and
//!     carries its three parts as opaque text. Later stages treat it as a plain operand.
//!
//!     Tokens only keep their source text. Fallback output is rebuilt from that text with
//!     [detokenize], so text is all a token ever needs.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Number,
    /// Identifiers, dotted paths, and any character the lexer does not recognise
    Variable,
    Operator,
    Paren,
    /// Synthetic token built by the ternary pass
    Ternary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Token {
            kind,
            text: text.into(),
        }
    }

    pub fn number(text: impl Into<String>) -> Self {
        Token::new(TokenKind::Number, text)
    }

    pub fn variable(text: impl Into<String>) -> Self {
        Token::new(TokenKind::Variable, text)
    }

    pub fn operator(text: impl Into<String>) -> Self {
        Token::new(TokenKind::Operator, text)
    }

    pub fn paren(text: impl Into<String>) -> Self {
        Token::new(TokenKind::Paren, text)
    }

    /// Build the synthetic token for a desugared ternary
    pub fn ternary(parts: &TernaryParts) -> Self {
        Token::new(TokenKind::Ternary, parts.pack())
    }

    pub fn is_operator(&self, symbol: &str) -> bool {
        self.kind == TokenKind::Operator && self.text == symbol
    }

    /// Operands go straight to the output queue of the parser
    pub fn is_operand(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Number | TokenKind::Variable | TokenKind::Ternary
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// The three parts of a ternary, each already flattened to text.
///
/// The branches are NOT converted: operators inside them survive verbatim in the packed
/// form, and rendering such a branch fails in the host engine. Only single-token branches
/// render as intended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TernaryParts {
    pub condition: String,
    pub when_true: String,
    pub when_false: String,
}

impl TernaryParts {
    pub fn new(condition: &Token, when_true: &[Token], when_false: &[Token]) -> Self {
        TernaryParts {
            condition: condition.text.clone(),
            when_true: detokenize(when_true),
            when_false: detokenize(when_false),
        }
    }

    /// Packed call form: `(tern <cond> <true> <false>)`
    ///
    /// Multi-token branches get their own parentheses, and an empty branch becomes `nil`,
    /// so the packed text always has exactly three arguments.
    pub fn pack(&self) -> String {
        format!(
            "(tern {} {} {})",
            pack_part(&self.condition),
            pack_part(&self.when_true),
            pack_part(&self.when_false)
        )
    }
}

fn pack_part(text: &str) -> String {
    if text.is_empty() {
        "nil".to_string()
    } else if text.contains(' ') {
        format!("({})", text)
    } else {
        text.to_string()
    }
}

/// Join token texts with single spaces.
///
/// This is both how ternary branches are serialized and how a failed conversion falls back
/// to text.
pub fn detokenize(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
