//! Token and TokenKind: the tokenizer's public vocabulary.
//!
//! `Token` is a plain value record — it does not borrow from the source or
//! from the lexer, so callers can collect a `Vec<Token>` and hold it past
//! the lexer's lifetime.

use std::fmt;

/// The closed set of token kinds this tokenizer ever emits.
///
/// `Semicolon ..= Op` is the contiguous "operator" sub-range; see
/// [`is_operator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Whitespace,
    Indent,
    Dedent,
    Newline,
    Nl,
    Comment,
    // ── operator sub-range (contiguous, see `is_operator`) ──────────────────
    Semicolon,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Colon,
    Op,
    // ── end of operator sub-range ────────────────────────────────────────────
    Identifier,
    Number,
    String,
    FstringStart,
    FstringMiddle,
    FstringEnd,
    TstringStart,
    TstringMiddle,
    TstringEnd,
    Endmarker,
}

impl fmt::Display for TokenKind {
    /// Upper-case spelling used by the CLI's
    /// `--tokenize` line format.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenKind::Whitespace => "WHITESPACE",
            TokenKind::Indent => "INDENT",
            TokenKind::Dedent => "DEDENT",
            TokenKind::Newline => "NEWLINE",
            TokenKind::Nl => "NL",
            TokenKind::Comment => "COMMENT",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::LBracket => "LBRACKET",
            TokenKind::RBracket => "RBRACKET",
            TokenKind::LBrace => "LBRACE",
            TokenKind::RBrace => "RBRACE",
            TokenKind::Colon => "COLON",
            TokenKind::Op => "OP",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Number => "NUMBER",
            TokenKind::String => "STRING",
            TokenKind::FstringStart => "FSTRING_START",
            TokenKind::FstringMiddle => "FSTRING_MIDDLE",
            TokenKind::FstringEnd => "FSTRING_END",
            TokenKind::TstringStart => "TSTRING_START",
            TokenKind::TstringMiddle => "TSTRING_MIDDLE",
            TokenKind::TstringEnd => "TSTRING_END",
            TokenKind::Endmarker => "ENDMARKER",
        };
        write!(f, "{s}")
    }
}

/// Reports whether `kind` falls in the `Semicolon..=Op` operator sub-range.
///
/// Kept as a free function (not a `TokenKind` method): a predicate over the
/// closed enum, not a method the enum needs to carry everywhere it's matched on.
pub fn is_operator(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Semicolon
            | TokenKind::LParen
            | TokenKind::RParen
            | TokenKind::LBracket
            | TokenKind::RBracket
            | TokenKind::LBrace
            | TokenKind::RBrace
            | TokenKind::Colon
            | TokenKind::Op
    )
}

/// One lexical token: a kind plus its exact byte and line/column span.
///
/// Byte offsets are UTF-8 byte indices into the source string passed to
/// [`crate::tokenize`]. Columns are zero-indexed byte offsets from the
/// start of their line (not tab-expanded); lines are one-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start_byte: u32,
    pub end_byte: u32,
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
}

impl Token {
    pub fn len(&self) -> u32 {
        self.end_byte - self.start_byte
    }

    pub fn is_empty(&self) -> bool {
        self.start_byte == self.end_byte
    }

    /// The lexeme this token covers, sliced from `source`.
    ///
    /// Zero-width synthetic tokens (DEDENT, ENDMARKER) and the one
    /// synthesized trailing NEWLINE past EOF may have spans that exceed
    /// `source.len()`; callers that need the literal text should check
    /// `end_byte as usize <= source.len()` first.
    pub fn text<'src>(&self, source: &'src str) -> &'src str {
        &source[self.start_byte as usize..self.end_byte as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_operator_range() {
        assert!(is_operator(TokenKind::Semicolon));
        assert!(is_operator(TokenKind::Colon));
        assert!(is_operator(TokenKind::Op));
        assert!(is_operator(TokenKind::LBrace));
        assert!(!is_operator(TokenKind::Identifier));
        assert!(!is_operator(TokenKind::Newline));
        assert!(!is_operator(TokenKind::Endmarker));
    }

    #[test]
    fn test_token_len_and_text() {
        let src = "hello";
        let t = Token {
            kind: TokenKind::Identifier,
            start_byte: 0,
            end_byte: 5,
            start_line: 1,
            start_col: 0,
            end_line: 1,
            end_col: 5,
        };
        assert_eq!(t.len(), 5);
        assert!(!t.is_empty());
        assert_eq!(t.text(src), "hello");
    }

    #[test]
    fn test_display_is_upper_case_name() {
        assert_eq!(TokenKind::FstringMiddle.to_string(), "FSTRING_MIDDLE");
        assert_eq!(TokenKind::LBrace.to_string(), "LBRACE");
        assert_eq!(TokenKind::Endmarker.to_string(), "ENDMARKER");
    }

    #[test]
    fn test_zero_width_token_is_empty() {
        let t = Token {
            kind: TokenKind::Dedent,
            start_byte: 10,
            end_byte: 10,
            start_line: 3,
            start_col: 0,
            end_line: 3,
            end_col: 0,
        };
        assert!(t.is_empty());
    }
}
