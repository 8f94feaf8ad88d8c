//! Typed tokenizer failures.
//!
//! Kept distinct from the `anyhow::Result` used at the CLI/I-O boundary
//! (file reads, directory walking): this is the scan-local typed error,
//! returned inside the `Item = Result<Token, TokenizeError>` the
//! [`crate::Lexer`] iterator yields.

use thiserror::Error;

/// Every way [`crate::tokenize`] can fail, each carrying the byte offset of
/// the failure. Fatal to the stream: the lexer does not recover internally
/// and must not be pulled again once one of these is yielded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenizeError {
    #[error("unterminated string literal at byte {offset}")]
    UnterminatedString { offset: u32 },

    #[error("unexpected end of file at byte {offset}")]
    UnexpectedEof { offset: u32 },

    #[error("unexpected character after line-continuation backslash at byte {offset}")]
    UnexpectedCharacterAfterBackslash { offset: u32 },

    #[error("unexpected character {found:?} at byte {offset}")]
    UnexpectedCharacter { offset: u32, found: char },

    #[error("inconsistent use of tabs and spaces in indentation at byte {offset}")]
    InconsistentUseOfTabsAndSpaces { offset: u32 },

    #[error("dedent does not match any outer indentation level at byte {offset}")]
    DedentDoesNotMatchAnyOuterIndent { offset: u32 },

    #[error("internal error: stack underflow at byte {offset}")]
    Underflow { offset: u32 },
}

impl TokenizeError {
    /// The byte offset at which the failure occurred, regardless of variant.
    pub fn offset(&self) -> u32 {
        match self {
            TokenizeError::UnterminatedString { offset }
            | TokenizeError::UnexpectedEof { offset }
            | TokenizeError::UnexpectedCharacterAfterBackslash { offset }
            | TokenizeError::UnexpectedCharacter { offset, .. }
            | TokenizeError::InconsistentUseOfTabsAndSpaces { offset }
            | TokenizeError::DedentDoesNotMatchAnyOuterIndent { offset }
            | TokenizeError::Underflow { offset } => *offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_extraction() {
        let e = TokenizeError::UnterminatedString { offset: 42 };
        assert_eq!(e.offset(), 42);
    }

    #[test]
    fn test_display_includes_offset() {
        let e = TokenizeError::DedentDoesNotMatchAnyOuterIndent { offset: 7 };
        assert!(e.to_string().contains('7'));
    }

    #[test]
    fn test_unexpected_character_carries_char() {
        let e = TokenizeError::UnexpectedCharacter {
            offset: 3,
            found: '$',
        };
        assert!(e.to_string().contains('$'));
    }
}
