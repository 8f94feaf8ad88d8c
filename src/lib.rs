//! `pytok`: a byte-faithful Python-source tokenizer.
//!
//! Reproduces the observable token stream CPython's own tokenizer would
//! produce for a given source string — indentation bookkeeping, f-/t-string
//! lexical structure, line-continuation and bracket-nesting rules, and
//! numeric/operator lexing — without linking CPython. The intended
//! consumers are formatters, linters, refactoring tools, and syntax
//! highlighters that need a standalone, fast lexer.
//!
//! The public surface is small: [`tokenize`] returns a lazy, finite
//! [`Lexer`] iterating `Result<Token, TokenizeError>`, terminated by exactly
//! one `Endmarker` token (or fused after the first error). [`TokenKind`] is
//! the closed set of kinds it ever emits, and [`is_operator`] reports
//! whether a kind falls in the `Semicolon..=Op` operator sub-range.
//!
//! ```
//! use pytok::{tokenize, TokenKind};
//!
//! let kinds: Vec<TokenKind> = tokenize("x = 1\n")
//!     .map(|r| r.unwrap().kind)
//!     .collect();
//! assert_eq!(kinds.last(), Some(&TokenKind::Endmarker));
//! ```

pub mod bracket;
pub mod discovery;
pub mod error;
pub mod fstring;
pub mod ident;
pub mod indent;
pub mod lexer;
pub mod number;
pub mod position;
pub mod token;

pub use error::TokenizeError;
pub use lexer::Lexer;
pub use token::{is_operator, Token, TokenKind};

/// Tokenize `source`, returning a lazy iterator of tokens terminated by
/// exactly one `ENDMARKER` (or fused after the first error).
///
/// This is the library's single entry point; see the module-level docs for
/// the shape of the stream it produces.
pub fn tokenize(source: &str) -> Lexer<'_> {
    Lexer::new(source)
}
