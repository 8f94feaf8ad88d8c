//! The tokenizer's main dispatch loop.
//!
//! `Lexer` owns the cursor (`Position`), the indentation stack, the bracket
//! depth tracker, and the f-/t-string sub-state machine, and implements
//! `Iterator<Item = Result<Token, TokenizeError>>`. Each call to `next()`
//! tries a fixed cascade of rules in order — comment, dedent drain, line
//! break, continuation, indentation, whitespace, operator, number,
//! string, identifier.
//!
//! Once an error is yielded, or `ENDMARKER` is yielded, the iterator is
//! fused and returns `None` forever after.

use crate::bracket::BracketTracker;
use crate::error::TokenizeError;
use crate::fstring::{FState, FstringMachine, Quote};
use crate::ident::{is_identifier_continue, is_identifier_start};
use crate::indent::{IndentChange, IndentStack};
use crate::number::scan_number;
use crate::position::Position;
use crate::token::{Token, TokenKind};

/// Tokenizes `src` into the closed token set CPython's own tokenizer emits.
pub struct Lexer<'src> {
    src: &'src str,
    bytes: &'src [u8],
    position: Position,
    indent: IndentStack,
    brackets: BracketTracker,
    fstrings: FstringMachine,
    dedent_counter: u32,
    all_whitespace_on_this_line: bool,
    prev_kind: Option<TokenKind>,
    done: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(src: &'src str) -> Self {
        Lexer {
            src,
            bytes: src.as_bytes(),
            position: Position::start(),
            indent: IndentStack::new(),
            brackets: BracketTracker::new(),
            fstrings: FstringMachine::new(),
            dedent_counter: 0,
            all_whitespace_on_this_line: true,
            prev_kind: None,
            done: false,
        }
    }

    fn pos(&self) -> usize {
        self.position.byte_offset as usize
    }

    fn at_end(&self) -> bool {
        self.pos() >= self.bytes.len()
    }

    /// Build a token from `start` to the lexer's current position.
    fn finish(&self, kind: TokenKind, start: Position) -> Token {
        Token {
            kind,
            start_byte: start.byte_offset,
            end_byte: self.position.byte_offset,
            start_line: start.line,
            start_col: start.col,
            end_line: self.position.line,
            end_col: self.position.col,
        }
    }

    fn zero_width(&self, kind: TokenKind) -> Token {
        Token {
            kind,
            start_byte: self.position.byte_offset,
            end_byte: self.position.byte_offset,
            start_line: self.position.line,
            start_col: self.position.col,
            end_line: self.position.line,
            end_col: self.position.col,
        }
    }

    fn classify_newline_kind(&self) -> TokenKind {
        if self.brackets.depth() > 0
            || self.fstrings.state() == FState::InFstringExpr
            || self.all_whitespace_on_this_line
        {
            TokenKind::Nl
        } else {
            TokenKind::Newline
        }
    }

    /// Steps 2+3: at or past end-of-source.
    fn eof_step(&mut self) -> Token {
        if self.prev_kind.is_none() {
            return self.zero_width(TokenKind::Endmarker);
        }
        if matches!(
            self.prev_kind,
            Some(TokenKind::Newline | TokenKind::Nl | TokenKind::Dedent)
        ) {
            if self.indent.pop() {
                self.zero_width(TokenKind::Dedent)
            } else {
                self.zero_width(TokenKind::Endmarker)
            }
        } else {
            let start = self.position;
            let kind = self.classify_newline_kind();
            let tok = Token {
                kind,
                start_byte: start.byte_offset,
                end_byte: start.byte_offset + 1,
                start_line: start.line,
                start_col: start.col,
                end_line: start.line + 1,
                end_col: 0,
            };
            self.position.byte_offset = start.byte_offset + 1;
            self.position.line = start.line + 1;
            self.position.col = 0;
            tok
        }
    }

    // --- step 5: comment ---

    fn scan_comment(&mut self) -> Token {
        let start = self.position;
        let start_idx = self.pos();
        let mut i = start_idx;
        while i < self.bytes.len() && self.bytes[i] != b'\n' {
            i += 1;
        }
        let text = &self.src[start_idx..i];
        self.position.advance(text);
        self.finish(TokenKind::Comment, start)
    }

    // --- step 7: newline / nl ---

    fn try_scan_newline(&mut self) -> Option<Token> {
        let start_idx = self.pos();
        let len = if self.bytes.get(start_idx) == Some(&b'\n') {
            1
        } else if self.bytes.get(start_idx) == Some(&b'\r') && self.bytes.get(start_idx + 1) == Some(&b'\n') {
            2
        } else {
            return None;
        };
        let start = self.position;
        let kind = self.classify_newline_kind();
        let text = &self.src[start_idx..start_idx + len];
        self.position.advance(text);
        Some(self.finish(kind, start))
    }

    // --- step 8: backslash line continuation ---

    fn scan_line_continuation(&mut self) -> Result<Token, TokenizeError> {
        let start = self.position;
        let start_idx = self.pos();
        let bytes = self.bytes;
        let mut i = start_idx + 1;
        while matches!(bytes.get(i), Some(b' ' | b'\t' | 0x0b | 0x0c)) {
            i += 1;
        }
        let is_lf = bytes.get(i) == Some(&b'\n');
        let is_crlf = bytes.get(i) == Some(&b'\r') && bytes.get(i + 1) == Some(&b'\n');
        if !is_lf && !is_crlf {
            return Err(TokenizeError::UnexpectedCharacterAfterBackslash {
                offset: start.byte_offset,
            });
        }
        i += if is_crlf { 2 } else { 1 };
        while matches!(bytes.get(i), Some(b' ' | b'\t' | 0x0b | 0x0c)) {
            i += 1;
        }
        let text = &self.src[start_idx..i];
        self.position.advance(text);
        Ok(self.finish(TokenKind::Whitespace, start))
    }

    // --- step 9: bare CR ---

    fn scan_bare_cr(&mut self) -> Token {
        let start = self.position;
        let text = &self.src[self.pos()..self.pos() + 1];
        self.position.advance(text);
        self.finish(TokenKind::Whitespace, start)
    }

    // --- step 10: indentation ---

    fn try_indentation(&mut self) -> Result<Option<Token>, TokenizeError> {
        let start = self.position;
        let start_idx = self.pos();
        let bytes = self.bytes;
        let mut i = start_idx;
        while matches!(bytes.get(i), Some(b' ' | b'\t' | 0x0b | 0x0c)) {
            i += 1;
        }
        let run = &self.src[start_idx..i];

        if run.is_empty() {
            // A bare column-zero position with no leading whitespace at all
            // is a no-op only when there's no open indent level to dedent
            // out of (the common case for flat, unindented code). When the
            // indent stack is non-empty this is still a dedent to depth
            // zero, so fall through to the comparison below instead of
            // swallowing it.
            if self.indent.is_empty() {
                return Ok(None);
            }
        } else {
            let has_real_indent_char = run.bytes().any(|b| b == b' ' || b == b'\t');
            if !has_real_indent_char {
                self.position.advance(run);
                return Ok(Some(self.finish(TokenKind::Whitespace, start)));
            }

            if matches!(bytes.get(i), Some(b'#' | b'\\' | b'\r' | b'\n')) {
                self.position.advance(run);
                return Ok(Some(self.finish(TokenKind::Whitespace, start)));
            }
        }

        match self.indent.classify_and_apply(run) {
            IndentChange::Same => {
                self.position.advance(run);
                Ok(Some(self.finish(TokenKind::Whitespace, start)))
            }
            IndentChange::Indent => {
                self.position.advance(run);
                Ok(Some(self.finish(TokenKind::Indent, start)))
            }
            IndentChange::Dedent(n) => {
                self.position.advance(run);
                self.dedent_counter = n;
                Ok(Some(self.finish(TokenKind::Whitespace, start)))
            }
            IndentChange::Inconsistent | IndentChange::InconsistentPrefix => {
                Err(TokenizeError::InconsistentUseOfTabsAndSpaces {
                    offset: start.byte_offset,
                })
            }
            IndentChange::NoMatchingOuterLevel => Err(TokenizeError::DedentDoesNotMatchAnyOuterIndent {
                offset: start.byte_offset,
            }),
        }
    }

    // --- step 11: ordinary whitespace run ---

    fn scan_whitespace_run(&mut self) -> Token {
        let start = self.position;
        let start_idx = self.pos();
        let bytes = self.bytes;
        let mut i = start_idx;
        loop {
            match bytes.get(i) {
                Some(b' ') | Some(b'\t') | Some(0x0b) | Some(0x0c) => i += 1,
                Some(b'\r') if bytes.get(i + 1) != Some(&b'\n') => i += 1,
                _ => break,
            }
        }
        let text = &self.src[start_idx..i];
        self.position.advance(text);
        self.finish(TokenKind::Whitespace, start)
    }

    // --- step 12: operators ---

    fn scan_operator(&mut self) -> Token {
        let start = self.position;
        let start_idx = self.pos();
        let bytes = self.bytes;
        let b0 = bytes[start_idx];
        let mut end_idx = start_idx + 1;

        let kind = match b0 {
            b'(' => {
                self.brackets.enter();
                TokenKind::LParen
            }
            b'[' => {
                self.brackets.enter();
                TokenKind::LBracket
            }
            b'{' => {
                self.brackets.enter();
                TokenKind::LBrace
            }
            b')' => {
                self.brackets.exit();
                TokenKind::RParen
            }
            b']' => {
                self.brackets.exit();
                TokenKind::RBracket
            }
            b'}' => {
                if self.brackets.depth() == 0 && self.fstrings.state() == FState::InFstringExpr {
                    self.brackets.exit_fstring_hole();
                    let resume = self.fstrings.exit_hole();
                    self.fstrings.set_state(resume);
                } else {
                    self.brackets.exit();
                }
                TokenKind::RBrace
            }
            b';' => TokenKind::Semicolon,
            b':' => {
                if self.brackets.depth() == 0 && self.fstrings.state() == FState::InFstringExpr {
                    self.fstrings.set_state(FState::InFstringExprModifier);
                    TokenKind::Colon
                } else if bytes.get(end_idx) == Some(&b'=') {
                    end_idx += 1;
                    TokenKind::Op
                } else {
                    TokenKind::Op
                }
            }
            b'<' => {
                if bytes.get(end_idx) == Some(&b'>') {
                    end_idx += 1;
                } else {
                    if bytes.get(end_idx) == Some(&b'<') {
                        end_idx += 1;
                    }
                    if bytes.get(end_idx) == Some(&b'=') {
                        end_idx += 1;
                    }
                }
                TokenKind::Op
            }
            b'>' => {
                if bytes.get(end_idx) == Some(&b'>') {
                    end_idx += 1;
                }
                if bytes.get(end_idx) == Some(&b'=') {
                    end_idx += 1;
                }
                TokenKind::Op
            }
            b'/' => {
                if bytes.get(end_idx) == Some(&b'/') {
                    end_idx += 1;
                }
                if bytes.get(end_idx) == Some(&b'=') {
                    end_idx += 1;
                }
                TokenKind::Op
            }
            b'*' => {
                if bytes.get(end_idx) == Some(&b'*') {
                    end_idx += 1;
                }
                if bytes.get(end_idx) == Some(&b'=') {
                    end_idx += 1;
                }
                TokenKind::Op
            }
            b'-' => {
                if bytes.get(end_idx) == Some(&b'>') {
                    end_idx += 1;
                } else if bytes.get(end_idx) == Some(&b'=') {
                    end_idx += 1;
                }
                TokenKind::Op
            }
            b'+' | b'&' | b'|' | b',' | b'^' | b'@' | b'%' | b'=' | b'!' | b'~' => {
                if bytes.get(end_idx) == Some(&b'=') {
                    end_idx += 1;
                }
                TokenKind::Op
            }
            _ => TokenKind::Op,
        };

        let text = &self.src[start_idx..end_idx];
        self.position.advance(text);
        self.finish(kind, start)
    }

    // --- step 13: number / dot / ellipsis ---

    fn scan_number_or_dot(&mut self) -> Token {
        let start = self.position;
        let start_idx = self.pos();
        let bytes = self.bytes;

        if bytes[start_idx] == b'.' {
            if bytes.get(start_idx + 1) == Some(&b'.') && bytes.get(start_idx + 2) == Some(&b'.') {
                let text = &self.src[start_idx..start_idx + 3];
                self.position.advance(text);
                return self.finish(TokenKind::Op, start);
            }
            if !matches!(bytes.get(start_idx + 1), Some(b) if b.is_ascii_digit()) {
                let text = &self.src[start_idx..start_idx + 1];
                self.position.advance(text);
                return self.finish(TokenKind::Op, start);
            }
        }

        let n = scan_number(&bytes[start_idx..]);
        let text = &self.src[start_idx..start_idx + n];
        self.position.advance(text);
        self.finish(TokenKind::Number, start)
    }

    // --- step 14: string / f-string / t-string start ---

    fn try_scan_string_start(&mut self) -> Result<Option<Token>, TokenizeError> {
        let start_idx = self.pos();
        let bytes = self.bytes;

        let mut plen = 0;
        while plen < 2 && matches!(bytes.get(start_idx + plen), Some(b) if is_prefix_letter(*b)) {
            plen += 1;
        }

        for len in (0..=plen).rev() {
            let qi = start_idx + len;
            if let Some(&q) = bytes.get(qi) {
                if (q == b'\'' || q == b'"') && is_valid_string_prefix(&self.src[start_idx..qi]) {
                    return self.begin_string(start_idx, len, q).map(Some);
                }
            }
        }
        Ok(None)
    }

    fn begin_string(&mut self, start_idx: usize, prefix_len: usize, quote_ch: u8) -> Result<Token, TokenizeError> {
        let start = self.position;
        let bytes = self.bytes;
        let quote_idx = start_idx + prefix_len;
        let triple = bytes.get(quote_idx + 1) == Some(&quote_ch) && bytes.get(quote_idx + 2) == Some(&quote_ch);
        let qlen = if triple { 3 } else { 1 };
        let prefix = &self.src[start_idx..quote_idx];
        let lower_prefix: String = prefix.chars().map(|c| c.to_ascii_lowercase()).collect();
        let is_raw = lower_prefix.contains('r');
        let is_f = lower_prefix.contains('f');
        let is_t = lower_prefix.contains('t');

        let header_end = quote_idx + qlen;
        let header_text = &self.src[start_idx..header_end];

        if is_f || is_t {
            self.position.advance(header_text);
            self.fstrings.push_frame(Quote { ch: quote_ch, triple }, is_raw, is_t);
            let kind = if is_t {
                TokenKind::TstringStart
            } else {
                TokenKind::FstringStart
            };
            return Ok(self.finish(kind, start));
        }

        let mut i = header_end;
        loop {
            match bytes.get(i) {
                None => {
                    return Err(TokenizeError::UnterminatedString {
                        offset: start.byte_offset,
                    })
                }
                Some(&b) if b == quote_ch => {
                    if triple {
                        if bytes.get(i + 1) == Some(&quote_ch) && bytes.get(i + 2) == Some(&quote_ch) {
                            i += 3;
                            break;
                        }
                        i += 1;
                    } else {
                        i += 1;
                        break;
                    }
                }
                Some(b'\\') => match bytes.get(i + 1) {
                    None => {
                        return Err(TokenizeError::UnterminatedString {
                            offset: start.byte_offset,
                        })
                    }
                    Some(_) => i += 2,
                },
                Some(b'\n') => {
                    if triple {
                        i += 1;
                    } else {
                        return Err(TokenizeError::UnterminatedString {
                            offset: start.byte_offset,
                        });
                    }
                }
                Some(_) => i += 1,
            }
        }

        let text = &self.src[start_idx..i];
        self.position.advance(text);
        Ok(self.finish(TokenKind::String, start))
    }

    // --- step 15: identifier ---

    fn scan_identifier(&mut self) -> Result<Token, TokenizeError> {
        let start = self.position;
        let start_idx = self.pos();
        let mut iter = self.src[start_idx..].char_indices();
        let (_, first_ch) = iter.next().ok_or(TokenizeError::UnexpectedEof {
            offset: self.position.byte_offset,
        })?;
        if !is_identifier_start(first_ch) {
            return Err(TokenizeError::UnexpectedCharacter {
                offset: self.position.byte_offset,
                found: first_ch,
            });
        }
        let mut end = start_idx + first_ch.len_utf8();
        for (off, ch) in iter {
            if is_identifier_continue(ch) {
                end = start_idx + off + ch.len_utf8();
            } else {
                break;
            }
        }
        let text = &self.src[start_idx..end];
        self.position.advance(text);
        Ok(self.finish(TokenKind::Identifier, start))
    }

    // --- step 4: f-string template delegation ---

    fn quote_matches(bytes: &[u8], i: usize, qch: u8, qlen: usize) -> bool {
        (0..qlen).all(|k| bytes.get(i + k) == Some(&qch))
    }

    fn fstring_step(&mut self) -> Result<Token, TokenizeError> {
        match self.fstrings.state() {
            FState::AtFstringMiddle => self.scan_fstring_middle(),
            FState::InFstringExprModifier => self.scan_fstring_modifier(),
            other => unreachable!("fstring_step invoked in non-template state {other:?}"),
        }
    }

    fn scan_fstring_middle(&mut self) -> Result<Token, TokenizeError> {
        let start = self.position;
        let start_idx = self.pos();
        let bytes = self.bytes;
        let frame = *self
            .fstrings
            .current_frame()
            .expect("at_fstring_middle requires an active frame");
        let qch = frame.quote.ch;
        let qlen = frame.quote.len();
        let mut i = start_idx;

        loop {
            match bytes.get(i) {
                None => {
                    return Err(TokenizeError::UnexpectedEof {
                        offset: self.position.byte_offset,
                    })
                }
                Some(&b) if b == qch && Self::quote_matches(bytes, i, qch, qlen) => break,
                Some(b'{') if bytes.get(i + 1) == Some(&b'{') => i += 2,
                Some(b'{') => break,
                Some(b'}') if bytes.get(i + 1) == Some(&b'}') => i += 2,
                Some(b'}') => i += 1,
                Some(b'\\') if !frame.is_raw => {
                    if bytes.get(i + 1) == Some(&b'N') && bytes.get(i + 2) == Some(&b'{') {
                        i += 3;
                    } else {
                        match bytes.get(i + 1) {
                            None => {
                                return Err(TokenizeError::UnexpectedEof {
                                    offset: self.position.byte_offset,
                                })
                            }
                            Some(_) => i += 2,
                        }
                    }
                }
                Some(b'\n') if !frame.quote.triple => {
                    return Err(TokenizeError::UnterminatedString {
                        offset: self.position.byte_offset,
                    })
                }
                _ => i += 1,
            }
        }

        if i == start_idx {
            return self.handle_fstring_template_boundary();
        }

        let kind = if frame.is_t {
            TokenKind::TstringMiddle
        } else {
            TokenKind::FstringMiddle
        };
        let text = &self.src[start_idx..i];
        self.position.advance(text);
        Ok(self.finish(kind, start))
    }

    fn scan_fstring_modifier(&mut self) -> Result<Token, TokenizeError> {
        let start = self.position;
        let start_idx = self.pos();
        let bytes = self.bytes;
        let frame = *self
            .fstrings
            .current_frame()
            .expect("in_fstring_expr_modifier requires an active frame");
        let qch = frame.quote.ch;
        let qlen = frame.quote.len();
        let mut i = start_idx;

        loop {
            match bytes.get(i) {
                None => {
                    return Err(TokenizeError::UnexpectedEof {
                        offset: self.position.byte_offset,
                    })
                }
                Some(b'{') | Some(b'}') => break,
                Some(&b) if b == qch && Self::quote_matches(bytes, i, qch, qlen) => break,
                Some(b'\n') if !frame.quote.triple => {
                    return Err(TokenizeError::UnterminatedString {
                        offset: self.position.byte_offset,
                    })
                }
                _ => i += 1,
            }
        }

        if i == start_idx {
            return self.handle_fstring_modifier_boundary();
        }

        let kind = if frame.is_t {
            TokenKind::TstringMiddle
        } else {
            TokenKind::FstringMiddle
        };
        let text = &self.src[start_idx..i];
        self.position.advance(text);
        Ok(self.finish(kind, start))
    }

    fn handle_fstring_template_boundary(&mut self) -> Result<Token, TokenizeError> {
        if self.bytes.get(self.pos()) == Some(&b'{') {
            Ok(self.scan_fstring_lbrace())
        } else {
            Ok(self.scan_fstring_end())
        }
    }

    fn handle_fstring_modifier_boundary(&mut self) -> Result<Token, TokenizeError> {
        match self.bytes.get(self.pos()) {
            Some(&b'{') => Ok(self.scan_fstring_modifier_lbrace()),
            Some(&b'}') => Ok(self.scan_fstring_modifier_rbrace()),
            _ => Ok(self.scan_fstring_end()),
        }
    }

    fn scan_fstring_lbrace(&mut self) -> Token {
        let start = self.position;
        let text = &self.src[self.pos()..self.pos() + 1];
        self.position.advance(text);
        self.brackets.enter_fstring_hole();
        self.fstrings.enter_hole(FState::AtFstringMiddle);
        self.finish(TokenKind::LBrace, start)
    }

    fn scan_fstring_modifier_lbrace(&mut self) -> Token {
        let start = self.position;
        let text = &self.src[self.pos()..self.pos() + 1];
        self.position.advance(text);
        self.brackets.enter_fstring_hole();
        self.fstrings.enter_hole(FState::InFstringExprModifier);
        self.finish(TokenKind::LBrace, start)
    }

    fn scan_fstring_modifier_rbrace(&mut self) -> Token {
        let start = self.position;
        let text = &self.src[self.pos()..self.pos() + 1];
        self.position.advance(text);
        self.brackets.exit_fstring_hole();
        let resume = self.fstrings.exit_hole();
        self.fstrings.set_state(resume);
        self.finish(TokenKind::RBrace, start)
    }

    fn scan_fstring_end(&mut self) -> Token {
        let start = self.position;
        let frame = *self
            .fstrings
            .current_frame()
            .expect("fstring end requires an active frame");
        let qlen = frame.quote.len();
        let text = &self.src[self.pos()..self.pos() + qlen];
        self.position.advance(text);
        let is_t = frame.is_t;
        self.fstrings.pop_frame();
        self.finish(
            if is_t {
                TokenKind::TstringEnd
            } else {
                TokenKind::FstringEnd
            },
            start,
        )
    }

    /// The full per-token dispatch, steps 2-15. Step 1 ("previous token was
    /// ENDMARKER, stop") is handled by `Lexer::done` in the `Iterator` impl.
    fn step(&mut self) -> Result<Token, TokenizeError> {
        if self.at_end() {
            return Ok(self.eof_step());
        }

        if self.fstrings.is_in_fstring() && self.fstrings.state() != FState::InFstringExpr {
            return self.fstring_step();
        }

        if self.bytes[self.pos()] == b'#' {
            return Ok(self.scan_comment());
        }

        if self.dedent_counter > 0 {
            self.dedent_counter -= 1;
            return Ok(self.zero_width(TokenKind::Dedent));
        }

        if let Some(tok) = self.try_scan_newline() {
            return Ok(tok);
        }

        if self.bytes[self.pos()] == b'\\' {
            return self.scan_line_continuation();
        }

        if self.bytes[self.pos()] == b'\r' {
            return Ok(self.scan_bare_cr());
        }

        if self.position.col == 0 && self.brackets.depth() == 0 && self.fstrings.state() == FState::NotFstring {
            if let Some(tok) = self.try_indentation()? {
                return Ok(tok);
            }
        }

        if matches!(self.bytes[self.pos()], b' ' | b'\t' | 0x0b | 0x0c) {
            return Ok(self.scan_whitespace_run());
        }

        let b0 = self.bytes[self.pos()];
        if is_operator_start(b0) {
            return Ok(self.scan_operator());
        }

        if b0.is_ascii_digit() || (b0 == b'.' && matches!(self.bytes.get(self.pos() + 1), Some(b) if b.is_ascii_digit())) {
            return Ok(self.scan_number_or_dot());
        }
        if b0 == b'.' {
            // lone `.` or `...`, not immediately followed by a digit
            return Ok(self.scan_number_or_dot());
        }

        if let Some(tok) = self.try_scan_string_start()? {
            return Ok(tok);
        }

        self.scan_identifier()
    }
}

fn is_prefix_letter(b: u8) -> bool {
    matches!(b.to_ascii_lowercase(), b'b' | b'r' | b'u' | b'f' | b't')
}

fn is_valid_string_prefix(s: &str) -> bool {
    let lower: String = s.chars().map(|c| c.to_ascii_lowercase()).collect();
    matches!(
        lower.as_str(),
        "" | "r" | "u" | "b" | "f" | "t" | "br" | "rb" | "fr" | "rf" | "tr" | "rt" | "bt" | "tb"
    )
}

fn is_operator_start(b: u8) -> bool {
    matches!(
        b,
        b'(' | b')' | b'[' | b']' | b'{' | b'}' | b';' | b':' | b'<' | b'>' | b'/' | b'*' | b'-' | b'+' | b'&' | b'|' | b',' | b'^' | b'@' | b'%' | b'=' | b'!' | b'~' | b'`'
    )
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Result<Token, TokenizeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.step() {
            Ok(tok) => {
                match tok.kind {
                    TokenKind::Newline | TokenKind::Nl => self.all_whitespace_on_this_line = true,
                    TokenKind::Whitespace
                    | TokenKind::Comment
                    | TokenKind::Indent
                    | TokenKind::Dedent
                    | TokenKind::Endmarker => {}
                    _ => self.all_whitespace_on_this_line = false,
                }
                if tok.kind == TokenKind::Endmarker {
                    self.done = true;
                }
                self.prev_kind = Some(tok.kind);
                Some(Ok(tok))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Lexer::new(src).map(|r| r.unwrap().kind).collect()
    }

    fn spans(src: &str) -> Vec<(TokenKind, u32, u32)> {
        Lexer::new(src)
            .map(|r| {
                let t = r.unwrap();
                (t.kind, t.start_byte, t.end_byte)
            })
            .collect()
    }

    #[test]
    fn test_empty_source_is_just_endmarker() {
        assert_eq!(kinds(""), vec![TokenKind::Endmarker]);
    }

    #[test]
    fn test_def_header_and_indented_float() {
        let src = "def foo():\n    7.e1\n";
        use TokenKind::*;
        assert_eq!(
            spans(src),
            vec![
                (Identifier, 0, 3),
                (Whitespace, 3, 4),
                (Identifier, 4, 7),
                (LParen, 7, 8),
                (RParen, 8, 9),
                (Op, 9, 10),
                (Newline, 10, 11),
                (Indent, 11, 15),
                (Number, 15, 19),
                (Newline, 19, 20),
                (Dedent, 20, 20),
                (Endmarker, 20, 20),
            ]
        );
    }

    #[test]
    fn test_brace_bare_cr_brace() {
        use TokenKind::*;
        assert_eq!(
            spans("{\r}"),
            vec![
                (LBrace, 0, 1),
                (Whitespace, 1, 2),
                (RBrace, 2, 3),
                (Newline, 3, 4),
                (Endmarker, 4, 4),
            ]
        );
    }

    #[test]
    fn test_blank_line_comment_with_bare_cr() {
        use TokenKind::*;
        assert_eq!(
            spans("\n#\r0"),
            vec![
                (Nl, 0, 1),
                (Comment, 1, 4),
                (Nl, 4, 5),
                (Endmarker, 5, 5),
            ]
        );
    }

    #[test]
    fn test_blank_line_then_bare_cr_then_number() {
        use TokenKind::*;
        assert_eq!(
            spans("\n\r0"),
            vec![
                (Nl, 0, 1),
                (Whitespace, 1, 2),
                (Number, 2, 3),
                (Newline, 3, 4),
                (Endmarker, 4, 4),
            ]
        );
    }

    #[test]
    fn test_raw_fstring_unicode_name_escape_not_special() {
        use TokenKind::*;
        assert_eq!(
            spans("rf\"\\N{42}\""),
            vec![
                (FstringStart, 0, 3),
                (FstringMiddle, 3, 5),
                (LBrace, 5, 6),
                (Number, 6, 8),
                (RBrace, 8, 9),
                (FstringEnd, 9, 10),
                (Newline, 10, 11),
                (Endmarker, 11, 11),
            ]
        );
    }

    #[test]
    fn test_format_spec_with_nested_hole() {
        // f"{x:{width}}" — a format spec containing a nested replacement.
        let src = "f\"{x:{width}}\"";
        let ks = kinds(src);
        use TokenKind::*;
        assert_eq!(
            ks,
            vec![
                FstringStart,
                LBrace,
                Identifier,
                Colon,
                LBrace,
                Identifier,
                RBrace,
                RBrace,
                FstringEnd,
                Newline,
                Endmarker,
            ]
        );
    }

    #[test]
    fn test_simple_fstring_expr() {
        let ks = kinds("f\"hi {name}\"");
        use TokenKind::*;
        assert_eq!(
            ks,
            vec![
                FstringStart,
                FstringMiddle,
                LBrace,
                Identifier,
                RBrace,
                FstringEnd,
                Newline,
                Endmarker,
            ]
        );
    }

    #[test]
    fn test_indent_dedent_sequence() {
        let src = "if x:\n    y\nz\n";
        let ks = kinds(src);
        use TokenKind::*;
        assert_eq!(
            ks,
            vec![
                Identifier, Whitespace, Identifier, Op, Newline, Indent, Identifier, Newline, Dedent, Identifier,
                Newline, Endmarker,
            ]
        );
    }

    #[test]
    fn test_line_continuation() {
        let ks = kinds("x = 1 + \\\n    2\n");
        use TokenKind::*;
        assert_eq!(
            ks,
            vec![
                Identifier, Whitespace, Op, Whitespace, Number, Whitespace, Op, Whitespace, Number, Newline,
                Endmarker,
            ]
        );
    }

    #[test]
    fn test_walrus_and_plain_colon_distinguished_from_def_colon() {
        use TokenKind::*;
        // a plain statement-level colon is Op, not the f-string-only Colon kind
        assert_eq!(kinds("if True:\n    pass\n")[3], Op);
        // walrus is a single OP token, not Colon followed by Op
        let ks = kinds("(x := 1)\n");
        assert_eq!(ks[0], LParen);
        assert_eq!(ks[2], Op); // `:=`
    }

    #[test]
    fn test_ellipsis_vs_attribute_dot() {
        use TokenKind::*;
        assert_eq!(kinds("...\n"), vec![Op, Newline, Endmarker]);
        assert_eq!(kinds("a.b\n"), vec![Identifier, Op, Identifier, Newline, Endmarker]);
    }

    #[test]
    fn test_inconsistent_tabs_and_spaces_errors() {
        let src = "if x:\n    y\n\tz\n";
        let mut lx = Lexer::new(src);
        let mut saw_error = false;
        for r in &mut lx {
            if r.is_err() {
                saw_error = true;
                break;
            }
        }
        assert!(saw_error);
    }

    #[test]
    fn test_unterminated_string_errors() {
        let mut lx = Lexer::new("'abc");
        let mut results: Vec<_> = (&mut lx).collect();
        assert!(results.pop().unwrap().is_err());
    }

    #[test]
    fn test_fused_after_error() {
        let mut lx = Lexer::new("'abc");
        assert!(lx.next().unwrap().is_err());
        assert!(lx.next().is_none());
    }

    #[test]
    fn test_fused_after_endmarker() {
        let mut lx = Lexer::new("x\n");
        let all: Vec<_> = (&mut lx).collect();
        assert_eq!(all.last().unwrap().as_ref().unwrap().kind, TokenKind::Endmarker);
        assert!(lx.next().is_none());
    }

    #[test]
    fn test_nested_fstring_in_tstring() {
        let src = "t\"foo {f'bar'} baz\"\n";
        use TokenKind::*;
        assert_eq!(
            kinds(src),
            vec![
                TstringStart,
                TstringMiddle,
                LBrace,
                FstringStart,
                FstringMiddle,
                FstringEnd,
                RBrace,
                TstringMiddle,
                TstringEnd,
                Newline,
                Endmarker,
            ]
        );
    }

    #[test]
    fn test_multi_line_dedent_after_escaped_newline() {
        // The backslash continuation lands the cursor back at column zero
        // mid-statement, which briefly collapses the indent stack to depth
        // zero (a DEDENT) before `True:` re-establishes it with a fresh
        // INDENT, the same column-zero dedent check that fires for any
        // line beginning right on a real character.
        let src = "if True:\n    if \\\nTrue:\n        pass\n    pass\npass";
        use TokenKind::*;
        assert_eq!(
            spans(src),
            vec![
                (Identifier, 0, 2),
                (Whitespace, 2, 3),
                (Identifier, 3, 7),
                (Op, 7, 8),
                (Newline, 8, 9),
                (Indent, 9, 13),
                (Identifier, 13, 15),
                (Whitespace, 15, 16),
                (Whitespace, 16, 18), // the "\\\n" continuation
                (Whitespace, 18, 18), // zero-width: flags the pending dedent
                (Dedent, 18, 18),
                (Identifier, 18, 22),
                (Op, 22, 23),
                (Newline, 23, 24),
                (Indent, 24, 32),
                (Identifier, 32, 36),
                (Newline, 36, 37),
                (Whitespace, 37, 41),
                (Dedent, 41, 41),
                (Identifier, 41, 45),
                (Newline, 45, 46),
                (Identifier, 46, 50),
                (Newline, 50, 51), // synthesized trailing newline, no source \n
                (Endmarker, 51, 51),
            ]
        );
    }

    /// Reconstructs the source by concatenating every in-range token's
    /// lexeme, skipping zero-width tokens (DEDENT, ENDMARKER).
    fn round_trip(src: &str) -> String {
        let mut out = String::new();
        for r in Lexer::new(src) {
            let t = r.unwrap();
            if t.is_empty() {
                continue;
            }
            if (t.end_byte as usize) <= src.len() {
                out.push_str(t.text(src));
            }
        }
        out
    }

    #[test]
    fn test_round_trip_reconstructs_source() {
        for src in [
            "def foo():\n    7.e1\n",
            "if x:\n    y\nz\n",
            "x = 1 + \\\n    2\n",
            "f\"hi {name}\"\n",
            "t\"foo {f'bar'} baz\"\n",
            "if True:\n    if \\\nTrue:\n        pass\n    pass\npass",
        ] {
            assert_eq!(round_trip(src), src, "round-trip mismatch for {src:?}");
        }
    }

    #[test]
    fn test_round_trip_adds_at_most_one_synthesized_newline() {
        let src = "x = 1";
        let rebuilt = round_trip(src);
        assert!(
            rebuilt == src || rebuilt == format!("{src}\n"),
            "expected source or source plus one synthesized newline, got {rebuilt:?}"
        );
    }
}
