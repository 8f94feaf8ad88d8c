//! Incremental byte/line/column tracking.
//!
//! The tokenizer advances its cursor by one lexeme at a time and cannot
//! afford an O(n) rescan from the start of the source on every token, so
//! `Position` tracks line/column incrementally as bytes are consumed rather
//! than recomputing them from an offset on demand.
//!
//! Columns are raw byte offsets from the start of the line, not expanded to
//! a fixed tab-stop width.

/// Tracks a cursor's byte offset, line number, and column as the tokenizer
/// advances over the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub byte_offset: u32,
    pub line: u32,
    pub col: u32,
}

impl Position {
    pub fn start() -> Self {
        Position {
            byte_offset: 0,
            line: 1,
            col: 0,
        }
    }

    /// Advance past `text`, updating line/col for every `\n` crossed.
    ///
    /// A line break resets `col` to zero and bumps `line`; anything else
    /// advances `col` by its byte length. `\r` is not itself a line break
    /// here — the caller is responsible for consuming `\r\n` or bare `\r`
    /// as whitespace/newline runs and calling `advance` with the whole run.
    pub fn advance(&mut self, text: &str) {
        let mut first = true;
        for segment in text.split('\n') {
            if !first {
                self.line += 1;
                self.col = 0;
            }
            self.byte_offset += segment.len() as u32;
            self.col += segment.len() as u32;
            first = false;
        }
    }
}
