//! Indent stack: drives INDENT/DEDENT emission and tab/space consistency.
//!
//! Each entry is an owned copy of the exact whitespace bytes that opened
//! that indentation level — a `String`, not a borrow, since the stack
//! outlives any one token and the lexer already borrows the source
//! immutably elsewhere.

/// Ordered stack of indentation prefixes. An empty stack means "column
/// zero" — the implicit top level, never itself pushed.
#[derive(Debug, Default)]
pub struct IndentStack {
    levels: Vec<String>,
}

/// How a freshly-scanned indentation run `new` compares to the stack top.
pub enum IndentChange {
    /// Same depth, same bytes (or both empty): no INDENT/DEDENT.
    Same,
    /// Deeper than the stack top; push `new` onto the stack.
    Indent,
    /// Shallower; pop until the top has length `<= new.len()`. Carries the
    /// number of levels popped, i.e. the number of DEDENTs to emit.
    Dedent(u32),
    /// Same length as the stack top but different bytes — tab/space clash.
    Inconsistent,
    /// Deeper than the stack top but not a byte-prefix extension of it.
    InconsistentPrefix,
    /// Shallower but no remaining level has exactly this length.
    NoMatchingOuterLevel,
}

impl IndentStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    fn top(&self) -> &str {
        self.levels.last().map(String::as_str).unwrap_or("")
    }

    /// Classify `new` against the current top and, for `Indent`/`Dedent`,
    /// mutate the stack to match. Does not push on `Same`/`Inconsistent*`.
    pub fn classify_and_apply(&mut self, new: &str) -> IndentChange {
        let top = self.top();

        if new.len() == top.len() {
            if new == top {
                IndentChange::Same
            } else {
                IndentChange::Inconsistent
            }
        } else if new.len() > top.len() {
            if !top.is_empty() && !new.starts_with(top) {
                return IndentChange::InconsistentPrefix;
            }
            self.levels.push(new.to_string());
            IndentChange::Indent
        } else {
            let mut popped = 0u32;
            while self.top().len() > new.len() {
                self.levels.pop();
                popped += 1;
            }
            if self.top().len() == new.len() {
                IndentChange::Dedent(popped)
            } else {
                IndentChange::NoMatchingOuterLevel
            }
        }
    }

    /// Pop one level, for EOF drain. Returns `false` if already empty.
    pub fn pop(&mut self) -> bool {
        self.levels.pop().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_indent() {
        let mut s = IndentStack::new();
        assert!(matches!(s.classify_and_apply("    "), IndentChange::Indent));
        assert_eq!(s.depth(), 1);
    }

    #[test]
    fn test_same_level_empty() {
        let mut s = IndentStack::new();
        assert!(matches!(s.classify_and_apply(""), IndentChange::Same));
        assert_eq!(s.depth(), 0);
    }

    #[test]
    fn test_dedent_back_to_zero() {
        let mut s = IndentStack::new();
        s.classify_and_apply("    ");
        match s.classify_and_apply("") {
            IndentChange::Dedent(n) => assert_eq!(n, 1),
            _ => panic!("expected Dedent"),
        }
        assert!(s.is_empty());
    }

    #[test]
    fn test_multi_level_dedent() {
        let mut s = IndentStack::new();
        s.classify_and_apply("    ");
        s.classify_and_apply("        ");
        match s.classify_and_apply("") {
            IndentChange::Dedent(n) => assert_eq!(n, 2),
            _ => panic!("expected Dedent(2)"),
        }
    }

    #[test]
    fn test_inconsistent_same_length() {
        let mut s = IndentStack::new();
        s.classify_and_apply("    ");
        assert!(matches!(
            s.classify_and_apply("\t\t\t\t"),
            IndentChange::Inconsistent
        ));
    }

    #[test]
    fn test_inconsistent_prefix_on_indent() {
        let mut s = IndentStack::new();
        s.classify_and_apply("\t");
        assert!(matches!(
            s.classify_and_apply("    "),
            IndentChange::InconsistentPrefix
        ));
    }

    #[test]
    fn test_no_matching_outer_level() {
        let mut s = IndentStack::new();
        s.classify_and_apply("  ");
        s.classify_and_apply("      ");
        assert!(matches!(
            s.classify_and_apply("   "),
            IndentChange::NoMatchingOuterLevel
        ));
    }

    #[test]
    fn test_dedent_matches_by_length_not_bytes() {
        let mut s = IndentStack::new();
        s.classify_and_apply("  ");
        s.classify_and_apply("    ");
        match s.classify_and_apply("\t\t") {
            IndentChange::Dedent(n) => assert_eq!(n, 1),
            _ => panic!("dedent to an equal-length level must succeed even with different bytes"),
        }
    }
}
