//! Read cursor over a finite input sequence.

/// Input symbols plus a position clamped to the input length.
#[derive(Clone, Debug, Default)]
pub(crate) struct InputCursor {
    symbols: Vec<String>,
    position: usize,
}

impl InputCursor {
    pub fn load(&mut self, symbols: Vec<String>) {
        self.symbols = symbols;
        self.position = 0;
    }

    pub fn rewind(&mut self) {
        self.position = 0;
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Symbol under the cursor, `None` once the input is exhausted.
    pub fn current(&self) -> Option<&str> {
        self.symbols.get(self.position).map(String::as_str)
    }

    /// Position one symbol further, never past the end.
    pub fn next_position(&self) -> usize {
        (self.position + 1).min(self.symbols.len())
    }

    pub fn advance(&mut self) {
        self.position = self.next_position();
    }

    pub fn is_exhausted(&self) -> bool {
        self.position >= self.symbols.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::symbols;

    #[test]
    fn cursor_clamps_at_input_length() {
        let mut cursor = InputCursor::default();
        cursor.load(symbols("ab"));

        assert_eq!(cursor.current(), Some("a"));
        cursor.advance();
        cursor.advance();
        cursor.advance();

        assert_eq!(cursor.position(), 2);
        assert!(cursor.is_exhausted());
        assert_eq!(cursor.current(), None);
    }

    #[test]
    fn empty_input_starts_exhausted() {
        let cursor = InputCursor::default();
        assert!(cursor.is_exhausted());
        assert_eq!(cursor.next_position(), 0);
    }

    #[test]
    fn rewind_keeps_symbols() {
        let mut cursor = InputCursor::default();
        cursor.load(symbols("xyz"));
        cursor.advance();
        cursor.rewind();
        assert_eq!(cursor.position(), 0);
        assert_eq!(cursor.symbols().len(), 3);
    }
}
