//! Character cursor used by the hand-written lexers
//!
//! Positions are byte offsets into the source and always sit on a char
//! boundary. Lookahead never goes past two characters.

#[derive(Debug, Clone)]
pub(crate) struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    /// Current byte offset
    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    /// Character under the cursor
    pub(crate) fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    /// Character `n` places after the one under the cursor (n <= 2)
    pub(crate) fn peek_nth(&self, n: usize) -> Option<char> {
        debug_assert!(n <= 2);
        self.text[self.pos..].chars().nth(n)
    }

    /// Check if the character under the cursor equals `ch`
    pub(crate) fn at(&self, ch: char) -> bool {
        self.peek() == Some(ch)
    }

    /// Advance past one character and return it
    pub(crate) fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    /// Advance while `pred` holds
    pub(crate) fn eat_while(&mut self, mut pred: impl FnMut(char) -> bool) {
        while let Some(ch) = self.peek() {
            if !pred(ch) {
                break;
            }
            self.pos += ch.len_utf8();
        }
    }

    /// Advance through the first occurrence of `terminator`, or to the end
    /// of input when it never appears
    pub(crate) fn eat_through(&mut self, terminator: &str) {
        match self.text[self.pos..].find(terminator) {
            Some(offset) => self.pos += offset + terminator.len(),
            None => self.pos = self.text.len(),
        }
    }

    /// Check if the remaining input starts with `prefix`
    pub(crate) fn starts_with(&self, prefix: &str) -> bool {
        self.text[self.pos..].starts_with(prefix)
    }

    /// Advance through the end of the current line, newline included
    pub(crate) fn eat_line(&mut self) {
        self.eat_while(|ch| ch != '\n');
        if self.at('\n') {
            self.bump();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peek_and_bump_multibyte() {
        let mut cursor = Cursor::new("é<");
        assert_eq!(cursor.peek(), Some('é'));
        assert_eq!(cursor.peek_nth(1), Some('<'));
        assert_eq!(cursor.bump(), Some('é'));
        assert_eq!(cursor.pos(), 2);
        assert!(cursor.at('<'));
    }

    #[test]
    fn test_eat_through_missing_terminator() {
        let mut cursor = Cursor::new("<!-- open");
        cursor.eat_through("-->");
        assert_eq!(cursor.pos(), 9);
        assert_eq!(cursor.peek(), None);
    }

    #[test]
    fn test_eat_line_includes_newline() {
        let mut cursor = Cursor::new("-- note\nSELECT");
        cursor.eat_line();
        assert_eq!(cursor.pos(), 8);
        assert!(cursor.starts_with("SELECT"));
    }
}
