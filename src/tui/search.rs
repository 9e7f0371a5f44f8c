/// Search input state for the TUI.
///
/// `cursor_pos` is a byte offset that always sits on a char boundary.
pub struct SearchState {
    pub query: String,
    pub cursor_pos: usize,
    pub focused: bool,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            query: String::new(),
            cursor_pos: 0,
            focused: true,
        }
    }
}

impl SearchState {
    pub fn insert_char(&mut self, c: char) {
        self.query.insert(self.cursor_pos, c);
        self.cursor_pos += c.len_utf8();
    }

    /// Append at the end regardless of the cursor
    pub fn push_char(&mut self, c: char) {
        self.query.push(c);
        self.cursor_pos = self.query.len();
    }

    /// Delete the char before the cursor. Returns true if the query changed.
    pub fn backspace(&mut self) -> bool {
        if self.cursor_pos == 0 {
            return false;
        }
        let prev = self.prev_boundary();
        self.query.remove(prev);
        self.cursor_pos = prev;
        true
    }

    /// Delete the char under the cursor. Returns true if the query changed.
    pub fn delete(&mut self) -> bool {
        if self.cursor_pos >= self.query.len() {
            return false;
        }
        self.query.remove(self.cursor_pos);
        true
    }

    pub fn move_left(&mut self) {
        if self.cursor_pos > 0 {
            self.cursor_pos = self.prev_boundary();
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor_pos < self.query.len() {
            self.cursor_pos = self.query[self.cursor_pos..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor_pos + i)
                .unwrap_or(self.query.len());
        }
    }

    pub fn move_home(&mut self) {
        self.cursor_pos = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor_pos = self.query.len();
    }

    /// Empty the query. Returns true if there was anything to clear.
    pub fn clear(&mut self) -> bool {
        let had_text = !self.query.is_empty();
        self.query.clear();
        self.cursor_pos = 0;
        had_text
    }

    /// Text left of the cursor, for placing the terminal cursor
    pub fn before_cursor(&self) -> &str {
        &self.query[..self.cursor_pos]
    }

    fn prev_boundary(&self) -> usize {
        self.query[..self.cursor_pos]
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }
}
