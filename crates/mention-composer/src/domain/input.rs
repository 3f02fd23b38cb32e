//! Editable text buffer with a character-offset cursor.
//!
//! The cursor invariant `0 <= cursor <= text.chars().count()` holds after
//! every mutation; all public setters clamp rather than panic.

/// Text buffer plus cursor, the engine's proposed editing state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputBuffer {
    text: String,
    cursor: usize,
}

impl InputBuffer {
    /// Creates an empty buffer with the cursor at position `0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the cursor as a character offset.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns the text length in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Returns whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Moves the cursor, clamped into the valid range.
    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor.min(self.char_len());
    }

    /// Replaces both text and cursor, clamping the cursor.
    pub fn set_contents(&mut self, text: String, cursor: usize) {
        self.text = text;
        self.set_cursor(cursor);
    }

    /// Drains the buffer and resets the cursor to `0`.
    pub fn take_text(&mut self) -> String {
        self.cursor = 0;

        std::mem::take(&mut self.text)
    }

    /// Inserts one character at the cursor and advances past it.
    pub fn insert_char(&mut self, ch: char) {
        let at = self.byte_offset(self.cursor);
        self.text.insert(at, ch);
        self.cursor += 1;
    }

    /// Inserts a string at the cursor and moves the cursor past it.
    pub fn insert_str(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }

        let at = self.byte_offset(self.cursor);
        self.text.insert_str(at, text);
        self.cursor += text.chars().count();
    }

    /// Inserts a newline at the cursor.
    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    /// Deletes the character before the cursor, if any.
    pub fn delete_backward(&mut self) {
        if self.cursor == 0 {
            return;
        }

        let start = self.byte_offset(self.cursor - 1);
        let end = self.byte_offset(self.cursor);
        self.text.replace_range(start..end, "");
        self.cursor -= 1;
    }

    /// Deletes the character at the cursor, if any.
    pub fn delete_forward(&mut self) {
        if self.cursor >= self.char_len() {
            return;
        }

        let start = self.byte_offset(self.cursor);
        let end = self.byte_offset(self.cursor + 1);
        self.text.replace_range(start..end, "");
    }

    /// Moves the cursor one character left.
    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Moves the cursor one character right.
    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_len());
    }

    /// Moves the cursor to the start of the buffer.
    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    /// Moves the cursor to the end of the buffer.
    pub fn move_end(&mut self) {
        self.cursor = self.char_len();
    }

    /// Moves the cursor to the previous logical line, preserving the
    /// column where the line is long enough.
    pub fn move_up(&mut self) {
        let starts = self.line_starts();
        let line = current_line(&starts, self.cursor);
        if line == 0 {
            self.cursor = 0;

            return;
        }

        let column = self.cursor - starts[line];
        self.cursor = starts[line - 1] + column.min(line_len(&starts, line - 1, self.char_len()));
    }

    /// Moves the cursor to the next logical line, preserving the column
    /// where the line is long enough.
    pub fn move_down(&mut self) {
        let starts = self.line_starts();
        let line = current_line(&starts, self.cursor);
        if line + 1 >= starts.len() {
            self.cursor = self.char_len();

            return;
        }

        let column = self.cursor - starts[line];
        self.cursor = starts[line + 1] + column.min(line_len(&starts, line + 1, self.char_len()));
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map_or(self.text.len(), |(offset, _)| offset)
    }

    /// Character offsets at which each logical line begins.
    fn line_starts(&self) -> Vec<usize> {
        let mut starts = vec![0];
        for (index, ch) in self.text.chars().enumerate() {
            if ch == '\n' {
                starts.push(index + 1);
            }
        }

        starts
    }
}

/// Index of the line containing the character offset `cursor`.
fn current_line(starts: &[usize], cursor: usize) -> usize {
    starts
        .iter()
        .rposition(|&start| start <= cursor)
        .unwrap_or(0)
}

/// Length of line `line` excluding its terminating newline.
fn line_len(starts: &[usize], line: usize, char_len: usize) -> usize {
    let end = starts
        .get(line + 1)
        .map_or(char_len, |next| next.saturating_sub(1));

    end - starts[line]
}
