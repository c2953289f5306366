//! The deep-dive line editor.
//!
//! A [`DeepDiveEditor`] holds an ordered chain of text lines for one input
//! field: the user writes a statement, commits it, and refines it on the
//! next line. The chain always contains at least one line and the active
//! index is always in bounds; every mutating operation preserves both.
//!
//! Key handling lives at the input boundary, which decodes raw keys into
//! [`EditorIntent`] values once. The mutation logic here never inspects key
//! codes and never sees the composition flag.

/// A tagged user intent against the active line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorIntent {
    /// Accept the active line and open an empty one below it.
    Commit,
    /// Remove the active (empty) line and focus the one above.
    DeleteBackward,
    /// Move focus one line up.
    FocusUp,
    /// Move focus one line down.
    FocusDown,
}

/// A single editable line with a char-indexed cursor.
///
/// The cursor counts chars, not bytes, so multibyte input keeps insertion
/// and deletion aligned.
#[derive(Debug, Clone, Default)]
pub struct LineBuffer {
    text: String,
    cursor: usize,
}

impl LineBuffer {
    #[must_use]
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.chars().count();
        Self { text, cursor }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Empty after trimming whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn enter_char(&mut self, new_char: char) {
        let index = self.byte_index();
        self.text.insert(index, new_char);
        self.move_cursor_right();
    }

    pub fn delete_char(&mut self) {
        if self.cursor == 0 {
            return;
        }

        let current_index = self.cursor;
        let before_char_to_delete = self.text.chars().take(current_index - 1);
        let after_char_to_delete = self.text.chars().skip(current_index);

        self.text = before_char_to_delete.chain(after_char_to_delete).collect();
        self.move_cursor_left();
    }

    pub fn delete_char_forward(&mut self) {
        let current_index = self.cursor;
        if current_index >= self.text.chars().count() {
            return;
        }

        let before_char = self.text.chars().take(current_index);
        let after_char = self.text.chars().skip(current_index + 1);

        self.text = before_char.chain(after_char).collect();
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        let moved = self.cursor.saturating_add(1);
        self.cursor = self.clamp_cursor(moved);
    }

    pub fn reset_cursor(&mut self) {
        self.cursor = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor = self.text.chars().count();
    }

    /// Byte offset of the cursor into the underlying string.
    #[must_use]
    pub fn byte_index(&self) -> usize {
        self.text
            .char_indices()
            .map(|(i, _)| i)
            .nth(self.cursor)
            .unwrap_or(self.text.len())
    }

    fn clamp_cursor(&self, new_cursor_pos: usize) -> usize {
        new_cursor_pos.clamp(0, self.text.chars().count())
    }
}

/// An ordered chain of progressively-refined lines for one input field.
#[derive(Debug)]
pub struct DeepDiveEditor {
    lines: Vec<LineBuffer>,
    active: usize,
    composing: bool,
}

impl Default for DeepDiveEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl DeepDiveEditor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            lines: vec![LineBuffer::default()],
            active: 0,
            composing: false,
        }
    }

    /// Rebuild a chain from a flattened value, preserving empty lines.
    ///
    /// Inverse of [`value`](Self::value): round-tripping reproduces the same
    /// line boundaries. Focus lands on the last line.
    #[must_use]
    pub fn from_value(value: &str) -> Self {
        if value.is_empty() {
            return Self::new();
        }

        let lines: Vec<LineBuffer> = value.split('\n').map(LineBuffer::from_text).collect();
        let active = lines.len() - 1;
        Self {
            lines,
            active,
            composing: false,
        }
    }

    /// The flattened value: lines joined with `\n`, empty lines preserved.
    #[must_use]
    pub fn value(&self) -> String {
        let texts: Vec<&str> = self.lines.iter().map(LineBuffer::text).collect();
        texts.join("\n")
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(LineBuffer::text)
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn active_index(&self) -> usize {
        self.active
    }

    #[must_use]
    pub fn active_line(&self) -> &LineBuffer {
        &self.lines[self.active]
    }

    fn active_line_mut(&mut self) -> &mut LineBuffer {
        &mut self.lines[self.active]
    }

    /// Whether a multi-keystroke composition (IME conversion) is in flight.
    /// Checked by the intent decoder, never by the mutation logic.
    #[must_use]
    pub fn is_composing(&self) -> bool {
        self.composing
    }

    /// Host hook for input sources that can report conversion state.
    /// Terminal key events carry no composition signal, so in the TUI the
    /// flag stays `false` and Enter always decodes to a commit.
    pub fn set_composing(&mut self, composing: bool) {
        self.composing = composing;
    }

    pub fn insert_char(&mut self, c: char) {
        self.active_line_mut().enter_char(c);
    }

    pub fn delete_char(&mut self) {
        self.active_line_mut().delete_char();
    }

    pub fn delete_char_forward(&mut self) {
        self.active_line_mut().delete_char_forward();
    }

    pub fn move_cursor_left(&mut self) {
        self.active_line_mut().move_cursor_left();
    }

    pub fn move_cursor_right(&mut self) {
        self.active_line_mut().move_cursor_right();
    }

    pub fn move_cursor_home(&mut self) {
        self.active_line_mut().reset_cursor();
    }

    pub fn move_cursor_end(&mut self) {
        self.active_line_mut().move_cursor_end();
    }

    /// Apply a decoded intent to the chain.
    ///
    /// Every arm preserves the invariant: at least one line, active index in
    /// bounds. Guard failures are silent no-ops.
    pub fn apply(&mut self, intent: EditorIntent) {
        match intent {
            EditorIntent::Commit => {
                // Cannot chain from an empty statement.
                if self.active_line().is_blank() {
                    return;
                }
                self.lines.insert(self.active + 1, LineBuffer::default());
                self.active += 1;
            }
            EditorIntent::DeleteBackward => {
                // The chain can never become empty, and only an emptied
                // line is removed.
                if self.lines.len() <= 1 || !self.active_line().is_empty() {
                    return;
                }
                self.lines.remove(self.active);
                self.active = self.active.saturating_sub(1);
                self.active_line_mut().move_cursor_end();
            }
            EditorIntent::FocusUp => {
                if self.active > 0 {
                    self.active -= 1;
                    self.active_line_mut().move_cursor_end();
                }
            }
            EditorIntent::FocusDown => {
                if self.active + 1 < self.lines.len() {
                    self.active += 1;
                    self.active_line_mut().move_cursor_end();
                }
            }
        }
    }

    /// Host-level "add another" control.
    ///
    /// Mirrors Commit's non-empty precondition, applied to the last line, so
    /// the on-screen control and the keyboard path stay consistent.
    pub fn append_line(&mut self) {
        let last = self.lines.last().expect("chain is never empty");
        if last.is_blank() {
            return;
        }

        self.lines.push(LineBuffer::default());
        self.active = self.lines.len() - 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_text(editor: &mut DeepDiveEditor, text: &str) {
        for c in text.chars() {
            editor.insert_char(c);
        }
    }

    #[test]
    fn starts_with_one_empty_focused_line() {
        let editor = DeepDiveEditor::new();
        assert_eq!(editor.line_count(), 1);
        assert_eq!(editor.active_index(), 0);
        assert_eq!(editor.value(), "");
    }

    #[test]
    fn commit_opens_a_new_line_below_and_focuses_it() {
        let mut editor = DeepDiveEditor::new();
        type_text(&mut editor, "a");

        editor.apply(EditorIntent::Commit);
        assert_eq!(editor.lines().collect::<Vec<_>>(), vec!["a", ""]);
        assert_eq!(editor.active_index(), 1);

        type_text(&mut editor, "b");
        editor.apply(EditorIntent::Commit);
        assert_eq!(editor.lines().collect::<Vec<_>>(), vec!["a", "b", ""]);
        assert_eq!(editor.active_index(), 2);
    }

    #[test]
    fn commit_on_blank_line_is_a_no_op() {
        let mut editor = DeepDiveEditor::new();
        editor.apply(EditorIntent::Commit);
        assert_eq!(editor.line_count(), 1);

        type_text(&mut editor, "   ");
        editor.apply(EditorIntent::Commit);
        assert_eq!(editor.line_count(), 1);
        assert_eq!(editor.active_index(), 0);
    }

    #[test]
    fn delete_backward_removes_empty_line_and_refocuses() {
        let mut editor = DeepDiveEditor::new();
        type_text(&mut editor, "a");
        editor.apply(EditorIntent::Commit);
        type_text(&mut editor, "b");
        editor.apply(EditorIntent::Commit);
        assert_eq!(editor.lines().collect::<Vec<_>>(), vec!["a", "b", ""]);

        editor.apply(EditorIntent::DeleteBackward);
        assert_eq!(editor.lines().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(editor.active_index(), 1);
        // Cursor lands at the end of the line above.
        assert_eq!(editor.active_line().cursor(), 1);
    }

    #[test]
    fn delete_backward_is_inverse_of_commit_on_untouched_line() {
        let mut editor = DeepDiveEditor::new();
        type_text(&mut editor, "thought");
        let before = editor.value();
        let before_len = editor.line_count();

        editor.apply(EditorIntent::Commit);
        editor.apply(EditorIntent::DeleteBackward);

        assert_eq!(editor.value(), before);
        assert_eq!(editor.line_count(), before_len);
        assert_eq!(editor.active_index(), 0);
    }

    #[test]
    fn delete_backward_on_last_remaining_line_is_a_no_op() {
        let mut editor = DeepDiveEditor::new();
        editor.apply(EditorIntent::DeleteBackward);
        assert_eq!(editor.line_count(), 1);
        assert_eq!(editor.active_index(), 0);
    }

    #[test]
    fn delete_backward_on_non_empty_line_is_a_no_op() {
        let mut editor = DeepDiveEditor::new();
        type_text(&mut editor, "a");
        editor.apply(EditorIntent::Commit);
        type_text(&mut editor, "b");

        editor.apply(EditorIntent::DeleteBackward);
        assert_eq!(editor.lines().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn delete_backward_on_first_of_many_keeps_focus_at_zero() {
        let mut editor = DeepDiveEditor::from_value("\nkeep");
        editor.apply(EditorIntent::FocusUp);
        assert_eq!(editor.active_index(), 0);

        editor.apply(EditorIntent::DeleteBackward);
        assert_eq!(editor.lines().collect::<Vec<_>>(), vec!["keep"]);
        assert_eq!(editor.active_index(), 0);
    }

    #[test]
    fn focus_moves_are_bounds_checked() {
        let mut editor = DeepDiveEditor::new();
        type_text(&mut editor, "a");
        editor.apply(EditorIntent::Commit);

        editor.apply(EditorIntent::FocusDown);
        assert_eq!(editor.active_index(), 1);

        editor.apply(EditorIntent::FocusUp);
        assert_eq!(editor.active_index(), 0);
        editor.apply(EditorIntent::FocusUp);
        assert_eq!(editor.active_index(), 0);
    }

    #[test]
    fn append_line_requires_non_blank_last_line() {
        let mut editor = DeepDiveEditor::new();
        editor.append_line();
        assert_eq!(editor.line_count(), 1);

        type_text(&mut editor, "a");
        editor.append_line();
        assert_eq!(editor.lines().collect::<Vec<_>>(), vec!["a", ""]);
        assert_eq!(editor.active_index(), 1);

        // Last line is now empty again: no-op.
        editor.apply(EditorIntent::FocusUp);
        editor.append_line();
        assert_eq!(editor.line_count(), 2);
    }

    #[test]
    fn value_round_trips_including_empty_interior_lines() {
        let flattened = "first\n\nthird\n";
        let editor = DeepDiveEditor::from_value(flattened);

        assert_eq!(
            editor.lines().collect::<Vec<_>>(),
            vec!["first", "", "third", ""]
        );
        assert_eq!(editor.value(), flattened);
        assert_eq!(editor.active_index(), 3);
    }

    #[test]
    fn unicode_cursor_stays_char_aligned() {
        let mut editor = DeepDiveEditor::new();
        type_text(&mut editor, "思考🦀");
        assert_eq!(editor.active_line().cursor(), 3);

        editor.move_cursor_left();
        editor.delete_char();
        assert_eq!(editor.active_line().text(), "思🦀");
        assert_eq!(editor.active_line().cursor(), 1);

        editor.insert_char('考');
        assert_eq!(editor.active_line().text(), "思考🦀");
    }

    #[test]
    fn composition_flag_does_not_gate_mutations() {
        // The guard lives in the decoder; once an intent reaches the editor
        // it is applied regardless of the flag.
        let mut editor = DeepDiveEditor::new();
        editor.set_composing(true);
        type_text(&mut editor, "a");
        editor.apply(EditorIntent::Commit);
        assert_eq!(editor.line_count(), 2);
    }
}
