use super::cursor::{SelectionSet, Span};

/// Host editor services the move engine runs against.
///
/// Positions are offsets in `[0, len_chars()]`. Implementations are expected
/// to keep their selection set consistent with their own inserts and erasures.
pub trait TextView {
    fn len_chars(&self) -> usize;

    fn char_at(&self, pos: usize) -> Option<char>;

    /// Line containing `pos`, without its terminator.
    fn line_of(&self, pos: usize) -> Span;

    /// Line containing `pos`, including its terminator when it has one.
    fn full_line_of(&self, pos: usize) -> Span;

    fn substring(&self, span: Span) -> String;

    fn insert_at(&mut self, pos: usize, text: &str);

    fn erase(&mut self, span: Span);

    /// Zero-based `(row, column)` of `pos`.
    fn row_col(&self, pos: usize) -> (usize, usize);

    /// Offset of `(row, col)`, clamped to an existing row and to that row's length.
    fn position_at(&self, row: usize, col: usize) -> usize;

    /// Layout width of a single column.
    fn column_width(&self) -> f64;

    fn selections(&self) -> &SelectionSet;

    fn selections_mut(&mut self) -> &mut SelectionSet;

    /// Row of the buffer end.
    fn max_row(&self) -> usize {
        self.row_col(self.len_chars()).0
    }
}
