use ropey::Rope;
use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::cursor::{Selection, SelectionSet, Span};
use super::view::TextView;

/// Column width used when no layout configuration is given.
pub const DEFAULT_COLUMN_WIDTH: f64 = 1.0;

/// A single text buffer backed by a Rope, with a multi-cursor selection set.
#[derive(Debug, Clone)]
pub struct Buffer {
    pub rope: Rope,
    pub path: Option<PathBuf>,
    pub dirty: bool,
    pub selections: SelectionSet,
    column_width: f64,
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Buffer {
    /// Create a new empty buffer.
    pub fn new() -> Self {
        Self::from_text("")
    }

    /// Create an unnamed buffer holding `text`.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            path: None,
            dirty: false,
            selections: SelectionSet::new(),
            column_width: DEFAULT_COLUMN_WIDTH,
        }
    }

    /// Create a buffer from file contents.
    pub fn from_file(path: PathBuf) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(&path)?;
        Ok(Self {
            path: Some(path),
            ..Self::from_text(&text)
        })
    }

    pub fn with_column_width(mut self, width: f64) -> Self {
        self.column_width = width;
        self
    }

    pub fn set_column_width(&mut self, width: f64) {
        self.column_width = width;
    }

    /// Write the contents back to `path`, or to the buffer's own path.
    pub fn save_to(&mut self, path: Option<&Path>) -> anyhow::Result<()> {
        let target = path
            .map(Path::to_path_buf)
            .or_else(|| self.path.clone())
            .ok_or_else(|| anyhow::anyhow!("buffer has no path"))?;
        let mut writer = BufWriter::new(File::create(&target)?);
        self.rope.write_to(&mut writer)?;
        writer.flush()?;
        self.dirty = false;
        Ok(())
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Replace the selection set.
    pub fn select(&mut self, selections: impl IntoIterator<Item = Selection>) {
        self.selections.clear();
        self.selections.add_all(selections);
    }

    /// Run `edit` as one unit: on error the text and selections are restored.
    pub fn transaction<T, E: Display>(
        &mut self,
        edit: impl FnOnce(&mut Self) -> Result<T, E>,
    ) -> Result<T, E> {
        let rope = self.rope.clone();
        let selections = self.selections.clone();
        let dirty = self.dirty;

        match edit(self) {
            Ok(value) => Ok(value),
            Err(err) => {
                tracing::warn!("edit rolled back: {err}");
                self.rope = rope;
                self.selections = selections;
                self.dirty = dirty;
                Err(err)
            }
        }
    }

    /// Length of line `idx` without its terminator.
    fn line_len(&self, idx: usize) -> usize {
        let line = self.rope.line(idx);
        let mut len = line.len_chars();
        if len > 0 && line.char(len - 1) == '\n' {
            len -= 1;
            if len > 0 && line.char(len - 1) == '\r' {
                len -= 1;
            }
        }
        len
    }

    fn clamp(&self, pos: usize) -> usize {
        pos.min(self.rope.len_chars())
    }
}

impl TextView for Buffer {
    fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    fn char_at(&self, pos: usize) -> Option<char> {
        self.rope.get_char(pos)
    }

    fn line_of(&self, pos: usize) -> Span {
        let idx = self.rope.char_to_line(self.clamp(pos));
        let start = self.rope.line_to_char(idx);
        Span::new(start, start + self.line_len(idx))
    }

    fn full_line_of(&self, pos: usize) -> Span {
        let idx = self.rope.char_to_line(self.clamp(pos));
        let start = self.rope.line_to_char(idx);
        Span::new(start, start + self.rope.line(idx).len_chars())
    }

    fn substring(&self, span: Span) -> String {
        self.rope
            .slice(self.clamp(span.begin)..self.clamp(span.end))
            .to_string()
    }

    fn insert_at(&mut self, pos: usize, text: &str) {
        if text.is_empty() {
            return;
        }
        let pos = self.clamp(pos);
        self.rope.insert(pos, text);
        self.selections.adjust_for_insert(pos, text.chars().count());
        self.dirty = true;
    }

    fn erase(&mut self, span: Span) {
        let span = Span::new(self.clamp(span.begin), self.clamp(span.end));
        if span.is_empty() {
            return;
        }
        self.rope.remove(span.begin..span.end);
        self.selections.adjust_for_erase(span);
        self.dirty = true;
    }

    fn row_col(&self, pos: usize) -> (usize, usize) {
        let pos = self.clamp(pos);
        let row = self.rope.char_to_line(pos);
        (row, pos - self.rope.line_to_char(row))
    }

    fn position_at(&self, row: usize, col: usize) -> usize {
        let row = row.min(self.rope.len_lines().saturating_sub(1));
        self.rope.line_to_char(row) + col.min(self.line_len(row))
    }

    fn column_width(&self) -> f64 {
        self.column_width
    }

    fn selections(&self) -> &SelectionSet {
        &self.selections
    }

    fn selections_mut(&mut self) -> &mut SelectionSet {
        &mut self.selections
    }
}
