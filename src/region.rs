//! A single unit of text detached from the buffer and put back elsewhere.
//!
//! Lifecycle: [`CutRegion::capture`] → [`CutRegion::commit_erasure`] →
//! any number of [`CutRegion::move_by`] → [`CutRegion::commit_insertion`].
//! Siblings report their own edits through the `notify_*` methods so the
//! region's coordinates always describe the buffer as it currently is.

use crate::error::{MoveError, Result};
use crate::model::cursor::{Selection, Span};
use crate::model::unit::{Direction, Unit};
use crate::model::view::TextView;
use crate::motion::{self, BoundaryService};

/// Live coordinate of a detached region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Offset in the text, for horizontal moves.
    Position(usize),
    /// Row index, for line moves.
    Row(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    /// Still in the buffer at this span.
    Pending(Span),
    /// Erased; waiting to be put back at the anchor.
    Detached(Anchor),
    /// Reinserted. Terminal.
    Placed,
}

/// Horizontal position a line move tries to keep.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Column {
    index: usize,
    xpos: f64,
}

/// What a sibling inserted, as seen by regions still waiting to be inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Insertion {
    pub span: Span,
    pub row: usize,
    pub line_breaks: usize,
}

#[derive(Debug, Clone)]
pub struct CutRegion {
    unit: Unit,
    text: String,
    text_len: usize,
    stage: Stage,
    /// Caret column inside the captured line, when a bare caret captured it.
    caret_within_line: Option<usize>,
    column: Option<Column>,
    /// Captured line is the last one and has no terminator.
    unterminated: bool,
}

impl CutRegion {
    /// Capture the text a move of `unit` detaches for `selection`.
    ///
    /// A bare caret moving by line takes its whole line, terminator included.
    pub fn capture(view: &dyn TextView, selection: &Selection, unit: Unit) -> Result<Self> {
        let vertical = unit.is_vertical();

        let (span, caret_within_line) = if vertical && selection.is_caret() {
            let line = view.full_line_of(selection.head);
            (line, Some(selection.head - line.begin))
        } else {
            (selection.span(), None)
        };

        let text = view.substring(span);
        let column = if vertical {
            Some(capture_column(view, selection, span, caret_within_line.is_some())?)
        } else {
            None
        };
        let unterminated =
            caret_within_line.is_some() && !text.is_empty() && !text.ends_with('\n');

        Ok(Self {
            unit,
            text_len: span.len(),
            text,
            stage: Stage::Pending(span),
            caret_within_line,
            column,
            unterminated,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_vertical(&self) -> bool {
        self.unit.is_vertical()
    }

    /// Span still occupied in the buffer, before erasure.
    pub fn pending_span(&self) -> Option<Span> {
        match self.stage {
            Stage::Pending(span) => Some(span),
            _ => None,
        }
    }

    pub fn anchor(&self) -> Option<Anchor> {
        match self.stage {
            Stage::Detached(anchor) => Some(anchor),
            _ => None,
        }
    }

    pub fn is_placed(&self) -> bool {
        self.stage == Stage::Placed
    }

    /// Remove the captured text from the buffer and return the erased span.
    pub fn commit_erasure(&mut self, view: &mut dyn TextView) -> Result<Span> {
        let Stage::Pending(span) = self.stage else {
            return Err(MoveError::PreconditionViolation("region already erased"));
        };

        view.erase(span);
        let anchor = if self.is_vertical() {
            Anchor::Row(view.row_col(span.begin).0)
        } else {
            Anchor::Position(span.begin)
        };
        self.stage = Stage::Detached(anchor);
        Ok(span)
    }

    /// A sibling before this region erased `erased`.
    pub fn notify_of_erasure(&mut self, erased: Span) -> Result<()> {
        let Stage::Pending(span) = &mut self.stage else {
            return Err(MoveError::PreconditionViolation(
                "erasure reported to a region that is no longer pending",
            ));
        };
        if erased.end > span.begin {
            return Err(MoveError::OrderingViolation {
                edit: erased,
                pending: *span,
            });
        }

        *span = span.shifted_left(erased.len());
        Ok(())
    }

    /// Move the anchor `times` units in `direction`.
    pub fn move_by(
        &mut self,
        view: &dyn TextView,
        direction: Direction,
        times: usize,
        boundaries: &dyn BoundaryService,
    ) -> Result<()> {
        let Stage::Detached(anchor) = self.stage else {
            return Err(MoveError::PreconditionViolation("region moved while not detached"));
        };

        let anchor = match anchor {
            Anchor::Position(mut pos) => {
                if self.unit.is_line_boundary() && times != 1 {
                    return Err(MoveError::InvalidArgument(format!(
                        "`{}` moves exactly once, got {times}",
                        self.unit
                    )));
                }
                self.column = None;
                for _ in 0..times {
                    pos = motion::resolve(view, pos, self.unit, direction, boundaries)?;
                }
                Anchor::Position(pos)
            }
            Anchor::Row(row) => Anchor::Row(match direction {
                Direction::Forward => {
                    let last = view.max_row() + usize::from(self.can_follow_last_line(view));
                    row.saturating_add(times).min(last)
                }
                Direction::Backward => row.saturating_sub(times),
            }),
        };

        self.stage = Stage::Detached(anchor);
        Ok(())
    }

    /// Put the text back at the anchor and select it.
    pub fn commit_insertion(&mut self, view: &mut dyn TextView) -> Result<Insertion> {
        let Stage::Detached(anchor) = self.stage else {
            return Err(MoveError::PreconditionViolation("region inserted while not detached"));
        };

        let insertion = match anchor {
            Anchor::Position(pos) => {
                view.insert_at(pos, &self.text);
                let span = Span::new(pos, pos + self.text_len);
                view.selections_mut().add(Selection::new(span.begin, span.end));
                Insertion {
                    span,
                    row: view.row_col(pos).0,
                    line_breaks: line_breaks(&self.text),
                }
            }
            Anchor::Row(row) => self.insert_line(view, row)?,
        };

        self.stage = Stage::Placed;
        Ok(insertion)
    }

    /// A terminated line may go one row past an unterminated last line.
    fn can_follow_last_line(&self, view: &dyn TextView) -> bool {
        let len = view.len_chars();
        self.text.ends_with('\n') && len > 0 && view.char_at(len - 1) != Some('\n')
    }

    fn insert_line(&self, view: &mut dyn TextView, row: usize) -> Result<Insertion> {
        let column = self
            .column
            .ok_or(MoveError::PreconditionViolation("line region without a column"))?;

        let len = view.len_chars();
        let mut lead = 0;
        let mut drop_trailing = 0;
        let (pt, inserted) = if row > view.max_row() {
            // Below an unterminated last line: the terminator goes in front.
            let (content, terminator) = split_terminator(&self.text);
            lead = terminator.chars().count();
            (len, format!("{terminator}{content}"))
        } else {
            let line = view.line_of(view.position_at(row, 0));
            let pt = view.position_at(row, column.index.min(line.len()));
            let terminator = trailing_terminator(view);
            if self.unterminated && pt < len && !terminator.is_empty() {
                // The line came from the end of the buffer: give it the buffer's
                // terminator here and drop the one it left behind.
                drop_trailing = terminator.chars().count();
                (pt, format!("{}{terminator}", self.text))
            } else {
                (pt, self.text.clone())
            }
        };
        let row = view.row_col(pt).0;

        view.insert_at(pt, &inserted);
        if drop_trailing > 0 {
            let end = view.len_chars();
            view.erase(Span::new(end - drop_trailing, end));
        }

        let span = Span::new(pt, pt + inserted.chars().count());
        let selection = match self.caret_within_line {
            Some(offset) => Selection::caret(pt + lead + offset),
            None => Selection::new(span.begin + lead, span.end).with_xpos(column.xpos),
        };
        view.selections_mut().add(selection);

        Ok(Insertion {
            span,
            row,
            line_breaks: line_breaks(&inserted),
        })
    }

    /// A sibling before this region was reinserted.
    ///
    /// Only insertions at or before the anchor push it along; a sibling that
    /// travelled past this region leaves it where it is.
    pub fn notify_of_insertion(&mut self, insertion: &Insertion) -> Result<()> {
        let Stage::Detached(anchor) = &mut self.stage else {
            return Err(MoveError::PreconditionViolation(
                "insertion reported to a region that is not detached",
            ));
        };

        match anchor {
            Anchor::Position(pos) if insertion.span.begin <= *pos => {
                *pos += insertion.span.len();
            }
            Anchor::Row(row) if insertion.row <= *row => {
                *row += insertion.line_breaks;
            }
            _ => {}
        }
        Ok(())
    }
}

fn capture_column(
    view: &dyn TextView,
    selection: &Selection,
    span: Span,
    bare_caret: bool,
) -> Result<Column> {
    let width = view.column_width();
    if width == 0.0 || !width.is_finite() {
        return Err(MoveError::PreconditionViolation(
            "column width must be a non-zero finite number",
        ));
    }

    Ok(match selection.xpos {
        Some(xpos) if !bare_caret => Column {
            index: (xpos / width).round() as usize,
            xpos,
        },
        _ => {
            let index = view.row_col(span.begin).1;
            Column {
                index,
                xpos: index as f64 * width,
            }
        }
    })
}

fn split_terminator(text: &str) -> (&str, &str) {
    let content = text
        .strip_suffix("\r\n")
        .or_else(|| text.strip_suffix('\n'))
        .unwrap_or(text);
    (content, &text[content.len()..])
}

/// `"\r\n"` or `"\n"` when the buffer ends with one, else `""`.
fn trailing_terminator(view: &dyn TextView) -> &'static str {
    let len = view.len_chars();
    let back = |n: usize| len.checked_sub(n).and_then(|i| view.char_at(i));
    match (back(2), back(1)) {
        (Some('\r'), Some('\n')) => "\r\n",
        (_, Some('\n')) => "\n",
        _ => "",
    }
}

fn line_breaks(text: &str) -> usize {
    text.matches('\n').count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::buffer::Buffer;
    use crate::motion::PrimitiveMotion;

    #[test]
    fn test_caret_captures_full_line() {
        let buf = Buffer::from_text("one\ntwo\nthree");
        let region = CutRegion::capture(&buf, &Selection::caret(5), Unit::Line).unwrap();

        assert_eq!(region.text(), "two\n");
        assert_eq!(region.pending_span(), Some(Span::new(4, 8)));
        assert_eq!(region.caret_within_line, Some(1));
        assert_eq!(region.column.map(|c| c.index), Some(0));
        assert!(!region.unterminated);
    }

    #[test]
    fn test_selection_keeps_xpos() {
        let buf = Buffer::from_text("one\ntwo\n");
        let selection = Selection::new(5, 7).with_xpos(3.0);
        let region = CutRegion::capture(&buf, &selection, Unit::Line).unwrap();

        assert_eq!(region.text(), "wo");
        assert_eq!(region.column, Some(Column { index: 3, xpos: 3.0 }));
    }

    #[test]
    fn test_zero_column_width_rejected() {
        let buf = Buffer::from_text("one\n").with_column_width(0.0);
        let result = CutRegion::capture(&buf, &Selection::caret(0), Unit::Line);
        assert!(matches!(result, Err(MoveError::PreconditionViolation(_))));

        // horizontal moves never consult the metrics
        assert!(CutRegion::capture(&buf, &Selection::caret(0), Unit::Char).is_ok());
    }

    #[test]
    fn test_lifecycle_order_enforced() {
        let mut buf = Buffer::from_text("abc");
        let mut region = CutRegion::capture(&buf, &Selection::new(0, 1), Unit::Char).unwrap();

        assert!(region.commit_insertion(&mut buf).is_err());
        assert_eq!(region.commit_erasure(&mut buf), Ok(Span::new(0, 1)));
        assert!(region.commit_erasure(&mut buf).is_err());
        assert_eq!(region.anchor(), Some(Anchor::Position(0)));

        region
            .move_by(&buf, Direction::Forward, 1, &PrimitiveMotion)
            .unwrap();
        let insertion = region.commit_insertion(&mut buf).unwrap();

        assert_eq!(buf.text(), "bac");
        assert_eq!(insertion.span, Span::new(1, 2));
        assert!(region.is_placed());
        assert!(region.anchor().is_none() && region.pending_span().is_none());
    }

    #[test]
    fn test_erasure_notice_shifts_and_checks_order() {
        let buf = Buffer::from_text("abcdef");
        let mut region = CutRegion::capture(&buf, &Selection::new(4, 6), Unit::Char).unwrap();

        region.notify_of_erasure(Span::new(0, 2)).unwrap();
        assert_eq!(region.pending_span(), Some(Span::new(2, 4)));

        let err = region.notify_of_erasure(Span::new(1, 3)).unwrap_err();
        assert!(matches!(err, MoveError::OrderingViolation { .. }));
    }

    #[test]
    fn test_bol_eol_refuse_repeat() {
        let mut buf = Buffer::from_text("  abc");
        let mut region = CutRegion::capture(&buf, &Selection::caret(3), Unit::Eol).unwrap();
        region.commit_erasure(&mut buf).unwrap();

        let err = region
            .move_by(&buf, Direction::Forward, 2, &PrimitiveMotion)
            .unwrap_err();
        assert!(matches!(err, MoveError::InvalidArgument(_)));
    }

    #[test]
    fn test_row_clamps() {
        let mut buf = Buffer::from_text("a\nb\nc\n");
        let mut region = CutRegion::capture(&buf, &Selection::caret(2), Unit::Line).unwrap();
        region.commit_erasure(&mut buf).unwrap();

        region
            .move_by(&buf, Direction::Forward, 30, &PrimitiveMotion)
            .unwrap();
        assert_eq!(region.anchor(), Some(Anchor::Row(2)));
        region
            .move_by(&buf, Direction::Backward, 30, &PrimitiveMotion)
            .unwrap();
        assert_eq!(region.anchor(), Some(Anchor::Row(0)));
    }

    #[test]
    fn test_line_goes_below_unterminated_last_line() {
        let mut buf = Buffer::from_text("one\ntwo");
        let mut region = CutRegion::capture(&buf, &Selection::new(0, 4), Unit::Line).unwrap();
        region.commit_erasure(&mut buf).unwrap();

        region
            .move_by(&buf, Direction::Forward, 5, &PrimitiveMotion)
            .unwrap();
        assert_eq!(region.anchor(), Some(Anchor::Row(1)));

        let insertion = region.commit_insertion(&mut buf).unwrap();
        assert_eq!(buf.text(), "two\none");
        assert_eq!(insertion.span, Span::new(3, 7));
        assert_eq!(buf.selections.as_slice()[0].span(), Span::new(4, 7));
    }

    #[test]
    fn test_insertion_notice_skips_regions_behind() {
        let buf = Buffer::from_text("abcdef");
        let mut region = CutRegion::capture(&buf, &Selection::new(1, 2), Unit::Char).unwrap();
        region.stage = Stage::Detached(Anchor::Position(3));

        let behind = Insertion {
            span: Span::new(5, 7),
            row: 0,
            line_breaks: 0,
        };
        region.notify_of_insertion(&behind).unwrap();
        assert_eq!(region.anchor(), Some(Anchor::Position(3)));

        let ahead = Insertion {
            span: Span::new(3, 5),
            ..behind
        };
        region.notify_of_insertion(&ahead).unwrap();
        assert_eq!(region.anchor(), Some(Anchor::Position(5)));
    }
}
