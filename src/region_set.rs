//! Cut every selection at once, move the pieces, and put them back.
//!
//! Erasures run left to right and each one is reported to the regions after
//! it, so their spans always match the partly edited buffer. Insertions then
//! run left to right the same way. Regions live in a `Vec` and are addressed
//! by index while the buffer shifts underneath them.

use crate::error::{MoveError, Result};
use crate::model::unit::{Direction, Unit};
use crate::model::view::TextView;
use crate::motion::{BoundaryService, PrimitiveMotion};
use crate::region::CutRegion;

/// One invocation's worth of configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRequest {
    pub unit: Unit,
    pub direction: Direction,
    pub times: usize,
}

impl MoveRequest {
    pub fn new(unit: Unit, direction: Direction, times: usize) -> Self {
        Self {
            unit,
            direction,
            times,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.unit.is_line_boundary() && self.times != 1 {
            return Err(MoveError::InvalidArgument(format!(
                "`{}` moves exactly once, got {}",
                self.unit, self.times
            )));
        }
        Ok(())
    }
}

/// Totals for one invocation. Text is only relocated, so `erased == inserted`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveOutcome {
    pub regions: usize,
    pub erased: usize,
    pub inserted: usize,
}

/// Non-overlapping cut regions ordered by where they started.
#[derive(Debug, Default)]
pub struct RegionSet {
    regions: Vec<CutRegion>,
}

impl RegionSet {
    /// Capture one region per selection, then clear the selection set.
    ///
    /// Regions whose span starts before the previous kept region ends are
    /// dropped (two carets on one line, nested selections).
    pub fn collect(view: &mut dyn TextView, unit: Unit) -> Result<Self> {
        let source: &dyn TextView = view;
        let mut captured = source
            .selections()
            .iter()
            .map(|selection| CutRegion::capture(source, selection, unit))
            .collect::<Result<Vec<_>>>()?;
        view.selections_mut().clear();

        captured.sort_by_key(|region| region.pending_span().map(|span| span.begin));
        let total = captured.len();

        let mut regions: Vec<CutRegion> = Vec::with_capacity(total);
        for region in captured {
            let keep = match regions.last().and_then(CutRegion::pending_span) {
                Some(prev) => region
                    .pending_span()
                    .is_none_or(|next| prev.end <= next.begin),
                None => true,
            };
            if keep {
                regions.push(region);
            }
        }

        tracing::debug!(
            unit = %unit,
            captured = total,
            kept = regions.len(),
            "collected cut regions"
        );
        Ok(Self { regions })
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn regions(&self) -> &[CutRegion] {
        &self.regions
    }

    /// Erase every region; returns the number of chars removed.
    pub fn erase_all(&mut self, view: &mut dyn TextView) -> Result<usize> {
        let mut erased = 0;
        for idx in 0..self.regions.len() {
            let span = self.regions[idx].commit_erasure(view)?;
            for later in &mut self.regions[idx + 1..] {
                later.notify_of_erasure(span)?;
            }
            erased += span.len();
        }
        tracing::debug!(erased, "erased cut regions");
        Ok(erased)
    }

    pub fn move_all(
        &mut self,
        view: &dyn TextView,
        direction: Direction,
        times: usize,
        boundaries: &dyn BoundaryService,
    ) -> Result<()> {
        for region in &mut self.regions {
            region.move_by(view, direction, times, boundaries)?;
        }
        Ok(())
    }

    /// Reinsert every region; returns the number of chars added.
    pub fn insert_all(&mut self, view: &mut dyn TextView) -> Result<usize> {
        let mut inserted = 0;
        for idx in 0..self.regions.len() {
            let insertion = self.regions[idx].commit_insertion(view)?;
            for later in &mut self.regions[idx + 1..] {
                later.notify_of_insertion(&insertion)?;
            }
            inserted += self.regions[idx].text().chars().count();
        }
        tracing::debug!(inserted, "reinserted cut regions");
        Ok(inserted)
    }
}

/// Cut, move and reinsert the unit at every selection of `view`.
///
/// `boundaries` is the host's word segmentation; without one the built-in
/// [`PrimitiveMotion`] is used for the whole invocation.
pub fn grab_text(
    view: &mut dyn TextView,
    request: MoveRequest,
    boundaries: Option<&dyn BoundaryService>,
) -> Result<MoveOutcome> {
    request.validate()?;
    let boundaries = boundaries.unwrap_or(&PrimitiveMotion);

    let mut set = RegionSet::collect(view, request.unit)?;
    let erased = set.erase_all(view)?;
    set.move_all(view, request.direction, request.times, boundaries)?;
    let inserted = set.insert_all(view)?;

    tracing::debug!(
        unit = %request.unit,
        direction = ?request.direction,
        times = request.times,
        service = boundaries.name(),
        regions = set.len(),
        "moved text"
    );
    Ok(MoveOutcome {
        regions: set.len(),
        erased,
        inserted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::buffer::Buffer;
    use crate::model::cursor::{Selection, Span};

    fn spans(buf: &Buffer) -> Vec<Span> {
        buf.selections.iter().map(Selection::span).collect()
    }

    fn run(buf: &mut Buffer, unit: Unit, direction: Direction, times: usize) -> MoveOutcome {
        grab_text(buf, MoveRequest::new(unit, direction, times), None).unwrap()
    }

    #[test]
    fn test_collect_drops_overlaps() {
        let mut buf = Buffer::from_text("alpha\nbeta\n");
        buf.select([Selection::caret(1), Selection::caret(3), Selection::caret(7)]);

        let set = RegionSet::collect(&mut buf, Unit::Line).unwrap();
        assert_eq!(set.len(), 2);
        assert!(buf.selections.is_empty());
        assert_eq!(set.regions()[1].text(), "beta\n");
    }

    #[test]
    fn test_move_chars_right() {
        let mut buf = Buffer::from_text("ab cd");
        buf.select([Selection::new(0, 1), Selection::new(3, 4)]);

        let outcome = run(&mut buf, Unit::Char, Direction::Forward, 1);

        assert_eq!(buf.text(), "ba dc");
        assert_eq!(spans(&buf), vec![Span::new(1, 2), Span::new(4, 5)]);
        assert_eq!(outcome.erased, outcome.inserted);
    }

    #[test]
    fn test_adjacent_chars_travel_together() {
        let mut buf = Buffer::from_text("XYrest");
        buf.select([Selection::new(0, 1), Selection::new(1, 2)]);

        run(&mut buf, Unit::Char, Direction::Forward, 1);

        assert_eq!(buf.text(), "rXYest");
        assert_eq!(spans(&buf), vec![Span::new(1, 2), Span::new(2, 3)]);
    }

    #[test]
    fn test_word_moves_past_next_word() {
        let mut buf = Buffer::from_text("one two three");
        buf.select([Selection::new(0, 4)]);

        run(&mut buf, Unit::Word, Direction::Forward, 1);
        assert_eq!(buf.text(), "twoone  three");
        assert_eq!(spans(&buf), vec![Span::new(3, 7)]);
    }

    #[test]
    fn test_caret_lines_move_down() {
        let mut buf = Buffer::from_text("a\nb\nc\nd\n");
        buf.select([Selection::caret(0), Selection::caret(4)]);

        run(&mut buf, Unit::Line, Direction::Forward, 1);

        assert_eq!(buf.text(), "b\na\nd\nc\n");
        assert_eq!(spans(&buf), vec![Span::empty(2), Span::empty(6)]);
    }

    #[test]
    fn test_lines_sink_together() {
        let mut buf = Buffer::from_text("0\n1\n2\n3\n4\n5\n");
        buf.select([Selection::caret(0), Selection::caret(2)]);

        // both rows clamp to the bottom; the second is pushed below the first
        run(&mut buf, Unit::Line, Direction::Forward, 4);

        assert_eq!(buf.text(), "2\n3\n4\n5\n0\n1\n");
    }

    #[test]
    fn test_eol_with_count_fails_before_editing() {
        let mut buf = Buffer::from_text("abc\n");
        buf.select([Selection::caret(1)]);

        let err = grab_text(&mut buf, MoveRequest::new(Unit::Eol, Direction::Forward, 3), None)
            .unwrap_err();

        assert!(matches!(err, MoveError::InvalidArgument(_)));
        assert_eq!(buf.selections.len(), 1);
    }

    #[test]
    fn test_no_selections_is_a_no_op() {
        let mut buf = Buffer::from_text("abc");
        let outcome = run(&mut buf, Unit::Char, Direction::Forward, 1);
        assert_eq!(outcome, MoveOutcome::default());
        assert_eq!(buf.text(), "abc");
    }
}
