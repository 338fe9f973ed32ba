//! Where a unit lands when it moves one step along the text.

pub mod boundary;
#[cfg(feature = "granular")]
pub mod granular;

pub use boundary::{BoundaryService, PrimitiveMotion};
#[cfg(feature = "granular")]
pub use granular::GranularSegmenter;

use crate::error::{MoveError, Result};
use crate::model::cursor::Span;
use crate::model::unit::{Direction, Unit};
use crate::model::view::TextView;

/// Position one `unit` away from `pos`.
///
/// Lexical units go through `boundaries`; `bol`/`eol` ignore `direction`.
pub fn resolve(
    view: &dyn TextView,
    pos: usize,
    unit: Unit,
    direction: Direction,
    boundaries: &dyn BoundaryService,
) -> Result<usize> {
    let forward = direction.is_forward();
    let next = match unit {
        Unit::Char if forward => (pos + 1).min(view.len_chars()),
        Unit::Char => pos.saturating_sub(1),
        Unit::Subword | Unit::Word | Unit::Bigword if forward => {
            boundaries.boundary_end(view, pos, unit)
        }
        Unit::Subword | Unit::Word | Unit::Bigword => boundaries.boundary_start(view, pos, unit),
        Unit::Eol => view.line_of(pos).end,
        Unit::Bol => {
            let (line, content) = trimmed_line(view, pos);
            match content {
                Some(content) if content.begin != pos => content.begin,
                _ => line.begin,
            }
        }
        Unit::Line => {
            return Err(MoveError::InvalidUnit {
                unit,
                operation: "horizontal movement",
            });
        }
    };
    Ok(next)
}

/// The line around `pos`, and its content with leading and trailing spaces
/// trimmed (`None` when the line is empty or all spaces).
pub fn trimmed_line(view: &dyn TextView, pos: usize) -> (Span, Option<Span>) {
    let line = view.line_of(pos);
    let is_space = |idx: usize| view.char_at(idx) == Some(' ');

    let leading = (line.begin..line.end).take_while(|&i| is_space(i)).count();
    if leading == line.len() {
        return (line, None);
    }
    let trailing = (line.begin..line.end).rev().take_while(|&i| is_space(i)).count();

    (line, Some(Span::new(line.begin + leading, line.end - trailing)))
}
