//! Key-binding context queries.

use std::str::FromStr;

use crate::model::cursor::Selection;
use crate::model::view::TextView;

/// The only context key answered here.
pub const EMPTY_OR_FULL_LINES_KEY: &str = "selection_is_empty_or_reaches_eol_bol";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equal,
    NotEqual,
}

impl FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "equal" | "==" => Ok(Operator::Equal),
            "not_equal" | "!=" => Ok(Operator::NotEqual),
            _ => Err(format!("unknown context operator: {s}")),
        }
    }
}

/// True for a bare caret, or for a selection that starts at the start of a
/// line and ends at the start of a line.
pub fn is_empty_or_full_lines(view: &dyn TextView, selection: &Selection) -> bool {
    if selection.is_caret() {
        return true;
    }

    let line_a = view.full_line_of(selection.anchor).begin;
    let line_b = view.full_line_of(selection.head).begin;

    line_a.min(line_b) == selection.begin() && line_a.max(line_b) == selection.end()
}

/// Answer a context query over the whole selection set.
///
/// Returns `None` for keys this crate does not know, so the host can ask
/// other providers. `match_all` requires every selection to match instead of
/// at least one.
pub fn query_context(
    view: &dyn TextView,
    key: &str,
    operator: Operator,
    operand: bool,
    match_all: bool,
) -> Option<bool> {
    if key != EMPTY_OR_FULL_LINES_KEY {
        return None;
    }

    let test = |selection: &Selection| {
        let full = is_empty_or_full_lines(view, selection);
        let value = match operator {
            Operator::Equal => full,
            Operator::NotEqual => !full,
        };
        value == operand
    };

    let selections = view.selections();
    Some(if match_all {
        selections.iter().all(test)
    } else {
        selections.iter().any(test)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::buffer::Buffer;

    #[test]
    fn test_full_lines() {
        let buf = Buffer::from_text("one\ntwo\nthree\n");
        assert!(is_empty_or_full_lines(&buf, &Selection::caret(5)));
        assert!(is_empty_or_full_lines(&buf, &Selection::new(4, 8)));
        assert!(is_empty_or_full_lines(&buf, &Selection::new(14, 0)));
        assert!(!is_empty_or_full_lines(&buf, &Selection::new(4, 7)));
        assert!(!is_empty_or_full_lines(&buf, &Selection::new(5, 8)));
    }

    #[test]
    fn test_query_quantifiers() {
        let mut buf = Buffer::from_text("one\ntwo\n");
        buf.select([Selection::new(0, 4), Selection::new(4, 6)]);

        let query =
            |op, operand, all| query_context(&buf, EMPTY_OR_FULL_LINES_KEY, op, operand, all);
        assert_eq!(query(Operator::Equal, true, true), Some(false));
        assert_eq!(query(Operator::Equal, true, false), Some(true));
        assert_eq!(query(Operator::NotEqual, true, false), Some(true));
        assert_eq!(query(Operator::NotEqual, false, true), Some(false));
    }

    #[test]
    fn test_unknown_key() {
        let buf = Buffer::from_text("x");
        assert_eq!(query_context(&buf, "vi_mode", Operator::Equal, true, true), None);
    }

    #[test]
    fn test_operator_parse() {
        assert_eq!("==".parse::<Operator>(), Ok(Operator::Equal));
        assert_eq!("not_equal".parse::<Operator>(), Ok(Operator::NotEqual));
        assert!("regex_match".parse::<Operator>().is_err());
    }
}
