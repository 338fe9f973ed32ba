//! Word and subword boundary services.
//!
//! A [`BoundaryService`] answers where the next unit ends (forward) or where
//! the previous unit starts (backward). The two directions are not inverses:
//! `foo bar` forward from `|foo` lands on `foo|`, and backward from there
//! lands on `|foo`, but backward from `foo |bar` also lands on `|foo`.
//!
//! Line breaks are units of their own, so every motion stops at the end or
//! start of a line before crossing it.

use crate::model::unit::Unit;
use crate::model::view::TextView;

/// Host-provided word segmentation.
pub trait BoundaryService {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// End of the next `unit` at or after `pos`.
    fn boundary_end(&self, view: &dyn TextView, pos: usize, unit: Unit) -> usize;

    /// Start of the previous `unit` at or before `pos`.
    fn boundary_start(&self, view: &dyn TextView, pos: usize, unit: Unit) -> usize;
}

// ---------------------------------------------------------------------------
// Character classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CharClass {
    /// Letters, digits, underscore.
    Word,
    Punctuation,
    /// Whitespace within a line.
    Blank,
    Newline,
}

pub(crate) fn classify(ch: char) -> CharClass {
    if ch == '\n' || ch == '\r' {
        CharClass::Newline
    } else if ch.is_whitespace() {
        CharClass::Blank
    } else if ch.is_alphanumeric() || ch == '_' {
        CharClass::Word
    } else {
        CharClass::Punctuation
    }
}

/// Only blank vs non-blank matters.
pub(crate) fn classify_big(ch: char) -> CharClass {
    match classify(ch) {
        CharClass::Punctuation => CharClass::Word,
        class => class,
    }
}

// ---------------------------------------------------------------------------
// Scanning helpers
// ---------------------------------------------------------------------------

/// First offset at or after `idx` whose char fails `pred`.
pub(crate) fn run_end(
    view: &dyn TextView,
    mut idx: usize,
    pred: impl Fn(char) -> bool,
) -> usize {
    while view.char_at(idx).is_some_and(&pred) {
        idx += 1;
    }
    idx
}

/// Last offset at or before `idx` whose preceding char fails `pred`.
pub(crate) fn run_start(
    view: &dyn TextView,
    mut idx: usize,
    pred: impl Fn(char) -> bool,
) -> usize {
    while idx > 0 && view.char_at(idx - 1).is_some_and(&pred) {
        idx -= 1;
    }
    idx
}

pub(crate) fn char_before(view: &dyn TextView, idx: usize) -> Option<char> {
    idx.checked_sub(1).and_then(|i| view.char_at(i))
}

/// Skip blanks, then either step over one line break or hand the next
/// non-blank run to `segment`, which returns where that run ends.
pub(crate) fn scan_forward(
    view: &dyn TextView,
    pos: usize,
    class_of: fn(char) -> CharClass,
    segment: impl Fn(&dyn TextView, usize) -> usize,
) -> usize {
    let idx = run_end(view, pos, |c| class_of(c) == CharClass::Blank);
    match view.char_at(idx) {
        None => idx,
        Some(_) if idx > pos && at_line_break(view, idx) => idx,
        Some('\r') if view.char_at(idx + 1) == Some('\n') => idx + 2,
        Some(ch) if class_of(ch) == CharClass::Newline => idx + 1,
        Some(_) => segment(view, idx),
    }
}

/// Mirror of [`scan_forward`]: `segment` returns where the run ending at its
/// argument starts.
pub(crate) fn scan_backward(
    view: &dyn TextView,
    pos: usize,
    class_of: fn(char) -> CharClass,
    segment: impl Fn(&dyn TextView, usize) -> usize,
) -> usize {
    let idx = run_start(view, pos, |c| class_of(c) == CharClass::Blank);
    match char_before(view, idx) {
        None => idx,
        Some(_) if idx < pos && at_line_break(view, idx - 1) => idx,
        Some('\n') if idx >= 2 && view.char_at(idx - 2) == Some('\r') => idx - 2,
        Some(ch) if class_of(ch) == CharClass::Newline => idx - 1,
        Some(_) => segment(view, idx),
    }
}

fn at_line_break(view: &dyn TextView, idx: usize) -> bool {
    view.char_at(idx)
        .is_some_and(|c| classify(c) == CharClass::Newline)
}

/// End of the same-class run starting at `idx`.
pub(crate) fn class_run_end(
    view: &dyn TextView,
    idx: usize,
    class_of: fn(char) -> CharClass,
) -> usize {
    match view.char_at(idx) {
        Some(ch) => {
            let class = class_of(ch);
            run_end(view, idx, |c| class_of(c) == class)
        }
        None => idx,
    }
}

/// Start of the same-class run ending at `idx`.
pub(crate) fn class_run_start(
    view: &dyn TextView,
    idx: usize,
    class_of: fn(char) -> CharClass,
) -> usize {
    match char_before(view, idx) {
        Some(ch) => {
            let class = class_of(ch);
            run_start(view, idx, |c| class_of(c) == class)
        }
        None => idx,
    }
}

fn is_subword_char(ch: char) -> bool {
    ch.is_alphanumeric()
}

// ---------------------------------------------------------------------------
// Built-in substitute
// ---------------------------------------------------------------------------

/// Word motion used when the host has no boundary service installed.
///
/// `bigword` behaves like `word`. `subword` splits identifiers at underscores
/// and at lower-to-upper case changes (`fooBar_baz` → `foo`, `Bar`, `_`, `baz`).
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimitiveMotion;

impl PrimitiveMotion {
    fn subword_end(view: &dyn TextView, idx: usize) -> usize {
        match view.char_at(idx) {
            Some('_') => run_end(view, idx, |c| c == '_'),
            Some(first) if is_subword_char(first) => {
                let mut prev = first;
                let mut idx = idx + 1;
                while let Some(ch) = view.char_at(idx) {
                    if !is_subword_char(ch) || is_case_break(prev, ch) {
                        break;
                    }
                    prev = ch;
                    idx += 1;
                }
                idx
            }
            _ => class_run_end(view, idx, classify),
        }
    }

    fn subword_start(view: &dyn TextView, idx: usize) -> usize {
        match char_before(view, idx) {
            Some('_') => run_start(view, idx, |c| c == '_'),
            Some(last) if is_subword_char(last) => {
                let mut cur = last;
                let mut idx = idx - 1;
                while let Some(prev) = char_before(view, idx) {
                    if !is_subword_char(prev) || is_case_break(prev, cur) {
                        break;
                    }
                    cur = prev;
                    idx -= 1;
                }
                idx
            }
            _ => class_run_start(view, idx, classify),
        }
    }
}

/// `aB` and `1B` start a new subword at `B`.
fn is_case_break(prev: char, next: char) -> bool {
    next.is_uppercase() && (prev.is_lowercase() || prev.is_ascii_digit())
}

impl BoundaryService for PrimitiveMotion {
    fn name(&self) -> &'static str {
        "primitive"
    }

    fn boundary_end(&self, view: &dyn TextView, pos: usize, unit: Unit) -> usize {
        match unit {
            Unit::Subword => scan_forward(view, pos, classify, Self::subword_end),
            _ => scan_forward(view, pos, classify, |v, i| class_run_end(v, i, classify)),
        }
    }

    fn boundary_start(&self, view: &dyn TextView, pos: usize, unit: Unit) -> usize {
        match unit {
            Unit::Subword => scan_backward(view, pos, classify, Self::subword_start),
            _ => scan_backward(view, pos, classify, |v, i| class_run_start(v, i, classify)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::buffer::Buffer;

    fn ends(text: &str, pos: usize, unit: Unit) -> usize {
        PrimitiveMotion.boundary_end(&Buffer::from_text(text), pos, unit)
    }

    fn starts(text: &str, pos: usize, unit: Unit) -> usize {
        PrimitiveMotion.boundary_start(&Buffer::from_text(text), pos, unit)
    }

    #[test]
    fn test_word_forward_lands_on_end() {
        assert_eq!(ends("foo bar", 0, Unit::Word), 3);
        assert_eq!(ends("foo bar", 3, Unit::Word), 7);
        assert_eq!(ends("foo.bar", 3, Unit::Word), 4);
    }

    #[test]
    fn test_word_backward_lands_on_start() {
        assert_eq!(starts("foo bar", 7, Unit::Word), 4);
        assert_eq!(starts("foo bar", 4, Unit::Word), 0);
        assert_eq!(starts("foo bar", 0, Unit::Word), 0);
    }

    #[test]
    fn test_bigword_is_word() {
        assert_eq!(ends("foo.bar", 0, Unit::Bigword), 3);
    }

    #[test]
    fn test_stops_at_line_break() {
        assert_eq!(ends("foo  \nbar", 3, Unit::Word), 5);
        assert_eq!(ends("foo\nbar", 3, Unit::Word), 4);
        assert_eq!(ends("foo\r\nbar", 3, Unit::Word), 5);
        assert_eq!(starts("foo\n  bar", 6, Unit::Word), 4);
        assert_eq!(starts("foo\nbar", 4, Unit::Word), 3);
        assert_eq!(starts("foo\r\nbar", 5, Unit::Word), 3);
    }

    #[test]
    fn test_subwords() {
        assert_eq!(ends("fooBar_baz", 0, Unit::Subword), 3);
        assert_eq!(ends("fooBar_baz", 3, Unit::Subword), 6);
        assert_eq!(ends("fooBar_baz", 6, Unit::Subword), 7);
        assert_eq!(starts("fooBar_baz", 10, Unit::Subword), 7);
        assert_eq!(starts("fooBar_baz", 6, Unit::Subword), 3);
        assert_eq!(starts("HTTPServer", 10, Unit::Subword), 0);
    }
}
