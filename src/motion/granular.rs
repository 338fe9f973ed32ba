use super::boundary::{
    BoundaryService, char_before, class_run_end, class_run_start, classify, classify_big,
    run_end, run_start, scan_backward, scan_forward,
};
use crate::model::unit::Unit;
use crate::model::view::TextView;

/// Finer segmentation than [`PrimitiveMotion`](super::boundary::PrimitiveMotion).
///
/// Subword boundaries, highest priority first:
/// - underscore runs are their own subword
/// - punctuation runs
/// - ALL-CAPS runs stop one char before a trailing lowercase suffix
///   (`HTTPServer` → `HTTP`, `Server`)
/// - Title-case words: one uppercase followed by lowercase
/// - lowercase runs and digit runs are separate (`utf8` → `utf`, `8`)
///
/// `bigword` only breaks on whitespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct GranularSegmenter;

impl GranularSegmenter {
    fn subword_end(view: &dyn TextView, idx: usize) -> usize {
        let Some(first) = view.char_at(idx) else {
            return idx;
        };

        if first == '_' {
            return run_end(view, idx, |c| c == '_');
        }
        if first.is_ascii_digit() {
            return run_end(view, idx, |c| c.is_ascii_digit());
        }
        if !first.is_alphanumeric() {
            return class_run_end(view, idx, classify);
        }
        if is_uncased(first) {
            return run_end(view, idx, is_uncased);
        }
        if !first.is_uppercase() {
            return run_end(view, idx, char::is_lowercase);
        }

        let upper_end = run_end(view, idx, char::is_uppercase);
        if upper_end == idx + 1 {
            // Title-case
            return run_end(view, upper_end, char::is_lowercase);
        }
        match view.char_at(upper_end) {
            Some(c) if c.is_lowercase() => upper_end - 1,
            _ => upper_end,
        }
    }

    fn subword_start(view: &dyn TextView, idx: usize) -> usize {
        let Some(last) = char_before(view, idx) else {
            return idx;
        };

        if last == '_' {
            return run_start(view, idx, |c| c == '_');
        }
        if last.is_ascii_digit() {
            return run_start(view, idx, |c| c.is_ascii_digit());
        }
        if !last.is_alphanumeric() {
            return class_run_start(view, idx, classify);
        }
        if is_uncased(last) {
            return run_start(view, idx, is_uncased);
        }
        if last.is_uppercase() {
            return run_start(view, idx, char::is_uppercase);
        }

        let lower_start = run_start(view, idx, char::is_lowercase);
        match char_before(view, lower_start) {
            Some(c) if c.is_uppercase() => lower_start - 1,
            _ => lower_start,
        }
    }
}

/// Letters without case (CJK ideographs, kana) and non-ASCII digits.
fn is_uncased(c: char) -> bool {
    c.is_alphanumeric() && !c.is_uppercase() && !c.is_lowercase() && !c.is_ascii_digit()
}

impl BoundaryService for GranularSegmenter {
    fn name(&self) -> &'static str {
        "granular"
    }

    fn boundary_end(&self, view: &dyn TextView, pos: usize, unit: Unit) -> usize {
        match unit {
            Unit::Subword => scan_forward(view, pos, classify, Self::subword_end),
            Unit::Bigword => {
                scan_forward(view, pos, classify_big, |v, i| class_run_end(v, i, classify_big))
            }
            _ => scan_forward(view, pos, classify, |v, i| class_run_end(v, i, classify)),
        }
    }

    fn boundary_start(&self, view: &dyn TextView, pos: usize, unit: Unit) -> usize {
        match unit {
            Unit::Subword => scan_backward(view, pos, classify, Self::subword_start),
            Unit::Bigword => scan_backward(view, pos, classify_big, |v, i| {
                class_run_start(v, i, classify_big)
            }),
            _ => scan_backward(view, pos, classify, |v, i| class_run_start(v, i, classify)),
        }
    }
}
