use smallvec::SmallVec;

/// Half-open range of char offsets, `begin <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub begin: usize,
    pub end: usize,
}

impl Span {
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            begin: a.min(b),
            end: a.max(b),
        }
    }

    pub fn empty(pos: usize) -> Self {
        Self {
            begin: pos,
            end: pos,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    /// Shift both ends left, saturating at 0.
    pub fn shifted_left(&self, by: usize) -> Self {
        Self {
            begin: self.begin.saturating_sub(by),
            end: self.end.saturating_sub(by),
        }
    }
}

/// A caret or selection. `anchor` stays put while `head` follows the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Selection {
    pub anchor: usize,
    pub head: usize,
    /// Horizontal layout position kept across vertical moves ("sticky" column).
    pub xpos: Option<f64>,
}

impl Selection {
    pub fn caret(pos: usize) -> Self {
        Self {
            anchor: pos,
            head: pos,
            xpos: None,
        }
    }

    pub fn new(anchor: usize, head: usize) -> Self {
        Self {
            anchor,
            head,
            xpos: None,
        }
    }

    pub fn with_xpos(mut self, xpos: f64) -> Self {
        self.xpos = Some(xpos);
        self
    }

    pub fn span(&self) -> Span {
        Span::new(self.anchor, self.head)
    }

    pub fn begin(&self) -> usize {
        self.anchor.min(self.head)
    }

    pub fn end(&self) -> usize {
        self.anchor.max(self.head)
    }

    pub fn is_caret(&self) -> bool {
        self.anchor == self.head
    }

    fn map_points(&mut self, f: impl Fn(usize, bool) -> usize) {
        let caret = self.is_caret();
        let (start, end) = if self.anchor <= self.head {
            (&mut self.anchor, &mut self.head)
        } else {
            (&mut self.head, &mut self.anchor)
        };
        *start = f(*start, true);
        *end = f(*end, caret);
    }
}

/// Ordered set of selections held by a buffer.
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    regions: SmallVec<[Selection; 4]>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Selection> {
        self.regions.iter()
    }

    pub fn as_slice(&self) -> &[Selection] {
        &self.regions
    }

    pub fn clear(&mut self) {
        self.regions.clear();
    }

    /// Insert keeping the set sorted by start; ties keep insertion order.
    /// A selection with the same anchor and head as one already held is dropped.
    pub fn add(&mut self, selection: Selection) {
        if self
            .regions
            .iter()
            .any(|r| r.anchor == selection.anchor && r.head == selection.head)
        {
            return;
        }
        let idx = self
            .regions
            .iter()
            .position(|r| r.begin() > selection.begin())
            .unwrap_or(self.regions.len());
        self.regions.insert(idx, selection);
    }

    pub fn add_all(&mut self, selections: impl IntoIterator<Item = Selection>) {
        for selection in selections {
            self.add(selection);
        }
    }

    /// Track an insertion of `len` chars at `pos`.
    ///
    /// A point exactly at `pos` moves with the text when it is a caret or the
    /// start of a selection; the end of a selection stays where it is.
    pub fn adjust_for_insert(&mut self, pos: usize, len: usize) {
        for region in self.regions.iter_mut() {
            region.map_points(|p, is_start| {
                if p > pos || (p == pos && is_start) {
                    p + len
                } else {
                    p
                }
            });
        }
    }

    /// Track an erasure of `span`; points inside it collapse to its start.
    pub fn adjust_for_erase(&mut self, span: Span) {
        for region in self.regions.iter_mut() {
            region.map_points(|p, _| {
                if p >= span.end {
                    p - span.len()
                } else if p > span.begin {
                    span.begin
                } else {
                    p
                }
            });
        }
    }
}

impl<'a> IntoIterator for &'a SelectionSet {
    type Item = &'a Selection;
    type IntoIter = std::slice::Iter<'a, Selection>;

    fn into_iter(self) -> Self::IntoIter {
        self.regions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_normalizes() {
        let span = Span::new(7, 3);
        assert_eq!(span, Span { begin: 3, end: 7 });
        assert_eq!(span.len(), 4);
        assert!(Span::empty(2).is_empty());
    }

    #[test]
    fn test_add_keeps_order() {
        let mut set = SelectionSet::new();
        set.add(Selection::caret(9));
        set.add(Selection::new(4, 2));
        set.add(Selection::caret(5));

        let starts: Vec<usize> = set.iter().map(Selection::begin).collect();
        assert_eq!(starts, vec![2, 5, 9]);
    }

    #[test]
    fn test_add_drops_exact_duplicates() {
        let mut set = SelectionSet::new();
        set.add(Selection::caret(3));
        set.add(Selection::caret(3));
        set.add(Selection::new(1, 3));
        set.add(Selection::new(3, 1));

        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_insert_shifts_following_points() {
        let mut set = SelectionSet::new();
        set.add(Selection::new(0, 3));
        set.add(Selection::caret(3));
        set.add(Selection::new(5, 8));
        set.adjust_for_insert(3, 2);

        assert_eq!(set.as_slice()[0].span(), Span::new(0, 3));
        assert_eq!(set.as_slice()[1].span(), Span::empty(5));
        assert_eq!(set.as_slice()[2].span(), Span::new(7, 10));
    }

    #[test]
    fn test_erase_collapses_inner_points() {
        let mut set = SelectionSet::new();
        set.add(Selection::new(1, 4));
        set.add(Selection::caret(9));
        set.adjust_for_erase(Span::new(2, 6));

        assert_eq!(set.as_slice()[0].span(), Span::new(1, 2));
        assert_eq!(set.as_slice()[1].span(), Span::empty(5));
    }
}
