//! Alternating-path construction and the flip that grows the matching.
//!
//! Starting from a freshly prepared zero in a row with no selection, the
//! builder walks the alternating chain: the selected zero in the current
//! column (if any), then the prepared zero in that selected zero's row, and
//! so on. The chain ends at a column holding no selected zero, which leaves
//! the prepared sequence exactly one cell longer than the selected one -
//! flipping the chain therefore grows the matching by one.

use serde::Serialize;

use crate::state::Matching;

/// The alternating chain of prepared and selected zeros built during one
/// augmentation. Exists only between its construction and the flip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AlternatingPath {
    prepared: Vec<(usize, usize)>,
    selected: Vec<(usize, usize)>,
}

impl AlternatingPath {
    /// Walk the chain from the prepared zero at (row, col).
    pub(crate) fn build(row: usize, col: usize, matching: &Matching) -> Self {
        let mut path = AlternatingPath::default();
        path.prepared.push((row, col));

        let mut col = col;
        while let Some(i) = matching.selected_row(col) {
            path.selected.push((i, col));
            match matching.prepared_col(i) {
                Some(j) => {
                    path.prepared.push((i, j));
                    col = j;
                }
                None => break,
            }
        }
        path
    }

    /// Apply the flip: every selected cell of the chain leaves the
    /// matching, every prepared cell enters it.
    pub(crate) fn flip(&self, matching: &mut Matching) {
        for &(i, j) in &self.selected {
            matching.unselect(i, j);
        }
        for &(i, j) in &self.prepared {
            matching.select(i, j);
        }
    }

    /// Prepared cells of the chain, in walk order.
    pub fn prepared(&self) -> &[(usize, usize)] {
        &self.prepared
    }

    /// Selected cells of the chain, in walk order.
    pub fn selected(&self) -> &[(usize, usize)] {
        &self.selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trivial_chain_is_the_starting_cell() {
        let matching = Matching::new(3);
        let path = AlternatingPath::build(1, 2, &matching);
        assert_eq!(path.prepared(), &[(1, 2)]);
        assert!(path.selected().is_empty());
    }

    #[test]
    fn chain_alternates_until_an_unselected_column() {
        // Rows 1 and 2 were covered with both a selected and a prepared
        // zero; col 2 holds no selection, so the chain ends there with the
        // prepared side one cell ahead.
        let mut matching = Matching::new(3);
        matching.select(1, 0);
        matching.select(2, 1);
        matching.prepare(1, 1);
        matching.prepare(2, 2);

        let path = AlternatingPath::build(0, 0, &matching);
        assert_eq!(path.prepared(), &[(0, 0), (1, 1), (2, 2)]);
        assert_eq!(path.selected(), &[(1, 0), (2, 1)]);
        assert_eq!(path.prepared().len(), path.selected().len() + 1);
    }

    #[test]
    fn flip_grows_the_matching_by_one() {
        let mut matching = Matching::new(3);
        matching.select(1, 0);
        matching.prepare(1, 1);

        let path = AlternatingPath::build(0, 0, &matching);
        assert_eq!(path.prepared().len(), path.selected().len() + 1);

        path.flip(&mut matching);
        assert_eq!(matching.selected_col(0), Some(0));
        assert_eq!(matching.selected_col(1), Some(1));
        assert_eq!(matching.selected_row(0), Some(0));
        assert_eq!(matching.selected_row(1), Some(1));
    }
}
