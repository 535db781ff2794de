//! Sequential traversal over a [`TsData`] batch.
//!
//! The cursor lives in [`Iter`], not in the container, so one batch can be
//! walked by several readers at once and re-walked by calling
//! [`TsData::iter`] again.

use std::iter::FusedIterator;

use super::TsData;

/// Yields one single-series [`TsData`] per position, front to back.
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    data: &'a TsData,
    front: usize,
    back: usize,
}

impl<'a> Iter<'a> {
    pub(super) fn new(data: &'a TsData) -> Self {
        Self {
            data,
            front: 0,
            back: data.len(),
        }
    }

    /// Position of the next series `next()` would yield.
    pub fn position(&self) -> usize {
        self.front
    }
}

impl Iterator for Iter<'_> {
    type Item = TsData;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        let item = self.data.get(self.front);
        self.front += 1;
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        self.data.get(self.back)
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a TsData {
    type Item = TsData;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
