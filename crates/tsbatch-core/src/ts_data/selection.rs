//! Position selections accepted by [`super::TsData::select`].
//!
//! A selection resolves to an ordered list of series positions, with the
//! same meaning as array fancy indexing:
//! - a single `usize` selects one series,
//! - ranges select a contiguous run,
//! - position lists may reorder and repeat series,
//! - boolean masks keep the series whose flag is `true`.

use std::ops::{Range, RangeFrom, RangeFull, RangeInclusive, RangeTo, RangeToInclusive};

use snafu::prelude::*;

use super::error::{
    IndexOutOfBoundsSnafu, InvalidRangeSnafu, MaskLengthMismatchSnafu, TsDataResult,
};

/// Anything that can be resolved into series positions for a batch of `len`.
pub trait Selection {
    /// Resolve to concrete positions, validating them against `len`.
    fn positions(&self, len: usize) -> TsDataResult<Vec<usize>>;
}

fn check_bounds(index: usize, len: usize) -> TsDataResult<usize> {
    ensure!(index < len, IndexOutOfBoundsSnafu { index, len });
    Ok(index)
}

fn contiguous(start: usize, end: usize, len: usize) -> TsDataResult<Vec<usize>> {
    ensure!(start <= end, InvalidRangeSnafu { start, end });
    if end > len {
        return IndexOutOfBoundsSnafu {
            index: end - 1,
            len,
        }
        .fail();
    }
    Ok((start..end).collect())
}

impl Selection for usize {
    fn positions(&self, len: usize) -> TsDataResult<Vec<usize>> {
        Ok(vec![check_bounds(*self, len)?])
    }
}

impl Selection for Range<usize> {
    fn positions(&self, len: usize) -> TsDataResult<Vec<usize>> {
        contiguous(self.start, self.end, len)
    }
}

impl Selection for RangeInclusive<usize> {
    fn positions(&self, len: usize) -> TsDataResult<Vec<usize>> {
        contiguous(*self.start(), self.end().saturating_add(1), len)
    }
}

impl Selection for RangeFrom<usize> {
    fn positions(&self, len: usize) -> TsDataResult<Vec<usize>> {
        // `len..` is a valid empty selection.
        ensure!(
            self.start <= len,
            IndexOutOfBoundsSnafu {
                index: self.start,
                len
            }
        );
        Ok((self.start..len).collect())
    }
}

impl Selection for RangeTo<usize> {
    fn positions(&self, len: usize) -> TsDataResult<Vec<usize>> {
        contiguous(0, self.end, len)
    }
}

impl Selection for RangeToInclusive<usize> {
    fn positions(&self, len: usize) -> TsDataResult<Vec<usize>> {
        contiguous(0, self.end.saturating_add(1), len)
    }
}

impl Selection for RangeFull {
    fn positions(&self, len: usize) -> TsDataResult<Vec<usize>> {
        Ok((0..len).collect())
    }
}

impl Selection for [usize] {
    fn positions(&self, len: usize) -> TsDataResult<Vec<usize>> {
        self.iter().map(|&i| check_bounds(i, len)).collect()
    }
}

impl Selection for Vec<usize> {
    fn positions(&self, len: usize) -> TsDataResult<Vec<usize>> {
        self.as_slice().positions(len)
    }
}

impl<const N: usize> Selection for [usize; N] {
    fn positions(&self, len: usize) -> TsDataResult<Vec<usize>> {
        self.as_slice().positions(len)
    }
}

impl Selection for [bool] {
    fn positions(&self, len: usize) -> TsDataResult<Vec<usize>> {
        ensure!(
            self.len() == len,
            MaskLengthMismatchSnafu {
                mask_len: self.len(),
                len
            }
        );
        Ok(self
            .iter()
            .enumerate()
            .filter_map(|(i, &keep)| keep.then_some(i))
            .collect())
    }
}

impl Selection for Vec<bool> {
    fn positions(&self, len: usize) -> TsDataResult<Vec<usize>> {
        self.as_slice().positions(len)
    }
}

impl<T: Selection + ?Sized> Selection for &T {
    fn positions(&self, len: usize) -> TsDataResult<Vec<usize>> {
        (**self).positions(len)
    }
}
