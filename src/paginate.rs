//! Fixed-size paging over a filtered trip set.

use serde::Serialize;
use thiserror::Error;

use crate::trips::{FilteredTripSet, TripRecord};

/// Rows returned per page.
pub const PAGE_SIZE: usize = 5;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaginationError {
    /// Normal end of paging, not a failure of the session.
    #[error("no more rows: offset {offset} is past the last of {total} rows")]
    ExhaustedInput { offset: usize, total: usize },
}

/// A window of at most [`PAGE_SIZE`] consecutive trips.
#[derive(Debug, Clone, Serialize)]
pub struct RowSlice<'a> {
    pub offset: usize,
    pub total: usize,
    pub rows: &'a [TripRecord],
}

impl RowSlice<'_> {
    /// Offset of the following page; may itself be exhausted.
    pub fn next_offset(&self) -> usize {
        self.offset + self.rows.len()
    }

    pub fn has_more(&self) -> bool {
        self.next_offset() < self.total
    }
}

/// Rows `offset..offset + 5`, clipped to the end of the set.
pub fn page(set: &FilteredTripSet, offset: usize) -> Result<RowSlice<'_>, PaginationError> {
    let trips = set.trips();
    if offset >= trips.len() {
        return Err(PaginationError::ExhaustedInput {
            offset,
            total: trips.len(),
        });
    }
    let end = (offset + PAGE_SIZE).min(trips.len());
    Ok(RowSlice {
        offset,
        total: trips.len(),
        rows: &trips[offset..end],
    })
}
