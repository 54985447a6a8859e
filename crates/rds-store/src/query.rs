use crate::error::{DataStoreError, DataStoreResult};

/// Offset/limit window applied to the match sequence of a query.
///
/// `offset` leading matches are skipped, then at most `limit` are returned.
/// No limit means "all remaining matches".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pagination {
    limit: Option<usize>,
    offset: usize,
}

impl Pagination {
    /// Every match, no offset.
    pub fn all() -> Self {
        Self::default()
    }

    /// Validate signed bounds as received from a caller.
    ///
    /// Negative `limit` or `offset` is a usage error.
    pub fn new(limit: Option<i64>, offset: i64) -> DataStoreResult<Self> {
        let limit = match limit {
            Some(l) if l < 0 => {
                return Err(DataStoreError::InvalidPagination(format!(
                    "limit must not be negative, got {l}"
                )))
            }
            Some(l) => Some(usize::try_from(l).unwrap_or(usize::MAX)),
            None => None,
        };
        if offset < 0 {
            return Err(DataStoreError::InvalidPagination(format!(
                "offset must not be negative, got {offset}"
            )));
        }
        Ok(Self {
            limit,
            offset: usize::try_from(offset).unwrap_or(usize::MAX),
        })
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of matches after which enumeration can stop, if bounded.
    pub(crate) fn stop_after(&self) -> Option<usize> {
        self.limit.map(|l| self.offset.saturating_add(l))
    }
}
