//! Limit/offset paging for list reads.

use crate::domain::validation::ValidationErrors;

/// Page size used when the caller gives none.
pub const DEFAULT_LIMIT: i64 = 10;

/// Largest page size served; bigger requests are clamped.
pub const MAX_LIMIT: i64 = 100;

/// A validated window into a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    limit: i64,
    offset: i64,
}

impl Page {
    /// Build a page from optional query values.
    ///
    /// Limits above [`MAX_LIMIT`] are clamped rather than rejected.
    ///
    /// # Errors
    ///
    /// Returns validation errors for a limit below one or a negative offset.
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Result<Self, ValidationErrors> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT);
        let offset = offset.unwrap_or(0);

        let mut errors = ValidationErrors::new();

        if limit < 1 {
            errors.add("limit", "must be at least 1");
        }

        if offset < 0 {
            errors.add("offset", "must not be negative");
        }

        errors.finish(Self {
            limit: limit.min(MAX_LIMIT),
            offset,
        })
    }

    /// Rows to return.
    #[must_use]
    pub const fn limit(&self) -> i64 {
        self.limit
    }

    /// Rows to skip.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        self.offset
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}
