//! Page requests for list operations.

use crate::error::{Classify, ErrorKind};
use thiserror::Error;

/// Zero-based page of results with a bounded size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    page: u32,
    size: u32,
}

impl PageRequest {
    /// Page size used when the caller does not ask for one.
    pub const DEFAULT_SIZE: u32 = 20;

    /// Largest accepted page size.
    pub const MAX_SIZE: u32 = 100;

    /// Creates a validated page request.
    ///
    /// # Errors
    ///
    /// Returns [`PageRequestError::InvalidSize`] when `size` is zero or
    /// exceeds [`Self::MAX_SIZE`].
    pub const fn new(page: u32, size: u32) -> Result<Self, PageRequestError> {
        if size == 0 || size > Self::MAX_SIZE {
            return Err(PageRequestError::InvalidSize(size));
        }
        Ok(Self { page, size })
    }

    /// Returns the first page with the given size.
    ///
    /// # Errors
    ///
    /// Returns [`PageRequestError::InvalidSize`] for out-of-range sizes.
    pub const fn first(size: u32) -> Result<Self, PageRequestError> {
        Self::new(0, size)
    }

    /// Returns the zero-based page index.
    #[must_use]
    pub const fn page(self) -> u32 {
        self.page
    }

    /// Returns the page size.
    #[must_use]
    pub const fn size(self) -> u32 {
        self.size
    }

    /// Returns the number of records preceding this page.
    #[must_use]
    pub const fn offset(self) -> u64 {
        self.page as u64 * self.size as u64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: Self::DEFAULT_SIZE,
        }
    }
}

/// Errors returned while constructing page requests.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum PageRequestError {
    /// The page size is zero or too large.
    #[error("page size {0} is out of range (1..={max})", max = PageRequest::MAX_SIZE)]
    InvalidSize(u32),
}

impl Classify for PageRequestError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}
