//! Page-numbered collection
//!
//! Providers that page their results are read until a page comes back short
//! or the provider reports there is nothing more.

use std::future::Future;

use crate::error::BusApiError;

/// One fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page<T> {
    /// Records on this page, possibly empty
    Records(Vec<T>),
    /// The provider reported no (more) data, or the response was not
    /// recognisable as a page
    NoData,
}

/// Collects every page of a page-numbered listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_size: u32,
}

impl Paginator {
    /// Create a paginator; a zero page size is treated as one
    #[must_use]
    pub const fn new(page_size: u32) -> Self {
        Self {
            page_size: if page_size == 0 { 1 } else { page_size },
        }
    }

    /// Records requested per page
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Fetch pages `1, 2, ...` and concatenate their records in order
    ///
    /// Stops after the first page holding fewer than `page_size` records,
    /// or at the first [`Page::NoData`].
    ///
    /// # Errors
    ///
    /// The first fetch error is returned and the records collected so far
    /// are discarded.
    pub async fn collect<T, F, Fut>(&self, mut fetch_page: F) -> Result<Vec<T>, BusApiError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<Page<T>, BusApiError>>,
    {
        let mut records = Vec::new();
        let mut page_no = 1;

        loop {
            match fetch_page(page_no).await? {
                Page::NoData => break,
                Page::Records(batch) => {
                    let last = batch.len() < self.page_size as usize;
                    records.extend(batch);
                    if last {
                        break;
                    }
                    page_no += 1;
                },
            }
        }

        Ok(records)
    }
}
