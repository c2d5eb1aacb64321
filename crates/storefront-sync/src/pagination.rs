//! Page bookkeeping shared by the list syncs.
//!
//! The remote sends no cursor or total. A page that comes back full is taken
//! to mean there may be more, so a listing that ends exactly on a page
//! boundary costs one extra, empty fetch.

use std::future::Future;

use tracing::debug;

use crate::StoreResult;

/// Pages are numbered from one.
pub const FIRST_PAGE: u32 = 1;

/// Result of syncing one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageOutcome {
    pub returned: usize,
    pub has_next: bool,
}

impl PageOutcome {
    pub fn new(returned: usize, page_size: usize) -> Self {
        Self {
            returned,
            has_next: has_next_page(returned, page_size),
        }
    }
}

pub fn has_next_page(returned: usize, page_size: usize) -> bool {
    page_size > 0 && returned == page_size
}

/// Syncs pages 1, 2, ... until one comes back short or empty.
///
/// Stops at the first error. Returns how many entities were synced.
pub async fn synchronize_pages<F, Fut>(label: &str, mut sync_page: F) -> StoreResult<usize>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = StoreResult<PageOutcome>>,
{
    let mut page = FIRST_PAGE;
    let mut total = 0;
    loop {
        let outcome = sync_page(page).await?;
        total += outcome.returned;
        debug!(label, page, returned = outcome.returned, "pagination: page synced");
        if !outcome.has_next {
            return Ok(total);
        }
        page += 1;
    }
}
