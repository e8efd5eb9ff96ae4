use alloc::vec::Vec;

use async_trait::async_trait;
use sticky_list::PageRequest;

/// Supplies pages of raw records, typically from a network or database query.
///
/// `request.offset` is the number of records already in the list. Returning an empty page
/// signals the end of the data set; returning an error keeps pagination open so the next
/// trigger retries.
#[async_trait]
pub trait FetchSource<T: Send>: Send {
    type Error: Send;

    async fn fetch_page(&mut self, request: PageRequest) -> Result<Vec<T>, Self::Error>;
}
