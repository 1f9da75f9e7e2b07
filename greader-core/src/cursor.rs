//! Continuation windows for paginated listings.
//!
//! A continuation is the decimal id of the last entry of the previous page.
//! Paging works without server-side state and without a count query:
//!
//! 1. With a continuation, the store is asked for `count + 1` entries
//!    starting *at* the continuation entry (inclusive, in the requested
//!    order). Without one, for `count` entries from the start.
//! 2. With a continuation, the first fetched entry is the continuation
//!    entry itself, already sent with the previous page, and is dropped.
//! 3. A continuation is attached to the response iff the store returned
//!    at least `count` entries, counted before the drop in step 2. A page
//!    that only re-fetched the continuation entry ends the stream.
//!
//! Entry ids are issued monotonically, so entries inserted while a client
//! pages backwards sort above the window and never show up inside it.

use greader_types::EntryId;

/// Parse the `c` parameter. Anything but a trimmed run of decimal digits
/// no larger than [`EntryId::MAX`] counts as "no continuation".
pub fn parse_continuation(raw: &str) -> Option<EntryId> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse::<u64>()
        .ok()
        .map(EntryId::new)
        .filter(|id| *id <= EntryId::MAX)
}

/// The fetch window for one page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    count: u32,
    continuation: Option<EntryId>,
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Items to return to the client.
    pub items: Vec<T>,
    /// Continuation to return, if more items may follow.
    pub continuation: Option<EntryId>,
}

impl PageWindow {
    /// Create a window of `count` items (at least one) after `continuation`.
    pub fn new(count: u32, continuation: Option<EntryId>) -> Self {
        Self {
            count: count.max(1),
            continuation,
        }
    }

    /// Requested page size.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Number of entries to request from the store.
    pub fn fetch_limit(&self) -> u32 {
        if self.continuation.is_some() {
            self.count.saturating_add(1)
        } else {
            self.count
        }
    }

    /// Inclusive starting entry for the store query.
    pub fn start_at(&self) -> Option<EntryId> {
        self.continuation
    }

    /// Turn the fetched rows into a page.
    ///
    /// `rows` must be the store's answer to [`fetch_limit`](Self::fetch_limit)
    /// entries from [`start_at`](Self::start_at).
    pub fn finish<T>(&self, mut rows: Vec<T>, id_of: impl Fn(&T) -> EntryId) -> Page<T> {
        let fetched = rows.len();
        let last = rows.last().map(&id_of);

        if self.continuation.is_some() && !rows.is_empty() {
            rows.remove(0);
        }

        let continuation = if fetched >= self.count as usize && last != self.continuation {
            last
        } else {
            None
        };

        Page {
            items: rows,
            continuation,
        }
    }
}
