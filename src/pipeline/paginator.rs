use crate::{client::Reconnect, errors::ProviderError, warning};

/// Position of a page at the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cursor {
    /// 1-based page number (Genius, Last.fm).
    Number(u32),
    /// Fully qualified URL of the next page (Spotify).
    Url(String),
}

/// One page of results plus where the next one lives.
///
/// `received` counts the entries the provider sent, before the source
/// dropped any it could not use. Only a page the provider sent empty ends
/// the sequence.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub received: usize,
    pub next: Option<Cursor>,
}

impl<T> Page<T> {
    /// Page-numbered providers never say "last page"; an empty page does.
    pub fn numbered(items: Vec<T>, current: u32) -> Self {
        Self {
            received: items.len(),
            items,
            next: Some(Cursor::Number(current + 1)),
        }
    }

    /// A page that links to its successor, `None` on the last one.
    pub fn linked(items: Vec<T>, next: Option<Cursor>) -> Self {
        Self {
            received: items.len(),
            items,
            next,
        }
    }
}

/// A paged endpoint of a provider.
#[allow(async_fn_in_trait)]
pub trait PageSource: Reconnect {
    type Item;

    fn first_cursor(&self) -> Cursor;

    async fn fetch_page(&mut self, cursor: &Cursor) -> Result<Page<Self::Item>, ProviderError>;
}

/// Drives a [`PageSource`] until the provider runs out of results.
///
/// Pages are pulled lazily with [`Paginator::next_page`]. The sequence ends
/// on the first page the provider sent empty, when the provider stops handing out a next
/// cursor, or after `max_pages` pages. An authorization failure reconnects
/// the source and retries the same cursor exactly once.
pub struct Paginator<S: PageSource> {
    source: S,
    cursor: Option<Cursor>,
    max_pages: Option<usize>,
    fetched: usize,
}

impl<S: PageSource> Paginator<S> {
    pub fn new(source: S) -> Self {
        let cursor = Some(source.first_cursor());
        Self {
            source,
            cursor,
            max_pages: None,
            fetched: 0,
        }
    }

    /// Caps the number of pages requested, `None` for no cap.
    pub fn with_max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn pages_fetched(&self) -> usize {
        self.fetched
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// Next non-empty page, or `None` once the sequence has ended.
    ///
    /// Pages the source filtered down to nothing are skipped as long as the
    /// provider links to another one.
    pub async fn next_page(&mut self) -> Result<Option<Vec<S::Item>>, ProviderError> {
        loop {
            if self.max_pages.is_some_and(|max| self.fetched >= max) {
                return Ok(None);
            }
            let Some(cursor) = self.cursor.clone() else {
                return Ok(None);
            };

            let page = match self.source.fetch_page(&cursor).await {
                Err(e) if e.is_unauthorized() => {
                    warning!("{}. Reconnecting and retrying the page once.", e);
                    self.source.reconnect().await?;
                    self.source.fetch_page(&cursor).await?
                }
                other => other?,
            };
            self.fetched += 1;

            if page.received == 0 {
                self.cursor = None;
                return Ok(None);
            }

            self.cursor = page.next;
            if !page.items.is_empty() {
                return Ok(Some(page.items));
            }
        }
    }

    /// Drains the remaining pages in order.
    pub async fn collect_all(mut self) -> Result<Vec<S::Item>, ProviderError> {
        let mut all = Vec::new();
        while let Some(items) = self.next_page().await? {
            all.extend(items);
        }
        Ok(all)
    }
}
