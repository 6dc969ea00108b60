// ABOUTME: Paged fetch node family - the page -> URL list -> URL tree shape.
// ABOUTME: Caller supplies fetch callbacks and a sink; leaves collect into the sink.

use std::sync::Arc;

use async_trait::async_trait;

use crate::engine::FetchNode;
use crate::sink::ResultSink;

/// Domain callbacks driving a paged fetch walk.
///
/// `fetch_page` reports whether a page number exists; `fetch_urls` lists the
/// URLs on a page; `fetch_url` retrieves one URL's data. The callbacks run on
/// executor tasks, so they must not block the thread for long; spawn blocking
/// work onto a blocking pool first if needed.
pub struct FetchCallbacks<T> {
    pub fetch_page: Arc<dyn Fn(u32) -> bool + Send + Sync>,
    pub fetch_urls: Arc<dyn Fn(u32) -> Vec<String> + Send + Sync>,
    pub fetch_url: Arc<dyn Fn(&str) -> T + Send + Sync>,
}

impl<T> Clone for FetchCallbacks<T> {
    fn clone(&self) -> Self {
        Self {
            fetch_page: Arc::clone(&self.fetch_page),
            fetch_urls: Arc::clone(&self.fetch_urls),
            fetch_url: Arc::clone(&self.fetch_url),
        }
    }
}

/// Root node: walks page numbers 1, 2, ... until `fetch_page` says stop.
pub struct PageWalk<T> {
    curr_page: u32,
    callbacks: FetchCallbacks<T>,
    sink: ResultSink<T>,
}

impl<T: Send + 'static> PageWalk<T> {
    pub fn new(callbacks: FetchCallbacks<T>, sink: ResultSink<T>) -> Self {
        Self {
            curr_page: 0,
            callbacks,
            sink,
        }
    }
}

#[async_trait]
impl<T: Send + 'static> FetchNode for PageWalk<T> {
    async fn prepare(&mut self) {
        self.curr_page = 0;
    }

    async fn next(&mut self) -> Option<Box<dyn FetchNode>> {
        self.curr_page += 1;
        if (self.callbacks.fetch_page)(self.curr_page) {
            Some(Box::new(UrlList {
                page: self.curr_page,
                urls: Vec::new(),
                next_url: 0,
                callbacks: self.callbacks.clone(),
                sink: self.sink.clone(),
            }))
        } else {
            None
        }
    }

    async fn collect_results(&mut self) {}
}

/// Mid-level node: one page's URL list, discovered during `prepare`.
struct UrlList<T> {
    page: u32,
    urls: Vec<String>,
    next_url: usize,
    callbacks: FetchCallbacks<T>,
    sink: ResultSink<T>,
}

#[async_trait]
impl<T: Send + 'static> FetchNode for UrlList<T> {
    async fn prepare(&mut self) {
        self.next_url = 0;
        self.urls = (self.callbacks.fetch_urls)(self.page);
    }

    async fn next(&mut self) -> Option<Box<dyn FetchNode>> {
        let url = self.urls.get(self.next_url)?.clone();
        self.next_url += 1;
        Some(Box::new(UrlLeaf {
            url,
            data: None,
            callbacks: self.callbacks.clone(),
            sink: self.sink.clone(),
        }))
    }

    async fn collect_results(&mut self) {}
}

/// Leaf node: fetches one URL and collects its data into the sink.
struct UrlLeaf<T> {
    url: String,
    data: Option<T>,
    callbacks: FetchCallbacks<T>,
    sink: ResultSink<T>,
}

#[async_trait]
impl<T: Send + 'static> FetchNode for UrlLeaf<T> {
    async fn prepare(&mut self) {
        self.data = Some((self.callbacks.fetch_url)(&self.url));
    }

    async fn next(&mut self) -> Option<Box<dyn FetchNode>> {
        None
    }

    async fn collect_results(&mut self) {
        if let Some(data) = self.data.take() {
            self.sink.push(data);
        }
    }
}
