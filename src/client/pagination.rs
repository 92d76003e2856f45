//! Cursor carrier and page fetch state machine.
//!
//! `Paginator` describes which page to ask for. `Pager` fetches one page at
//! a time and hands control back to the caller, who decides whether to
//! continue with `Paginator::next_for`.

use super::error::ApiResult;
use super::executor::{ApiRequest, RequestExecutor};
use super::session::Session;
use crate::models::Listing;
use log::debug;

/// Request-side cursor. The library never mutates one; callers derive the
/// next value from the listing they just received.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paginator {
    pub after: Option<String>,
    pub limit: Option<u32>,
    /// Number of items already seen, which Reddit uses for numbering.
    pub count: Option<u32>,
}

impl Paginator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_after(mut self, after: impl Into<String>) -> Self {
        self.after = Some(after.into());
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    /// Paginator for the page following `listing`, or `None` on the last page.
    pub fn next_for<T>(&self, listing: &Listing<T>) -> Option<Paginator> {
        let after = listing.after.clone()?;
        let on_page = u32::try_from(listing.len()).unwrap_or(u32::MAX);
        let seen = self.count.unwrap_or(0).saturating_add(on_page);
        Some(Paginator {
            after: Some(after),
            limit: self.limit,
            count: Some(seen),
        })
    }

    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(after) = &self.after {
            pairs.push(("after".to_string(), after.clone()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(count) = self.count {
            pairs.push(("count".to_string(), count.to_string()));
        }
        pairs
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    Idle,
    InFlight,
    Completed,
    Failed,
}

impl PageState {
    pub fn is_terminal(self) -> bool {
        matches!(self, PageState::Completed | PageState::Failed)
    }
}

/// Fetches pages of one listing endpoint.
///
/// `fetch_page` borrows the pager mutably, so one pager never has two
/// requests in flight. Each call runs a full `Idle -> InFlight -> Completed
/// | Failed` cycle; errors, 403 included, are returned untouched.
pub struct Pager<T> {
    executor: RequestExecutor,
    session: Session,
    request: ApiRequest,
    decoder: fn(&[u8]) -> ApiResult<Listing<T>>,
    state: PageState,
    last_after: Option<String>,
    pages_fetched: usize,
}

impl<T> Pager<T> {
    pub fn new(
        executor: RequestExecutor,
        session: Session,
        request: ApiRequest,
        decoder: fn(&[u8]) -> ApiResult<Listing<T>>,
    ) -> Self {
        Self {
            executor,
            session,
            request,
            decoder,
            state: PageState::Idle,
            last_after: None,
            pages_fetched: 0,
        }
    }

    pub fn state(&self) -> PageState {
        self.state
    }

    /// `after` cursor of the most recently completed page.
    pub fn last_after(&self) -> Option<&str> {
        self.last_after.as_deref()
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    pub fn path(&self) -> &str {
        &self.request.path
    }

    pub async fn fetch_page(&mut self, paginator: Option<&Paginator>) -> ApiResult<Listing<T>> {
        self.state = PageState::InFlight;
        let request = self.request.clone().paginated(paginator);
        debug!(
            "Fetching page {} of {} (after: {:?})",
            self.pages_fetched + 1,
            request.path,
            paginator.and_then(|p| p.after.as_deref())
        );

        let result = self
            .executor
            .execute(&self.session, &request, self.decoder)
            .await;

        match &result {
            Ok(listing) => {
                self.state = PageState::Completed;
                self.last_after = listing.after.clone();
                self.pages_fetched += 1;
            }
            Err(_) => self.state = PageState::Failed,
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::decode::decode_listing;
    use crate::client::transport::{HttpRequest, HttpResponse, Transport, TransportError};
    use crate::models::UserListEntry;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// Serves a fixed chain of pages keyed by the `after` query parameter.
    struct ChainTransport {
        pages: HashMap<Option<String>, String>,
        requested: Mutex<Vec<Option<String>>>,
    }

    impl ChainTransport {
        fn three_pages() -> Arc<Self> {
            let page = |names: &[&str], after: Option<&str>| {
                let children: Vec<_> = names
                    .iter()
                    .map(|n| serde_json::json!({"name": n, "id": format!("t2_{}", n)}))
                    .collect();
                serde_json::json!({
                    "kind": "Listing",
                    "data": {"children": children, "after": after, "before": null}
                })
                .to_string()
            };

            let mut pages = HashMap::new();
            pages.insert(None, page(&["a", "b"], Some("c1")));
            pages.insert(Some("c1".to_string()), page(&["c", "d"], Some("c2")));
            pages.insert(Some("c2".to_string()), page(&["e"], None));
            Arc::new(Self {
                pages,
                requested: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Transport for ChainTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            let after = request
                .url
                .query_pairs()
                .find(|(k, _)| k == "after")
                .map(|(_, v)| v.into_owned());
            self.requested.lock().unwrap().push(after.clone());
            Ok(match self.pages.get(&after) {
                Some(body) => HttpResponse {
                    status: 200,
                    body: body.clone().into_bytes(),
                },
                None => HttpResponse {
                    status: 400,
                    body: Vec::new(),
                },
            })
        }
    }

    fn pager(transport: Arc<dyn Transport>) -> Pager<UserListEntry> {
        Pager::new(
            RequestExecutor::new(transport),
            Session::with_token("redsub-test", "tok").with_base_url("http://reddit.test"),
            ApiRequest::get("/r/pics/about/banned"),
            decode_listing::<UserListEntry>,
        )
    }

    #[test]
    fn next_for_advances_cursor_and_count() {
        let first = Paginator::new().with_limit(2);
        let listing = Listing::new(vec![1, 2], Some("c1".to_string()), None);
        let next = first.next_for(&listing).unwrap();
        assert_eq!(next, Paginator::new().with_after("c1").with_limit(2).with_count(2));
        assert_eq!(first, Paginator::new().with_limit(2));

        let last = Listing::new(vec![3], None, Some("c1".to_string()));
        assert!(next.next_for(&last).is_none());
    }

    #[test]
    fn next_for_saturates_count() {
        let near_end = Paginator::new().with_count(u32::MAX);
        let listing = Listing::new(vec![1], Some("c".to_string()), None);
        let next = near_end.next_for(&listing).unwrap();
        assert_eq!(next.count, Some(u32::MAX));
        assert_eq!(next.after.as_deref(), Some("c"));
    }

    #[test]
    fn empty_paginator_adds_no_query() {
        assert!(Paginator::new().query_pairs().is_empty());
    }

    #[tokio::test]
    async fn walks_a_three_page_chain_without_revisiting() {
        let transport = ChainTransport::three_pages();
        let mut pager = pager(transport.clone());
        assert_eq!(pager.state(), PageState::Idle);

        let mut cursor: Option<Paginator> = None;
        let mut names = Vec::new();
        loop {
            let listing = pager.fetch_page(cursor.as_ref()).await.unwrap();
            assert_eq!(pager.state(), PageState::Completed);
            names.extend(listing.children.iter().map(|u| u.name.clone()));
            cursor = match cursor.clone().unwrap_or_default().next_for(&listing) {
                Some(next) => Some(next),
                None => break,
            };
        }

        assert_eq!(names, vec!["a", "b", "c", "d", "e"]);
        assert_eq!(pager.pages_fetched(), 3);
        assert_eq!(pager.last_after(), None);

        let requested = transport.requested.lock().unwrap().clone();
        assert_eq!(
            requested,
            vec![None, Some("c1".to_string()), Some("c2".to_string())]
        );
    }

    #[tokio::test]
    async fn failed_page_leaves_pager_failed() {
        let transport = ChainTransport::three_pages();
        let mut pager = pager(transport);
        let bogus = Paginator::new().with_after("nope");

        let err = pager.fetch_page(Some(&bogus)).await.unwrap_err();
        assert_eq!(err.code, 400);
        assert_eq!(pager.state(), PageState::Failed);
        assert!(pager.state().is_terminal());
        assert_eq!(pager.pages_fetched(), 0);
    }
}
