use crate::client::{ApiError, Pager, Paginator};
use log::{debug, warn};
use std::collections::HashSet;

/// Bounds for walking a listing page by page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectPolicy {
    pub max_pages: usize,
    /// Stop once at least this many items are collected. Extra items from
    /// the last page are kept.
    pub max_items: Option<usize>,
    pub page_limit: Option<u32>,
}

impl Default for CollectPolicy {
    fn default() -> Self {
        Self {
            max_pages: 10,
            max_items: None,
            page_limit: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The last page had no `after` cursor.
    Exhausted,
    MaxPages,
    MaxItems,
    /// The server handed back a cursor that was already followed.
    RepeatedCursor,
}

#[derive(Debug)]
pub struct Collected<T> {
    pub items: Vec<T>,
    pub pages: usize,
    pub stopped: StopReason,
}

/// Drive `pager` until the listing ends or `policy` says stop.
///
/// `start` resumes a walk from a known cursor; `None` begins at the first
/// page. `policy.page_limit` fills in a limit the start cursor lacks.
/// The first failing page aborts the walk with its error.
pub async fn collect_pages<T>(
    pager: &mut Pager<T>,
    start: Option<Paginator>,
    policy: CollectPolicy,
) -> Result<Collected<T>, ApiError> {
    let mut cursor = match (start, policy.page_limit) {
        (Some(start), Some(limit)) if start.limit.is_none() => Some(start.with_limit(limit)),
        (Some(start), _) => Some(start),
        (None, limit) => limit.map(|limit| Paginator::new().with_limit(limit)),
    };
    let mut visited: HashSet<String> = cursor
        .as_ref()
        .and_then(|start| start.after.clone())
        .into_iter()
        .collect();
    let mut items = Vec::new();
    let mut pages = 0;

    let stopped = loop {
        if pages >= policy.max_pages {
            break StopReason::MaxPages;
        }

        let listing = pager.fetch_page(cursor.as_ref()).await?;
        pages += 1;
        let next = cursor.clone().unwrap_or_default().next_for(&listing);
        items.extend(listing.children);

        if policy.max_items.is_some_and(|max| items.len() >= max) {
            break StopReason::MaxItems;
        }

        match next {
            None => break StopReason::Exhausted,
            Some(next) => {
                let after = next.after.clone().unwrap_or_default();
                if !visited.insert(after.clone()) {
                    warn!("{} returned cursor {} twice, stopping", pager.path(), after);
                    break StopReason::RepeatedCursor;
                }
                cursor = Some(next);
            }
        }
    };

    debug!(
        "Collected {} items from {} pages of {} ({:?})",
        items.len(),
        pages,
        pager.path(),
        stopped
    );
    Ok(Collected {
        items,
        pages,
        stopped,
    })
}
