//! Client for the subreddit endpoints of the Reddit API: subreddit metadata,
//! subreddit user lists, the current user's subreddits, and subscriptions.
//!
//! Requests go through a `RequestExecutor` that sends exactly one HTTP call
//! per operation and reports an `ApiResult`. Results can be awaited directly
//! or delivered once through a `Dispatcher`. Listings are paged by the caller
//! with a `Pager` and `Paginator` cursors.

pub mod client;
pub mod config;
pub mod models;
pub mod operations;

pub use client::{
    ApiError, ApiErrorKind, ApiResult, Dispatcher, PageState, Pager, Paginator, RedditClient,
    Session, SubredditAbout, UserRelation,
};
pub use config::AppConfig;
pub use models::{Listing, Subreddit, Thing, UserListEntry};
