//! Payloads returned by the subreddit endpoints.

pub mod account;
pub mod listing;
pub mod subreddit;

pub use account::{Account, UserListEntry};
pub use listing::{Listing, ListingData, RedditEnvelope, Thing};
pub use subreddit::Subreddit;
