//! Operations module provides caller-level workflows over the client:
//! policies the core deliberately leaves to its callers live here.

pub mod about;
pub mod collect;
pub mod subscriptions;
pub mod user_list;

pub use about::{AboutOperation, AboutResult};
pub use collect::{collect_pages, CollectPolicy, Collected, StopReason};
pub use subscriptions::{
    SubscribeOperation, SubscribeResult, SubscriptionsOperation, SubscriptionsOptions,
};
pub use user_list::{ForbiddenPolicy, UserListOperation, UserListOptions, UserListResult};
