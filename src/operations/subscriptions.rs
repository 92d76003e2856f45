use super::collect::{collect_pages, CollectPolicy, StopReason};
use crate::client::{ApiError, RedditClient, UserRelation};
use crate::config::AppConfig;
use crate::models::{Listing, Subreddit};
use log::{error, info};

/// Configuration options for listing the current user's subreddits
#[derive(Debug, Clone)]
pub struct SubscriptionsOptions {
    pub relation: UserRelation,
    pub policy: CollectPolicy,
}

impl Default for SubscriptionsOptions {
    fn default() -> Self {
        Self {
            relation: UserRelation::Subscriber,
            policy: CollectPolicy::default(),
        }
    }
}

impl SubscriptionsOptions {
    /// Options for `relation` with the configured paging bounds
    pub fn from_config(config: &AppConfig, relation: UserRelation) -> Self {
        Self {
            relation,
            policy: config.collect_policy(),
        }
    }
}

/// Operation for collecting every subreddit the user subscribes to,
/// contributes to or moderates
pub struct SubscriptionsOperation {
    options: SubscriptionsOptions,
    client: RedditClient,
}

impl SubscriptionsOperation {
    pub fn with_client(options: SubscriptionsOptions, client: RedditClient) -> Self {
        Self { options, client }
    }

    pub async fn execute(&self) -> Result<Vec<Subreddit>, ApiError> {
        let mut pager = self.client.pager_for_user_related(self.options.relation);
        let collected = collect_pages(&mut pager, None, self.options.policy).await?;
        if collected.stopped != StopReason::Exhausted {
            info!(
                "Stopped listing {} subreddits early: {:?}",
                self.options.relation, collected.stopped
            );
        }

        let subreddits = Listing::new(collected.items, None, None).into_subreddits();
        info!(
            "Found {} subreddits where user is {}",
            subreddits.len(),
            self.options.relation
        );
        Ok(subreddits)
    }
}

/// Result of a subscribe/unsubscribe operation
#[derive(Debug)]
pub struct SubscribeResult {
    pub fullname: String,
    pub subscribed: bool,
    pub message: String,
}

/// Operation toggling a subscription. Sends exactly one request; repeating
/// it with the same state is left to the server.
pub struct SubscribeOperation {
    subreddit: Subreddit,
    subscribe: bool,
    client: RedditClient,
}

impl SubscribeOperation {
    pub fn with_client(subreddit: Subreddit, subscribe: bool, client: RedditClient) -> Self {
        Self {
            subreddit,
            subscribe,
            client,
        }
    }

    pub async fn execute(&self) -> Result<SubscribeResult, ApiError> {
        let target = self
            .subreddit
            .fullname()
            .unwrap_or_else(|| self.subreddit.display_name.clone());
        let verb = if self.subscribe { "Subscribed to" } else { "Unsubscribed from" };

        match self.client.set_subscribe(&self.subreddit, self.subscribe).await {
            Ok(()) => Ok(SubscribeResult {
                message: format!("{} {}", verb, target),
                fullname: target,
                subscribed: self.subscribe,
            }),
            Err(err) => {
                error!("Error changing subscription for {}: {}", target, err);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_from_config_use_configured_bounds() {
        let config = AppConfig::from_lookup(|key| match key {
            "REDDIT_PAGE_LIMIT" => Some("25".to_string()),
            "REDDIT_MAX_PAGES" => Some("2".to_string()),
            _ => None,
        });
        let options = SubscriptionsOptions::from_config(&config, UserRelation::Moderator);

        assert_eq!(options.relation, UserRelation::Moderator);
        assert_eq!(options.policy.page_limit, Some(25));
        assert_eq!(options.policy.max_pages, 2);
    }
}
