use crate::client::{ApiError, RedditClient, SubredditAbout};
use crate::models::{Subreddit, UserListEntry};
use log::{debug, info};

/// What to do when Reddit answers 403 for a user list.
///
/// Moderation-only lists come back forbidden to most sessions, and Reddit
/// also answers 403 for some lists that are simply vacant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ForbiddenPolicy {
    /// Surface the 403.
    #[default]
    Fail,
    /// Report an empty, forbidden list.
    TreatAsEmpty,
}

/// Configuration options for fetching a subreddit user list
#[derive(Debug, Clone)]
pub struct UserListOptions {
    pub subreddit: String,
    pub about: SubredditAbout,
    pub forbidden: ForbiddenPolicy,
}

/// Result of a user list operation
#[derive(Debug)]
pub struct UserListResult {
    pub users: Vec<UserListEntry>,
    /// The server refused the list and the policy turned that into `users = []`.
    pub forbidden: bool,
}

/// Operation for fetching one of a subreddit's user lists
pub struct UserListOperation {
    options: UserListOptions,
    client: RedditClient,
}

impl UserListOperation {
    pub fn with_client(options: UserListOptions, client: RedditClient) -> Self {
        Self { options, client }
    }

    pub async fn execute(&self) -> Result<UserListResult, ApiError> {
        let subreddit = Subreddit::named(&self.options.subreddit);
        let result = self
            .client
            .about_users(&subreddit, self.options.about)
            .await;
        apply_policy(self.options.forbidden, result.map(|listing| listing.children)).map(
            |result| {
                info!(
                    "r/{} {}: {} users{}",
                    self.options.subreddit,
                    self.options.about,
                    result.users.len(),
                    if result.forbidden { " (forbidden)" } else { "" }
                );
                result
            },
        )
    }
}

/// Reclassify a raw result according to `policy`.
pub fn apply_policy(
    policy: ForbiddenPolicy,
    result: Result<Vec<UserListEntry>, ApiError>,
) -> Result<UserListResult, ApiError> {
    match result {
        Ok(users) => Ok(UserListResult {
            users,
            forbidden: false,
        }),
        Err(err) if err.is_forbidden() && policy == ForbiddenPolicy::TreatAsEmpty => {
            debug!("Treating forbidden list as empty: {}", err);
            Ok(UserListResult {
                users: Vec::new(),
                forbidden: true,
            })
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forbidden_is_reclassified_only_when_asked() {
        let forbidden = || Err(ApiError::http_status(403, "Forbidden"));

        let err = apply_policy(ForbiddenPolicy::Fail, forbidden()).unwrap_err();
        assert_eq!(err.code, 403);

        let result = apply_policy(ForbiddenPolicy::TreatAsEmpty, forbidden()).unwrap();
        assert!(result.users.is_empty());
        assert!(result.forbidden);
    }

    #[test]
    fn other_errors_pass_through_either_policy() {
        let err = apply_policy(
            ForbiddenPolicy::TreatAsEmpty,
            Err(ApiError::http_status(404, "Not Found")),
        )
        .unwrap_err();
        assert_eq!(err.code, 404);
    }
}
