use crate::client::{ApiError, RedditClient};
use crate::models::Subreddit;
use log::{error, info};

/// Result of an about operation
#[derive(Debug)]
pub struct AboutResult {
    pub subreddit: Subreddit,
    /// One-line summary for display
    pub summary: String,
}

/// Operation for fetching a subreddit's metadata
pub struct AboutOperation {
    name: String,
    client: RedditClient,
}

impl AboutOperation {
    pub fn with_client(name: impl Into<String>, client: RedditClient) -> Self {
        Self {
            name: name.into(),
            client,
        }
    }

    pub async fn execute(&self) -> Result<AboutResult, ApiError> {
        let subreddit = match self.client.about(&Subreddit::named(&self.name)).await {
            Ok(subreddit) => subreddit,
            Err(err) => {
                error!("Error fetching r/{}: {}", self.name, err);
                return Err(err);
            }
        };

        let created = subreddit
            .created()
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let summary = format!(
            "r/{} ({}) | {} subscribers | created {}",
            subreddit.display_name,
            subreddit.fullname().unwrap_or_default(),
            subreddit
                .subscribers
                .map(|n| n.to_string())
                .unwrap_or_else(|| "?".to_string()),
            created
        );
        info!("{}", summary);

        Ok(AboutResult { subreddit, summary })
    }
}
