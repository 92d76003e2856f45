//! Configuration module for handling environment variables and .env files

use crate::client::session::DEFAULT_USER_AGENT;
use crate::client::{ApiError, RedditClient, Session};
use crate::operations::CollectPolicy;
use dotenv::dotenv;
use log::{info, warn};
use std::env;
use std::time::Duration;

/// Application configuration derived from environment variables and .env file
#[derive(Debug, Clone)]
pub struct AppConfig {
    // Reddit API settings
    pub user_agent: String,
    pub api_base: Option<String>,
    pub timeout: Duration,

    // OAuth token obtained elsewhere; authentication flows are not handled here
    pub access_token: Option<String>,

    // Listing traversal defaults
    pub page_limit: Option<u32>,
    pub max_pages: usize,

    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            api_base: None,
            timeout: Duration::from_secs(30),
            access_token: None,
            page_limit: None,
            max_pages: 10,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and .env file
    pub fn load() -> Self {
        // Try to load .env file, but continue even if it doesn't exist
        match dotenv() {
            Ok(_) => info!("Loaded environment from .env file"),
            Err(_) => info!("No .env file found, using system environment variables only"),
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from any key lookup, e.g. a map in tests.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(user_agent) = lookup("REDDIT_USER_AGENT") {
            config.user_agent = user_agent;
        }

        config.api_base = lookup("REDDIT_API_BASE");
        config.access_token = lookup("REDDIT_ACCESS_TOKEN").filter(|token| !token.is_empty());

        if let Some(secs) = parse_var::<u64>(&lookup, "REDDIT_TIMEOUT_SECS") {
            config.timeout = Duration::from_secs(secs);
        }

        config.page_limit = parse_var::<u32>(&lookup, "REDDIT_PAGE_LIMIT");

        if let Some(max_pages) = parse_var::<usize>(&lookup, "REDDIT_MAX_PAGES") {
            config.max_pages = max_pages;
        }

        if let Some(level) = lookup("REDDIT_LOG_LEVEL") {
            config.log_level = level;
        }

        config
    }

    /// Session carrying this configuration's identity and endpoints
    pub fn session(&self) -> Session {
        let session = match &self.access_token {
            Some(token) => Session::with_token(self.user_agent.clone(), token.clone()),
            None => Session::anonymous(self.user_agent.clone()),
        };
        match &self.api_base {
            Some(base) => session.with_base_url(base.clone()),
            None => session,
        }
    }

    /// Listing traversal bounds from `REDDIT_PAGE_LIMIT` and `REDDIT_MAX_PAGES`
    pub fn collect_policy(&self) -> CollectPolicy {
        CollectPolicy {
            max_pages: self.max_pages,
            max_items: None,
            page_limit: self.page_limit,
        }
    }

    /// Create a RedditClient from this configuration
    pub fn create_client(&self) -> Result<RedditClient, ApiError> {
        RedditClient::from_config(self)
    }

    /// Install env_logger with this configuration's level as the default
    /// filter. `RUST_LOG` still takes precedence. Safe to call more than once.
    pub fn init_logging(&self) {
        let env = env_logger::Env::default().default_filter_or(self.log_level.as_str());
        if env_logger::Builder::from_env(env).try_init().is_err() {
            warn!("Logger already initialized");
        }
    }
}

fn parse_var<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring {}={:?}: not a valid number", key, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config_from(&[]);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_pages, 10);
        assert!(config.access_token.is_none());
        assert!(!config.session().is_authorized());
    }

    #[test]
    fn reads_every_variable() {
        let config = config_from(&[
            ("REDDIT_USER_AGENT", "redsub-test/1.0"),
            ("REDDIT_API_BASE", "http://127.0.0.1:8080"),
            ("REDDIT_ACCESS_TOKEN", "tok"),
            ("REDDIT_TIMEOUT_SECS", "5"),
            ("REDDIT_PAGE_LIMIT", "100"),
            ("REDDIT_MAX_PAGES", "3"),
            ("REDDIT_LOG_LEVEL", "debug"),
        ]);

        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.page_limit, Some(100));
        assert_eq!(config.max_pages, 3);
        assert_eq!(config.log_level, "debug");

        let session = config.session();
        assert_eq!(session.user_agent, "redsub-test/1.0");
        assert_eq!(session.access_token.as_deref(), Some("tok"));
        assert_eq!(session.base_url_override.as_deref(), Some("http://127.0.0.1:8080"));
    }

    #[test]
    fn collect_policy_follows_paging_variables() {
        let policy = config_from(&[("REDDIT_PAGE_LIMIT", "100"), ("REDDIT_MAX_PAGES", "3")])
            .collect_policy();
        assert_eq!(policy.page_limit, Some(100));
        assert_eq!(policy.max_pages, 3);
        assert_eq!(policy.max_items, None);

        assert_eq!(config_from(&[]).collect_policy(), CollectPolicy::default());
    }

    #[test]
    fn bad_numbers_and_empty_tokens_are_ignored() {
        let config = config_from(&[
            ("REDDIT_TIMEOUT_SECS", "soon"),
            ("REDDIT_MAX_PAGES", "-1"),
            ("REDDIT_ACCESS_TOKEN", ""),
        ]);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_pages, 10);
        assert!(config.access_token.is_none());
    }
}
