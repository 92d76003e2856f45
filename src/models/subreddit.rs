use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// Subreddit (`t5`) payload.
///
/// Only the fields this crate reasons about are typed; everything else the
/// server sends is kept in `additional_fields`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Subreddit {
    /// Base-36 id without the `t5_` prefix.
    pub id: String,
    /// Fullname, e.g. `t5_2rdw8`. Missing when built locally from an id.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub public_description: String,
    #[serde(default)]
    pub url: String,
    pub subscribers: Option<i64>,
    pub created_utc: Option<f64>,
    #[serde(default)]
    pub over18: bool,
    pub user_is_subscriber: Option<bool>,
    pub user_is_moderator: Option<bool>,
    pub user_is_banned: Option<bool>,

    #[serde(flatten)]
    pub additional_fields: HashMap<String, Value>,
}

impl Subreddit {
    /// A subreddit known only by its display name, e.g. `swift`.
    pub fn named(display_name: &str) -> Self {
        let display_name = display_name.trim_start_matches("r/").to_string();
        Self {
            url: format!("/r/{}/", display_name),
            display_name,
            ..Self::blank()
        }
    }

    /// A subreddit known only by its id, e.g. `2rdw8`.
    pub fn with_id(id: &str) -> Self {
        let id = id.trim_start_matches("t5_").to_string();
        Self {
            name: format!("t5_{}", id),
            id,
            ..Self::blank()
        }
    }

    fn blank() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            display_name: String::new(),
            title: String::new(),
            public_description: String::new(),
            url: String::new(),
            subscribers: None,
            created_utc: None,
            over18: false,
            user_is_subscriber: None,
            user_is_moderator: None,
            user_is_banned: None,
            additional_fields: HashMap::new(),
        }
    }

    /// `t5_` fullname used by write endpoints.
    pub fn fullname(&self) -> Option<String> {
        if !self.name.is_empty() {
            Some(self.name.clone())
        } else if !self.id.is_empty() {
            Some(format!("t5_{}", self.id))
        } else {
            None
        }
    }

    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.created_utc
            .and_then(|secs| DateTime::from_timestamp(secs as i64, 0))
    }
}
