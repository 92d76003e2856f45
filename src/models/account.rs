use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// Account (`t2`) payload.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub created_utc: Option<f64>,
    pub link_karma: Option<i64>,
    pub comment_karma: Option<i64>,

    #[serde(flatten)]
    pub additional_fields: HashMap<String, Value>,
}

/// Entry of a subreddit user list (banned, muted, contributors, moderators,
/// wiki bans, wiki contributors).
///
/// These come back as bare objects rather than `t2` things.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct UserListEntry {
    pub name: String,
    /// Account fullname, `t2_...`. Some lists use `rel_id` instead.
    #[serde(default)]
    pub id: String,
    /// When the user was added to the list, epoch seconds.
    pub date: Option<f64>,
    pub note: Option<String>,
    pub days_left: Option<i64>,
    pub mod_permissions: Option<Vec<String>>,

    #[serde(flatten)]
    pub additional_fields: HashMap<String, Value>,
}

impl UserListEntry {
    pub fn added_at(&self) -> Option<DateTime<Utc>> {
        self.date.and_then(|secs| DateTime::from_timestamp(secs as i64, 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn moderator_entry_parses_permissions() {
        let entry: UserListEntry = serde_json::from_value(json!({
            "name": "spez",
            "id": "t2_1w72",
            "date": 1262304000.0,
            "mod_permissions": ["all"],
            "author_flair_text": null
        }))
        .unwrap();

        assert_eq!(entry.name, "spez");
        assert_eq!(entry.mod_permissions, Some(vec!["all".to_string()]));
        assert_eq!(entry.added_at().unwrap().format("%Y").to_string(), "2010");
        assert!(entry.additional_fields.contains_key("author_flair_text"));
    }

    #[test]
    fn banned_entry_without_id_still_parses() {
        let entry: UserListEntry =
            serde_json::from_value(json!({"name": "troll", "rel_id": "rb_x", "days_left": 3}))
                .unwrap();
        assert_eq!(entry.id, "");
        assert_eq!(entry.days_left, Some(3));
    }
}
