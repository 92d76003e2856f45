use super::account::Account;
use super::subreddit::Subreddit;
use serde::Deserialize;
use serde_json::Value;

/// One page of results. Children keep the server's order; cursors are
/// opaque and only ever handed back to the server.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing<T> {
    pub children: Vec<T>,
    pub after: Option<String>,
    pub before: Option<String>,
}

impl<T> Listing<T> {
    pub fn new(children: Vec<T>, after: Option<String>, before: Option<String>) -> Self {
        Self {
            children,
            after,
            before,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), None, None)
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn has_more(&self) -> bool {
        self.after.is_some()
    }
}

impl Listing<Thing> {
    /// Keep only the subreddits, in listing order.
    pub fn into_subreddits(self) -> Vec<Subreddit> {
        self.children
            .into_iter()
            .filter_map(|thing| match thing {
                Thing::Subreddit(subreddit) => Some(subreddit),
                _ => None,
            })
            .collect()
    }
}

/// Top-level `{ "kind": ..., "data": ... }` wrapper Reddit puts around
/// listings and single things.
#[derive(Deserialize, Debug)]
pub struct RedditEnvelope<D> {
    pub kind: String,
    pub data: D,
}

/// Wire shape of a listing's `data` object.
#[derive(Deserialize, Debug)]
pub struct ListingData<T> {
    #[serde(default = "Vec::new")]
    pub children: Vec<T>,
    #[serde(default)]
    pub after: Option<String>,
    #[serde(default)]
    pub before: Option<String>,
}

impl<T> From<ListingData<T>> for Listing<T> {
    fn from(data: ListingData<T>) -> Self {
        Listing::new(data.children, data.after, data.before)
    }
}

/// A listing child tagged with its kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Thing {
    /// `t5`
    Subreddit(Subreddit),
    /// `t2`
    Account(Account),
    /// Links, comments, messages and anything else.
    Other { kind: String, data: Value },
}

impl Thing {
    pub fn kind(&self) -> &str {
        match self {
            Thing::Subreddit(_) => "t5",
            Thing::Account(_) => "t2",
            Thing::Other { kind, .. } => kind,
        }
    }

    pub fn from_envelope(envelope: RedditEnvelope<Value>) -> Result<Self, serde_json::Error> {
        match envelope.kind.as_str() {
            "t5" => Ok(Thing::Subreddit(serde_json::from_value(envelope.data)?)),
            "t2" => Ok(Thing::Account(serde_json::from_value(envelope.data)?)),
            _ => Ok(Thing::Other {
                kind: envelope.kind,
                data: envelope.data,
            }),
        }
    }
}

impl<'de> Deserialize<'de> for Thing {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let envelope = RedditEnvelope::<Value>::deserialize(deserializer)?;
        Thing::from_envelope(envelope).map_err(serde::de::Error::custom)
    }
}
