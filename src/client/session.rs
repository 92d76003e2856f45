use super::error::ApiResult;
use super::transport::{HttpMethod, HttpRequest};
use url::Url;

pub const OAUTH_BASE_URL: &str = "https://oauth.reddit.com";
pub const PUBLIC_BASE_URL: &str = "https://www.reddit.com";
pub const DEFAULT_USER_AGENT: &str = "redsub/0.1 (subreddit client)";

/// Explicit request context: who we are and where requests go.
///
/// A session is handed to every executor call instead of living in shared
/// state. It attaches the user agent and, when present, the bearer token.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_agent: String,
    pub access_token: Option<String>,
    /// Replaces both the OAuth and public hosts (mock servers, proxies).
    pub base_url_override: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            access_token: None,
            base_url_override: None,
        }
    }
}

impl Session {
    pub fn anonymous(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            ..Self::default()
        }
    }

    pub fn with_token(user_agent: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            access_token: Some(access_token.into()),
            base_url_override: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url_override = Some(base_url.into());
        self
    }

    pub fn is_authorized(&self) -> bool {
        self.access_token.is_some()
    }

    /// Absolute URL for an API path such as `/r/pics/about`.
    ///
    /// Without a token the public host is used, which only serves JSON when
    /// the path ends in `.json`.
    pub fn endpoint_url(&self, path: &str) -> ApiResult<Url> {
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };

        let url = match (&self.base_url_override, self.is_authorized()) {
            (Some(base), _) => format!("{}{}", base.trim_end_matches('/'), path),
            (None, true) => format!("{}{}", OAUTH_BASE_URL, path),
            (None, false) => format!("{}{}.json", PUBLIC_BASE_URL, path),
        };

        Ok(Url::parse(&url)?)
    }

    /// Start a request with this session's headers attached.
    pub fn request(&self, method: HttpMethod, url: Url) -> HttpRequest {
        let mut headers = vec![("User-Agent".to_string(), self.user_agent.clone())];
        if let Some(token) = &self.access_token {
            headers.push(("Authorization".to_string(), format!("Bearer {}", token)));
        }
        HttpRequest {
            method,
            url,
            headers,
            form: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_sessions_use_public_json_endpoints() {
        let session = Session::anonymous("ua");
        let url = session.endpoint_url("/r/swift/about").unwrap();
        assert_eq!(url.as_str(), "https://www.reddit.com/r/swift/about.json");
    }

    #[test]
    fn token_sessions_use_oauth_host() {
        let session = Session::with_token("ua", "tok");
        let url = session.endpoint_url("subreddits/mine/subscriber").unwrap();
        assert_eq!(url.as_str(), "https://oauth.reddit.com/subreddits/mine/subscriber");
    }

    #[test]
    fn override_wins_for_both_hosts() {
        let session = Session::with_token("ua", "tok").with_base_url("http://127.0.0.1:9999/");
        let url = session.endpoint_url("/api/subscribe").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9999/api/subscribe");

        let session = Session::anonymous("ua").with_base_url("http://127.0.0.1:9999");
        let url = session.endpoint_url("/r/pics/about").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9999/r/pics/about");
    }

    #[test]
    fn bad_override_is_an_invalid_request() {
        let session = Session::anonymous("ua").with_base_url("not a url");
        let err = session.endpoint_url("/r/pics/about").unwrap_err();
        assert_eq!(err.code, crate::client::error::TRANSPORT_INVALID_REQUEST_CODE);
    }

    #[test]
    fn request_attaches_user_agent_and_bearer_token() {
        let session = Session::with_token("redsub-test", "abc");
        let url = session.endpoint_url("/r/pics/about").unwrap();
        let request = session.request(HttpMethod::Get, url);
        assert_eq!(request.header("User-Agent"), Some("redsub-test"));
        assert_eq!(request.header("Authorization"), Some("Bearer abc"));

        let anonymous = Session::anonymous("redsub-test");
        let url = anonymous.endpoint_url("/r/pics/about").unwrap();
        assert_eq!(anonymous.request(HttpMethod::Get, url).header("Authorization"), None);
    }
}
