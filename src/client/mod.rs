pub mod decode;
pub mod dispatch;
pub mod error;
pub mod executor;
pub mod pagination;
pub mod session;
pub mod transport;

pub use dispatch::{CompletionHandle, Dispatcher, PendingRequest};
pub use error::{ApiError, ApiErrorKind, ApiResult};
pub use executor::{ApiRequest, RequestExecutor};
pub use pagination::{PageState, Pager, Paginator};
pub use session::Session;
pub use transport::{HttpMethod, HttpRequest, HttpResponse, ReqwestTransport, Transport};

use crate::models::{Listing, Subreddit, Thing, UserListEntry};
use decode::{decode_empty, decode_listing, decode_thing, decode_thing_listing};
use log::{debug, info};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// User lists attached to a subreddit, `/r/{name}/about/{where}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubredditAbout {
    Banned,
    Muted,
    Contributors,
    Moderators,
    Wikibanned,
    Wikicontributors,
}

impl SubredditAbout {
    pub const ALL: [SubredditAbout; 6] = [
        SubredditAbout::Banned,
        SubredditAbout::Muted,
        SubredditAbout::Contributors,
        SubredditAbout::Moderators,
        SubredditAbout::Wikibanned,
        SubredditAbout::Wikicontributors,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SubredditAbout::Banned => "banned",
            SubredditAbout::Muted => "muted",
            SubredditAbout::Contributors => "contributors",
            SubredditAbout::Moderators => "moderators",
            SubredditAbout::Wikibanned => "wikibanned",
            SubredditAbout::Wikicontributors => "wikicontributors",
        }
    }
}

impl fmt::Display for SubredditAbout {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the current user relates to a subreddit, `/subreddits/mine/{where}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRelation {
    Subscriber,
    Contributor,
    Moderator,
}

impl UserRelation {
    pub fn as_str(self) -> &'static str {
        match self {
            UserRelation::Subscriber => "subscriber",
            UserRelation::Contributor => "contributor",
            UserRelation::Moderator => "moderator",
        }
    }
}

impl fmt::Display for UserRelation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subreddit endpoints of the Reddit API.
///
/// Every method issues exactly one request. The `*_with` variants run on the
/// tokio runtime and report through a `Dispatcher`; the plain variants are
/// awaited directly.
#[derive(Clone)]
pub struct RedditClient {
    pub session: Session,
    executor: RequestExecutor,
}

impl RedditClient {
    pub fn new(session: Session) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(Duration::from_secs(30))?;
        Ok(Self::with_transport(session, Arc::new(transport)))
    }

    pub fn with_transport(session: Session, transport: Arc<dyn Transport>) -> Self {
        debug!(
            "Creating RedditClient with user_agent: {} (authorized: {})",
            session.user_agent,
            session.is_authorized()
        );
        Self {
            session,
            executor: RequestExecutor::new(transport),
        }
    }

    /// Create a client from a configuration object
    pub fn from_config(config: &crate::config::AppConfig) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(config.timeout)?;
        Ok(Self::with_transport(
            config.session(),
            Arc::new(transport),
        ))
    }

    pub fn executor(&self) -> &RequestExecutor {
        &self.executor
    }

    pub fn about_request(subreddit: &Subreddit) -> Result<ApiRequest, ApiError> {
        Ok(ApiRequest::get(format!("{}/about", subreddit_path(subreddit)?)))
    }

    pub fn about_users_request(
        subreddit: &Subreddit,
        about: SubredditAbout,
    ) -> Result<ApiRequest, ApiError> {
        Ok(ApiRequest::get(format!(
            "{}/about/{}",
            subreddit_path(subreddit)?,
            about
        )))
    }

    pub fn user_related_request(relation: UserRelation) -> ApiRequest {
        ApiRequest::get(format!("/subreddits/mine/{}", relation))
    }

    pub fn subscribe_request(subreddit: &Subreddit, subscribe: bool) -> Result<ApiRequest, ApiError> {
        let fullname = subreddit.fullname().ok_or_else(|| {
            ApiError::transport(
                error::TRANSPORT_INVALID_REQUEST_CODE,
                format!("subreddit {:?} has no id to subscribe with", subreddit.display_name),
            )
        })?;
        let action = if subscribe { "sub" } else { "unsub" };
        Ok(ApiRequest::post("/api/subscribe")
            .param("action", action)
            .param("sr", fullname))
    }

    /// Metadata of one subreddit.
    pub async fn about(&self, subreddit: &Subreddit) -> ApiResult<Subreddit> {
        let request = Self::about_request(subreddit)?;
        info!("Fetching about for r/{}", subreddit.display_name);
        self.executor
            .execute(&self.session, &request, |body| {
                decode_thing::<Subreddit>("t5", body)
            })
            .await
    }

    /// Users on one of the subreddit's lists. Reddit answers 403 for lists
    /// the session may not see; that error is returned as is.
    pub async fn about_users(
        &self,
        subreddit: &Subreddit,
        about: SubredditAbout,
    ) -> ApiResult<Listing<UserListEntry>> {
        let request = Self::about_users_request(subreddit, about)?;
        info!("Fetching {} users of r/{}", about, subreddit.display_name);
        self.executor
            .execute(&self.session, &request, decode_listing::<UserListEntry>)
            .await
    }

    /// One page of the subreddits the current user subscribes to,
    /// contributes to or moderates.
    pub async fn user_related_subreddits(
        &self,
        relation: UserRelation,
        paginator: Option<&Paginator>,
    ) -> ApiResult<Listing<Thing>> {
        info!("Fetching subreddits where user is {}", relation);
        let request = Self::user_related_request(relation).paginated(paginator);
        self.executor
            .execute(&self.session, &request, decode_thing_listing)
            .await
    }

    /// Subscribe to or unsubscribe from a subreddit. No payload on success.
    pub async fn set_subscribe(&self, subreddit: &Subreddit, subscribe: bool) -> ApiResult<()> {
        let request = Self::subscribe_request(subreddit, subscribe)?;
        info!(
            "{} {}",
            if subscribe { "Subscribing to" } else { "Unsubscribing from" },
            subreddit.fullname().unwrap_or_default()
        );
        self.executor
            .execute(&self.session, &request, decode_empty)
            .await
    }

    pub fn about_with(&self, subreddit: &Subreddit, dispatcher: Dispatcher<Subreddit>) -> PendingRequest {
        match Self::about_request(subreddit) {
            Ok(request) => self.executor.execute_with(
                &self.session,
                request,
                |body| decode_thing::<Subreddit>("t5", body),
                dispatcher,
            ),
            Err(err) => reject(err, dispatcher),
        }
    }

    pub fn about_users_with(
        &self,
        subreddit: &Subreddit,
        about: SubredditAbout,
        dispatcher: Dispatcher<Listing<UserListEntry>>,
    ) -> PendingRequest {
        match Self::about_users_request(subreddit, about) {
            Ok(request) => self.executor.execute_with(
                &self.session,
                request,
                decode_listing::<UserListEntry>,
                dispatcher,
            ),
            Err(err) => reject(err, dispatcher),
        }
    }

    pub fn user_related_subreddits_with(
        &self,
        relation: UserRelation,
        paginator: Option<&Paginator>,
        dispatcher: Dispatcher<Listing<Thing>>,
    ) -> PendingRequest {
        self.executor.execute_with(
            &self.session,
            Self::user_related_request(relation).paginated(paginator),
            decode_thing_listing,
            dispatcher,
        )
    }

    /// Callback form of `set_subscribe`. A request that cannot be built is
    /// still reported through the dispatcher.
    pub fn set_subscribe_with(
        &self,
        subreddit: &Subreddit,
        subscribe: bool,
        dispatcher: Dispatcher<()>,
    ) -> PendingRequest {
        match Self::subscribe_request(subreddit, subscribe) {
            Ok(request) => {
                self.executor
                    .execute_with(&self.session, request, decode_empty, dispatcher)
            }
            Err(err) => reject(err, dispatcher),
        }
    }

    pub fn pager_for_user_related(&self, relation: UserRelation) -> Pager<Thing> {
        Pager::new(
            self.executor.clone(),
            self.session.clone(),
            Self::user_related_request(relation),
            decode_thing_listing,
        )
    }

    pub fn pager_for_about(
        &self,
        subreddit: &Subreddit,
        about: SubredditAbout,
    ) -> Result<Pager<UserListEntry>, ApiError> {
        Ok(Pager::new(
            self.executor.clone(),
            self.session.clone(),
            Self::about_users_request(subreddit, about)?,
            decode_listing::<UserListEntry>,
        ))
    }
}

/// `/r/{name}` for a subreddit whose display name is a plain Reddit name
/// (letters, digits, underscores). Anything else would change the path.
fn subreddit_path(subreddit: &Subreddit) -> Result<String, ApiError> {
    let name = subreddit.display_name.as_str();
    if name.is_empty() {
        return Err(ApiError::transport(
            error::TRANSPORT_INVALID_REQUEST_CODE,
            format!("subreddit {:?} has no display name", subreddit.name),
        ));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ApiError::transport(
            error::TRANSPORT_INVALID_REQUEST_CODE,
            format!("invalid subreddit name {:?}", name),
        ));
    }
    Ok(format!("/r/{}", name))
}

/// Report a request that could not be built through its dispatcher.
fn reject<T: Send + 'static>(err: ApiError, dispatcher: Dispatcher<T>) -> PendingRequest {
    debug!("Rejecting request before sending: {}", err);
    PendingRequest::new(tokio::spawn(async move { dispatcher.deliver(Err(err)) }))
}
