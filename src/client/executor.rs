use super::dispatch::{Dispatcher, PendingRequest};
use super::error::{ApiError, ApiResult, TRANSPORT_OTHER_CODE};
use super::pagination::Paginator;
use super::session::Session;
use super::transport::{HttpMethod, HttpResponse, Transport};
use futures::FutureExt;
use log::{debug, warn};
use reqwest::StatusCode;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Description of one API call, independent of host and credentials.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: HttpMethod,
    /// Path below the API host, e.g. `/r/pics/about/muted`.
    pub path: String,
    pub params: Vec<(String, String)>,
    pub paginator: Option<Paginator>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            params: Vec::new(),
            paginator: None,
        }
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Post,
            ..Self::get(path)
        }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn paginated(mut self, paginator: Option<&Paginator>) -> Self {
        self.paginator = paginator.cloned();
        self
    }
}

/// Issues exactly one HTTP request per call and turns the outcome into an
/// `ApiResult`. Never retries.
#[derive(Clone)]
pub struct RequestExecutor {
    transport: Arc<dyn Transport>,
}

impl RequestExecutor {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn execute<T, D>(
        &self,
        session: &Session,
        request: &ApiRequest,
        decoder: D,
    ) -> ApiResult<T>
    where
        D: FnOnce(&[u8]) -> ApiResult<T>,
    {
        let url = {
            let mut url = session.endpoint_url(&request.path)?;
            if request.method == HttpMethod::Get {
                let mut query = url.query_pairs_mut();
                query.append_pair("raw_json", "1");
                for (key, value) in &request.params {
                    query.append_pair(key, value);
                }
                if let Some(paginator) = &request.paginator {
                    for (key, value) in paginator.query_pairs() {
                        query.append_pair(&key, &value);
                    }
                }
            }
            url
        };

        let mut http_request = session.request(request.method, url);
        if request.method == HttpMethod::Post {
            http_request.form = request.params.clone();
        }

        let response = self.transport.send(http_request).await.map_err(|err| {
            warn!("Transport failure for {}: {}", request.path, err);
            ApiError::from(err)
        })?;

        if !response.is_success() {
            let err = status_error(&response);
            debug!("{} failed: {}", request.path, err);
            return Err(err);
        }

        match panic::catch_unwind(AssertUnwindSafe(|| decoder(&response.body))) {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => {
                debug!("Error decoding {}: {}", request.path, err);
                debug!(
                    "First 100 bytes: {}",
                    String::from_utf8_lossy(&response.body[..response.body.len().min(100)])
                );
                Err(err)
            }
            Err(_) => {
                warn!("Decoder panicked for {}", request.path);
                Err(ApiError::decode("decoder panicked"))
            }
        }
    }

    /// Run the request on the runtime and hand the result to `dispatcher`.
    /// A panicking transport is reported as a transport error, so only
    /// `PendingRequest::cancel` leaves the dispatcher undelivered.
    pub fn execute_with<T, D>(
        &self,
        session: &Session,
        request: ApiRequest,
        decoder: D,
        dispatcher: Dispatcher<T>,
    ) -> PendingRequest
    where
        T: Send + 'static,
        D: FnOnce(&[u8]) -> ApiResult<T> + Send + 'static,
    {
        let executor = self.clone();
        let session = session.clone();
        PendingRequest::new(tokio::spawn(async move {
            let result = AssertUnwindSafe(executor.execute(&session, &request, decoder))
                .catch_unwind()
                .await
                .unwrap_or_else(|_| {
                    warn!("Transport panicked for {}", request.path);
                    Err(ApiError::transport(TRANSPORT_OTHER_CODE, "transport panicked"))
                });
            dispatcher.deliver(result);
        }))
    }
}

/// Error for a non-2xx response, with the most useful message available.
fn status_error(response: &HttpResponse) -> ApiError {
    let from_json = serde_json::from_slice::<serde_json::Value>(&response.body)
        .ok()
        .and_then(|json| {
            json["message"]
                .as_str()
                .or_else(|| json["reason"].as_str())
                .or_else(|| json["error"].as_str())
                .map(str::to_string)
        });

    let message = from_json
        .or_else(|| {
            let text = String::from_utf8_lossy(&response.body).trim().to_string();
            (!text.is_empty() && text.len() <= 200).then_some(text)
        })
        .or_else(|| {
            StatusCode::from_u16(response.status)
                .ok()
                .and_then(|status| status.canonical_reason())
                .map(str::to_string)
        })
        .unwrap_or_else(|| format!("Server returned error status: {}", response.status));

    ApiError::http_status(response.status, message)
}
