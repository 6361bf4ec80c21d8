//! Resource Manager HTTP plumbing
//!
//! Every call is a JSON request against `{endpoint}/subscriptions/{id}/...`
//! with an `api-version` query parameter and a bearer token. Long-running
//! operations are followed through their `Azure-AsyncOperation` or
//! `Location` header until they finish or the poll timeout elapses.

use crate::auth::TokenProvider;
use crate::error::{AzureError, Result};
use reqwest::header::{HeaderMap, IF_MATCH, LOCATION, RETRY_AFTER};
use reqwest::{Method, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tokio::time::Instant;

const ASYNC_OPERATION: &str = "azure-asyncoperation";

/// How a long-running operation reports progress
#[derive(Debug, Clone, PartialEq, Eq)]
enum PollTarget {
    /// Status document with a `status` field
    AsyncOperation(String),
    /// 202 until done
    Location(String),
}

impl PollTarget {
    fn url(&self) -> &str {
        match self {
            PollTarget::AsyncOperation(url) | PollTarget::Location(url) => url,
        }
    }
}

/// A client bound to one subscription and one sign-in
pub struct ArmClient {
    http: reqwest::Client,
    endpoint: String,
    subscription_id: String,
    tokens: TokenProvider,
    poll_interval: Duration,
    poll_timeout: Duration,
}

impl ArmClient {
    pub fn new(
        http: reqwest::Client,
        endpoint: impl Into<String>,
        subscription_id: impl Into<String>,
        tokens: TokenProvider,
    ) -> Self {
        Self {
            http,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            subscription_id: subscription_id.into(),
            tokens,
            poll_interval: Duration::from_secs(5),
            poll_timeout: Duration::from_secs(1800),
        }
    }

    pub fn with_polling(mut self, interval: Duration, timeout: Duration) -> Self {
        self.poll_interval = interval;
        self.poll_timeout = timeout;
        self
    }

    pub fn subscription_id(&self) -> &str {
        &self.subscription_id
    }

    /// URL of a path below the subscription
    pub fn subscription_url(&self, path: &str) -> String {
        format!(
            "{}/subscriptions/{}{}",
            self.endpoint, self.subscription_id, path
        )
    }

    /// URL of a path below a resource group
    pub fn resource_group_url(&self, resource_group: &str, path: &str) -> String {
        self.subscription_url(&format!("/resourceGroups/{}{}", resource_group, path))
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        api_version: &str,
        if_match: Option<&str>,
    ) -> Result<T> {
        let response = self
            .send(Method::GET, url, Some(api_version), None, if_match)
            .await?;
        json(response).await
    }

    /// HEAD request; 2xx means the resource exists, 404 that it does not
    pub async fn exists(&self, url: &str, api_version: &str) -> Result<bool> {
        let response = self
            .execute(Method::HEAD, url, Some(api_version), None, None)
            .await?;
        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => Err(error_from_response(response).await),
        }
    }

    /// PUT or PATCH a resource, waiting for provisioning when the service
    /// answers asynchronously
    pub async fn upsert<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        api_version: &str,
        body: Value,
        if_match: Option<&str>,
    ) -> Result<T> {
        let response = self
            .send(method, url, Some(api_version), Some(body), if_match)
            .await?;
        match poll_target(response.status(), response.headers()) {
            Some(target) => {
                let delay = retry_after(response.headers());
                self.wait(target, delay).await?;
                self.get(url, api_version, None).await
            }
            None => json(response).await,
        }
    }

    /// POST an action and decode its result
    pub async fn post<T: DeserializeOwned>(
        &self,
        url: &str,
        api_version: &str,
        body: Option<Value>,
        if_match: Option<&str>,
    ) -> Result<T> {
        let response = self
            .send(Method::POST, url, Some(api_version), body, if_match)
            .await?;
        json(response).await
    }

    /// POST an action with no result, waiting for it to finish
    pub async fn post_and_wait(&self, url: &str, api_version: &str) -> Result<()> {
        let response = self
            .send(Method::POST, url, Some(api_version), None, None)
            .await?;
        self.finish(response).await
    }

    /// DELETE a resource, waiting for it to finish
    pub async fn delete(&self, url: &str, api_version: &str) -> Result<()> {
        let response = self
            .send(Method::DELETE, url, Some(api_version), None, None)
            .await?;
        self.finish(response).await
    }

    /// DELETE a resource whose last state is returned in the response
    pub async fn delete_returning<T: DeserializeOwned>(
        &self,
        url: &str,
        api_version: &str,
        if_match: Option<&str>,
    ) -> Result<T> {
        let response = self
            .send(Method::DELETE, url, Some(api_version), None, if_match)
            .await?;
        json(response).await
    }

    /// GET every page of a collection
    pub async fn list<T: DeserializeOwned>(&self, url: &str, api_version: &str) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut page: Page<T> = self.get(url, api_version, None).await?;
        loop {
            items.extend(page.value);
            match page.next_link {
                Some(next) if !next.is_empty() => {
                    let response = self.send(Method::GET, &next, None, None, None).await?;
                    page = json(response).await?;
                }
                _ => break,
            }
        }
        Ok(items)
    }

    async fn finish(&self, response: Response) -> Result<()> {
        if let Some(target) = poll_target(response.status(), response.headers()) {
            let delay = retry_after(response.headers());
            self.wait(target, delay).await?;
        }
        Ok(())
    }

    /// Poll a long-running operation until it reaches a terminal state
    async fn wait(&self, target: PollTarget, first_delay: Option<Duration>) -> Result<()> {
        let timed_out = || AzureError::PollTimeout(target.url().to_string());
        let deadline = Instant::now()
            .checked_add(self.poll_timeout)
            .ok_or_else(timed_out)?;
        let mut delay = self.next_delay(first_delay);

        tracing::info!(url = target.url(), "Waiting for long-running operation");

        loop {
            if !wakes_before(deadline, delay) {
                return Err(timed_out());
            }
            tokio::time::sleep(delay).await;

            let response = self
                .send(Method::GET, target.url(), None, None, None)
                .await?;
            let status = response.status();
            delay = self.next_delay(retry_after(response.headers()));

            match &target {
                PollTarget::AsyncOperation(_) => {
                    let operation: OperationStatus = json(response).await?;
                    match operation.status.as_str() {
                        "Succeeded" => return Ok(()),
                        "Failed" | "Canceled" | "Cancelled" => {
                            let error = operation.error.unwrap_or_else(|| ApiErrorBody {
                                code: format!("Operation{}", operation.status),
                                message: format!("Operation {}", operation.status.to_lowercase()),
                            });
                            return Err(AzureError::Api {
                                status: status.as_u16(),
                                code: error.code,
                                message: error.message,
                            });
                        }
                        other => tracing::debug!(status = other, "Operation still running"),
                    }
                }
                PollTarget::Location(_) => {
                    if status != StatusCode::ACCEPTED {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Server-requested delay, never longer than the poll timeout
    fn next_delay(&self, requested: Option<Duration>) -> Duration {
        requested
            .map(|delay| delay.min(self.poll_timeout))
            .unwrap_or(self.poll_interval)
    }

    /// Send a request and turn error statuses into [`AzureError::Api`]
    async fn send(
        &self,
        method: Method,
        url: &str,
        api_version: Option<&str>,
        body: Option<Value>,
        if_match: Option<&str>,
    ) -> Result<Response> {
        let response = self
            .execute(method, url, api_version, body, if_match)
            .await?;
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(error_from_response(response).await)
        }
    }

    async fn execute(
        &self,
        method: Method,
        url: &str,
        api_version: Option<&str>,
        body: Option<Value>,
        if_match: Option<&str>,
    ) -> Result<Response> {
        let token = self.tokens.token().await?;

        tracing::debug!(%method, url, "Resource Manager request");

        let mut request = self.http.request(method, url).bearer_auth(token);
        if let Some(version) = api_version {
            request = request.query(&[("api-version", version)]);
        }
        if let Some(etag) = if_match {
            request = request.header(IF_MATCH, etag);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        Ok(request.send().await?)
    }
}

async fn json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| AzureError::InvalidResponse(e.to_string()))
}

async fn error_from_response(response: Response) -> AzureError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    parse_error(status, &body)
}

/// Build an error from an ARM error body, falling back to the status line
pub(crate) fn parse_error(status: StatusCode, body: &str) -> AzureError {
    let parsed = serde_json::from_str::<CloudErrorResponse>(body)
        .ok()
        .and_then(|r| r.error);

    match parsed {
        Some(error) => AzureError::Api {
            status: status.as_u16(),
            code: error.code,
            message: error.message,
        },
        None => {
            let code = status
                .canonical_reason()
                .unwrap_or("UnknownError")
                .replace(' ', "");
            let message = match body.trim() {
                "" => format!("HTTP {}", status),
                text => text.to_string(),
            };
            AzureError::Api {
                status: status.as_u16(),
                code,
                message,
            }
        }
    }
}

fn poll_target(status: StatusCode, headers: &HeaderMap) -> Option<PollTarget> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    if let Some(url) = header(ASYNC_OPERATION) {
        return Some(PollTarget::AsyncOperation(url));
    }
    if status == StatusCode::ACCEPTED {
        return header(LOCATION.as_str()).map(PollTarget::Location);
    }
    None
}

/// Whether sleeping for `delay` from now ends before `deadline`
fn wakes_before(deadline: Instant, delay: Duration) -> bool {
    Instant::now()
        .checked_add(delay)
        .is_some_and(|wake| wake < deadline)
}

fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

// ============ API Types ============

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Page<T> {
    #[serde(default = "Vec::new")]
    value: Vec<T>,
    #[serde(default)]
    next_link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CloudErrorResponse {
    #[serde(default)]
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct OperationStatus {
    status: String,
    #[serde(default)]
    error: Option<ApiErrorBody>,
}
