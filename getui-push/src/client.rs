//! GeTui REST client and delivery operations.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use url::Url;

use crate::auth::{self, AuthToken};
use crate::{
    ApiResponse, BatchPushResult, GetuiConfig, PushError, PushList, PushListResult, PushRequest,
    PushResult, Result, ResultCode, ScheduleTaskResult, SimpleResult, StopTaskResult, TaskResult,
};

/// Header carrying the auth token.
const AUTH_HEADER: &str = "authtoken";

/// GeTui REST client.
///
/// Cheap to clone; clones share the connection pool and the auth token.
#[derive(Clone)]
pub struct GetuiClient {
    inner: Arc<Inner>,
}

struct Inner {
    http: Client,
    config: GetuiConfig,
    base_url: Url,
    token: RwLock<AuthToken>,
}

impl GetuiClient {
    /// Create a client and obtain the first auth token.
    pub async fn new(config: GetuiConfig) -> Result<Self> {
        let base_url = config.validate()?;
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| PushError::Config(e.to_string()))?;

        let auth_url = endpoint(&base_url, &config.credentials.app_id, &["auth_sign"])?;
        let token = auth::authenticate(&http, auth_url, &config.credentials).await?;

        Ok(Self {
            inner: Arc::new(Inner {
                http,
                config,
                base_url,
                token: RwLock::new(token),
            }),
        })
    }

    /// Client configuration.
    pub fn config(&self) -> &GetuiConfig {
        &self.inner.config
    }

    /// Current auth token, refreshed first if it is about to expire.
    pub async fn token(&self) -> Result<String> {
        let margin = self.inner.config.token_refresh_margin;
        {
            let token = self.inner.token.read().await;
            if token.is_fresh(margin) {
                return Ok(token.as_str().to_string());
            }
        }

        let mut token = self.inner.token.write().await;
        if !token.is_fresh(margin) {
            debug!("Auth token close to expiry, refreshing");
            *token = self.authenticate().await?;
        }
        Ok(token.as_str().to_string())
    }

    /// Obtain a new auth token unconditionally.
    pub async fn refresh_token(&self) -> Result<()> {
        let mut token = self.inner.token.write().await;
        *token = self.authenticate().await?;
        Ok(())
    }

    async fn authenticate(&self) -> Result<AuthToken> {
        let url = self.url(&["auth_sign"])?;
        auth::authenticate(&self.inner.http, url, &self.inner.config.credentials).await
    }

    fn app_key(&self) -> &str {
        &self.inner.config.credentials.app_key
    }

    fn url(&self, segments: &[&str]) -> Result<Url> {
        endpoint(
            &self.inner.base_url,
            &self.inner.config.credentials.app_id,
            segments,
        )
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let url = self.url(segments)?;
        Ok(self
            .inner
            .http
            .request(method, url)
            .header(CONTENT_TYPE, "application/json"))
    }

    /// Send a GET request.
    pub(crate) async fn get<T>(&self, segments: &[&str]) -> Result<T>
    where
        T: DeserializeOwned + ApiResponse,
    {
        let request = self.request(Method::GET, segments)?;
        self.execute(Method::GET, segments, request).await
    }

    /// Send a POST request with a JSON body.
    pub(crate) async fn post<T, B>(&self, segments: &[&str], body: &B) -> Result<T>
    where
        T: DeserializeOwned + ApiResponse,
        B: Serialize + ?Sized,
    {
        let request = self.request(Method::POST, segments)?.json(body);
        self.execute(Method::POST, segments, request).await
    }

    /// Send a POST request without a body.
    pub(crate) async fn post_empty<T>(&self, segments: &[&str]) -> Result<T>
    where
        T: DeserializeOwned + ApiResponse,
    {
        let request = self.request(Method::POST, segments)?;
        self.execute(Method::POST, segments, request).await
    }

    /// Send a DELETE request, optionally with a JSON body.
    pub(crate) async fn delete<T>(
        &self,
        segments: &[&str],
        body: Option<&serde_json::Value>,
    ) -> Result<T>
    where
        T: DeserializeOwned + ApiResponse,
    {
        let mut request = self.request(Method::DELETE, segments)?;
        if let Some(body) = body {
            request = request.json(body);
        }
        self.execute(Method::DELETE, segments, request).await
    }

    async fn execute<T>(&self, method: Method, segments: &[&str], request: RequestBuilder) -> Result<T>
    where
        T: DeserializeOwned + ApiResponse,
    {
        let operation = segments.first().copied().unwrap_or_default();
        let token = self.token().await?;
        debug!(operation, %method, "Sending GeTui request");

        let response = request.header(AUTH_HEADER, token).send().await?;
        let status = response.status();
        let text = response.text().await?;

        match serde_json::from_str::<T>(&text) {
            Ok(decoded) if status.is_success() => Ok(decoded),
            Ok(decoded) if *decoded.result() != ResultCode::Missing => {
                warn!(operation, status = status.as_u16(), result = %decoded.result(), "GeTui returned an error status");
                Ok(decoded)
            }
            Err(e) if status.is_success() => Err(e.into()),
            _ => {
                warn!(operation, status = status.as_u16(), "GeTui returned an error status");
                Err(PushError::Http {
                    status: status.as_u16(),
                    body: text,
                })
            }
        }
    }

    /// Push to a single cid or alias.
    pub async fn push_single(&self, push: &mut PushRequest) -> Result<PushResult> {
        let body = push.build_body(self.app_key())?;
        self.post(&["push_single"], &body).await
    }

    /// Push several single messages in one call.
    pub async fn push_single_batch(
        &self,
        pushes: &mut [PushRequest],
        need_detail: bool,
    ) -> Result<BatchPushResult> {
        if pushes.is_empty() {
            return Err(PushError::InvalidRequest(
                "push_single_batch needs at least one message".to_string(),
            ));
        }

        let app_key = self.app_key().to_string();
        let msg_list = pushes
            .iter_mut()
            .map(|push| push.build_body(&app_key))
            .collect::<Result<Vec<_>>>()?;

        let body = json!({
            "msg_list": msg_list,
            "need_detail": need_detail,
        });
        self.post(&["push_single_batch"], &body).await
    }

    /// Store a message body for a later `push_list`.
    pub async fn save_list_body(&self, push: &mut PushRequest) -> Result<TaskResult> {
        let body = push.build_body(self.app_key())?;
        self.post(&["save_list_body"], &body).await
    }

    /// Send a stored message body to a list of cids or aliases.
    pub async fn push_list(&self, list: &PushList) -> Result<PushListResult> {
        if list.taskid.is_empty() {
            return Err(PushError::InvalidRequest(
                "push_list needs the task id returned by save_list_body".to_string(),
            ));
        }
        self.post(&["push_list"], list).await
    }

    /// Push to every user of the app, optionally filtered by conditions.
    pub async fn push_app(&self, push: &mut PushRequest) -> Result<TaskResult> {
        let body = push.build_body(self.app_key())?;
        self.post(&["push_app"], &body).await
    }

    /// Stop a running task.
    pub async fn stop_task(&self, task_id: &str) -> Result<StopTaskResult> {
        self.delete(&["stop_task", task_id], None).await
    }

    /// Look up a scheduled task.
    pub async fn get_schedule_task(&self, task_id: &str) -> Result<ScheduleTaskResult> {
        require_task_id("get_schedule_task", task_id)?;
        self.post(&["get_schedule_task"], &json!({ "taskid": task_id }))
            .await
    }

    /// Delete a scheduled task.
    pub async fn del_schedule_task(&self, task_id: &str) -> Result<SimpleResult> {
        require_task_id("del_schedule_task", task_id)?;
        self.post(&["del_schedule_task"], &json!({ "taskid": task_id }))
            .await
    }
}

fn require_task_id(operation: &str, task_id: &str) -> Result<()> {
    if task_id.is_empty() {
        return Err(PushError::InvalidRequest(format!("{} needs a task id", operation)));
    }
    Ok(())
}

impl std::fmt::Debug for GetuiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GetuiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("app_id", &self.inner.config.credentials.app_id)
            .finish()
    }
}

/// `{base}/{app_id}/{segments...}`, with each segment percent-encoded.
///
/// Path parameters after the operation name must not be empty.
fn endpoint(base: &Url, app_id: &str, segments: &[&str]) -> Result<Url> {
    if let Some((operation, params)) = segments.split_first()
        && params.iter().any(|p| p.is_empty())
    {
        return Err(PushError::InvalidRequest(format!(
            "{} needs a non-empty path parameter",
            operation
        )));
    }

    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| PushError::Config(format!("base URL cannot be a base: {}", base)))?
        .pop_if_empty()
        .push(app_id)
        .extend(segments);
    Ok(url)
}
