//! HTTP client for the collector admin API.
//!
//! Every admin endpoint sits behind a session login, so the underlying
//! reqwest client keeps a cookie store. Requests that are bounced to the
//! login page surface as [`ClientError::Unauthorized`].

mod error;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::Url;

pub use error::ClientError;

use crate::config::Settings;
use crate::models::{
    ActionResponse, BatchCreateResponse, CollectorStatus, ResponseStatus, TaskList,
    TaskListResponse, TaskRequest,
};
use crate::submit::{BatchError, BatchReceipt, TaskSink};

/// Default user agent.
pub const USER_AGENT: &str = concat!("collector-admin/", env!("CARGO_PKG_VERSION"));

/// Allowed collector request interval, in seconds.
pub const INTERVAL_RANGE: std::ops::RangeInclusive<u32> = 1..=3600;

const LOGIN_PATH: &str = "admin/login";
const PANEL_PATH: &str = "admin/panel";

/// Typed client for the admin REST endpoints.
#[derive(Clone)]
pub struct AdminClient {
    client: Client,
    base_url: Url,
    credentials: Option<(String, String)>,
}

/// Builder for [`AdminClient`].
pub struct AdminClientBuilder {
    base_url: Url,
    timeout: Duration,
    credentials: Option<(String, String)>,
}

impl AdminClientBuilder {
    /// Set the admin login used by [`AdminClient::login`].
    pub fn credentials(mut self, username: &str, password: &str) -> Self {
        self.credentials = Some((username.to_string(), password.to_string()));
        self
    }

    pub fn build(self) -> Result<AdminClient, ClientError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(self.timeout)
            .cookie_store(true)
            .gzip(true)
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;

        Ok(AdminClient {
            client,
            base_url: self.base_url,
            credentials: self.credentials,
        })
    }
}

impl AdminClient {
    /// Create a builder. `base_url` should end in `/`.
    pub fn builder(base_url: Url, timeout: Duration) -> AdminClientBuilder {
        AdminClientBuilder {
            base_url,
            timeout,
            credentials: None,
        }
    }

    /// Build a client from resolved settings.
    pub fn from_settings(settings: &Settings) -> Result<Self, ClientError> {
        let mut builder = Self::builder(settings.base_url.clone(), settings.timeout());
        if let (Some(user), Some(pass)) = (&settings.username, &settings.password) {
            builder = builder.credentials(user, pass);
        }
        builder.build()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(path)?)
    }

    /// Log in with the configured credentials.
    ///
    /// The backend answers a good login with a redirect to the panel and a
    /// bad one by re-rendering the login form.
    pub async fn login(&self) -> Result<(), ClientError> {
        let (username, password) = self
            .credentials
            .as_ref()
            .ok_or_else(|| ClientError::LoginFailed("no credentials configured".to_string()))?;

        let url = self.endpoint(LOGIN_PATH)?;
        debug!("POST {}", url);
        let response = self
            .client
            .post(url)
            .form(&[("username", username.as_str()), ("password", password.as_str())])
            .send()
            .await?;

        if response.url().path().ends_with(PANEL_PATH) {
            debug!("Logged in as {}", username);
            Ok(())
        } else {
            Err(ClientError::LoginFailed(
                "invalid username or password".to_string(),
            ))
        }
    }

    /// Create up to one batch of tasks in a single request.
    pub async fn batch_create(
        &self,
        tasks: &[TaskRequest],
    ) -> Result<BatchCreateResponse, ClientError> {
        #[derive(Serialize)]
        struct Body<'a> {
            tasks: &'a [TaskRequest],
        }

        let url = self.endpoint("admin/task/batch_create")?;
        debug!("POST {} ({} tasks)", url, tasks.len());
        let response = self
            .client
            .post(url)
            .header("X-Requested-With", "XMLHttpRequest")
            .json(&Body { tasks })
            .send()
            .await?;

        // Failed tasks come back with a 500, so the body is read either way.
        let (status, value) = read_body(response).await?;
        let body: BatchCreateResponse =
            serde_json::from_value(value).map_err(|e| ClientError::Malformed {
                status: status.as_u16(),
                message: e.to_string(),
            })?;
        if status.is_success() && body.is_success() {
            Ok(body)
        } else {
            Err(ClientError::Rejected(body.error_message()))
        }
    }

    /// Create a single task.
    pub async fn create_task(&self, task: TaskRequest) -> Result<(), ClientError> {
        let body: ActionResponse = self.post_json("admin/task/create", &task).await?;
        expect_success(body, "create failed")
    }

    /// Start (`true`) or stop (`false`) the collector.
    pub async fn toggle_collector(&self, running: bool) -> Result<ActionResponse, ClientError> {
        let body: ActionResponse = self
            .post_json(
                "admin/collector/toggle",
                &serde_json::json!({ "is_running": running }),
            )
            .await?;
        if body.status == Some(ResponseStatus::Error) {
            let default = if running { "start failed" } else { "stop failed" };
            return Err(ClientError::Rejected(
                body.message.unwrap_or_else(|| default.to_string()),
            ));
        }
        Ok(body)
    }

    /// Current collector state.
    pub async fn status(&self) -> Result<CollectorStatus, ClientError> {
        let url = self.endpoint("admin/collector/status")?;
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        read_json(response).await
    }

    /// Change the delay between collector requests. Rejected locally when
    /// outside [`INTERVAL_RANGE`].
    pub async fn update_interval(&self, seconds: u32) -> Result<(), ClientError> {
        if !INTERVAL_RANGE.contains(&seconds) {
            return Err(ClientError::InvalidInterval(seconds));
        }
        let body: ActionResponse = self
            .post_json(
                "admin/collector/update_interval",
                &serde_json::json!({ "request_interval": seconds }),
            )
            .await?;
        expect_success(body, "update failed")
    }

    /// Task table with per-table statistics.
    pub async fn tasks(&self) -> Result<TaskList, ClientError> {
        let url = self.endpoint("admin/collector/tasks")?;
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body: TaskListResponse = read_json(response).await?;

        if body.code != 0 {
            return Err(ClientError::Rejected(
                body.msg
                    .unwrap_or_else(|| format!("task list returned code {}", body.code)),
            ));
        }
        body.data.ok_or_else(|| ClientError::Malformed {
            status,
            message: "missing data".to_string(),
        })
    }

    /// Delete one task by id.
    pub async fn delete_task(&self, id: i64) -> Result<(), ClientError> {
        let body: ActionResponse = self
            .post_json("admin/task/delete", &serde_json::json!({ "id": id }))
            .await?;
        expect_success(body, "delete failed")
    }

    /// Delete every task. The backend refuses while the collector runs.
    pub async fn delete_all_tasks(&self) -> Result<(), ClientError> {
        let url = self.endpoint("admin/task/delete_all")?;
        debug!("POST {}", url);
        let response = self
            .client
            .post(url)
            .json(&serde_json::json!({}))
            .send()
            .await?;
        let body: ActionResponse = read_json(response).await?;
        expect_success(body, "delete failed")
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        debug!("POST {}", url);
        let response = self.client.post(url).json(body).send().await?;
        read_json(response).await
    }
}

#[async_trait]
impl TaskSink for AdminClient {
    async fn submit_batch(&self, tasks: &[TaskRequest]) -> Result<BatchReceipt, BatchError> {
        match self.batch_create(tasks).await {
            Ok(body) => Ok(BatchReceipt {
                created: body.created_count.unwrap_or(tasks.len()),
            }),
            Err(e) => Err(BatchError::new(e.failure_kind(), e.to_string())),
        }
    }
}

/// Read a JSON body of any HTTP status, classifying login bounces and garbage.
async fn read_body(response: Response) -> Result<(StatusCode, serde_json::Value), ClientError> {
    if response.url().path().ends_with(LOGIN_PATH) {
        return Err(ClientError::Unauthorized);
    }

    let status = response.status();
    let text = response.text().await?;

    let value = serde_json::from_str(&text).map_err(|e| ClientError::Malformed {
        status: status.as_u16(),
        message: format!("body is not JSON: {}", e),
    })?;
    Ok((status, value))
}

/// Read a JSON body, turning non-2xx answers into [`ClientError::Rejected`].
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let (status, value) = read_body(response).await?;

    if !status.is_success() {
        let message = value
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {}", status));
        return Err(ClientError::Rejected(message));
    }

    serde_json::from_value(value).map_err(|e| ClientError::Malformed {
        status: status.as_u16(),
        message: e.to_string(),
    })
}

fn expect_success(body: ActionResponse, default_message: &str) -> Result<(), ClientError> {
    if body.is_success() {
        Ok(())
    } else {
        Err(ClientError::Rejected(
            body.message
                .unwrap_or_else(|| default_message.to_string()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submit::FailureKind;

    #[test]
    fn test_expect_success_uses_default_message() {
        let err = expect_success(ActionResponse::default(), "delete failed").unwrap_err();
        assert_eq!(err.to_string(), "delete failed");

        let ok = ActionResponse {
            status: Some(ResponseStatus::Success),
            message: None,
        };
        assert!(expect_success(ok, "unused").is_ok());
    }

    #[test]
    fn test_failure_kinds() {
        assert_eq!(
            ClientError::Rejected("dup".into()).failure_kind(),
            FailureKind::Rejected
        );
        assert_eq!(
            ClientError::Transport("refused".into()).failure_kind(),
            FailureKind::Transport
        );
        assert_eq!(
            ClientError::Malformed {
                status: 502,
                message: "html".into()
            }
            .failure_kind(),
            FailureKind::Malformed
        );
        assert_eq!(
            ClientError::Unauthorized.failure_kind(),
            FailureKind::Unauthorized
        );
    }

    #[tokio::test]
    async fn test_interval_checked_before_request() {
        // Port 9 (discard) is never contacted: validation fails first.
        let client = AdminClient::builder(
            Url::parse("http://127.0.0.1:9/").unwrap(),
            Duration::from_secs(1),
        )
        .build()
        .unwrap();

        assert!(matches!(
            client.update_interval(0).await,
            Err(ClientError::InvalidInterval(0))
        ));
        assert!(matches!(
            client.update_interval(3601).await,
            Err(ClientError::InvalidInterval(3601))
        ));
    }

    #[tokio::test]
    async fn test_login_requires_credentials() {
        let client = AdminClient::builder(
            Url::parse("http://127.0.0.1:9/").unwrap(),
            Duration::from_secs(1),
        )
        .build()
        .unwrap();

        assert!(matches!(
            client.login().await,
            Err(ClientError::LoginFailed(_))
        ));
    }
}
