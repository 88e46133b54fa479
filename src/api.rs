use async_trait::async_trait;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::ClientError;
use crate::types::{Command, CommandOutcome, StatusSnapshot};

/// Remote side of the dashboard: one read endpoint and the command endpoints.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    async fn status(&self) -> Result<StatusSnapshot, ClientError>;

    async fn send(&self, command: Command) -> Result<CommandOutcome, ClientError>;
}

/// reqwest-backed client for the bot's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpApi {
    http_client: reqwest::Client,
    base_url: Url,
}

impl HttpApi {
    pub fn new(base_url: Url) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url,
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(path)?)
    }

    async fn decode<T: DeserializeOwned>(
        path: &str,
        resp: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            tracing::warn!(path, status = %status, body, "dashboard API HTTP error");
        }

        serde_json::from_str(&body).map_err(|source| ClientError::Decode {
            path: path.to_string(),
            status: status.as_u16(),
            source,
        })
    }
}

#[async_trait]
impl DashboardApi for HttpApi {
    async fn status(&self) -> Result<StatusSnapshot, ClientError> {
        let path = "/api/status";
        let url = self.endpoint(path)?;

        let resp = self.http_client.get(url).send().await?;
        let snapshot: StatusSnapshot = Self::decode(path, resp).await?;

        tracing::debug!(
            running = snapshot.bot_status.running,
            messages = snapshot.messages_processed,
            style = snapshot.current_style,
            "status fetched"
        );
        Ok(snapshot)
    }

    async fn send(&self, command: Command) -> Result<CommandOutcome, ClientError> {
        let path = command.path();
        let url = self.endpoint(path)?;

        let mut req = self
            .http_client
            .post(url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(body) = command.body() {
            req = req.body(body.to_string());
        }

        tracing::info!(%command, path, "sending command");
        let resp = req.send().await?;
        let outcome: CommandOutcome = Self::decode(path, resp).await?;

        if outcome.success {
            tracing::info!(%command, message = ?outcome.message, "command accepted");
        } else {
            tracing::warn!(%command, error = ?outcome.error, "command rejected");
        }
        Ok(outcome)
    }
}
