//! Real backend over HTTP.
//!
//! `POST {baseUrl}/generate` with the JSON request body. The whole exchange,
//! body read included, runs under `settings.timeout_seconds`.

use futures_util::FutureExt;
use nanokey_types::{AppSettings, BackendRequest, BackendResponse};

use crate::health::HEALTH_TIMEOUT;
use crate::{DispatchError, DispatchFuture, Dispatcher, http_client, read_capped_error_body};

#[derive(Debug, Clone)]
pub struct HttpDispatcher {
    client: reqwest::Client,
}

impl HttpDispatcher {
    /// Dispatcher on the shared [`http_client`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_client(http_client().clone())
    }

    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for HttpDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher for HttpDispatcher {
    fn name(&self) -> &'static str {
        "http"
    }

    fn generate(
        &self,
        request: BackendRequest,
        settings: &AppSettings,
    ) -> DispatchFuture<BackendResponse> {
        let client = self.client.clone();
        let url = format!("{}/generate", settings.normalized_base_url());
        let deadline = settings.timeout();

        async move {
            let exchange = async {
                let response = client
                    .post(&url)
                    .json(&request)
                    .send()
                    .await
                    .map_err(|e| {
                        tracing::warn!(%url, error = %e, "Generate request failed");
                        DispatchError::from_transport(&e)
                    })?;

                let status = response.status();
                if !status.is_success() {
                    let body = read_capped_error_body(response).await;
                    tracing::warn!(%url, status = status.as_u16(), %body, "Backend returned an error");
                    return Err(DispatchError::BackendError(status.as_u16()));
                }

                let bytes = response
                    .bytes()
                    .await
                    .map_err(|e| DispatchError::from_transport(&e))?;
                serde_json::from_slice::<BackendResponse>(&bytes).map_err(|e| {
                    tracing::warn!(%url, error = %e, body_bytes = bytes.len(), "Unusable backend response");
                    DispatchError::InvalidResponse
                })
            };

            match tokio::time::timeout(deadline, exchange).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!(%url, timeout_secs = deadline.as_secs(), "Generate request timed out");
                    Err(DispatchError::Timeout)
                }
            }
        }
        .boxed()
    }

    fn health(&self, settings: &AppSettings) -> DispatchFuture<String> {
        let client = self.client.clone();
        let url = format!("{}/health", settings.normalized_base_url());

        async move {
            let probe = async {
                let response = client
                    .get(&url)
                    .send()
                    .await
                    .map_err(|e| DispatchError::from_transport(&e))?;
                let status = response.status();
                if status.is_success() {
                    Ok(match status.canonical_reason() {
                        Some(reason) => format!("{} {reason}", status.as_u16()),
                        None => status.as_u16().to_string(),
                    })
                } else {
                    Err(DispatchError::BackendError(status.as_u16()))
                }
            };

            tokio::time::timeout(HEALTH_TIMEOUT, probe)
                .await
                .unwrap_or(Err(DispatchError::Timeout))
        }
        .boxed()
    }
}
