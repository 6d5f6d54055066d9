use std::time::Duration;

use reqwest::{Client, StatusCode, header};

use crate::analysis::{
    credentials::CredentialProvider,
    error::{
        AnalysisError, AnalysisErrorKind, empty_response, encoding_error, remote_error,
        transport_error,
    },
    types::{AnalysisConfig, CompletionEnvelope, CompletionRequest},
};

pub const FOLDER_ID_HEADER: &str = "x-folder-id";

/// HTTP exchange with the completion provider. One POST per call, no retries.
#[derive(Clone)]
pub struct CompletionTransport {
    client: Client,
    endpoint: String,
    folder_id: String,
    timeout: Duration,
}

impl CompletionTransport {
    pub fn new(config: &AnalysisConfig) -> Result<Self, AnalysisError> {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(30))
            .build()
            .map_err(|err| transport_error(format!("failed to build http client: {}", err)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            folder_id: config.folder_id.clone(),
            timeout: config.request_timeout(),
        })
    }

    /// Sends `request` and returns the text of the first alternative.
    pub async fn send(
        &self,
        request: &CompletionRequest,
        credentials: &dyn CredentialProvider,
    ) -> Result<String, AnalysisError> {
        let credential = credentials.resolve().await?;
        let body = serde_json::to_vec(request)
            .map_err(|err| encoding_error(format!("failed to encode completion request: {}", err)))?;

        let response = self
            .client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, credential.auth_header())
            .header(FOLDER_ID_HEADER, &self.folder_id)
            .body(body)
            .send()
            .await
            .map_err(|err| self.classify_send_error(err))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| self.classify_body_error(status, err))?;

        if !status.is_success() {
            return Err(remote_error(status.as_u16(), &text));
        }

        let envelope: CompletionEnvelope = serde_json::from_str(&text).map_err(|err| {
            transport_error(format!("failed to decode completion response: {}", err))
        })?;

        envelope.into_first_text().ok_or_else(empty_response)
    }

    fn classify_send_error(&self, err: reqwest::Error) -> AnalysisError {
        if err.is_timeout() {
            return transport_error(format!(
                "completion request timed out after {} ms: {}",
                self.timeout.as_millis(),
                err
            ));
        }
        transport_error(format!("completion request failed: {}", err))
    }

    /// A body that breaks off after a rejecting status is still the provider's rejection.
    fn classify_body_error(&self, status: StatusCode, err: reqwest::Error) -> AnalysisError {
        let err = self.classify_send_error(err).with_http_status(status.as_u16());
        if status.is_success() {
            return err;
        }
        AnalysisError {
            kind: AnalysisErrorKind::Remote,
            ..err
        }
    }
}
