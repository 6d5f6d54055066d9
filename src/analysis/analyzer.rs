use std::sync::Arc;

use uuid::Uuid;

use crate::analysis::{
    credentials::{CredentialProvider, EnvCredentialProvider, StaticCredentialProvider},
    error::AnalysisError,
    fallback,
    prompt::{build_request, truncate_question},
    telemetry::{AnalysisTelemetryEvent, TelemetrySink, VerdictSource},
    transport::CompletionTransport,
    types::{AnalysisConfig, CompletionRequest, RequestId, Verdict},
    verdict::parse_model_output,
};

/// Raw provider text longer than this is cut before it reaches debug logs.
const LOGGED_RESPONSE_CHARS: usize = 2_000;

#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub request_id: RequestId,
    pub verdict: Verdict,
    pub source: VerdictSource,
}

/// Turns a free-text renovation question into a [`Verdict`].
///
/// Every entry point is total: transport, credential and parse failures are absorbed into a
/// fallback verdict. A single provider call is made per analysis.
pub struct Analyzer {
    config: AnalysisConfig,
    transport: CompletionTransport,
    default_credentials: Arc<dyn CredentialProvider>,
    telemetry: Arc<dyn TelemetrySink>,
}

impl Analyzer {
    pub fn new(
        config: AnalysisConfig,
        telemetry: Arc<dyn TelemetrySink>,
    ) -> Result<Self, AnalysisError> {
        let transport = CompletionTransport::new(&config)?;
        let default_credentials = Arc::new(EnvCredentialProvider::new(&config.credential_env));

        Ok(Self {
            config,
            transport,
            default_credentials,
            telemetry,
        })
    }

    /// Replaces the provider used by [`Analyzer::analyze`].
    pub fn with_default_credentials(mut self, provider: Arc<dyn CredentialProvider>) -> Self {
        self.default_credentials = provider;
        self
    }

    pub async fn analyze(&self, question: &str) -> Verdict {
        self.analyze_with(question, self.default_credentials.as_ref())
            .await
            .verdict
    }

    pub async fn analyze_with_key(&self, question: &str, key: &str) -> Verdict {
        self.analyze_with(question, &StaticCredentialProvider::new(key))
            .await
            .verdict
    }

    pub fn build_request(&self, question: &str) -> CompletionRequest {
        build_request(&self.config, question)
    }

    pub async fn analyze_with(
        &self,
        question: &str,
        credentials: &dyn CredentialProvider,
    ) -> AnalysisOutcome {
        let request_id = Uuid::now_v7().to_string();
        let bounded = truncate_question(question, self.config.max_question_chars);
        let request = build_request(&self.config, bounded);

        self.telemetry.on_event(AnalysisTelemetryEvent::Started {
            request_id: request_id.clone(),
            question_chars: bounded.chars().count(),
            truncated: bounded.len() < question.len(),
        });

        let (verdict, source) = match self.transport.send(&request, credentials).await {
            Err(err) => {
                tracing::debug!(
                    target: "analysis",
                    request_id = %request_id,
                    error = %err,
                    "transport_error_detail"
                );
                self.telemetry.on_event(AnalysisTelemetryEvent::TransportFailed {
                    request_id: request_id.clone(),
                    kind: err.kind,
                    http_status: err.http_status,
                });
                (
                    fallback::synthesize(bounded),
                    VerdictSource::FallbackFromQuestion,
                )
            }
            Ok(raw) => match parse_model_output(&raw) {
                Ok(verdict) => (verdict, VerdictSource::Model),
                Err(err) => {
                    let preview: String = raw.chars().take(LOGGED_RESPONSE_CHARS).collect();
                    tracing::debug!(
                        target: "analysis",
                        request_id = %request_id,
                        error = %err,
                        raw = %preview,
                        "verdict_parse_error_detail"
                    );
                    self.telemetry.on_event(AnalysisTelemetryEvent::ParseFailed {
                        request_id: request_id.clone(),
                        response_chars: raw.chars().count(),
                    });
                    (
                        fallback::synthesize(&raw),
                        VerdictSource::FallbackFromResponse,
                    )
                }
            },
        };

        self.telemetry.on_event(AnalysisTelemetryEvent::Completed {
            request_id: request_id.clone(),
            source,
            decision: verdict.decision.to_string(),
            is_valid: verdict.is_valid,
        });

        AnalysisOutcome {
            request_id,
            verdict,
            source,
        }
    }
}
