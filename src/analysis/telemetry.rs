use crate::analysis::{error::AnalysisErrorKind, types::RequestId};

/// Which path produced the returned verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerdictSource {
    Model,
    FallbackFromQuestion,
    FallbackFromResponse,
}

impl VerdictSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerdictSource::Model => "model",
            VerdictSource::FallbackFromQuestion => "fallback_from_question",
            VerdictSource::FallbackFromResponse => "fallback_from_response",
        }
    }
}

#[derive(Debug, Clone)]
pub enum AnalysisTelemetryEvent {
    Started {
        request_id: RequestId,
        question_chars: usize,
        truncated: bool,
    },
    TransportFailed {
        request_id: RequestId,
        kind: AnalysisErrorKind,
        http_status: Option<u16>,
    },
    ParseFailed {
        request_id: RequestId,
        response_chars: usize,
    },
    Completed {
        request_id: RequestId,
        source: VerdictSource,
        decision: String,
        is_valid: bool,
    },
}

pub trait TelemetrySink: Send + Sync {
    fn on_event(&self, event: AnalysisTelemetryEvent);
}

#[derive(Default)]
pub struct NoopTelemetrySink;

impl TelemetrySink for NoopTelemetrySink {
    fn on_event(&self, _event: AnalysisTelemetryEvent) {}
}

#[derive(Default)]
pub struct TracingTelemetrySink;

impl TelemetrySink for TracingTelemetrySink {
    fn on_event(&self, event: AnalysisTelemetryEvent) {
        match event {
            AnalysisTelemetryEvent::Started {
                request_id,
                question_chars,
                truncated,
            } => {
                tracing::info!(
                    target: "analysis",
                    request_id = %request_id,
                    question_chars,
                    truncated,
                    "analysis_started"
                );
            }
            AnalysisTelemetryEvent::TransportFailed {
                request_id,
                kind,
                http_status,
            } => {
                tracing::warn!(
                    target: "analysis",
                    request_id = %request_id,
                    kind = ?kind,
                    http_status = ?http_status,
                    "transport_failed_fallback"
                );
            }
            AnalysisTelemetryEvent::ParseFailed {
                request_id,
                response_chars,
            } => {
                tracing::warn!(
                    target: "analysis",
                    request_id = %request_id,
                    response_chars,
                    "verdict_parse_failed_fallback"
                );
            }
            AnalysisTelemetryEvent::Completed {
                request_id,
                source,
                decision,
                is_valid,
            } => {
                tracing::info!(
                    target: "analysis",
                    request_id = %request_id,
                    source = source.as_str(),
                    decision = %decision,
                    is_valid,
                    "analysis_completed"
                );
            }
        }
    }
}
