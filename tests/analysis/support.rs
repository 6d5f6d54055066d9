use std::sync::Mutex;

use serde_json::{Value, json};
use uuid::Uuid;

use bti_assistant::analysis::{
    telemetry::{AnalysisTelemetryEvent, TelemetrySink},
    types::AnalysisConfig,
};

pub const COMPLETION_PATH: &str = "/foundationModels/v1/completion";
pub const TEST_FOLDER: &str = "folder-test";

pub fn config_for(endpoint: String) -> AnalysisConfig {
    AnalysisConfig {
        endpoint,
        folder_id: TEST_FOLDER.to_string(),
        credential_env: format!("BTI_TEST_UNSET_{}", Uuid::now_v7().simple()),
        request_timeout_ms: 2_000,
        ..AnalysisConfig::default()
    }
}

pub fn completion_body(text: &str) -> Value {
    json!({
        "result": {
            "alternatives": [
                {"message": {"role": "assistant", "text": text}, "status": "ALTERNATIVE_STATUS_FINAL"}
            ],
            "usage": {"inputTextTokens": "42", "completionTokens": "17", "totalTokens": "59"},
            "modelVersion": "rc"
        }
    })
}

#[derive(Default)]
pub struct RecordingTelemetrySink {
    events: Mutex<Vec<AnalysisTelemetryEvent>>,
}

impl RecordingTelemetrySink {
    pub fn events(&self) -> Vec<AnalysisTelemetryEvent> {
        self.events.lock().expect("telemetry lock poisoned").clone()
    }
}

impl TelemetrySink for RecordingTelemetrySink {
    fn on_event(&self, event: AnalysisTelemetryEvent) {
        self.events
            .lock()
            .expect("telemetry lock poisoned")
            .push(event);
    }
}
