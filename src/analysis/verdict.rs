use serde_json::{Map, Value};

use crate::analysis::{
    error::{AnalysisError, malformed_output},
    extractor::{balanced_objects, extract_json_object},
    types::Verdict,
};

/// Deserializes an already extracted JSON object. Unknown fields are ignored, absent lists are
/// empty and an absent or empty decision reads as allowed.
pub fn parse_verdict(extracted: &str) -> Result<Verdict, AnalysisError> {
    serde_json::from_str::<Verdict>(extracted)
        .map_err(|err| malformed_output(format!("verdict does not match expected shape: {}", err)))
}

/// Keys a balanced candidate must carry before it is read as a verdict.
const VERDICT_KEYS: [&str; 2] = ["decision", "is_valid"];

/// Extracts and parses a verdict from raw model text.
///
/// The brace cut is tried first; when it fails, each balanced object in the text that names a
/// decision or validity is tried in order. The first error is reported when nothing parses.
pub fn parse_model_output(raw: &str) -> Result<Verdict, AnalysisError> {
    let first_error = match parse_verdict(extract_json_object(raw)) {
        Ok(verdict) => return Ok(verdict),
        Err(err) => err,
    };

    balanced_objects(raw)
        .into_iter()
        .filter(|candidate| looks_like_verdict(candidate))
        .find_map(|candidate| parse_verdict(candidate).ok())
        .ok_or(first_error)
}

fn looks_like_verdict(candidate: &str) -> bool {
    serde_json::from_str::<Map<String, Value>>(candidate)
        .map(|object| VERDICT_KEYS.iter().any(|key| object.contains_key(*key)))
        .unwrap_or(false)
}
