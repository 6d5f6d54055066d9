use crate::analysis::types::{Decision, Verdict};

const FORBIDDING_ROOTS: [&str; 4] = ["нельзя", "запрещ", "противоречит", "не допуска"];
const CONDITIONAL_ROOTS: [&str; 2] = ["услови", "ограничен"];
const JUSTIFICATION_LABELS: [&str; 2] = ["обоснование", "justification"];

/// Best-effort verdict from arbitrary text. Total: never fails, always fully populated.
///
/// Starts from [`Verdict::pending`], then applies keyword roots case-insensitively. A
/// conditional match leaves `is_valid` false.
pub fn synthesize(raw: &str) -> Verdict {
    let mut verdict = Verdict::pending();
    let lowered = raw.to_lowercase();

    if contains_any(&lowered, &FORBIDDING_ROOTS) {
        verdict.is_valid = false;
        verdict.decision = Decision::Forbidden;
    } else if contains_any(&lowered, &CONDITIONAL_ROOTS) {
        verdict.decision = Decision::AllowedWithConditions;
    }

    if let Some(justification) = labelled_justification(raw) {
        verdict.justification = justification;
    }

    verdict
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

// Last labelled line wins; the value is the segment between the first and second colon.
fn labelled_justification(raw: &str) -> Option<String> {
    raw.lines()
        .filter(|line| contains_any(&line.to_lowercase(), &JUSTIFICATION_LABELS))
        .filter_map(|line| line.split(':').nth(1))
        .map(|value| value.trim().to_string())
        .last()
}
