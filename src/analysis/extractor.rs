//! Recovery of a JSON object embedded in model output.
//!
//! The primary path is a plain first-`{` / last-`}` cut. It is not JSON-aware: prose with stray
//! braces before the real object defeats it. [`balanced_objects`] is the stricter scan tried
//! when that cut does not deserialize.

const FENCE_OPEN: &str = "```json";
const FENCE_CLOSE: &str = "```";

/// Trims whitespace, drops a leading ```` ```json ```` and a trailing ```` ``` ````, then cuts
/// from the first `{` to the last `}` inclusive. Without such a pair the stripped text is
/// returned unchanged.
pub fn extract_json_object(raw: &str) -> &str {
    let text = strip_fences(raw);

    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if end > start => &text[start..=end],
        _ => text,
    }
}

fn strip_fences(raw: &str) -> &str {
    let text = raw.trim();
    let text = text.strip_prefix(FENCE_OPEN).unwrap_or(text);
    let text = text.strip_suffix(FENCE_CLOSE).unwrap_or(text);
    text.trim()
}

/// Every top-level balanced `{...}` span in `raw`, in order of appearance. Braces inside string
/// literals are skipped and backslash escapes are honoured. An unterminated trailing object is
/// dropped.
pub fn balanced_objects(raw: &str) -> Vec<&str> {
    let mut objects = Vec::new();
    let mut depth = 0usize;
    let mut start = None;
    let mut in_string = false;
    let mut escaped = false;

    for (index, ch) in raw.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' if depth > 0 => in_string = true,
            '{' => {
                if depth == 0 {
                    start = Some(index);
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0
                    && let Some(begin) = start.take()
                {
                    objects.push(&raw[begin..=index]);
                }
            }
            _ => {}
        }
    }

    objects
}
