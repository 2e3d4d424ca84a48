//! Best-effort payload extraction from free-form model output.
//!
//! The prompt instructs the model to emit exactly one fenced block, but in
//! practice it sometimes returns a bare array or wraps the payload in
//! conversational prose. The ordered fallback below is a deliberate
//! permissiveness contract: fence first, then the outermost bracketed array,
//! then the raw text. Callers rely on this ordering.

/// Total function: always returns a candidate substring, never fails.
pub fn extract_payload(raw: &str) -> &str {
    if let Some(inner) = fenced_block(raw) {
        return inner;
    }
    if let Some(array) = bracketed_array(raw) {
        return array;
    }
    raw.trim()
}

/// Trimmed interior of the first ``` fenced block, optionally tagged `json`.
/// Requires a closing fence; an unterminated opener is not a block.
fn fenced_block(raw: &str) -> Option<&str> {
    let open = raw.find("```")?;
    let mut rest = &raw[open + 3..];
    if let Some(tagged) = rest.strip_prefix("json") {
        rest = tagged;
    }
    let close = rest.find("```")?;
    Some(rest[..close].trim())
}

/// Substring from the first `[` through the final `]`, when both exist in
/// that order.
fn bracketed_array(raw: &str) -> Option<&str> {
    let start = raw.find('[')?;
    let end = raw.rfind(']')?;
    if end > start {
        Some(raw[start..=end].trim())
    } else {
        None
    }
}
