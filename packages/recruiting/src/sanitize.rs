//! Input hardening applied before any model call.
//!
//! This is a best-effort pass that reduces prompt-injection and
//! XSS-via-echo surface, not a security boundary on its own. Oversized
//! or empty input is rejected outright; script-like markup is stripped.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{PipelineError, Result};

/// Maximum accepted input size, in characters.
pub const MAX_INPUT_LEN: usize = 50_000;

static SCRIPT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script[^>]*>.*?</script>").unwrap());
static JS_SCHEME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)javascript:").unwrap());
static EVENT_HANDLER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bon\w+\s*=").unwrap());

/// Sanitize raw document text.
///
/// Fails with [`PipelineError::InvalidInput`] when the input is empty,
/// whitespace-only, or longer than [`MAX_INPUT_LEN`] characters. On
/// success, strips `<script>` blocks, `javascript:` scheme references,
/// and inline event-handler patterns, then trims whitespace.
pub fn sanitize(text: &str) -> Result<String> {
    if text.trim().is_empty() {
        return Err(PipelineError::invalid_input(
            "input must be a non-empty string",
        ));
    }

    let char_count = text.chars().count();
    if char_count > MAX_INPUT_LEN {
        return Err(PipelineError::invalid_input(format!(
            "input text too large: {char_count} characters (max {MAX_INPUT_LEN})"
        )));
    }

    let cleaned = SCRIPT_BLOCK.replace_all(text, "");
    let cleaned = JS_SCHEME.replace_all(&cleaned, "");
    let cleaned = EVENT_HANDLER.replace_all(&cleaned, "");

    Ok(cleaned.trim().to_string())
}
