//! Lenient recovery of structured payloads from unreliable model text.
//!
//! The last line of defense between a text-generating upstream and a
//! strict downstream consumer: given output that may be wrapped in
//! commentary or code fences, use trailing commas, single quotes, or
//! unquoted keys, recover a JSON value or return `None`. Never panics.

use serde_json::Value;

/// Recover a structured object from possibly malformed model text.
///
/// Strips code fences, slices the outermost balanced `{…}`/`[…]`
/// region, and parses it; when strict parsing fails, lenient deviations
/// are normalized away and the parse retried. Returns `None` when no
/// bracketed region is found or the lenient parse still fails.
pub fn recover_structured_payload(raw: &str) -> Option<Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let candidate = strip_code_fence(trimmed).unwrap_or(trimmed);
    let sliced = slice_outermost(candidate)?;

    if let Ok(value) = serde_json::from_str(sliced) {
        return Some(value);
    }

    let normalized = normalize_lenient(sliced);
    match serde_json::from_str(&normalized) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(error = %e, "payload recovery failed");
            None
        }
    }
}

/// Pull the content out of a ```json / ``` fenced block, if any.
fn strip_code_fence(text: &str) -> Option<&str> {
    if let Some(start) = text.find("```json") {
        let after = &text[start + 7..];
        if let Some(end) = after.find("```") {
            return Some(after[..end].trim());
        }
    }

    if let Some(start) = text.find("```") {
        let after = &text[start + 3..];
        if let Some(end) = after.find("```") {
            let block = after[..end].trim();
            if block.starts_with('{') || block.starts_with('[') {
                return Some(block);
            }
        }
    }

    None
}

/// Slice from the first opening brace/bracket to the last matching
/// closer, whichever pairing is outermost.
fn slice_outermost(text: &str) -> Option<&str> {
    let (start, close) = match (text.find('{'), text.find('[')) {
        (Some(obj), Some(arr)) if obj < arr => (obj, '}'),
        (Some(_), Some(arr)) => (arr, ']'),
        (Some(obj), None) => (obj, '}'),
        (None, Some(arr)) => (arr, ']'),
        (None, None) => return None,
    };

    let end = text.rfind(close)?;
    if end <= start {
        return None;
    }
    Some(&text[start..=end])
}

/// Rewrite lenient JSON deviations into strict JSON: single-quoted
/// strings, unquoted keys, and trailing commas. Content inside
/// double-quoted strings is copied verbatim.
fn normalize_lenient(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len() + 16);
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '"' => {
                out.push('"');
                i += 1;
                while i < chars.len() {
                    let c = chars[i];
                    if c == '\\' && i + 1 < chars.len() {
                        out.push(c);
                        out.push(chars[i + 1]);
                        i += 2;
                        continue;
                    }
                    out.push(c);
                    i += 1;
                    if c == '"' {
                        break;
                    }
                }
            }
            '\'' => {
                out.push('"');
                i += 1;
                while i < chars.len() {
                    let c = chars[i];
                    if c == '\\' && i + 1 < chars.len() {
                        let next = chars[i + 1];
                        if next == '\'' {
                            out.push('\'');
                        } else {
                            out.push('\\');
                            out.push(next);
                        }
                        i += 2;
                        continue;
                    }
                    if c == '\'' {
                        i += 1;
                        break;
                    }
                    if c == '"' {
                        out.push('\\');
                    }
                    out.push(c);
                    i += 1;
                }
                out.push('"');
            }
            ',' => {
                let mut j = i + 1;
                while j < chars.len() && chars[j].is_whitespace() {
                    j += 1;
                }
                // Trailing comma before a closer: drop it.
                if j < chars.len() && (chars[j] == '}' || chars[j] == ']') {
                    i += 1;
                } else {
                    out.push(',');
                    i += 1;
                }
            }
            c if c.is_alphabetic() || c == '_' || c == '$' => {
                let start = i;
                while i < chars.len()
                    && (chars[i].is_alphanumeric() || chars[i] == '_' || chars[i] == '$')
                {
                    i += 1;
                }
                let ident: String = chars[start..i].iter().collect();

                let mut j = i;
                while j < chars.len() && chars[j].is_whitespace() {
                    j += 1;
                }
                // A bare identifier followed by ':' is an unquoted key.
                if j < chars.len() && chars[j] == ':' {
                    out.push('"');
                    out.push_str(&ident);
                    out.push('"');
                } else {
                    out.push_str(&ident);
                }
            }
            c => {
                out.push(c);
                i += 1;
            }
        }
    }

    out
}
