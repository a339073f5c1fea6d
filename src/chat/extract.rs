//! Turns raw generated text into a typed edit payload.
//!
//! Model replies arrive noisy: markdown fences, "Here's your new bio:"
//! preambles, half-formed JSON. Extraction is an ordered chain of pure
//! `&str -> Option<_>` passes, short-circuiting on the first success.
//! Exhausting the chain is a normal negative result, not an error.

use serde_json::Value;

use crate::portfolio::ScalarField;

/// Maximum characters kept per scalar kind.
const MAX_HEADLINE_CHARS: usize = 100;
const MAX_TITLE_CHARS: usize = 200;
const MAX_BIO_CHARS: usize = 500;

/// Minimum paragraph length considered real bio content rather than a
/// boilerplate lead-in line.
const MIN_BIO_PARAGRAPH_CHARS: usize = 50;

/// What the extractor should look for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Bio,
    Headline,
    Title,
    Item,
}

impl From<ScalarField> for PayloadKind {
    fn from(field: ScalarField) -> Self {
        match field {
            ScalarField::Bio => PayloadKind::Bio,
            ScalarField::Headline => PayloadKind::Headline,
            ScalarField::Title => PayloadKind::Title,
        }
    }
}

/// Typed content pulled from raw generated text.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractedPayload {
    Scalar(String),
    Item { title: String, description: String },
}

/// Runs the extraction chain for the requested kind.
///
/// Items go through three passes (fenced JSON, loose JSON scan,
/// key-pattern assembly); scalars get the cleanup pass. `None` means no
/// usable payload was found anywhere.
pub fn extract(raw: &str, kind: PayloadKind) -> Option<ExtractedPayload> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match kind {
        PayloadKind::Item => fenced_json_item(raw)
            .or_else(|| loose_json_item(raw))
            .or_else(|| key_pattern_item(raw)),
        PayloadKind::Bio | PayloadKind::Headline | PayloadKind::Title => {
            Some(ExtractedPayload::Scalar(scalar_cleanup(raw, kind)))
        }
    }
}

/// Pass 1: a ```json fenced block containing a brace-delimited object.
fn fenced_json_item(raw: &str) -> Option<ExtractedPayload> {
    let fence = raw.find("```json")?;
    let body = &raw[fence + "```json".len()..];
    let close = body.find("```")?;
    let block = &body[..close];
    let start = block.find('{')?;
    let end = block.rfind('}')?;
    if end < start {
        return None;
    }
    parse_item_object(&block[start..=end])
}

/// Pass 2: the first flat `{...}` span (no nested braces) that mentions
/// a `"title"` key, anywhere in the text. One parse attempt only.
fn loose_json_item(raw: &str) -> Option<ExtractedPayload> {
    let bytes = raw.as_bytes();
    let mut open = None;
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'{' => open = Some(i),
            b'}' => {
                if let Some(start) = open.take() {
                    let span = &raw[start..=i];
                    if span.contains("\"title\"") {
                        return parse_item_object(span);
                    }
                }
            }
            _ => {}
        }
    }
    None
}

/// Pass 3: assemble an item from `title: ...` / `description: ...`
/// fragments. A title fragment is required; the description defaults to
/// empty and is capped at 500 characters.
fn key_pattern_item(raw: &str) -> Option<ExtractedPayload> {
    let title = key_fragment(raw, "title")?;
    let description = key_fragment(raw, "description")
        .map(|text| truncate_chars(&text, MAX_BIO_CHARS))
        .unwrap_or_default();
    Some(ExtractedPayload::Item { title, description })
}

fn parse_item_object(block: &str) -> Option<ExtractedPayload> {
    let value: Value = serde_json::from_str(block).ok()?;
    let object = value.as_object()?;
    let title = object
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim()
        .to_string();
    let description = object
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim()
        .to_string();
    Some(ExtractedPayload::Item { title, description })
}

/// Finds a `key: value` style fragment, case-insensitive, tolerating
/// quotes and whitespace around the separator. The value runs to the
/// next quote or end of line.
fn key_fragment(raw: &str, key: &str) -> Option<String> {
    let lower = raw.to_ascii_lowercase();
    let mut from = 0;
    while let Some(rel) = lower[from..].find(key) {
        let after = from + rel + key.len();
        let tail = &raw[after..];
        let separator: usize = tail
            .chars()
            .take_while(|c| *c == '"' || *c == ':' || c.is_whitespace())
            .map(char::len_utf8)
            .sum();
        from = after;
        if separator == 0 {
            continue;
        }
        let value = &tail[separator..];
        let end = value.find(['"', '\n']).unwrap_or(value.len());
        let fragment = value[..end].trim();
        if !fragment.is_empty() {
            return Some(fragment.to_string());
        }
    }
    None
}

/// Pass 4: scalar cleanup. Strips a boilerplate preamble and one quote
/// layer, then shapes the remainder per kind: bio loses markdown
/// markers and prefers the first substantial paragraph, headline and
/// title keep their first line only. Every result is capped per kind.
fn scalar_cleanup(raw: &str, kind: PayloadKind) -> String {
    let text = strip_boilerplate_prefix(raw);
    let text = strip_quote_layer(text);
    match kind {
        PayloadKind::Bio => {
            let cleaned: String = text
                .chars()
                .filter(|c| *c != '*' && *c != '#')
                .collect();
            let cleaned = cleaned.trim();
            let paragraph = cleaned
                .split("\n\n")
                .map(str::trim)
                .find(|p| p.chars().count() > MIN_BIO_PARAGRAPH_CHARS)
                .unwrap_or(cleaned);
            truncate_chars(paragraph, MAX_BIO_CHARS)
        }
        PayloadKind::Headline => truncate_chars(first_line(text), MAX_HEADLINE_CHARS),
        PayloadKind::Title => truncate_chars(first_line(text), MAX_TITLE_CHARS),
        PayloadKind::Item => String::new(),
    }
}

/// Strips a leading "here's the new bio:" style preamble: one of the
/// boilerplate openers, anything up to the first colon on that line,
/// and the whitespace after it. Without a colon, nothing is stripped.
fn strip_boilerplate_prefix(text: &str) -> &str {
    let lower = text.to_ascii_lowercase();
    for opener in ["here's", "here is", "new", "updated", "suggested"] {
        if lower.starts_with(opener) {
            let first_line_len = text.find('\n').unwrap_or(text.len());
            if let Some(colon) = text[..first_line_len].find(':') {
                return text[colon + 1..].trim_start();
            }
            return text;
        }
    }
    text
}

/// Removes one matching layer of surrounding quotes.
fn strip_quote_layer(text: &str) -> &str {
    for quote in ['"', '\''] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return &text[1..text.len() - 1];
        }
    }
    text
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default().trim()
}

/// UTF-8 safe truncation to at most `max` characters.
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((index, _)) => text[..index].to_string(),
        None => text.to_string(),
    }
}
