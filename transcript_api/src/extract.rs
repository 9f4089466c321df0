//! Pattern extraction from served markup.
//!
//! Each function reads one piece of the provider's page contract. When the
//! provider changes a page, only the matching function needs updating.

use indexmap::IndexMap;
use regex::Regex;

use crate::{types::StudentId, ShapeError};

const HIDDEN_FIELD_PATTERN: &str =
    r#"<input type="hidden" name="([a-zA-Z0-9\-_]+)" value="([a-zA-Z0-9\-_]+)"/?>"#;
const TICKET_URL_PATTERN: &str = r#"locationValue\s*=\s*"([^"]+)""#;
const STUDENT_ID_PATTERN: &str = r#"<input\s+id="studentId"[^>]*value="(\d+)"[^>]*>"#;

fn compile(pattern: &str) -> Result<Regex, ShapeError> {
    Regex::new(pattern).map_err(|e| ShapeError::Pattern(format!("regex compile error: {}", e)))
}

/// Hidden inputs of the login form, in page order. A repeated name keeps
/// its last value. A page with no hidden inputs gives an empty map.
pub fn hidden_fields(markup: &str) -> Result<IndexMap<String, String>, ShapeError> {
    let re = compile(HIDDEN_FIELD_PATTERN)?;
    Ok(re
        .captures_iter(markup)
        .map(|cap| (cap[1].to_string(), cap[2].to_string()))
        .collect())
}

/// The ticket URL assigned to `locationValue` in the redirect page script,
/// still entity-escaped.
pub fn ticket_url(markup: &str) -> Result<String, ShapeError> {
    let re = compile(TICKET_URL_PATTERN)?;
    re.captures(markup)
        .map(|cap| cap[1].to_string())
        .ok_or(ShapeError::TicketUrlNotFound)
}

/// Decodes the HTML entities that appear in attribute and script text.
/// `&amp;` goes last so `&amp;lt;` decodes to `&lt;`, not `<`.
pub fn decode_entities(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}

pub fn student_id(markup: &str) -> Result<StudentId, ShapeError> {
    let re = compile(STUDENT_ID_PATTERN)?;
    let cap = re.captures(markup).ok_or(ShapeError::StudentIdNotFound)?;
    StudentId::new(&cap[1])
}
