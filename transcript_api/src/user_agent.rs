//! Browser identity sent with every request.

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:76.0) Gecko/20100101 Firefox/76.0";

pub const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
pub const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";

/// The auth gateway rejects non-browser agents, so one fixed desktop
/// Firefox string is used for the whole run.
pub fn get_user_agent() -> &'static str {
    USER_AGENT
}
