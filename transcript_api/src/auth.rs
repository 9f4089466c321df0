//! Credential login against the central auth service.

use std::fmt;

use indexmap::IndexMap;
use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, LOCATION, ORIGIN, REFERER, UPGRADE_INSECURE_REQUESTS,
};

use crate::{
    extract,
    session::{Authenticated, Session},
    user_agent, Error, Step,
};

/// Username and password for the auth service.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Both parts must be non-empty.
    pub fn new(username: &str, password: &str) -> Result<Self, Error> {
        let username = username.trim();
        if username.is_empty() {
            return Err(Error::InvalidInput("username must not be empty".into()));
        }
        if password.is_empty() {
            return Err(Error::InvalidInput("password must not be empty".into()));
        }
        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &"<redacted>")
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Builds the login form body: fixed fields first, then the scraped hidden
/// fields, which win on a name clash.
pub(crate) fn login_form(
    credentials: &Credentials,
    service: &str,
    hidden: IndexMap<String, String>,
) -> IndexMap<String, String> {
    let mut form = IndexMap::new();
    form.insert("username".to_string(), credentials.username.clone());
    form.insert("password".to_string(), credentials.password.clone());
    form.insert("service".to_string(), service.to_string());
    form.extend(hidden);
    form
}

/// Performs the login handshake. On success the session's jar holds the
/// auth service cookies.
pub async fn login(session: &Session, credentials: &Credentials) -> Result<Authenticated, Error> {
    let endpoints = session.endpoints();
    let login_url = endpoints.login_url();

    let page = session.http().get(&login_url).send().await?;
    let status = page.status();
    if !status.is_success() {
        tracing::error!("Login page returned status {}", status);
        return Err(Error::HttpStatus {
            step: Step::LoginPage,
            status: status.as_u16(),
        });
    }
    let html = page.text().await?;

    let hidden = extract::hidden_fields(&html)?;
    tracing::info!("Found {} hidden login fields", hidden.len());
    let form = login_form(credentials, &endpoints.service_url(), hidden);

    let resp = session
        .no_redirect()
        .post(&login_url)
        .header(ORIGIN, endpoints.auth_origin())
        .header(REFERER, &login_url)
        .header(ACCEPT, user_agent::ACCEPT_HTML)
        .header(ACCEPT_LANGUAGE, user_agent::ACCEPT_LANGUAGE)
        .header(UPGRADE_INSECURE_REQUESTS, "1")
        .header(CACHE_CONTROL, "max-age=0")
        .form(&form)
        .send()
        .await?;

    let status = resp.status();
    if !status.is_redirection() || !resp.headers().contains_key(LOCATION) {
        tracing::error!("Login failed with status {}", status);
        return Err(Error::HttpStatus {
            step: Step::Login,
            status: status.as_u16(),
        });
    }

    tracing::info!("Logged in");
    Ok(Authenticated { _private: () })
}
