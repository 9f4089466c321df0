//! Session carrier shared by every step of a run.

use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::Jar;
use reqwest::redirect::Policy;

use crate::{user_agent::get_user_agent, Endpoints, Error};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Cookie jar and HTTP clients for one retrieval run.
///
/// Two clients share the jar: `http` follows redirects, `no_redirect` is
/// used for the login POST whose redirect response is the success signal.
pub struct Session {
    endpoints: Endpoints,
    http: reqwest::Client,
    no_redirect: reqwest::Client,
}

/// Proof that the credential login succeeded on this session.
#[derive(Debug)]
pub struct Authenticated {
    pub(crate) _private: (),
}

/// Proof that the ticket chain completed; holds the landing page markup.
#[derive(Debug)]
pub struct Authorized {
    landing_html: String,
}

impl Authorized {
    pub(crate) fn new(landing_html: String) -> Self {
        Self { landing_html }
    }

    pub fn landing_html(&self) -> &str {
        &self.landing_html
    }
}

impl Session {
    pub fn new(endpoints: Endpoints) -> Result<Self, Error> {
        let jar = Arc::new(Jar::default());
        let http = reqwest::Client::builder()
            .user_agent(get_user_agent())
            .cookie_provider(Arc::clone(&jar))
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let no_redirect = reqwest::Client::builder()
            .user_agent(get_user_agent())
            .cookie_provider(jar)
            .redirect(Policy::none())
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            endpoints,
            http,
            no_redirect,
        })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn no_redirect(&self) -> &reqwest::Client {
        &self.no_redirect
    }

    /// Logs out of the auth service and drops the clients. Failures are
    /// logged only; teardown must not mask the run's own result.
    pub async fn close(self) {
        let url = self.endpoints.logout_url();
        match self.http.get(&url).send().await {
            Ok(resp) => tracing::info!("Logged out (status {})", resp.status()),
            Err(e) => tracing::warn!("Logout request failed: {}", e),
        }
    }
}
