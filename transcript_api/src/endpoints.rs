//! URLs of the auth service and the grade application.

use url::Url;

use crate::{
    types::{PeriodId, StudentId},
    Error,
};

pub const DEFAULT_AUTH_BASE_URL: &str = "https://uis.fudan.edu.cn";
pub const DEFAULT_APP_BASE_URL: &str = "https://fdjwgl.fudan.edu.cn";

const SHEET_PATH: &str = "/student/for-std/grade/sheet";

/// Base URLs for the two hosts the run talks to. Both default to production;
/// tests point them at a mock server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    auth_base_url: String,
    app_base_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            auth_base_url: DEFAULT_AUTH_BASE_URL.to_string(),
            app_base_url: DEFAULT_APP_BASE_URL.to_string(),
        }
    }
}

impl Endpoints {
    pub fn new(auth_base_url: &str, app_base_url: &str) -> Result<Self, Error> {
        for base in [auth_base_url, app_base_url] {
            Url::parse(base)
                .map_err(|e| Error::InvalidInput(format!("invalid base url {}: {}", base, e)))?;
        }
        Ok(Self {
            auth_base_url: auth_base_url.trim_end_matches('/').to_string(),
            app_base_url: app_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Both hosts on one base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Result<Self, Error> {
        Self::new(base_url, base_url)
    }

    /// The service URL the auth gateway is asked to issue a ticket for.
    pub fn service_url(&self) -> String {
        format!("{}{}/", self.app_base_url, SHEET_PATH)
    }

    pub fn login_url(&self) -> String {
        format!(
            "{}/authserver/login?service={}",
            self.auth_base_url,
            self.service_url()
        )
    }

    pub fn logout_url(&self) -> String {
        format!(
            "{}/authserver/logout?service=/authserver/login",
            self.auth_base_url
        )
    }

    pub fn auth_origin(&self) -> &str {
        &self.auth_base_url
    }

    /// Entry point of the grade application; answers with the ticket page.
    pub fn sheet_url(&self) -> String {
        self.service_url()
    }

    pub fn landing_url(&self) -> String {
        format!("{}{}", self.app_base_url, SHEET_PATH)
    }

    pub fn period_url(&self, student_id: &StudentId, period: PeriodId) -> String {
        format!(
            "{}{}/info/{}?semester={}",
            self.app_base_url,
            SHEET_PATH,
            student_id.as_str(),
            period
        )
    }
}
