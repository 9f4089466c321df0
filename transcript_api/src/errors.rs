//! Error types for the retrieval protocol.

use std::fmt;

use crate::types::PeriodId;

/// A mandatory step of the login and redirect chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    LoginPage,
    Login,
    TicketPage,
    Landing,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::LoginPage => "login page",
            Self::Login => "login",
            Self::TicketPage => "ticket redirect page",
            Self::Landing => "landing page",
        };
        f.write_str(name)
    }
}

/// An expected pattern was not found in served markup. Usually means the
/// provider changed its page contract.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ShapeError {
    #[error("ticket url not found in redirect page")]
    TicketUrlNotFound,
    #[error("identifier not found")]
    StudentIdNotFound,
    #[error("pattern error: {0}")]
    Pattern(String),
}

/// Errors that can occur during a retrieval run.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The request could not be sent or its body could not be read.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    /// A mandatory step returned an unexpected status.
    #[error("{step} failed with unexpected status {status}")]
    HttpStatus { step: Step, status: u16 },
    #[error("protocol shape error: {0}")]
    ProtocolShape(#[from] ShapeError),
    /// A period answered with success but its body was not the expected JSON.
    #[error("malformed payload for period {period}: {source}")]
    MalformedPayload {
        period: PeriodId,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
