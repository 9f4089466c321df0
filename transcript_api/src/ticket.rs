//! Service-ticket redirect chain from the auth service to the grade
//! application.

use crate::{
    extract,
    session::{Authenticated, Authorized, Session},
    Error, ShapeError, Step,
};

/// Walks the ticket chain and returns the landing page of the grade
/// application. Consumes the login proof; the ticket is single use.
pub async fn authorize(session: &Session, _login: Authenticated) -> Result<Authorized, Error> {
    let endpoints = session.endpoints();

    let ticket_page = session.http().get(endpoints.sheet_url()).send().await?;
    let status = ticket_page.status();
    if !status.is_success() {
        tracing::error!("Ticket redirect page returned status {}", status);
        return Err(Error::HttpStatus {
            step: Step::TicketPage,
            status: status.as_u16(),
        });
    }
    let page_url = ticket_page.url().clone();
    let html = ticket_page.text().await?;

    let raw = extract::ticket_url(&html)?;
    let decoded = extract::decode_entities(&raw);
    let ticket_url = page_url.join(&decoded).map_err(|e| {
        tracing::error!("Unusable ticket url: {}", e);
        Error::ProtocolShape(ShapeError::TicketUrlNotFound)
    })?;

    let redeemed = session.http().get(ticket_url).send().await?;
    tracing::info!("Ticket redeemed (status {})", redeemed.status());

    let landing = session.http().get(endpoints.landing_url()).send().await?;
    let status = landing.status();
    if !status.is_success() {
        tracing::error!("Landing page returned status {}", status);
        return Err(Error::HttpStatus {
            step: Step::Landing,
            status: status.as_u16(),
        });
    }

    Ok(Authorized::new(landing.text().await?))
}
