//! One complete retrieval run with guaranteed logout.

use transcript_api::{
    authorize, extract, fetch_periods, login, Credentials, PeriodPayload, Session,
    SkippedPeriod, StudentId,
};

use crate::{config::Config, error::TranscriptError};

#[derive(Debug)]
pub struct RetrievalOutcome {
    pub student_id: StudentId,
    /// Payloads of the periods that succeeded, in request order.
    pub payloads: Vec<PeriodPayload>,
    pub skipped: Vec<SkippedPeriod>,
}

/// Logs in, walks the ticket chain, reads the student id and fetches every
/// configured period. The session is logged out on every exit path once it
/// exists, including after a fatal error.
pub async fn retrieve_transcript(
    config: &Config,
    credentials: &Credentials,
) -> Result<RetrievalOutcome, TranscriptError> {
    config.validate()?;
    let session = Session::new(config.endpoints()?)?;

    let result = run_steps(&session, credentials, config).await;
    if let Err(e) = &result {
        tracing::error!("Retrieval aborted: {}", e);
    }
    session.close().await;
    result
}

async fn run_steps(
    session: &Session,
    credentials: &Credentials,
    config: &Config,
) -> Result<RetrievalOutcome, TranscriptError> {
    tracing::info!("Logging in to the auth service");
    let proof = login(session, credentials).await?;

    tracing::info!("Following the ticket redirect chain");
    let authorized = authorize(session, proof).await?;

    let student_id = extract::student_id(authorized.landing_html())
        .map_err(transcript_api::Error::from)?;
    tracing::info!("Found student id {}", student_id);

    let report = fetch_periods(session, &authorized, &student_id, &config.periods).await?;
    tracing::info!(
        "Fetched {} of {} periods",
        report.payloads.len(),
        config.periods.len()
    );

    Ok(RetrievalOutcome {
        student_id,
        payloads: report.payloads,
        skipped: report.skipped,
    })
}
