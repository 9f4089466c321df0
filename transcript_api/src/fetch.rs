//! Per-period grade requests.

use reqwest::StatusCode;

use crate::{
    session::{Authorized, Session},
    types::{PeriodId, PeriodPayload, StudentId},
    Error,
};

/// A period whose request answered with a non-success status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPeriod {
    pub period: PeriodId,
    pub status: StatusCode,
}

/// Outcome of one pass over the configured periods.
#[derive(Debug, Default)]
pub struct FetchReport {
    /// Normalized payloads of the periods that succeeded, in request order.
    pub payloads: Vec<PeriodPayload>,
    pub skipped: Vec<SkippedPeriod>,
}

/// Requests each period in order and normalizes the grade details.
///
/// Failure policy: a non-success status skips that period and the loop
/// continues, while a success response whose body does not parse aborts the
/// whole run. A bad status may be transient or period specific; a body of
/// the wrong shape means every later response will be wrong too. No request
/// is retried.
pub async fn fetch_periods(
    session: &Session,
    _authorized: &Authorized,
    student_id: &StudentId,
    periods: &[PeriodId],
) -> Result<FetchReport, Error> {
    let mut report = FetchReport::default();

    for &period in periods {
        let url = session.endpoints().period_url(student_id, period);
        let resp = session.http().get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            tracing::warn!("Period {} request failed with status {}", period, status);
            report.skipped.push(SkippedPeriod { period, status });
            continue;
        }

        let body = resp.text().await?;
        let mut payload: PeriodPayload = serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse period {} payload: {}", period, e);
            Error::MalformedPayload { period, source: e }
        })?;

        if !payload.grades_by_period.contains_key(&period.to_string()) {
            tracing::warn!("Period {} payload has no block for its own id", period);
        }
        payload.normalize_details();

        tracing::info!(
            "Fetched period {} ({} courses)",
            period,
            payload.course_count()
        );
        report.payloads.push(payload);
    }

    Ok(report)
}
