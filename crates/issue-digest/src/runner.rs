//! One digest run: fetch, render, mail.

use tracing::{error, info};

use crate::config::DigestConfig;
use crate::digest::DigestFormatter;
use crate::error::DigestError;
use crate::github::IssueFetcher;
use crate::mail::{MailEnvelope, MailTransport};

/// Outcome of a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Issues returned by GitHub.
    pub fetched: usize,
    /// Issues included in the digest.
    pub included: usize,
}

/// Fetch the issues and render the digest without sending it.
pub async fn render_only(
    config: &DigestConfig,
    fetcher: &IssueFetcher,
) -> Result<(String, RunSummary), DigestError> {
    config.validate()?;

    let issues = fetcher.fetch_issues(&config.org, &config.repo).await?;
    let formatter = DigestFormatter::new(config.issue_limit, config.wrap_width);
    let body = formatter.render(&issues, &config.browse_url());

    let summary = RunSummary {
        fetched: issues.len(),
        included: formatter.included(issues.len()),
    };
    info!(
        org = %config.org,
        repo = %config.repo,
        fetched = summary.fetched,
        included = summary.included,
        "Rendered issue digest"
    );

    Ok((body, summary))
}

/// Fetch, render and deliver the digest through `transport`.
///
/// Nothing is mailed when fetching fails.
pub async fn run(
    config: &DigestConfig,
    fetcher: &IssueFetcher,
    transport: &dyn MailTransport,
) -> Result<RunSummary, DigestError> {
    let (body, summary) = render_only(config, fetcher).await?;

    let envelope = MailEnvelope::new(&config.from_email, &config.to_email, &config.subject);
    let message = envelope.compose(&body)?;

    if let Err(e) = transport.deliver(message).await {
        error!(
            transport = transport.name(),
            to = %config.to_email,
            error = %e,
            "Failed to deliver issue digest"
        );
        return Err(e.into());
    }

    info!(
        transport = transport.name(),
        to = %config.to_email,
        included = summary.included,
        "Issue digest sent"
    );

    Ok(summary)
}
