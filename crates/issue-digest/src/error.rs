//! Error types for the issue digest.

use thiserror::Error;

/// Errors that can occur while fetching issues from GitHub.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The organization or repository does not exist (HTTP 404).
    #[error("Repository or organization doesn't exist: {org}/{repo}")]
    RepoNotFound { org: String, repo: String },

    /// HTTP request failed before a response was received.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// GitHub answered with a non-success status other than 404.
    #[error("GitHub API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The response body was not a list of issues.
    #[error("Failed to decode issues: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors that can occur while composing or delivering the digest mail.
#[derive(Debug, Error)]
pub enum MailError {
    /// A sender or recipient address could not be parsed.
    #[error("Invalid email address '{address}': {source}")]
    Address {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },

    /// The message could not be assembled.
    #[error("Failed to build email message: {0}")]
    Build(#[from] lettre::error::Error),

    /// SMTP connection, TLS or authentication failure.
    #[error("SMTP delivery failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// The local mail submission program does not exist.
    #[error("The sendmail program cannot be found: {program}")]
    SendmailNotFound { program: String },

    /// The local mail submission program exited unsuccessfully.
    #[error("{program} failed with exit code {code:?}: {stderr}")]
    SendmailFailed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    /// I/O error while talking to the mail submission program.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Invalid or incomplete configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A value required by the selected transport is not set.
    #[error("Missing configuration value: {0}")]
    Missing(&'static str),

    /// A value is set but unusable.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level error for a digest run.
#[derive(Debug, Error)]
pub enum DigestError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Mail(#[from] MailError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl DigestError {
    /// True when the run failed because the repository does not exist.
    #[must_use]
    pub fn is_repo_not_found(&self) -> bool {
        matches!(self, Self::Fetch(FetchError::RepoNotFound { .. }))
    }
}
