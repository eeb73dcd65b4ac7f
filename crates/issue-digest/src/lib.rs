//! Mails a digest of open GitHub issues to a mailing list.
//!
//! One run is a single linear pass:
//!
//! 1. [`IssueFetcher`] pulls the open issues of one repository from the
//!    GitHub REST API.
//! 2. [`DigestFormatter`] renders the first few of them into a German
//!    plaintext digest.
//! 3. A [`MailTransport`] hands the composed message to either a local
//!    `sendmail` or an authenticated SMTP server.
//!
//! # Usage
//!
//! ```no_run
//! use issue_digest::{runner, DigestConfig, IssueFetcher, SendmailTransport};
//!
//! # async fn example() -> Result<(), issue_digest::DigestError> {
//! let config = DigestConfig::default();
//! let fetcher = IssueFetcher::new(None)?;
//! let transport = SendmailTransport::new("sendmail");
//!
//! let summary = runner::run(&config, &fetcher, &transport).await?;
//! println!("mailed {} issues", summary.included);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod digest;
pub mod error;
pub mod github;
pub mod mail;
pub mod runner;

pub use config::{DigestConfig, SmtpConfig, SmtpSecurity, TransportConfig};
pub use digest::DigestFormatter;
pub use error::{ConfigError, DigestError, FetchError, MailError};
pub use github::{Issue, IssueFetcher};
pub use mail::{MailEnvelope, MailTransport, SendmailTransport, SmtpTransport};
pub use runner::RunSummary;
