//! issue-digest CLI - mails the newest open issues to a mailing list.
//!
//! Meant to be run from cron or a CronJob; every run is independent.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use issue_digest::config::{
    DEFAULT_BROWSE_URL, DEFAULT_FROM_EMAIL, DEFAULT_ISSUE_LIMIT, DEFAULT_ORG, DEFAULT_REPO,
    DEFAULT_SENDMAIL, DEFAULT_SUBJECT, DEFAULT_TO_EMAIL, DEFAULT_WRAP_WIDTH,
};
use issue_digest::mail::transport_for;
use issue_digest::{runner, DigestConfig, IssueFetcher, SmtpConfig, SmtpSecurity, TransportConfig};

/// Mail a digest of open GitHub issues to a mailing list.
#[derive(Parser)]
#[command(name = "issue-digest")]
#[command(about = "Mail a digest of open GitHub issues to a mailing list")]
#[command(version)]
struct Cli {
    /// GitHub organization or user
    #[arg(long, env = "DIGEST_ORG", default_value = DEFAULT_ORG)]
    org: String,

    /// GitHub repository
    #[arg(long, env = "DIGEST_REPO", default_value = DEFAULT_REPO)]
    repo: String,

    /// Maximum number of issues in the digest
    #[arg(long, env = "DIGEST_LIMIT", default_value_t = DEFAULT_ISSUE_LIMIT)]
    limit: usize,

    /// Maximum characters per body line
    #[arg(long, env = "DIGEST_WRAP_WIDTH", default_value_t = DEFAULT_WRAP_WIDTH)]
    wrap_width: usize,

    /// Link to the full issue list (empty = the repository's GitHub issues page)
    #[arg(long, env = "DIGEST_BROWSE_URL", default_value = DEFAULT_BROWSE_URL)]
    browse_url: String,

    /// Recipient address
    #[arg(long, env = "DIGEST_TO_EMAIL", default_value = DEFAULT_TO_EMAIL)]
    to: String,

    /// Sender address
    #[arg(long, env = "DIGEST_FROM_EMAIL", default_value = DEFAULT_FROM_EMAIL)]
    from: String,

    /// Subject line
    #[arg(long, env = "DIGEST_SUBJECT", default_value = DEFAULT_SUBJECT)]
    subject: String,

    /// GitHub token for authenticated API requests
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: Option<String>,

    /// How the digest is delivered
    #[arg(long, env = "DIGEST_TRANSPORT", value_enum, default_value_t = TransportKind::Smtp)]
    transport: TransportKind,

    /// Mail submission program for the sendmail transport
    #[arg(long, env = "SENDMAIL_PATH", default_value = DEFAULT_SENDMAIL)]
    sendmail: String,

    /// SMTP server hostname
    #[arg(long, env = "SMTP_HOST")]
    smtp_host: Option<String>,

    /// SMTP server port (default depends on --smtp-security)
    #[arg(long, env = "SMTP_PORT")]
    smtp_port: Option<u16>,

    /// SMTP login name
    #[arg(long, env = "SMTP_USERNAME")]
    smtp_username: Option<String>,

    /// SMTP password
    #[arg(long, env = "SMTP_PASSWORD", hide_env_values = true)]
    smtp_password: Option<String>,

    /// SMTP encryption
    #[arg(long, env = "SMTP_SECURITY", value_enum, default_value_t = SecurityArg::Tls)]
    smtp_security: SecurityArg,

    /// Print the digest instead of mailing it
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Default, ValueEnum)]
enum TransportKind {
    #[default]
    Smtp,
    Sendmail,
}

#[derive(Clone, Copy, Default, ValueEnum)]
enum SecurityArg {
    #[default]
    Tls,
    Starttls,
}

impl From<SecurityArg> for SmtpSecurity {
    fn from(value: SecurityArg) -> Self {
        match value {
            SecurityArg::Tls => Self::Tls,
            SecurityArg::Starttls => Self::StartTls,
        }
    }
}

impl Cli {
    fn digest_config(&self) -> DigestConfig {
        DigestConfig {
            org: self.org.clone(),
            repo: self.repo.clone(),
            issue_limit: self.limit,
            wrap_width: self.wrap_width,
            browse_url: Some(self.browse_url.clone()).filter(|url| !url.is_empty()),
            to_email: self.to.clone(),
            from_email: self.from.clone(),
            subject: self.subject.clone(),
            github_token: self
                .github_token
                .clone()
                .or_else(|| std::env::var("GH_TOKEN").ok()),
        }
    }

    fn transport_config(&self) -> Result<TransportConfig> {
        match self.transport {
            TransportKind::Sendmail => Ok(TransportConfig::Sendmail {
                program: self.sendmail.clone(),
            }),
            TransportKind::Smtp => {
                let smtp = SmtpConfig::from_parts(
                    self.smtp_host.clone(),
                    self.smtp_port,
                    self.smtp_username.clone(),
                    self.smtp_password.clone(),
                    self.smtp_security.into(),
                )
                .context("SMTP transport selected but not fully configured")?;
                Ok(TransportConfig::Smtp(smtp))
            }
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing (stderr, so --dry-run output stays clean)
    let filter = if cli.verbose {
        EnvFilter::new("issue_digest=debug,info")
    } else {
        EnvFilter::new("issue_digest=info,warn")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = cli.digest_config();
    let fetcher = IssueFetcher::new(config.github_token.clone())
        .context("Failed to create GitHub client")?;

    tracing::info!(
        org = %config.org,
        repo = %config.repo,
        limit = config.issue_limit,
        dry_run = cli.dry_run,
        "Starting issue digest"
    );

    if cli.dry_run {
        let (body, _) = runner::render_only(&config, &fetcher)
            .await
            .context("Failed to render issue digest")?;
        print!("{body}");
        return Ok(());
    }

    let transport = transport_for(&cli.transport_config()?);
    let summary = runner::run(&config, &fetcher, transport.as_ref())
        .await
        .context("Issue digest run failed")?;

    tracing::info!(
        fetched = summary.fetched,
        included = summary.included,
        "Done"
    );

    Ok(())
}
