//! Configuration for a digest run.

use std::fmt;

use crate::error::ConfigError;
use crate::github::repo_browse_url;

/// Default GitHub organization.
pub const DEFAULT_ORG: &str = "openlab-aux";

/// Default GitHub repository.
pub const DEFAULT_REPO: &str = "orgafoo";

/// Default number of issues included in one digest.
pub const DEFAULT_ISSUE_LIMIT: usize = 10;

/// Default maximum line length for issue bodies.
pub const DEFAULT_WRAP_WIDTH: usize = 69;

/// Default page linked for the issues that did not make it into the digest.
pub const DEFAULT_BROWSE_URL: &str = "https://issues.openlab-augsburg.de";

/// Default recipient (the mailing list).
pub const DEFAULT_TO_EMAIL: &str = "alle@lists.openlab-augsburg.de";

/// Default sender.
pub const DEFAULT_FROM_EMAIL: &str = "tasks@openlab-augsburg.de";

/// Default subject line.
pub const DEFAULT_SUBJECT: &str = "Die neuesten Openlab Issues für dich";

/// Default local mail submission program.
pub const DEFAULT_SENDMAIL: &str = "sendmail";

/// Default SMTP port for implicit TLS.
pub const DEFAULT_SMTPS_PORT: u16 = 465;

/// Default SMTP port for STARTTLS.
pub const DEFAULT_SUBMISSION_PORT: u16 = 587;

/// How the SMTP connection is encrypted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmtpSecurity {
    /// TLS from the first byte (SMTPS).
    #[default]
    Tls,
    /// Plain connection upgraded with STARTTLS.
    StartTls,
}

impl SmtpSecurity {
    /// The port conventionally used with this security mode.
    #[must_use]
    pub const fn default_port(self) -> u16 {
        match self {
            Self::Tls => DEFAULT_SMTPS_PORT,
            Self::StartTls => DEFAULT_SUBMISSION_PORT,
        }
    }
}

/// Settings for authenticated SMTP submission.
#[derive(Clone, PartialEq, Eq)]
pub struct SmtpConfig {
    /// SMTP server hostname.
    pub host: String,
    /// SMTP server port.
    pub port: u16,
    /// Login name.
    pub username: String,
    /// Login password.
    pub password: String,
    /// Encryption mode.
    pub security: SmtpSecurity,
}

impl SmtpConfig {
    /// Build SMTP settings from optional parts, as they come from flags or
    /// the environment.
    ///
    /// The port falls back to the conventional port of `security`.
    pub fn from_parts(
        host: Option<String>,
        port: Option<u16>,
        username: Option<String>,
        password: Option<String>,
        security: SmtpSecurity,
    ) -> Result<Self, ConfigError> {
        let host = non_empty(host).ok_or(ConfigError::Missing("SMTP host"))?;
        let username = non_empty(username).ok_or(ConfigError::Missing("SMTP username"))?;
        let password = non_empty(password).ok_or(ConfigError::Missing("SMTP password"))?;

        Ok(Self {
            host,
            port: port.unwrap_or_else(|| security.default_port()),
            username,
            password,
            security,
        })
    }
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("security", &self.security)
            .finish()
    }
}

/// Which transport delivers the digest. Exactly one is used per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportConfig {
    /// Pipe the message into a local `sendmail -t`.
    Sendmail { program: String },
    /// Submit over authenticated, encrypted SMTP.
    Smtp(SmtpConfig),
}

impl TransportConfig {
    /// Short name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Sendmail { .. } => "sendmail",
            Self::Smtp(_) => "smtp",
        }
    }
}

/// Everything a digest run needs to know.
#[derive(Debug, Clone)]
pub struct DigestConfig {
    /// GitHub organization (or user) owning the repository.
    pub org: String,
    /// GitHub repository name.
    pub repo: String,
    /// Maximum number of issues in the digest.
    pub issue_limit: usize,
    /// Maximum characters per body line.
    pub wrap_width: usize,
    /// Link to the full issue list. Falls back to the GitHub issues page.
    pub browse_url: Option<String>,
    /// Recipient address.
    pub to_email: String,
    /// Sender address.
    pub from_email: String,
    /// Subject line.
    pub subject: String,
    /// Optional token for authenticated GitHub API requests.
    pub github_token: Option<String>,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            org: DEFAULT_ORG.to_string(),
            repo: DEFAULT_REPO.to_string(),
            issue_limit: DEFAULT_ISSUE_LIMIT,
            wrap_width: DEFAULT_WRAP_WIDTH,
            browse_url: Some(DEFAULT_BROWSE_URL.to_string()),
            to_email: DEFAULT_TO_EMAIL.to_string(),
            from_email: DEFAULT_FROM_EMAIL.to_string(),
            subject: DEFAULT_SUBJECT.to_string(),
            github_token: None,
        }
    }
}

impl DigestConfig {
    /// The link shown in the preamble for the full issue list.
    #[must_use]
    pub fn browse_url(&self) -> String {
        self.browse_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .map_or_else(|| repo_browse_url(&self.org, &self.repo), str::to_string)
    }

    /// Check values that would otherwise fail late or loop forever.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.org.trim().is_empty() {
            return Err(ConfigError::Missing("organization"));
        }
        if self.repo.trim().is_empty() {
            return Err(ConfigError::Missing("repository"));
        }
        if self.wrap_width == 0 {
            return Err(ConfigError::Invalid(
                "wrap width must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_list_setup() {
        let config = DigestConfig::default();

        assert_eq!(config.org, "openlab-aux");
        assert_eq!(config.repo, "orgafoo");
        assert_eq!(config.issue_limit, 10);
        assert_eq!(config.wrap_width, 69);
        assert_eq!(config.to_email, "alle@lists.openlab-augsburg.de");
        assert_eq!(config.from_email, "tasks@openlab-augsburg.de");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_browse_url_uses_configured_value() {
        let config = DigestConfig::default();
        assert_eq!(config.browse_url(), "https://issues.openlab-augsburg.de");
    }

    #[test]
    fn test_browse_url_falls_back_to_github() {
        let config = DigestConfig {
            browse_url: None,
            ..DigestConfig::default()
        };
        assert_eq!(
            config.browse_url(),
            "https://github.com/openlab-aux/orgafoo/issues"
        );

        let blank = DigestConfig {
            browse_url: Some("  ".to_string()),
            ..DigestConfig::default()
        };
        assert_eq!(blank.browse_url(), "https://github.com/openlab-aux/orgafoo/issues");
    }

    #[test]
    fn test_zero_wrap_width_rejected() {
        let config = DigestConfig {
            wrap_width: 0,
            ..DigestConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_smtp_port_follows_security() {
        let tls = SmtpConfig::from_parts(
            Some("mail.example.org".to_string()),
            None,
            Some("tasks".to_string()),
            Some("secret".to_string()),
            SmtpSecurity::Tls,
        )
        .unwrap();
        assert_eq!(tls.port, 465);

        let starttls = SmtpConfig::from_parts(
            Some("mail.example.org".to_string()),
            None,
            Some("tasks".to_string()),
            Some("secret".to_string()),
            SmtpSecurity::StartTls,
        )
        .unwrap();
        assert_eq!(starttls.port, 587);
    }

    #[test]
    fn test_smtp_requires_credentials() {
        let err = SmtpConfig::from_parts(
            Some("mail.example.org".to_string()),
            Some(465),
            Some("tasks".to_string()),
            Some(String::new()),
            SmtpSecurity::Tls,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("SMTP password")));

        let err =
            SmtpConfig::from_parts(None, None, None, None, SmtpSecurity::Tls).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("SMTP host")));
    }

    #[test]
    fn test_smtp_debug_redacts_password() {
        let smtp = SmtpConfig::from_parts(
            Some("mail.example.org".to_string()),
            None,
            Some("tasks".to_string()),
            Some("hunter2".to_string()),
            SmtpSecurity::Tls,
        )
        .unwrap();
        let debug = format!("{smtp:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("[REDACTED]"));
    }
}
