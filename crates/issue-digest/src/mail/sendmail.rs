//! Delivery through a local `sendmail`-compatible program.
//!
//! Uses tokio::process::Command; the serialized message is written to the
//! child's stdin and the recipients are taken from its headers (`-t`).

use std::io::ErrorKind;
use std::process::Stdio;

use async_trait::async_trait;
use lettre::Message;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

use super::MailTransport;
use crate::error::MailError;

/// Pipes messages into a local mail submission program.
#[derive(Debug, Clone)]
pub struct SendmailTransport {
    program: String,
    args: Vec<String>,
}

impl SendmailTransport {
    /// Use `program` with the `-t` flag.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: vec!["-t".to_string()],
        }
    }

    /// Replace the arguments passed to the program.
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    async fn submit(&self, raw: &[u8]) -> Result<(), MailError> {
        debug!(program = %self.program, args = ?self.args, "Spawning mail submission program");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => MailError::SendmailNotFound {
                    program: self.program.clone(),
                },
                _ => MailError::Io(e),
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            // A child that quits early closes the pipe; its exit status decides.
            match stdin.write_all(raw).await {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                    debug!("Mail submission program closed stdin early");
                }
                Err(e) => return Err(MailError::Io(e)),
            }
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(MailError::SendmailFailed {
                program: self.program.clone(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl MailTransport for SendmailTransport {
    fn name(&self) -> &'static str {
        "sendmail"
    }

    async fn deliver(&self, message: Message) -> Result<(), MailError> {
        self.submit(&message.formatted()).await?;
        info!(program = %self.program, "Message handed to sendmail");
        Ok(())
    }
}
