//! Email digest of top-scoring items
//!
//! The mailer is entirely optional: it only activates when
//! `notification.email.enabled` is set and the delivery fields are
//! present, and the orchestrator treats every send failure as
//! log-and-continue.

use crate::config::EmailConfig;
use crate::error::{Error, Result};
use crate::models::Item;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{info, warn};

/// Render a plain-text report of the top items plus the daily summary
pub fn render_report(items: &[Item], summary: Option<&str>) -> String {
    let mut report = String::from("Research radar digest\n=====================\n\n");

    if let Some(summary) = summary {
        report.push_str(summary);
        report.push_str("\n\n");
    }

    for (i, item) in items.iter().enumerate() {
        report.push_str(&format!(
            "{}. [{}] {} (score {})\n   {}\n",
            i + 1,
            item.source,
            item.title,
            item.score.map_or("-".to_string(), |s| s.to_string()),
            item.url
        ));
        if let Some(comment) = &item.comment {
            report.push_str(&format!("   {}\n", comment));
        }
        report.push('\n');
    }

    report
}

/// SMTP digest mailer
pub struct Mailer {
    config: EmailConfig,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl Mailer {
    /// Build a mailer from config. Returns None (silently disabled) when
    /// the enable flag is off or required delivery fields are missing.
    pub fn from_config(config: &EmailConfig) -> Option<Self> {
        if !config.enabled {
            return None;
        }
        if config.sender.is_empty() || config.receiver.is_empty() || config.smtp_server.is_empty() {
            warn!("Email notification enabled but sender/receiver/smtp_server incomplete, disabling");
            return None;
        }

        let transport = match AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(
            &config.smtp_server,
        ) {
            Ok(builder) => builder
                .port(config.smtp_port)
                .credentials(Credentials::new(
                    config.sender.clone(),
                    config.password.clone(),
                ))
                .build(),
            Err(e) => {
                warn!(error = %e, "Failed to build SMTP transport, disabling email");
                return None;
            }
        };

        Some(Self {
            config: config.clone(),
            transport,
        })
    }

    /// Send the rendered report to the configured receiver
    pub async fn send(&self, report: &str) -> Result<()> {
        let message = Message::builder()
            .from(
                self.config
                    .sender
                    .parse()
                    .map_err(|e| Error::Notify(format!("Invalid sender address: {}", e)))?,
            )
            .to(self
                .config
                .receiver
                .parse()
                .map_err(|e| Error::Notify(format!("Invalid receiver address: {}", e)))?)
            .subject("Research radar digest")
            .header(ContentType::TEXT_PLAIN)
            .body(report.to_string())
            .map_err(|e| Error::Notify(format!("Failed to build message: {}", e)))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| Error::Notify(format!("SMTP send failed: {}", e)))?;

        info!(receiver = %self.config.receiver, "Digest email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemKind;

    fn email_config(enabled: bool, sender: &str) -> EmailConfig {
        EmailConfig {
            enabled,
            sender: sender.to_string(),
            password: "secret".to_string(),
            receiver: "lab@example.com".to_string(),
            smtp_server: "smtp.example.com".to_string(),
            smtp_port: 587,
        }
    }

    #[test]
    fn test_disabled_or_incomplete_yields_none() {
        assert!(Mailer::from_config(&email_config(false, "me@example.com")).is_none());
        assert!(Mailer::from_config(&email_config(true, "")).is_none());
    }

    #[test]
    fn test_complete_config_yields_mailer() {
        assert!(Mailer::from_config(&email_config(true, "me@example.com")).is_some());
    }

    #[test]
    fn test_render_report() {
        let mut item = Item::new("arxiv:1".to_string(), ItemKind::Paper, "arXiv");
        item.title = "Dexterous Grasping".to_string();
        item.url = "http://arxiv.org/pdf/1".to_string();
        item.score = Some(8);
        item.comment = Some("worth a read".to_string());

        let report = render_report(&[item], Some("A strong day for manipulation."));
        assert!(report.contains("A strong day for manipulation."));
        assert!(report.contains("1. [arXiv] Dexterous Grasping (score 8)"));
        assert!(report.contains("worth a read"));
    }
}
