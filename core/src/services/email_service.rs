//! SMTP notifier for account verification email.
//!
//! Dispatch is single-shot: one failure surfaces immediately as
//! `ServiceError::Notifier` and the caller decides how gracefully to degrade.
//! Registration treats any failure here as informational, never fatal.

use std::str::FromStr;

use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::EmailConfig;
use crate::errors::{ServiceError, ServiceResult};

pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    config: EmailConfig,
}

impl EmailService {
    /// Creates a new EmailService instance from SMTP settings.
    pub fn new(config: EmailConfig) -> ServiceResult<Self> {
        let creds = Credentials::new(config.smtp_username.clone(), config.smtp_password.clone());

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .map_err(|e| ServiceError::notifier(format!("Invalid SMTP host: {e}")))?
            .port(config.smtp_port)
            .credentials(creds)
            .build();

        Ok(Self { mailer, config })
    }

    /// Sends the account verification email with the token link embedded.
    pub async fn send_verification_email(
        &self,
        recipient_email: &str,
        recipient_name: &str,
        verify_token: &str,
    ) -> ServiceResult<()> {
        let verify_url = format!(
            "{}/?verify={}",
            self.config.base_url.trim_end_matches('/'),
            verify_token
        );

        let subject = "Verify your LedgerDesk account";
        let text_content = self.build_verification_text(recipient_name, &verify_url);
        let html_content = self.build_verification_html(recipient_name, &verify_url);

        self.send_email(recipient_email, subject, &html_content, &text_content)
            .await
    }

    /// Sends a generic multipart (text + HTML) email.
    pub async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        html_content: &str,
        text_content: &str,
    ) -> ServiceResult<()> {
        let from_mailbox = Mailbox::from_str(&format!(
            "{} <{}>",
            self.config.from_name, self.config.from_email
        ))
        .map_err(|e| ServiceError::notifier(format!("Invalid from email: {e}")))?;

        let to_mailbox = Mailbox::from_str(to_email)
            .map_err(|e| ServiceError::notifier(format!("Invalid recipient email: {e}")))?;

        let email = Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(subject)
            .multipart(
                lettre::message::MultiPart::alternative()
                    .singlepart(
                        lettre::message::SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_content.to_string()),
                    )
                    .singlepart(
                        lettre::message::SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_content.to_string()),
                    ),
            )
            .map_err(|e| ServiceError::notifier(format!("Failed to build email: {e}")))?;

        self.mailer
            .send(email)
            .await
            .map_err(|e| ServiceError::notifier(format!("Failed to send email: {e}")))?;

        Ok(())
    }

    fn build_verification_text(&self, recipient_name: &str, verify_url: &str) -> String {
        format!(
            "Hi {recipient_name},\n\n\
             Verify your LedgerDesk account:\n{verify_url}\n\n\
             If you didn't create this account, you can safely ignore this email.\n"
        )
    }

    fn build_verification_html(&self, recipient_name: &str, verify_url: &str) -> String {
        format!(
            r#"
            <p>Hi {recipient_name},</p>
            <p>Click below to verify your LedgerDesk account:</p>
            <p>
              <a href="{verify_url}"
                 style="background:#2d6a9f;color:white;padding:10px 22px;
                        text-decoration:none;border-radius:5px;display:inline-block">
                Verify Account
              </a>
            </p>
            <p style="color:#999;font-size:12px">Or copy this link:<br>{verify_url}</p>
            "#
        )
    }
}
