use async_trait::async_trait;
use lettre::{
    message::header::ContentType, transport::smtp::authentication::Credentials, Message,
    SmtpTransport, Transport,
};
use service_core::error::AppError;
use std::sync::Mutex;
use std::time::Duration;

use crate::config::SmtpConfig;

/// Outbound-mail seam. The orchestrator sends exactly two kinds of message:
/// the activation code and the password-reset token.
#[async_trait]
pub trait EmailProvider: Send + Sync {
    async fn send_confirmation_code(&self, to_email: &str, code: &str) -> Result<(), AppError>;

    async fn send_reset_token(&self, to_email: &str, token: &str) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct EmailService {
    mailer: SmtpTransport,
    from_email: String,
}

impl EmailService {
    pub fn new(config: &SmtpConfig) -> Result<Self, AppError> {
        let creds = Credentials::new(config.user.clone(), config.password.clone());

        let mailer = SmtpTransport::relay(&config.host)
            .map_err(|e| AppError::InternalError(anyhow::anyhow!(e.to_string())))?
            .credentials(creds)
            .port(587)
            .timeout(Some(Duration::from_secs(10)))
            .build();

        tracing::info!(host = %config.host, "Email service initialized");

        Ok(Self {
            mailer,
            from_email: config.from_email.clone(),
        })
    }

    async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        plain_body: &str,
        html_body: &str,
    ) -> Result<(), AppError> {
        let email = Message::builder()
            .from(self.from_email.parse().map_err(
                |e: lettre::address::AddressError| AppError::InternalError(e.into()),
            )?)
            .to(to_email.parse().map_err(
                |e: lettre::address::AddressError| AppError::InternalError(e.into()),
            )?)
            .subject(subject)
            .multipart(
                lettre::message::MultiPart::alternative()
                    .singlepart(
                        lettre::message::SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(plain_body.to_string()),
                    )
                    .singlepart(
                        lettre::message::SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )
            .map_err(|e| AppError::InternalError(e.into()))?;

        // SmtpTransport is blocking; keep it off the async runtime.
        let mailer = self.mailer.clone();
        let result = tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| AppError::InternalError(e.into()))?;

        match result {
            Ok(_) => {
                tracing::info!(to = %to_email, subject = %subject, "Email sent");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e.to_string(), to = %to_email, "Failed to send email");
                Err(AppError::EmailError(e.to_string()))
            }
        }
    }
}

#[async_trait]
impl EmailProvider for EmailService {
    async fn send_confirmation_code(&self, to_email: &str, code: &str) -> Result<(), AppError> {
        let html_body = format!(
            r###"<html>
                <body style="font-family: Arial, sans-serif;">
                    <h2>Confirm your account</h2>
                    <p>Use the code below to activate your account:</p>
                    <p style="font-size: 24px; letter-spacing: 4px;"><b>{}</b></p>
                    <p style="color: #666; font-size: 12px;">
                        This code expires in 6 hours. If you didn't request it, please ignore this email.
                    </p>
                </body>
            </html>"###,
            code
        );

        let plain_body = format!(
            "Confirm your account\n\nUse the following code to activate your account:\n\n{}\n\nThis code expires in 6 hours. If you didn't request it, please ignore this email.",
            code
        );

        self.send_email(to_email, "Account confirmation code", &plain_body, &html_body)
            .await
    }

    async fn send_reset_token(&self, to_email: &str, token: &str) -> Result<(), AppError> {
        let html_body = format!(
            r###"<html>
                <body style="font-family: Arial, sans-serif;">
                    <h2>Password reset</h2>
                    <p>We received a request to reset your password. Use this token to set a new one:</p>
                    <p style="font-size: 14px;"><code>{}</code></p>
                    <p style="color: #666; font-size: 12px;">
                        This token expires in 24 hours. If you didn't request it, please ignore this email.
                    </p>
                </body>
            </html>"###,
            token
        );

        let plain_body = format!(
            "Password reset\n\nWe received a request to reset your password. Use the following token to set a new one:\n\n{}\n\nThis token expires in 24 hours. If you didn't request it, please ignore this email.",
            token
        );

        self.send_email(to_email, "Reset your password", &plain_body, &html_body)
            .await
    }
}

/// No-op provider for environments without an SMTP relay.
#[derive(Clone)]
pub struct MockEmailService;

#[async_trait]
impl EmailProvider for MockEmailService {
    async fn send_confirmation_code(&self, _to_email: &str, _code: &str) -> Result<(), AppError> {
        Ok(())
    }

    async fn send_reset_token(&self, _to_email: &str, _token: &str) -> Result<(), AppError> {
        Ok(())
    }
}

/// A message captured by [`RecordingMailer`].
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Provider that records every message instead of sending it, so tests can
/// assert on the delivered code or token.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutboundEmail>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<OutboundEmail> {
        self.sent.lock().unwrap().last().cloned()
    }

    fn record(&self, to: &str, subject: &str, body: String) {
        self.sent.lock().unwrap().push(OutboundEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            body,
        });
    }
}

#[async_trait]
impl EmailProvider for RecordingMailer {
    async fn send_confirmation_code(&self, to_email: &str, code: &str) -> Result<(), AppError> {
        self.record(
            to_email,
            "Account confirmation code",
            format!("Your confirmation code is {}", code),
        );
        Ok(())
    }

    async fn send_reset_token(&self, to_email: &str, token: &str) -> Result<(), AppError> {
        self.record(
            to_email,
            "Reset your password",
            format!("Your reset token is {}", token),
        );
        Ok(())
    }
}
