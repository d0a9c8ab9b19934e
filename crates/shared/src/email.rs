//! Email service for sending transactional emails.
//!
//! Uses `lettre` for SMTP transport. Invoice sends attach the rendered PDF.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Attachment, MultiPart, SinglePart, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use thiserror::Error;

use crate::config::EmailConfig;

/// Email service errors.
#[derive(Debug, Error)]
pub enum EmailError {
    /// Failed to build email message.
    #[error("Failed to build email: {0}")]
    BuildError(String),
    /// Failed to send email.
    #[error("Failed to send email: {0}")]
    SendError(String),
    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    /// Creates a new email service.
    #[must_use]
    pub const fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Creates an SMTP transport.
    fn create_transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, EmailError> {
        let creds = Credentials::new(
            self.config.smtp_username.clone(),
            self.config.smtp_password.clone(),
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.smtp_host)
            .map_err(|e| EmailError::SendError(e.to_string()))?
            .port(self.config.smtp_port)
            .credentials(creds)
            .build();
        Ok(transport)
    }

    fn from_mailbox(&self) -> Result<lettre::message::Mailbox, EmailError> {
        format!("{} <{}>", self.config.from_name, self.config.from_email)
            .parse()
            .map_err(|e| EmailError::InvalidAddress(format!("{e}")))
    }

    /// Sends an invoice email with the rendered PDF attached.
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be built or delivered.
    pub async fn send_invoice_email(
        &self,
        to_email: &str,
        invoice_number: &str,
        pdf_bytes: Vec<u8>,
    ) -> Result<(), EmailError> {
        let subject = format!("Invoice {invoice_number}");
        let body = format!(
            "Hello,\n\nPlease find attached invoice {invoice_number}.\n\nThank you for your business!"
        );

        let attachment = Attachment::new(format!("{invoice_number}.pdf")).body(
            pdf_bytes,
            ContentType::parse("application/pdf")
                .map_err(|e| EmailError::BuildError(e.to_string()))?,
        );

        let email = Message::builder()
            .from(self.from_mailbox()?)
            .to(to_email
                .parse()
                .map_err(|e| EmailError::InvalidAddress(format!("{e}")))?)
            .subject(subject)
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(body))
                    .singlepart(attachment),
            )
            .map_err(|e| EmailError::BuildError(e.to_string()))?;

        let transport = self.create_transport()?;
        transport
            .send(email)
            .await
            .map_err(|e| EmailError::SendError(e.to_string()))?;

        Ok(())
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_recipient() {
        let svc = EmailService::new(EmailConfig::default());
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let err = rt
            .block_on(svc.send_invoice_email("not an address", "INV-1-1000", Vec::new()))
            .unwrap_err();
        assert!(matches!(err, EmailError::InvalidAddress(_)));
    }
}
