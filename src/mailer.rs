//! Outbound invoice mail.
//!
//! All mail goes through one configured relay over implicit TLS. Login
//! credentials are supplied per call and are never persisted here; a fresh
//! connection is opened for every send and closed afterwards.

use lettre::message::{header::ContentType, Attachment, Mailbox, Message, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use serde::Deserialize;
use tracing::info;

use crate::config::AppConfig;
use crate::document::{format_amount, InvoiceDocument};
use crate::errors::ServiceError;

/// Per-call relay login. Mirrors the stored smtp_accounts row shape.
#[derive(Debug, Clone, Deserialize)]
pub struct SmtpCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Clone)]
pub struct Mailer {
    host: String,
    port: u16,
    currency_symbol: String,
}

impl Mailer {
    pub fn from_config(cfg: &AppConfig) -> Self {
        Self {
            host: cfg.smtp_host.clone(),
            port: cfg.smtp_port,
            currency_symbol: cfg.currency_symbol.clone(),
        }
    }

    fn transport(
        &self,
        creds: &SmtpCredentials,
    ) -> Result<AsyncSmtpTransport<Tokio1Executor>, ServiceError> {
        let tls = TlsParameters::new(self.host.clone())
            .map_err(|e| ServiceError::MailTransport(format!("TLS setup failed: {e}")))?;
        Ok(
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.host)
                .port(self.port)
                .tls(Tls::Wrapper(tls))
                .credentials(Credentials::new(
                    creds.email.clone(),
                    creds.password.clone(),
                ))
                .build(),
        )
    }

    /// Attempts a login against the relay without sending any mail.
    pub async fn verify_login(&self, creds: &SmtpCredentials) -> Result<(), ServiceError> {
        let transport = self.transport(creds)?;
        match transport.test_connection().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(ServiceError::Credential(
                "mail relay rejected the login".to_string(),
            )),
            Err(e) => Err(map_smtp_error(e)),
        }
    }

    /// Builds and delivers the invoice email, attaching the rendered PDF
    /// when one is supplied.
    pub async fn send_invoice(
        &self,
        doc: &InvoiceDocument,
        pdf_bytes: Option<Vec<u8>>,
        creds: &SmtpCredentials,
    ) -> Result<(), ServiceError> {
        let message = self.build_message(doc, pdf_bytes, creds)?;
        let transport = self.transport(creds)?;
        transport.send(message).await.map_err(map_smtp_error)?;
        info!(invoice_id = doc.id, to = %doc.client_email, "invoice email sent");
        Ok(())
    }

    fn build_message(
        &self,
        doc: &InvoiceDocument,
        pdf_bytes: Option<Vec<u8>>,
        creds: &SmtpCredentials,
    ) -> Result<Message, ServiceError> {
        let from: Mailbox = creds
            .email
            .parse()
            .map_err(|_| ServiceError::Validation("invalid sender address".to_string()))?;
        let to: Mailbox = doc
            .client_email
            .parse()
            .map_err(|_| ServiceError::Validation("invalid recipient address".to_string()))?;

        let subject = format!("Invoice #{} from {}", doc.id, doc.company_name);
        let body = format!(
            "Hello {},\n\n\
             Please find attached Invoice #{} dated {}.\n\
             Total Due: {}\n\n\
             Thank you for your business!\n\
             {}",
            doc.client_name,
            doc.id,
            doc.date,
            format_amount(&self.currency_symbol, doc.total),
            doc.company_name,
        );

        let builder = Message::builder().from(from).to(to).subject(subject);
        let message = match pdf_bytes {
            Some(bytes) => {
                let content_type = ContentType::parse("application/pdf")
                    .map_err(|e| ServiceError::Internal(format!("attachment content type: {e}")))?;
                let attachment = Attachment::new(doc.pdf_filename()).body(bytes, content_type);
                builder.multipart(
                    MultiPart::mixed()
                        .singlepart(SinglePart::plain(body))
                        .singlepart(attachment),
                )
            }
            None => builder.singlepart(SinglePart::plain(body)),
        }
        .map_err(|e| ServiceError::Internal(format!("failed to build email: {e}")))?;

        Ok(message)
    }
}

/// Permanent relay rejections are credential problems; everything else is a
/// transport failure.
fn map_smtp_error(e: lettre::transport::smtp::Error) -> ServiceError {
    if e.is_permanent() {
        ServiceError::Credential(e.to_string())
    } else {
        ServiceError::MailTransport(e.to_string())
    }
}
