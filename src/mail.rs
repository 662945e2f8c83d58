//! Outbound invoice mail.
//!
//! Emails go out through a JSON HTTP mail API (Resend-compatible). The
//! `Mailer` trait keeps the transport swappable; tests use a recording
//! implementation and deployments without an API key fall back to
//! `NoopMailer`, which only logs.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("mail API rejected the message: {status} {body}")]
    Rejected { status: u16, body: String },
}

/// A fully rendered message, ready for the transport.
#[derive(Debug, Clone, Serialize)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError>;
}

/// Mail API request payload (Resend wire format).
#[derive(Debug, Serialize)]
struct MailPayload<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

pub struct HttpMailer {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl HttpMailer {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        let payload = MailPayload {
            from: &email.from,
            to: [email.to.as_str()],
            subject: &email.subject,
            html: &email.html,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(to = %email.to, subject = %email.subject, "invoice mail sent");
        Ok(())
    }
}

/// Drops messages on the floor. Used when no mail API key is configured.
pub struct NoopMailer;

#[async_trait]
impl Mailer for NoopMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        tracing::warn!(to = %email.to, subject = %email.subject, "mailer disabled, dropping invoice mail");
        Ok(())
    }
}

/// Compile the bundled mail templates.
pub fn build_templates() -> tera::Result<tera::Tera> {
    let mut tera = tera::Tera::default();
    tera.add_raw_template("invoice.html", include_str!("../templates/invoice.html"))?;
    Ok(tera)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tera::Context;

    #[test]
    fn invoice_template_renders_rows_and_total() {
        let tera = build_templates().expect("templates compile");

        let mut ctx = Context::new();
        ctx.insert("customer_name", "Anna Andersson");
        ctx.insert("customer_organization", "Blåshjuden");
        ctx.insert("customer_pid", "9001011234");
        ctx.insert("invoice_number", &100005i64);
        ctx.insert("invoice_ocr", "1000054");
        ctx.insert("sent_date", "2026-08-29");
        ctx.insert("due_date", "2026-09-12");
        ctx.insert(
            "products",
            &serde_json::json!([
                { "item_name": "Festival pass", "num_items": 2, "item_price": 50000, "row_total": 100000 },
            ]),
        );
        ctx.insert("invoice_total", &100000i64);

        let html = tera.render("invoice.html", &ctx).expect("renders");
        assert!(html.contains("Anna Andersson"));
        assert!(html.contains("1000054"));
        assert!(html.contains("Festival pass"));
    }
}
