use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use crate::config::ContactConfig;
use crate::contact::form::ContactForm;
use crate::utils::sanitize::{sanitize_html, sanitize_text};
use crate::{Error, Result};

/// Sends contact messages through the Resend REST API
#[derive(Clone)]
pub struct ContactMailer {
    client: Client,
    endpoint: Url,
    api_key: String,
    from: String,
    to: String,
}

#[derive(Debug, Serialize)]
struct OutgoingEmail<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: String,
    reply_to: &'a str,
    html: String,
}

impl ContactMailer {
    /// `None` when no API key or recipient is configured
    pub fn from_config(config: &ContactConfig) -> Result<Option<Self>> {
        let (Some(api_key), Some(to)) = (&config.resend_api_key, &config.to_address) else {
            return Ok(None);
        };

        let mut endpoint = Url::parse(&config.resend_api_url)?;
        endpoint
            .path_segments_mut()
            .map_err(|_| Error::Config("Resend API URL cannot be a base".to_string()))?
            .pop_if_empty()
            .push("emails");

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Some(Self {
            client,
            endpoint,
            api_key: api_key.clone(),
            from: config.from_address.clone(),
            to: to.clone(),
        }))
    }

    pub async fn send(&self, form: &ContactForm) -> Result<()> {
        let email = OutgoingEmail {
            from: &self.from,
            to: [&self.to],
            subject: format!("New message from {}: {}", form.name.trim(), form.subject.trim()),
            reply_to: form.email.trim(),
            html: render_html(form),
        };

        debug!("Sending contact email via {}", self.endpoint);
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&email)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Mail(format!("mail API returned {status}")));
        }

        info!("Contact email sent");
        Ok(())
    }
}

/// Email body with every submitted value escaped
pub fn render_html(form: &ContactForm) -> String {
    let message = sanitize_text(&form.message).replace('\n', "<br>");
    let html = format!(
        "<p><strong>Name:</strong> {}</p>\
         <p><strong>Email:</strong> {}</p>\
         <p><strong>Subject:</strong> {}</p>\
         <p><strong>Message:</strong></p>\
         <p>{}</p>",
        sanitize_text(&form.name),
        sanitize_text(&form.email),
        sanitize_text(&form.subject),
        message
    );
    sanitize_html(&html)
}
