//! Contact form proxy: forwards submissions to the spreadsheet web-hook.

pub mod classifier;

use secrecy::ExposeSecret;
use tracing::{error, info, warn};

use crate::config::ContactSettings;
use crate::error::{AppError, AppResult};
use crate::models::ContactRequest;

pub use classifier::{ContactOutcome, classify_response};

pub const MSG_NOT_CONFIGURED: &str = "The contact form is not configured.";
pub const MSG_TIMEOUT: &str = "The request timed out. Please try again.";

/// Web-hook client with retry on rate limiting and transport errors.
#[derive(Clone)]
pub struct ContactProxy {
    client: reqwest::Client,
    settings: ContactSettings,
}

impl ContactProxy {
    pub fn new(settings: ContactSettings) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.timeout)
            .timeout(settings.timeout)
            .build()?;

        Ok(Self { client, settings })
    }

    /// Check the form, forward it, and classify the reply.
    pub async fn submit(&self, form: &ContactRequest) -> AppResult<ContactOutcome> {
        let name = form.name.trim();
        let email = form.email.trim();
        let message = form.message.trim();

        if name.is_empty() || email.is_empty() || message.is_empty() {
            return Err(AppError::InvalidInput(
                "name, email and message are all required".to_string(),
            ));
        }

        let Some(url) = self.settings.webhook_url.as_ref() else {
            error!("Contact web-hook URL is not configured");
            return Ok(ContactOutcome::failed(500, MSG_NOT_CONFIGURED));
        };

        let params = [("name", name), ("email", email), ("message", message)];
        let mut delay = self.settings.retry_delay;
        let mut attempt = 0;

        loop {
            let result = self
                .client
                .post(url.expose_secret())
                .form(&params)
                .send()
                .await;

            match result {
                Ok(response) => {
                    let status = response.status().as_u16();
                    if status == 429 && attempt < self.settings.max_retries {
                        attempt += 1;
                        warn!(
                            attempt,
                            max_retries = self.settings.max_retries,
                            delay_ms = delay.as_millis() as u64,
                            "Contact web-hook rate limited, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        delay *= 2;
                        continue;
                    }

                    let body = match response.text().await {
                        Ok(body) => body,
                        Err(e) => {
                            warn!(status, error = %e, "Could not read contact web-hook reply body");
                            String::new()
                        }
                    };
                    let outcome = classify_response(status, &body);
                    info!(status, delivered = outcome.is_delivered(), "Contact web-hook replied");
                    return Ok(outcome);
                }
                Err(e) if attempt < self.settings.max_retries => {
                    attempt += 1;
                    warn!(
                        attempt,
                        error = %e,
                        delay_ms = delay.as_millis() as u64,
                        "Contact web-hook request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
                Err(e) if e.is_timeout() => {
                    error!("Contact web-hook request timed out");
                    return Ok(ContactOutcome::failed(500, MSG_TIMEOUT));
                }
                Err(e) => {
                    error!(error = %e, "Contact web-hook request failed");
                    return Ok(ContactOutcome::failed(
                        500,
                        "The message could not be sent. Please try again later.",
                    ));
                }
            }
        }
    }
}
