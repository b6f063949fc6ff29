//! Interprets the spreadsheet web-hook's reply.
//!
//! The web-hook is a script deployment that answers with a JSON body, a bare
//! "Success" string, or an HTML error page depending on its version and
//! deployment settings.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use tracing::{error, info, warn};

static HTML_PAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<!doctype\s+html|<html[\s>]").expect("html page regex"));
static TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("title regex"));
static ERROR_MESSAGE_DIV: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<div[^>]*\bclass\s*=\s*["'][^"']*\berrorMessage\b[^"']*["'][^>]*>(.*?)</div>"#)
        .expect("errorMessage regex")
});
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag regex"));

/// Characters of an unexpected body echoed back to the client.
const BODY_EXCERPT_LEN: usize = 200;

pub const MSG_SENT: &str = "Your message was sent successfully.";
pub const MSG_SENT_UNCONFIRMED: &str = "Your message was sent (delivery could not be confirmed).";
pub const MSG_UNAUTHORIZED: &str =
    "The contact sheet rejected the request as unauthorized. Check the web app deployment access settings.";
pub const MSG_RATE_LIMITED: &str =
    "Too many requests right now. Please try again in a few minutes.";
pub const MSG_UPSTREAM_ERROR: &str =
    "The contact sheet service had an error. Please try again later.";
pub const MSG_FORBIDDEN: &str =
    "Access to the contact sheet was denied. Check the deployment settings.";
pub const MSG_NOT_FOUND: &str = "The contact sheet URL was not found. Check the configured URL.";

/// What the contact endpoint should answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactOutcome {
    Delivered { message: String },
    Failed { status: u16, error: String },
}

impl ContactOutcome {
    fn delivered(message: &str) -> Self {
        Self::Delivered {
            message: message.to_string(),
        }
    }

    pub fn failed(status: u16, error: impl Into<String>) -> Self {
        Self::Failed {
            status,
            error: error.into(),
        }
    }

    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }
}

#[derive(Deserialize)]
struct WebhookReply {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Map the final web-hook status and body to an outcome.
pub fn classify_response(status: u16, body: &str) -> ContactOutcome {
    let text = body.trim();
    let html = is_html_page(text);

    if html {
        error!(
            status,
            title = %extract_title(text).unwrap_or_default(),
            detail = %extract_error_message(text).unwrap_or_default(),
            "Contact web-hook returned an HTML page"
        );
    }

    match status {
        401 => ContactOutcome::failed(401, MSG_UNAUTHORIZED),
        429 => {
            warn!("Contact web-hook rate limit persisted after retries");
            ContactOutcome::failed(429, MSG_RATE_LIMITED)
        }
        200 | 302 => classify_success_body(text, html),
        s if s >= 500 => ContactOutcome::failed(s, MSG_UPSTREAM_ERROR),
        403 => ContactOutcome::failed(403, MSG_FORBIDDEN),
        404 => ContactOutcome::failed(404, MSG_NOT_FOUND),
        s => ContactOutcome::failed(s, format!("Sending failed (status code: {})", s)),
    }
}

fn classify_success_body(text: &str, html: bool) -> ContactOutcome {
    let reply = if text.starts_with('{') {
        serde_json::from_str::<WebhookReply>(text).ok()
    } else {
        None
    };

    if let Some(reply) = reply {
        if reply.success {
            info!("Contact web-hook confirmed delivery");
            return ContactOutcome::delivered(MSG_SENT);
        }

        let error = reply.error.unwrap_or_else(|| "unknown error".to_string());
        // The script stores the row before failing on setHeaders
        if error.contains("setHeaders") {
            warn!(error = %error, "Contact web-hook reported setHeaders error");
            return ContactOutcome::delivered(MSG_SENT_UNCONFIRMED);
        }

        error!(error = %error, "Contact web-hook reported an error");
        return ContactOutcome::failed(500, format!("Contact sheet error: {}", error));
    }

    if !html && text.to_lowercase().contains("success") {
        info!("Contact web-hook acknowledged delivery");
        return ContactOutcome::delivered(MSG_SENT);
    }

    let excerpt: String = text.chars().take(BODY_EXCERPT_LEN).collect();
    error!(body = %excerpt, "Unexpected contact web-hook reply");
    ContactOutcome::failed(
        500,
        format!("Unexpected reply from the contact sheet: {}", excerpt),
    )
}

fn is_html_page(text: &str) -> bool {
    let head: String = text.chars().take(512).collect();
    HTML_PAGE.is_match(&head)
}

/// Contents of the first `<title>` element.
pub fn extract_title(html: &str) -> Option<String> {
    TITLE
        .captures(html)
        .map(|c| c[1].trim().to_string())
}

/// Text of the `errorMessage` div, tags stripped.
pub fn extract_error_message(html: &str) -> Option<String> {
    let inner = ERROR_MESSAGE_DIV.captures(html)?;
    Some(TAG.replace_all(&inner[1], "").trim().to_string())
}
