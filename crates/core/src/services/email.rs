//! Outbound email through a hosted sending API.
//!
//! Messages are plain text. When no `[email]` section is configured the
//! service is disabled and sending is skipped.

use bizlist_common::{AppError, AppResult, config::EmailConfig};
use bizlist_db::entities::{enquiry, listing, user};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

/// An email ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text_body: String,
    pub reply_to: Option<String>,
}

/// Outcome of a send attempt.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailDeliveryResult {
    pub success: bool,
    pub message_id: Option<String>,
    pub error: Option<String>,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    from: String,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
}

/// Email service.
#[derive(Clone)]
pub struct EmailService {
    config: Option<EmailConfig>,
    http_client: reqwest::Client,
    site_url: String,
}

impl EmailService {
    /// Create a new email service. `site_url` is used for links in messages.
    #[must_use]
    pub fn new(config: Option<EmailConfig>, site_url: String) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            config,
            http_client,
            site_url,
        }
    }

    /// Whether an email API is configured.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.config.is_some()
    }

    /// Send a message through the configured API.
    pub async fn send(&self, message: &EmailMessage) -> AppResult<EmailDeliveryResult> {
        let config = self
            .config
            .as_ref()
            .ok_or_else(|| AppError::BadRequest("Email service not configured".to_string()))?;

        let body = SendRequest {
            from: format!("{} <{}>", config.from_name, config.from_address),
            to: [message.to.as_str()],
            subject: &message.subject,
            text: &message.text_body,
            reply_to: message.reply_to.as_deref(),
        };

        let response = self
            .http_client
            .post(&config.api_url)
            .bearer_auth(&config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Email request failed: {e}")))?;

        if response.status().is_success() {
            let message_id = response
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|v| v.get("id").and_then(|id| id.as_str()).map(String::from));

            debug!(to = %message.to, ?message_id, "Email sent");
            Ok(EmailDeliveryResult {
                success: true,
                message_id,
                error: None,
            })
        } else {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            warn!(to = %message.to, %status, "Email API rejected message");
            Ok(EmailDeliveryResult {
                success: false,
                message_id: None,
                error: Some(format!("{status}: {error_text}")),
            })
        }
    }

    /// Tell a broker about a new enquiry on one of their listings.
    ///
    /// Skipped silently when email is disabled.
    pub async fn notify_enquiry(
        &self,
        broker: &user::Model,
        listing: &listing::Model,
        enquiry: &enquiry::Model,
    ) -> AppResult<Option<EmailDeliveryResult>> {
        if !self.is_enabled() {
            debug!(enquiry_id = %enquiry.id, "Email disabled; skipping enquiry notification");
            return Ok(None);
        }

        let message = enquiry_notification(&self.site_url, broker, listing, enquiry);
        self.send(&message).await.map(Some)
    }
}

/// Plain-text notification sent to a broker for a new enquiry.
#[must_use]
pub fn enquiry_notification(
    site_url: &str,
    broker: &user::Model,
    listing: &listing::Model,
    enquiry: &enquiry::Model,
) -> EmailMessage {
    let phone = enquiry
        .phone
        .as_deref()
        .map(|p| format!("Phone: {p}\n"))
        .unwrap_or_default();

    let text_body = format!(
        "Hi {broker_name},\n\n\
         You have a new enquiry about \"{title}\".\n\n\
         From: {name} <{email}>\n\
         {phone}\n\
         {message}\n\n\
         View the listing: {site}/listings/{slug}\n",
        broker_name = broker.name,
        title = listing.title,
        name = enquiry.name,
        email = enquiry.email,
        message = enquiry.message,
        site = site_url.trim_end_matches('/'),
        slug = listing.slug,
    );

    EmailMessage {
        to: broker.email.clone(),
        subject: format!("New enquiry: {}", listing.title),
        text_body,
        reply_to: Some(enquiry.email.clone()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use bizlist_db::entities::{listing::ListingStatus, user::UserRole};
    use chrono::Utc;

    fn broker() -> user::Model {
        user::Model {
            id: "b1".to_string(),
            email: "broker@example.com".to_string(),
            password_hash: "hash".to_string(),
            token: None,
            name: "Sam".to_string(),
            agency_name: None,
            phone: None,
            role: UserRole::Broker,
            is_suspended: false,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn listing() -> listing::Model {
        let now = Utc::now();
        listing::Model {
            id: "l1".to_string(),
            slug: "corner-cafe-abc123".to_string(),
            broker_id: "b1".to_string(),
            category_id: None,
            title: "Corner Cafe".to_string(),
            summary: String::new(),
            description: String::new(),
            price_type: listing::PriceType::Poa,
            asking_price: None,
            revenue: None,
            profit: None,
            lease_description: None,
            location: "Hobart".to_string(),
            state: None,
            suburb: None,
            postcode: None,
            status: ListingStatus::Published,
            admin_removed_at: None,
            created_at: now.into(),
            updated_at: now.into(),
            published_at: Some(now.into()),
        }
    }

    fn enquiry(phone: Option<&str>) -> enquiry::Model {
        enquiry::Model {
            id: "e1".to_string(),
            listing_id: "l1".to_string(),
            broker_id: "b1".to_string(),
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            phone: phone.map(String::from),
            message: "Is the lease transferable?".to_string(),
            is_read: false,
            created_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_enquiry_notification() {
        let msg = enquiry_notification("https://bizlist.example/", &broker(), &listing(), &enquiry(Some("0400 000 000")));

        assert_eq!(msg.to, "broker@example.com");
        assert_eq!(msg.subject, "New enquiry: Corner Cafe");
        assert_eq!(msg.reply_to.as_deref(), Some("jane@example.com"));
        assert!(msg.text_body.contains("Jane <jane@example.com>"));
        assert!(msg.text_body.contains("Phone: 0400 000 000"));
        assert!(msg.text_body.contains("https://bizlist.example/listings/corner-cafe-abc123"));
    }

    #[test]
    fn test_enquiry_notification_without_phone() {
        let msg = enquiry_notification("https://bizlist.example", &broker(), &listing(), &enquiry(None));
        assert!(!msg.text_body.contains("Phone:"));
    }

    #[tokio::test]
    async fn test_disabled_skips() {
        let svc = EmailService::new(None, "https://bizlist.example".to_string());

        assert!(!svc.is_enabled());
        let result = svc
            .notify_enquiry(&broker(), &listing(), &enquiry(None))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_send_disabled_is_error() {
        let svc = EmailService::new(None, "https://bizlist.example".to_string());
        let msg = enquiry_notification("https://bizlist.example", &broker(), &listing(), &enquiry(None));

        assert!(matches!(svc.send(&msg).await, Err(AppError::BadRequest(_))));
    }
}
