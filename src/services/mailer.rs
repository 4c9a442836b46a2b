use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::Result;

/// A rendered message. Every email carries both an HTML and a plain-text body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// One outbound transport. Implementations report failure through the
/// return value and never panic or error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailChannel: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> bool;
}

#[derive(Serialize)]
struct RelayPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
    text: &'a str,
}

/// Posts messages as JSON to a transactional mail relay.
#[derive(Clone)]
pub struct HttpMailChannel {
    label: &'static str,
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    from: String,
}

impl HttpMailChannel {
    pub fn new(
        label: &'static str,
        client: Client,
        endpoint: String,
        api_key: Option<String>,
        from: String,
    ) -> Self {
        Self {
            label,
            client,
            endpoint,
            api_key,
            from,
        }
    }
}

#[async_trait]
impl MailChannel for HttpMailChannel {
    async fn send(&self, email: &OutgoingEmail) -> bool {
        let payload = RelayPayload {
            from: &self.from,
            to: &email.to,
            subject: &email.subject,
            html: &email.html,
            text: &email.text,
        };
        let mut request = self.client.post(&self.endpoint).json(&payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        match request.send().await {
            Ok(resp) if resp.status().is_success() => {
                info!(channel = self.label, to = %email.to, subject = %email.subject, "Email sent");
                true
            }
            Ok(resp) => {
                let status = resp.status();
                let body = resp.text().await.unwrap_or_default();
                warn!(channel = self.label, to = %email.to, %status, body = %body, "Mail relay rejected message");
                false
            }
            Err(err) => {
                warn!(channel = self.label, to = %email.to, error = %err, "Mail relay unreachable");
                false
            }
        }
    }
}

/// Writes messages to the log instead of sending them.
#[derive(Clone, Copy, Default)]
pub struct LogMailChannel;

#[async_trait]
impl MailChannel for LogMailChannel {
    async fn send(&self, email: &OutgoingEmail) -> bool {
        info!(to = %email.to, subject = %email.subject, "Email (log channel)\n{}", email.text);
        true
    }
}

#[derive(Debug, Default)]
struct DeliveryStats {
    sent: AtomicU64,
    failed: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeliverySnapshot {
    pub sent: u64,
    pub failed: u64,
}

/// Fans a message out to every configured channel.
#[derive(Clone)]
pub struct Notifier {
    channels: Arc<[Arc<dyn MailChannel>]>,
    stats: Arc<DeliveryStats>,
}

impl Notifier {
    pub fn new(channels: Vec<Arc<dyn MailChannel>>) -> Self {
        Self {
            channels: channels.into(),
            stats: Arc::new(DeliveryStats::default()),
        }
    }

    pub fn from_config(config: &Config, client: Client) -> Self {
        let mut channels: Vec<Arc<dyn MailChannel>> = Vec::new();
        if let Some(url) = &config.mail_relay_url {
            info!(endpoint = %url, "Mail relay enabled");
            channels.push(Arc::new(HttpMailChannel::new(
                "relay",
                client.clone(),
                url.clone(),
                config.mail_relay_api_key.clone(),
                config.mail_from.clone(),
            )));
        }
        if let Some(url) = &config.mail_dev_relay_url {
            info!(endpoint = %url, "Development mail relay enabled");
            channels.push(Arc::new(HttpMailChannel::new(
                "dev-relay",
                client,
                url.clone(),
                None,
                config.mail_from.clone(),
            )));
        }
        if channels.is_empty() {
            info!("No mail relay configured; emails will only be logged");
            channels.push(Arc::new(LogMailChannel));
        }
        Self::new(channels)
    }

    /// True only when every channel accepted the message. Never errors.
    pub async fn send(&self, email: &OutgoingEmail) -> bool {
        if email.to.trim().is_empty() || self.channels.is_empty() {
            warn!(subject = %email.subject, "Email skipped: no recipient or no channel");
            self.stats.failed.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        let mut delivered = true;
        for channel in self.channels.iter() {
            if !channel.send(email).await {
                delivered = false;
            }
        }

        if delivered {
            self.stats.sent.fetch_add(1, Ordering::Relaxed);
        } else {
            self.stats.failed.fetch_add(1, Ordering::Relaxed);
        }
        delivered
    }

    pub fn stats(&self) -> DeliverySnapshot {
        DeliverySnapshot {
            sent: self.stats.sent.load(Ordering::Relaxed),
            failed: self.stats.failed.load(Ordering::Relaxed),
        }
    }
}

/// Awaits a side effect whose failure must not fail the enclosing request.
/// The error is logged and dropped.
pub async fn best_effort<T, F>(operation: &str, fut: F) -> Option<T>
where
    F: Future<Output = Result<T>>,
{
    match fut.await {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(operation, error = %err, "Best-effort step failed; continuing");
            None
        }
    }
}
