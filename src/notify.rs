use std::sync::Arc;

use async_trait::async_trait;
use redis::AsyncCommands;
use tokio::task::JoinHandle;

use crate::models::Order;

/// Dispatcher settings, read from the environment at startup. An empty
/// `channel` means the destination is unconfigured and publishes are skipped.
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    pub enabled: bool,
    pub channel: String,
}

/// Publish seam for the external notification channel. The production
/// implementation talks to redis; tests substitute a recording channel.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    async fn publish(&self, channel: &str, subject: &str, body: &str) -> anyhow::Result<()>;
}

pub struct RedisChannel {
    client: redis::Client,
}

impl RedisChannel {
    pub fn new(redis_url: &str) -> anyhow::Result<Self> {
        let client = redis::Client::open(redis_url)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl NotificationChannel for RedisChannel {
    async fn publish(&self, channel: &str, subject: &str, body: &str) -> anyhow::Result<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let payload = serde_json::json!({ "subject": subject, "message": body }).to_string();
        let _: i64 = conn.publish(channel, payload).await?;
        Ok(())
    }
}

/// Best-effort, fire-and-forget delivery of order-event messages. Delivery
/// runs on a detached task; failures are logged and swallowed, never surfaced
/// to the calling workflow operation.
#[derive(Clone)]
pub struct Notifier {
    config: NotifierConfig,
    channel: Option<Arc<dyn NotificationChannel>>,
}

impl Notifier {
    pub fn new(config: NotifierConfig, channel: Option<Arc<dyn NotificationChannel>>) -> Self {
        Self { config, channel }
    }

    /// A notifier that never publishes; used when no channel client is wired.
    pub fn disabled() -> Self {
        Self {
            config: NotifierConfig {
                enabled: false,
                channel: String::new(),
            },
            channel: None,
        }
    }

    pub fn notify(&self, order: &Order, message: &str) {
        let _ = self.dispatch(order, message);
    }

    pub fn notify_bulk(&self, message: &str) {
        let _ = self.dispatch_bulk(message);
    }

    fn dispatch(&self, order: &Order, message: &str) -> Option<JoinHandle<()>> {
        let order_id = order
            .id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".into());

        if !self.config.enabled {
            tracing::info!(
                order_id = %order_id,
                customer = order.customer_name.as_deref().unwrap_or("-"),
                message,
                "notifications disabled, would send"
            );
            return None;
        }

        let Some(channel) = self.channel.clone() else {
            tracing::warn!(order_id = %order_id, "notification channel not configured, skipping");
            return None;
        };
        if self.config.channel.is_empty() {
            tracing::warn!(order_id = %order_id, "notification channel not configured, skipping");
            return None;
        }

        let destination = self.config.channel.clone();
        let subject = format!("Order Update - {order_id}");
        let body = build_order_message(order, message);

        Some(tokio::spawn(async move {
            match channel.publish(&destination, &subject, &body).await {
                Ok(()) => tracing::info!(order_id = %order_id, "notification sent"),
                Err(err) => {
                    tracing::error!(order_id = %order_id, error = %err, "failed to send notification")
                }
            }
        }))
    }

    fn dispatch_bulk(&self, message: &str) -> Option<JoinHandle<()>> {
        if !self.config.enabled || self.config.channel.is_empty() {
            tracing::info!(message, "bulk notification disabled or not configured");
            return None;
        }
        let Some(channel) = self.channel.clone() else {
            tracing::info!(message, "bulk notification disabled or not configured");
            return None;
        };

        let destination = self.config.channel.clone();
        let body = message.to_string();

        Some(tokio::spawn(async move {
            match channel
                .publish(&destination, "System Notification", &body)
                .await
            {
                Ok(()) => tracing::info!("bulk notification sent"),
                Err(err) => tracing::error!(error = %err, "failed to send bulk notification"),
            }
        }))
    }
}

/// Message body built from the order's current state plus the caller-supplied
/// free text.
fn build_order_message(order: &Order, message: &str) -> String {
    format!(
        "Order Update\n\
         Order ID: {}\n\
         Customer: {}\n\
         Email: {}\n\
         Status: {}\n\
         Total Amount: ${:.2}\n\
         Message: {}\n\
         Time: {}",
        order.id.map(|id| id.to_string()).unwrap_or_else(|| "-".into()),
        order.customer_name.as_deref().unwrap_or("-"),
        order.customer_email.as_deref().unwrap_or("-"),
        order.status.display_label(),
        order.total_amount,
        message,
        order.updated_at,
    )
}
