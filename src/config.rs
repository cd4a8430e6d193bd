use std::env;

use crate::notify::NotifierConfig;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub redis_url: String,
    pub notifications: NotifierConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let redis_url = env::var("REDIS_URL").unwrap_or_default();
        let notifications = NotifierConfig {
            enabled: env::var("NOTIFICATIONS_ENABLED")
                .ok()
                .and_then(|v| v.parse::<bool>().ok())
                .unwrap_or(false),
            // Empty channel means "unconfigured": publishes are skipped.
            channel: env::var("NOTIFICATION_CHANNEL").unwrap_or_default(),
        };
        Ok(Self {
            database_url,
            host,
            port,
            redis_url,
            notifications,
        })
    }
}
