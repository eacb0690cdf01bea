use std::env;
use std::time::Duration;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub ws_url: String,
    pub log_level: String,
    pub reconnect_delay_ms: u64,
    pub active_window_minutes: i64,
    pub activity_recompute_secs: u64,
    pub threshold_scan_secs: u64,
    pub alert_ttl_ms: u64,
    pub alert_sweep_secs: u64,
    pub event_buffer_size: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let _ = dotenvy::dotenv();

        Ok(Self {
            api_base_url: env::var("API_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            ws_url: env::var("WS_URL")
                .unwrap_or_else(|_| "ws://localhost:8000/ws/dashboard".to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            reconnect_delay_ms: parse_or_default("RECONNECT_DELAY_MS", 5000)?,
            active_window_minutes: parse_or_default("ACTIVE_WINDOW_MINUTES", 10)?,
            activity_recompute_secs: parse_or_default("ACTIVITY_RECOMPUTE_SECS", 15)?,
            threshold_scan_secs: parse_or_default("THRESHOLD_SCAN_SECS", 30)?,
            alert_ttl_ms: parse_or_default("ALERT_TTL_MS", 5000)?,
            alert_sweep_secs: parse_or_default("ALERT_SWEEP_SECS", 1)?,
            event_buffer_size: parse_or_default("EVENT_BUFFER_SIZE", 1024)?,
        })
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    pub fn active_window(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.active_window_minutes)
    }

    pub fn activity_recompute_period(&self) -> Duration {
        Duration::from_secs(self.activity_recompute_secs)
    }

    pub fn threshold_scan_period(&self) -> Duration {
        Duration::from_secs(self.threshold_scan_secs)
    }

    pub fn alert_ttl(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(self.alert_ttl_ms as i64)
    }

    pub fn alert_sweep_period(&self) -> Duration {
        Duration::from_secs(self.alert_sweep_secs)
    }
}

fn parse_or_default<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|err| AppError::Config(format!("invalid {key}: {err}"))),
        Err(_) => Ok(default),
    }
}
