//! Client configuration.

use std::time::Duration;

use certverify_core::AppConfig;
use certverify_insight::InsightConfig;
use certverify_rpc::{GatewayConfig, DEFAULT_POLL_INTERVAL};

use crate::session::Role;

/// Configuration for the [`App`](crate::App).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Initial contract address and RPC URL; editable at runtime.
    pub app: AppConfig,
    /// Role the session starts in.
    pub role: Role,
    /// Delay between block height fetches.
    pub poll_interval: Duration,
    /// Delay between receipt lookups while an issuance is pending.
    pub receipt_poll_interval: Duration,
    /// Whether the block poller runs at all.
    pub polling_enabled: bool,
    /// Text-generation service settings.
    pub insight: InsightConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            app: AppConfig::default(),
            role: Role::default(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            receipt_poll_interval: GatewayConfig::default().receipt_poll_interval,
            polling_enabled: true,
            insight: InsightConfig::default(),
        }
    }
}

impl ClientConfig {
    pub fn gateway(&self) -> GatewayConfig {
        GatewayConfig {
            receipt_poll_interval: self.receipt_poll_interval,
            ..GatewayConfig::default()
        }
    }
}
