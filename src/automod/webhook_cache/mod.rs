//! Per-channel cache of the webhook used to republish redacted messages.
//!
//! Each channel id maps to its own async mutex slot. The outer map is guarded by a
//! synchronous lock that is only held to sweep expired entries and to clone a slot handle,
//! never across an await, so a slow Discord call for one channel never stalls another.
//! Holding a channel's slot lock for the whole list/create sequence is what prevents
//! concurrent acquisitions from creating duplicate webhooks.

use crate::errors::{BarnacleError, BarnacleResult};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// How long a cached webhook is reused before the channel is listed again.
pub const DEFAULT_WEBHOOK_TTL: Duration = Duration::from_secs(15 * 60);

/// Name given to webhooks this service creates.
pub const DEFAULT_WEBHOOK_NAME: &str = "Barnacle Automod";

/// A webhook that can be executed: id plus its secret token.
#[derive(Clone, PartialEq, Eq)]
pub struct DeliveryIdentity {
    pub id: String,
    pub token: String,
}

impl std::fmt::Debug for DeliveryIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeliveryIdentity")
            .field("id", &self.id)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// A webhook as listed or created by the directory. Webhooks owned by other applications
/// come back without a token.
#[derive(Clone, PartialEq, Eq, serde::Deserialize)]
pub struct WebhookRecord {
    pub id: String,
    #[serde(default)]
    pub token: Option<String>,
}

impl std::fmt::Debug for WebhookRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookRecord")
            .field("id", &self.id)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl WebhookRecord {
    fn usable_token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }

    fn into_identity(self) -> Option<DeliveryIdentity> {
        let token = self.usable_token()?.to_string();
        Some(DeliveryIdentity { id: self.id, token })
    }
}

#[async_trait]
pub trait ChannelIdentityDirectory: Send + Sync {
    async fn list(&self, channel_id: &str) -> Result<Vec<WebhookRecord>>;
    async fn create(&self, channel_id: &str, name: &str) -> Result<WebhookRecord>;
}

struct CacheEntry {
    identity: DeliveryIdentity,
    fetched_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.fetched_at) <= ttl
    }
}

type Slot = Arc<tokio::sync::Mutex<Option<CacheEntry>>>;

pub struct WebhookCache {
    directory: Arc<dyn ChannelIdentityDirectory>,
    webhook_name: String,
    ttl: Duration,
    slots: Mutex<HashMap<String, Slot>>,
}

impl WebhookCache {
    pub fn new(directory: Arc<dyn ChannelIdentityDirectory>) -> Self {
        Self::with_settings(directory, DEFAULT_WEBHOOK_NAME, DEFAULT_WEBHOOK_TTL)
    }

    pub fn with_settings(
        directory: Arc<dyn ChannelIdentityDirectory>,
        webhook_name: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        Self {
            directory,
            webhook_name: webhook_name.into(),
            ttl,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Return a usable webhook for `channel_id`, listing or creating one when nothing fresh
    /// is cached.
    pub async fn acquire(&self, channel_id: &str) -> BarnacleResult<DeliveryIdentity> {
        let slot = self.slot_for(channel_id)?;
        let mut entry = slot.lock().await;

        if let Some(cached) = entry.as_ref()
            && cached.is_fresh(Instant::now(), self.ttl)
        {
            debug!(channel_id, "reusing cached webhook {}", cached.identity.id);
            return Ok(cached.identity.clone());
        }

        let identity = self.fetch_or_create(channel_id).await?;
        *entry = Some(CacheEntry {
            identity: identity.clone(),
            fetched_at: Instant::now(),
        });
        Ok(identity)
    }

    /// Number of channels with a cached webhook or an acquisition in flight.
    pub fn tracked_channels(&self) -> usize {
        self.slots.lock().map(|slots| slots.len()).unwrap_or(0)
    }

    /// Sweep expired entries, then hand out the channel's slot, creating it if needed.
    fn slot_for(&self, channel_id: &str) -> BarnacleResult<Slot> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|_| BarnacleError::Acquisition("webhook cache lock poisoned".into()))?;

        let now = Instant::now();
        let ttl = self.ttl;
        slots.retain(|_, slot| {
            // Another task holds this handle; dropping it would let a second slot appear for
            // the same channel.
            if Arc::strong_count(slot) > 1 {
                return true;
            }
            slot.try_lock()
                .map_or(true, |entry| entry.as_ref().is_some_and(|e| e.is_fresh(now, ttl)))
        });

        Ok(slots.entry(channel_id.to_string()).or_default().clone())
    }

    async fn fetch_or_create(&self, channel_id: &str) -> BarnacleResult<DeliveryIdentity> {
        let existing = self
            .directory
            .list(channel_id)
            .await
            .map_err(|e| BarnacleError::Acquisition(format!("listing webhooks: {:#}", e)))?;

        if let Some(identity) = existing.into_iter().find_map(WebhookRecord::into_identity) {
            debug!(channel_id, "using existing webhook {}", identity.id);
            return Ok(identity);
        }

        let created = self
            .directory
            .create(channel_id, &self.webhook_name)
            .await
            .map_err(|e| BarnacleError::Acquisition(format!("creating webhook: {:#}", e)))?;
        let created_id = created.id.clone();
        match created.into_identity() {
            Some(identity) => {
                info!(channel_id, "created webhook {}", identity.id);
                Ok(identity)
            }
            None => {
                warn!(channel_id, "created webhook {} has no token", created_id);
                Err(BarnacleError::Acquisition(format!(
                    "webhook {} token missing",
                    created_id
                )))
            }
        }
    }
}
