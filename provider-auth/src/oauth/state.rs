//! CSRF state management for OAuth flows.
//!
//! Each provider owns one [`StateManager`]. Entries are consumed at most once
//! and expire a fixed time after issuance, either lazily when a callback
//! presents them or when the reaper task sweeps the map.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use log::*;
use rand::Rng;
use tokio::task::JoinHandle;

use super::{PkceVerifier, ProviderKind};

/// How long an authorization attempt stays redeemable.
pub const DEFAULT_STATE_TTL: Duration = Duration::from_secs(5 * 60);

/// Longest TTL a store accepts; larger values are clamped to this.
pub const MAX_STATE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// An outstanding authorization attempt.
#[derive(Debug, Clone)]
pub struct PendingAuth {
    /// The state token sent to the provider.
    pub nonce: String,
    /// Provider the attempt was started against.
    pub provider: ProviderKind,
    /// PKCE verifier, present only for providers that use PKCE.
    pub verifier: Option<PkceVerifier>,
    /// When the attempt was started.
    pub created_at: DateTime<Utc>,
    expires_at: Instant,
}

impl PendingAuth {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Issue and redeem one-time state tokens.
pub trait StateStore: Send + Sync {
    /// Register a new authorization attempt and return its state token.
    fn issue(&self, verifier: Option<PkceVerifier>) -> String;

    /// Redeem a state token.
    ///
    /// Returns `None` when the token was never issued, has expired or was
    /// already redeemed. Of any number of concurrent callers presenting the
    /// same token, exactly one receives `Some`.
    fn consume(&self, nonce: &str) -> Option<PendingAuth>;
}

/// Manager for OAuth state parameters with expiration.
///
/// Generates and validates CSRF state tokens to prevent cross-site request forgery attacks.
#[derive(Clone)]
pub struct StateManager {
    provider: ProviderKind,
    states: Arc<RwLock<HashMap<String, PendingAuth>>>,
    ttl: Duration,
}

impl StateManager {
    /// Create a new state manager with the default TTL of 5 minutes.
    pub fn new(provider: ProviderKind) -> Self {
        Self::with_ttl(provider, DEFAULT_STATE_TTL)
    }

    /// Create a new state manager with custom TTL, clamped to [`MAX_STATE_TTL`].
    pub fn with_ttl(provider: ProviderKind, ttl: Duration) -> Self {
        if ttl > MAX_STATE_TTL {
            warn!(
                "{provider} login state TTL of {}s exceeds the maximum, using {}s",
                ttl.as_secs(),
                MAX_STATE_TTL.as_secs()
            );
        }

        Self {
            provider,
            states: Arc::new(RwLock::new(HashMap::new())),
            ttl: ttl.min(MAX_STATE_TTL),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Provider this store issues state for.
    pub fn provider(&self) -> ProviderKind {
        self.provider
    }

    /// Number of outstanding attempts, expired ones included until purged.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Remove every expired entry and return how many were dropped.
    ///
    /// Entries already redeemed are simply absent, so sweeping never races
    /// with a successful callback.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut states = self.write();
        let before = states.len();
        states.retain(|_, pending| !pending.is_expired(now));
        before - states.len()
    }

    /// Spawn the single background task that sweeps expired entries.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn_reaper(&self, every: Duration) -> JoinHandle<()> {
        let manager = self.clone();
        let every = every.max(Duration::from_millis(1));

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let purged = manager.purge_expired();
                if purged > 0 {
                    debug!(
                        "Purged {} expired {} login state(s), {} pending",
                        purged,
                        manager.provider,
                        manager.len()
                    );
                }
            }
        })
    }

    /// Generate a cryptographically random state token.
    fn generate_token() -> String {
        let random_bytes: [u8; 32] = rand::thread_rng().gen();
        hex::encode(random_bytes)
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, PendingAuth>> {
        self.states.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, PendingAuth>> {
        self.states.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StateStore for StateManager {
    fn issue(&self, verifier: Option<PkceVerifier>) -> String {
        let created_at = Utc::now();
        let now = Instant::now();
        let expires_at = now
            .checked_add(self.ttl)
            .unwrap_or_else(|| now + DEFAULT_STATE_TTL);

        let mut states = self.write();
        loop {
            let nonce = Self::generate_token();
            if let Entry::Vacant(slot) = states.entry(nonce.clone()) {
                slot.insert(PendingAuth {
                    nonce: nonce.clone(),
                    provider: self.provider,
                    verifier,
                    created_at,
                    expires_at,
                });
                return nonce;
            }
        }
    }

    fn consume(&self, nonce: &str) -> Option<PendingAuth> {
        // Remove under the write lock so only one caller can ever observe the entry.
        let pending = self.write().remove(nonce)?;

        if pending.is_expired(Instant::now()) {
            debug!("Rejecting expired {} login state", self.provider);
            return None;
        }
        Some(pending)
    }
}
