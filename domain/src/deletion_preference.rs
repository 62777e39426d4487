//! "Do not retain my chat logs" preferences.
//!
//! A stored row keyed by login name and service means the downstream log
//! processors drop that user's messages. Both toggles are idempotent.

use async_trait::async_trait;
use entity_api::{deletion_preference, Service};
use log::*;
use provider_auth::oauth::ProviderKind;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::error::Error;
use crate::jwt::SessionClaims;

/// Storage for deletion preferences.
#[async_trait]
pub trait Store: Send + Sync {
    async fn add_user(&self, name: &str, service: Service) -> Result<(), Error>;
    async fn delete_user(&self, name: &str, service: Service) -> Result<(), Error>;
    async fn exists(&self, name: &str, service: Service) -> Result<bool, Error>;
}

/// Preferences persisted in Postgres.
#[derive(Clone)]
pub struct DbStore {
    db: Arc<DatabaseConnection>,
}

impl DbStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Store for DbStore {
    async fn add_user(&self, name: &str, service: Service) -> Result<(), Error> {
        Ok(deletion_preference::add(&self.db, name, service).await?)
    }

    async fn delete_user(&self, name: &str, service: Service) -> Result<(), Error> {
        Ok(deletion_preference::delete(&self.db, name, service).await?)
    }

    async fn exists(&self, name: &str, service: Service) -> Result<bool, Error> {
        Ok(deletion_preference::exists(&self.db, name, service).await?)
    }
}

#[cfg(any(test, feature = "mock"))]
pub use memory::MemoryStore;

#[cfg(any(test, feature = "mock"))]
mod memory {
    use super::*;
    use std::collections::HashSet;
    use std::sync::{Mutex, MutexGuard, PoisonError};

    /// Process-local store for tests.
    #[derive(Default)]
    pub struct MemoryStore {
        entries: Mutex<HashSet<(String, Service)>>,
    }

    impl MemoryStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn len(&self) -> usize {
            self.entries().len()
        }

        pub fn is_empty(&self) -> bool {
            self.entries().is_empty()
        }

        fn entries(&self) -> MutexGuard<'_, HashSet<(String, Service)>> {
            self.entries.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }

    #[async_trait]
    impl Store for MemoryStore {
        async fn add_user(&self, name: &str, service: Service) -> Result<(), Error> {
            self.entries().insert((name.to_string(), service));
            Ok(())
        }

        async fn delete_user(&self, name: &str, service: Service) -> Result<(), Error> {
            self.entries().remove(&(name.to_string(), service));
            Ok(())
        }

        async fn exists(&self, name: &str, service: Service) -> Result<bool, Error> {
            Ok(self.entries().contains(&(name.to_string(), service)))
        }
    }
}

/// The service tag preferences for `provider` are stored under.
pub fn service_for(provider: ProviderKind) -> Service {
    match provider {
        ProviderKind::Twitch => Service::Twitch,
        ProviderKind::Destinygg => Service::Destinygg,
    }
}

pub async fn request_deletion(store: &dyn Store, claims: &SessionClaims) -> Result<(), Error> {
    store
        .add_user(&claims.name, service_for(claims.provider))
        .await
        .inspect_err(|err| {
            error!(
                "Failed to record deletion for {} on {}: {err}",
                claims.display_name, claims.provider
            )
        })?;
    info!(
        "{} ({}) opted out of log retention on {}",
        claims.display_name, claims.name, claims.provider
    );
    Ok(())
}

pub async fn cancel_deletion(store: &dyn Store, claims: &SessionClaims) -> Result<(), Error> {
    store
        .delete_user(&claims.name, service_for(claims.provider))
        .await
        .inspect_err(|err| {
            error!(
                "Failed to remove deletion for {} on {}: {err}",
                claims.display_name, claims.provider
            )
        })?;
    info!(
        "{} ({}) opted back into log retention on {}",
        claims.display_name, claims.name, claims.provider
    );
    Ok(())
}

pub async fn is_deleting(store: &dyn Store, claims: &SessionClaims) -> Result<bool, Error> {
    store
        .exists(&claims.name, service_for(claims.provider))
        .await
}
