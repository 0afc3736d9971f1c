use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{Duration, Utc};

use crate::core::{AppError, Result};
use crate::modules::checkout::models::PendingPayment;

/// Transient per-user state between payment creation and capture
pub trait SessionStore {
    fn put(&self, key: &str, value: &PendingPayment) -> Result<()>;

    fn get(&self, key: &str) -> Result<Option<PendingPayment>>;

    /// Remove and return the value, if any
    fn remove(&self, key: &str) -> Result<Option<PendingPayment>>;
}

impl<T: SessionStore + ?Sized> SessionStore for &T {
    fn put(&self, key: &str, value: &PendingPayment) -> Result<()> {
        (**self).put(key, value)
    }

    fn get(&self, key: &str) -> Result<Option<PendingPayment>> {
        (**self).get(key)
    }

    fn remove(&self, key: &str) -> Result<Option<PendingPayment>> {
        (**self).remove(key)
    }
}

/// Process-local store, cheap to clone and shareable across workers
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    entries: Arc<RwLock<HashMap<String, PendingPayment>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry older than `ttl`, returning how many were removed
    pub fn purge_expired(&self, ttl: Duration) -> Result<usize> {
        let now = Utc::now();
        let mut entries = self.entries.write().map_err(poisoned)?;
        let before = entries.len();
        entries.retain(|_, pending| !pending.is_expired(Some(ttl), now));
        Ok(before - entries.len())
    }
}

fn poisoned<T>(_: T) -> AppError {
    AppError::session("in-memory session store lock poisoned")
}

impl SessionStore for InMemorySessionStore {
    fn put(&self, key: &str, value: &PendingPayment) -> Result<()> {
        self.entries
            .write()
            .map_err(poisoned)?
            .insert(key.to_string(), value.clone());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<PendingPayment>> {
        Ok(self.entries.read().map_err(poisoned)?.get(key).cloned())
    }

    fn remove(&self, key: &str) -> Result<Option<PendingPayment>> {
        Ok(self.entries.write().map_err(poisoned)?.remove(key))
    }
}
