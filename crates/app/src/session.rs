//! The current identity and its persistence.
//!
//! One session record lives under the `user` key, plus a one-shot `redirect`
//! marker written on login and consumed at the next startup. The in-memory
//! copy and the persisted copy move together: mutations write storage first
//! and only then swap the memory copy, so a failed write never leaves the
//! two diverged.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use mercado_barrio_core::{BusinessId, Role, UserId};

use crate::storage::{KeyValueStore, StorageError};

/// Storage keys for session state.
pub mod keys {
    /// Key for the serialized session record.
    pub const USER: &str = "user";

    /// Key for the one-shot post-login redirect marker.
    pub const REDIRECT: &str = "redirect";
}

/// The authenticated identity, as returned by the login endpoint.
///
/// Unknown fields ride along in `extra` so a profile save round-trips
/// whatever the API added since this client was built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: UserId,
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub tipo: Role,
    #[serde(default)]
    pub telefono: Option<String>,
    #[serde(default)]
    pub negocio_id: Option<BusinessId>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl Session {
    /// Whether the record satisfies the session invariant (positive id).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.id.is_valid()
    }
}

/// Process-wide session state with explicit lifecycle.
///
/// Created once at startup; [`SessionStore::restore`] does the lazy read
/// from persisted storage and purges invalid records instead of surfacing
/// them.
pub struct SessionStore {
    store: Box<dyn KeyValueStore>,
    current: Option<Session>,
}

impl SessionStore {
    /// Wrap a persistence backend. No I/O happens until `restore`.
    #[must_use]
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self {
            store,
            current: None,
        }
    }

    /// The active session, if any.
    #[must_use]
    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    /// Load the persisted record into memory.
    ///
    /// A record that fails to decode or lacks a positive id is deleted from
    /// storage and the store stays logged out - malformed persisted state is
    /// never an error.
    pub fn restore(&mut self) -> Option<&Session> {
        let raw = self.store.get(keys::USER)?;
        match serde_json::from_value::<Session>(raw) {
            Ok(session) if session.is_valid() => {
                self.current = Some(session);
            }
            _ => {
                warn!("discarding malformed persisted session record");
                if let Err(err) = self.store.remove(keys::USER) {
                    warn!(error = %err, "failed to purge malformed session record");
                }
            }
        }
        self.current.as_ref()
    }

    /// Replace the session, persisting before the in-memory swap.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails; the in-memory session is left
    /// unchanged in that case.
    pub fn set(&mut self, session: Session) -> Result<(), StorageError> {
        self.store
            .set(keys::USER, serde_json::to_value(&session)?)?;
        self.current = Some(session);
        Ok(())
    }

    /// Log out: drop both the in-memory and the persisted copies.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted copy cannot be removed; the
    /// in-memory copy is cleared regardless, so the caller observes a
    /// logged-out store either way.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.current = None;
        let user = self.store.remove(keys::USER);
        let redirect = self.store.remove(keys::REDIRECT);
        user.and(redirect)
    }

    /// Record where the next startup should land (written on login).
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails.
    pub fn set_redirect(&mut self, tag: &str) -> Result<(), StorageError> {
        self.store.set(keys::REDIRECT, Value::String(tag.to_owned()))
    }

    /// Consume the pending redirect marker, if one was stored.
    pub fn take_redirect(&mut self) -> Option<String> {
        let tag = self
            .store
            .get(keys::REDIRECT)
            .and_then(|v| v.as_str().map(str::to_owned))?;
        if let Err(err) = self.store.remove(keys::REDIRECT) {
            warn!(error = %err, "failed to clear redirect marker");
        }
        Some(tag)
    }
}
