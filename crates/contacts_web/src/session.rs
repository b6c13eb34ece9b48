//! Server-side flash storage keyed by a session cookie.
//!
//! # Invariants
//! - A stored flash is returned by exactly one `take` call.
//! - Only flashes produced by redirects are stored; rendered pages consume
//!   theirs immediately.
//! - Entries older than the store's time-to-live are dropped on every write,
//!   so clients that never send the cookie back cannot grow the map.

use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use contacts_core::Flash;
use log::debug;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "contacts_session";
/// How long a parked flash waits for its session's next request.
pub const FLASH_TTL: Duration = Duration::from_secs(10 * 60);

/// Opaque per-client session key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Reads the session cookie, ignoring malformed values.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == SESSION_COOKIE)
            .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
            .map(Self)
    }

    /// `Set-Cookie` value binding this session to the client.
    pub fn cookie(&self) -> String {
        format!("{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax", self.0)
    }
}

#[derive(Debug)]
struct Pending {
    flash: Flash,
    stored_at: Instant,
}

/// Pending flashes awaiting the next request of each session.
#[derive(Debug)]
pub struct SessionStore {
    pending: Mutex<HashMap<SessionId, Pending>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_ttl(FLASH_TTL)
    }
}

impl SessionStore {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Stores `flash` for the session's next request, replacing any pending
    /// one and dropping expired entries.
    pub fn put(&self, id: SessionId, flash: Flash) {
        let now = Instant::now();
        let mut pending = self.lock();
        let before = pending.len();
        pending.retain(|_, entry| now.duration_since(entry.stored_at) < self.ttl);
        let expired = before - pending.len();
        if expired > 0 {
            debug!("event=flash_expire module=session status=ok removed={expired}");
        }
        pending.insert(
            id,
            Pending {
                flash,
                stored_at: now,
            },
        );
    }

    /// Returns a copy of the pending flash without consuming it.
    pub fn peek(&self, id: SessionId) -> Flash {
        self.lock()
            .get(&id)
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .map(|entry| entry.flash.clone())
            .unwrap_or_default()
    }

    /// Removes and returns the pending flash, or an empty one.
    pub fn take(&self, id: SessionId) -> Flash {
        self.lock()
            .remove(&id)
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .map(|entry| entry.flash)
            .unwrap_or_default()
    }

    /// Number of parked flashes, expired ones included until the next write.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SessionId, Pending>> {
        // A panic while holding the lock leaves the map itself intact.
        self.pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
