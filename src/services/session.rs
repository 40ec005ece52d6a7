// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory session store keyed by a random browser cookie.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use ring::rand::{SecureRandom, SystemRandom};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::AppError;
use crate::models::Session;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "dash_session";

/// Shared handle to one session. Handlers hold the lock for the duration of
/// a request, so requests from the same browser are serialized.
pub type SessionHandle = Arc<Mutex<Session>>;

struct SessionSlot {
    session: SessionHandle,
    last_seen: DateTime<Utc>,
}

/// All live sessions.
pub struct SessionStore {
    sessions: DashMap<String, SessionSlot>,
    ttl: Duration,
    rng: SystemRandom,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl,
            rng: SystemRandom::new(),
        }
    }

    fn new_id(&self) -> Result<String, AppError> {
        let mut bytes = [0u8; 16];
        self.rng
            .fill(&mut bytes)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("System RNG failure")))?;
        Ok(hex::encode(bytes))
    }

    fn insert(&self, id: String, session: SessionHandle) {
        self.sessions.insert(
            id,
            SessionSlot {
                session,
                last_seen: Utc::now(),
            },
        );
    }

    /// Create a fresh, unauthenticated session.
    pub fn create(&self) -> Result<(String, SessionHandle), AppError> {
        let id = self.new_id()?;
        let session = Arc::new(Mutex::new(Session::default()));
        self.insert(id.clone(), session.clone());

        tracing::debug!(sessions = self.sessions.len(), "Session created");
        Ok((id, session))
    }

    /// Move a session to a new id. The old id stops resolving.
    pub fn rotate(&self, old_id: &str) -> Result<String, AppError> {
        let id = self.new_id()?;
        let (_, slot) = self
            .sessions
            .remove(old_id)
            .ok_or(AppError::Unauthenticated)?;
        self.insert(id.clone(), slot.session);

        tracing::debug!("Session id rotated");
        Ok(id)
    }

    /// Look up a session, refreshing its idle timer. Expired sessions are
    /// removed and reported as absent.
    pub fn get(&self, id: &str) -> Option<SessionHandle> {
        self.get_at(id, Utc::now())
    }

    fn get_at(&self, id: &str, now: DateTime<Utc>) -> Option<SessionHandle> {
        {
            // Shard guard must be released before `remove` below.
            let mut slot = self.sessions.get_mut(id)?;
            if now - slot.last_seen <= self.ttl {
                slot.last_seen = now;
                return Some(slot.session.clone());
            }
        }

        self.sessions.remove(id);
        tracing::debug!("Session expired");
        None
    }

    pub fn remove(&self, id: &str) -> bool {
        self.sessions.remove(id).is_some()
    }

    /// Drop every session idle for longer than the TTL.
    pub fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, slot| now - slot.last_seen <= self.ttl);
        before.saturating_sub(self.sessions.len())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
