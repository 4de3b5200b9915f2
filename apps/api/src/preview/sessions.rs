//! In-memory registry of preview sessions.
//!
//! Each session is single-owner state for one browser preview. Nothing is shared across
//! sessions; the registry only maps ids to their monitors.
//!
//! A tab that closes without saying so leaves its session behind, so sessions idle longer
//! than the TTL are evicted. Expired entries are purged whenever a session is opened and by
//! a periodic sweeper; lookups treat them as gone even before the purge. The registry is
//! also capped, evicting the least recently seen session when full.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

use crate::layout::fit::FitMonitor;
use crate::layout::geometry::PageGeometry;

#[derive(Debug)]
pub struct PreviewSession {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub monitor: FitMonitor,
    last_seen: Mutex<DateTime<Utc>>,
}

impl PreviewSession {
    pub fn last_seen(&self) -> DateTime<Utc> {
        *self.last_seen.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn touch(&self, now: DateTime<Utc>) {
        *self.last_seen.lock().unwrap_or_else(|e| e.into_inner()) = now;
    }

    fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        (now - self.last_seen())
            .to_std()
            .is_ok_and(|idle| idle >= ttl)
    }
}

#[derive(Debug, Clone)]
pub struct PreviewSessions {
    inner: Arc<RwLock<HashMap<Uuid, Arc<PreviewSession>>>>,
    ttl: Duration,
    max_sessions: usize,
}

impl PreviewSessions {
    pub fn new(ttl: Duration, max_sessions: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            ttl,
            max_sessions: max_sessions.max(1),
        }
    }

    pub fn open(&self, geometry: PageGeometry) -> Arc<PreviewSession> {
        let now = Utc::now();
        let session = Arc::new(PreviewSession {
            id: Uuid::new_v4(),
            created_at: now,
            monitor: FitMonitor::new(geometry),
            last_seen: Mutex::new(now),
        });

        let mut map = self.inner.write().unwrap_or_else(|e| e.into_inner());
        map.retain(|_, s| !s.is_expired(now, self.ttl));
        while map.len() >= self.max_sessions {
            let Some(oldest) = map
                .values()
                .min_by_key(|s| s.last_seen())
                .map(|s| s.id)
            else {
                break;
            };
            map.remove(&oldest);
            info!(session_id = %oldest, "Preview session evicted (registry full)");
        }
        map.insert(session.id, Arc::clone(&session));
        drop(map);

        info!(session_id = %session.id, "Preview session opened");
        session
    }

    /// Looks up a live session and marks it as seen. Expired sessions are removed.
    pub fn get(&self, id: Uuid) -> Option<Arc<PreviewSession>> {
        let now = Utc::now();
        let session = self
            .inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&id)
            .cloned()?;

        if session.is_expired(now, self.ttl) {
            self.inner
                .write()
                .unwrap_or_else(|e| e.into_inner())
                .remove(&id);
            info!(session_id = %id, "Preview session expired");
            return None;
        }

        session.touch(now);
        Some(session)
    }

    /// Returns true if a session was removed.
    pub fn close(&self, id: Uuid) -> bool {
        let removed = self
            .inner
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&id)
            .is_some();
        if removed {
            info!(session_id = %id, "Preview session closed");
        }
        removed
    }

    /// Drops every session idle for longer than the TTL. Returns how many were removed.
    pub fn sweep_expired(&self) -> usize {
        let now = Utc::now();
        let mut map = self.inner.write().unwrap_or_else(|e| e.into_inner());
        let before = map.len();
        map.retain(|_, s| !s.is_expired(now, self.ttl));
        let removed = before - map.len();
        drop(map);

        if removed > 0 {
            info!(removed, remaining = self.len(), "Preview sessions swept");
        } else {
            debug!(remaining = self.len(), "Preview sweep found nothing to evict");
        }
        removed
    }

    /// Runs `sweep_expired` every `period` until the runtime shuts down.
    pub fn spawn_sweeper(&self, period: Duration) -> JoinHandle<()> {
        let sessions = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                sessions.sweep_expired();
            }
        })
    }

    fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).len()
    }
}
