//! Per-session chat state and slash commands.
//!
//! Each chat session owns its RAG toggle. A request takes a snapshot of the
//! session when it arrives; a toggle issued afterwards only affects later
//! requests (last writer wins).
//!
//! Sessions expire after [`SESSION_TTL_HOURS`]; expired entries are pruned
//! whenever a new session is created, and the map never holds more than
//! [`MAX_SESSIONS`] entries.

pub mod prompts;

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::pipeline::models::Mode;

pub const SESSION_TTL_HOURS: i64 = 24;
pub const MAX_SESSIONS: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionState {
    pub rag_enabled: bool,
    pub created_at: DateTime<Utc>,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            rag_enabled: true,
            created_at: Utc::now(),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.created_at > ttl
    }

    pub fn mode(&self) -> Mode {
        if self.rag_enabled {
            Mode::Rag
        } else {
            Mode::NoRag
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// In-memory session map. Nothing is persisted.
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, SessionState>>,
    ttl: Duration,
    max_sessions: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_limits(Duration::hours(SESSION_TTL_HOURS), MAX_SESSIONS)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(ttl: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
            max_sessions: max_sessions.max(1),
        }
    }

    /// Creates a session after pruning expired ones. At capacity the oldest
    /// session is evicted.
    pub async fn create(&self) -> (Uuid, SessionState) {
        let id = Uuid::new_v4();
        let state = SessionState::new();
        let mut sessions = self.sessions.write().await;

        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(state.created_at, self.ttl));
        while sessions.len() >= self.max_sessions {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, s)| s.created_at)
                .map(|(id, _)| *id);
            match oldest {
                Some(oldest) => {
                    sessions.remove(&oldest);
                }
                None => break,
            }
        }
        let dropped = before - sessions.len();
        if dropped > 0 {
            debug!("Dropped {dropped} expired or evicted sessions");
        }

        sessions.insert(id, state);
        (id, state)
    }

    /// Copy of the session as of now. Expired sessions are treated as unknown.
    pub async fn snapshot(&self, id: Uuid) -> Option<SessionState> {
        let now = Utc::now();
        self.sessions
            .read()
            .await
            .get(&id)
            .copied()
            .filter(|s| !s.is_expired(now, self.ttl))
    }

    /// Sets the RAG toggle, returning the updated state.
    pub async fn set_rag(&self, id: Uuid, enabled: bool) -> Option<SessionState> {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let state = sessions.get_mut(&id).filter(|s| !s.is_expired(now, self.ttl))?;
        state.rag_enabled = enabled;
        Some(*state)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// Commands handled by the shell and never forwarded to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatCommand {
    RagOn,
    RagOff,
    Help,
}

impl ChatCommand {
    /// Recognises an exact command in already-trimmed input. Any other text,
    /// including unknown `/...` input, is a normal message.
    pub fn parse(input: &str) -> Option<Self> {
        match input {
            "/rag on" => Some(ChatCommand::RagOn),
            "/rag off" => Some(ChatCommand::RagOff),
            "/help" => Some(ChatCommand::Help),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(ChatCommand::parse("/rag on"), Some(ChatCommand::RagOn));
        assert_eq!(ChatCommand::parse("/rag off"), Some(ChatCommand::RagOff));
        assert_eq!(ChatCommand::parse("/help"), Some(ChatCommand::Help));
        assert_eq!(ChatCommand::parse("/rag maybe"), None);
        assert_eq!(ChatCommand::parse("¿Cómo se dice hola?"), None);
    }

    #[test]
    fn test_new_session_starts_in_rag_mode() {
        assert_eq!(SessionState::new().mode(), Mode::Rag);
    }

    #[tokio::test]
    async fn test_snapshot_is_unaffected_by_later_toggle() {
        let store = SessionStore::new();
        let (id, _) = store.create().await;

        let before = store.snapshot(id).await.unwrap();
        store.set_rag(id, false).await.unwrap();
        let after = store.snapshot(id).await.unwrap();

        assert_eq!(before.mode(), Mode::Rag);
        assert_eq!(after.mode(), Mode::NoRag);
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let store = SessionStore::new();
        let (a, _) = store.create().await;
        let (b, _) = store.create().await;
        store.set_rag(a, false).await;
        assert_eq!(store.snapshot(b).await.unwrap().mode(), Mode::Rag);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_expired_sessions_are_pruned_on_create() {
        let store = SessionStore::new();
        let stale = Uuid::new_v4();
        store.sessions.write().await.insert(
            stale,
            SessionState {
                rag_enabled: true,
                created_at: Utc::now() - Duration::hours(SESSION_TTL_HOURS + 1),
            },
        );
        assert!(store.snapshot(stale).await.is_none());
        assert!(store.set_rag(stale, false).await.is_none());

        let (fresh, _) = store.create().await;
        assert_eq!(store.len().await, 1);
        assert!(store.snapshot(fresh).await.is_some());
    }

    #[tokio::test]
    async fn test_oldest_session_evicted_at_capacity() {
        let store = SessionStore::with_limits(Duration::hours(SESSION_TTL_HOURS), 2);
        let oldest = Uuid::new_v4();
        store.sessions.write().await.insert(
            oldest,
            SessionState {
                rag_enabled: true,
                created_at: Utc::now() - Duration::minutes(5),
            },
        );
        let (second, _) = store.create().await;
        let (third, _) = store.create().await;

        assert_eq!(store.len().await, 2);
        assert!(store.snapshot(oldest).await.is_none());
        assert!(store.snapshot(second).await.is_some());
        assert!(store.snapshot(third).await.is_some());
    }

    #[tokio::test]
    async fn test_unknown_session() {
        let store = SessionStore::new();
        assert!(store.snapshot(Uuid::new_v4()).await.is_none());
        assert!(store.set_rag(Uuid::new_v4(), true).await.is_none());
    }
}
