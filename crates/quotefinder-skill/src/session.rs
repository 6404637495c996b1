//! Session state.
//!
//! The host hands every request a key/value session. The paging cursor is
//! stored in it under two keys and nothing else in the skill reads or writes
//! those keys. [`SessionManager`] creates and expires sessions for hosts that
//! keep them locally.

use std::collections::HashMap;

use chrono::Local;
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use quotefinder_core::{PagingCursor, ResultSet};

use crate::error::SkillError;

/// Session key holding the serialized result set.
pub const SESSION_TEXT: &str = "text";
/// Session key holding the index of the next result to emit.
pub const SESSION_INDEX: &str = "index";

// =============================================================================
// SessionStore
// =============================================================================

/// Host-supplied key/value session storage.
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<&Value>;
    fn set(&mut self, key: &str, value: Value);
    fn remove(&mut self, key: &str);
}

/// In-memory [`SessionStore`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionAttributes {
    values: HashMap<String, Value>,
}

impl SessionAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl SessionStore for SessionAttributes {
    fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    fn set(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }
}

// =============================================================================
// Cursor persistence
// =============================================================================

/// Read the paging cursor from a session.
///
/// Missing keys mean no search is active. Stored values that cannot be
/// decoded, or whose index lies past the end, are logged and ignored.
pub fn load_cursor<S: SessionStore + ?Sized>(store: &S) -> Option<PagingCursor> {
    let text = store.get(SESSION_TEXT)?;
    let result_set: ResultSet = match serde_json::from_value(text.clone()) {
        Ok(set) => set,
        Err(e) => {
            warn!(error = %e, "Ignoring undecodable result set in session");
            return None;
        }
    };

    let Some(index) = store
        .get(SESSION_INDEX)
        .and_then(Value::as_u64)
        .and_then(|i| usize::try_from(i).ok())
    else {
        warn!("Ignoring session result set without a valid index");
        return None;
    };

    match PagingCursor::resume(result_set, index) {
        Ok(cursor) => Some(cursor),
        Err(e) => {
            warn!(error = %e, "Ignoring out-of-range session cursor");
            None
        }
    }
}

/// Write the paging cursor to a session, or clear it when `cursor` is `None`.
pub fn save_cursor<S: SessionStore + ?Sized>(
    store: &mut S,
    cursor: Option<&PagingCursor>,
) -> Result<(), SkillError> {
    match cursor {
        Some(cursor) => {
            let text = serde_json::to_value(cursor.result_set())
                .map_err(|e| SkillError::Session(format!("serializing result set: {}", e)))?;
            store.set(SESSION_TEXT, text);
            store.set(SESSION_INDEX, Value::from(cursor.next_index()));
        }
        None => clear_cursor(store),
    }
    Ok(())
}

/// Drop any stored cursor.
pub fn clear_cursor<S: SessionStore + ?Sized>(store: &mut S) {
    store.remove(SESSION_TEXT);
    store.remove(SESSION_INDEX);
}

// =============================================================================
// SessionManager
// =============================================================================

/// One conversation held by a local host.
#[derive(Debug, Clone)]
pub struct ConversationSession {
    pub id: Uuid,
    /// Epoch seconds.
    pub started_at: i64,
    /// Epoch seconds of the most recent request.
    pub last_request_at: i64,
    pub request_count: u64,
    pub attributes: SessionAttributes,
}

/// Creates, expires, and tracks conversation sessions.
pub struct SessionManager {
    /// Session timeout in minutes.
    pub timeout_minutes: u32,
}

impl SessionManager {
    pub fn new(timeout_minutes: u32) -> Self {
        Self { timeout_minutes }
    }

    /// Create a fresh session with no attributes.
    pub fn create_session(&self) -> ConversationSession {
        let now = Local::now().timestamp();
        ConversationSession {
            id: Uuid::new_v4(),
            started_at: now,
            last_request_at: now,
            request_count: 0,
            attributes: SessionAttributes::new(),
        }
    }

    /// Check whether a session has been idle longer than the timeout.
    pub fn is_expired(&self, session: &ConversationSession) -> bool {
        let now = Local::now().timestamp();
        let timeout_secs = i64::from(self.timeout_minutes) * 60;
        now - session.last_request_at > timeout_secs
    }

    /// Record a request against a session.
    pub fn touch(&self, session: &mut ConversationSession) {
        session.last_request_at = Local::now().timestamp();
        session.request_count += 1;
    }
}

// =============================================================================
// Tests
// =============================================================================
