//! In-process host: keeps sessions in memory and feeds requests to the
//! dispatcher one at a time.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use uuid::Uuid;

use crate::dispatcher::{Dispatcher, SkillRequest};
use crate::error::SkillError;
use crate::lookup::QuoteLookup;
use crate::response::RenderedOutput;
use crate::session::{ConversationSession, SessionManager};

/// Session-owning host for local use.
pub struct LocalHost<L> {
    dispatcher: Dispatcher<L>,
    manager: SessionManager,
    sessions: Mutex<HashMap<Uuid, ConversationSession>>,
}

impl<L: QuoteLookup> LocalHost<L> {
    pub fn new(dispatcher: Dispatcher<L>, session_timeout_minutes: u32) -> Self {
        Self {
            dispatcher,
            manager: SessionManager::new(session_timeout_minutes),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Handle a request within the given session, creating one if needed.
    ///
    /// Returns the rendered output and the id of the session that served it.
    /// Sessions whose output ends the conversation are dropped. The session
    /// map is not locked while the dispatcher runs, so a slow lookup only
    /// holds up its own session.
    pub fn handle(
        &self,
        request: &SkillRequest,
        session_id: Option<Uuid>,
    ) -> Result<(RenderedOutput, Uuid), SkillError> {
        let (sid, created, mut attributes) = {
            let mut sessions = self.lock_sessions()?;
            let (sid, created) = self.resolve_session(&mut sessions, session_id);
            let session = sessions
                .get_mut(&sid)
                .ok_or_else(|| SkillError::Session(format!("session vanished: {}", sid)))?;
            self.manager.touch(session);
            tracing::info!(session_id = %sid, requests = session.request_count, "Handling request");
            (sid, created, std::mem::take(&mut session.attributes))
        };

        let result = self.dispatcher.handle(request, &mut attributes);

        let mut sessions = self.lock_sessions()?;
        let output = match result {
            Ok(output) => output,
            Err(e) => {
                if created {
                    sessions.remove(&sid);
                } else if let Some(session) = sessions.get_mut(&sid) {
                    session.attributes = attributes;
                }
                return Err(e);
            }
        };

        if output.ends_session || matches!(request, SkillRequest::SessionEnded) {
            sessions.remove(&sid);
            tracing::debug!(session_id = %sid, "Session closed");
        } else if let Some(session) = sessions.get_mut(&sid) {
            session.attributes = attributes;
        }
        Ok((output, sid))
    }

    /// End a session explicitly, as the host would on hang-up.
    pub fn end_session(&self, session_id: Uuid) -> Result<RenderedOutput, SkillError> {
        let (output, _) = self.handle(&SkillRequest::SessionEnded, Some(session_id))?;
        Ok(output)
    }

    pub fn get_session(&self, session_id: Uuid) -> Option<ConversationSession> {
        self.sessions
            .lock()
            .ok()
            .and_then(|s| s.get(&session_id).cloned())
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().map(|s| s.len()).unwrap_or(0)
    }

    fn lock_sessions(
        &self,
    ) -> Result<MutexGuard<'_, HashMap<Uuid, ConversationSession>>, SkillError> {
        self.sessions
            .lock()
            .map_err(|e| SkillError::Session(format!("session lock poisoned: {}", e)))
    }

    /// Find the live session for `requested`, or create one.
    ///
    /// Expired sessions are swept first, so they lose their cursor. The flag
    /// is true when the returned session was created here.
    fn resolve_session(
        &self,
        sessions: &mut HashMap<Uuid, ConversationSession>,
        requested: Option<Uuid>,
    ) -> (Uuid, bool) {
        let before = sessions.len();
        sessions.retain(|_, session| !self.manager.is_expired(session));
        if sessions.len() < before {
            tracing::debug!(swept = before - sessions.len(), "Expired sessions removed");
        }

        if let Some(sid) = requested {
            if sessions.contains_key(&sid) {
                return (sid, false);
            }
        }

        let session = self.manager.create_session();
        let sid = session.id;
        sessions.insert(sid, session);
        (sid, true)
    }
}
