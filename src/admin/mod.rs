pub mod editor;
pub mod upload;

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::auth::session::generate_token;

pub use editor::{BasicFields, EditSession, EditorError, EditorState, EditorTab};

/// Shared admin credential. Not a security boundary: one password for the
/// CMS, checked against a bcrypt hash made at startup.
pub struct AdminGate {
    password_hash: String,
}

impl AdminGate {
    pub fn new(password: &str) -> Result<Self, bcrypt::BcryptError> {
        Self::with_cost(password, bcrypt::DEFAULT_COST)
    }

    pub fn with_cost(password: &str, cost: u32) -> Result<Self, bcrypt::BcryptError> {
        Ok(Self {
            password_hash: bcrypt::hash(password, cost)?,
        })
    }

    pub fn verify(&self, attempt: &str) -> bool {
        bcrypt::verify(attempt, &self.password_hash).unwrap_or(false)
    }
}

/// State for one signed-in admin browser.
#[derive(Debug, Default)]
pub struct AdminSession {
    pub editor: EditorState,
}

/// In-memory admin sessions keyed by cookie token. Idle sessions expire and
/// everything is lost on restart.
pub struct AdminSessions {
    sessions: HashMap<String, (Instant, AdminSession)>,
    idle_ttl: Duration,
}

impl AdminSessions {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            sessions: HashMap::new(),
            idle_ttl,
        }
    }

    /// Start a session after a successful password check.
    pub fn open(&mut self) -> String {
        self.clear_stale();
        let token = generate_token();
        self.sessions
            .insert(token.clone(), (Instant::now(), AdminSession::default()));
        token
    }

    /// Look up a live session and refresh its idle timer.
    pub fn get_mut(&mut self, token: &str) -> Option<&mut AdminSession> {
        self.clear_stale();
        let (seen, session) = self.sessions.get_mut(token)?;
        *seen = Instant::now();
        Some(session)
    }

    pub fn close(&mut self, token: &str) -> bool {
        self.sessions.remove(token).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn clear_stale(&mut self) {
        let ttl = self.idle_ttl;
        self.sessions.retain(|_, (seen, _)| seen.elapsed() < ttl);
    }
}
