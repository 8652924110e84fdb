//! Server-side session registry.
//!
//! Sessions are keyed by the opaque session id the client presents in a
//! header. The registry only persists [`Session`] values between requests;
//! basket-identity resolution itself lives in the basket crate.

use std::collections::HashMap;
use std::sync::Arc;

use basket::Session;
use tokio::sync::RwLock;

/// In-memory store of per-client session state.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl SessionRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the session for a client, creating one on first sight.
    ///
    /// A new session is authenticated if the transport vouched for a
    /// principal, anonymous otherwise. An existing session keeps whatever
    /// identity it was created with.
    pub async fn load(&self, session_id: &str, principal: Option<&str>) -> Session {
        if let Some(session) = self.sessions.read().await.get(session_id) {
            return session.clone();
        }

        match principal {
            Some(name) if !name.trim().is_empty() => Session::authenticated(name),
            _ => Session::anonymous(),
        }
    }

    /// Persists a session back after a request mutated it.
    pub async fn store(&self, session_id: &str, session: Session) {
        self.sessions
            .write()
            .await
            .insert(session_id.to_string(), session);
    }

    /// Returns the number of tracked sessions.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
