//! In-process session backend for testing and development.
//!
//! Data is lost on restart; caller-supplied id collisions overwrite.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;

use crate::error::StoreError;
use crate::session::{GetSessionConfig, Session};
use crate::traits::store::SessionService;

type SessionKey = (String, String, String);

/// Volatile session backend.
#[derive(Default)]
pub struct InMemorySessionService {
    sessions: RwLock<HashMap<SessionKey, Session>>,
}

impl InMemorySessionService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions across all users.
    pub fn len(&self) -> usize {
        self.sessions.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn key(app_name: &str, user_id: &str, session_id: &str) -> SessionKey {
        (
            app_name.to_string(),
            user_id.to_string(),
            session_id.to_string(),
        )
    }
}

#[async_trait]
impl SessionService for InMemorySessionService {
    async fn create_session(
        &self,
        app_name: &str,
        user_id: &str,
        state: Option<IndexMap<String, Value>>,
        session_id: Option<String>,
    ) -> Result<Session, StoreError> {
        let session = Session::new(app_name, user_id, state.unwrap_or_default(), session_id);
        self.sessions.write().unwrap().insert(
            Self::key(app_name, user_id, &session.id),
            session.clone(),
        );
        Ok(session)
    }

    async fn get_session(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &str,
        config: Option<&GetSessionConfig>,
    ) -> Result<Option<Session>, StoreError> {
        let sessions = self.sessions.read().unwrap();
        let mut session = sessions
            .get(&Self::key(app_name, user_id, session_id))
            .cloned();
        if let (Some(s), Some(cfg)) = (session.as_mut(), config) {
            s.apply_config(cfg);
        }
        Ok(session)
    }

    async fn update_session(&self, session: &Session) -> Result<(), StoreError> {
        self.sessions.write().unwrap().insert(
            Self::key(&session.app_name, &session.user_id, &session.id),
            session.clone(),
        );
        Ok(())
    }

    async fn list_sessions(
        &self,
        app_name: &str,
        user_id: &str,
    ) -> Result<Vec<Session>, StoreError> {
        let sessions = self.sessions.read().unwrap();
        let mut listed: Vec<Session> = sessions
            .values()
            .filter(|s| s.app_name == app_name && s.user_id == user_id)
            .map(Session::elided)
            .collect();
        listed.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(listed)
    }

    async fn delete_session(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &str,
    ) -> Result<(), StoreError> {
        self.sessions
            .write()
            .unwrap()
            .remove(&Self::key(app_name, user_id, session_id));
        Ok(())
    }
}
