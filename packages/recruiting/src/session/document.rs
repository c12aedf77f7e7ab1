//! Durable session backend over an external document store.
//!
//! Sessions are persisted as JSON documents in a configurable
//! collection, one document per session. Every store touch runs under
//! the retry policy; read failures surface as `Unavailable` so callers
//! can degrade to a fresh session instead of failing the turn.

use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;

use crate::error::StoreError;
use crate::retry::RetryPolicy;
use crate::session::{GetSessionConfig, Session};
use crate::traits::store::{DocumentStore, SessionService};

const DEFAULT_COLLECTION: &str = "sessions";

/// Session backend persisting into a [`DocumentStore`].
pub struct DocumentSessionService<D> {
    store: D,
    collection: String,
    retry: RetryPolicy,
}

impl<D: DocumentStore> DocumentSessionService<D> {
    pub fn new(store: D) -> Self {
        Self {
            store,
            collection: DEFAULT_COLLECTION.to_string(),
            retry: RetryPolicy::store(),
        }
    }

    /// Override the backing collection name.
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    /// Override the retry policy (tests use [`RetryPolicy::immediate`]).
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Session documents are keyed by the full identity so ids only
    /// need to be unique per `(app_name, user_id)`.
    fn doc_id(app_name: &str, user_id: &str, session_id: &str) -> String {
        format!("{app_name}/{user_id}/{session_id}")
    }

    fn decode(&self, id: &str, doc: Value) -> Result<Session, StoreError> {
        serde_json::from_value(doc).map_err(|e| StoreError::Corrupt {
            collection: self.collection.clone(),
            id: id.to_string(),
            reason: e.to_string(),
        })
    }

    async fn write(&self, session: &Session) -> Result<(), StoreError> {
        let id = Self::doc_id(&session.app_name, &session.user_id, &session.id);
        let doc = serde_json::to_value(session).map_err(|e| StoreError::unavailable(e))?;
        self.retry
            .run("session_store.set", || self.store.set(&self.collection, &id, &doc))
            .await
    }
}

#[async_trait]
impl<D: DocumentStore> SessionService for DocumentSessionService<D> {
    async fn create_session(
        &self,
        app_name: &str,
        user_id: &str,
        state: Option<IndexMap<String, Value>>,
        session_id: Option<String>,
    ) -> Result<Session, StoreError> {
        // A caller-supplied id must not clobber an existing session.
        if let Some(id) = session_id.as_deref().filter(|id| !id.trim().is_empty()) {
            let doc_id = Self::doc_id(app_name, user_id, id);
            let existing = self
                .retry
                .run("session_store.get", || self.store.get(&self.collection, &doc_id))
                .await?;
            if existing.is_some() {
                return Err(StoreError::AlreadyExists {
                    session_id: id.to_string(),
                });
            }
        }

        let session = Session::new(app_name, user_id, state.unwrap_or_default(), session_id);
        self.write(&session).await?;
        tracing::info!(
            session_id = %session.id,
            user_id = %user_id,
            "created session"
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
        let doc_id = Self::doc_id(app_name, user_id, session_id);
        let doc = self
            .retry
            .run("session_store.get", || self.store.get(&self.collection, &doc_id))
            .await?;

        match doc {
            Some(doc) => {
                let mut session = self.decode(&doc_id, doc)?;
                if let Some(cfg) = config {
                    session.apply_config(cfg);
                }
                Ok(Some(session))
            }
            None => Ok(None),
        }
    }

    async fn update_session(&self, session: &Session) -> Result<(), StoreError> {
        self.write(session).await?;
        tracing::debug!(session_id = %session.id, "updated session");
        Ok(())
    }

    async fn list_sessions(
        &self,
        app_name: &str,
        user_id: &str,
    ) -> Result<Vec<Session>, StoreError> {
        let prefix = format!("{app_name}/{user_id}/");
        let docs = self
            .retry
            .run("session_store.list", || self.store.list(&self.collection))
            .await?;

        let mut sessions = Vec::new();
        for (id, doc) in docs {
            if !id.starts_with(&prefix) {
                continue;
            }
            // Skip documents that no longer decode rather than failing
            // the whole listing.
            match self.decode(&id, doc) {
                Ok(session) => sessions.push(session.elided()),
                Err(e) => tracing::warn!(doc_id = %id, error = %e, "skipping corrupt session"),
            }
        }
        sessions.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(sessions)
    }

    async fn delete_session(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &str,
    ) -> Result<(), StoreError> {
        let doc_id = Self::doc_id(app_name, user_id, session_id);
        self.retry
            .run("session_store.delete", || {
                self.store.delete(&self.collection, &doc_id)
            })
            .await?;
        tracing::info!(session_id = %session_id, user_id = %user_id, "deleted session");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::MemoryDocumentStore;

    fn service() -> DocumentSessionService<MemoryDocumentStore> {
        DocumentSessionService::new(MemoryDocumentStore::new())
            .with_retry(RetryPolicy::immediate(3))
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let service = service();
        let mut state = IndexMap::new();
        state.insert("k".to_string(), Value::from("v"));
        let created = service
            .create_session("app", "user", Some(state), None)
            .await
            .unwrap();

        let fetched = service
            .get_session("app", "user", &created.id, None)
            .await
            .unwrap()
            .expect("persisted");
        assert_eq!(fetched.state, created.state);
    }

    #[tokio::test]
    async fn supplied_id_collision_is_rejected() {
        let service = service();
        service
            .create_session("app", "user", None, Some("dup".into()))
            .await
            .unwrap();
        let err = service
            .create_session("app", "user", None, Some("dup".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn transient_write_failures_are_retried() {
        let store = MemoryDocumentStore::new();
        store.fail_next_writes(2);
        let service = DocumentSessionService::new(store).with_retry(RetryPolicy::immediate(3));

        let session = service
            .create_session("app", "user", None, None)
            .await
            .expect("third attempt succeeds");
        assert!(service
            .get_session("app", "user", &session.id, None)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn persistent_read_failure_surfaces_unavailable() {
        let store = MemoryDocumentStore::new();
        store.fail_next_reads(u32::MAX);
        let service = DocumentSessionService::new(store).with_retry(RetryPolicy::immediate(2));

        let err = service
            .get_session("app", "user", "any", None)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    #[tokio::test]
    async fn list_scopes_by_identity_prefix() {
        let service = service();
        service
            .create_session("app", "user-a", None, Some("s1".into()))
            .await
            .unwrap();
        service
            .create_session("app", "user-b", None, Some("s2".into()))
            .await
            .unwrap();

        let listed = service.list_sessions("app", "user-a").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, "s1");
    }
}
