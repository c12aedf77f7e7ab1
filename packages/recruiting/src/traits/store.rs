//! Storage seams: session lifecycle and keyed JSON documents.

use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;
use uuid::Uuid;

use crate::error::StoreError;
use crate::session::{GetSessionConfig, Session};

/// Session lifecycle contract, implemented identically by the volatile
/// and durable backends.
///
/// Failure semantics: durable-backend read failures should be treated by
/// callers as "session not found" (log and continue with a fresh
/// session) rather than aborting the turn.
#[async_trait]
pub trait SessionService: Send + Sync {
    /// Create a session, generating an id when none is supplied.
    ///
    /// The durable backend fails with [`StoreError::AlreadyExists`] when
    /// a caller-supplied id collides; the volatile backend overwrites.
    async fn create_session(
        &self,
        app_name: &str,
        user_id: &str,
        state: Option<IndexMap<String, Value>>,
        session_id: Option<String>,
    ) -> Result<Session, StoreError>;

    /// Fetch a session, `None` if absent. `config` may restrict the
    /// returned event history.
    async fn get_session(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &str,
        config: Option<&GetSessionConfig>,
    ) -> Result<Option<Session>, StoreError>;

    /// Full overwrite of the persisted state for this session id —
    /// never a partial diff.
    async fn update_session(&self, session: &Session) -> Result<(), StoreError>;

    /// Session identities for a user, with `events` and `state` elided.
    async fn list_sessions(&self, app_name: &str, user_id: &str)
        -> Result<Vec<Session>, StoreError>;

    /// Administrative hard delete.
    async fn delete_session(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &str,
    ) -> Result<(), StoreError>;
}

/// Keyed get/set/list/delete of JSON documents, addressed by
/// `(collection, document_id)`.
///
/// The backend must be safe under concurrent access from multiple turns
/// and process instances: atomicity is per document, not via
/// application-level locking.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError>;

    /// Upsert the full document body.
    async fn set(&self, collection: &str, id: &str, doc: &Value) -> Result<(), StoreError>;

    /// List all `(id, document)` pairs in a collection.
    async fn list(&self, collection: &str) -> Result<Vec<(String, Value)>, StoreError>;

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;

    /// Store under a generated id and return it.
    async fn insert(&self, collection: &str, doc: &Value) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        self.set(collection, &id, doc).await?;
        Ok(id)
    }
}

#[async_trait]
impl<T: SessionService + ?Sized> SessionService for std::sync::Arc<T> {
    async fn create_session(
        &self,
        app_name: &str,
        user_id: &str,
        state: Option<IndexMap<String, Value>>,
        session_id: Option<String>,
    ) -> Result<Session, StoreError> {
        (**self)
            .create_session(app_name, user_id, state, session_id)
            .await
    }

    async fn get_session(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &str,
        config: Option<&GetSessionConfig>,
    ) -> Result<Option<Session>, StoreError> {
        (**self)
            .get_session(app_name, user_id, session_id, config)
            .await
    }

    async fn update_session(&self, session: &Session) -> Result<(), StoreError> {
        (**self).update_session(session).await
    }

    async fn list_sessions(
        &self,
        app_name: &str,
        user_id: &str,
    ) -> Result<Vec<Session>, StoreError> {
        (**self).list_sessions(app_name, user_id).await
    }

    async fn delete_session(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &str,
    ) -> Result<(), StoreError> {
        (**self).delete_session(app_name, user_id, session_id).await
    }
}

#[async_trait]
impl<T: DocumentStore + ?Sized> DocumentStore for std::sync::Arc<T> {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        (**self).get(collection, id).await
    }

    async fn set(&self, collection: &str, id: &str, doc: &Value) -> Result<(), StoreError> {
        (**self).set(collection, id, doc).await
    }

    async fn list(&self, collection: &str) -> Result<Vec<(String, Value)>, StoreError> {
        (**self).list(collection).await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        (**self).delete(collection, id).await
    }
}
