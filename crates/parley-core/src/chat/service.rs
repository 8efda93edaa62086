//! Chat service orchestrating session lifecycle, message persistence, and
//! completion calls.
//!
//! ChatService coordinates between the ChatRepository and a CompletionGateway.
//! Every operation is scoped to the caller's `Owner`: sessions owned by
//! someone else are reported as not found.

use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};
use dashmap::DashMap;
use parley_types::chat::{
    ChatMessage, ChatSession, MessageRole, DEFAULT_SESSION_TITLE, FALLBACK_REPLY,
};
use parley_types::error::{ChatError, RepositoryError};
use parley_types::identity::Owner;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::chat::repository::ChatRepository;
use crate::chat::title::derive_title;
use crate::llm::gateway::CompletionGateway;

/// Orchestrates chat sessions and the user/assistant message exchange.
///
/// Generic over `ChatRepository` and `CompletionGateway` to maintain
/// clean architecture (parley-core never depends on parley-infra).
///
/// Sends and deletes on the same session are serialized by a per-session
/// async mutex, so each user/assistant pair is stored back to back and a
/// delete never lands inside a pair. Different sessions run concurrently.
pub struct ChatService<C: ChatRepository, G: CompletionGateway> {
    chat_repo: C,
    gateway: G,
    send_locks: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl<C: ChatRepository, G: CompletionGateway> ChatService<C, G> {
    /// Create a new chat service with the given repository and gateway.
    pub fn new(chat_repo: C, gateway: G) -> Self {
        Self {
            chat_repo,
            gateway,
            send_locks: DashMap::new(),
        }
    }

    // --- Session lifecycle ---

    /// Create a new chat session for `owner`.
    ///
    /// A missing or blank title becomes the default "New Chat".
    pub async fn create_session(
        &self,
        owner: Owner,
        title: Option<String>,
    ) -> Result<ChatSession, ChatError> {
        let title = title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_SESSION_TITLE.to_string());

        let created_at = now();
        let session = ChatSession {
            id: Uuid::now_v7(),
            title,
            owner,
            created_at,
            updated_at: created_at,
        };

        let session = self.chat_repo.create_session(&session).await?;
        info!(session_id = %session.id, owner = %owner, "Chat session created");
        Ok(session)
    }

    /// List the sessions that belong to exactly `owner`.
    pub async fn list_sessions(&self, owner: Owner) -> Result<Vec<ChatSession>, ChatError> {
        Ok(self.chat_repo.list_sessions(&owner).await?)
    }

    /// Delete a session and all of its messages.
    ///
    /// Waits for an in-flight send on the same session to finish first.
    pub async fn delete_session(&self, owner: Owner, session_id: Uuid) -> Result<(), ChatError> {
        let deleted = self
            .with_session_lock(session_id, self.chat_repo.delete_session(&owner, &session_id))
            .await;

        match deleted {
            Ok(()) => {
                info!(session_id = %session_id, owner = %owner, "Chat session deleted");
                Ok(())
            }
            Err(RepositoryError::NotFound) => Err(ChatError::SessionNotFound),
            Err(e) => Err(e.into()),
        }
    }

    // --- Messages ---

    /// Append a user message, ask the gateway for a reply, and append that.
    ///
    /// The user message is stored before the gateway is called. A gateway
    /// failure is logged and replaced by the fixed fallback reply; it never
    /// fails the send. Returns `[user_message, assistant_message]`.
    #[tracing::instrument(
        name = "send_message",
        skip_all,
        fields(owner = %owner, session_id = %session_id, provider = %self.gateway.name())
    )]
    pub async fn send_message(
        &self,
        owner: Owner,
        session_id: Uuid,
        content: &str,
    ) -> Result<[ChatMessage; 2], ChatError> {
        // Reject unknown or foreign sessions before taking a lock for them.
        self.owned_session(&owner, &session_id).await?;

        self.with_session_lock(session_id, self.exchange(owner, session_id, content))
            .await
    }

    /// Store one user/assistant pair. Runs under the session lock.
    async fn exchange(
        &self,
        owner: Owner,
        session_id: Uuid,
        content: &str,
    ) -> Result<[ChatMessage; 2], ChatError> {
        // Re-read under the lock: a concurrent send may have changed the title,
        // or a concurrent delete may have removed the session.
        let mut session = self.owned_session(&owner, &session_id).await?;

        let user_message = new_message(
            session_id,
            content.trim().to_string(),
            MessageRole::User,
            now(),
        );
        self.chat_repo.save_message(&user_message).await?;

        let reply = match self.gateway.complete(content).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Completion failed, storing fallback reply");
                FALLBACK_REPLY.to_string()
            }
        };

        // Never let the assistant reply sort before the prompt it answers.
        let replied_at = now().max(user_message.timestamp);
        let assistant_message =
            new_message(session_id, reply, MessageRole::Assistant, replied_at);
        self.chat_repo.save_message(&assistant_message).await?;

        if session.has_default_title() {
            session.title = derive_title(content);
        }
        session.updated_at = now().max(session.updated_at);
        self.chat_repo.update_session(&session).await?;

        Ok([user_message, assistant_message])
    }

    /// Get the messages of a session in timestamp order.
    pub async fn list_messages(
        &self,
        owner: Owner,
        session_id: Uuid,
    ) -> Result<Vec<ChatMessage>, ChatError> {
        self.owned_session(&owner, &session_id).await?;
        Ok(self.chat_repo.get_messages(&session_id).await?)
    }

    // --- Helpers ---

    async fn owned_session(
        &self,
        owner: &Owner,
        session_id: &Uuid,
    ) -> Result<ChatSession, ChatError> {
        self.chat_repo
            .find_session(owner, session_id)
            .await?
            .ok_or(ChatError::SessionNotFound)
    }

    /// Run `work` while holding the session's lock.
    ///
    /// The map entry is dropped again once no other task holds or waits on
    /// the lock, so the map only holds sessions with work in flight.
    async fn with_session_lock<T>(&self, session_id: Uuid, work: impl Future<Output = T>) -> T {
        let lock = self.send_locks.entry(session_id).or_default().clone();
        let output = {
            let _guard = lock.lock().await;
            work.await
        };
        drop(lock);
        self.send_locks
            .remove_if(&session_id, |_, lock| Arc::strong_count(lock) == 1);
        output
    }
}

/// Current time at the microsecond precision the stores keep.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

fn new_message(
    session_id: Uuid,
    content: String,
    role: MessageRole,
    timestamp: DateTime<Utc>,
) -> ChatMessage {
    ChatMessage {
        id: Uuid::now_v7(),
        session_id,
        content,
        role,
        timestamp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_types::error::GatewayError;
    use parley_types::identity::UserId;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // --- In-memory repository ---

    #[derive(Default)]
    struct MemoryChatRepo {
        sessions: std::sync::Mutex<Vec<ChatSession>>,
        messages: std::sync::Mutex<Vec<ChatMessage>>,
    }

    impl ChatRepository for MemoryChatRepo {
        async fn create_session(
            &self,
            session: &ChatSession,
        ) -> Result<ChatSession, RepositoryError> {
            self.sessions.lock().unwrap().push(session.clone());
            Ok(session.clone())
        }

        async fn find_session(
            &self,
            owner: &Owner,
            session_id: &Uuid,
        ) -> Result<Option<ChatSession>, RepositoryError> {
            Ok(self
                .sessions
                .lock()
                .unwrap()
                .iter()
                .find(|s| s.id == *session_id && s.owner == *owner)
                .cloned())
        }

        async fn update_session(&self, session: &ChatSession) -> Result<(), RepositoryError> {
            let mut sessions = self.sessions.lock().unwrap();
            let stored = sessions
                .iter_mut()
                .find(|s| s.id == session.id)
                .ok_or(RepositoryError::NotFound)?;
            stored.title = session.title.clone();
            stored.updated_at = session.updated_at;
            Ok(())
        }

        async fn list_sessions(&self, owner: &Owner) -> Result<Vec<ChatSession>, RepositoryError> {
            Ok(self
                .sessions
                .lock()
                .unwrap()
                .iter()
                .filter(|s| s.owner == *owner)
                .cloned()
                .collect())
        }

        async fn delete_session(
            &self,
            owner: &Owner,
            session_id: &Uuid,
        ) -> Result<(), RepositoryError> {
            let mut sessions = self.sessions.lock().unwrap();
            let before = sessions.len();
            sessions.retain(|s| !(s.id == *session_id && s.owner == *owner));
            if sessions.len() == before {
                return Err(RepositoryError::NotFound);
            }
            self.messages
                .lock()
                .unwrap()
                .retain(|m| m.session_id != *session_id);
            Ok(())
        }

        async fn save_message(&self, message: &ChatMessage) -> Result<(), RepositoryError> {
            self.messages.lock().unwrap().push(message.clone());
            Ok(())
        }

        async fn get_messages(&self, session_id: &Uuid) -> Result<Vec<ChatMessage>, RepositoryError> {
            let mut messages: Vec<ChatMessage> = self
                .messages
                .lock()
                .unwrap()
                .iter()
                .filter(|m| m.session_id == *session_id)
                .cloned()
                .collect();
            messages.sort_by_key(|m| m.timestamp);
            Ok(messages)
        }
    }

    // --- Gateways ---

    struct EchoGateway {
        calls: AtomicUsize,
    }

    impl EchoGateway {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl CompletionGateway for EchoGateway {
        fn name(&self) -> &str {
            "echo"
        }

        async fn complete(&self, prompt: &str) -> Result<String, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("echo: {prompt}"))
        }
    }

    struct FailingGateway;

    impl CompletionGateway for FailingGateway {
        fn name(&self) -> &str {
            "failing"
        }

        async fn complete(&self, _prompt: &str) -> Result<String, GatewayError> {
            Err(GatewayError::Status {
                status: 500,
                body: "boom".to_string(),
            })
        }
    }

    /// Holds every completion until `release` is notified.
    struct GatedGateway {
        entered: tokio::sync::Notify,
        release: tokio::sync::Notify,
    }

    impl CompletionGateway for GatedGateway {
        fn name(&self) -> &str {
            "gated"
        }

        async fn complete(&self, prompt: &str) -> Result<String, GatewayError> {
            self.entered.notify_one();
            self.release.notified().await;
            Ok(format!("late: {prompt}"))
        }
    }

    fn echo_service() -> ChatService<MemoryChatRepo, EchoGateway> {
        ChatService::new(MemoryChatRepo::default(), EchoGateway::new())
    }

    #[tokio::test]
    async fn test_create_session_defaults_title() {
        let service = echo_service();

        let untitled = service.create_session(Owner::Guest, None).await.unwrap();
        assert_eq!(untitled.title, "New Chat");

        let blank = service
            .create_session(Owner::Guest, Some("   ".to_string()))
            .await
            .unwrap();
        assert_eq!(blank.title, "New Chat");

        let titled = service
            .create_session(Owner::Guest, Some(" Trip plans ".to_string()))
            .await
            .unwrap();
        assert_eq!(titled.title, "Trip plans");
        assert_eq!(titled.created_at, titled.updated_at);
    }

    #[tokio::test]
    async fn test_sessions_are_scoped_by_exact_owner() {
        let service = echo_service();
        let alice = Owner::User(UserId::new());
        let bob = Owner::User(UserId::new());

        let guest_session = service.create_session(Owner::Guest, None).await.unwrap();
        let alice_session = service.create_session(alice, None).await.unwrap();

        let guest_list = service.list_sessions(Owner::Guest).await.unwrap();
        assert_eq!(guest_list.len(), 1);
        assert_eq!(guest_list[0].id, guest_session.id);

        let alice_list = service.list_sessions(alice).await.unwrap();
        assert_eq!(alice_list.len(), 1);
        assert_eq!(alice_list[0].id, alice_session.id);

        assert!(service.list_sessions(bob).await.unwrap().is_empty());

        // Cross-scope access is indistinguishable from a missing session.
        let err = service
            .list_messages(alice, guest_session.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::SessionNotFound));
        let err = service
            .send_message(Owner::Guest, alice_session.id, "hello")
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::SessionNotFound));
        let err = service
            .delete_session(bob, alice_session.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::SessionNotFound));
    }

    #[tokio::test]
    async fn test_send_message_stores_pair_and_updates_title() {
        let service = echo_service();
        let session = service.create_session(Owner::Guest, None).await.unwrap();

        let [user, assistant] = service
            .send_message(Owner::Guest, session.id, "Explain recursion please")
            .await
            .unwrap();

        assert_eq!(user.role, MessageRole::User);
        assert_eq!(user.content, "Explain recursion please");
        assert_eq!(assistant.role, MessageRole::Assistant);
        assert_eq!(assistant.content, "echo: Explain recursion please");
        assert!(assistant.timestamp >= user.timestamp);

        let sessions = service.list_sessions(Owner::Guest).await.unwrap();
        assert_eq!(sessions[0].title, "Explain recursion please");
        assert!(sessions[0].updated_at >= session.updated_at);
    }

    #[tokio::test]
    async fn test_title_is_only_derived_while_default() {
        let service = echo_service();
        let session = service.create_session(Owner::Guest, None).await.unwrap();

        service
            .send_message(Owner::Guest, session.id, "a an of")
            .await
            .unwrap();
        let title = &service.list_sessions(Owner::Guest).await.unwrap()[0].title;
        assert_eq!(title, "New Chat");

        service
            .send_message(Owner::Guest, session.id, "hi there friend")
            .await
            .unwrap();
        let title = &service.list_sessions(Owner::Guest).await.unwrap()[0].title;
        assert_eq!(title, "there friend");

        service
            .send_message(Owner::Guest, session.id, "something entirely different")
            .await
            .unwrap();
        let title = &service.list_sessions(Owner::Guest).await.unwrap()[0].title;
        assert_eq!(title, "there friend");
    }

    #[tokio::test]
    async fn test_explicit_title_is_never_overwritten() {
        let service = echo_service();
        let session = service
            .create_session(Owner::Guest, Some("Homework".to_string()))
            .await
            .unwrap();

        service
            .send_message(Owner::Guest, session.id, "Explain recursion")
            .await
            .unwrap();
        let title = &service.list_sessions(Owner::Guest).await.unwrap()[0].title;
        assert_eq!(title, "Homework");
    }

    #[tokio::test]
    async fn test_gateway_failure_stores_fallback_reply() {
        let service = ChatService::new(MemoryChatRepo::default(), FailingGateway);
        let session = service.create_session(Owner::Guest, None).await.unwrap();

        let [user, assistant] = service
            .send_message(Owner::Guest, session.id, "Explain recursion")
            .await
            .unwrap();

        assert_eq!(user.content, "Explain recursion");
        assert_eq!(assistant.role, MessageRole::Assistant);
        assert_eq!(assistant.content, FALLBACK_REPLY);

        let stored = service
            .list_messages(Owner::Guest, session.id)
            .await
            .unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[1].content, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn test_unknown_session_does_not_call_gateway() {
        let service = echo_service();
        let err = service
            .send_message(Owner::Guest, Uuid::now_v7(), "hello there")
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::SessionNotFound));
        assert_eq!(service.gateway.calls.load(Ordering::SeqCst), 0);
        assert!(service.send_locks.is_empty());
    }

    #[tokio::test]
    async fn test_delete_session_removes_messages() {
        let service = echo_service();
        let owner = Owner::User(UserId::new());
        let session = service.create_session(owner, None).await.unwrap();
        service
            .send_message(owner, session.id, "remember this")
            .await
            .unwrap();

        service.delete_session(owner, session.id).await.unwrap();

        let err = service.list_messages(owner, session.id).await.unwrap_err();
        assert!(matches!(err, ChatError::SessionNotFound));
        assert!(service.chat_repo.messages.lock().unwrap().is_empty());

        let err = service.delete_session(owner, session.id).await.unwrap_err();
        assert!(matches!(err, ChatError::SessionNotFound));
    }

    #[tokio::test]
    async fn test_concurrent_sends_keep_pairs_contiguous() {
        let service = Arc::new(echo_service());
        let session = service.create_session(Owner::Guest, None).await.unwrap();

        let mut handles = Vec::new();
        for i in 0..8 {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                service
                    .send_message(Owner::Guest, session.id, &format!("message {i}"))
                    .await
                    .unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let messages = service
            .list_messages(Owner::Guest, session.id)
            .await
            .unwrap();
        assert_eq!(messages.len(), 16);
        for window in messages.windows(2) {
            assert!(window[0].timestamp <= window[1].timestamp);
        }
        for pair in messages.chunks(2) {
            assert_eq!(pair[0].role, MessageRole::User);
            assert_eq!(pair[1].role, MessageRole::Assistant);
            assert_eq!(pair[1].content, format!("echo: {}", pair[0].content));
        }
    }

    #[tokio::test]
    async fn test_session_locks_are_released_after_sends() {
        let service = echo_service();

        for i in 0..50 {
            let session = service.create_session(Owner::Guest, None).await.unwrap();
            service
                .send_message(Owner::Guest, session.id, &format!("question number {i}"))
                .await
                .unwrap();
        }

        assert!(service.send_locks.is_empty());
    }

    #[tokio::test]
    async fn test_session_lock_is_released_when_session_vanishes() {
        let service = echo_service();
        let session = service.create_session(Owner::Guest, None).await.unwrap();
        service.delete_session(Owner::Guest, session.id).await.unwrap();

        let err = service
            .delete_session(Owner::Guest, session.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::SessionNotFound));
        assert!(service.send_locks.is_empty());
    }

    #[tokio::test]
    async fn test_delete_waits_for_in_flight_send() {
        let gateway = GatedGateway {
            entered: tokio::sync::Notify::new(),
            release: tokio::sync::Notify::new(),
        };
        let service = Arc::new(ChatService::new(MemoryChatRepo::default(), gateway));
        let session = service.create_session(Owner::Guest, None).await.unwrap();

        let send = {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                service
                    .send_message(Owner::Guest, session.id, "slow question")
                    .await
            })
        };
        service.gateway.entered.notified().await;

        let delete = {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.delete_session(Owner::Guest, session.id).await })
        };
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert!(!delete.is_finished());
        assert_eq!(service.chat_repo.sessions.lock().unwrap().len(), 1);

        service.gateway.release.notify_one();

        let [user, assistant] = send.await.unwrap().unwrap();
        assert_eq!(user.content, "slow question");
        assert_eq!(assistant.content, "late: slow question");
        delete.await.unwrap().unwrap();

        assert!(service.chat_repo.messages.lock().unwrap().is_empty());
        assert!(service.send_locks.is_empty());
    }
}
