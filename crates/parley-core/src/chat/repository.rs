//! ChatRepository trait definition.
//!
//! Provides owner-scoped CRUD for chat sessions and append/list for messages.
//! Follows the same RPITIT pattern as UserRepository.

use parley_types::chat::{ChatMessage, ChatSession};
use parley_types::error::RepositoryError;
use parley_types::identity::Owner;
use uuid::Uuid;

/// Repository trait for chat session and message persistence.
///
/// Every session lookup takes the caller's `Owner`; a session stored under a
/// different owner (including guest vs. user) behaves as if it did not exist.
///
/// Implementations live in parley-infra (e.g., `SqliteChatRepository`).
pub trait ChatRepository: Send + Sync {
    /// Create a new chat session.
    fn create_session(
        &self,
        session: &ChatSession,
    ) -> impl std::future::Future<Output = Result<ChatSession, RepositoryError>> + Send;

    /// Get a session by ID, only if it belongs to exactly `owner`.
    fn find_session(
        &self,
        owner: &Owner,
        session_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<ChatSession>, RepositoryError>> + Send;

    /// Persist the mutable fields of a session (title, updated_at).
    fn update_session(
        &self,
        session: &ChatSession,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// List sessions belonging to exactly `owner`, most recently updated first.
    fn list_sessions(
        &self,
        owner: &Owner,
    ) -> impl std::future::Future<Output = Result<Vec<ChatSession>, RepositoryError>> + Send;

    /// Delete a session owned by `owner` together with all of its messages.
    ///
    /// Must be atomic: either both the messages and the session are gone or
    /// nothing changed. Returns `RepositoryError::NotFound` when no session
    /// with that id exists under that owner.
    fn delete_session(
        &self,
        owner: &Owner,
        session_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Save a new message within a session.
    fn save_message(
        &self,
        message: &ChatMessage,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Get messages for a session, ordered by timestamp ASC.
    fn get_messages(
        &self,
        session_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, RepositoryError>> + Send;
}
