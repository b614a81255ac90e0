//! PostgreSQL repository implementations of the store traits.

pub mod conversation;
pub mod directory;
pub mod message;
pub mod rows;

pub use conversation::ConversationRepository;
pub use directory::DirectoryRepository;
pub use message::MessageRepository;
