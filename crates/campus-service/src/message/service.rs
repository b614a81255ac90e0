//! Message service: validated sends with live publish, history, read state.

use std::sync::Arc;

use tracing::{debug, info};

use campus_core::error::AppError;
use campus_database::MessageStore;
use campus_entity::{Message, ReadReceipt};
use campus_realtime::BroadcastHub;

use crate::context::RequestContext;
use crate::conversation::ConversationRegistry;

/// Sends messages and manages read state within accessible conversations.
#[derive(Debug, Clone)]
pub struct MessageService {
    /// Message store.
    messages: Arc<dyn MessageStore>,
    /// Conversation lookup and access checks.
    registry: ConversationRegistry,
    /// Live delivery.
    hub: Arc<BroadcastHub>,
    /// Maximum content length in characters.
    max_content_length: usize,
}

impl MessageService {
    /// Creates a new message service.
    pub fn new(
        messages: Arc<dyn MessageStore>,
        registry: ConversationRegistry,
        hub: Arc<BroadcastHub>,
        max_content_length: usize,
    ) -> Self {
        Self {
            messages,
            registry,
            hub,
            max_content_length,
        }
    }

    /// Persist a message from the caller and push it to live participants.
    ///
    /// Content and access are checked before the write. Once stored, the
    /// message is returned regardless of live delivery.
    pub async fn send(
        &self,
        ctx: &RequestContext,
        conversation_id: i64,
        content: &str,
    ) -> Result<Message, AppError> {
        self.validate_content(content)?;
        let conversation = self.registry.get_accessible(ctx, conversation_id).await?;

        let message = self
            .messages
            .append(conversation.id, ctx.actor, content)
            .await?;

        info!(
            conversation_id,
            message_id = message.id,
            sender = %ctx.actor,
            "Message sent"
        );

        self.hub
            .publish_message(&conversation, &message, ctx.connection_id);
        Ok(message)
    }

    /// All messages of a conversation, oldest first.
    pub async fn history(
        &self,
        ctx: &RequestContext,
        conversation_id: i64,
    ) -> Result<Vec<Message>, AppError> {
        self.registry.get_accessible(ctx, conversation_id).await?;
        self.messages.history(conversation_id).await
    }

    /// Mark every message the caller did not send as read.
    ///
    /// Both participants are notified when anything changed. A repeat call
    /// reports zero and performs no writes.
    pub async fn mark_as_read(
        &self,
        ctx: &RequestContext,
        conversation_id: i64,
    ) -> Result<ReadReceipt, AppError> {
        let conversation = self.registry.get_accessible(ctx, conversation_id).await?;
        let updated_count = self.messages.mark_read(conversation_id, ctx.actor).await?;

        let receipt = ReadReceipt {
            conversation_id,
            reader: ctx.actor,
            updated_count,
        };

        if updated_count > 0 {
            debug!(conversation_id, reader = %ctx.actor, updated_count, "Messages marked read");
            self.hub.publish_read(&conversation, &receipt);
        }
        Ok(receipt)
    }

    /// Messages the caller did not send that are still unread.
    pub async fn unread_count(
        &self,
        ctx: &RequestContext,
        conversation_id: i64,
    ) -> Result<i64, AppError> {
        self.registry.get_accessible(ctx, conversation_id).await?;
        self.messages.unread_count(conversation_id, ctx.actor).await
    }

    /// The newest message of a conversation.
    pub async fn last_message(
        &self,
        ctx: &RequestContext,
        conversation_id: i64,
    ) -> Result<Option<Message>, AppError> {
        self.registry.get_accessible(ctx, conversation_id).await?;
        self.messages.last_message(conversation_id).await
    }

    fn validate_content(&self, content: &str) -> Result<(), AppError> {
        if content.trim().is_empty() {
            return Err(AppError::validation("Message content must not be empty"));
        }
        if content.contains('\0') {
            return Err(AppError::validation("Message content must not contain NUL characters"));
        }
        let length = content.chars().count();
        if length > self.max_content_length {
            return Err(AppError::validation(format!(
                "Message content is {length} characters; the limit is {}",
                self.max_content_length
            )));
        }
        Ok(())
    }
}
