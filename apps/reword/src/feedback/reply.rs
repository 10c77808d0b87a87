use async_trait::async_trait;
use thiserror::Error;

/// Who can see a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Only the user who ran the command.
    Ephemeral,
    /// Everyone in the channel.
    Public,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub content: String,
    pub visibility: Visibility,
}

impl Reply {
    pub fn ephemeral(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            visibility: Visibility::Ephemeral,
        }
    }

    pub fn public(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            visibility: Visibility::Public,
        }
    }
}

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("interaction was already acknowledged")]
    AlreadyResponded,

    #[error("interaction is no longer awaiting a response")]
    Closed,

    #[error("failed to deliver message: {0}")]
    Delivery(String),
}

/// The response side of one command invocation.
///
/// `respond` must be called exactly once, before any `follow_up`. Follow-ups
/// are delivered in the order they are awaited.
#[async_trait]
pub trait ReplyChannel: Send + Sync {
    async fn respond(&self, reply: Reply) -> Result<(), RelayError>;

    async fn follow_up(&self, reply: Reply) -> Result<(), RelayError>;
}
