// Resume feedback pipeline:
// validate → acknowledge → download → scratch file → extract → prompt → complete → chunked relay.
// All LLM calls go through llm_client; all platform I/O goes through the traits below.

pub mod chunker;
pub mod extract;
pub mod pipeline;
pub mod prompts;
pub mod reply;
pub mod scratch;

use async_trait::async_trait;
use bytes::Bytes;

use crate::models::Attachment;

pub use pipeline::{Outcome, Pipeline};
pub use reply::{RelayError, Reply, ReplyChannel, Visibility};

/// Downloads attachment content.
#[async_trait]
pub trait AttachmentFetcher: Send + Sync {
    async fn fetch(&self, attachment: &Attachment) -> anyhow::Result<Bytes>;
}
