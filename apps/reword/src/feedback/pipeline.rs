//! The resume feedback pipeline, run once per `resume_reword` invocation.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error, warn};

use crate::feedback::chunker::{max_wrapped_chunk_chars, split_message, DEFAULT_MAX_CHUNK_CHARS};
use crate::feedback::extract::{join_pages, TextExtractor};
use crate::feedback::prompts::build_feedback_prompt;
use crate::feedback::reply::{RelayError, Reply, ReplyChannel};
use crate::feedback::scratch::ScratchFile;
use crate::feedback::AttachmentFetcher;
use crate::llm_client::{CompletionClient, LlmError};
use crate::models::{Attachment, Invocation};

pub const PROCESSING_MESSAGE: &str = "📄 Processing your resume... ⏳";
pub const INVALID_ATTACHMENT_MESSAGE: &str = "⚠️ Please upload a valid PDF file.";
pub const EXTRACTION_FAILED_MESSAGE: &str =
    "⚠️ Could not extract text from your resume. Ensure it's a readable PDF.";
pub const FAILURE_MESSAGE: &str =
    "⚠️ Something went wrong while reviewing your resume. Please try again later.";

const PDF_EXTENSION: &str = ".pdf";

#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("attachment '{filename}' is not a PDF")]
    InvalidAttachment { filename: String },

    #[error("no text could be extracted from the attachment")]
    ExtractionFailed,

    #[error("failed to download attachment: {0:#}")]
    Download(anyhow::Error),

    #[error("scratch file error: {0}")]
    Scratch(#[from] std::io::Error),

    #[error("text extraction failed: {0:#}")]
    Extract(anyhow::Error),

    #[error("completion request failed: {0}")]
    RemoteService(#[from] LlmError),

    #[error("reply delivery failed: {0}")]
    Relay(#[from] RelayError),
}

impl FeedbackError {
    /// The text shown to the user when this error ends an invocation.
    pub fn user_message(&self) -> &'static str {
        match self {
            FeedbackError::InvalidAttachment { .. } => INVALID_ATTACHMENT_MESSAGE,
            FeedbackError::ExtractionFailed => EXTRACTION_FAILED_MESSAGE,
            _ => FAILURE_MESSAGE,
        }
    }
}

/// How an invocation ended when no unexpected error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The attachment was not a PDF.
    Rejected,
    /// The PDF had no extractable text.
    Unreadable,
    /// Feedback was relayed in `messages` public messages.
    Delivered { messages: usize },
}

/// Accepts only filenames ending in `.pdf` (case-sensitive).
pub fn validate_attachment(attachment: &Attachment) -> Result<(), FeedbackError> {
    if attachment.filename.ends_with(PDF_EXTENSION) {
        Ok(())
    } else {
        Err(FeedbackError::InvalidAttachment {
            filename: attachment.filename.clone(),
        })
    }
}

/// Orchestrates one invocation from attachment intake to relayed feedback.
///
/// Holds no per-invocation state, so a single instance is shared by every
/// concurrent invocation.
pub struct Pipeline {
    completions: Arc<dyn CompletionClient>,
    fetcher: Arc<dyn AttachmentFetcher>,
    extractor: Arc<dyn TextExtractor>,
    scratch_dir: PathBuf,
    max_chunk_chars: usize,
}

impl Pipeline {
    pub fn new(
        completions: Arc<dyn CompletionClient>,
        fetcher: Arc<dyn AttachmentFetcher>,
        extractor: Arc<dyn TextExtractor>,
        scratch_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            completions,
            fetcher,
            extractor,
            scratch_dir: scratch_dir.into(),
            max_chunk_chars: DEFAULT_MAX_CHUNK_CHARS,
        }
    }

    pub fn with_max_chunk_chars(mut self, max_chunk_chars: usize) -> Self {
        self.max_chunk_chars = max_chunk_chars;
        self
    }

    /// Runs the invocation to completion, replying through `reply`.
    ///
    /// User-facing conditions (wrong file type, unreadable PDF) are reported
    /// to the user and return `Ok`. Anything else is logged, announced with a
    /// generic ephemeral notice when the channel still works, and returned.
    pub async fn run(
        &self,
        invocation: &Invocation,
        reply: &dyn ReplyChannel,
    ) -> Result<Outcome, FeedbackError> {
        if let Err(err) = validate_attachment(&invocation.attachment) {
            warn!("Rejected attachment: {err}");
            acknowledge(reply, err.user_message()).await?;
            return Ok(Outcome::Rejected);
        }

        acknowledge(reply, PROCESSING_MESSAGE).await?;

        match self.review(invocation, reply).await {
            Ok(messages) => Ok(Outcome::Delivered { messages }),
            Err(FeedbackError::ExtractionFailed) => {
                warn!("No text extracted from '{}'", invocation.attachment.filename);
                let notice = Reply::ephemeral(EXTRACTION_FAILED_MESSAGE);
                if let Err(err) = reply.follow_up(notice).await {
                    error!("Could not report unreadable PDF: {err}");
                    return Err(err.into());
                }
                Ok(Outcome::Unreadable)
            }
            Err(err) => {
                error!("Resume feedback failed: {err}");
                if !matches!(err, FeedbackError::Relay(_)) {
                    if let Err(notice) = reply.follow_up(Reply::ephemeral(err.user_message())).await {
                        warn!("Could not notify user of failure: {notice}");
                    }
                }
                Err(err)
            }
        }
    }

    async fn review(
        &self,
        invocation: &Invocation,
        reply: &dyn ReplyChannel,
    ) -> Result<usize, FeedbackError> {
        let resume_text = self.extract_text(&invocation.attachment).await?;
        if resume_text.is_empty() {
            return Err(FeedbackError::ExtractionFailed);
        }
        debug!(chars = resume_text.chars().count(), "Extracted resume text");

        let prompt = build_feedback_prompt(&invocation.level, &resume_text);
        let feedback = self.completions.complete(&prompt).await?;

        // the wrapped message, not just the chunk, has to fit the platform ceiling
        let max_chars = self.max_chunk_chars.min(max_wrapped_chunk_chars());
        let chunks = split_message(&feedback, max_chars);
        for chunk in &chunks {
            reply.follow_up(Reply::public(chunk.to_message())).await?;
        }
        Ok(chunks.len())
    }

    /// Downloads the attachment into a scratch file and extracts its text.
    /// The scratch file is gone when this returns, whatever the result.
    async fn extract_text(&self, attachment: &Attachment) -> Result<String, FeedbackError> {
        let bytes = self
            .fetcher
            .fetch(attachment)
            .await
            .map_err(FeedbackError::Download)?;

        let scratch = ScratchFile::create(&self.scratch_dir, &attachment.filename)?;
        scratch.write_all(&bytes).await?;
        debug!(
            "Saved {} bytes (declared {}) to {}",
            bytes.len(),
            attachment.size,
            scratch.path().display()
        );

        let extractor = Arc::clone(&self.extractor);
        let path = scratch.path().to_path_buf();
        let pages = tokio::task::spawn_blocking(move || extractor.extract_pages(&path))
            .await
            .map_err(|e| FeedbackError::Extract(anyhow::anyhow!("extraction task failed: {e}")))?
            .map_err(FeedbackError::Extract)?;

        scratch.remove()?;
        Ok(join_pages(&pages))
    }
}

async fn acknowledge(reply: &dyn ReplyChannel, content: &str) -> Result<(), FeedbackError> {
    reply.respond(Reply::ephemeral(content)).await.map_err(|err| {
        error!("Could not acknowledge invocation: {err}");
        FeedbackError::Relay(err)
    })
}
