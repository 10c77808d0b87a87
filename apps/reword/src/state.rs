use std::sync::Arc;

use crate::discord::signature::SignatureVerifier;
use crate::discord::DiscordClient;
use crate::feedback::Pipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    /// Used for follow-up messages on the interactions it acknowledges.
    pub discord: DiscordClient,
    pub verifier: SignatureVerifier,
}
