//! Axum route handler for the Discord interactions endpoint.

use anyhow::anyhow;
use axum::{body::Bytes, extract::State, http::HeaderMap, Json};
use tracing::{info, info_span, warn, Instrument};

use crate::discord::channel::InteractionChannel;
use crate::discord::commands::parse_resume_reword;
use crate::discord::models::{
    Interaction, InteractionResponse, INTERACTION_APPLICATION_COMMAND, INTERACTION_PING,
};
use crate::discord::signature::{SIGNATURE_HEADER, TIMESTAMP_HEADER};
use crate::errors::AppError;
use crate::feedback::Outcome;
use crate::state::AppState;

/// POST /interactions
///
/// Verifies the request signature, answers PINGs, and hands commands to the
/// feedback pipeline. The pipeline's first reply is returned as the HTTP
/// response; the rest of the invocation continues in the background.
pub async fn handle_interaction(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<InteractionResponse>, AppError> {
    let signature = header(&headers, SIGNATURE_HEADER)?;
    let timestamp = header(&headers, TIMESTAMP_HEADER)?;
    state
        .verifier
        .verify(timestamp, &body, signature)
        .map_err(|e| {
            warn!("Rejected interaction: {e}");
            AppError::Unauthorized
        })?;

    let interaction: Interaction = serde_json::from_slice(&body)
        .map_err(|e| AppError::Validation(format!("Malformed interaction payload: {e}")))?;

    match interaction.kind {
        INTERACTION_PING => Ok(Json(InteractionResponse::pong())),
        INTERACTION_APPLICATION_COMMAND => dispatch_command(state, interaction).await.map(Json),
        other => Err(AppError::Validation(format!(
            "Unsupported interaction type {other}"
        ))),
    }
}

async fn dispatch_command(
    state: AppState,
    interaction: Interaction,
) -> Result<InteractionResponse, AppError> {
    let data = interaction
        .data
        .as_ref()
        .ok_or_else(|| AppError::Validation("Command interaction has no data".to_string()))?;
    let invocation =
        parse_resume_reword(data).map_err(|e| AppError::Validation(e.to_string()))?;

    let (channel, pending) = InteractionChannel::new(
        state.discord.clone(),
        interaction.application_id,
        interaction.token,
    );
    let span = info_span!(
        "invocation",
        id = %invocation.id,
        interaction = %interaction.id,
        filename = %invocation.attachment.filename,
        level = %invocation.level
    );
    let pipeline = state.pipeline.clone();
    tokio::spawn(
        async move {
            match pipeline.run(&invocation, &channel).await {
                Ok(Outcome::Delivered { messages }) => info!(messages, "Resume feedback delivered"),
                Ok(outcome) => info!(?outcome, "Invocation finished"),
                // the pipeline logs every failure before returning it
                Err(_) => {}
            }
        }
        .instrument(span),
    );

    pending.recv().await.map_err(|_| {
        AppError::Internal(anyhow!(
            "pipeline finished without acknowledging the interaction"
        ))
    })
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Result<&'a str, AppError> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)
}
