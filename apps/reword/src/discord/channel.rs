use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::{oneshot, watch};

use crate::discord::models::InteractionResponse;
use crate::discord::DiscordClient;
use crate::feedback::{RelayError, Reply, ReplyChannel};

/// Reply channel for one interaction received over HTTP.
///
/// The first reply is handed back to the waiting request handler and becomes
/// the HTTP response body; later replies are follow-up webhook messages.
/// Discord only accepts follow-ups once the interaction is acknowledged, so
/// they are held until the handler has taken the first reply.
pub struct InteractionChannel {
    discord: DiscordClient,
    application_id: String,
    token: String,
    initial: Mutex<Option<oneshot::Sender<InteractionResponse>>>,
    handed_off: watch::Receiver<bool>,
}

/// The request handler's side of an [`InteractionChannel`].
pub struct PendingResponse {
    response: oneshot::Receiver<InteractionResponse>,
    handed_off: watch::Sender<bool>,
}

impl PendingResponse {
    /// Waits for the first reply and releases any held follow-ups.
    pub async fn recv(self) -> Result<InteractionResponse, RelayError> {
        let response = self.response.await.map_err(|_| RelayError::Closed)?;
        self.handed_off.send_replace(true);
        Ok(response)
    }
}

impl InteractionChannel {
    pub fn new(
        discord: DiscordClient,
        application_id: String,
        token: String,
    ) -> (Self, PendingResponse) {
        let (tx, rx) = oneshot::channel();
        let (handed_off_tx, handed_off_rx) = watch::channel(false);
        let channel = Self {
            discord,
            application_id,
            token,
            initial: Mutex::new(Some(tx)),
            handed_off: handed_off_rx,
        };
        let pending = PendingResponse {
            response: rx,
            handed_off: handed_off_tx,
        };
        (channel, pending)
    }
}

#[async_trait]
impl ReplyChannel for InteractionChannel {
    async fn respond(&self, reply: Reply) -> Result<(), RelayError> {
        let sender = self
            .initial
            .lock()
            .map_err(|_| RelayError::Delivery("response slot poisoned".to_string()))?
            .take()
            .ok_or(RelayError::AlreadyResponded)?;
        sender
            .send(InteractionResponse::message(reply))
            .map_err(|_| RelayError::Closed)
    }

    async fn follow_up(&self, reply: Reply) -> Result<(), RelayError> {
        // fails only if the handler dropped without taking the first reply
        let mut handed_off = self.handed_off.clone();
        handed_off
            .wait_for(|done| *done)
            .await
            .map(|_| ())
            .map_err(|_| RelayError::Closed)?;

        self.discord
            .create_followup(&self.application_id, &self.token, &reply.into())
            .await
            .map_err(|e| RelayError::Delivery(e.to_string()))
    }
}
