use crate::{
    AppState,
    relay::EventOutcome,
    types::{AppError, Result, WebhookPayload},
};
use axum::{body::Bytes, extract::State};
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

/// Receive a webhook callback from the messaging platform.
///
/// Runs behind the signature middleware, so the body is already verified.
/// Events are relayed in order; the first upstream failure aborts the rest
/// and is returned as a server error.
pub async fn callback(State(state): State<AppState>, body: Bytes) -> Result<&'static str> {
    let request_id = Uuid::new_v4();

    async move {
        let payload: WebhookPayload = serde_json::from_slice(&body)
            .map_err(|e| AppError::InvalidInput(format!("Malformed webhook payload: {}", e)))?;

        let outcomes = state.relay.handle_payload(&payload).await?;
        let replied = outcomes
            .iter()
            .filter(|o| **o == EventOutcome::Replied)
            .count();

        info!(events = outcomes.len(), replied, "Webhook processed");
        Ok("OK")
    }
    .instrument(info_span!("webhook", %request_id))
    .await
}
