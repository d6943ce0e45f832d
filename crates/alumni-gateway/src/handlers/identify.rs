//! Identify handler (op 2)

use super::{HandlerError, HandlerResult};
use crate::connection::Connection;
use crate::protocol::{IdentifyPayload, ReadyPayload};
use crate::server::GatewayState;
use alumni_service::Actor;
use std::sync::Arc;

pub struct IdentifyHandler;

impl IdentifyHandler {
    /// Authenticate the connection and register it under the token's name.
    ///
    /// On success the name's relay channel is subscribed and `READY` is sent.
    pub async fn handle(
        state: &GatewayState,
        connection: &Arc<Connection>,
        payload: IdentifyPayload,
    ) -> HandlerResult<()> {
        if connection.is_authenticated().await {
            return Err(HandlerError::AlreadyAuthenticated);
        }

        let actor = Self::authenticate(state, payload.bare_token()).await?;
        let session_id = connection.session_id().to_string();

        match state.event_dispatcher().attach(&session_id, &actor.name).await {
            Ok(true) => {}
            Ok(false) => {
                return Err(HandlerError::Internal("Connection closed during identify".to_string()));
            }
            Err(e) => {
                // The connection still works for sending; it just won't receive relays
                tracing::warn!(name = %actor.name, error = %e, "Failed to subscribe relay channel");
            }
        }

        let ready = ReadyPayload {
            session_id: session_id.clone(),
            name: actor.name.clone(),
        };
        let data = serde_json::to_value(&ready).map_err(|e| HandlerError::Internal(e.to_string()))?;

        connection
            .dispatch(ReadyPayload::EVENT, data)
            .await
            .map_err(|e| HandlerError::Internal(format!("Failed to send READY: {e}")))?;

        tracing::info!(session_id = %session_id, name = %actor.name, "Client identified");

        Ok(())
    }

    async fn authenticate(state: &GatewayState, token: &str) -> HandlerResult<Actor> {
        let claims = state
            .service_context()
            .jwt_service()
            .validate(token)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token validation failed");
                HandlerError::AuthenticationFailed(e.to_string())
            })?;

        let actor = Actor::try_from(&claims).map_err(|e| HandlerError::AuthenticationFailed(e.to_string()))?;

        // Tokens outlive deleted accounts
        state
            .service_context()
            .account_repo()
            .find_by_id(actor.id)
            .await?
            .ok_or_else(|| HandlerError::AuthenticationFailed("Account not found".to_string()))?;

        Ok(actor)
    }
}
