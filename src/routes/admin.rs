// Admin handlers: add/remove/rename/toggle networks, email + code login

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use super::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct AddNetworkRequest {
    #[serde(default)]
    network_id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct RenameRequest {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum AuthStep {
    #[default]
    Send,
    Verify,
}

#[derive(Debug, Deserialize)]
pub(super) struct AuthRequest {
    #[serde(default)]
    step: AuthStep,
    #[serde(default)]
    email: String,
    #[serde(default)]
    code: String,
}

/// POST /api/admin/networks
pub(super) async fn add_network(
    State(state): State<AppState>,
    Json(req): Json<AddNetworkRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let network = state.networks.add(&req.network_id, &req.name, &req.email).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": format!("Network {} added", network.id),
            "network": network,
        })),
    ))
}

/// DELETE /api/admin/networks/{id}
pub(super) async fn remove_network(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    state.networks.remove(&id).await?;
    Ok(Json(json!({
        "success": true,
        "message": format!("Network {} removed", id),
    })))
}

/// POST /api/admin/networks/{id}/rename
pub(super) async fn rename_network(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(req): Json<RenameRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let network = state.networks.rename(&id, &req.name).await?;
    Ok(Json(json!({
        "success": true,
        "message": format!("Network renamed to {}", network.name),
        "network": network,
    })))
}

/// POST /api/admin/networks/{id}/toggle
pub(super) async fn toggle_network(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let network = state.networks.toggle(&id).await?;
    let status = if network.active { "activated" } else { "deactivated" };
    Ok(Json(json!({
        "success": true,
        "message": format!("Network {} {}", network.id, status),
        "network": network,
    })))
}

/// POST /api/admin/networks/{id}/auth: `{step: "send", email?}` then `{step: "verify", code}`.
pub(super) async fn authenticate_network(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(req): Json<AuthRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let network = state
        .networks
        .get(&id)
        .ok_or_else(|| ApiError::NotFound("Network not found".into()))?;
    let tokens = state.networks.tokens();

    match req.step {
        AuthStep::Send => {
            let email = match req.email.trim() {
                "" => network.email.clone(),
                e => e.to_string(),
            };
            if email.is_empty() {
                return Err(ApiError::BadRequest(
                    "Email address required for authentication".into(),
                ));
            }
            if !email.contains('@') {
                return Err(ApiError::BadRequest("Invalid email address".into()));
            }
            let token = state.login.request_code(&email).await?;
            tokens.save_pending(&id, &token)?;
            if email != network.email {
                state.networks.set_email(&id, &email).await?;
            }
            tracing::info!(network_id = %id, "verification code sent");
            Ok(Json(json!({
                "success": true,
                "message": format!("Verification code sent to {}", email),
            })))
        }
        AuthStep::Verify => {
            let code = req.code.trim();
            if code.is_empty() {
                return Err(ApiError::BadRequest("Code required".into()));
            }
            let token = tokens.pending(&id)?.ok_or_else(|| {
                ApiError::BadRequest("Please restart authentication process".into())
            })?;
            state.login.verify_code(&token, code).await?;
            tokens.promote(&id, &token)?;
            tracing::info!(network_id = %id, "network authenticated");
            Ok(Json(json!({
                "success": true,
                "message": format!("Network {} authenticated successfully!", id),
            })))
        }
    }
}
