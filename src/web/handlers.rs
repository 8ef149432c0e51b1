use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    models::{IdentityRecord, IdentitySource},
    utils::ShareLinks,
    web::{ApiError, AppState},
};

const DASHBOARD: &str = include_str!("dashboard.html");

#[derive(Serialize)]
pub struct IdentityResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<IdentitySource>,
    pub identity: IdentityRecord,
    pub share: ShareLinks,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResolveRequest {
    #[serde(default)]
    pub refresh: bool,
}

#[derive(Debug, Deserialize)]
pub struct MintRequest {
    pub tx_hash: String,
}

fn respond(
    state: &AppState,
    identity: IdentityRecord,
    source: Option<IdentitySource>,
) -> Result<Json<IdentityResponse>, ApiError> {
    let share = ShareLinks::for_record(&state.settings.share, &state.settings.mint, &identity)?;
    Ok(Json(IdentityResponse {
        success: true,
        source,
        identity,
        share,
    }))
}

pub async fn dashboard() -> Html<&'static str> {
    Html(DASHBOARD)
}

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "name": state.settings.app.name,
        "version": state.settings.app.version,
    }))
}

pub async fn get_identity(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<IdentityResponse>, ApiError> {
    match state.service.lookup(&address).await? {
        Some(identity) => respond(&state, identity, Some(IdentitySource::Cached)),
        None => Err(ApiError::NotFound(format!("No identity found for {}", address))),
    }
}

pub async fn resolve_identity(
    State(state): State<AppState>,
    Path(address): Path<String>,
    body: Option<Json<ResolveRequest>>,
) -> Result<Json<IdentityResponse>, ApiError> {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let outcome = state.service.resolve(&address, request.refresh).await?;
    respond(&state, outcome.record, Some(outcome.source))
}

pub async fn mint_identity(
    State(state): State<AppState>,
    Path(address): Path<String>,
    body: Result<Json<MintRequest>, JsonRejection>,
) -> Result<Json<IdentityResponse>, ApiError> {
    let Json(request) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let identity = state.service.mint(&address, &request.tx_hash).await?;
    respond(&state, identity, None)
}
