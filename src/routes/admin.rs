//! The admin endpoint: one route multiplexing privileged operations through
//! an `action` field, gated on a pre-shared secret.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, header::AUTHORIZATION},
    routing::get,
};

use crate::{
    dto::admin::{AdminRequest, AdminResponse},
    error::AppError,
    services::admin_service,
    state::SharedState,
};

/// Admin endpoint accepting the action either as query parameters (GET) or
/// as a JSON body (POST).
pub fn router() -> Router<SharedState> {
    Router::new().route("/admin", get(admin_query).post(admin_action))
}

#[utoipa::path(
    get,
    path = "/admin",
    tag = "admin",
    params(AdminRequest),
    responses(
        (status = 200, description = "Action-specific result", body = AdminResponse),
        (status = 400, description = "Unknown action or missing fields"),
        (status = 401, description = "Credential mismatch")
    )
)]
/// Run an admin action described by query parameters.
pub async fn admin_query(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(request): Query<AdminRequest>,
) -> Result<Json<AdminResponse>, AppError> {
    run(state, headers, request).await
}

#[utoipa::path(
    post,
    path = "/admin",
    tag = "admin",
    request_body = AdminRequest,
    responses(
        (status = 200, description = "Action-specific result", body = AdminResponse),
        (status = 400, description = "Unknown action or missing fields"),
        (status = 401, description = "Credential mismatch")
    )
)]
/// Run an admin action described by the JSON body.
pub async fn admin_action(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(query): Query<AdminRequest>,
    payload: Option<Json<AdminRequest>>,
) -> Result<Json<AdminResponse>, AppError> {
    let mut request = payload.map(|Json(body)| body).unwrap_or_default();
    // the secret may ride on the query string even for POSTs
    if request.password.is_none() {
        request.password = query.password;
    }
    run(state, headers, request).await
}

/// Authorize, validate, and dispatch one admin request, in that order.
async fn run(
    state: SharedState,
    headers: HeaderMap,
    request: AdminRequest,
) -> Result<Json<AdminResponse>, AppError> {
    let credential = bearer_token(&headers).or_else(|| request.password.clone());
    admin_service::authorize(&state, credential.as_deref()).map_err(AppError::from)?;

    let command = request.into_command().map_err(AppError::from)?;
    let response = admin_service::dispatch(&state, command).await?;
    Ok(Json(response))
}

/// Extract the secret from an `Authorization: Bearer` header, if present.
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_owned())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn bearer_tokens_are_extracted_from_the_authorization_header() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer hunter2"));
        assert_eq!(bearer_token(&headers), Some("hunter2".into()));
    }

    #[test]
    fn non_bearer_authorization_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcg=="));
        assert_eq!(bearer_token(&headers), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
