use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use helpdesk_db::StoreError;
use helpdesk_types::api::{Claims, SubmitTicketRequest};
use helpdesk_types::models::{Role, Ticket};

use crate::auth::AppState;
use crate::error::{ApiError, join_err};

pub async fn submit_ticket(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SubmitTicketRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if claims.role != Role::Client {
        return Err(ApiError::Forbidden("client role required"));
    }

    let account_id = claims.sub;
    let st = state.clone();
    let row = tokio::task::spawn_blocking(move || {
        // Snapshot fields come from the account as stored right now
        let client = st
            .db
            .get_account(account_id)?
            .ok_or(StoreError::InvalidCredentials)?;
        st.db
            .submit_ticket(&client, &req.heading, &req.description, &req.phone)
    })
    .await
    .map_err(join_err)??;

    Ok((StatusCode::CREATED, Json(row.into_ticket())))
}

pub async fn list_tickets(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    if claims.role != Role::Support {
        return Err(ApiError::Forbidden("support role required"));
    }

    let st = state.clone();
    let rows = tokio::task::spawn_blocking(move || st.db.list_tickets())
        .await
        .map_err(join_err)??;

    let tickets: Vec<Ticket> = rows.into_iter().map(|row| row.into_ticket()).collect();
    Ok(Json(tickets))
}

pub async fn close_ticket(
    State(state): State<AppState>,
    Path(ticket_id): Path<i64>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    if claims.role != Role::Support {
        return Err(ApiError::Forbidden("support role required"));
    }

    let st = state.clone();
    let row = tokio::task::spawn_blocking(move || st.db.close_ticket(ticket_id))
        .await
        .map_err(join_err)??;

    Ok(Json(row.into_ticket()))
}
