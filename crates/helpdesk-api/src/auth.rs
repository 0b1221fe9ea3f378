use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use jsonwebtoken::{EncodingKey, Header, encode};

use helpdesk_db::Database;
use helpdesk_db::models::AccountRow;
use helpdesk_types::api::{Claims, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};

use crate::error::{ApiError, join_err};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // Hashing and the insert are blocking work, run off the async runtime
    let st = state.clone();
    let account = tokio::task::spawn_blocking(move || {
        st.db.register(&req.name, &req.email, &req.password, req.role)
    })
    .await
    .map_err(join_err)??;

    let token = create_token(&state.jwt_secret, &account)?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            account_id: account.id,
            token,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let st = state.clone();
    let account = tokio::task::spawn_blocking(move || {
        st.db.authenticate(&req.email, &req.password, req.role)
    })
    .await
    .map_err(join_err)??;

    let token = create_token(&state.jwt_secret, &account)?;

    Ok(Json(LoginResponse {
        account: account.into_account(),
        token,
    }))
}

fn create_token(secret: &str, account: &AccountRow) -> Result<String, ApiError> {
    let claims = Claims {
        sub: account.id,
        email: account.email.clone(),
        role: account.role(),
        exp: (chrono::Utc::now() + chrono::Duration::days(30)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("token creation failed: {e}")))
}
