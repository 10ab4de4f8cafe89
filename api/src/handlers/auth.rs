use axum::{extract::State, http::StatusCode, Form, Json};
use axum_extra::extract::WithRejection;

use crate::{
    auth::AuthError,
    error::AppError,
    extractors::CurrentUser,
    models::user::{AuthResponse, CreateUser, LoginForm, User},
    AppState,
};

pub async fn signup(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<CreateUser>, AppError>,
) -> Result<(StatusCode, Json<User>), AppError> {
    payload.validate().map_err(AppError::Validation)?;

    let user = state.auth.register(&payload.email, &payload.password).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn login(
    State(state): State<AppState>,
    WithRejection(Form(form), _): WithRejection<Form<LoginForm>, AppError>,
) -> Result<Json<AuthResponse>, AppError> {
    let user = match state.auth.authenticate(&form.username, &form.password).await? {
        Some(user) => user,
        None => {
            tracing::info!("login rejected");
            return Err(AuthError::AuthenticationFailed.into());
        }
    };

    let token = state.auth.issue_token(&user)?;
    tracing::info!(user_id = user.id, "login succeeded");

    Ok(Json(AuthResponse::bearer(token)))
}

pub async fn me(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}
