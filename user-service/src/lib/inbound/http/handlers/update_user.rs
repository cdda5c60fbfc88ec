use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::MessageData;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;
use crate::user::ports::UserServicePort;

/// HTTP request body for updating a user (raw JSON)
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(rename = "Nombre", default)]
    pub display_name: Option<String>,
    #[serde(rename = "Correo", default)]
    pub email: Option<String>,
    #[serde(rename = "Contraseña", default)]
    pub password: Option<String>,
}

impl UpdateUserRequest {
    fn try_into_command(self) -> Result<UpdateUserCommand, UserError> {
        UpdateUserCommand::new(
            self.display_name.unwrap_or_default(),
            self.email.unwrap_or_default(),
            self.password,
        )
    }
}

pub async fn update_user<US: UserServicePort>(
    State(state): State<AppState<US>>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    req: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    // Parse user ID and request at HTTP boundary - errors automatically converted
    let user_id = UserId::from_string(&id).map_err(UserError::from)?;
    let Json(req) = req?;
    let command = req.try_into_command()?;

    tracing::debug!(caller = %caller.user_id, target = %user_id, "Updating user");

    state
        .user_service
        .update_user(&user_id, command)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, MessageData::new("User updated")))
}
