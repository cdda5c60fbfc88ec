use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

/// Registration is public: no bearer token is required here.
pub async fn create_user<US: UserServicePort>(
    State(state): State<AppState<US>>,
    body: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<ApiSuccess<CreateUserResponseData>, ApiError> {
    let Json(body) = body?;
    state
        .user_service
        .create_user(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|id| {
            ApiSuccess::new(
                StatusCode::CREATED,
                CreateUserResponseData {
                    message: "User created".to_string(),
                    id: id.0,
                },
            )
        })
}

/// HTTP request body for creating a user (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateUserRequest {
    #[serde(rename = "Nombre", default)]
    display_name: Option<String>,
    #[serde(rename = "Correo", default)]
    email: Option<String>,
    #[serde(rename = "Contraseña", default)]
    password: Option<String>,
}

impl CreateUserRequest {
    fn try_into_command(self) -> Result<CreateUserCommand, UserError> {
        CreateUserCommand::new(
            self.display_name.unwrap_or_default(),
            self.email.unwrap_or_default(),
            self.password.unwrap_or_default(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateUserResponseData {
    #[serde(rename = "mensaje")]
    pub message: String,
    #[serde(rename = "IdUsuario")]
    pub id: i64,
}
