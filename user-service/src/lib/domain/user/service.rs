use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;

use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::Credential;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserProfile;
use crate::domain::user::models::UserUpdate;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for user operations.
///
/// Concrete implementation of UserServicePort with dependency injection.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `authenticator` - Password hashing and token issuance
    ///
    /// # Returns
    /// Configured user service instance
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn login(&self, credential: Credential) -> Result<String, UserError> {
        let Some(user) = self.repository.find_by_email(&credential.email).await? else {
            tracing::debug!("Login rejected: unknown email");
            return Err(self.authenticator.reject_unknown(&credential.password).into());
        };

        let result = self
            .authenticator
            .authenticate(&credential.password, &user.password_hash, user.id.0, &user.email)
            .map_err(|e| {
                tracing::debug!(user_id = %user.id, error = %e, "Login rejected");
                UserError::from(e)
            })?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(result.access_token)
    }

    async fn list_users(&self) -> Result<Vec<UserProfile>, UserError> {
        let users = self.repository.list_all().await?;
        Ok(users.into_iter().map(UserProfile::from).collect())
    }

    async fn get_user(&self, id: &UserId) -> Result<UserProfile, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .map(UserProfile::from)
            .ok_or(UserError::NotFound(*id))
    }

    async fn create_user(&self, command: CreateUserCommand) -> Result<UserId, UserError> {
        let password_hash = self.authenticator.hash_password(&command.password)?;

        let id = self
            .repository
            .insert(NewUser {
                display_name: command.display_name,
                email: command.email,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = %id, "User created");

        Ok(id)
    }

    async fn update_user(&self, id: &UserId, command: UpdateUserCommand) -> Result<(), UserError> {
        let password_hash = command
            .password
            .as_deref()
            .map(|password| self.authenticator.hash_password(password))
            .transpose()?;
        let rehashed = password_hash.is_some();

        let rows_affected = self
            .repository
            .update_by_id(
                id,
                UserUpdate {
                    display_name: command.display_name,
                    email: command.email,
                    password_hash,
                },
            )
            .await?;

        if rows_affected == 0 {
            return Err(UserError::NotFound(*id));
        }

        tracing::info!(user_id = %id, password_changed = rehashed, "User updated");

        Ok(())
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), UserError> {
        let rows_affected = self.repository.delete_by_id(id).await?;

        if rows_affected == 0 {
            return Err(UserError::NotFound(*id));
        }

        tracing::info!(user_id = %id, "User deleted");

        Ok(())
    }
}
