use async_trait::async_trait;

use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::Credential;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserProfile;
use crate::domain::user::models::UserUpdate;
use crate::user::errors::UserError;

/// Port for user domain service operations.
///
/// Every operation except `login` and `create_user` expects the caller to have
/// authenticated the request already.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Verify credentials and issue a bearer token.
    ///
    /// # Arguments
    /// * `credential` - Email and plaintext password
    ///
    /// # Returns
    /// Signed token valid for the configured lifetime
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password (indistinguishable)
    /// * `Token` - Token signing failed
    /// * `DatabaseError` - Database operation failed
    async fn login(&self, credential: Credential) -> Result<String, UserError>;

    /// Retrieve every user, without password hashes.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_users(&self) -> Result<Vec<UserProfile>, UserError>;

    /// Retrieve user by unique identifier.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get_user(&self, id: &UserId) -> Result<UserProfile, UserError>;

    /// Create new user, hashing the supplied password.
    ///
    /// # Returns
    /// Identifier assigned by the store
    ///
    /// # Errors
    /// * `Password` - Hashing failed
    /// * `DatabaseError` - Database operation failed (including duplicate email)
    async fn create_user(&self, command: CreateUserCommand) -> Result<UserId, UserError>;

    /// Update name and email, and the password when one is given.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `Password` - Hashing failed
    /// * `DatabaseError` - Database operation failed
    async fn update_user(&self, id: &UserId, command: UpdateUserCommand) -> Result<(), UserError>;

    /// Delete existing user.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete_user(&self, id: &UserId) -> Result<(), UserError>;
}

/// Durable storage for user records.
///
/// Uniqueness of email and atomicity of each call are the store's job.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Retrieve user by email address.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;

    /// Retrieve user by identifier.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve all users, ordered by id.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_all(&self) -> Result<Vec<User>, UserError>;

    /// Persist a new user and return its assigned id.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed (including duplicate email)
    async fn insert(&self, user: NewUser) -> Result<UserId, UserError>;

    /// Update the row with the given id.
    ///
    /// # Returns
    /// Number of rows affected (0 when the id does not exist)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn update_by_id(&self, id: &UserId, update: UserUpdate) -> Result<u64, UserError>;

    /// Remove the row with the given id.
    ///
    /// # Returns
    /// Number of rows affected (0 when the id does not exist)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn delete_by_id(&self, id: &UserId) -> Result<u64, UserError>;
}
