use std::fmt;
use std::str::FromStr;

use crate::user::errors::UserError;
use crate::user::errors::UserIdError;

/// Stored user record.
///
/// Only the service and the repositories see this type. Anything leaving the
/// domain goes through [`UserProfile`], which has no hash.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub display_name: String,
    pub email: String,
    pub password_hash: String,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("display_name", &self.display_name)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

/// Public view of a user record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: UserId,
    pub display_name: String,
    pub email: String,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            display_name: user.display_name,
            email: user.email,
        }
    }
}

/// User identifier, assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub i64);

impl UserId {
    /// Parse a user ID from a path segment.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a base-10 integer
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        s.parse::<i64>()
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(format!("{}: {}", s, e)))
    }
}

impl FromStr for UserId {
    type Err = UserIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

fn required(field: &'static str, value: String) -> Result<String, UserError> {
    if value.is_empty() {
        Err(UserError::Validation(field))
    } else {
        Ok(value)
    }
}

/// Login credentials. Lives only for the duration of a login call.
pub struct Credential {
    pub email: String,
    pub password: String,
}

impl Credential {
    /// # Errors
    /// * `Validation` - Email or password is empty
    pub fn new(email: String, password: String) -> Result<Self, UserError> {
        Ok(Self {
            email: required("Correo", email)?,
            password: required("Contraseña", password)?,
        })
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Command to create a new user.
#[derive(Debug)]
pub struct CreateUserCommand {
    pub display_name: String,
    pub email: String,
    pub password: String,
}

impl CreateUserCommand {
    /// Construct a new create user command.
    ///
    /// # Arguments
    /// * `display_name` - Display name
    /// * `email` - Email address (uniqueness is enforced by the store)
    /// * `password` - Plain text password (will be hashed by service)
    ///
    /// # Errors
    /// * `Validation` - Any of the three fields is empty
    pub fn new(display_name: String, email: String, password: String) -> Result<Self, UserError> {
        Ok(Self {
            display_name: required("Nombre", display_name)?,
            email: required("Correo", email)?,
            password: required("Contraseña", password)?,
        })
    }
}

/// Command to update an existing user.
///
/// Name and email are always written. The stored hash is replaced only when a
/// new password is supplied.
#[derive(Debug)]
pub struct UpdateUserCommand {
    pub display_name: String,
    pub email: String,
    pub password: Option<String>,
}

impl UpdateUserCommand {
    /// # Errors
    /// * `Validation` - Name or email is empty
    pub fn new(
        display_name: String,
        email: String,
        password: Option<String>,
    ) -> Result<Self, UserError> {
        Ok(Self {
            display_name: required("Nombre", display_name)?,
            email: required("Correo", email)?,
            // An empty password means "keep the current one".
            password: password.filter(|p| !p.is_empty()),
        })
    }
}

/// Row to insert; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub display_name: String,
    pub email: String,
    pub password_hash: String,
}

/// Column values for a conditional update by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserUpdate {
    pub display_name: String,
    pub email: String,
    /// `None` leaves the stored hash untouched.
    pub password_hash: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_from_string() {
        assert_eq!(UserId::from_string("42"), Ok(UserId(42)));
        assert_eq!("7".parse::<UserId>(), Ok(UserId(7)));
        assert!(UserId::from_string("abc").is_err());
        assert!(UserId::from_string("").is_err());
        assert!(UserId::from_string("1.5").is_err());
    }

    #[test]
    fn test_create_command_requires_all_fields() {
        assert!(CreateUserCommand::new("Juan".into(), "juan@x.com".into(), "123456".into()).is_ok());

        let missing_name = CreateUserCommand::new("".into(), "juan@x.com".into(), "123456".into());
        assert!(matches!(missing_name, Err(UserError::Validation("Nombre"))));

        let missing_email = CreateUserCommand::new("Juan".into(), "".into(), "123456".into());
        assert!(matches!(missing_email, Err(UserError::Validation("Correo"))));

        let missing_password = CreateUserCommand::new("Juan".into(), "juan@x.com".into(), "".into());
        assert!(matches!(missing_password, Err(UserError::Validation("Contraseña"))));
    }

    #[test]
    fn test_credential_requires_both_fields() {
        assert!(Credential::new("juan@x.com".into(), "123456".into()).is_ok());
        assert!(Credential::new("".into(), "123456".into()).is_err());
        assert!(Credential::new("juan@x.com".into(), "".into()).is_err());
    }

    #[test]
    fn test_update_command_empty_password_keeps_hash() {
        let command = UpdateUserCommand::new("Juan".into(), "juan@x.com".into(), Some(String::new()))
            .unwrap();
        assert!(command.password.is_none());

        let command = UpdateUserCommand::new("Juan".into(), "juan@x.com".into(), Some("nueva".into()))
            .unwrap();
        assert_eq!(command.password.as_deref(), Some("nueva"));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let user = User {
            id: UserId(1),
            display_name: "Juan".to_string(),
            email: "juan@x.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
        };
        let credential = Credential::new("juan@x.com".into(), "123456".into()).unwrap();

        assert!(!format!("{:?}", user).contains("$argon2id$secret"));
        assert!(!format!("{:?}", credential).contains("123456"));
    }

    #[test]
    fn test_profile_drops_hash() {
        let user = User {
            id: UserId(3),
            display_name: "Ana".to_string(),
            email: "ana@x.com".to_string(),
            password_hash: "hash".to_string(),
        };

        let profile = UserProfile::from(user);
        assert_eq!(profile.id, UserId(3));
        assert_eq!(profile.display_name, "Ana");
        assert_eq!(profile.email, "ana@x.com");
    }
}
