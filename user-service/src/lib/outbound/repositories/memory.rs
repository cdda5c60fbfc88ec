use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserUpdate;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// Process-local user store.
///
/// Assigns ids from 1 upwards and enforces email uniqueness like the
/// PostgreSQL schema does. Contents are lost when the process exits.
#[derive(Default)]
pub struct InMemoryUserRepository {
    state: RwLock<State>,
}

#[derive(Default)]
struct State {
    last_id: i64,
    users: BTreeMap<i64, User>,
}

impl State {
    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.users
            .values()
            .any(|user| user.email == email && Some(user.id.0) != except)
    }
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn duplicate_email(email: &str) -> UserError {
    UserError::DatabaseError(format!("Email already registered: {}", email))
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|user| user.email == email).cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let state = self.state.read().await;
        Ok(state.users.get(&id.0).cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        let state = self.state.read().await;
        Ok(state.users.values().cloned().collect())
    }

    async fn insert(&self, user: NewUser) -> Result<UserId, UserError> {
        let mut state = self.state.write().await;

        if state.email_taken(&user.email, None) {
            return Err(duplicate_email(&user.email));
        }

        state.last_id += 1;
        let id = UserId(state.last_id);
        state.users.insert(
            id.0,
            User {
                id,
                display_name: user.display_name,
                email: user.email,
                password_hash: user.password_hash,
            },
        );

        Ok(id)
    }

    async fn update_by_id(&self, id: &UserId, update: UserUpdate) -> Result<u64, UserError> {
        let mut state = self.state.write().await;

        if !state.users.contains_key(&id.0) {
            return Ok(0);
        }
        if state.email_taken(&update.email, Some(id.0)) {
            return Err(duplicate_email(&update.email));
        }

        let Some(user) = state.users.get_mut(&id.0) else {
            return Ok(0);
        };
        user.display_name = update.display_name;
        user.email = update.email;
        if let Some(password_hash) = update.password_hash {
            user.password_hash = password_hash;
        }

        Ok(1)
    }

    async fn delete_by_id(&self, id: &UserId) -> Result<u64, UserError> {
        let mut state = self.state.write().await;
        Ok(state.users.remove(&id.0).map_or(0, |_| 1))
    }
}
