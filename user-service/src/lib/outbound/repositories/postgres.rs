use async_trait::async_trait;
use sqlx::FromRow;
use sqlx::PgPool;

use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserUpdate;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

const EMAIL_UNIQUE_CONSTRAINT: &str = "usuarios_correo_key";

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct UserRow {
    id_usuario: i64,
    nombre: String,
    correo: String,
    contrasena_hash: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId(row.id_usuario),
            display_name: row.nombre,
            email: row.correo,
            password_hash: row.contrasena_hash,
        }
    }
}

fn database_error(e: sqlx::Error) -> UserError {
    tracing::error!(error = %e, "User query failed");
    UserError::DatabaseError(e.to_string())
}

fn write_error(e: sqlx::Error, email: &str) -> UserError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() && db_err.constraint() == Some(EMAIL_UNIQUE_CONSTRAINT) {
            tracing::warn!(email = %email, "Duplicate email rejected by store");
            return UserError::DatabaseError(format!("Email already registered: {}", email));
        }
    }
    database_error(e)
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id_usuario, nombre, correo, contrasena_hash
            FROM usuarios
            WHERE correo = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(row.map(User::from))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id_usuario, nombre, correo, contrasena_hash
            FROM usuarios
            WHERE id_usuario = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(row.map(User::from))
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id_usuario, nombre, correo, contrasena_hash
            FROM usuarios
            ORDER BY id_usuario
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn insert(&self, user: NewUser) -> Result<UserId, UserError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO usuarios (nombre, correo, contrasena_hash)
            VALUES ($1, $2, $3)
            RETURNING id_usuario
            "#,
        )
        .bind(&user.display_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(e, &user.email))?;

        Ok(UserId(id))
    }

    async fn update_by_id(&self, id: &UserId, update: UserUpdate) -> Result<u64, UserError> {
        // A NULL hash parameter keeps the stored value.
        let result = sqlx::query(
            r#"
            UPDATE usuarios
            SET nombre = $2,
                correo = $3,
                contrasena_hash = COALESCE($4, contrasena_hash)
            WHERE id_usuario = $1
            "#,
        )
        .bind(id.0)
        .bind(&update.display_name)
        .bind(&update.email)
        .bind(&update.password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, &update.email))?;

        Ok(result.rows_affected())
    }

    async fn delete_by_id(&self, id: &UserId) -> Result<u64, UserError> {
        let result = sqlx::query(
            r#"
            DELETE FROM usuarios
            WHERE id_usuario = $1
            "#,
        )
        .bind(id.0)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(result.rows_affected())
    }
}
