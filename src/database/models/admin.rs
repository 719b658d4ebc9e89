use sqlx::FromRow;

/// The single administrator credential. Created only by the `seed` command.
#[derive(Debug, Clone, FromRow)]
pub struct Admin {
    pub id: i32,
    pub email: String,
    pub password_hash: String,
}
