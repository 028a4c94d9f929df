use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::{
    models::{ProfileChanges, UserId, UserProfile},
    ports::outbound::{ProfileRepository, UsernameLookup},
    FieldErrors, ProfileError,
};

pub struct PostgresProfileRepository {
    pool: PgPool,
}

impl PostgresProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ProfileRow {
    id: i32,
    email: String,
    username: String,
    bio: Option<String>,
    avatar: Option<String>,
    following_count: i64,
    followers_count: i64,
    bookmarks_count: i64,
}

impl TryFrom<ProfileRow> for UserProfile {
    type Error = ProfileError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        let counter = |name: &str, value: i64| {
            u32::try_from(value)
                .map_err(|_| ProfileError::repository(format!("{name} out of range: {value}")))
        };

        Ok(Self {
            id: UserId::new(row.id),
            email: row.email,
            username: row.username,
            bio: row.bio,
            avatar: row.avatar,
            following_count: counter("following_count", row.following_count)?,
            followers_count: counter("followers_count", row.followers_count)?,
            bookmarks_count: counter("bookmarks_count", row.bookmarks_count)?,
        })
    }
}

fn map_sqlx_error(err: sqlx::Error) -> ProfileError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            // Lost a race against another update claiming the same username.
            let mut errors = FieldErrors::new();
            errors.add("username", "The username has already been taken.");
            ProfileError::Validation(errors)
        }
        _ => ProfileError::repository(err.to_string()),
    }
}

#[async_trait]
impl UsernameLookup for PostgresProfileRepository {
    async fn is_username_taken(
        &self,
        username: &str,
        except: UserId,
    ) -> Result<bool, ProfileError> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM users
                WHERE username = $1 AND id <> $2
            )
            "#,
        )
        .bind(username)
        .bind(except.as_i32())
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)
    }
}

#[async_trait]
impl ProfileRepository for PostgresProfileRepository {
    async fn get_profile(&self, user_id: &UserId) -> Result<Option<UserProfile>, ProfileError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT id, email, username, bio, avatar,
                   following_count, followers_count, bookmarks_count
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_i32())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(UserProfile::try_from).transpose()
    }

    async fn update_profile(
        &self,
        user_id: &UserId,
        changes: &ProfileChanges,
    ) -> Result<UserProfile, ProfileError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            UPDATE users
            SET username = $2,
                bio = $3,
                avatar = $4,
                updated_at = now()
            WHERE id = $1
            RETURNING id, email, username, bio, avatar,
                      following_count, followers_count, bookmarks_count
            "#,
        )
        .bind(user_id.as_i32())
        .bind(&changes.username)
        .bind(&changes.bio)
        .bind(&changes.avatar)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?
        .ok_or(ProfileError::NotFound)?;

        UserProfile::try_from(row)
    }
}
