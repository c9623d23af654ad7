//! Postgres implementation of the UserRepository trait

use anyhow::{anyhow, Error};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{
    error::ErrorKind::UniqueViolation,
    query_as, query_scalar, FromRow,
    Error::{Database, RowNotFound},
};
use uuid::Uuid;

use crate::{
    domain::{
        communication::email_addresses::EmailAddress,
        users::{
            errors::{CreateUserError, FindRecipientsError, GetUserByIdError},
            NewUser, Role, User, UserRepository,
        },
    },
    infrastructure::db::postgres::PostgresDatabase,
};

/// A `NULL` role selects every member.
const FIND_RECIPIENT_EMAILS: &str = r#"
    SELECT DISTINCT email
    FROM users
    WHERE $1::TEXT IS NULL OR role = $1
    ORDER BY email
"#;

/// The value bound to the role column, matching the `users.role` CHECK list
fn role_param(role: Option<Role>) -> Option<&'static str> {
    role.map(|role| role.as_str())
}

#[derive(FromRow)]
struct UserRecord {
    id: Uuid,
    email: String,
    name: String,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRecord> for User {
    type Error = Error;

    fn try_from(record: UserRecord) -> Result<Self, Self::Error> {
        Ok(User {
            id: record.id,
            email: EmailAddress::new_unchecked(&record.email),
            name: record.name,
            role: record.role.parse::<Role>()?,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

#[async_trait]
impl UserRepository for PostgresDatabase {
    #[mutants::skip]
    async fn create_user(&self, user: &NewUser) -> Result<Uuid, CreateUserError> {
        query_scalar::<_, Uuid>(
            r#"
            INSERT INTO users (id, email, name, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(user.id())
        .bind(user.email().as_str())
        .bind(user.name())
        .bind(user.role().as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|err| match err {
            Database(db_err) => match db_err.kind() {
                UniqueViolation => CreateUserError::DuplicateUser {
                    email: user.email().clone(),
                },
                _ => CreateUserError::UnknownError(anyhow!("Unknown database error: {:?}", db_err)),
            },
            _ => CreateUserError::UnknownError(anyhow!("Unknown database error: {:?}", err)),
        })
    }

    #[mutants::skip]
    async fn get_user_by_id(&self, id: &Uuid) -> Result<User, GetUserByIdError> {
        Ok(query_as::<_, UserRecord>(
            r#"
            SELECT id, email, name, role, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| match err {
            RowNotFound => GetUserByIdError::UserNotFound(*id),
            _ => GetUserByIdError::UnknownError(anyhow!("Unknown database error: {:?}", err)),
        })?
        .try_into()?)
    }

    #[mutants::skip]
    async fn find_recipient_emails(
        &self,
        role: Option<Role>,
    ) -> Result<Vec<EmailAddress>, FindRecipientsError> {
        let emails = query_scalar::<_, String>(FIND_RECIPIENT_EMAILS)
            .bind(role_param(role))
            .fetch_all(&self.pool)
            .await
            .map_err(|err| anyhow!("Unknown database error: {:?}", err))?;

        Ok(emails
            .iter()
            .map(|email| EmailAddress::new_unchecked(email))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::{role_param, FIND_RECIPIENT_EMAILS};
    use crate::domain::users::Role;

    const USERS_MIGRATION: &str =
        include_str!("../../../../../migrations/20261019000001_create_users.sql");

    #[test]
    fn test_no_role_binds_null() {
        assert_eq!(role_param(None), None);
        assert!(FIND_RECIPIENT_EMAILS.contains("$1::TEXT IS NULL OR role = $1"));
    }

    #[test]
    fn test_role_binds_stored_value() {
        for role in [Role::Student, Role::Alumni, Role::Donor, Role::Admin] {
            let value = role_param(Some(role)).unwrap_or_default();

            assert!(
                USERS_MIGRATION.contains(&format!("'{value}'")),
                "{value} is not an allowed users.role value"
            );
        }

        assert_eq!(role_param(Some(Role::Alumni)), Some("alumni"));
    }
}
