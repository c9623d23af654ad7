//! User repository module

use async_trait::async_trait;
use uuid::Uuid;

#[cfg(test)]
use mockall::mock;

use crate::domain::{
    communication::email_addresses::EmailAddress,
    users::{
        errors::{CreateUserError, FindRecipientsError, GetUserByIdError},
        NewUser, Role, User,
    },
};

/// User repository
#[async_trait]
pub trait UserRepository: Clone + Send + Sync + 'static {
    /// Create a new user
    async fn create_user(&self, user: &NewUser) -> Result<Uuid, CreateUserError>;

    /// Get a user by their ID
    async fn get_user_by_id(&self, id: &Uuid) -> Result<User, GetUserByIdError>;

    /// Distinct email addresses of every member holding `role`, or of every
    /// member when `role` is `None`
    async fn find_recipient_emails(
        &self,
        role: Option<Role>,
    ) -> Result<Vec<EmailAddress>, FindRecipientsError>;
}

#[cfg(test)]
mock! {
    pub UserRepository {}

    impl Clone for UserRepository {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl UserRepository for UserRepository {
        async fn create_user(&self, user: &NewUser) -> Result<Uuid, CreateUserError>;
        async fn get_user_by_id(&self, id: &Uuid) -> Result<User, GetUserByIdError>;
        async fn find_recipient_emails(&self, role: Option<Role>) -> Result<Vec<EmailAddress>, FindRecipientsError>;
    }
}
