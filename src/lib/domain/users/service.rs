//! User service module

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

#[cfg(test)]
use mockall::mock;

use crate::domain::users::{
    errors::{CreateUserError, GetUserByIdError},
    NewUser, User, UserRepository,
};

/// User service
#[async_trait]
pub trait UserService: Clone + Send + Sync + 'static {
    /// Creates a new member.
    ///
    /// # Arguments
    /// * `user` - A reference to a [`NewUser`] containing the member details.
    ///
    /// # Returns
    /// A [`Result`] which is [`Ok`] containing the user's UUID if the user is successfully created,
    /// or an [`Err`] containing a [`CreateUserError`] if the user cannot be created.
    async fn create_user(&self, user: &NewUser) -> Result<Uuid, CreateUserError>;

    /// Retrieves a user by their ID.
    ///
    /// # Arguments
    /// * `id` - The UUID of the user to retrieve.
    ///
    /// # Returns
    /// A [`Result`] which is [`Ok`] containing the [`User`] if found,
    /// or an [`Err`] containing a [`GetUserByIdError`] if the user cannot be found.
    async fn get_user_by_id(&self, id: &Uuid) -> Result<User, GetUserByIdError>;
}

#[cfg(test)]
mock! {
    pub UserService {}

    impl Clone for UserService {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl UserService for UserService {
        async fn create_user(&self, user: &NewUser) -> Result<Uuid, CreateUserError>;
        async fn get_user_by_id(&self, id: &Uuid) -> Result<User, GetUserByIdError>;
    }
}

/// User service implementation
#[derive(Debug, Clone)]
pub struct UserServiceImpl<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
}

impl<R> UserServiceImpl<R>
where
    R: UserRepository,
{
    /// Create a new user service
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R> UserService for UserServiceImpl<R>
where
    R: UserRepository,
{
    async fn create_user(&self, user: &NewUser) -> Result<Uuid, CreateUserError> {
        let id = self.repo.create_user(user).await?;

        info!(user_id = %id, role = %user.role(), "member created");

        Ok(id)
    }

    async fn get_user_by_id(&self, id: &Uuid) -> Result<User, GetUserByIdError> {
        self.repo.get_user_by_id(id).await
    }
}
