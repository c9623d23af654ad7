//! Member directory: users, their roles, and address lookups by role.

mod repository;
mod role;
mod service;
mod user;

pub mod errors;

pub use repository::UserRepository;
pub use role::{Role, UnknownRoleError};
pub use service::{UserService, UserServiceImpl};
pub use user::{NewUser, User};
