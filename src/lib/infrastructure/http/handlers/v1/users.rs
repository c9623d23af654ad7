//! Member handlers

pub mod create_user;
pub mod get_user_by_id;
