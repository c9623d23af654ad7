//! Domain layer: members, email addresses, mailing and campaigns

pub mod communication;
pub mod users;
