//! Outbound communication with members

pub mod campaigns;
pub mod email_addresses;
pub mod mailer;
