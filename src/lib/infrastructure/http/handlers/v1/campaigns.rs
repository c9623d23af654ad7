//! Campaign handlers

pub mod list_campaigns;
pub mod send_campaign;
