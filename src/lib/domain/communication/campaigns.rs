//! Bulk email campaigns.
//!
//! A campaign resolves a [`RecipientFilter`] to member addresses, renders one
//! email for the whole run, sends it in sequential fixed-size batches and
//! appends a single summary [`Campaign`] record once dispatch has finished.

mod campaign;
mod dispatcher;
mod filter;
mod recipients;
mod renderer;
mod repository;
mod service;

pub mod errors;

pub use campaign::{Campaign, CampaignStatus, CampaignType, NewCampaign};
pub use dispatcher::{BatchDispatcher, Delivery, DispatchOutcome, DispatchReport};
pub use filter::RecipientFilter;
pub use recipients::select_recipients;
pub use renderer::{CampaignRenderer, HtmlCampaignRenderer, OrganizationDetails, RenderedEmail};
pub use repository::CampaignRepository;
pub use service::{
    CampaignOutcome, CampaignRequest, CampaignService, CampaignServiceImpl, DEFAULT_HISTORY_LIMIT,
    MAX_HISTORY_LIMIT,
};
