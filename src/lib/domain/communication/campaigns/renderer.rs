//! Campaign email rendering

use askama::Template;
use chrono::{Datelike, Utc};
use lazy_static::lazy_static;
use regex::Regex;

#[cfg(test)]
use mockall::mock;

use crate::domain::communication::campaigns::errors::RenderError;

lazy_static! {
    static ref LINE_BREAK_REGEX: Regex = Regex::new(r"(?i)<br\s*/?>|</p\s*>|</div\s*>").unwrap();
    static ref TAG_REGEX: Regex = Regex::new(r"<[^>]*>").unwrap();
    static ref BLANK_LINES_REGEX: Regex = Regex::new(r"\n{3,}").unwrap();
}

/// The email sent to every recipient of a campaign
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedEmail {
    /// HTML version, with CSS inlined
    pub html: String,

    /// Plain text alternative
    pub plain: String,
}

/// Renders the campaign email. Called once per campaign.
pub trait CampaignRenderer: Clone + Send + Sync + 'static {
    /// Render `subject` and `body` into the email shell
    ///
    /// # Arguments
    /// * `subject` - The subject, shown as the email heading.
    /// * `body` - The body, trusted HTML inserted as-is.
    ///
    /// # Returns
    /// The [`RenderedEmail`], or a [`RenderError`] if the template could not be rendered.
    fn render(&self, subject: &str, body: &str) -> Result<RenderedEmail, RenderError>;
}

#[cfg(test)]
mock! {
    pub CampaignRenderer {}

    impl Clone for CampaignRenderer {
        fn clone(&self) -> Self;
    }

    impl CampaignRenderer for CampaignRenderer {
        fn render(&self, subject: &str, body: &str) -> Result<RenderedEmail, RenderError>;
    }
}

/// Organization details shown in the header and footer of every campaign
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrganizationDetails {
    /// Organization name
    pub name: String,

    /// Address members can reply to
    pub contact_email: String,
}

#[derive(Debug, Template)]
#[template(path = "emails/campaign.html")]
struct CampaignEmailTemplate<'a> {
    organization: &'a str,
    contact_email: &'a str,
    subject: &'a str,
    body: &'a str,
    year: i32,
}

/// Renders campaigns into the organization's HTML shell
#[derive(Clone, Debug)]
pub struct HtmlCampaignRenderer {
    organization: OrganizationDetails,
}

impl HtmlCampaignRenderer {
    /// Create a new renderer
    pub fn new(organization: OrganizationDetails) -> Self {
        Self { organization }
    }

    fn render_plain(&self, subject: &str, body: &str, year: i32) -> String {
        let text = LINE_BREAK_REGEX.replace_all(body, "\n");
        let text = TAG_REGEX.replace_all(&text, "");
        let text = text
            .replace("&nbsp;", " ")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&amp;", "&");
        let text = BLANK_LINES_REGEX.replace_all(text.trim(), "\n\n");

        format!(
            "{subject}\n\n{text}\n\n--\nQuestions? Contact us at {contact}\n(c) {year} {name}",
            contact = self.organization.contact_email,
            name = self.organization.name,
        )
    }
}

impl CampaignRenderer for HtmlCampaignRenderer {
    fn render(&self, subject: &str, body: &str) -> Result<RenderedEmail, RenderError> {
        let year = Utc::now().year();

        let template = CampaignEmailTemplate {
            organization: &self.organization.name,
            contact_email: &self.organization.contact_email,
            subject,
            body,
            year,
        };

        let html = css_inline::inline(&template.render()?)?;
        let plain = self.render_plain(subject, body, year);

        Ok(RenderedEmail { html, plain })
    }
}
