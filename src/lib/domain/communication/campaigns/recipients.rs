//! Recipient selection

use std::collections::HashSet;

use tracing::debug;

use crate::domain::{
    communication::{
        campaigns::{errors::CampaignError, RecipientFilter},
        email_addresses::EmailAddress,
    },
    users::UserRepository,
};

/// Resolve `filter` to the distinct addresses of the matching members.
///
/// An empty match is reported as [`CampaignError::NoRecipients`].
pub async fn select_recipients<U>(
    users: &U,
    filter: RecipientFilter,
) -> Result<Vec<EmailAddress>, CampaignError>
where
    U: UserRepository,
{
    let addresses = users.find_recipient_emails(filter.role()).await?;

    let mut seen = HashSet::with_capacity(addresses.len());
    let recipients: Vec<EmailAddress> = addresses
        .into_iter()
        .filter(|address| seen.insert(address.clone()))
        .collect();

    debug!(%filter, count = recipients.len(), "selected recipients");

    if recipients.is_empty() {
        return Err(CampaignError::NoRecipients(filter));
    }

    Ok(recipients)
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use mockall::predicate::eq;
    use testresult::TestResult;

    use crate::domain::users::{errors::FindRecipientsError, tests::MockUserRepository, Role};

    use super::*;

    fn addresses(raw: &[&str]) -> Vec<EmailAddress> {
        raw.iter().map(|a| EmailAddress::new_unchecked(a)).collect()
    }

    #[tokio::test]
    async fn test_alumni_filter_queries_alumni_role_only() -> TestResult {
        let mut users = MockUserRepository::new();

        users
            .expect_find_recipient_emails()
            .times(1)
            .with(eq(Some(Role::Alumni)))
            .returning(|_| Ok(addresses(&["grad1@example.com", "grad2@example.com"])));

        let recipients = select_recipients(&users, RecipientFilter::Alumni).await?;

        assert_eq!(
            recipients,
            addresses(&["grad1@example.com", "grad2@example.com"])
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_all_filter_queries_every_role() -> TestResult {
        let mut users = MockUserRepository::new();

        users
            .expect_find_recipient_emails()
            .times(1)
            .with(eq(None::<Role>))
            .returning(|_| {
                Ok(addresses(&[
                    "student@example.com",
                    "grad@example.com",
                    "donor@example.com",
                    "admin@example.com",
                ]))
            });

        let recipients = select_recipients(&users, RecipientFilter::All).await?;

        assert_eq!(recipients.len(), 4);

        Ok(())
    }

    #[tokio::test]
    async fn test_duplicates_are_removed_keeping_order() -> TestResult {
        let mut users = MockUserRepository::new();

        users.expect_find_recipient_emails().returning(|_| {
            Ok(addresses(&[
                "b@example.com",
                "a@example.com",
                "B@example.com",
            ]))
        });

        let recipients = select_recipients(&users, RecipientFilter::All).await?;

        assert_eq!(recipients, addresses(&["b@example.com", "a@example.com"]));

        Ok(())
    }

    #[tokio::test]
    async fn test_no_match_is_reported_as_no_recipients() {
        let mut users = MockUserRepository::new();

        users
            .expect_find_recipient_emails()
            .returning(|_| Ok(Vec::new()));

        let result = select_recipients(&users, RecipientFilter::Donor).await;

        assert!(matches!(
            result,
            Err(CampaignError::NoRecipients(RecipientFilter::Donor))
        ));
    }

    #[tokio::test]
    async fn test_store_failure_is_propagated() {
        let mut users = MockUserRepository::new();

        users
            .expect_find_recipient_emails()
            .returning(|_| Err(FindRecipientsError::UnknownError(anyhow!("pool timed out"))));

        let result = select_recipients(&users, RecipientFilter::Student).await;

        assert!(matches!(result, Err(CampaignError::Recipients(_))));
    }
}
