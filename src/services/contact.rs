//! Contact requests about a property, sent to the agency.

use crate::entity::property;
use crate::error::AppResult;
use crate::models::{ContactForm, ContactSubmission};
use crate::services::notification::{Dispatched, Notification, Notifier};
use crate::services::slug;

/// Mail sent to the agency when a visitor asks about a property.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactRequestNotification {
    pub property_id: i32,
    pub property_title: String,
    pub property_city: String,
    pub property_path: String,
    pub submission: ContactSubmission,
}

impl ContactRequestNotification {
    pub fn new(property: &property::Model, submission: ContactSubmission) -> Self {
        Self {
            property_id: property.id,
            property_title: property.title.clone(),
            property_city: property.city.clone(),
            property_path: slug::canonical_path(property),
            submission,
        }
    }
}

impl Notification for ContactRequestNotification {
    fn subject(&self) -> String {
        format!("Contact request for property: {}", self.property_title)
    }

    fn body(&self) -> String {
        let s = &self.submission;
        let mut body = format!(
            "A new contact request was sent for the property \"{}\" ({}), #{}.\n\
             Listing: {}\n\n\
             Name: {}\n\
             Email: {}\n",
            self.property_title,
            self.property_city,
            self.property_id,
            self.property_path,
            s.full_name(),
            s.email,
        );
        if let Some(ref phone) = s.phone {
            body.push_str(&format!("Phone: {}\n", phone));
        }
        body.push_str(&format!("\n{}\n", s.message));
        body
    }

    fn reply_to(&self) -> Option<String> {
        Some(self.submission.email.clone())
    }
}

/// Validate a contact form and queue a notification to the agency.
///
/// Nothing is queued when validation fails.
pub async fn notify(
    notifier: &Notifier,
    property: &property::Model,
    form: &ContactForm,
) -> AppResult<Dispatched> {
    let submission = form.clone().into_submission()?;
    let notification = ContactRequestNotification::new(property, submission);

    let receipt = notifier.dispatch(notifier.route(), &notification).await?;

    tracing::info!(
        property_id = property.id,
        notification_id = %receipt.id,
        "Contact request queued"
    );

    Ok(receipt)
}
