// Contact form: validation, draft persistence and delivery

pub mod draft;
pub mod form;
pub mod mailer;

pub use draft::{CookieDraftStore, Draft, DraftStore, MemoryDraftStore};
pub use form::{ContactForm, FieldErrors, SUBJECT_OPTIONS};
pub use mailer::ContactMailer;

use tracing::{info, warn};

/// Result of a contact form submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Sent,
    /// Nothing was sent; the draft was kept
    Invalid(FieldErrors),
    /// Valid form, but the mail API rejected it or was unreachable
    DeliveryFailed,
}

/// Validate, deliver, and keep the draft store in step with the outcome.
/// Without a mailer the message is logged and accepted.
pub async fn submit(
    form: &ContactForm,
    store: &dyn DraftStore,
    mailer: Option<&ContactMailer>,
) -> SubmitOutcome {
    let errors = form.validate();
    if !errors.is_empty() {
        store.save(form);
        return SubmitOutcome::Invalid(errors);
    }

    match mailer {
        Some(mailer) => {
            if let Err(e) = mailer.send(form).await {
                warn!("Contact email delivery failed: {}", e.log_safe());
                store.save(form);
                return SubmitOutcome::DeliveryFailed;
            }
        }
        None => {
            info!(
                "Mail delivery not configured, accepting message from {} ({} chars)",
                form.email,
                form.message_length()
            );
        }
    }

    store.clear();
    SubmitOutcome::Sent
}
