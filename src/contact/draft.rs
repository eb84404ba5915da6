use std::sync::Mutex;
use tower_cookies::{cookie::SameSite, Cookie, Cookies};
use tracing::{debug, warn};

use crate::contact::form::ContactForm;

/// In-progress contact form values
pub type Draft = ContactForm;

pub const DRAFT_COOKIE: &str = "contact_draft";

/// Browsers drop cookies above roughly 4 KiB
const MAX_COOKIE_VALUE: usize = 4000;

/// Persistence for the contact form draft, injected into the form workflow
pub trait DraftStore: Send + Sync {
    fn load(&self) -> Option<Draft>;
    fn save(&self, draft: &Draft);
    fn clear(&self);
}

/// Keeps the draft in a single per-visitor cookie holding URL-encoded JSON
#[derive(Clone)]
pub struct CookieDraftStore {
    cookies: Cookies,
}

impl CookieDraftStore {
    pub fn new(cookies: Cookies) -> Self {
        Self { cookies }
    }

    fn cookie(value: String) -> Cookie<'static> {
        Cookie::build((DRAFT_COOKIE, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .permanent()
            .build()
    }
}

impl DraftStore for CookieDraftStore {
    fn load(&self) -> Option<Draft> {
        let cookie = self.cookies.get(DRAFT_COOKIE)?;
        let decoded = urlencoding::decode(cookie.value()).ok()?;
        match serde_json::from_str(&decoded) {
            Ok(draft) => Some(draft),
            Err(e) => {
                debug!("Ignoring unreadable contact draft: {}", e);
                None
            }
        }
    }

    fn save(&self, draft: &Draft) {
        let json = match serde_json::to_string(draft) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize contact draft: {}", e);
                return;
            }
        };

        let encoded = urlencoding::encode(&json).into_owned();
        if encoded.len() > MAX_COOKIE_VALUE {
            // Drop the previous draft too, it no longer matches the form
            warn!(
                "Contact draft too large to persist ({} bytes encoded), clearing it",
                encoded.len()
            );
            self.clear();
            return;
        }

        self.cookies.add(Self::cookie(encoded));
    }

    fn clear(&self) {
        self.cookies.remove(Self::cookie(String::new()));
    }
}

/// Process-local store
#[derive(Debug, Default)]
pub struct MemoryDraftStore {
    draft: Mutex<Option<Draft>>,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_draft(draft: Draft) -> Self {
        Self {
            draft: Mutex::new(Some(draft)),
        }
    }
}

impl DraftStore for MemoryDraftStore {
    fn load(&self) -> Option<Draft> {
        self.draft
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn save(&self, draft: &Draft) {
        *self
            .draft
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(draft.clone());
    }

    fn clear(&self) {
        *self
            .draft
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
    }
}
