use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tower_cookies::Cookies;
use tracing::debug;

use crate::{
    api::models::*,
    config::Settings,
    contact::{self, ContactForm, ContactMailer, CookieDraftStore, Draft, DraftStore, SubmitOutcome},
    content::{Collection, SiteContent},
    github::{GitHubClient, RepositoryGateway},
    query::{self, SortKey},
    Error, Result,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub content: Arc<SiteContent>,
    pub gateway: RepositoryGateway,
    pub mailer: Option<ContactMailer>,
    pub settings: Settings,
}

impl AppState {
    pub fn new(settings: Settings, content: SiteContent) -> Result<Self> {
        let client = GitHubClient::new(settings.github.clone())?;
        let gateway = RepositoryGateway::new(client, content.overrides.clone());
        let mailer = ContactMailer::from_config(&settings.contact)?;

        Ok(Self {
            content: Arc::new(content),
            gateway,
            mailer,
            settings,
        })
    }

    pub fn owner(&self) -> &str {
        &self.settings.site.github_owner
    }
}

fn list_records(collection: &Collection, params: &ListParams, default_sort: SortKey) -> RecordListResponse {
    let query = params.to_query(default_sort);
    let results: Vec<_> = query::apply(&collection.records, &query)
        .into_iter()
        .cloned()
        .collect();

    RecordListResponse {
        total: results.len(),
        results,
        query: QueryEcho::from(&query),
    }
}

/// GET /api/projects - Filter and sort showcase projects
pub async fn list_projects(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Json<RecordListResponse> {
    debug!("List projects request: {:?}", params);
    Json(list_records(&state.content.projects, &params, SortKey::DateDesc))
}

/// GET /api/blog - Filter blog articles
pub async fn list_articles(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Json<RecordListResponse> {
    debug!("List articles request: {:?}", params);
    Json(list_records(&state.content.blog, &params, SortKey::Unsorted))
}

/// GET /api/repositories - Recently updated repositories of the site owner
pub async fn list_repositories(State(state): State<AppState>) -> Json<RepositoryListResponse> {
    let owner = state.owner().to_string();
    let results = state
        .gateway
        .fetch_repository_list(&owner, state.settings.site.repository_page_size)
        .await;

    Json(RepositoryListResponse { owner, results })
}

/// GET /api/repositories/:name - One repository, README on request
pub async fn get_repository(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<RepositoryParams>,
) -> Result<Json<RepositoryDetail>> {
    debug!("Get repository request: {}", name);

    let repository = state
        .gateway
        .fetch_repository(state.owner(), &name)
        .await
        .ok_or_else(|| Error::NotFound(format!("Repository {name} not found")))?;

    // Only ask for the README once the repository is known to exist
    let readme = if params.readme {
        state.gateway.fetch_readme(state.owner(), &name).await
    } else {
        None
    };

    Ok(Json(RepositoryDetail { repository, readme }))
}

/// GET /api/contact/draft
pub async fn get_draft(cookies: Cookies) -> Json<DraftResponse> {
    let store = CookieDraftStore::new(cookies);
    Json(DraftResponse {
        draft: store.load(),
    })
}

/// PUT /api/contact/draft - Autosave on field change
pub async fn save_draft(cookies: Cookies, Json(draft): Json<Draft>) -> StatusCode {
    let store = CookieDraftStore::new(cookies);
    if draft.is_blank() {
        store.clear();
    } else {
        store.save(&draft);
    }
    StatusCode::NO_CONTENT
}

/// DELETE /api/contact/draft - Explicit form reset
pub async fn clear_draft(cookies: Cookies) -> StatusCode {
    CookieDraftStore::new(cookies).clear();
    StatusCode::NO_CONTENT
}

/// POST /api/contact - Submit the contact form
pub async fn submit_contact(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(form): Json<ContactForm>,
) -> Result<Json<ContactResponse>> {
    let store = CookieDraftStore::new(cookies);

    match contact::submit(&form, &store, state.mailer.as_ref()).await {
        SubmitOutcome::Sent => Ok(Json(ContactResponse { sent: true })),
        SubmitOutcome::Invalid(errors) => Err(Error::InvalidForm(errors)),
        SubmitOutcome::DeliveryFailed => Err(Error::Mail("message could not be delivered".to_string())),
    }
}

/// GET /health - Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// GET /ready - Readiness check endpoint
pub async fn readiness_check(State(state): State<AppState>) -> Json<ReadinessResponse> {
    let github = state.gateway.rate_limit_status().await;

    Json(ReadinessResponse {
        ready: true,
        articles: state.content.blog.len(),
        projects: state.content.projects.len(),
        github,
        mail: if state.mailer.is_some() {
            "configured"
        } else {
            "disabled"
        }
        .to_string(),
    })
}
