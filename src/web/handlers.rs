use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form,
};
use tower_cookies::Cookies;
use tracing::debug;

use crate::{
    api::{handlers::AppState, models::ListParams},
    contact::{
        self,
        form::{MAX_MESSAGE_LENGTH, MIN_MESSAGE_LENGTH},
        ContactForm, CookieDraftStore, DraftStore, FieldErrors, SubmitOutcome, SUBJECT_OPTIONS,
    },
    content::{Collection, LookingFor, ProcessStep, Record, SkillGroup, ALL_CATEGORIES},
    github::RepositoryMetadata,
    query::{self, CategoryFilter, Query as ListQuery, SortKey},
    Result,
};

/// Number of articles and projects featured on the home page
const HOME_HIGHLIGHTS: usize = 3;

#[derive(Clone)]
#[allow(dead_code)] // Fields are used by Askama templates
struct RecordCard {
    id: String,
    title: String,
    description: String,
    category: String,
    tags: Vec<String>,
    date: String,
    read_time: String,
    image: String,
    popularity: u32,
}

impl From<&Record> for RecordCard {
    fn from(record: &Record) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            description: record.description.clone(),
            category: record.category.clone(),
            tags: record.tags.clone(),
            date: record.date.clone(),
            read_time: record.read_time.clone().unwrap_or_default(),
            image: record.image.clone().unwrap_or_default(),
            popularity: record.popularity,
        }
    }
}

#[derive(Clone)]
#[allow(dead_code)]
struct RepositoryCard {
    name: String,
    description: String,
    stars: u64,
    forks: u64,
    language: String,
    topics: Vec<String>,
    updated: String,
    html_url: String,
    image: String,
    avatar_url: String,
}

impl From<RepositoryMetadata> for RepositoryCard {
    fn from(repo: RepositoryMetadata) -> Self {
        Self {
            updated: repo.updated_display(),
            name: repo.name,
            description: repo.description,
            stars: repo.star_count,
            forks: repo.fork_count,
            language: repo.primary_language.unwrap_or_default(),
            topics: repo.topics,
            html_url: repo.html_url,
            image: repo.image.unwrap_or_default(),
            avatar_url: repo.owner_avatar_url,
        }
    }
}

/// One entry of a category picker
#[derive(Clone)]
#[allow(dead_code)]
struct CategoryOption {
    value: String,
    href: String,
    selected: bool,
}

#[derive(Clone)]
#[allow(dead_code)]
struct SortOption {
    value: String,
    label: String,
    selected: bool,
}

/// Picker entries for each category; links keep the current search term
fn category_options(
    collection: &Collection,
    filter: &CategoryFilter,
    search_term: &str,
    base: &str,
) -> Vec<CategoryOption> {
    let search = if search_term.is_empty() {
        String::new()
    } else {
        format!("q={}&", urlencoding::encode(search_term))
    };

    std::iter::once(ALL_CATEGORIES)
        .chain(collection.categories.iter().map(String::as_str))
        .map(|category| CategoryOption {
            value: category.to_string(),
            href: format!("{}?{}category={}", base, search, urlencoding::encode(category)),
            selected: filter.as_param() == category,
        })
        .collect()
}

fn sort_options(current: SortKey) -> Vec<SortOption> {
    SortKey::OPTIONS
        .iter()
        .map(|key| SortOption {
            value: key.as_str().to_string(),
            label: key.label().to_string(),
            selected: *key == current,
        })
        .collect()
}

fn cards(records: Vec<&Record>) -> Vec<RecordCard> {
    records.into_iter().map(RecordCard::from).collect()
}

/// Not found page template
#[derive(Template)]
#[template(path = "not_found.html")]
struct NotFoundTemplate {
    site_title: String,
    message: String,
}

fn not_found(state: &AppState, message: String) -> Result<Response> {
    let template = NotFoundTemplate {
        site_title: state.settings.site.title.clone(),
        message,
    };
    Ok((StatusCode::NOT_FOUND, Html(template.render()?)).into_response())
}

/// Fallback for unknown paths
pub async fn not_found_page(State(state): State<AppState>) -> Result<Response> {
    not_found(&state, "The page you are looking for does not exist.".to_string())
}

/// Home page template
#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    site_title: String,
    name: String,
    headline: String,
    articles: Vec<RecordCard>,
    projects: Vec<RecordCard>,
}

/// GET / - Latest articles and most popular projects
pub async fn index(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let content = &state.content;

    let latest = ListQuery {
        sort: SortKey::DateDesc,
        ..ListQuery::default()
    };
    let popular = ListQuery {
        sort: SortKey::Popularity,
        ..ListQuery::default()
    };

    let template = IndexTemplate {
        site_title: state.settings.site.title.clone(),
        name: content.profile.name.clone(),
        headline: content.profile.headline.clone(),
        articles: query::apply(&content.blog.records, &latest)
            .into_iter()
            .take(HOME_HIGHLIGHTS)
            .map(RecordCard::from)
            .collect(),
        projects: query::apply(&content.projects.records, &popular)
            .into_iter()
            .take(HOME_HIGHLIGHTS)
            .map(RecordCard::from)
            .collect(),
    };

    Ok(Html(template.render()?))
}

/// About page template
#[derive(Template)]
#[template(path = "about.html")]
struct AboutTemplate {
    site_title: String,
    name: String,
    paragraphs: Vec<String>,
    featured: Vec<RepositoryCard>,
}

/// GET /about - Profile text plus featured repositories
pub async fn about_page(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let featured = state
        .gateway
        .fetch_many(state.owner(), &state.settings.site.featured_repositories)
        .await;

    let template = AboutTemplate {
        site_title: state.settings.site.title.clone(),
        name: state.content.profile.name.clone(),
        paragraphs: state.content.profile.about.clone(),
        featured: featured.into_iter().map(RepositoryCard::from).collect(),
    };

    Ok(Html(template.render()?))
}

/// Skills page template
#[derive(Template)]
#[template(path = "skills.html")]
struct SkillsTemplate {
    site_title: String,
    groups: Vec<SkillGroup>,
}

/// GET /skills
pub async fn skills_page(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let template = SkillsTemplate {
        site_title: state.settings.site.title.clone(),
        groups: state.content.profile.skills.clone(),
    };
    Ok(Html(template.render()?))
}

/// Process page template
#[derive(Template)]
#[template(path = "process.html")]
struct ProcessTemplate {
    site_title: String,
    steps: Vec<ProcessStep>,
}

/// GET /process
pub async fn process_page(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let template = ProcessTemplate {
        site_title: state.settings.site.title.clone(),
        steps: state.content.profile.process.clone(),
    };
    Ok(Html(template.render()?))
}

#[derive(Template)]
#[template(path = "looking_for.html")]
struct LookingForTemplate {
    site_title: String,
    looking_for: LookingFor,
}

/// GET /looking-for - Wanted role, contract types and work preferences
pub async fn looking_for_page(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let template = LookingForTemplate {
        site_title: state.settings.site.title.clone(),
        looking_for: state.content.profile.looking_for.clone(),
    };
    Ok(Html(template.render()?))
}

/// Projects page template
#[derive(Template)]
#[template(path = "projects.html")]
struct ProjectsTemplate {
    site_title: String,
    query: String,
    categories: Vec<CategoryOption>,
    sorts: Vec<SortOption>,
    projects: Vec<RecordCard>,
    total: usize,
    owner: String,
    repositories: Vec<RepositoryCard>,
}

/// GET /projects - Showcase filter/sort plus recently updated repositories
pub async fn projects_page(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse> {
    let query = params.to_query(SortKey::DateDesc);
    debug!("Projects page query: {:?}", query);

    let projects = cards(query::apply(&state.content.projects.records, &query));
    let repositories = state
        .gateway
        .fetch_repository_list(state.owner(), state.settings.site.repository_page_size)
        .await;

    let template = ProjectsTemplate {
        site_title: state.settings.site.title.clone(),
        categories: category_options(
            &state.content.projects,
            &query.category,
            &query.search_term,
            "/projects",
        ),
        sorts: sort_options(query.sort),
        total: projects.len(),
        projects,
        query: query.search_term,
        owner: state.owner().to_string(),
        repositories: repositories.into_iter().map(RepositoryCard::from).collect(),
    };

    Ok(Html(template.render()?))
}

/// Project detail page template
#[derive(Template)]
#[template(path = "project.html")]
struct ProjectTemplate {
    site_title: String,
    project: RecordCard,
    body: String,
    features: Vec<String>,
    client: String,
}

/// GET /projects/:id
pub async fn project_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    let Some(record) = state.content.projects.get(&id) else {
        return not_found(&state, format!("No project named \"{id}\"."));
    };

    let template = ProjectTemplate {
        site_title: state.settings.site.title.clone(),
        project: RecordCard::from(record),
        body: record.body.clone().unwrap_or_default(),
        features: record.features.clone(),
        client: record.client.clone().unwrap_or_default(),
    };

    Ok(Html(template.render()?).into_response())
}

/// Repository list page template
#[derive(Template)]
#[template(path = "repositories.html")]
struct RepositoriesTemplate {
    site_title: String,
    owner: String,
    repositories: Vec<RepositoryCard>,
}

/// GET /repositories
pub async fn repositories_page(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let repositories = state
        .gateway
        .fetch_repository_list(state.owner(), state.settings.site.repository_page_size)
        .await;

    let template = RepositoriesTemplate {
        site_title: state.settings.site.title.clone(),
        owner: state.owner().to_string(),
        repositories: repositories.into_iter().map(RepositoryCard::from).collect(),
    };

    Ok(Html(template.render()?))
}

/// Repository detail page template
#[derive(Template)]
#[template(path = "repository.html")]
struct RepositoryTemplate {
    site_title: String,
    repository: RepositoryCard,
    readme: String,
}

/// GET /repositories/:name - Metadata first, README only for a known repository
pub async fn repository_detail(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response> {
    let Some(repository) = state.gateway.fetch_repository(state.owner(), &name).await else {
        return not_found(&state, format!("Repository \"{name}\" could not be found."));
    };

    let readme = state
        .gateway
        .fetch_readme(state.owner(), &name)
        .await
        .unwrap_or_default();

    let template = RepositoryTemplate {
        site_title: state.settings.site.title.clone(),
        repository: RepositoryCard::from(repository),
        readme,
    };

    Ok(Html(template.render()?).into_response())
}

/// Blog page template
#[derive(Template)]
#[template(path = "blog.html")]
struct BlogTemplate {
    site_title: String,
    query: String,
    current_category: String,
    categories: Vec<CategoryOption>,
    articles: Vec<RecordCard>,
}

/// GET /blog - Articles in authoring order, filtered by text and category
pub async fn blog_page(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse> {
    let query = params.to_query(SortKey::Unsorted);

    let template = BlogTemplate {
        site_title: state.settings.site.title.clone(),
        categories: category_options(&state.content.blog, &query.category, &query.search_term, "/blog"),
        current_category: query.category.as_param().to_string(),
        articles: cards(query::apply(&state.content.blog.records, &query)),
        query: query.search_term,
    };

    Ok(Html(template.render()?))
}

/// Article page template
#[derive(Template)]
#[template(path = "article.html")]
struct ArticleTemplate {
    site_title: String,
    article: RecordCard,
    paragraphs: Vec<String>,
}

/// GET /blog/:id
pub async fn article_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    let Some(record) = state.content.blog.get(&id) else {
        return not_found(&state, format!("No article named \"{id}\"."));
    };

    let paragraphs = record
        .body
        .as_deref()
        .unwrap_or_default()
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect();

    let template = ArticleTemplate {
        site_title: state.settings.site.title.clone(),
        article: RecordCard::from(record),
        paragraphs,
    };

    Ok(Html(template.render()?).into_response())
}

#[derive(Clone)]
#[allow(dead_code)]
struct SubjectOption {
    value: String,
    selected: bool,
}

/// Inline error text per field, empty when the field is fine
#[derive(Clone, Default)]
#[allow(dead_code)]
struct ContactErrors {
    name: String,
    email: String,
    subject: String,
    message: String,
}

impl From<&FieldErrors> for ContactErrors {
    fn from(errors: &FieldErrors) -> Self {
        let field = |name: &str| errors.get(name).cloned().unwrap_or_default();
        Self {
            name: field("name"),
            email: field("email"),
            subject: field("subject"),
            message: field("message"),
        }
    }
}

/// Contact page template
#[derive(Template)]
#[template(path = "contact.html")]
struct ContactTemplate {
    site_title: String,
    form: ContactForm,
    subjects: Vec<SubjectOption>,
    errors: ContactErrors,
    message_length: usize,
    min_length: usize,
    max_length: usize,
    /// "", "sent" or "failed"
    status: String,
}

fn contact_template(state: &AppState, form: ContactForm, errors: ContactErrors, status: &str) -> ContactTemplate {
    let subjects = SUBJECT_OPTIONS
        .iter()
        .map(|subject| SubjectOption {
            value: subject.to_string(),
            selected: form.subject == *subject,
        })
        .collect();

    ContactTemplate {
        site_title: state.settings.site.title.clone(),
        message_length: form.message_length(),
        min_length: MIN_MESSAGE_LENGTH,
        max_length: MAX_MESSAGE_LENGTH,
        subjects,
        errors,
        status: status.to_string(),
        form,
    }
}

/// GET /contact - Form prefilled from the saved draft
pub async fn contact_page(State(state): State<AppState>, cookies: Cookies) -> Result<impl IntoResponse> {
    let draft = CookieDraftStore::new(cookies).load().unwrap_or_default();
    let template = contact_template(&state, draft, ContactErrors::default(), "");
    Ok(Html(template.render()?))
}

/// POST /contact - Validate, deliver and re-render with the outcome
pub async fn contact_submit(
    State(state): State<AppState>,
    cookies: Cookies,
    Form(form): Form<ContactForm>,
) -> Result<Response> {
    let store = CookieDraftStore::new(cookies);

    let (template, status) = match contact::submit(&form, &store, state.mailer.as_ref()).await {
        SubmitOutcome::Sent => (
            contact_template(&state, ContactForm::default(), ContactErrors::default(), "sent"),
            StatusCode::OK,
        ),
        SubmitOutcome::Invalid(errors) => (
            contact_template(&state, form, ContactErrors::from(&errors), ""),
            StatusCode::UNPROCESSABLE_ENTITY,
        ),
        SubmitOutcome::DeliveryFailed => (
            contact_template(&state, form, ContactErrors::default(), "failed"),
            StatusCode::BAD_GATEWAY,
        ),
    };

    Ok((status, Html(template.render()?)).into_response())
}
