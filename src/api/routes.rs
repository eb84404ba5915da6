use axum::http::{header, HeaderValue, Method};
use axum::{
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower_cookies::CookieManagerLayer;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, limit::RequestBodyLimitLayer,
    services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};

#[cfg(not(test))]
use {
    std::net::IpAddr,
    std::sync::Arc,
    tower_governor::{governor::GovernorConfigBuilder, key_extractor::KeyExtractor, GovernorLayer},
    tracing::warn,
};

use crate::api::handlers::{self as api_handlers, AppState};
use crate::config::Settings;
use crate::web::handlers as web_handlers;

/// Create the router with all endpoints (API + pages)
#[cfg_attr(test, allow(unused_variables))]
pub fn create_router(state: AppState, settings: &Settings) -> Router {
    // JSON API - read endpoints plus the contact draft and submission
    #[cfg_attr(test, allow(unused_mut))]
    let mut api_routes: Router<AppState> = Router::new()
        .route("/projects", get(api_handlers::list_projects))
        .route("/blog", get(api_handlers::list_articles))
        .route("/repositories", get(api_handlers::list_repositories))
        .route("/repositories/:name", get(api_handlers::get_repository))
        .route(
            "/contact/draft",
            get(api_handlers::get_draft)
                .put(api_handlers::save_draft)
                .delete(api_handlers::clear_draft),
        )
        .route("/contact", post(api_handlers::submit_contact));

    // Apply rate limiting only in non-test builds
    // NOTE: Rate limiting uses a custom key extractor that:
    // 1. Tries to extract peer IP from connection
    // 2. Falls back to 127.0.0.1 when peer IP is unavailable
    // Behind a reverse proxy, configure the proxy to set X-Real-IP or
    // X-Forwarded-For headers, and use SmartIpKeyExtractor instead.
    #[cfg(not(test))]
    {
        #[derive(Clone, Copy, Debug)]
        struct FallbackIpKeyExtractor;

        impl KeyExtractor for FallbackIpKeyExtractor {
            type Key = IpAddr;

            fn extract<B>(
                &self,
                req: &axum::http::Request<B>,
            ) -> Result<Self::Key, tower_governor::GovernorError> {
                if let Some(connect_info) = req
                    .extensions()
                    .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
                {
                    return Ok(connect_info.0.ip());
                }

                Ok(IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)))
            }
        }

        let burst = u32::try_from(settings.server.api_rate_limit.saturating_mul(2)).unwrap_or(u32::MAX);
        match GovernorConfigBuilder::default()
            .key_extractor(FallbackIpKeyExtractor)
            .per_second(settings.server.api_rate_limit)
            .burst_size(burst)
            .finish()
        {
            Some(config) => {
                api_routes = api_routes.layer(GovernorLayer {
                    config: Arc::new(config),
                });
            }
            None => warn!("Invalid API rate limit configuration, rate limiting disabled"),
        }
    }

    let api_routes: Router<AppState> = api_routes;

    // Pages
    let web_routes: Router<AppState> = Router::new()
        .route("/", get(web_handlers::index))
        .route("/about", get(web_handlers::about_page))
        .route("/skills", get(web_handlers::skills_page))
        .route("/process", get(web_handlers::process_page))
        .route("/looking-for", get(web_handlers::looking_for_page))
        .route("/projects", get(web_handlers::projects_page))
        .route("/projects/:id", get(web_handlers::project_detail))
        .route("/repositories", get(web_handlers::repositories_page))
        .route("/repositories/:name", get(web_handlers::repository_detail))
        .route("/blog", get(web_handlers::blog_page))
        .route("/blog/:id", get(web_handlers::article_detail))
        .route(
            "/contact",
            get(web_handlers::contact_page).post(web_handlers::contact_submit),
        );

    let health_routes: Router<AppState> = Router::new()
        .route("/health", get(api_handlers::health_check))
        .route("/ready", get(api_handlers::readiness_check));

    let static_routes: Router<AppState> = Router::new().nest_service("/static", ServeDir::new("src/web/static"));

    // Pages, health and API share one state; the fallback page needs it too
    Router::new()
        .merge(web_routes)
        .merge(health_routes)
        .merge(static_routes)
        .nest("/api", api_routes)
        .fallback(web_handlers::not_found_page)
        .layer(CookieManagerLayer::new())
        .layer(
            // Request body size limit - contact payloads are small
            RequestBodyLimitLayer::new(settings.server.max_request_body_size),
        )
        .layer(
            // CORS - allow all origins for read access
            CorsLayer::new()
                .allow_methods([Method::GET, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
                .allow_origin(tower_http::cors::Any)
                .max_age(Duration::from_secs(3600)),
        )
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static(
                "default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'; img-src 'self' data: https:; font-src 'self' data:; connect-src 'self'; object-src 'none'; base-uri 'self'; form-action 'self'",
            ),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            // HSTS - enforce HTTPS (only effective if served over HTTPS)
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=31536000; includeSubDomains"),
        ))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::SiteContent;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    fn create_test_state(github_url: &str) -> AppState {
        let settings = Settings::for_tests(github_url);
        AppState::new(settings, SiteContent::embedded().unwrap()).unwrap()
    }

    async fn get_status(app: Router, uri: &str) -> StatusCode {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_routes_exist() {
        let state = create_test_state("http://127.0.0.1:9");
        let app = create_router(state.clone(), &state.settings);

        for uri in [
            "/",
            "/about",
            "/skills",
            "/process",
            "/looking-for",
            "/projects",
            "/blog",
            "/contact",
            "/health",
            "/ready",
            "/api/projects",
            "/api/blog",
            "/api/contact/draft",
        ] {
            assert_eq!(get_status(app.clone(), uri).await, StatusCode::OK, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_looking_for_page_lists_profile_wishes() {
        let state = create_test_state("http://127.0.0.1:9");
        let app = create_router(state.clone(), &state.settings);

        let response = app
            .oneshot(Request::builder().uri("/looking-for").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        let wanted = &state.content.profile.looking_for;
        assert!(html.contains(&wanted.role));
        for contract in &wanted.contract_types {
            assert!(html.contains(contract.as_str()), "{contract}");
        }
        assert!(html.contains(r#"href="/contact""#));
    }

    #[tokio::test]
    async fn test_unknown_page_is_not_found() {
        let state = create_test_state("http://127.0.0.1:9");
        let app = create_router(state.clone(), &state.settings);

        assert_eq!(get_status(app.clone(), "/nowhere").await, StatusCode::NOT_FOUND);
        assert_eq!(
            get_status(app.clone(), "/projects/does-not-exist").await,
            StatusCode::NOT_FOUND
        );
        assert_eq!(get_status(app, "/blog/does-not-exist").await, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unreachable_github_degrades() {
        // Nothing listens on port 9; the pages still render
        let state = create_test_state("http://127.0.0.1:9");
        let app = create_router(state.clone(), &state.settings);

        assert_eq!(get_status(app.clone(), "/repositories").await, StatusCode::OK);
        assert_eq!(
            get_status(app.clone(), "/repositories/anything").await,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(app, "/api/repositories/anything").await,
            StatusCode::NOT_FOUND
        );
    }
}
