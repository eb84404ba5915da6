use mockito::Matcher;
use portfolio::github::{GitHubClient, GitHubConfig, OverrideEntry, RepositoryGateway, RepositoryOverrides};
use serde_json::json;

fn gateway(base_url: &str, overrides: RepositoryOverrides) -> RepositoryGateway {
    let mut config = GitHubConfig::default().with_base_url(base_url);
    config.timeout_secs = 2;
    let client = GitHubClient::new(config).unwrap();
    RepositoryGateway::new(client, overrides)
}

fn overrides() -> RepositoryOverrides {
    [(
        "shop".to_string(),
        OverrideEntry {
            description: Some("Online shop with secure checkout".to_string()),
            image: Some("/static/images/shop.png".to_string()),
        },
    )]
    .into_iter()
    .collect()
}

#[tokio::test]
async fn test_fetch_repository_not_found() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/repos/octocat/missing")
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message":"Not Found"}"#)
        .expect(1)
        .create_async()
        .await;

    let gateway = gateway(&server.url(), RepositoryOverrides::default());
    assert!(gateway.fetch_repository("octocat", "missing").await.is_none());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_repository_maps_fields_with_override() {
    let mut server = mockito::Server::new_async().await;
    let _repo = server
        .mock("GET", "/repos/octocat/shop")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "name": "shop",
                "description": "raw description",
                "stargazers_count": 12,
                "forks_count": 3,
                "language": "TypeScript",
                "topics": ["nextjs", "stripe"],
                "updated_at": "2024-05-01T10:00:00Z",
                "owner": {"login": "octocat", "avatar_url": "https://example.com/a.png"},
                "html_url": "https://github.com/octocat/shop"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let gateway = gateway(&server.url(), overrides());
    let repo = gateway.fetch_repository("octocat", "shop").await.unwrap();

    assert_eq!(repo.name, "shop");
    assert_eq!(repo.description, "Online shop with secure checkout");
    assert_eq!(repo.image.as_deref(), Some("/static/images/shop.png"));
    assert_eq!(repo.star_count, 12);
    assert_eq!(repo.fork_count, 3);
    assert_eq!(repo.primary_language.as_deref(), Some("TypeScript"));
    assert_eq!(repo.topics, vec!["nextjs", "stripe"]);
    assert_eq!(repo.updated_display(), "2024-05-01");
}

#[tokio::test]
async fn test_fetch_readme_absent() {
    let mut server = mockito::Server::new_async().await;
    let _readme = server
        .mock("GET", "/repos/octocat/bare/readme")
        .with_status(404)
        .create_async()
        .await;

    let gateway = gateway(&server.url(), RepositoryOverrides::default());
    assert!(gateway.fetch_readme("octocat", "bare").await.is_none());
}

#[tokio::test]
async fn test_fetch_readme_returns_raw_text() {
    let mut server = mockito::Server::new_async().await;
    let _readme = server
        .mock("GET", "/repos/octocat/shop/readme")
        .match_header("accept", "application/vnd.github.raw")
        .with_status(200)
        .with_body("# Shop\n\nAn online shop.")
        .create_async()
        .await;

    let gateway = gateway(&server.url(), RepositoryOverrides::default());
    let readme = gateway.fetch_readme("octocat", "shop").await;
    assert_eq!(readme.as_deref(), Some("# Shop\n\nAn online shop."));
}

#[tokio::test]
async fn test_repository_list_keeps_api_order_and_skips_unreadable() {
    let mut server = mockito::Server::new_async().await;
    let _list = server
        .mock("GET", "/users/octocat/repos")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("sort".into(), "updated".into()),
            Matcher::UrlEncoded("per_page".into(), "3".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([
                {"name": "newest", "description": null, "stargazers_count": 1},
                "not a repository",
                {"name": "shop", "description": "raw description"},
                {"name": "oldest"}
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let gateway = gateway(&server.url(), overrides());
    let list = gateway.fetch_repository_list("octocat", 3).await;

    let names: Vec<&str> = list.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["newest", "shop", "oldest"]);
    assert_eq!(list[0].description, "");
    assert_eq!(list[1].description, "Online shop with secure checkout");
    assert!(list[2].last_updated.is_none());
}

#[tokio::test]
async fn test_repository_list_error_status_is_empty() {
    let mut server = mockito::Server::new_async().await;
    let _list = server
        .mock("GET", "/users/ghost/repos")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let gateway = gateway(&server.url(), RepositoryOverrides::default());
    assert!(gateway.fetch_repository_list("ghost", 6).await.is_empty());
}

#[tokio::test]
async fn test_transport_failure_degrades_to_sentinels() {
    // Nothing listens on the discard port
    let gateway = gateway("http://127.0.0.1:9", RepositoryOverrides::default());

    assert!(gateway.fetch_repository("octocat", "shop").await.is_none());
    assert!(gateway.fetch_readme("octocat", "shop").await.is_none());
    assert!(gateway.fetch_repository_list("octocat", 6).await.is_empty());
}

#[tokio::test]
async fn test_fetch_many_drops_missing_and_keeps_order() {
    let mut server = mockito::Server::new_async().await;
    let _a = server
        .mock("GET", "/repos/octocat/alpha")
        .with_status(200)
        .with_body(json!({"name": "alpha"}).to_string())
        .create_async()
        .await;
    let _b = server
        .mock("GET", "/repos/octocat/missing")
        .with_status(404)
        .create_async()
        .await;
    let _c = server
        .mock("GET", "/repos/octocat/gamma")
        .with_status(200)
        .with_body(json!({"name": "gamma"}).to_string())
        .create_async()
        .await;

    let gateway = gateway(&server.url(), RepositoryOverrides::default());
    let names = vec!["gamma".to_string(), "missing".to_string(), "alpha".to_string()];
    let found = gateway.fetch_many("octocat", &names).await;

    let found: Vec<&str> = found.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(found, vec!["gamma", "alpha"]);
}

#[tokio::test]
async fn test_exhausted_rate_limit_short_circuits() {
    let mut server = mockito::Server::new_async().await;
    let reset = chrono::Utc::now().timestamp() + 3600;
    let first = server
        .mock("GET", "/repos/octocat/alpha")
        .with_status(200)
        .with_header("x-ratelimit-limit", "60")
        .with_header("x-ratelimit-remaining", "1")
        .with_header("x-ratelimit-reset", &reset.to_string())
        .with_body(json!({"name": "alpha"}).to_string())
        .expect(1)
        .create_async()
        .await;

    let gateway = gateway(&server.url(), RepositoryOverrides::default());
    assert!(gateway.fetch_repository("octocat", "alpha").await.is_some());

    // Budget is below the buffer: no request leaves the process
    assert!(gateway.fetch_repository("octocat", "alpha").await.is_none());
    first.assert_async().await;

    let status = gateway.rate_limit_status().await;
    assert_eq!(status.remaining, 1);
}

#[tokio::test]
async fn test_unresponsive_api_times_out_to_sentinels() {
    // Accepts connections and never answers
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let _server = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let mut config = GitHubConfig::default().with_base_url(format!("http://{addr}"));
    config.timeout_secs = 1;
    let gateway = RepositoryGateway::new(GitHubClient::new(config).unwrap(), RepositoryOverrides::default());

    let outcome = tokio::time::timeout(std::time::Duration::from_secs(10), async {
        let repo = gateway.fetch_repository("octocat", "shop").await;
        let list = gateway.fetch_repository_list("octocat", 6).await;
        (repo, list)
    })
    .await
    .expect("gateway calls must finish within their own timeout");

    assert!(outcome.0.is_none());
    assert!(outcome.1.is_empty());
}
