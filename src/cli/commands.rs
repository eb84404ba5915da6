use std::path::Path;

use crate::content::{Collection, Record, SiteContent};
use crate::github::{RepositoryGateway, RepositoryMetadata};
use crate::query::{self, Query, SortKey};
use crate::utils::sanitize::truncate;
use crate::{Error, Result};

/// Print the owner's recently updated repositories
pub async fn list_repositories(gateway: &RepositoryGateway, owner: &str, limit: u8) -> Result<()> {
    let repositories = gateway.fetch_repository_list(owner, limit).await;
    print_repositories(owner, &repositories);
    Ok(())
}

/// Print one repository, optionally followed by its README
pub async fn show_repository(
    gateway: &RepositoryGateway,
    owner: &str,
    name: &str,
    readme: bool,
) -> Result<()> {
    let repository = gateway
        .fetch_repository(owner, name)
        .await
        .ok_or_else(|| Error::NotFound(format!("Repository {owner}/{name} not found")))?;

    println!("{}", repository.name);
    if !repository.description.is_empty() {
        println!("  {}", repository.description);
    }
    println!(
        "  Stars: {}  Forks: {}  Language: {}",
        repository.star_count,
        repository.fork_count,
        repository.primary_language.as_deref().unwrap_or("-")
    );
    if !repository.topics.is_empty() {
        println!("  Topics: {}", repository.topics.join(", "));
    }
    println!("  Updated: {}", repository.updated_display());
    println!("  {}", repository.html_url);

    if readme {
        match gateway.fetch_readme(owner, name).await {
            Some(text) => println!("\n{text}"),
            None => println!("\nNo README"),
        }
    }

    Ok(())
}

/// Run a list query over the blog or project collection
pub fn search(
    content: &SiteContent,
    collection: &str,
    term: &str,
    category: Option<&str>,
    sort: Option<&str>,
) -> Result<()> {
    let (records, default_sort) = select_collection(content, collection)?;
    let query = Query::from_params(Some(term), category, sort, default_sort);
    let results = query::apply(&records.records, &query);

    print_records(&results);
    Ok(())
}

fn select_collection<'a>(content: &'a SiteContent, name: &str) -> Result<(&'a Collection, SortKey)> {
    match name {
        "blog" => Ok((&content.blog, SortKey::Unsorted)),
        "projects" => Ok((&content.projects, SortKey::DateDesc)),
        other => Err(Error::Validation(format!(
            "Unknown collection '{other}' (expected blog or projects)"
        ))),
    }
}

/// Load content and report what was found
pub fn check_content(dir: Option<&Path>) -> Result<()> {
    match SiteContent::load(dir) {
        Ok(content) => {
            let source = dir
                .map(|d| d.display().to_string())
                .unwrap_or_else(|| "embedded".to_string());
            println!("\x1b[32m\u{2713}\x1b[0m Content is valid ({source})");
            println!(
                "  Blog: {} articles in {} categories",
                content.blog.len(),
                content.blog.categories.len()
            );
            println!(
                "  Projects: {} projects in {} categories",
                content.projects.len(),
                content.projects.categories.len()
            );
            println!("  Repository overrides: {}", content.overrides.len());
            Ok(())
        }
        Err(e) => {
            println!("\x1b[31m\u{2717}\x1b[0m Invalid content: {}", e);
            Err(e)
        }
    }
}

fn print_records(records: &[&Record]) {
    if records.is_empty() {
        println!("No results");
        return;
    }

    println!("\nFound {} results:\n", records.len());
    println!("{:<28} {:<40} {:<14} {:<10}", "ID", "Title", "Category", "Date");
    println!("{}", "-".repeat(95));

    for record in records {
        println!(
            "{:<28} {:<40} {:<14} {:<10}",
            truncate(&record.id, 26),
            truncate(&record.title, 38),
            truncate(&record.category, 12),
            record.date
        );
    }
}

fn print_repositories(owner: &str, repositories: &[RepositoryMetadata]) {
    if repositories.is_empty() {
        println!("No repositories found for {owner}");
        return;
    }

    println!("\n{} repositories for {}:\n", repositories.len(), owner);
    println!("{:<30} {:>6} {:>6} {:<12} {:<10}", "Name", "Stars", "Forks", "Language", "Updated");
    println!("{}", "-".repeat(70));

    for repo in repositories {
        println!(
            "{:<30} {:>6} {:>6} {:<12} {:<10}",
            truncate(&repo.name, 28),
            repo.star_count,
            repo.fork_count,
            truncate(repo.primary_language.as_deref().unwrap_or("-"), 10),
            repo.updated_display()
        );
    }
}
