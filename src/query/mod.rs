// List query engine: free-text search, category filter and ordering over an
// in-memory collection of records. Pure functions, the source slice is never
// modified.

pub mod collation;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::content::{Record, ALL_CATEGORIES};

/// Category dimension of a query
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// Empty, `All` and `all` mean no filter; anything else is an exact category
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            None | Some("") => CategoryFilter::All,
            Some(value) if value == ALL_CATEGORIES || value == "all" => CategoryFilter::All,
            Some(value) => CategoryFilter::Only(value.to_string()),
        }
    }

    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => wanted == category,
        }
    }

    pub fn as_param(&self) -> &str {
        match self {
            CategoryFilter::All => ALL_CATEGORIES,
            CategoryFilter::Only(category) => category,
        }
    }
}

/// Ordering applied after filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    DateDesc,
    DateAsc,
    Popularity,
    Name,
    /// Keep the source order
    #[default]
    Unsorted,
}

impl SortKey {
    pub const OPTIONS: [SortKey; 4] = [
        SortKey::DateDesc,
        SortKey::DateAsc,
        SortKey::Popularity,
        SortKey::Name,
    ];

    /// Unknown keys fall back to `Unsorted` instead of failing
    pub fn parse(value: &str) -> Self {
        match value {
            "date-desc" => SortKey::DateDesc,
            "date-asc" => SortKey::DateAsc,
            "popularity" => SortKey::Popularity,
            "name" => SortKey::Name,
            _ => SortKey::Unsorted,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::DateDesc => "date-desc",
            SortKey::DateAsc => "date-asc",
            SortKey::Popularity => "popularity",
            SortKey::Name => "name",
            SortKey::Unsorted => "",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::DateDesc => "Most recent",
            SortKey::DateAsc => "Oldest",
            SortKey::Popularity => "Popularity",
            SortKey::Name => "Name",
            SortKey::Unsorted => "Default",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Search text, category and sort key applied to a collection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub search_term: String,
    pub category: CategoryFilter,
    pub sort: SortKey,
}

impl Query {
    /// Build a query from raw request parameters. `default_sort` applies
    /// only when no sort parameter was given at all.
    pub fn from_params(
        q: Option<&str>,
        category: Option<&str>,
        sort: Option<&str>,
        default_sort: SortKey,
    ) -> Self {
        Self {
            search_term: q.unwrap_or_default().to_string(),
            category: CategoryFilter::from_param(category),
            sort: sort.map(SortKey::parse).unwrap_or(default_sort),
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.category.matches(&record.category)
            && matches_search(record, &self.search_term.to_lowercase())
    }
}

/// `needle` must already be lowercased
fn matches_search(record: &Record, needle: &str) -> bool {
    needle.is_empty()
        || record.title.to_lowercase().contains(needle)
        || record.description.to_lowercase().contains(needle)
        || record
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(needle))
}

/// Filter then order `records`, returning a new view over them
pub fn apply<'a>(records: &'a [Record], query: &Query) -> Vec<&'a Record> {
    let needle = query.search_term.to_lowercase();
    let mut view: Vec<&Record> = records
        .iter()
        .filter(|r| query.category.matches(&r.category) && matches_search(r, &needle))
        .collect();
    sort(&mut view, query.sort);
    view
}

/// Stable in-place ordering of a view; equal keys keep their relative order
pub fn sort(view: &mut [&Record], key: SortKey) {
    match key {
        // Dates are compared as strings, so they must be zero-padded ISO-like values
        SortKey::DateDesc => view.sort_by(|a, b| b.date.cmp(&a.date)),
        SortKey::DateAsc => view.sort_by(|a, b| a.date.cmp(&b.date)),
        SortKey::Popularity => view.sort_by(|a, b| b.popularity.cmp(&a.popularity)),
        SortKey::Name => view.sort_by(|a, b| collation::compare(&a.title, &b.title)),
        SortKey::Unsorted => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, title: &str, category: &str, date: &str, popularity: u32) -> Record {
        Record {
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            category: category.to_string(),
            tags: vec![],
            date: date.to_string(),
            popularity,
            read_time: None,
            image: None,
            body: None,
            features: vec![],
            client: None,
        }
    }

    fn sample() -> Vec<Record> {
        let mut ts = record("1", "TypeScript basics", "TypeScript", "2024-03-20", 10);
        ts.tags = vec!["TypeScript".to_string()];
        let mut docker = record("2", "Docker guide", "DevOps", "2024-03-14", 30);
        docker.tags = vec!["Docker".to_string()];
        docker.description = "Containers for local development".to_string();
        vec![ts, docker]
    }

    fn ids(view: &[&Record]) -> Vec<String> {
        view.iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn test_empty_query_returns_everything_in_order() {
        let records = sample();
        let view = apply(&records, &Query::default());
        assert_eq!(ids(&view), vec!["1", "2"]);
    }

    #[test]
    fn test_search_is_case_insensitive_on_title() {
        let records = sample();
        let query = Query {
            search_term: "type".to_string(),
            ..Query::default()
        };
        assert_eq!(ids(&apply(&records, &query)), vec!["1"]);
    }

    #[test]
    fn test_search_matches_description_and_tags() {
        let records = sample();
        let by_description = Query {
            search_term: "CONTAINERS".to_string(),
            ..Query::default()
        };
        assert_eq!(ids(&apply(&records, &by_description)), vec!["2"]);

        let by_tag = Query {
            search_term: "dock".to_string(),
            ..Query::default()
        };
        assert_eq!(ids(&apply(&records, &by_tag)), vec!["2"]);
    }

    #[test]
    fn test_category_filter_is_exact() {
        let records = sample();
        let query = Query {
            category: CategoryFilter::Only("DevOps".to_string()),
            ..Query::default()
        };
        assert_eq!(ids(&apply(&records, &query)), vec!["2"]);

        let lowercase = Query {
            category: CategoryFilter::Only("devops".to_string()),
            ..Query::default()
        };
        assert!(apply(&records, &lowercase).is_empty());
    }

    #[test]
    fn test_search_and_category_combine_with_and() {
        let records = sample();
        let query = Query {
            search_term: "type".to_string(),
            category: CategoryFilter::Only("DevOps".to_string()),
            sort: SortKey::Unsorted,
        };
        assert!(apply(&records, &query).is_empty());
    }

    #[test]
    fn test_sort_keys() {
        let records = vec![
            record("a", "Zeta", "Web", "2024-01", 5),
            record("b", "alpha", "Web", "2024-03", 50),
            record("c", "Éclair", "Web", "2023-12", 20),
        ];

        let sorted = |sort| {
            ids(&apply(
                &records,
                &Query {
                    sort,
                    ..Query::default()
                },
            ))
        };

        assert_eq!(sorted(SortKey::DateDesc), vec!["b", "a", "c"]);
        assert_eq!(sorted(SortKey::DateAsc), vec!["c", "a", "b"]);
        assert_eq!(sorted(SortKey::Popularity), vec!["b", "c", "a"]);
        assert_eq!(sorted(SortKey::Name), vec!["b", "c", "a"]);
        assert_eq!(sorted(SortKey::Unsorted), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_popularity_ties_keep_source_order() {
        let records = vec![
            record("a", "A", "Web", "2024-01", 10),
            record("b", "B", "Web", "2024-01", 20),
            record("c", "C", "Web", "2024-01", 10),
        ];
        let query = Query {
            sort: SortKey::Popularity,
            ..Query::default()
        };
        assert_eq!(ids(&apply(&records, &query)), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_duplicate_ids_are_kept() {
        let records = vec![
            record("x", "Same", "Web", "2024-01", 1),
            record("x", "Same", "Web", "2024-01", 1),
        ];
        assert_eq!(apply(&records, &Query::default()).len(), 2);
    }

    #[test]
    fn test_source_is_untouched() {
        let records = vec![
            record("a", "B", "Web", "2024-01", 1),
            record("b", "A", "Web", "2024-02", 2),
        ];
        let before = records.clone();
        let query = Query {
            sort: SortKey::Name,
            ..Query::default()
        };
        let _ = apply(&records, &query);
        assert_eq!(records, before);
    }

    #[test]
    fn test_parse_params() {
        assert_eq!(SortKey::parse("popularity"), SortKey::Popularity);
        assert_eq!(SortKey::parse("stars"), SortKey::Unsorted);

        assert_eq!(CategoryFilter::from_param(None), CategoryFilter::All);
        assert_eq!(CategoryFilter::from_param(Some("all")), CategoryFilter::All);
        assert_eq!(CategoryFilter::from_param(Some("All")), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::from_param(Some("Web")),
            CategoryFilter::Only("Web".to_string())
        );

        let query = Query::from_params(Some("x"), None, None, SortKey::DateDesc);
        assert_eq!(query.sort, SortKey::DateDesc);
        let query = Query::from_params(None, None, Some("bogus"), SortKey::DateDesc);
        assert_eq!(query.sort, SortKey::Unsorted);
    }
}
