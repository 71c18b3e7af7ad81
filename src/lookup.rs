use serde::{Deserialize, Serialize};

use crate::dataset::TravelDataset;
use crate::wiki::SectionSource;

pub const NOT_FOUND_MESSAGE: &str = "Sorry, no tourism/culture/history info found!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceKind {
    City,
    Country,
    None,
}

/// The `/api/info` response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceInfo {
    #[serde(rename = "type")]
    pub kind: PlaceKind,
    pub name: String,
    pub info: String,
}

/// Answer a "tell me about this place" query with a fixed priority:
/// curated city entry, then Wikipedia for the city, then Wikipedia for the
/// country, then a generic not-found response. Wikipedia failures are logged
/// and treated as "no data" so the chain keeps falling through.
pub async fn lookup(
    dataset: &TravelDataset,
    wiki: &dyn SectionSource,
    city: Option<&str>,
    country: Option<&str>,
) -> PlaceInfo {
    // Empty and whitespace-only parameters behave like absent ones.
    let city = city.map(str::trim).filter(|s| !s.is_empty());
    let country = country.map(str::trim).filter(|s| !s.is_empty());

    // Step 1: curated dataset.
    if let Some(city) = city {
        if let Some(record) = dataset.find_city(city) {
            return PlaceInfo {
                kind: PlaceKind::City,
                name: record.display_name(),
                info: record.info_text(),
            };
        }
    }

    // Step 2: Wikipedia, city article.
    if let Some(city) = city {
        match wiki.fetch_sections(city).await {
            Ok(Some(info)) => {
                return PlaceInfo {
                    kind: PlaceKind::City,
                    name: format!("{}, {}", city, country.unwrap_or("")),
                    info,
                };
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(city, "Wikipedia city lookup failed: {:#}", e),
        }
    }

    // Step 3: Wikipedia, country article.
    if let Some(country) = country {
        match wiki.fetch_sections(country).await {
            Ok(Some(info)) => {
                return PlaceInfo {
                    kind: PlaceKind::Country,
                    name: country.to_string(),
                    info,
                };
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(country, "Wikipedia country lookup failed: {:#}", e),
        }
    }

    // Step 4: nothing found.
    PlaceInfo {
        kind: PlaceKind::None,
        name: city.or(country).unwrap_or("Unknown").to_string(),
        info: NOT_FOUND_MESSAGE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use std::collections::HashMap;

    /// Stub section source backed by a title -> text map.
    struct StubWiki {
        pages: HashMap<String, String>,
        fail: bool,
    }

    impl StubWiki {
        fn with_pages(pages: &[(&str, &str)]) -> Self {
            StubWiki {
                pages: pages
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                fail: false,
            }
        }

        fn failing() -> Self {
            StubWiki {
                pages: HashMap::new(),
                fail: true,
            }
        }
    }

    #[async_trait]
    impl SectionSource for StubWiki {
        async fn fetch_sections(&self, title: &str) -> Result<Option<String>> {
            if self.fail {
                anyhow::bail!("stub transport error");
            }
            Ok(self.pages.get(title).cloned())
        }
    }

    fn dataset() -> TravelDataset {
        TravelDataset::bundled().unwrap()
    }

    #[tokio::test]
    async fn curated_city_wins_over_wikipedia() {
        // Even with a Wikipedia page available, the curated entry is used.
        let wiki = StubWiki::with_pages(&[("Paris", "wiki text that must not be returned")]);
        let info = lookup(&dataset(), &wiki, Some("paris"), Some("France")).await;

        assert_eq!(info.kind, PlaceKind::City);
        assert_eq!(info.name, "Paris, France");
        assert!(info.info.starts_with("History: "));
        assert!(!info.info.contains("wiki text"));
    }

    #[tokio::test]
    async fn unknown_city_falls_back_to_wikipedia() {
        let wiki = StubWiki::with_pages(&[("Lisbon", "History of Lisbon.\n\n")]);
        let info = lookup(&dataset(), &wiki, Some("Lisbon"), Some("Portugal")).await;

        assert_eq!(info.kind, PlaceKind::City);
        assert_eq!(info.name, "Lisbon, Portugal");
        assert_eq!(info.info, "History of Lisbon.\n\n");
    }

    #[tokio::test]
    async fn city_fallback_without_country_uses_empty_suffix() {
        let wiki = StubWiki::with_pages(&[("Lisbon", "History of Lisbon.\n\n")]);
        let info = lookup(&dataset(), &wiki, Some("Lisbon"), None).await;
        assert_eq!(info.name, "Lisbon, ");
    }

    #[tokio::test]
    async fn country_is_tried_when_city_has_no_page() {
        let wiki = StubWiki::with_pages(&[("Portugal", "History of Portugal.\n\n")]);
        let info = lookup(&dataset(), &wiki, Some("Nowhereville"), Some("Portugal")).await;

        assert_eq!(info.kind, PlaceKind::Country);
        assert_eq!(info.name, "Portugal");
        assert_eq!(info.info, "History of Portugal.\n\n");
    }

    #[tokio::test]
    async fn nothing_found_yields_none_with_apology() {
        let wiki = StubWiki::with_pages(&[]);
        let info = lookup(&dataset(), &wiki, Some("Nowhereville"), Some("Nolandia")).await;

        assert_eq!(info.kind, PlaceKind::None);
        assert_eq!(info.name, "Nowhereville");
        assert_eq!(info.info, NOT_FOUND_MESSAGE);
    }

    #[tokio::test]
    async fn no_parameters_at_all_yields_unknown() {
        let wiki = StubWiki::with_pages(&[]);
        let info = lookup(&dataset(), &wiki, None, None).await;

        assert_eq!(info.kind, PlaceKind::None);
        assert_eq!(info.name, "Unknown");
    }

    #[tokio::test]
    async fn empty_parameters_behave_like_absent_ones() {
        let wiki = StubWiki::with_pages(&[]);
        let info = lookup(&dataset(), &wiki, Some("  "), Some("")).await;

        assert_eq!(info.kind, PlaceKind::None);
        assert_eq!(info.name, "Unknown");
    }

    #[tokio::test]
    async fn wikipedia_errors_are_swallowed_into_not_found() {
        let wiki = StubWiki::failing();
        let info = lookup(&dataset(), &wiki, Some("Nowhereville"), Some("Nolandia")).await;

        assert_eq!(info.kind, PlaceKind::None);
        assert_eq!(info.info, NOT_FOUND_MESSAGE);
    }

    #[tokio::test]
    async fn curated_lookup_still_works_when_wikipedia_is_down() {
        let wiki = StubWiki::failing();
        let info = lookup(&dataset(), &wiki, Some("Tokyo"), None).await;

        assert_eq!(info.kind, PlaceKind::City);
        assert_eq!(info.name, "Tokyo, Japan");
    }

    #[test]
    fn place_info_serializes_with_type_field() {
        let info = PlaceInfo {
            kind: PlaceKind::None,
            name: "Unknown".into(),
            info: NOT_FOUND_MESSAGE.into(),
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["type"], "none");
        assert_eq!(json["name"], "Unknown");
    }
}
