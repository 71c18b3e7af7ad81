use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Article sections worth showing to a traveler. Anything else is skipped.
const ALLOWED_SECTIONS: [&str; 6] = [
    "History",
    "Culture",
    "Tourism",
    "Attractions",
    "Landmarks",
    "Language",
];

// Response mirrors for the MediaWiki parse API. Only the fields we read.

#[derive(Debug, Deserialize)]
struct SectionsResponse {
    parse: Option<SectionsParse>,
}

#[derive(Debug, Deserialize)]
struct SectionsParse {
    sections: Vec<Section>,
}

#[derive(Debug, Deserialize)]
struct Section {
    line: String,
    // The API serializes section indices as strings ("" for pseudo-sections).
    index: String,
}

#[derive(Debug, Deserialize)]
struct TextResponse {
    parse: Option<TextParse>,
}

#[derive(Debug, Deserialize)]
struct TextParse {
    text: SectionHtml,
}

#[derive(Debug, Deserialize)]
struct SectionHtml {
    #[serde(rename = "*")]
    html: String,
}

/// Source of combined section text for an article title. The lookup chain
/// only depends on this trait, so tests can swap in a stub.
#[async_trait]
pub trait SectionSource: Send + Sync {
    /// `Ok(None)` means the page is missing or has no usable sections.
    async fn fetch_sections(&self, title: &str) -> Result<Option<String>>;
}

/// Wikipedia parse-API client.
#[derive(Clone)]
pub struct WikiClient {
    client: Client,
    api_base: String,
}

impl WikiClient {
    pub fn new(api_base: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build Wikipedia HTTP client")?;
        Ok(WikiClient {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    async fn parse_query<T>(&self, query: &[(&str, &str)]) -> Result<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let resp = self
            .client
            .get(&self.api_base)
            .query(query)
            .send()
            .await
            .context("Wikipedia request failed")?;

        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("Wikipedia returned {}", status);
        }

        resp.json::<T>()
            .await
            .context("Failed to decode Wikipedia response")
    }

    /// Indices of the allowed sections of `title`, or `None` if the page
    /// does not exist (the API omits `parse` entirely in that case).
    async fn section_indices(&self, title: &str) -> Result<Option<Vec<u32>>> {
        let resp: SectionsResponse = self
            .parse_query(&[
                ("action", "parse"),
                ("page", title),
                ("prop", "sections"),
                ("format", "json"),
            ])
            .await?;

        Ok(resp.parse.map(|p| allowed_indices(&p.sections)))
    }

    async fn section_text(&self, title: &str, index: u32) -> Result<Option<String>> {
        let index = index.to_string();
        let resp: TextResponse = self
            .parse_query(&[
                ("action", "parse"),
                ("page", title),
                ("prop", "text"),
                ("section", index.as_str()),
                ("format", "json"),
            ])
            .await?;

        Ok(resp.parse.map(|p| p.text.html))
    }
}

#[async_trait]
impl SectionSource for WikiClient {
    async fn fetch_sections(&self, title: &str) -> Result<Option<String>> {
        let Some(indices) = self.section_indices(title).await? else {
            tracing::debug!(title, "no Wikipedia page");
            return Ok(None);
        };

        let mut combined = String::new();
        for index in indices {
            if let Some(html) = self.section_text(title, index).await? {
                combined.push_str(&strip_html_tags(&html));
                combined.push_str("\n\n");
            }
        }

        if combined.is_empty() {
            Ok(None)
        } else {
            Ok(Some(combined))
        }
    }
}

/// Pick the numeric indices of sections on the allow-list. Pseudo-sections
/// with non-numeric indices are skipped.
fn allowed_indices(sections: &[Section]) -> Vec<u32> {
    sections
        .iter()
        .filter(|s| ALLOWED_SECTIONS.contains(&s.line.as_str()))
        .filter_map(|s| s.index.parse::<u32>().ok())
        .collect()
}

/// Drop every `<...>` run, leaving the text nodes. Entities are left as-is.
fn strip_html_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}
