//! GitHub releases API: paginated listing of golangci-lint tags.

use crate::types::GitHubRelease;
use anyhow::{Context, Result};
use regex::Regex;
use reqwest::header::{HeaderMap, ACCEPT, AUTHORIZATION, LINK};
use reqwest::{Client, StatusCode, Url};
use std::sync::OnceLock;
use thiserror::Error;

pub const USER_AGENT: &str = concat!("golang-ci/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum ReleaseApiError {
    #[error("GitHub API rate limit exceeded while fetching {url}; set GITHUB_TOKEN to raise the limit")]
    RateLimited { url: String },
    #[error("got status code {status} from {url}: {body}")]
    BadStatus {
        url: String,
        status: StatusCode,
        body: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleasePage {
    pub versions: Vec<String>,
    pub next: Option<String>,
}

pub fn http_client() -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .context("cannot build HTTP client")
}

/// Lists every release tag, following `Link: rel="next"` until the last page.
pub async fn list_versions(client: &Client, releases_url: &str, page_size: u32) -> Result<Vec<String>> {
    let token = github_token();
    if token.is_some() {
        tracing::debug!("Using GITHUB_TOKEN");
    }

    let mut versions = Vec::new();
    let mut next = Some(first_page_url(releases_url, page_size)?);

    while let Some(url) = next {
        tracing::info!("Fetching {}...", url);
        let page = fetch_release_page(client, &url, token.as_deref())
            .await
            .with_context(|| format!("error encountered while fetching {}", url))?;
        versions.extend(page.versions);
        next = page.next;
    }

    Ok(versions)
}

fn github_token() -> Option<String> {
    std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty())
}

fn first_page_url(releases_url: &str, page_size: u32) -> Result<String> {
    let mut url = Url::parse(releases_url)
        .with_context(|| format!("invalid releases URL: {}", releases_url))?;
    if !url.query_pairs().any(|(k, _)| k == "per_page") {
        url.query_pairs_mut()
            .append_pair("per_page", &page_size.to_string());
    }
    Ok(url.to_string())
}

pub async fn fetch_release_page(
    client: &Client,
    url: &str,
    token: Option<&str>,
) -> Result<ReleasePage> {
    let mut request = client
        .get(url)
        .header(ACCEPT, "application/vnd.github.v3+json");

    if let Some(token) = token {
        request = request.header(AUTHORIZATION, format!("token {}", token));
    }

    let response = request.send().await?;
    let status = response.status();
    let next = next_link(response.headers());

    if !status.is_success() {
        if is_rate_limited(status, response.headers()) {
            return Err(ReleaseApiError::RateLimited {
                url: url.to_string(),
            }
            .into());
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());
        return Err(ReleaseApiError::BadStatus {
            url: url.to_string(),
            status,
            body,
        }
        .into());
    }

    let body = response.bytes().await?;
    let releases: Vec<GitHubRelease> =
        serde_json::from_slice(&body).context("json decode error")?;
    tracing::debug!("Decoded {} releases from {}", releases.len(), url);
    for release in &releases {
        tracing::trace!(
            "Release {} ({}) published {}",
            release.tag_name,
            release.name.as_deref().unwrap_or("-"),
            release.published_at.as_deref().unwrap_or("unknown")
        );
    }

    Ok(ReleasePage {
        versions: releases.into_iter().map(|r| r.tag_name).collect(),
        next,
    })
}

fn is_rate_limited(status: StatusCode, headers: &HeaderMap) -> bool {
    (status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS)
        && headers
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            == Some("0")
}

fn next_link(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(LINK)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(parse_next_link)
}

fn link_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"<([^>]*)>((?:\s*;\s*(?:[^;,"]|"[^"]*")+)*)"#).expect("valid link regex")
    })
}

fn rel_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i);\s*rel\s*=\s*(?:"([^"]*)"|([^\s;,"]+))"#).expect("valid rel regex")
    })
}

/// Extracts the `rel="next"` target from a `Link` header value.
pub fn parse_next_link(header: &str) -> Option<String> {
    link_regex().captures_iter(header).find_map(|link| {
        let params = link.get(2).map_or("", |m| m.as_str());
        let rel = rel_regex().captures(params)?;
        let rel_types = rel.get(1).or_else(|| rel.get(2))?.as_str();
        rel_types
            .split_whitespace()
            .any(|r| r.eq_ignore_ascii_case("next"))
            .then(|| link[1].trim().to_string())
    })
}
