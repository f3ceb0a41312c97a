//! Headless CMS content client.
//!
//! A thin reqwest-based client for the content store's HTTP API. The client
//! is explicitly constructed from configuration (endpoint resolved from the
//! repository name, optional access token, content-type route patterns) so
//! tests can point it at a fake store.

pub mod format;

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("invalid content API endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
    #[error("content request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("content store returned {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },
    #[error("failed to decode content response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("continuation URL points outside the content store: {0}")]
    ForeignContinuation(String),
}

/// Maps a content type to the site path pattern for its documents.
#[derive(Debug, Clone)]
pub struct Route {
    pub document_type: String,
    pub path: String,
}

/// Content client configuration.
///
/// Constructed from application [`Config`] rather than read from global
/// state, so a test can substitute a fake store via the endpoint override.
#[derive(Debug, Clone)]
pub struct ContentConfig {
    pub repository: String,
    pub endpoint: Option<String>,
    pub access_token: Option<String>,
    pub routes: Vec<Route>,
    pub timeout: Duration,
}

impl ContentConfig {
    /// Derive the content configuration from the application configuration.
    #[must_use]
    pub fn from_app_config(config: &Config) -> Self {
        Self {
            repository: config.cms_repository.clone(),
            endpoint: config.cms_endpoint.clone(),
            access_token: config.cms_access_token.clone(),
            routes: vec![Route {
                document_type: "posts".to_string(),
                path: "/post/:uid".to_string(),
            }],
            timeout: config.http_timeout,
        }
    }

    /// Resolve the API endpoint from the repository name, unless overridden.
    fn resolved_endpoint(&self) -> Result<Url, ContentError> {
        let raw = self.endpoint.clone().unwrap_or_else(|| {
            format!("https://{}.cdn.prismic.io/api/v2", self.repository)
        });
        Ok(Url::parse(&raw)?)
    }
}

/// Options for a paginated document query.
#[derive(Debug, Clone)]
pub struct QueryOptions {
    pub fetch_fields: Vec<String>,
    pub page_size: u32,
    pub page: u32,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            fetch_fields: Vec::new(),
            page_size: 20,
            page: 1,
        }
    }
}

impl QueryOptions {
    /// Create options with the given page size, starting at the first page.
    #[must_use]
    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            page_size,
            ..Self::default()
        }
    }

    /// Restrict the response to the given document fields.
    #[must_use]
    pub fn fetch(mut self, fields: &[&str]) -> Self {
        self.fetch_fields = fields.iter().map(ToString::to_string).collect();
        self
    }

    /// Select a specific result page.
    #[must_use]
    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }
}

/// One fetched batch of raw documents plus the opaque continuation URL.
///
/// `next_page` is absent or empty when the store has no further pages.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub next_page: Option<String>,
    #[serde(default)]
    pub results: Vec<RawDocument>,
}

/// A raw post document as returned by the content store.
///
/// Fields are optional at the wire level; a malformed item is passed through
/// to the formatter, which decides on placeholders.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDocument {
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub first_publication_date: Option<String>,
    #[serde(default)]
    pub data: RawPostData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPostData {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub banner: Option<RawBanner>,
    #[serde(default)]
    pub content: Vec<RawSection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawBanner {
    #[serde(default)]
    pub url: Option<String>,
}

/// One content section: a heading plus pre-rendered rich-text HTML.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSection {
    #[serde(default)]
    pub heading: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

/// Client for the headless CMS HTTP API.
#[derive(Clone)]
pub struct ContentClient {
    http: reqwest::Client,
    endpoint: Url,
    access_token: Option<String>,
    routes: Vec<Route>,
}

impl ContentClient {
    /// Build a client from the given configuration.
    ///
    /// Every request carries a timeout; a timed-out fetch surfaces as
    /// [`ContentError::Http`] rather than hanging the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not a valid URL or the HTTP
    /// client cannot be constructed.
    pub fn new(config: &ContentConfig) -> Result<Self, ContentError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("spacetraveling/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            endpoint: config.resolved_endpoint()?,
            access_token: config.access_token.clone(),
            routes: config.routes.clone(),
        })
    }

    /// Query all documents of a type, reverse-chronological as returned by
    /// the store. The result order is preserved downstream; nothing re-sorts.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the store responds with a
    /// non-success status, or the body cannot be decoded.
    pub async fn query(
        &self,
        document_type: &str,
        options: &QueryOptions,
    ) -> Result<QueryResponse, ContentError> {
        let mut url = self.search_url()?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("q", &at_predicate("document.type", document_type));
            pairs.append_pair("pageSize", &options.page_size.to_string());
            if options.page > 1 {
                pairs.append_pair("page", &options.page.to_string());
            }
            if !options.fetch_fields.is_empty() {
                pairs.append_pair("fetch", &options.fetch_fields.join(","));
            }
            if let Some(token) = &self.access_token {
                pairs.append_pair("access_token", token);
            }
        }

        self.get_query_response(url).await
    }

    /// Fetch a single document by uid.
    ///
    /// Returns `Ok(None)` when the store has no document with that uid.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be decoded.
    pub async fn get_by_uid(
        &self,
        document_type: &str,
        uid: &str,
    ) -> Result<Option<RawDocument>, ContentError> {
        let mut url = self.search_url()?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair(
                "q",
                &at_predicate(&format!("my.{document_type}.uid"), uid),
            );
            pairs.append_pair("pageSize", "1");
            if let Some(token) = &self.access_token {
                pairs.append_pair("access_token", token);
            }
        }

        let response = self.get_query_response(url).await?;
        Ok(response.results.into_iter().next())
    }

    /// Follow an opaque continuation URL from a previous query response.
    ///
    /// The token is opaque but must point back at the configured content
    /// store; a URL with a foreign origin is rejected before any request
    /// is made.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or foreign, the request fails,
    /// or the response cannot be decoded.
    pub async fn fetch_page(&self, next_page: &str) -> Result<QueryResponse, ContentError> {
        let url = Url::parse(next_page)?;
        if url.host_str() != self.endpoint.host_str() {
            return Err(ContentError::ForeignContinuation(next_page.to_string()));
        }

        self.get_query_response(url).await
    }

    /// Resolve the site path for a document of the given type.
    #[must_use]
    pub fn resolve_route(&self, document_type: &str, uid: &str) -> Option<String> {
        self.routes
            .iter()
            .find(|r| r.document_type == document_type)
            .map(|r| r.path.replace(":uid", &urlencoding::encode(uid)))
    }

    fn search_url(&self) -> Result<Url, ContentError> {
        let base = self.endpoint.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/documents/search"))?)
    }

    async fn get_query_response(&self, url: Url) -> Result<QueryResponse, ContentError> {
        tracing::debug!(url = %url, "Querying content store");

        let response = self.http.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ContentError::Status {
                status,
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Build an `at` predicate for the query language, e.g.
/// `[[at(document.type,"posts")]]`.
fn at_predicate(path: &str, value: &str) -> String {
    format!("[[at({path},\"{value}\")]]")
}
