//! Post formatter.
//!
//! Pure mapping from a raw content-query response to the stable page shape
//! the rest of the system consumes. Publication timestamps are parsed once
//! here and kept as `DateTime` values; the locale display string is produced
//! at render time only, so a formatted string never feeds back in.

use chrono::{DateTime, Datelike, Utc};

use super::{QueryResponse, RawDocument};

/// Continuation state of a formatted page.
///
/// `End` is the terminal sentinel: the store has no further pages and the
/// load-more control must not be interactive. It is distinct from a feed
/// that was never seeded, which simply does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// Opaque continuation URL for the next batch.
    Token(String),
    /// No more pages exist.
    End,
}

impl NextPage {
    #[must_use]
    pub fn is_end(&self) -> bool {
        matches!(self, Self::End)
    }
}

/// A post as shown on the listing page. Immutable once formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSummary {
    pub uid: String,
    pub first_publication_date: Option<DateTime<Utc>>,
    pub title: String,
    pub subtitle: String,
    pub author: String,
}

/// One fetched batch of posts plus the continuation token.
///
/// Ordering is reverse chronological as returned by the content store;
/// the formatter never re-sorts or de-duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostPage {
    pub next_page: NextPage,
    pub posts: Vec<PostSummary>,
}

/// One content section of a post: a heading plus pre-rendered rich-text
/// HTML. The body is opaque trusted markup from the content store's own
/// rich-text renderer and is only injected through one audited call site
/// in the detail template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentSection {
    pub heading: String,
    pub body_html: String,
}

/// A post with its full content, as shown on the detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDetail {
    pub uid: String,
    pub first_publication_date: Option<DateTime<Utc>>,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub banner_url: Option<String>,
    pub content: Vec<ContentSection>,
}

/// Format a raw paginated query response into a [`PostPage`].
///
/// An absent or empty `next_page` maps to the terminal sentinel. A raw item
/// with missing fields is not rejected; missing text fields are carried as
/// empty strings so templates never render a hole.
#[must_use]
pub fn format_page(response: &QueryResponse) -> PostPage {
    let next_page = match response.next_page.as_deref() {
        Some(url) if !url.is_empty() => NextPage::Token(url.to_string()),
        _ => NextPage::End,
    };

    let posts = response.results.iter().map(format_summary).collect();

    PostPage { next_page, posts }
}

/// Format a single raw document into a listing summary.
#[must_use]
pub fn format_summary(raw: &RawDocument) -> PostSummary {
    PostSummary {
        uid: raw.uid.clone().unwrap_or_default(),
        first_publication_date: parse_publication_date(raw.first_publication_date.as_deref()),
        title: raw.data.title.clone().unwrap_or_default(),
        subtitle: raw.data.subtitle.clone().unwrap_or_default(),
        author: raw.data.author.clone().unwrap_or_default(),
    }
}

/// Format a single raw document into a full detail view.
#[must_use]
pub fn format_detail(raw: &RawDocument) -> PostDetail {
    let summary = format_summary(raw);

    let content = raw
        .data
        .content
        .iter()
        .map(|section| ContentSection {
            heading: section.heading.clone().unwrap_or_default(),
            body_html: section.body.clone().unwrap_or_default(),
        })
        .collect();

    PostDetail {
        uid: summary.uid,
        first_publication_date: summary.first_publication_date,
        title: summary.title,
        subtitle: summary.subtitle,
        author: summary.author,
        banner_url: raw.data.banner.as_ref().and_then(|b| b.url.clone()),
        content,
    }
}

fn parse_publication_date(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|d| d.with_timezone(&Utc))
}

/// Portuguese month abbreviations for the "d MMM yyyy" display format.
const MONTHS_PT_ABBR: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

/// Render a publication timestamp as "d MMM yyyy" in Portuguese,
/// e.g. "25 Mar 2021". Applied exactly once, at render time.
#[must_use]
pub fn format_publication_date(date: &DateTime<Utc>) -> String {
    let month = MONTHS_PT_ABBR[date.month0() as usize];
    format!("{} {} {}", date.day(), month, date.year())
}

/// Words per minute assumed for the estimated reading time.
const READING_WORDS_PER_MINUTE: usize = 200;

/// Estimate the reading time of a post in whole minutes, never below 1.
#[must_use]
pub fn estimated_reading_time(post: &PostDetail) -> usize {
    let words: usize = post
        .content
        .iter()
        .map(|section| {
            count_words(&section.heading) + count_words(&strip_tags(&section.body_html))
        })
        .sum();

    words.div_ceil(READING_WORDS_PER_MINUTE).max(1)
}

fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Drop HTML tags so word counting only sees text content.
fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => {
                in_tag = true;
                // Tag boundaries separate words.
                out.push(' ');
            }
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{RawBanner, RawPostData, RawSection};

    fn raw_doc(uid: &str, date: Option<&str>, title: &str) -> RawDocument {
        RawDocument {
            uid: Some(uid.to_string()),
            first_publication_date: date.map(ToString::to_string),
            data: RawPostData {
                title: Some(title.to_string()),
                subtitle: Some(format!("{title} subtitle")),
                author: Some("Author".to_string()),
                banner: None,
                content: Vec::new(),
            },
        }
    }

    #[test]
    fn test_empty_next_page_maps_to_end() {
        let response = QueryResponse {
            next_page: Some(String::new()),
            results: vec![],
        };
        assert_eq!(format_page(&response).next_page, NextPage::End);

        let response = QueryResponse {
            next_page: None,
            results: vec![],
        };
        assert_eq!(format_page(&response).next_page, NextPage::End);
    }

    #[test]
    fn test_non_empty_next_page_is_token() {
        let response = QueryResponse {
            next_page: Some("/page2".to_string()),
            results: vec![],
        };
        assert_eq!(
            format_page(&response).next_page,
            NextPage::Token("/page2".to_string())
        );
    }

    #[test]
    fn test_result_count_and_order_preserved() {
        let response = QueryResponse {
            next_page: None,
            results: vec![
                raw_doc("c", Some("2021-03-25T00:00:00Z"), "Third"),
                raw_doc("a", Some("2021-03-27T00:00:00Z"), "First"),
                raw_doc("b", Some("2021-03-26T00:00:00Z"), "Second"),
            ],
        };
        let page = format_page(&response);
        assert_eq!(page.posts.len(), 3);
        // Same order as input, no re-sort.
        let uids: Vec<&str> = page.posts.iter().map(|p| p.uid.as_str()).collect();
        assert_eq!(uids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_formats_raw_response_scenario() {
        let response: QueryResponse = serde_json::from_str(
            r#"{
                "next_page": "",
                "results": [{
                    "uid": "a",
                    "first_publication_date": "2021-03-25T00:00:00Z",
                    "data": {"title": "T1", "subtitle": "S1", "author": "A1"}
                }]
            }"#,
        )
        .unwrap();

        let page = format_page(&response);
        assert_eq!(page.next_page, NextPage::End);
        assert_eq!(page.posts.len(), 1);

        let post = &page.posts[0];
        assert_eq!(post.uid, "a");
        assert_eq!(post.title, "T1");
        assert_eq!(post.subtitle, "S1");
        assert_eq!(post.author, "A1");
        assert_eq!(
            format_publication_date(&post.first_publication_date.unwrap()),
            "25 Mar 2021"
        );
    }

    #[test]
    fn test_malformed_item_gets_placeholders() {
        let response: QueryResponse =
            serde_json::from_str(r#"{"next_page": null, "results": [{}]}"#).unwrap();
        let page = format_page(&response);
        assert_eq!(page.posts.len(), 1);
        assert_eq!(page.posts[0].uid, "");
        assert_eq!(page.posts[0].title, "");
        assert!(page.posts[0].first_publication_date.is_none());
    }

    #[test]
    fn test_unparseable_date_is_none() {
        let doc = raw_doc("a", Some("25 Mar 2021"), "Already formatted");
        // A display string is not a valid wire timestamp; the formatter
        // refuses to treat it as one instead of double-formatting.
        assert!(format_summary(&doc).first_publication_date.is_none());
    }

    #[test]
    fn test_format_publication_date_months() {
        let jan = DateTime::parse_from_rfc3339("2021-01-02T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(format_publication_date(&jan), "2 Jan 2021");

        let dez = DateTime::parse_from_rfc3339("2020-12-31T23:59:59Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(format_publication_date(&dez), "31 Dez 2020");
    }

    #[test]
    fn test_format_detail_sections() {
        let raw = RawDocument {
            uid: Some("post".to_string()),
            first_publication_date: Some("2021-03-25T00:00:00Z".to_string()),
            data: RawPostData {
                title: Some("Title".to_string()),
                subtitle: Some("Subtitle".to_string()),
                author: Some("Author".to_string()),
                banner: Some(RawBanner {
                    url: Some("https://images.example.com/banner.png".to_string()),
                }),
                content: vec![
                    RawSection {
                        heading: Some("Part one".to_string()),
                        body: Some("<p>Hello <strong>world</strong></p>".to_string()),
                    },
                    RawSection {
                        heading: None,
                        body: None,
                    },
                ],
            },
        };

        let detail = format_detail(&raw);
        assert_eq!(detail.banner_url.as_deref(), Some("https://images.example.com/banner.png"));
        assert_eq!(detail.content.len(), 2);
        assert_eq!(detail.content[0].heading, "Part one");
        assert_eq!(detail.content[0].body_html, "<p>Hello <strong>world</strong></p>");
        assert_eq!(detail.content[1].heading, "");
        assert_eq!(detail.content[1].body_html, "");
    }

    #[test]
    fn test_format_detail_empty_content() {
        let raw = raw_doc("empty", None, "Empty");
        let detail = format_detail(&raw);
        assert!(detail.content.is_empty());
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<p>one two</p>").trim(), "one two");
        assert_eq!(count_words(&strip_tags("<p>one</p><p>two</p>")), 2);
        assert_eq!(strip_tags("plain text"), "plain text");
    }

    #[test]
    fn test_estimated_reading_time() {
        let short = PostDetail {
            uid: "short".to_string(),
            first_publication_date: None,
            title: "Short".to_string(),
            subtitle: String::new(),
            author: String::new(),
            banner_url: None,
            content: vec![ContentSection {
                heading: "Heading".to_string(),
                body_html: "<p>just a few words</p>".to_string(),
            }],
        };
        assert_eq!(estimated_reading_time(&short), 1);

        let body = format!("<p>{}</p>", "word ".repeat(450));
        let long = PostDetail {
            content: vec![ContentSection {
                heading: String::new(),
                body_html: body,
            }],
            ..short
        };
        assert_eq!(estimated_reading_time(&long), 3);
    }
}
