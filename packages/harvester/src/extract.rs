//! Field extraction over rendered page source.
//!
//! Every rule here is a pure function over an HTML string, kept apart from
//! the traversal loop so each fallback chain can be tested against fixture
//! pages. A chain tries its primary rule and, only when the primary
//! *element* is absent, its fallback; a found-but-unusable value (e.g. an
//! unparseable date) resolves to an absent field, not to the fallback.

use chrono::{DateTime, NaiveTime, Utc};
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::types::MetaValue;

/// All per-page fields, extracted in one parse.
#[derive(Debug, Clone)]
pub struct PageFields {
    pub title: Option<String>,
    pub pub_date: Option<DateTime<Utc>>,
    pub abstract_text: Option<String>,
    pub body: Option<String>,
    pub workgroup: Option<String>,
    pub authors: MetaValue,
}

/// Extract every field of a detail page.
pub fn extract_fields(html: &str) -> PageFields {
    let doc = Html::parse_document(html);
    PageFields {
        title: title_in(&doc),
        pub_date: pub_date_in(&doc),
        abstract_text: first_text(&doc, &["#section-abstract"]),
        body: body_in(&doc),
        workgroup: first_text(&doc, &[".workgroup"]),
        authors: authors_in(&doc),
    }
}

/// Candidate document links: every anchor whose visible text contains the
/// marker, hrefs resolved against the listing URL, in document order.
pub fn listing_links(html: &str, base: &Url, marker: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    let anchor = Selector::parse("a").unwrap();

    let mut links = Vec::new();
    for a in doc.select(&anchor) {
        if !element_text(&a).contains(marker) {
            continue;
        }
        let Some(href) = a.value().attr("href") else {
            continue;
        };
        if let Ok(resolved) = base.join(href) {
            links.push(resolved.to_string());
        }
    }
    links
}

/// Document title: `#title`, falling back to the first level-1 heading.
pub fn title(html: &str) -> Option<String> {
    title_in(&Html::parse_document(html))
}

/// Publication date: `<time>` text, falling back to the last cell of the
/// first content table. Unparseable text yields `None`.
pub fn pub_date(html: &str) -> Option<DateTime<Utc>> {
    pub_date_in(&Html::parse_document(html))
}

/// Abstract section text; no fallback beyond absence.
pub fn abstract_text(html: &str) -> Option<String> {
    first_text(&Html::parse_document(html), &["#section-abstract"])
}

/// Full visible body text; single rule.
pub fn body_text(html: &str) -> Option<String> {
    body_in(&Html::parse_document(html))
}

/// Working-group name, when the page carries one.
pub fn workgroup(html: &str) -> Option<String> {
    first_text(&Html::parse_document(html), &[".workgroup"])
}

/// Author list: structured `{name, org}` pairs, falling back to the raw
/// cells of the first content table when the structured parse breaks.
pub fn authors(html: &str) -> MetaValue {
    authors_in(&Html::parse_document(html))
}

/// Whether the page shows the "Renamed Specification" heading that
/// precedes a slow server-side redirect.
pub fn has_renamed_notice(html: &str) -> bool {
    let doc = Html::parse_document(html);
    let h2 = Selector::parse("h2").unwrap();
    doc.select(&h2)
        .any(|el| element_text(&el) == "Renamed Specification")
}

/// Whether dynamic content has settled enough to extract: a body element
/// with visible text.
pub fn is_settled(html: &str) -> bool {
    body_in(&Html::parse_document(html)).is_some_and(|text| !text.is_empty())
}

/// First-success-wins over an ordered list of selectors. Resolves to the
/// text of the first selector that matches an element; an empty match
/// counts as absent.
fn first_text(doc: &Html, selectors: &[&str]) -> Option<String> {
    selectors
        .iter()
        .find_map(|raw| {
            let selector = Selector::parse(raw).unwrap();
            doc.select(&selector).next()
        })
        .map(|el| element_text(&el))
        .filter(|text| !text.is_empty())
}

fn title_in(doc: &Html) -> Option<String> {
    first_text(doc, &["#title", "h1"])
}

fn pub_date_in(doc: &Html) -> Option<DateTime<Utc>> {
    let time = Selector::parse("time").unwrap();
    doc.select(&time)
        .next()
        .map(|el| element_text(&el))
        .or_else(|| content_table_cells(doc).pop())
        // Date-only inputs resolve to midnight UTC so repeated extraction
        // of the same page yields the same timestamp
        .and_then(|raw| dateparser::parse_with(raw.trim(), &Utc, NaiveTime::MIN).ok())
}

fn body_in(doc: &Html) -> Option<String> {
    let body = Selector::parse("body").unwrap();
    doc.select(&body).next().map(visible_text)
}

fn authors_in(doc: &Html) -> MetaValue {
    let author = Selector::parse(".author").unwrap();
    let name_sel = Selector::parse(".author-name").unwrap();
    let org_sel = Selector::parse(".org").unwrap();

    let mut entries = Vec::new();
    for el in doc.select(&author) {
        let name = el.select(&name_sel).next().map(|e| element_text(&e));
        let org = el.select(&org_sel).next().map(|e| element_text(&e));
        match (name, org) {
            (Some(name), Some(org)) => entries.push(crate::types::Author { name, org }),
            // Structural break: fall back to the raw table cells
            _ => return MetaValue::List(content_table_cells(doc)),
        }
    }
    MetaValue::Authors(entries)
}

/// Text of every cell of the first table that is not the table-of-contents
/// decoration (`TOCbug`).
fn content_table_cells(doc: &Html) -> Vec<String> {
    let table = Selector::parse("table:not(.TOCbug)").unwrap();
    let cell = Selector::parse("td").unwrap();

    doc.select(&table)
        .next()
        .map(|t| t.select(&cell).map(|c| element_text(&c)).collect())
        .unwrap_or_default()
}

/// Whitespace-normalized text of one element.
fn element_text(el: &ElementRef) -> String {
    el.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Visible text of an element: text nodes in document order, scripts and
/// styles skipped, one line per text node.
fn visible_text(el: ElementRef) -> String {
    let mut lines = Vec::new();
    collect_visible(el, &mut lines);
    lines.join("\n")
}

fn collect_visible(el: ElementRef, lines: &mut Vec<String>) {
    for child in el.children() {
        if let Some(text) = child.value().as_text() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                lines.push(trimmed.to_string());
            }
        } else if let Some(child_el) = ElementRef::wrap(child) {
            let name = child_el.value().name();
            if name == "script" || name == "style" {
                continue;
            }
            collect_visible(child_el, lines);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Author;

    #[test]
    fn listing_links_filters_by_marker_and_keeps_order() {
        let html = r#"
            <a href="openid-connect-core-1_0.html">openid-connect-core-1_0.html</a>
            <a href="changelog.txt">changelog.txt</a>
            <a href="openid-connect-discovery-1_0.html">openid-connect-discovery-1_0.html</a>
            <a href="errata.html">errata.html</a>
        "#;
        let base = Url::parse("https://specs.example.org/?C=M;O=D").unwrap();

        let links = listing_links(html, &base, ".html");

        assert_eq!(
            links,
            vec![
                "https://specs.example.org/openid-connect-core-1_0.html",
                "https://specs.example.org/openid-connect-discovery-1_0.html",
                "https://specs.example.org/errata.html",
            ]
        );
    }

    #[test]
    fn title_prefers_id_over_heading() {
        let html = r#"<h1>Heading Title</h1><div id="title">Id Title</div>"#;
        assert_eq!(title(html).as_deref(), Some("Id Title"));
    }

    #[test]
    fn title_falls_back_to_first_h1() {
        let html = "<h1>Heading Title</h1><h1>Second</h1>";
        assert_eq!(title(html).as_deref(), Some("Heading Title"));
    }

    #[test]
    fn title_absent_when_neither_rule_matches() {
        assert_eq!(title("<p>nothing here</p>"), None);
    }

    #[test]
    fn pub_date_prefers_time_element() {
        let html = r#"
            <time>May 25, 2021</time>
            <table><tr><td>December 1, 1999</td></tr></table>
        "#;
        let parsed = pub_date(html).unwrap();
        assert_eq!(
            parsed.format("%Y-%m-%d %H:%M:%S").to_string(),
            "2021-05-25 00:00:00"
        );
    }

    #[test]
    fn pub_date_falls_back_to_last_table_cell() {
        let html = r#"
            <table class="TOCbug"><tr><td>toc decoration</td></tr></table>
            <table><tr><td>A. Author</td><td>2014-02-25</td></tr></table>
        "#;
        let parsed = pub_date(html).unwrap();
        assert_eq!(parsed.format("%Y-%m-%d").to_string(), "2014-02-25");
    }

    #[test]
    fn pub_date_is_deterministic_for_date_only_input() {
        // No time-of-day on the page; the missing part must not default to
        // the current clock
        let html = "<time>May 25, 2021</time>";
        let first = pub_date(html).unwrap();
        let second = pub_date(html).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.format("%H:%M:%S%.f").to_string(), "00:00:00");
    }

    #[test]
    fn unparseable_date_is_absent_not_fallback() {
        // <time> is present, so the chain must not consult the table
        let html = r#"
            <time>not a date at all</time>
            <table><tr><td>2014-02-25</td></tr></table>
        "#;
        assert_eq!(pub_date(html), None);
    }

    #[test]
    fn abstract_has_no_second_fallback() {
        let html = r#"<div id="section-abstract">The abstract.</div>"#;
        assert_eq!(abstract_text(html).as_deref(), Some("The abstract."));
        assert_eq!(abstract_text("<p>no abstract</p>"), None);
    }

    #[test]
    fn body_text_skips_scripts_and_styles() {
        let html = r#"
            <body>
              <script>var hidden = 1;</script>
              <style>p { color: red; }</style>
              <h1>Title</h1>
              <p>Visible paragraph.</p>
            </body>
        "#;
        let text = body_text(html).unwrap();
        assert!(text.contains("Title"));
        assert!(text.contains("Visible paragraph."));
        assert!(!text.contains("hidden"));
        assert!(!text.contains("color"));
    }

    #[test]
    fn structured_authors() {
        let html = r#"
            <div class="author">
              <span class="author-name">J. Doe</span>
              <span class="org">Example Org</span>
            </div>
            <div class="author">
              <span class="author-name">A. Smith</span>
              <span class="org">Other Org</span>
            </div>
        "#;
        assert_eq!(
            authors(html),
            MetaValue::Authors(vec![
                Author {
                    name: "J. Doe".into(),
                    org: "Example Org".into()
                },
                Author {
                    name: "A. Smith".into(),
                    org: "Other Org".into()
                },
            ])
        );
    }

    #[test]
    fn broken_author_markup_falls_back_to_table_cells() {
        let html = r#"
            <div class="author"><span class="author-name">J. Doe</span></div>
            <table><tr><td>J. Doe</td><td>Example Org</td></tr></table>
        "#;
        assert_eq!(
            authors(html),
            MetaValue::List(vec!["J. Doe".into(), "Example Org".into()])
        );
    }

    #[test]
    fn no_author_markup_is_an_empty_structured_list() {
        assert_eq!(authors("<p>no authors</p>"), MetaValue::Authors(vec![]));
    }

    #[test]
    fn renamed_notice_requires_exact_heading() {
        assert!(has_renamed_notice("<h2>Renamed Specification</h2>"));
        assert!(!has_renamed_notice("<h2>Renamed</h2>"));
        assert!(!has_renamed_notice("<h1>Renamed Specification</h1>"));
    }

    #[test]
    fn extraction_is_idempotent() {
        let html = r#"
            <h1 id="title">Spec</h1>
            <time>May 25, 2021</time>
            <div id="section-abstract">Abstract.</div>
            <body><p>Body.</p></body>
        "#;
        let first = extract_fields(html);
        let second = extract_fields(html);
        assert_eq!(first.title, second.title);
        assert_eq!(first.pub_date, second.pub_date);
        assert_eq!(first.abstract_text, second.abstract_text);
        assert_eq!(first.body, second.body);
    }
}
