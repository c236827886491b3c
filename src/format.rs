//! Content formatting.
//!
//! First stage of the pipeline. Takes the flat array produced by the scraper
//! and normalizes each item's HTML body so the site can serve it from any
//! host:
//!
//! - links to the site's own domain become relative (`https://site/rosa/` → `/rosa/`)
//! - internal links lose `target` and `rel`
//! - external links open in a new tab with `rel="noopener noreferrer"`
//! - empty block and inline wrappers (`<p> </p>`, `<strong>&nbsp;</strong>`) are dropped
//! - newlines and whitespace runs collapse to single spaces
//!
//! Tag allowlisting is handled upstream; this stage never removes content.

use crate::types::ContentItem;
use regex::{Captures, Regex};
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormatError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid domain pattern: {0}")]
    Pattern(#[from] regex::Error),
}

// Quoted attribute values may contain `>`.
static ANCHOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?is)<a\b((?:[^>"']|"[^"]*"|'[^']*')*)>"#).unwrap());

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)([A-Za-z_:][-A-Za-z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+)))?"#)
        .unwrap()
});

static EMPTY_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)<(p|h[1-6]|blockquote|li|ul|ol|code|pre|strong|em|b|i)>(?:\s|&nbsp;)*</(p|h[1-6]|blockquote|li|ul|ol|code|pre|strong|em|b|i)>",
    )
    .unwrap()
});

static ENTITY_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^&(?:#[0-9]+|#[xX][0-9A-Fa-f]+|[A-Za-z][A-Za-z0-9]*);").unwrap());

static NEWLINES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n+").unwrap());
static SPACES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").unwrap());

/// Rewrites links for one site domain.
#[derive(Debug, Clone)]
pub struct LinkRewriter {
    domain_re: Regex,
}

impl LinkRewriter {
    /// Build a rewriter for `domain` (e.g. `https://plantasyflores.online`).
    ///
    /// Both `http` and `https` variants of the host match, case-insensitively.
    pub fn new(domain: &str) -> Result<Self, FormatError> {
        let host = domain
            .trim()
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_end_matches('/');
        let domain_re = Regex::new(&format!(r"(?i)https?://{}/", regex::escape(host)))?;
        Ok(Self { domain_re })
    }

    /// Rewrite every `<a>` tag in `html`.
    pub fn rewrite_links(&self, html: &str) -> String {
        ANCHOR_RE
            .replace_all(html, |caps: &Captures| self.rewrite_anchor(&caps[1]))
            .into_owned()
    }

    fn rewrite_anchor(&self, attrs: &str) -> String {
        let mut kept: Vec<(String, Option<String>)> = Vec::new();
        let mut href: Option<String> = None;

        for caps in ATTR_RE.captures_iter(attrs) {
            let name = caps[1].to_ascii_lowercase();
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| m.as_str().to_string());
            match name.as_str() {
                "href" => {
                    href = value.map(|v| self.domain_re.replace_all(&v, "/").into_owned());
                }
                "target" | "rel" => {}
                _ => kept.push((name, value)),
            }
        }

        let internal = href.as_deref().is_some_and(|h| h.starts_with('/'));

        let mut out = String::from("<a");
        if let Some(h) = &href {
            out.push_str(&format!(" href=\"{}\"", escape_attr(h)));
        }
        for (name, value) in &kept {
            match value {
                Some(v) => out.push_str(&format!(" {name}=\"{}\"", escape_attr(v))),
                None => out.push_str(&format!(" {name}")),
            }
        }
        if !internal {
            out.push_str(" target=\"_blank\" rel=\"noopener noreferrer\"");
        }
        out.push('>');
        out
    }

    /// Apply the full formatting pass to one HTML body.
    pub fn format_html(&self, html: &str) -> String {
        let linked = self.rewrite_links(html);
        let trimmed = drop_empty_tags(&linked);
        collapse_whitespace(&trimmed)
    }
}

/// Escape a value for a double-quoted attribute.
///
/// `"` becomes `&quot;`; a bare `&` becomes `&amp;`, existing entities are kept.
pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for (i, c) in value.char_indices() {
        match c {
            '"' => out.push_str("&quot;"),
            '&' if !ENTITY_PREFIX_RE.is_match(&value[i..]) => out.push_str("&amp;"),
            _ => out.push(c),
        }
    }
    out
}

/// Remove empty wrappers such as `<p> </p>` or `<em>&nbsp;</em>`.
///
/// Runs two passes so that a wrapper emptied by the first pass
/// (`<li><strong></strong></li>`) is removed by the second.
pub fn drop_empty_tags(html: &str) -> String {
    let mut out = html.to_string();
    for _ in 0..2 {
        out = EMPTY_TAG_RE
            .replace_all(&out, |caps: &Captures| {
                if caps[1].eq_ignore_ascii_case(&caps[2]) {
                    String::new()
                } else {
                    caps[0].to_string()
                }
            })
            .into_owned();
    }
    out
}

/// Newlines become spaces, whitespace runs collapse, ends are trimmed.
pub fn collapse_whitespace(html: &str) -> String {
    let single = NEWLINES_RE.replace_all(html, " ");
    SPACES_RE.replace_all(&single, " ").trim().to_string()
}

/// Format every item's body in place.
pub fn format_items(items: Vec<ContentItem>, rewriter: &LinkRewriter) -> Vec<ContentItem> {
    items
        .into_iter()
        .map(|mut item| {
            item.content_html = rewriter.format_html(&item.content_html);
            item
        })
        .collect()
}

/// Read a content array from `input`, format it, write it to `output`.
///
/// Returns the number of items written.
pub fn format_file(input: &Path, output: &Path, domain: &str) -> Result<usize, FormatError> {
    let rewriter = LinkRewriter::new(domain)?;
    let content = std::fs::read_to_string(input)?;
    let items: Vec<ContentItem> = serde_json::from_str(&content)?;
    let formatted = format_items(items, &rewriter);
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output, serde_json::to_string_pretty(&formatted)?)?;
    log::info!("formatted {} items into {}", formatted.len(), output.display());
    Ok(formatted.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn rewriter() -> LinkRewriter {
        LinkRewriter::new("https://plantasyflores.online").unwrap()
    }

    #[test]
    fn absolute_site_link_becomes_relative() {
        let html = r#"<a href="https://plantasyflores.online/rosa/banksiae/">Banksiae</a>"#;
        assert_eq!(
            rewriter().rewrite_links(html),
            r#"<a href="/rosa/banksiae/">Banksiae</a>"#
        );
    }

    #[test]
    fn http_and_uppercase_host_are_rewritten() {
        let html = r#"<a href="HTTP://PlantasYFlores.online/tomate/">t</a>"#;
        assert_eq!(rewriter().rewrite_links(html), r#"<a href="/tomate/">t</a>"#);
    }

    #[test]
    fn internal_link_loses_target_and_rel() {
        let html = r#"<a target="_blank" rel="nofollow" href="/rosa/">r</a>"#;
        assert_eq!(rewriter().rewrite_links(html), r#"<a href="/rosa/">r</a>"#);
    }

    #[test]
    fn external_link_gets_safe_target() {
        let html = r#"<a href="https://es.wikipedia.org/wiki/Rosa">wiki</a>"#;
        assert_eq!(
            rewriter().rewrite_links(html),
            r#"<a href="https://es.wikipedia.org/wiki/Rosa" target="_blank" rel="noopener noreferrer">wiki</a>"#
        );
    }

    #[test]
    fn other_attributes_are_kept() {
        let html = r#"<a class='btn' href="https://plantasyflores.online/x/">x</a>"#;
        assert_eq!(
            rewriter().rewrite_links(html),
            r#"<a href="/x/" class="btn">x</a>"#
        );
    }

    #[test]
    fn quotes_inside_single_quoted_values_are_escaped() {
        let html = r#"<a href='https://plantasyflores.online/rosa/' title='la "reina"'>x</a>"#;
        assert_eq!(
            rewriter().rewrite_links(html),
            r#"<a href="/rosa/" title="la &quot;reina&quot;">x</a>"#
        );
    }

    #[test]
    fn bare_ampersands_escaped_entities_kept() {
        assert_eq!(escape_attr("a=1&b=2"), "a=1&amp;b=2");
        assert_eq!(escape_attr("Poda &amp; riego"), "Poda &amp; riego");
        assert_eq!(escape_attr("&#8211; &#x2014; &nbsp;"), "&#8211; &#x2014; &nbsp;");
        assert_eq!(escape_attr("fin &"), "fin &amp;");
    }

    #[test]
    fn gt_inside_quoted_value_keeps_tag_whole() {
        let html = r#"<a title="a > b" href="https://plantasyflores.online/rosa/">r</a>"#;
        assert_eq!(
            rewriter().rewrite_links(html),
            r#"<a href="/rosa/" title="a > b">r</a>"#
        );
    }

    #[test]
    fn non_anchor_tags_untouched() {
        let html = r#"<img src="https://plantasyflores.online/wp-content/a.webp" alt="a">"#;
        assert_eq!(rewriter().rewrite_links(html), html);
    }

    #[test]
    fn abbr_tag_is_not_an_anchor() {
        let html = "<abbr>pH</abbr>";
        assert_eq!(rewriter().rewrite_links(html), html);
    }

    #[test]
    fn empty_tags_dropped_in_two_passes() {
        let html = "<ul><li><strong> </strong></li></ul><p>&nbsp;</p><p>keep</p>";
        // First pass removes <strong>, second removes the now-empty <li>.
        assert_eq!(drop_empty_tags(html), "<ul></ul><p>keep</p>");
    }

    #[test]
    fn mismatched_pair_is_kept() {
        let html = "<p></em>";
        assert_eq!(drop_empty_tags(html), html);
    }

    #[test]
    fn whitespace_collapses() {
        assert_eq!(
            collapse_whitespace("\n<p>a\n\nb</p>   <p>c</p>\n"),
            "<p>a b</p> <p>c</p>"
        );
    }

    #[test]
    fn format_file_writes_formatted_items() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("content.json");
        std::fs::write(
            &input,
            r#"[{"id": 1, "type": "post", "slug": "a", "content_html": "<p> </p>\n<a href=\"https://plantasyflores.online/a/\">a</a>"}]"#,
        )
        .unwrap();
        let output = tmp.path().join("out/content.formatted.json");

        let count = format_file(&input, &output, "https://plantasyflores.online").unwrap();
        assert_eq!(count, 1);

        let written: Vec<ContentItem> =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written[0].content_html, r#"<a href="/a/">a</a>"#);
    }
}
