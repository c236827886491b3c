//! Small text helpers shared by the content projections.

use regex::Regex;
use std::sync::LazyLock;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());
static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"&[^;\s]+;").unwrap());
static NUMERIC_ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"&#[0-9]+;").unwrap());

/// Remove every `<...>` tag.
pub fn strip_tags(html: &str) -> String {
    TAG_RE.replace_all(html, "").into_owned()
}

/// Remove tags and any `&...;` entity, then trim. Used for short descriptions.
pub fn plain_description(html: &str) -> String {
    let text = strip_tags(html);
    ENTITY_RE.replace_all(&text, "").trim().to_string()
}

/// Named entities that show up in the Spanish content.
const ENTITIES: &[(&str, &str)] = &[
    ("&aacute;", "á"),
    ("&eacute;", "é"),
    ("&iacute;", "í"),
    ("&oacute;", "ó"),
    ("&uacute;", "ú"),
    ("&ntilde;", "ñ"),
    ("&Aacute;", "Á"),
    ("&Eacute;", "É"),
    ("&Iacute;", "Í"),
    ("&Oacute;", "Ó"),
    ("&Uacute;", "Ú"),
    ("&Ntilde;", "Ñ"),
    ("&nbsp;", " "),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
];

/// Strip tags and decode common entities into readable text.
///
/// Numeric entities become spaces; `&amp;` is decoded last so that an
/// escaped entity (`&amp;lt;`) is not decoded twice.
pub fn html_to_text(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }
    let mut text = strip_tags(html);
    for (entity, ch) in ENTITIES {
        text = text.replace(entity, ch);
    }
    text = NUMERIC_ENTITY_RE.replace_all(&text, " ").into_owned();
    text.replace("&amp;", "&").trim().to_string()
}

/// Uppercase the first character, leave the rest untouched.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Capitalize each space-separated word and lowercase the remainder.
pub fn capitalize_words(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(|c| c.to_lowercase()))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_description_drops_tags_and_entities() {
        assert_eq!(
            plain_description("<p>Rosas &amp; trepadoras&hellip;</p>\n"),
            "Rosas  trepadoras"
        );
    }

    #[test]
    fn html_to_text_decodes_spanish_entities() {
        assert_eq!(
            html_to_text("<p>Jard&iacute;n de Espa&ntilde;a&nbsp;&#8211; 5 &lt; 6</p>"),
            "Jardín de España   5 < 6"
        );
    }

    #[test]
    fn html_to_text_amp_decoded_once() {
        assert_eq!(html_to_text("&amp;lt;"), "&lt;");
    }

    #[test]
    fn capitalization() {
        assert_eq!(capitalize_first("rosa trepadora"), "Rosa trepadora");
        assert_eq!(capitalize_first(""), "");
        assert_eq!(capitalize_words("ROSA banksiae  lutea"), "Rosa Banksiae  Lutea");
        assert_eq!(capitalize_words("ápice"), "Ápice");
    }
}
