//! HTML entity to Unicode conversion.
//!
//! The XML reader only knows the five predefined entities, while converter
//! output and diagram labels may carry HTML named entities. Those are turned
//! into characters before parsing. The XML entities (amp, lt, gt, quot, apos)
//! are left for the reader. Ampersands that do not start a reference are
//! escaped so the reader does not reject them.

use std::sync::LazyLock;

use regex::Regex;

static ENTITY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&([a-zA-Z][a-zA-Z0-9]*);").expect("invalid entity regex"));

static AMPERSAND_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]+;|#[xX][0-9a-fA-F]+;|[a-zA-Z][a-zA-Z0-9]*;)?")
        .expect("invalid ampersand regex")
});

/// Convert HTML named entities to Unicode characters.
///
/// Unknown entities are kept verbatim.
pub fn convert_html_entities(html: &str) -> String {
    ENTITY_PATTERN
        .replace_all(html, |caps: &regex::Captures| {
            entity_to_unicode(&caps[1]).map_or_else(|| caps[0].to_owned(), str::to_owned)
        })
        .into_owned()
}

static CDATA_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!\[CDATA\[.*?\]\]>").expect("invalid CDATA regex"));

/// Escape every `&` that does not begin a named or numeric reference.
///
/// HTML tolerates `AT&T` or `a && b` in text; XML does not. CDATA sections
/// are copied unchanged.
pub fn escape_bare_ampersands(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut last = 0;
    for cdata in CDATA_PATTERN.find_iter(html) {
        result.push_str(&escape_outside_cdata(&html[last..cdata.start()]));
        result.push_str(cdata.as_str());
        last = cdata.end();
    }
    result.push_str(&escape_outside_cdata(&html[last..]));
    result
}

fn escape_outside_cdata(text: &str) -> std::borrow::Cow<'_, str> {
    AMPERSAND_PATTERN.replace_all(text, |caps: &regex::Captures| {
        if caps.get(1).is_some() {
            caps[0].to_owned()
        } else {
            "&amp;".to_owned()
        }
    })
}

/// Map an HTML entity name to its character.
fn entity_to_unicode(name: &str) -> Option<&'static str> {
    Some(match name {
        "nbsp" => "\u{00a0}",
        "mdash" => "\u{2014}",
        "ndash" => "\u{2013}",
        "ldquo" => "\u{201c}",
        "rdquo" => "\u{201d}",
        "lsquo" => "\u{2018}",
        "rsquo" => "\u{2019}",
        "bull" => "\u{2022}",
        "hellip" => "\u{2026}",
        "laquo" => "\u{00ab}",
        "raquo" => "\u{00bb}",

        // Arrows
        "rarr" => "\u{2192}",
        "larr" => "\u{2190}",
        "harr" => "\u{2194}",
        "uarr" => "\u{2191}",
        "darr" => "\u{2193}",
        "rArr" => "\u{21d2}",
        "lArr" => "\u{21d0}",

        // Math
        "le" => "\u{2264}",
        "ge" => "\u{2265}",
        "ne" => "\u{2260}",
        "plusmn" => "\u{00b1}",
        "times" => "\u{00d7}",
        "divide" => "\u{00f7}",
        "minus" => "\u{2212}",
        "infin" => "\u{221e}",
        "deg" => "\u{00b0}",
        "micro" => "\u{00b5}",
        "middot" => "\u{00b7}",
        "sup2" => "\u{00b2}",
        "sup3" => "\u{00b3}",
        "frac12" => "\u{00bd}",
        "frac14" => "\u{00bc}",
        "frac34" => "\u{00be}",

        // Symbols
        "copy" => "\u{00a9}",
        "reg" => "\u{00ae}",
        "trade" => "\u{2122}",
        "sect" => "\u{00a7}",
        "para" => "\u{00b6}",
        "euro" => "\u{20ac}",
        "pound" => "\u{00a3}",
        "yen" => "\u{00a5}",
        "cent" => "\u{00a2}",
        "check" => "\u{2713}",

        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_nbsp() {
        assert_eq!(
            convert_html_entities("Hello&nbsp;World"),
            "Hello\u{00a0}World"
        );
    }

    #[test]
    fn test_convert_multiple_entities() {
        assert_eq!(
            convert_html_entities("&copy; 2024 &mdash; x &le; y"),
            "\u{00a9} 2024 \u{2014} x \u{2264} y"
        );
    }

    #[test]
    fn test_preserve_unknown_entities() {
        assert_eq!(convert_html_entities("&unknown;"), "&unknown;");
    }

    #[test]
    fn test_preserve_xml_entities() {
        assert_eq!(
            convert_html_entities("&amp;&lt;&gt;&quot;&apos;"),
            "&amp;&lt;&gt;&quot;&apos;"
        );
    }

    #[test]
    fn test_numeric_references_untouched() {
        assert_eq!(convert_html_entities("&#39;&#x27;"), "&#39;&#x27;");
    }

    #[test]
    fn test_escape_bare_ampersands() {
        assert_eq!(escape_bare_ampersands("AT&T"), "AT&amp;T");
        assert_eq!(escape_bare_ampersands("a && b"), "a &amp;&amp; b");
        assert_eq!(escape_bare_ampersands("fish & chips &"), "fish &amp; chips &amp;");
        assert_eq!(escape_bare_ampersands("&#; &#x; &1;"), "&amp;#; &amp;#x; &amp;1;");
    }

    #[test]
    fn test_escape_keeps_references() {
        let text = "&amp;&lt;&unknown;&#39;&#x1F600;&#X27;";
        assert_eq!(escape_bare_ampersands(text), text);
    }

    #[test]
    fn test_escape_skips_cdata() {
        assert_eq!(
            escape_bare_ampersands("a & <![CDATA[b && c]]> & d"),
            "a &amp; <![CDATA[b && c]]> &amp; d"
        );
    }
}
