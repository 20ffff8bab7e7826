//! Regex-based HTML reduction. Good enough for feed summaries and for shrinking a chart page
//! before handing it to the LLM; not a general HTML parser.

use regex::Regex;
use std::sync::LazyLock;

static SCRIPT_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style|noscript|svg|template)\b[^>]*>.*?</(script|style|noscript|svg|template)\s*>")
        .expect("valid regex")
});
static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").expect("valid regex"));
static IMG_SRC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<img\b[^>]*?\bsrc\s*=\s*["']([^"']+)["']"#).expect("valid regex")
});

/// Strip markup and boil a page down to at most `max_chars` characters of visible text.
pub fn reduce_html(html: &str, max_chars: usize) -> String {
    truncate_chars(&strip_html(html), max_chars).to_string()
}

/// Remove non-visible blocks, comments and tags, decode entities and collapse whitespace.
pub fn strip_html(html: &str) -> String {
    let without_blocks = SCRIPT_BLOCK.replace_all(html, " ");
    let without_comments = COMMENT.replace_all(&without_blocks, " ");
    let without_tags = TAG.replace_all(&without_comments, " ");
    let decoded = decode_entities(&without_tags);
    WHITESPACE.replace_all(&decoded, " ").trim().to_string()
}

pub fn decode_entities(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &regex::Captures<'_>| {
            let entity = &caps[1];
            decode_entity(entity).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn decode_entity(entity: &str) -> Option<String> {
    if let Some(hex) = entity
        .strip_prefix("#x")
        .or_else(|| entity.strip_prefix("#X"))
    {
        return u32::from_str_radix(hex, 16)
            .ok()
            .and_then(char::from_u32)
            .map(String::from);
    }
    if let Some(dec) = entity.strip_prefix('#') {
        return dec.parse::<u32>().ok().and_then(char::from_u32).map(String::from);
    }
    let c = match entity {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => ' ',
        "rsquo" | "lsquo" => '\'',
        "ldquo" | "rdquo" => '"',
        "ndash" => '–',
        "mdash" => '—',
        "hellip" => '…',
        "copy" => '©',
        "reg" => '®',
        "trade" => '™',
        _ => return None,
    };
    Some(c.to_string())
}

/// Longest prefix of `text` with at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Shorten plain text to `max_chars`, cutting at the last word boundary and appending `…`.
pub fn summarize(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let head = truncate_chars(text, max_chars);
    let ends_on_word = text[head.len()..].starts_with(char::is_whitespace);
    let cut = match head.rfind(char::is_whitespace) {
        _ if ends_on_word => head,
        Some(idx) if idx > 0 => &head[..idx],
        _ => head,
    };
    let cut = cut.trim_end_matches(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | ':' | '-'));
    format!("{}…", cut)
}

/// `src` of the first `<img>` tag, if any.
pub fn first_img_src(html: &str) -> Option<String> {
    IMG_SRC
        .captures(html)
        .map(|caps| decode_entities(caps[1].trim()))
        .filter(|src| src.starts_with("http://") || src.starts_with("https://"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_html_removes_scripts_and_tags() {
        let html = r#"<html><head><style>.x{color:red}</style><script>var a = "<b>";</script></head>
            <body><!-- nav --><h1>Country&nbsp;Airplay</h1><p>Week of <b>May 4</b> &amp; more</p>
            <svg><path d="M0"/></svg></body></html>"#;
        assert_eq!(strip_html(html), "Country Airplay Week of May 4 & more");
    }

    #[test]
    fn test_decode_numeric_entities() {
        assert_eq!(decode_entities("Don&#39;t &#x2019;Bout It"), "Don't ’Bout It");
        assert_eq!(decode_entities("&unknown; stays"), "&unknown; stays");
    }

    #[test]
    fn test_reduce_html_truncates_on_char_boundary() {
        let html = "<p>Beyoncé Cowboy Carter</p>";
        assert_eq!(reduce_html(html, 7), "Beyoncé");
        assert_eq!(reduce_html(html, 1000), "Beyoncé Cowboy Carter");
    }

    #[test]
    fn test_summarize_cuts_at_word_boundary() {
        let text = "Luke Combs announced a stadium tour with special guests";
        let summary = summarize(text, 20);
        assert_eq!(summary, "Luke Combs announced…");
        assert!(summary.chars().count() <= 21);
        assert_eq!(summarize("short", 300), "short");
    }

    #[test]
    fn test_first_img_src() {
        let html = r#"<p>Hi</p><img class="a" src="https://cdn.example.com/a.jpg?w=1&amp;h=2"><img src="https://cdn.example.com/b.jpg">"#;
        assert_eq!(
            first_img_src(html),
            Some("https://cdn.example.com/a.jpg?w=1&h=2".to_string())
        );
        assert_eq!(first_img_src(r#"<img src="/relative.png">"#), None);
        assert_eq!(first_img_src("no images"), None);
    }
}
