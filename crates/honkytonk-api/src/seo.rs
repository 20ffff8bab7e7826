//! SPA shell with per-route metadata.
//!
//! When `SPA_INDEX_PATH` is set, every GET that no API route claims is answered with the
//! frontend's `index.html`, with `<title>`, description, canonical link, Open Graph and
//! Twitter tags rewritten for the requested path. Crawlers that do not run JavaScript
//! still see a meaningful preview. Every injected value is HTML-escaped.

use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, Method, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};
use honkytonk_core::models::Video;
use honkytonk_sources::html::summarize;
use regex::Regex;
use std::path::Path;
use std::sync::{Arc, LazyLock};

const DESCRIPTION_MAX_CHARS: usize = 160;

static TITLE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title\b[^>]*>.*?</title\s*>").expect("valid regex"));
static MANAGED_META: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<meta\s+[^>]*(name|property)\s*=\s*["'](description|og:[a-z_:]+|twitter:[a-z_:]+)["'][^>]*>|<link\s+[^>]*rel\s*=\s*["']canonical["'][^>]*>"#,
    )
    .expect("valid regex")
});

/// Metadata for one rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub canonical_url: String,
    pub image: Option<String>,
    /// Open Graph type (`website`, `video.other`)
    pub og_type: &'static str,
}

/// The frontend's `index.html` plus the site identity used to fill in metadata.
#[derive(Debug, Clone)]
pub struct SeoShell {
    template: String,
    site_name: String,
    site_url: String,
}

impl SeoShell {
    pub fn new(
        template: impl Into<String>,
        site_name: impl Into<String>,
        site_url: impl Into<String>,
    ) -> Self {
        Self {
            template: template.into(),
            site_name: site_name.into(),
            site_url: site_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn load(
        index_path: impl AsRef<Path>,
        site_name: &str,
        site_url: &str,
    ) -> Result<Self, anyhow::Error> {
        let path = index_path.as_ref();
        let template = std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read SPA index at {}: {}", path.display(), e)
        })?;
        Ok(Self::new(template, site_name, site_url))
    }

    fn canonical(&self, path: &str) -> String {
        let trimmed = path.trim_end_matches('/');
        if trimmed.is_empty() {
            format!("{}/", self.site_url)
        } else {
            format!("{}{}", self.site_url, trimmed)
        }
    }

    fn page(&self, path: &str, title: Option<&str>, description: String) -> PageMeta {
        PageMeta {
            title: match title {
                Some(title) => format!("{} | {}", title, self.site_name),
                None => self.site_name.clone(),
            },
            description,
            canonical_url: self.canonical(path),
            image: None,
            og_type: "website",
        }
    }

    /// Metadata for `path`. `video` is the stored video when `path` is a video page.
    pub fn meta_for_path(&self, path: &str, video: Option<&Video>) -> PageMeta {
        let normalized = path.trim_end_matches('/');
        let site = &self.site_name;

        match normalized {
            "" => self.page(
                path,
                None,
                format!(
                    "{} brings together the latest country music videos, the country charts and news.",
                    site
                ),
            ),
            "/videos" => self.page(
                path,
                Some("Country Music Videos"),
                "The newest videos from country artists, labels and media channels.".to_string(),
            ),
            "/charts" => self.page(
                path,
                Some("Country Charts"),
                "This week's country singles chart, with last week, peak and weeks on chart."
                    .to_string(),
            ),
            "/top-30" => self.page(
                path,
                Some("Top 30 Country Songs"),
                "The current Top 30 country songs.".to_string(),
            ),
            "/news" => self.page(
                path,
                Some("Country Music News"),
                "Country music news from around the web.".to_string(),
            ),
            _ => match (video_id_from_path(normalized), video) {
                (Some(_), Some(video)) => self.video_page(path, video),
                (Some(_), None) => self.meta_for_path("/videos", None),
                _ => self.page(
                    path,
                    None,
                    format!("Country music videos, charts and news on {}.", site),
                ),
            },
        }
    }

    fn video_page(&self, path: &str, video: &Video) -> PageMeta {
        let description = video
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(|d| summarize(d, DESCRIPTION_MAX_CHARS))
            .unwrap_or_else(|| {
                format!(
                    "Watch {} from {} on {}.",
                    video.title, video.channel_name, self.site_name
                )
            });

        PageMeta {
            image: video.thumbnail_url.clone(),
            og_type: "video.other",
            ..self.page(path, Some(&video.title), description)
        }
    }

    /// The template with its title and managed tags replaced by `meta`.
    pub fn render(&self, meta: &PageMeta) -> String {
        let without_title = TITLE_TAG.replace_all(&self.template, "");
        let stripped = MANAGED_META.replace_all(&without_title, "");
        let head = head_tags(meta, &self.site_name);

        match stripped.find("</head>") {
            Some(idx) => format!("{}{}{}", &stripped[..idx], head, &stripped[idx..]),
            None => format!("{}{}", head, stripped),
        }
    }
}

fn head_tags(meta: &PageMeta, site_name: &str) -> String {
    let title = escape_html(&meta.title);
    let description = escape_html(&meta.description);
    let canonical = escape_html(&meta.canonical_url);
    let site_name = escape_html(site_name);

    let mut tags = vec![
        format!("<title>{}</title>", title),
        format!(r#"<meta name="description" content="{}">"#, description),
        format!(r#"<link rel="canonical" href="{}">"#, canonical),
        format!(r#"<meta property="og:site_name" content="{}">"#, site_name),
        format!(r#"<meta property="og:type" content="{}">"#, meta.og_type),
        format!(r#"<meta property="og:title" content="{}">"#, title),
        format!(r#"<meta property="og:description" content="{}">"#, description),
        format!(r#"<meta property="og:url" content="{}">"#, canonical),
    ];

    let card = match &meta.image {
        Some(image) => {
            let image = escape_html(image);
            tags.push(format!(r#"<meta property="og:image" content="{}">"#, image));
            tags.push(format!(r#"<meta name="twitter:image" content="{}">"#, image));
            "summary_large_image"
        }
        None => "summary",
    };
    tags.push(format!(r#"<meta name="twitter:card" content="{}">"#, card));
    tags.push(format!(r#"<meta name="twitter:title" content="{}">"#, title));
    tags.push(format!(
        r#"<meta name="twitter:description" content="{}">"#,
        description
    ));

    tags.join("\n    ") + "\n  "
}

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// `dQw4w9WgXcQ` for `/videos/dQw4w9WgXcQ`.
pub fn video_id_from_path(path: &str) -> Option<&str> {
    let id = path.trim_end_matches('/').strip_prefix("/videos/")?;
    let valid = !id.is_empty()
        && id.len() <= 64
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    valid.then_some(id)
}

fn is_asset_path(path: &str) -> bool {
    path.rsplit('/')
        .next()
        .is_some_and(|segment| segment.contains('.'))
}

/// Fallback handler: the SPA shell for page routes, 404 for everything else.
pub async fn spa_fallback(State(state): State<Arc<AppState>>, method: Method, uri: Uri) -> Response {
    let path = uri.path();
    let Some(shell) = state.seo.as_ref() else {
        return StatusCode::NOT_FOUND.into_response();
    };
    if method != Method::GET || path.starts_with("/api/") || is_asset_path(path) {
        return StatusCode::NOT_FOUND.into_response();
    }

    let video = match video_id_from_path(path) {
        Some(video_id) => match state.repos.videos.get_by_video_id(video_id).await {
            Ok(video) => video,
            Err(e) => {
                tracing::warn!(error = %e, video_id = %video_id, "Video lookup for page metadata failed");
                None
            }
        },
        None => None,
    };

    let meta = shell.meta_for_path(path, video.as_ref());
    (
        [(header::CACHE_CONTROL, "no-cache")],
        Html(shell.render(&meta)),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    const TEMPLATE: &str = r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="UTF-8" />
    <title>Vite App</title>
    <meta name="description" content="placeholder" />
    <meta property="og:title" content="placeholder" />
    <script type="module" src="/assets/index.js"></script>
  </head>
  <body><div id="root"></div></body>
</html>"#;

    fn shell() -> SeoShell {
        SeoShell::new(TEMPLATE, "Honkytonk Hub", "https://honkytonkhub.example/")
    }

    fn video(description: Option<&str>) -> Video {
        Video {
            id: Uuid::new_v4(),
            video_id: "abc123XYZ_-".to_string(),
            channel_id: "UCvn_XCl_mgQmt3sD753zdJA".to_string(),
            channel_name: "Zach Bryan".to_string(),
            title: "Pink Skies <Live> & \"Acoustic\"".to_string(),
            description: description.map(String::from),
            thumbnail_url: Some("https://i.ytimg.com/vi/abc123XYZ_-/hqdefault.jpg".to_string()),
            published_at: Utc::now(),
            view_count: Some(1200),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<script>"x" & 'y'</script>"#),
            "&lt;script&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/script&gt;"
        );
    }

    #[test]
    fn test_video_id_from_path() {
        assert_eq!(video_id_from_path("/videos/abc123XYZ_-"), Some("abc123XYZ_-"));
        assert_eq!(video_id_from_path("/videos/abc123/"), Some("abc123"));
        assert_eq!(video_id_from_path("/videos/"), None);
        assert_eq!(video_id_from_path("/videos/a b"), None);
        assert_eq!(video_id_from_path("/news"), None);
    }

    #[test]
    fn test_static_routes() {
        let shell = shell();
        let home = shell.meta_for_path("/", None);
        assert_eq!(home.title, "Honkytonk Hub");
        assert_eq!(home.canonical_url, "https://honkytonkhub.example/");

        let charts = shell.meta_for_path("/charts/", None);
        assert_eq!(charts.title, "Country Charts | Honkytonk Hub");
        assert_eq!(charts.canonical_url, "https://honkytonkhub.example/charts");

        let top30 = shell.meta_for_path("/top-30", None);
        assert_eq!(top30.title, "Top 30 Country Songs | Honkytonk Hub");

        let other = shell.meta_for_path("/about", None);
        assert_eq!(other.title, "Honkytonk Hub");
        assert_eq!(other.canonical_url, "https://honkytonkhub.example/about");
    }

    #[test]
    fn test_video_page_uses_stored_video() {
        let video = video(None);
        let meta = shell().meta_for_path("/videos/abc123XYZ_-", Some(&video));
        assert_eq!(meta.og_type, "video.other");
        assert!(meta.title.starts_with("Pink Skies"));
        assert_eq!(meta.image, video.thumbnail_url);
        assert!(meta.description.contains("Zach Bryan"));
        assert_eq!(
            meta.canonical_url,
            "https://honkytonkhub.example/videos/abc123XYZ_-"
        );
    }

    #[test]
    fn test_unknown_video_falls_back_to_videos_page() {
        let meta = shell().meta_for_path("/videos/missing", None);
        assert_eq!(meta.title, "Country Music Videos | Honkytonk Hub");
    }

    #[test]
    fn test_long_video_description_is_shortened() {
        let long = "Fiddles and steel guitar ".repeat(20);
        let video = video(Some(&long));
        let meta = shell().meta_for_path("/videos/abc123XYZ_-", Some(&video));
        assert!(meta.description.chars().count() <= DESCRIPTION_MAX_CHARS + 1);
        assert!(meta.description.ends_with('…'));
    }

    #[test]
    fn test_render_replaces_managed_tags_and_escapes() {
        let shell = shell();
        let video = video(None);
        let html = shell.render(&shell.meta_for_path("/videos/abc123XYZ_-", Some(&video)));

        assert!(!html.contains("Vite App"));
        assert!(!html.contains("placeholder"));
        assert!(html.contains(
            "<title>Pink Skies &lt;Live&gt; &amp; &quot;Acoustic&quot; | Honkytonk Hub</title>"
        ));
        assert!(html.contains(r#"<meta name="twitter:card" content="summary_large_image">"#));
        assert!(html.contains(r#"<link rel="canonical" href="https://honkytonkhub.example/videos/abc123XYZ_-">"#));
        assert!(html.contains(r#"<script type="module" src="/assets/index.js"></script>"#));
        assert_eq!(html.matches("<title>").count(), 1);

        let head_end = html.find("</head>").unwrap();
        assert!(html.find("og:image").unwrap() < head_end);
    }

    #[test]
    fn test_render_without_head_prepends_tags() {
        let shell = SeoShell::new("<div id=\"root\"></div>", "Hub", "https://hub.example");
        let html = shell.render(&shell.meta_for_path("/news", None));
        assert!(html.starts_with("<title>Country Music News | Hub</title>"));
        assert!(html.ends_with("<div id=\"root\"></div>"));
    }

    #[test]
    fn test_asset_paths_are_not_pages() {
        assert!(is_asset_path("/assets/index-3f2a.js"));
        assert!(is_asset_path("/favicon.ico"));
        assert!(!is_asset_path("/videos/abc123"));
    }
}
