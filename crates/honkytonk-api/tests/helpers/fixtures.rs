//! Canned upstream payloads and seed rows.

use chrono::{DateTime, Duration, Utc};
use honkytonk_core::models::{NewNewsArticle, NewVideo};
use serde_json::{json, Value};

pub const CHANNEL_ID: &str = "UCvn_XCl_mgQmt3sD753zdJA";
pub const OTHER_CHANNEL_ID: &str = "UCtB4bD8sIh3U3YELcLwBzdA";

/// A YouTube channel feed with the given `(video_id, title)` entries, newest first.
pub fn channel_feed(channel_name: &str, videos: &[(&str, &str)]) -> String {
    let entries: String = videos
        .iter()
        .enumerate()
        .map(|(i, (video_id, title))| {
            let published = (Utc::now() - Duration::hours(i as i64 + 1)).to_rfc3339();
            format!(
                r#" <entry>
  <id>yt:video:{id}</id>
  <yt:videoId>{id}</yt:videoId>
  <title>{title}</title>
  <link rel="alternate" href="https://www.youtube.com/watch?v={id}"/>
  <published>{published}</published>
  <media:group>
   <media:title>{title}</media:title>
   <media:thumbnail url="https://i2.ytimg.com/vi/{id}/hqdefault.jpg" width="480" height="360"/>
   <media:description>{title}</media:description>
   <media:community><media:statistics views="{views}"/></media:community>
  </media:group>
 </entry>
"#,
                id = video_id,
                title = title,
                published = published,
                views = 1000 * (i + 1),
            )
        })
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns:yt="http://www.youtube.com/xml/schemas/2015" xmlns:media="http://search.yahoo.com/mrss/" xmlns="http://www.w3.org/2005/Atom">
 <title>{}</title>
{}</feed>"#,
        channel_name, entries
    )
}

pub fn new_video(video_id: &str, title: &str, channel_id: &str, published_at: DateTime<Utc>) -> NewVideo {
    NewVideo {
        video_id: video_id.to_string(),
        channel_id: channel_id.to_string(),
        channel_name: "Lainey Wilson".to_string(),
        title: title.to_string(),
        description: Some(format!("{} (Official Video)", title)),
        thumbnail_url: Some(format!("https://i.ytimg.com/vi/{}/hqdefault.jpg", video_id)),
        published_at,
        view_count: Some(5000),
    }
}

pub fn new_article(url: &str, title: &str, source: &str, published_at: DateTime<Utc>) -> NewNewsArticle {
    NewNewsArticle {
        url: url.to_string(),
        title: title.to_string(),
        summary: Some("Nashville news.".to_string()),
        image_url: None,
        source: source.to_string(),
        published_at: Some(published_at),
    }
}

/// An RSS 2.0 news feed with `(url, title, published_at)` items.
pub fn news_feed(title: &str, items: &[(&str, &str, DateTime<Utc>)]) -> String {
    let items: String = items
        .iter()
        .map(|(url, item_title, published_at)| {
            format!(
                r#"  <item>
   <title>{title}</title>
   <link>{url}</link>
   <guid>{url}</guid>
   <pubDate>{published}</pubDate>
   <description>&lt;p&gt;{title} in Nashville.&lt;/p&gt;</description>
  </item>
"#,
                title = item_title,
                url = url,
                published = published_at.to_rfc2822(),
            )
        })
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
 <channel>
  <title>{}</title>
  <link>https://news.example</link>
  <description>Country music news</description>
{} </channel>
</rss>"#,
        title, items
    )
}

/// A chart page with some visible text for the reducer to keep.
pub const CHART_PAGE: &str = r#"<html><head><script>window.x = 1;</script></head>
<body><h1>Country Songs</h1><ol><li>1 I'm The Problem Morgan Wallen</li>
<li>2 Love Somebody Morgan Wallen</li><li>3 Just In Case Morgan Wallen</li></ol></body></html>"#;

/// A chat-completions response whose message content is `chart` serialized as JSON.
pub fn chart_completion(chart: Value) -> String {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": chart.to_string() },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 120, "completion_tokens": 80, "total_tokens": 200 }
    })
    .to_string()
}

pub const SPA_INDEX: &str = r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="UTF-8" />
    <title>Honkytonk Hub</title>
    <meta name="description" content="default" />
  </head>
  <body><div id="root"></div></body>
</html>"#;
