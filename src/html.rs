//! HTML serialization of a rendered [`Document`].
//!
//! Each region goes into a container with a stable id (`categoryNav`,
//! `hashtagNav`, `videoContainer`, `pagination`, `videoPage`, `relatedVideos`)
//! so a static shell can inject the fragments. Hidden regions carry the
//! `hidden` class.

use crate::listing::PageControl;
use crate::taxonomy::NavLink;
use crate::view::{Card, DetailView, Document, MainContent, RelatedPanel, messages};

/// Rendered markup per container id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragments {
  pub category_nav: String,
  pub hashtag_nav: String,
  pub video_container: String,
  pub video_container_hidden: bool,
  pub pagination: String,
  pub video_page: String,
  pub video_page_hidden: bool,
  pub related_videos: String,
  pub related_hidden: bool,
}

impl Fragments {
  pub fn from_document(doc: &Document) -> Self {
    let mut out = Self {
      category_nav: render_links(&doc.navigation.categories, " "),
      hashtag_nav: render_links(&doc.navigation.hashtags, " "),
      pagination: render_pagination(&doc.pagination),
      video_container_hidden: true,
      video_page_hidden: true,
      ..Self::default()
    };

    match &doc.main {
      MainContent::Loading => out.show_container(message("status", messages::LOADING)),
      MainContent::LoadError(_) => out.show_container(message("error", messages::LOAD_ERROR)),
      MainContent::NoResults => out.show_container(message("empty", messages::NO_RESULTS)),
      MainContent::Invalid => out.show_container(message("error", messages::INVALID)),
      MainContent::Grid(cards) => out.show_container(cards.iter().map(render_card).collect()),
      MainContent::NotFound(_) => out.show_page(format!(
        r#"<div id="videoPlayer">{}</div>"#,
        message("error", messages::NOT_FOUND)
      )),
      MainContent::Detail(detail) => out.show_page(render_detail(detail)),
    }

    let (related, hidden) = render_related(&doc.related);
    out.related_videos = related;
    out.related_hidden = hidden;
    out
  }

  fn show_container(&mut self, html: String) {
    self.video_container = html;
    self.video_container_hidden = false;
  }

  fn show_page(&mut self, html: String) {
    self.video_page = html;
    self.video_page_hidden = false;
  }

  /// Every region wrapped in its container element.
  pub fn to_regions(&self) -> String {
    [
      region("nav", "categoryNav", "categories", false, &self.category_nav),
      region("nav", "hashtagNav", "hashtags", false, &self.hashtag_nav),
      region("div", "videoContainer", "grid", self.video_container_hidden, &self.video_container),
      region("nav", "pagination", "pagination", false, &self.pagination),
      region("section", "videoPage", "video-page", self.video_page_hidden, &self.video_page),
      region("section", "relatedVideos", "related", self.related_hidden, &self.related_videos),
    ]
    .join("\n")
  }
}

/// A standalone HTML5 page for the document.
pub fn render_page(doc: &Document) -> String {
  let fragments = Fragments::from_document(doc);
  format!(
    r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{title}</title>
</head>
<body>
<header><a href="?type=home">Home</a></header>
<main>
{regions}
</main>
</body>
</html>
"#,
    title = escape_html(&doc.title),
    regions = fragments.to_regions(),
  )
}

/// Escape HTML special characters for text and attribute values.
pub fn escape_html(s: &str) -> String {
  s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;").replace('\'', "&#39;")
}

fn region(tag: &str, id: &str, class: &str, hidden: bool, body: &str) -> String {
  let class = if hidden { format!("{} hidden", class) } else { class.to_string() };
  format!(r#"<{tag} id="{id}" class="{class}">{body}</{tag}>"#)
}

fn message(class: &str, text: &str) -> String {
  format!(r#"<p class="{}">{}</p>"#, class, escape_html(text))
}

fn render_links(links: &[NavLink], sep: &str) -> String {
  links
    .iter()
    .map(|l| format!(r#"<a href="{}">{}</a>"#, escape_html(&l.href()), escape_html(&l.label)))
    .collect::<Vec<_>>()
    .join(sep)
}

fn render_card(card: &Card) -> String {
  format!(
    r#"<div class="card"><a href="{href}"><img src="{thumb}" alt="{title}" loading="lazy"><h3>{title}</h3><p class="views">{views} views</p></a></div>"#,
    href = escape_html(&card.href()),
    thumb = escape_html(&card.thumbnail),
    title = escape_html(&card.title),
    views = escape_html(&card.views),
  )
}

fn render_pagination(controls: &[PageControl]) -> String {
  controls
    .iter()
    .map(|c| match &c.href {
      None => format!(r#"<span class="page current" aria-current="page">{}</span>"#, c.number),
      Some(href) => format!(r#"<a class="page" href="{}">{}</a>"#, escape_html(href), c.number),
    })
    .collect()
}

fn render_detail(detail: &DetailView) -> String {
  // `onerror` on <source> fires when the media cannot be loaded; only the player region is replaced.
  let player = format!(
    r#"<div id="videoPlayer"><video controls preload="metadata"><source src="{src}" type="{mime}" onerror="this.closest('#videoPlayer').innerHTML='&lt;p class=&quot;error&quot;&gt;{err}&lt;/p&gt;'">Your browser does not support the video tag.</video></div>"#,
    src = escape_html(&detail.video_url),
    mime = media_type(&detail.video_url),
    err = escape_html(messages::MEDIA_ERROR),
  );
  format!(
    r#"{player}<h1 id="videoTitle">{title}</h1><p id="videoViews">{views} views</p><p id="videoCategory">{category}</p><p id="videoHashtags">{hashtags}</p>"#,
    title = escape_html(&detail.title),
    views = escape_html(&detail.views),
    category = render_links(std::slice::from_ref(&detail.category), ""),
    hashtags = render_links(&detail.hashtags, " "),
  )
}

fn render_related(panel: &RelatedPanel) -> (String, bool) {
  match panel {
    RelatedPanel::Hidden => (String::new(), true),
    RelatedPanel::Empty => (message("empty", messages::NO_RELATED), false),
    RelatedPanel::Cards(cards) => (cards.iter().map(render_card).collect(), false),
  }
}

/// `type` attribute for the <source> element, from the media URL's extension.
fn media_type(url: &str) -> &'static str {
  let path = url.split(['?', '#']).next().unwrap_or(url);
  let ext = path.rsplit_once('.').map(|(_, e)| e.to_ascii_lowercase()).unwrap_or_default();
  match ext.as_str() {
    "webm" => "video/webm",
    "ogv" | "ogg" => "video/ogg",
    "m3u8" => "application/vnd.apple.mpegurl",
    "mov" => "video/quicktime",
    _ => "video/mp4",
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::Catalog;
  use crate::catalog::fixtures::{catalog_of, record};
  use crate::router::ViewState;
  use crate::view::{CatalogState, Settings, render};

  fn page_for(query: &str, catalog: Catalog) -> String {
    let settings = Settings { page_size: 10, related_limit: 4 };
    render_page(&render(&ViewState::from_query(query), &CatalogState::Ready(catalog), &settings))
  }

  #[test]
  fn escapes_special_characters() {
    assert_eq!(escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#), "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;");
    assert_eq!(escape_html("plain"), "plain");
  }

  #[test]
  fn grid_page_has_cards_and_pagination() {
    let html = page_for("?page=2", catalog_of(12, "Music"));
    assert!(html.contains(r#"<div id="videoContainer" class="grid">"#));
    assert!(html.contains(r#"href="?type=video&amp;path=video-2""#));
    assert!(html.contains(r#"<a class="page" href="?type=home">1</a>"#));
    assert!(html.contains(r#"<span class="page current" aria-current="page">2</span>"#));
    assert!(html.contains(r#"<section id="videoPage" class="video-page hidden">"#));
    assert!(html.contains(r#"<section id="relatedVideos" class="related hidden">"#));
  }

  #[test]
  fn titles_are_escaped_in_cards() {
    let mut video = record(1, "Music", &[]);
    video.title = "<script>alert(1)</script>".to_string();
    let html = page_for("", Catalog::new(vec![video]));
    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
  }

  #[test]
  fn empty_category_shows_message_and_no_pagination() {
    let html = page_for("type=category&name=sports", catalog_of(3, "Music"));
    assert!(html.contains(messages::NO_RESULTS));
    assert!(html.contains(r#"<nav id="pagination" class="pagination"></nav>"#));
  }

  #[test]
  fn detail_page_has_player_with_inline_error_handler() {
    let html = page_for("type=video&path=video-1", catalog_of(2, "Music"));
    assert!(html.contains(
      r#"<source src="https://cdn.example/media/1.mp4" type="video/mp4" onerror="this.closest('#videoPlayer')"#
    ));
    assert!(!html.contains("<video controls preload=\"metadata\" onerror"));
    assert!(html.contains(r#"<p id="videoViews">1K views</p>"#));
    assert!(html.contains(r#"<a href="?type=category&amp;name=Music">Music</a>"#));
    assert!(html.contains(r#"<div id="videoContainer" class="grid hidden">"#));
    assert!(html.contains(r#"<section id="relatedVideos" class="related">"#));
  }

  #[test]
  fn missing_video_hides_related() {
    let html = page_for("type=video&path=missing-slug", catalog_of(2, "Music"));
    assert!(html.contains(&escape_html(messages::NOT_FOUND)));
    assert!(html.contains(r#"<section id="relatedVideos" class="related hidden"></section>"#));
  }

  #[test]
  fn load_error_replaces_everything() {
    let doc = render(&ViewState::home(), &CatalogState::Failed("boom".into()), &Settings::default());
    let fragments = Fragments::from_document(&doc);
    assert!(fragments.video_container.contains(messages::LOAD_ERROR));
    assert!(fragments.category_nav.is_empty());
    assert!(fragments.hashtag_nav.is_empty());
    assert!(fragments.pagination.is_empty());
    assert!(fragments.video_page_hidden && fragments.related_hidden);
  }

  #[test]
  fn media_type_from_extension() {
    assert_eq!(media_type("https://x/a.webm?sig=1"), "video/webm");
    assert_eq!(media_type("https://x/a.MP4"), "video/mp4");
    assert_eq!(media_type("https://x/stream"), "video/mp4");
  }
}
