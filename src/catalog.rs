use anyhow::{Context, Result, anyhow};
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::constants::constants;

/// A single video entry from the catalog file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VideoRecord {
  pub id: u64,
  pub title: String,
  /// Display string. Catalogs written by hand sometimes carry a bare number here.
  #[serde(deserialize_with = "views_as_string")]
  pub views: String,
  pub category: String,
  #[serde(default)]
  pub hashtags: Vec<String>,
  pub thumbnail: String,
  pub video_url: String,
  /// Opaque slug used as the detail-view key.
  pub video_page: String,
}

impl VideoRecord {
  /// Category match used by filtering: case-insensitive, display case untouched.
  pub fn in_category(&self, name: &str) -> bool {
    self.category.to_lowercase() == name.to_lowercase()
  }

  pub fn has_hashtag(&self, tag: &str) -> bool {
    self.hashtags.iter().any(|t| t == tag)
  }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ViewCount {
  Text(String),
  Number(u64),
}

fn views_as_string<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
  Ok(match ViewCount::deserialize(deserializer)? {
    ViewCount::Text(s) => s,
    ViewCount::Number(n) => n.to_string(),
  })
}

#[derive(Deserialize)]
struct CatalogFile {
  videos: Vec<VideoRecord>,
}

/// The in-memory catalog, ordered most-recent-first (descending `id`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
  videos: Vec<VideoRecord>,
}

impl Catalog {
  pub fn new(mut videos: Vec<VideoRecord>) -> Self {
    videos.sort_by(|a, b| b.id.cmp(&a.id));
    warn_on_duplicates(&videos);
    Self { videos }
  }

  pub fn from_json(body: &str) -> Result<Self> {
    let file: CatalogFile = serde_json::from_str(body).context("Catalog is not a valid video list")?;
    Ok(Self::new(file.videos))
  }

  pub fn videos(&self) -> &[VideoRecord] {
    &self.videos
  }

  pub fn len(&self) -> usize {
    self.videos.len()
  }

  pub fn is_empty(&self) -> bool {
    self.videos.is_empty()
  }

  pub fn by_category(&self, name: &str) -> Vec<&VideoRecord> {
    self.videos.iter().filter(|v| v.in_category(name)).collect()
  }

  pub fn by_hashtag(&self, tag: &str) -> Vec<&VideoRecord> {
    self.videos.iter().filter(|v| v.has_hashtag(tag)).collect()
  }

  pub fn find_by_slug(&self, slug: &str) -> Option<&VideoRecord> {
    self.videos.iter().find(|v| v.video_page == slug)
  }
}

/// Duplicate ids or slugs make detail lookups ambiguous; the first (highest id) entry wins.
fn warn_on_duplicates(videos: &[VideoRecord]) {
  let mut ids = HashSet::new();
  let mut slugs = HashSet::new();
  for video in videos {
    if !ids.insert(video.id) {
      warn!(id = video.id, "catalog: duplicate video id");
    }
    if !slugs.insert(video.video_page.as_str()) {
      warn!(slug = %video.video_page, "catalog: duplicate video_page slug");
    }
  }
}

// --- Loading ---

/// Where the catalog comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
  Remote(String),
  Local(PathBuf),
}

impl CatalogSource {
  pub fn parse(input: &str) -> Self {
    let trimmed = input.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
      CatalogSource::Remote(trimmed.to_string())
    } else {
      CatalogSource::Local(PathBuf::from(trimmed))
    }
  }
}

impl fmt::Display for CatalogSource {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      CatalogSource::Remote(url) => write!(f, "{}", url),
      CatalogSource::Local(path) => write!(f, "{}", path.display()),
    }
  }
}

/// Append the cache-defeating timestamp parameter to a catalog URL.
pub fn cache_busted_url(url: &str, stamp: i64) -> String {
  let sep = if url.contains('?') { '&' } else { '?' };
  format!("{}{}{}={}", url, sep, constants().cache_bust_param, stamp)
}

/// Fetch or read the catalog and parse it. One attempt, no retries.
pub async fn load_catalog(client: &Client, source: &CatalogSource) -> Result<Catalog> {
  let body = match source {
    CatalogSource::Remote(url) => fetch_remote(client, url).await?,
    CatalogSource::Local(path) => tokio::fs::read_to_string(path)
      .await
      .with_context(|| format!("Failed to read catalog file {}", path.display()))?,
  };
  let catalog = Catalog::from_json(&body).with_context(|| format!("Failed to parse catalog from {}", source))?;
  info!(source = %source, videos = catalog.len(), "catalog loaded");
  Ok(catalog)
}

async fn fetch_remote(client: &Client, url: &str) -> Result<String> {
  let url = cache_busted_url(url, chrono::Utc::now().timestamp_millis());
  debug!(url = %url, "catalog: fetching");
  let response = client.get(&url).send().await.with_context(|| format!("Failed to request catalog {}", url))?;
  let status = response.status();
  if !status.is_success() {
    return Err(anyhow!("catalog request failed: HTTP {}", status.as_u16()));
  }
  response.text().await.with_context(|| format!("Failed to read catalog body from {}", url))
}


#[cfg(test)]
mod tests {
  use super::fixtures::record;
  use super::*;
  use std::io::Write;
  use tokio::io::{AsyncReadExt, AsyncWriteExt};
  use tokio::net::TcpListener;

  const SAMPLE: &str = r#"{
    "videos": [
      {"id": 2, "title": "Beat", "views": "1.2M", "category": "Music", "hashtags": ["fun", "Live"],
       "thumbnail": "b.jpg", "video_url": "b.mp4", "video_page": "beat"},
      {"id": 7, "title": "Goal", "views": 5300, "category": "Sports",
       "thumbnail": "g.jpg", "video_url": "g.mp4", "video_page": "goal"},
      {"id": 4, "title": "Riff", "views": "800", "category": "music", "hashtags": ["Fun"],
       "thumbnail": "r.jpg", "video_url": "r.mp4", "video_page": "riff"}
    ]
  }"#;

  #[test]
  fn parses_and_sorts_by_id_descending() {
    let catalog = Catalog::from_json(SAMPLE).unwrap();
    let ids: Vec<u64> = catalog.videos().iter().map(|v| v.id).collect();
    assert_eq!(ids, vec![7, 4, 2]);
  }

  #[test]
  fn numeric_views_become_strings_and_hashtags_default_empty() {
    let catalog = Catalog::from_json(SAMPLE).unwrap();
    let goal = catalog.find_by_slug("goal").unwrap();
    assert_eq!(goal.views, "5300");
    assert!(goal.hashtags.is_empty());
  }

  #[test]
  fn rejects_documents_without_videos() {
    assert!(Catalog::from_json(r#"{"items": []}"#).is_err());
    assert!(Catalog::from_json("not json").is_err());
  }

  #[test]
  fn category_filter_is_case_insensitive() {
    let catalog = Catalog::from_json(SAMPLE).unwrap();
    let upper: Vec<u64> = catalog.by_category("Music").iter().map(|v| v.id).collect();
    let lower: Vec<u64> = catalog.by_category("music").iter().map(|v| v.id).collect();
    assert_eq!(upper, vec![4, 2]);
    assert_eq!(upper, lower);
  }

  #[test]
  fn hashtag_filter_is_exact() {
    let catalog = Catalog::from_json(SAMPLE).unwrap();
    let fun: Vec<&str> = catalog.by_hashtag("fun").iter().map(|v| v.video_page.as_str()).collect();
    assert_eq!(fun, vec!["beat"]);
    assert!(catalog.by_hashtag("live").is_empty());
  }

  #[test]
  fn slug_lookup_is_exact() {
    let catalog = Catalog::new(vec![record(1, "A", &[])]);
    assert!(catalog.find_by_slug("video-1").is_some());
    assert!(catalog.find_by_slug("Video-1").is_none());
  }

  #[test]
  fn source_parse_distinguishes_urls_from_paths() {
    assert_eq!(
      CatalogSource::parse("https://example.com/videos.json"),
      CatalogSource::Remote("https://example.com/videos.json".to_string())
    );
    assert_eq!(CatalogSource::parse("data/videos.json"), CatalogSource::Local(PathBuf::from("data/videos.json")));
  }

  #[test]
  fn cache_bust_uses_correct_separator() {
    assert_eq!(cache_busted_url("https://x.io/videos.json", 42), "https://x.io/videos.json?t=42");
    assert_eq!(cache_busted_url("https://x.io/videos.json?v=2", 42), "https://x.io/videos.json?v=2&t=42");
  }

  #[tokio::test]
  async fn loads_local_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SAMPLE.as_bytes()).unwrap();
    let source = CatalogSource::Local(file.path().to_path_buf());
    let catalog = load_catalog(&Client::new(), &source).await.unwrap();
    assert_eq!(catalog.len(), 3);
  }

  #[tokio::test]
  async fn missing_local_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let source = CatalogSource::Local(dir.path().join("nope.json"));
    let err = load_catalog(&Client::new(), &source).await.unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to read catalog file"));
  }

  /// Serve one canned HTTP response and hand back the request line.
  async fn serve_once(status: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
      let (mut socket, _) = listener.accept().await.unwrap();
      let mut buf = vec![0u8; 4096];
      let n = socket.read(&mut buf).await.unwrap();
      let request = String::from_utf8_lossy(&buf[..n]).to_string();
      let response = format!(
        "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
      );
      socket.write_all(response.as_bytes()).await.unwrap();
      socket.shutdown().await.ok();
      request.lines().next().unwrap_or_default().to_string()
    });
    (format!("http://{}/videos.json", addr), handle)
  }

  #[tokio::test]
  async fn remote_fetch_appends_cache_buster() {
    let (url, server) = serve_once("200 OK", r#"{"videos": []}"#).await;
    let catalog = load_catalog(&Client::new(), &CatalogSource::Remote(url)).await.unwrap();
    assert!(catalog.is_empty());
    let request_line = server.await.unwrap();
    assert!(request_line.starts_with("GET /videos.json?t="), "{}", request_line);
  }

  #[tokio::test]
  async fn refused_connection_is_an_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let source = CatalogSource::Remote(format!("http://{}/videos.json", addr));
    let err = load_catalog(&Client::new(), &source).await.unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to request catalog"), "{:#}", err);
  }

  #[tokio::test]
  async fn remote_non_success_is_an_error() {
    let (url, server) = serve_once("404 Not Found", "{}").await;
    let err = load_catalog(&Client::new(), &CatalogSource::Remote(url)).await.unwrap_err();
    assert!(err.to_string().contains("HTTP 404"));
    server.await.unwrap();
  }
}
