//! Query-string routing.
//!
//! Every navigation produces a fresh, immutable [`ViewState`] from the query
//! string. Renderers only ever read it; moving to another page or view builds a
//! new one.

use std::fmt;
use tracing::debug;
use url::form_urlencoded;

/// Which view a query string asks for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ViewRequest {
  Home,
  Category(String),
  Hashtag(String),
  VideoDetail(String),
  Invalid,
}

impl fmt::Display for ViewRequest {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ViewRequest::Home => write!(f, "home"),
      ViewRequest::Category(name) => write!(f, "category:{}", name),
      ViewRequest::Hashtag(name) => write!(f, "hashtag:{}", name),
      ViewRequest::VideoDetail(slug) => write!(f, "video:{}", slug),
      ViewRequest::Invalid => write!(f, "invalid"),
    }
  }
}

/// A resolved view plus the requested page (always >= 1).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ViewState {
  pub request: ViewRequest,
  pub page: usize,
}

impl Default for ViewState {
  fn default() -> Self {
    Self::home()
  }
}

impl ViewState {
  pub fn new(request: ViewRequest, page: usize) -> Self {
    let page = if request.is_paginated() { page.max(1) } else { 1 };
    Self { request, page }
  }

  pub fn home() -> Self {
    Self { request: ViewRequest::Home, page: 1 }
  }

  pub fn category(name: &str) -> Self {
    Self::new(ViewRequest::Category(name.to_string()), 1)
  }

  pub fn hashtag(name: &str) -> Self {
    Self::new(ViewRequest::Hashtag(name.to_string()), 1)
  }

  pub fn video(slug: &str) -> Self {
    Self::new(ViewRequest::VideoDetail(slug.to_string()), 1)
  }

  /// Resolve a query string (leading `?` optional).
  pub fn from_query(query: &str) -> Self {
    let query = query.trim().trim_start_matches('?');
    let pairs: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes()).into_owned().collect();
    let get = |key: &str| pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str());
    let required = |key: &str| get(key).filter(|v| !v.is_empty()).map(str::to_string);

    let request = match get("type").filter(|t| !t.is_empty()) {
      None => legacy_request(get("video"), get("category")),
      Some("home") => ViewRequest::Home,
      Some("category") => required("name").map_or(ViewRequest::Invalid, ViewRequest::Category),
      Some("hashtag") => required("name").map_or(ViewRequest::Invalid, ViewRequest::Hashtag),
      Some("video") => required("path").map_or(ViewRequest::Invalid, ViewRequest::VideoDetail),
      Some(_) => ViewRequest::Invalid,
    };
    Self::new(request, parse_page(get("page")))
  }

  /// Canonical query string for this state; `from_query(to_query())` yields the same state.
  pub fn to_query(&self) -> String {
    let mut ser = form_urlencoded::Serializer::new(String::new());
    match &self.request {
      ViewRequest::Home => ser.append_pair("type", "home"),
      ViewRequest::Category(name) => ser.append_pair("type", "category").append_pair("name", name),
      ViewRequest::Hashtag(name) => ser.append_pair("type", "hashtag").append_pair("name", name),
      ViewRequest::VideoDetail(slug) => ser.append_pair("type", "video").append_pair("path", slug),
      ViewRequest::Invalid => ser.append_pair("type", "invalid"),
    };
    if self.page > 1 {
      ser.append_pair("page", &self.page.to_string());
    }
    ser.finish()
  }

  /// Relative link to this state, as used in rendered markup.
  pub fn href(&self) -> String {
    format!("?{}", self.to_query())
  }

  /// The same view at another page. Non-paginated views stay on page 1.
  pub fn with_page(&self, page: usize) -> Self {
    Self::new(self.request.clone(), page)
  }
}

impl ViewRequest {
  /// Only the home and category views honour `page`.
  pub fn is_paginated(&self) -> bool {
    matches!(self, ViewRequest::Home | ViewRequest::Category(_))
  }
}

/// Links written by the first gallery used `?video=<slug>` and `?category=<name>` without `type`.
fn legacy_request(video: Option<&str>, category: Option<&str>) -> ViewRequest {
  if let Some(slug) = video.filter(|s| !s.is_empty()) {
    return ViewRequest::VideoDetail(slug.to_string());
  }
  match category.filter(|c| !c.is_empty()) {
    Some(c) if c.eq_ignore_ascii_case("all") => ViewRequest::Home,
    Some(c) => ViewRequest::Category(c.to_string()),
    None => ViewRequest::Home,
  }
}

/// Digits that overflow saturate to `usize::MAX` so the renderer clamps them to the last page.
fn parse_page(raw: Option<&str>) -> usize {
  let Some(s) = raw.map(str::trim).filter(|s| !s.is_empty()) else { return 1 };
  if s.bytes().all(|b| b.is_ascii_digit()) {
    return s.parse::<u128>().map_or(usize::MAX, |n| n.clamp(1, usize::MAX as u128) as usize);
  }
  1
}

/// The pure navigation transition: query string in, view state out.
pub fn on_navigate(query: &str) -> ViewState {
  let state = ViewState::from_query(query);
  debug!(query = %query, request = %state.request, page = state.page, "navigate");
  state
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_query_is_home_page_one() {
    assert_eq!(ViewState::from_query(""), ViewState::home());
    assert_eq!(ViewState::from_query("?"), ViewState::home());
    assert_eq!(ViewState::from_query("type=home"), ViewState::home());
  }

  #[test]
  fn resolves_each_view_type() {
    assert_eq!(ViewState::from_query("?type=category&name=Music").request, ViewRequest::Category("Music".into()));
    assert_eq!(ViewState::from_query("type=hashtag&name=fun").request, ViewRequest::Hashtag("fun".into()));
    assert_eq!(ViewState::from_query("type=video&path=abc-123").request, ViewRequest::VideoDetail("abc-123".into()));
  }

  #[test]
  fn incomplete_or_unknown_is_invalid() {
    assert_eq!(ViewState::from_query("type=category").request, ViewRequest::Invalid);
    assert_eq!(ViewState::from_query("type=hashtag&name=").request, ViewRequest::Invalid);
    assert_eq!(ViewState::from_query("type=video&name=x").request, ViewRequest::Invalid);
    assert_eq!(ViewState::from_query("type=playlist&name=x").request, ViewRequest::Invalid);
  }

  #[test]
  fn page_defaults_and_clamps() {
    assert_eq!(ViewState::from_query("page=3").page, 3);
    assert_eq!(ViewState::from_query("page=0").page, 1);
    assert_eq!(ViewState::from_query("page=-4").page, 1);
    assert_eq!(ViewState::from_query("page=abc").page, 1);
    assert_eq!(ViewState::from_query("type=category&name=x").page, 1);
  }

  #[test]
  fn oversized_page_saturates_instead_of_resetting() {
    assert_eq!(ViewState::from_query("page=99999999999999999999").page, usize::MAX);
    assert_eq!(ViewState::from_query("page=1234567890123456789012345678901234567890").page, usize::MAX);
    assert_eq!(ViewState::from_query("page=+3").page, 1);
    assert_eq!(ViewState::from_query("page=").page, 1);
  }

  #[test]
  fn page_ignored_outside_home_and_category() {
    assert_eq!(ViewState::from_query("type=hashtag&name=fun&page=4").page, 1);
    assert_eq!(ViewState::from_query("type=video&path=x&page=4").page, 1);
    assert_eq!(ViewState::from_query("type=category&name=x&page=4").page, 4);
  }

  #[test]
  fn decodes_percent_and_plus() {
    let state = ViewState::from_query("type=category&name=Live%20Music");
    assert_eq!(state.request, ViewRequest::Category("Live Music".into()));
    let state = ViewState::from_query("type=hashtag&name=rock+roll");
    assert_eq!(state.request, ViewRequest::Hashtag("rock roll".into()));
  }

  #[test]
  fn first_value_wins_for_repeated_keys() {
    let state = ViewState::from_query("type=category&name=a&name=b");
    assert_eq!(state.request, ViewRequest::Category("a".into()));
  }

  #[test]
  fn legacy_parameters() {
    assert_eq!(ViewState::from_query("?video=clip-9").request, ViewRequest::VideoDetail("clip-9".into()));
    assert_eq!(ViewState::from_query("?page=2&category=Music"), ViewState::new(ViewRequest::Category("Music".into()), 2));
    assert_eq!(ViewState::from_query("?category=all").request, ViewRequest::Home);
  }

  #[test]
  fn to_query_round_trips() {
    let states = [
      ViewState::home(),
      ViewState::home().with_page(5),
      ViewState::category("Live & Loud").with_page(2),
      ViewState::hashtag("día"),
      ViewState::video("a/b?c"),
      ViewState::new(ViewRequest::Invalid, 1),
    ];
    for state in states {
      assert_eq!(ViewState::from_query(&state.to_query()), state, "{}", state.to_query());
    }
  }

  #[test]
  fn canonical_query_shape() {
    assert_eq!(ViewState::category("Music").with_page(2).to_query(), "type=category&name=Music&page=2");
    assert_eq!(ViewState::home().href(), "?type=home");
  }

  #[test]
  fn with_page_keeps_filter() {
    let state = ViewState::category("Music").with_page(3);
    assert_eq!(state.request, ViewRequest::Category("Music".into()));
    assert_eq!(state.page, 3);
    assert_eq!(ViewState::hashtag("fun").with_page(3).page, 1);
  }
}
