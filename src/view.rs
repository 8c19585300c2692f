//! Pure rendering: a [`ViewState`] and the catalog go in, a [`Document`] comes out.
//!
//! The document is presentation-neutral. `html` serializes it into markup and
//! `ui` draws it in the terminal.

use crate::catalog::{Catalog, VideoRecord};
use crate::constants::constants;
use crate::detail::related;
use crate::listing::{PageControl, paginate, pagination_controls};
use crate::router::{ViewRequest, ViewState};
use crate::taxonomy::{NavLink, Taxonomy};

/// User-visible messages shared by every front end.
pub mod messages {
  pub const LOADING: &str = "Loading videos…";
  pub const LOAD_ERROR: &str = "Error loading videos. Please try again later.";
  pub const NO_RESULTS: &str = "No videos found.";
  pub const NOT_FOUND: &str = "Video doesn't exist.";
  pub const INVALID: &str = "Invalid page.";
  pub const NO_RELATED: &str = "No related videos available.";
  pub const MEDIA_ERROR: &str = "Error loading video. Please try again later.";
}

/// What the loader has produced so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CatalogState {
  #[default]
  Loading,
  Ready(Catalog),
  Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
  pub page_size: usize,
  pub related_limit: usize,
}

impl Default for Settings {
  fn default() -> Self {
    Self { page_size: constants().page_size, related_limit: constants().related_limit }
  }
}

/// A video card in a grid or the related panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
  pub title: String,
  pub views: String,
  pub thumbnail: String,
  pub target: ViewState,
}

impl Card {
  fn from_record(video: &VideoRecord) -> Self {
    Self {
      title: video.title.clone(),
      views: video.views.clone(),
      thumbnail: video.thumbnail.clone(),
      target: ViewState::video(&video.video_page),
    }
  }

  pub fn href(&self) -> String {
    self.target.href()
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
  pub slug: String,
  pub title: String,
  pub views: String,
  pub category: NavLink,
  pub hashtags: Vec<NavLink>,
  pub video_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MainContent {
  Loading,
  LoadError(String),
  Grid(Vec<Card>),
  NoResults,
  Detail(DetailView),
  NotFound(String),
  Invalid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelatedPanel {
  Hidden,
  Empty,
  Cards(Vec<Card>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigation {
  pub categories: Vec<NavLink>,
  pub hashtags: Vec<NavLink>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
  pub title: String,
  /// The state actually shown, with the page clamped into range.
  pub state: ViewState,
  pub total_pages: usize,
  pub navigation: Navigation,
  pub main: MainContent,
  pub pagination: Vec<PageControl>,
  pub related: RelatedPanel,
}

impl Document {
  fn bare(state: &ViewState, title: impl Into<String>, main: MainContent) -> Self {
    Self {
      title: title.into(),
      state: state.clone(),
      total_pages: 1,
      navigation: Navigation::default(),
      main,
      pagination: Vec::new(),
      related: RelatedPanel::Hidden,
    }
  }

  /// Cards in the main grid, or the related cards on a detail page.
  pub fn cards(&self) -> &[Card] {
    match (&self.main, &self.related) {
      (MainContent::Grid(cards), _) => cards.as_slice(),
      (_, RelatedPanel::Cards(cards)) => cards.as_slice(),
      _ => &[],
    }
  }
}

pub fn render(state: &ViewState, catalog: &CatalogState, settings: &Settings) -> Document {
  match catalog {
    CatalogState::Loading => Document::bare(state, "Loading", MainContent::Loading),
    CatalogState::Failed(err) => Document::bare(state, "Error", MainContent::LoadError(err.clone())),
    CatalogState::Ready(catalog) => render_catalog(state, catalog, settings),
  }
}

fn render_catalog(state: &ViewState, catalog: &Catalog, settings: &Settings) -> Document {
  let taxonomy = Taxonomy::from_videos(catalog.videos());
  let mut doc = match &state.request {
    ViewRequest::Home => render_list(state, "Home".to_string(), catalog.videos().iter().collect(), settings),
    ViewRequest::Category(name) => render_list(state, format!("Category: {}", name), catalog.by_category(name), settings),
    ViewRequest::Hashtag(tag) => render_hashtag(state, tag, catalog.by_hashtag(tag)),
    ViewRequest::VideoDetail(slug) => render_detail(state, slug, catalog, settings),
    ViewRequest::Invalid => Document::bare(state, "Invalid page", MainContent::Invalid),
  };
  doc.navigation = Navigation { categories: taxonomy.category_links(), hashtags: taxonomy.hashtag_links() };
  doc
}

fn render_list(state: &ViewState, title: String, candidates: Vec<&VideoRecord>, settings: &Settings) -> Document {
  if candidates.is_empty() {
    return Document::bare(state, title, MainContent::NoResults);
  }
  let paged = paginate(&candidates, state.page, settings.page_size);
  let shown = state.with_page(paged.page);
  Document {
    title,
    pagination: pagination_controls(&shown, paged.page, paged.total_pages),
    total_pages: paged.total_pages,
    main: MainContent::Grid(paged.items.iter().map(|v| Card::from_record(v)).collect()),
    state: shown,
    navigation: Navigation::default(),
    related: RelatedPanel::Hidden,
  }
}

fn render_hashtag(state: &ViewState, tag: &str, matches: Vec<&VideoRecord>) -> Document {
  let title = format!("#{}", tag);
  if matches.is_empty() {
    return Document::bare(state, title, MainContent::NoResults);
  }
  let cards = matches.into_iter().map(Card::from_record).collect();
  Document::bare(state, title, MainContent::Grid(cards))
}

fn render_detail(state: &ViewState, slug: &str, catalog: &Catalog, settings: &Settings) -> Document {
  let Some(video) = catalog.find_by_slug(slug) else {
    return Document::bare(state, "Not found", MainContent::NotFound(slug.to_string()));
  };
  let related_cards: Vec<Card> =
    related(catalog, video, settings.related_limit).into_iter().map(Card::from_record).collect();
  let detail = DetailView {
    slug: video.video_page.clone(),
    title: video.title.clone(),
    views: video.views.clone(),
    category: NavLink::category(&video.category),
    hashtags: video.hashtags.iter().map(|t| NavLink::hashtag(t)).collect(),
    video_url: video.video_url.clone(),
  };
  let mut doc = Document::bare(state, video.title.clone(), MainContent::Detail(detail));
  doc.related = if related_cards.is_empty() { RelatedPanel::Empty } else { RelatedPanel::Cards(related_cards) };
  doc
}
