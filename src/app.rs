use anyhow::Result;
use ratatui::widgets::ListState;
use reqwest::Client;
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tracing::{debug, error, info};

use crate::catalog::{Catalog, CatalogSource, load_catalog};
use crate::config::Config;
use crate::constants::constants;
use crate::history::History;
use crate::player::MediaPlayer;
use crate::router::{ViewState, on_navigate};
use crate::taxonomy::NavLink;
use crate::theme::{THEMES, Theme};
use crate::view::{CatalogState, Document, MainContent, Settings, render};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
  Browse,
  /// Editing the query bar.
  Query,
}

/// Which list receives selection keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
  Main,
  Taxonomy,
  /// Hashtag links on a detail page.
  Tags,
}

pub struct App {
  pub source: CatalogSource,
  http_client: Client,
  pub catalog: CatalogState,
  pub history: History,
  /// Rendered from `history.current()` and `catalog` after every change to either.
  pub document: Document,
  pub settings: Settings,
  pub mode: AppMode,
  pub focus: Focus,
  pub list_state: ListState,
  pub nav_state: ListState,
  pub tag_state: ListState,
  pub query_input: String,
  pub query_cursor: usize,
  pub query_scroll: usize,
  pub theme_index: usize,
  pub player: MediaPlayer,
  pub last_error: Option<String>,
  pub status_message: Option<String>,
  pub should_quit: bool,
  load_rx: Option<oneshot::Receiver<Result<Catalog>>>,
  /// When the last error was set, for auto-dismiss.
  error_time: Option<Instant>,
}

impl App {
  pub fn new(source: CatalogSource, initial: ViewState, theme_index: usize) -> Self {
    let settings = Settings::default();
    let catalog = CatalogState::Loading;
    let document = render(&initial, &catalog, &settings);
    Self {
      source,
      http_client: Client::new(),
      catalog,
      history: History::new(initial),
      document,
      settings,
      mode: AppMode::Browse,
      focus: Focus::Main,
      list_state: ListState::default(),
      nav_state: ListState::default(),
      tag_state: ListState::default(),
      query_input: String::new(),
      query_cursor: 0,
      query_scroll: 0,
      theme_index: theme_index.min(THEMES.len() - 1),
      player: MediaPlayer::new(),
      last_error: None,
      status_message: None,
      should_quit: false,
      load_rx: None,
      error_time: None,
    }
  }

  pub fn theme(&self) -> &'static Theme {
    // theme_index is clamped in new() and wrapped in next_theme().
    &THEMES[self.theme_index]
  }

  pub fn next_theme(&mut self) {
    self.theme_index = (self.theme_index + 1) % THEMES.len();
    let mut config = Config::load();
    config.theme_name = Some(self.theme().name.to_string());
    config.save();
  }

  pub fn set_error(&mut self, msg: String) {
    self.last_error = Some(msg);
    self.error_time = Some(Instant::now());
  }

  pub fn clear_error(&mut self) {
    self.last_error = None;
    self.error_time = None;
  }

  pub fn expire_error(&mut self) {
    if let Some(t) = self.error_time
      && t.elapsed() >= Duration::from_secs(constants().error_dismiss_secs)
    {
      self.clear_error();
    }
  }

  // --- Catalog ---

  /// Start a fresh catalog fetch. Any previous catalog is dropped.
  pub fn trigger_load(&mut self) {
    info!(source = %self.source, "catalog load triggered");
    self.catalog = CatalogState::Loading;
    self.status_message = Some(format!("Loading {}…", self.source));
    self.rerender();

    let client = self.http_client.clone();
    let source = self.source.clone();
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let _ = tx.send(load_catalog(&client, &source).await);
    });
    self.load_rx = Some(rx);
  }

  pub fn check_pending(&mut self) {
    let Some(mut rx) = self.load_rx.take() else { return };
    match rx.try_recv() {
      Ok(result) => {
        self.status_message = None;
        self.apply_load(result);
      }
      Err(oneshot::error::TryRecvError::Empty) => {
        self.load_rx = Some(rx);
      }
      Err(oneshot::error::TryRecvError::Closed) => {
        self.status_message = None;
        self.apply_load(Err(anyhow::anyhow!("Load task failed.")));
      }
    }
  }

  pub fn apply_load(&mut self, result: Result<Catalog>) {
    match result {
      Ok(catalog) => {
        self.catalog = CatalogState::Ready(catalog);
      }
      Err(e) => {
        error!(err = %format!("{:#}", e), "catalog load failed");
        self.catalog = CatalogState::Failed(format!("{:#}", e));
      }
    }
    self.rerender();
  }

  // --- Navigation ---

  pub fn rerender(&mut self) {
    self.document = render(self.history.current(), &self.catalog, &self.settings);
    let cards = self.document.cards().len();
    self.list_state.select(if cards > 0 { Some(0) } else { None });
    let links = self.nav_links().len();
    match self.nav_state.selected() {
      _ if links == 0 => self.nav_state.select(None),
      Some(i) if i < links => {}
      _ => self.nav_state.select(Some(0)),
    }
    let tags = self.detail_tags().len();
    self.tag_state.select(if tags > 0 { Some(0) } else { None });
    if self.focus == Focus::Tags && tags == 0 {
      self.focus = Focus::Main;
    }
  }

  /// Apply a navigation: record it in history and re-render.
  pub fn navigate(&mut self, state: ViewState) {
    info!(query = %state.to_query(), "navigate");
    if self.history.push(state) {
      self.focus = Focus::Main;
      self.rerender();
    }
  }

  pub fn navigate_query(&mut self, query: &str) {
    self.navigate(on_navigate(query));
  }

  pub fn back(&mut self) {
    if self.history.back().is_some() {
      debug!("history: back");
      self.rerender();
    }
  }

  pub fn forward(&mut self) {
    if self.history.forward().is_some() {
      debug!("history: forward");
      self.rerender();
    }
  }

  pub fn next_page(&mut self) {
    let state = &self.document.state;
    if state.request.is_paginated() && state.page < self.document.total_pages {
      let next = state.with_page(state.page + 1);
      self.navigate(next);
    }
  }

  pub fn prev_page(&mut self) {
    let state = &self.document.state;
    if state.request.is_paginated() && state.page > 1 {
      let prev = state.with_page(state.page - 1);
      self.navigate(prev);
    }
  }

  /// Category links followed by hashtag links, as listed in the taxonomy panel.
  pub fn nav_links(&self) -> Vec<&NavLink> {
    let nav = &self.document.navigation;
    nav.categories.iter().chain(nav.hashtags.iter()).collect()
  }

  /// Hashtag links of the video on a detail page; empty elsewhere.
  pub fn detail_tags(&self) -> &[NavLink] {
    match &self.document.main {
      MainContent::Detail(detail) => detail.hashtags.as_slice(),
      _ => &[],
    }
  }

  pub fn open_selected(&mut self) {
    let target = match self.focus {
      Focus::Main => self.list_state.selected().and_then(|i| self.document.cards().get(i)).map(|c| c.target.clone()),
      Focus::Taxonomy => {
        self.nav_state.selected().and_then(|i| self.nav_links().get(i).map(|l| l.target.clone()))
      }
      Focus::Tags => self.tag_state.selected().and_then(|i| self.detail_tags().get(i)).map(|l| l.target.clone()),
    };
    if let Some(target) = target {
      self.navigate(target);
    }
  }

  pub fn open_category(&mut self) {
    if let MainContent::Detail(detail) = &self.document.main {
      let target = detail.category.target.clone();
      self.navigate(target);
    }
  }

  /// Cycle main list -> taxonomy panel -> detail hashtags, skipping empty targets.
  pub fn toggle_focus(&mut self) {
    let has_links = !self.nav_links().is_empty();
    let has_tags = !self.detail_tags().is_empty();
    self.focus = match self.focus {
      Focus::Main if has_links => Focus::Taxonomy,
      Focus::Main | Focus::Taxonomy if has_tags => Focus::Tags,
      _ => Focus::Main,
    };
  }

  pub fn select_next(&mut self) {
    let (count, state) = self.active_list();
    if count > 0 {
      let i = state.selected().map_or(0, |i| (i + 1) % count);
      state.select(Some(i));
    }
  }

  pub fn select_prev(&mut self) {
    let (count, state) = self.active_list();
    if count > 0 {
      let i = state.selected().map_or(0, |i| if i == 0 { count - 1 } else { i - 1 });
      state.select(Some(i));
    }
  }

  fn active_list(&mut self) -> (usize, &mut ListState) {
    match self.focus {
      Focus::Main => {
        let count = self.document.cards().len();
        (count, &mut self.list_state)
      }
      Focus::Taxonomy => {
        let count = self.nav_links().len();
        (count, &mut self.nav_state)
      }
      Focus::Tags => {
        let count = self.detail_tags().len();
        (count, &mut self.tag_state)
      }
    }
  }

  // --- Query bar ---

  pub fn start_query(&mut self) {
    self.query_input = self.document.state.to_query();
    self.query_cursor = self.query_input.chars().count();
    self.query_scroll = 0;
    self.mode = AppMode::Query;
  }

  pub fn submit_query(&mut self) {
    let query = self.query_input.trim().to_string();
    self.mode = AppMode::Browse;
    self.navigate_query(&query);
  }

  // --- Playback ---

  pub async fn play_current(&mut self) {
    if let MainContent::Detail(detail) = &self.document.main {
      let (slug, url) = (detail.slug.clone(), detail.video_url.clone());
      self.player.play(&slug, &url).await;
    }
  }
}
