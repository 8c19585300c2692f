use ratatui::{
  Frame,
  layout::{Alignment, Constraint, Layout, Rect},
  style::{Modifier, Style, Stylize},
  text::{Line, Span},
  widgets::{Block, BorderType, List, ListItem, Padding, Paragraph, Wrap},
};

use crate::app::{App, AppMode, Focus};
use crate::player::PlayerState;
use crate::theme::Theme;
use crate::view::{Card, DetailView, MainContent, RelatedPanel, messages};

// --- Helpers ---

/// Compute the display width of the first `n` chars (accounting for double-width CJK).
pub fn display_width(s: &str, n: usize) -> usize {
  use unicode_width::UnicodeWidthChar;
  s.chars().take(n).map(|c| c.width().unwrap_or(0)).sum()
}

/// Truncate a string to `max_width` characters, appending "…" if truncated.
fn truncate_str(s: &str, max_width: usize) -> String {
  if s.chars().count() <= max_width {
    s.to_string()
  } else {
    let truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
    format!("{}…", truncated)
  }
}

fn bordered<'a>(theme: &Theme, title: impl Into<Line<'a>>, focused: bool) -> Block<'a> {
  let border = if focused { theme.accent } else { theme.border };
  Block::bordered()
    .title(title)
    .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
    .border_type(BorderType::Rounded)
    .border_style(Style::default().fg(border))
}

// --- UI Rendering ---

pub fn ui(frame: &mut Frame, app: &mut App) {
  let theme = app.theme();

  frame.render_widget(Block::default().style(Style::default().bg(theme.bg)), frame.area());

  let [header_area, body_area, pages_area, status_area, query_area, footer_area] = Layout::vertical([
    Constraint::Length(1),
    Constraint::Min(5),
    Constraint::Length(1),
    Constraint::Length(1),
    Constraint::Length(3),
    Constraint::Length(1),
  ])
  .areas(frame.area());

  let [nav_area, main_area] = Layout::horizontal([Constraint::Length(28), Constraint::Min(20)]).areas(body_area);

  render_header(frame, app, header_area);
  render_taxonomy(frame, app, nav_area);
  render_main(frame, app, main_area);
  render_pagination(frame, app, pages_area);
  render_status(frame, app, status_area);
  render_query(frame, app, query_area);
  render_footer(frame, app, footer_area);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let left = Line::from(vec![
    Span::styled(" ▶ reel ", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)),
    Span::styled(format!(" {} ", app.document.title), Style::default().fg(theme.fg)),
  ]);
  frame.render_widget(left, area);

  let version = format!("v{} ", env!("CARGO_PKG_VERSION"));
  let right = Line::from(Span::styled(&version, Style::default().fg(theme.muted)));
  let right_area =
    Rect { x: area.x + area.width.saturating_sub(version.len() as u16), width: version.len() as u16, ..area };
  frame.render_widget(right, right_area);
}

fn render_taxonomy(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();
  let inner_w = area.width.saturating_sub(4) as usize;
  let category_count = app.document.navigation.categories.len();
  let items: Vec<ListItem> = app
    .nav_links()
    .iter()
    .enumerate()
    .map(|(i, link)| {
      let fg = if i < category_count { theme.fg } else { theme.muted };
      ListItem::new(Line::from(Span::styled(truncate_str(&link.label, inner_w), Style::default().fg(fg))))
    })
    .collect();

  let focused = app.focus == Focus::Taxonomy;
  let list = List::new(items)
    .block(bordered(theme, " Browse ", focused))
    .highlight_symbol("▶ ")
    .highlight_style(Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg).add_modifier(Modifier::BOLD));
  if focused {
    frame.render_stateful_widget(list, area, &mut app.nav_state);
  } else {
    frame.render_widget(list, area);
  }
}

fn render_main(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();
  let title = format!(" {} ", app.document.title);
  match app.document.main.clone() {
    MainContent::Loading => render_message(frame, theme, area, &title, messages::LOADING, None),
    MainContent::LoadError(err) => render_message(frame, theme, area, &title, messages::LOAD_ERROR, Some(&err)),
    MainContent::NoResults => render_message(frame, theme, area, &title, messages::NO_RESULTS, None),
    MainContent::Invalid => render_message(frame, theme, area, &title, messages::INVALID, None),
    MainContent::NotFound(slug) => render_message(frame, theme, area, &title, messages::NOT_FOUND, Some(&slug)),
    MainContent::Grid(cards) => render_cards(frame, app, area, &title, &cards),
    MainContent::Detail(detail) => render_detail(frame, app, area, &detail),
  }
}

fn render_message(frame: &mut Frame, theme: &Theme, area: Rect, title: &str, message: &str, detail: Option<&str>) {
  let mut text = vec![Line::from(""), Line::from(Span::styled(message, Style::default().fg(theme.fg)))];
  if let Some(detail) = detail {
    text.push(Line::from(""));
    text.push(Line::from(Span::styled(detail, Style::default().fg(theme.muted))));
  }
  let paragraph = Paragraph::new(text)
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(bordered(theme, title.to_string(), false));
  frame.render_widget(paragraph, area);
}

fn render_cards(frame: &mut Frame, app: &mut App, area: Rect, title: &str, cards: &[Card]) {
  let theme = app.theme();
  // Inner width: area minus 2 borders minus 2 chars for highlight symbol ("▶ ")
  let inner_w = area.width.saturating_sub(4) as usize;

  let items: Vec<ListItem> = cards
    .iter()
    .enumerate()
    .map(|(i, card)| {
      let bg = if i % 2 == 1 { theme.stripe_bg } else { theme.bg };
      let right = format!("{} views", card.views);
      let right_w = right.chars().count();
      let title = truncate_str(&card.title, inner_w.saturating_sub(right_w + 2));
      let gap = inner_w.saturating_sub(title.chars().count() + right_w);
      let line = Line::from(vec![
        Span::styled(title, Style::default().fg(theme.fg)),
        Span::raw(" ".repeat(gap)),
        Span::styled(right, Style::default().fg(theme.muted)),
      ]);
      ListItem::new(line).bg(bg)
    })
    .collect();

  let list = List::new(items)
    .block(bordered(theme, title.to_string(), app.focus == Focus::Main))
    .highlight_symbol("▶ ")
    .highlight_style(Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg).add_modifier(Modifier::BOLD));
  frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn render_detail(frame: &mut Frame, app: &mut App, area: Rect, detail: &DetailView) {
  let theme = app.theme();
  let [info_area, related_area] = Layout::vertical([Constraint::Length(10), Constraint::Min(3)]).areas(area);

  let selected_tag = if app.focus == Focus::Tags { app.tag_state.selected() } else { None };
  let hashtags: Vec<Span> = detail
    .hashtags
    .iter()
    .enumerate()
    .flat_map(|(i, t)| {
      let style = if selected_tag == Some(i) {
        Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg).add_modifier(Modifier::BOLD)
      } else {
        Style::default().fg(theme.accent)
      };
      [Span::styled(t.label.clone(), style), Span::raw(" ")]
    })
    .collect();

  let mut lines = vec![
    Line::from(Span::styled(detail.title.clone(), Style::default().fg(theme.fg).add_modifier(Modifier::BOLD))),
    Line::from(""),
    Line::from(vec![
      Span::styled("Views     ", Style::default().fg(theme.muted)),
      Span::styled(detail.views.clone(), Style::default().fg(theme.fg)),
    ]),
    Line::from(vec![
      Span::styled("Category  ", Style::default().fg(theme.muted)),
      Span::styled(detail.category.label.clone(), Style::default().fg(theme.accent)),
    ]),
    Line::from([vec![Span::styled("Tags      ", Style::default().fg(theme.muted))], hashtags].concat()),
    Line::from(""),
  ];
  lines.push(player_line(app, theme, detail));

  let info = Paragraph::new(lines)
    .wrap(Wrap { trim: true })
    .block(bordered(theme, " Now Showing ", false).padding(Padding::horizontal(1)));
  frame.render_widget(info, info_area);

  match app.document.related.clone() {
    RelatedPanel::Hidden => {}
    RelatedPanel::Empty => render_message(frame, theme, related_area, " Related ", messages::NO_RELATED, None),
    RelatedPanel::Cards(cards) => render_cards(frame, app, related_area, " Related ", &cards),
  }
}

/// The player region: idle hint, playback status, or the inline media error.
fn player_line<'a>(app: &App, theme: &Theme, detail: &'a DetailView) -> Line<'a> {
  if let Some(reason) = app.player.failure_for(&detail.slug) {
    return Line::from(vec![
      Span::styled(format!("⚠  {} ", messages::MEDIA_ERROR), Style::default().fg(theme.error)),
      Span::styled(format!("({})", reason), Style::default().fg(theme.muted)),
    ]);
  }
  match &app.player.state {
    PlayerState::Playing { slug } if *slug == detail.slug => {
      let status = app.player.last_status().unwrap_or("Starting…").to_string();
      let label = if app.player.paused { "⏸ " } else { "♪ " };
      Line::from(Span::styled(format!("{}{}", label, status), Style::default().fg(theme.status)))
    }
    _ => Line::from(vec![
      Span::styled("▶ ", Style::default().fg(theme.accent)),
      Span::styled(detail.video_url.as_str(), Style::default().fg(theme.muted).add_modifier(Modifier::UNDERLINED)),
    ]),
  }
}

fn render_pagination(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  if app.document.pagination.is_empty() {
    return;
  }
  let mut spans = vec![Span::styled(" Pages ", Style::default().fg(theme.muted))];
  for control in &app.document.pagination {
    if control.is_current() {
      spans.push(Span::styled(
        format!("[{}]", control.number),
        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
      ));
    } else {
      spans.push(Span::styled(format!(" {} ", control.number), Style::default().fg(theme.fg)));
    }
  }
  frame.render_widget(Line::from(spans), area);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let (text, style) = if let Some(msg) = &app.status_message {
    (format!(" ⏳ {}", msg), Style::default().fg(theme.status))
  } else if let Some(err) = &app.last_error {
    (format!(" ⚠  {}", err), Style::default().fg(theme.error))
  } else {
    let back = if app.history.can_go_back() { "◀" } else { " " };
    let fwd = if app.history.can_go_forward() { "▶" } else { " " };
    (format!(" {}{} {}", back, fwd, app.source), Style::default().fg(theme.muted))
  };
  frame.render_widget(Paragraph::new(text).style(style), area);
}

fn render_query(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();
  let editing = app.mode == AppMode::Query;
  let border_color = if editing { theme.accent } else { theme.border };
  let block = Block::bordered()
    .title(" Query ")
    .title_style(Style::default().fg(border_color))
    .border_type(BorderType::Rounded)
    .border_style(Style::default().fg(border_color))
    .padding(Padding::horizontal(1));

  if !editing {
    let current = format!("?{}", app.document.state.to_query());
    frame.render_widget(Paragraph::new(current).style(Style::default().fg(theme.muted)).block(block), area);
    return;
  }

  let inner_w = area.width.saturating_sub(4) as usize;
  let cursor_col = display_width(&app.query_input, app.query_cursor);

  if cursor_col < app.query_scroll {
    app.query_scroll = cursor_col;
  } else if cursor_col >= app.query_scroll + inner_w {
    app.query_scroll = cursor_col.saturating_sub(inner_w) + 1;
  }

  let visible: String = app
    .query_input
    .chars()
    .scan(0usize, |col, c| {
      let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
      let start = *col;
      *col += w;
      Some((start, *col, c))
    })
    .skip_while(|(_, end, _)| *end <= app.query_scroll)
    .take_while(|(start, _, _)| *start < app.query_scroll + inner_w)
    .map(|(_, _, c)| c)
    .collect();

  frame.render_widget(Paragraph::new(visible).style(Style::default().fg(theme.fg)).block(block), area);
  let cursor_x = area.x + 2 + (cursor_col - app.query_scroll) as u16;
  frame.set_cursor_position((cursor_x, area.y + 1));
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let keys: Vec<(&str, &str)> = match app.mode {
    AppMode::Query => vec![("Enter", "Go"), ("Esc", "Cancel")],
    AppMode::Browse => {
      let mut k = vec![("Enter", "Open"), ("←/→", "Page"), ("b/f", "Back/Fwd"), ("Tab", "Browse"), (":", "Query")];
      if matches!(app.document.main, MainContent::Detail(_)) {
        k.push(("p", "Play"));
        k.push(("c", "Category"));
      }
      if app.player.is_playing() {
        k.push(("Space", if app.player.paused { "Resume" } else { "Pause" }));
        k.push(("s", "Stop"));
      }
      k.push(("r", "Reload"));
      k.push(("q", "Quit"));
      k
    }
  };

  let spans: Vec<Span> = keys
    .iter()
    .enumerate()
    .flat_map(|(i, (key, action))| {
      let mut s = vec![
        Span::styled(format!(" {} ", key), Style::default().fg(theme.key_fg).bg(theme.key_bg)),
        Span::styled(format!(" {} ", action), Style::default().fg(theme.muted)),
      ];
      if i < keys.len() - 1 {
        s.push(Span::raw(" "));
      }
      s
    })
    .collect();

  frame.render_widget(Line::from(spans), area);

  let theme_label = format!("{} ", theme.name);
  let right = Line::from(Span::styled(&theme_label, Style::default().fg(theme.muted)));
  let right_area =
    Rect { x: area.x + area.width.saturating_sub(theme_label.len() as u16), width: theme_label.len() as u16, ..area };
  frame.render_widget(right, right_area);
}
