use ratatui::style::Color;

pub struct Theme {
  pub name: &'static str,
  pub bg: Color,
  pub fg: Color,
  pub accent: Color,
  pub muted: Color,
  pub border: Color,
  pub highlight_fg: Color,
  pub highlight_bg: Color,
  pub stripe_bg: Color,
  pub status: Color,
  pub error: Color,
  pub key_fg: Color,
  pub key_bg: Color,
}

pub static THEMES: [Theme; 3] = [
  Theme {
    name: "Reel",
    bg: Color::Rgb(18, 18, 24),
    fg: Color::Rgb(222, 222, 230),
    accent: Color::Rgb(255, 94, 98),
    muted: Color::Rgb(120, 120, 138),
    border: Color::Rgb(58, 58, 72),
    highlight_fg: Color::Rgb(18, 18, 24),
    highlight_bg: Color::Rgb(255, 94, 98),
    stripe_bg: Color::Rgb(24, 24, 32),
    status: Color::Rgb(130, 200, 255),
    error: Color::Rgb(255, 120, 90),
    key_fg: Color::Rgb(18, 18, 24),
    key_bg: Color::Rgb(160, 160, 176),
  },
  Theme {
    name: "Dusk",
    bg: Color::Rgb(30, 26, 40),
    fg: Color::Rgb(230, 220, 240),
    accent: Color::Rgb(190, 150, 255),
    muted: Color::Rgb(130, 120, 150),
    border: Color::Rgb(70, 60, 90),
    highlight_fg: Color::Rgb(30, 26, 40),
    highlight_bg: Color::Rgb(190, 150, 255),
    stripe_bg: Color::Rgb(36, 32, 48),
    status: Color::Rgb(140, 220, 200),
    error: Color::Rgb(255, 130, 140),
    key_fg: Color::Rgb(30, 26, 40),
    key_bg: Color::Rgb(170, 160, 190),
  },
  Theme {
    name: "Paper",
    bg: Color::Rgb(248, 246, 240),
    fg: Color::Rgb(40, 40, 40),
    accent: Color::Rgb(200, 60, 50),
    muted: Color::Rgb(130, 128, 120),
    border: Color::Rgb(200, 196, 186),
    highlight_fg: Color::Rgb(248, 246, 240),
    highlight_bg: Color::Rgb(200, 60, 50),
    stripe_bg: Color::Rgb(240, 237, 228),
    status: Color::Rgb(40, 100, 160),
    error: Color::Rgb(190, 40, 40),
    key_fg: Color::Rgb(248, 246, 240),
    key_bg: Color::Rgb(110, 108, 100),
  },
];

/// Index of the theme called `name`, or the first theme.
pub fn index_of(name: Option<&str>) -> usize {
  name.and_then(|n| THEMES.iter().position(|t| t.name == n)).unwrap_or(0)
}
