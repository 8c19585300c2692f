use crate::catalog::VideoRecord;
use crate::router::ViewState;

/// A navigation link: a label and the view it opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
  pub label: String,
  pub target: ViewState,
}

impl NavLink {
  pub fn category(name: &str) -> Self {
    Self { label: name.to_string(), target: ViewState::category(name) }
  }

  pub fn hashtag(tag: &str) -> Self {
    Self { label: format!("#{}", tag), target: ViewState::hashtag(tag) }
  }

  pub fn href(&self) -> String {
    self.target.href()
  }
}

/// Distinct categories and hashtags, in first-seen catalog order.
///
/// Distinctness is by exact string: `Music` and `music` are two entries here even
/// though the category filter treats them as one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Taxonomy {
  pub categories: Vec<String>,
  pub hashtags: Vec<String>,
}

impl Taxonomy {
  pub fn from_videos(videos: &[VideoRecord]) -> Self {
    let mut taxonomy = Self::default();
    for video in videos {
      push_distinct(&mut taxonomy.categories, &video.category);
      for tag in &video.hashtags {
        push_distinct(&mut taxonomy.hashtags, tag);
      }
    }
    taxonomy
  }

  pub fn category_links(&self) -> Vec<NavLink> {
    self.categories.iter().map(|c| NavLink::category(c)).collect()
  }

  pub fn hashtag_links(&self) -> Vec<NavLink> {
    self.hashtags.iter().map(|t| NavLink::hashtag(t)).collect()
  }
}

fn push_distinct(values: &mut Vec<String>, value: &str) {
  if !values.iter().any(|v| v == value) {
    values.push(value.to_string());
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::fixtures::record;

  #[test]
  fn distinct_in_first_seen_order() {
    let videos = vec![
      record(5, "Music", &["live", "fun"]),
      record(4, "Sports", &["fun"]),
      record(3, "Music", &["goal", "live"]),
    ];
    let taxonomy = Taxonomy::from_videos(&videos);
    assert_eq!(taxonomy.categories, vec!["Music", "Sports"]);
    assert_eq!(taxonomy.hashtags, vec!["live", "fun", "goal"]);
  }

  #[test]
  fn case_variants_stay_separate() {
    let videos = vec![record(2, "Music", &["Fun"]), record(1, "music", &["fun"])];
    let taxonomy = Taxonomy::from_videos(&videos);
    assert_eq!(taxonomy.categories, vec!["Music", "music"]);
    assert_eq!(taxonomy.hashtags, vec!["Fun", "fun"]);
  }

  #[test]
  fn links_set_type_and_name() {
    let taxonomy = Taxonomy::from_videos(&[record(1, "Live Music", &["fun"])]);
    assert_eq!(taxonomy.category_links()[0].href(), "?type=category&name=Live+Music");
    let tag = &taxonomy.hashtag_links()[0];
    assert_eq!(tag.label, "#fun");
    assert_eq!(tag.href(), "?type=hashtag&name=fun");
  }

  #[test]
  fn empty_catalog_has_no_links() {
    let taxonomy = Taxonomy::from_videos(&[]);
    assert!(taxonomy.category_links().is_empty());
    assert!(taxonomy.hashtag_links().is_empty());
  }
}
