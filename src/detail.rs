use crate::catalog::{Catalog, VideoRecord};

/// Up to `limit` other videos with exactly the same category, in catalog (most-recent-first) order.
///
/// Unlike the category filter, the comparison here is case-sensitive.
pub fn related<'a>(catalog: &'a Catalog, video: &VideoRecord, limit: usize) -> Vec<&'a VideoRecord> {
  catalog.videos().iter().filter(|v| v.id != video.id && v.category == video.category).take(limit).collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::fixtures::record;

  fn catalog() -> Catalog {
    Catalog::new(vec![
      record(1, "Music", &[]),
      record(2, "Sports", &[]),
      record(3, "music", &[]),
      record(4, "Music", &[]),
      record(5, "Music", &[]),
      record(6, "Music", &[]),
      record(7, "Music", &[]),
    ])
  }

  #[test]
  fn excludes_self_and_caps_at_limit() {
    let catalog = catalog();
    let source = catalog.find_by_slug("video-5").unwrap();
    let ids: Vec<u64> = related(&catalog, source, 4).iter().map(|v| v.id).collect();
    assert_eq!(ids, vec![7, 6, 4, 1]);
  }

  #[test]
  fn category_case_variants_are_not_related() {
    let catalog = Catalog::new(vec![record(1, "Music", &[]), record(2, "music", &[])]);
    let source = catalog.find_by_slug("video-1").unwrap();
    assert!(related(&catalog, source, 4).is_empty());
    let lower = catalog.find_by_slug("video-2").unwrap();
    assert!(related(&catalog, lower, 4).is_empty());
  }

  #[test]
  fn all_related_share_the_category() {
    let catalog = catalog();
    for video in catalog.videos() {
      let found = related(&catalog, video, 4);
      assert!(found.len() <= 4);
      assert!(found.iter().all(|v| v.id != video.id && v.category == video.category));
    }
  }

  #[test]
  fn lone_category_has_no_related() {
    let catalog = catalog();
    let source = catalog.find_by_slug("video-2").unwrap();
    assert!(related(&catalog, source, 4).is_empty());
  }
}
