//! Page math for video grids.

use crate::router::ViewState;

/// One pagination control. `href` is `None` for the current-page marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageControl {
  pub number: usize,
  pub href: Option<String>,
}

impl PageControl {
  pub fn is_current(&self) -> bool {
    self.href.is_none()
  }
}

/// The visible slice of a candidate list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paged<'a, T> {
  pub items: &'a [T],
  pub page: usize,
  pub total_pages: usize,
}

/// `ceil(count / page_size)`, never less than 1 so that clamping always has a target.
pub fn total_pages(count: usize, page_size: usize) -> usize {
  count.div_ceil(page_size.max(1)).max(1)
}

pub fn effective_page(requested: usize, total: usize) -> usize {
  requested.clamp(1, total.max(1))
}

pub fn paginate<T>(candidates: &[T], requested: usize, page_size: usize) -> Paged<'_, T> {
  let page_size = page_size.max(1);
  let total = total_pages(candidates.len(), page_size);
  let page = effective_page(requested, total);
  let start = ((page - 1) * page_size).min(candidates.len());
  let end = (start + page_size).min(candidates.len());
  Paged { items: &candidates[start..end], page, total_pages: total }
}

/// One control per page; links rebuild `state` at the target page so the active filter survives.
pub fn pagination_controls(state: &ViewState, current: usize, total: usize) -> Vec<PageControl> {
  (1..=total)
    .map(|number| PageControl { number, href: (number != current).then(|| state.with_page(number).href()) })
    .collect()
}
