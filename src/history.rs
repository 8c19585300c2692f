use crate::router::ViewState;

/// Visited views with a cursor, browser-style: pushing after going back drops the forward entries.
#[derive(Debug, Clone)]
pub struct History {
  entries: Vec<ViewState>,
  cursor: usize,
}

impl History {
  pub fn new(initial: ViewState) -> Self {
    Self { entries: vec![initial], cursor: 0 }
  }

  pub fn current(&self) -> &ViewState {
    &self.entries[self.cursor]
  }

  /// Record a navigation. Returns false when `state` is already the current entry.
  pub fn push(&mut self, state: ViewState) -> bool {
    if *self.current() == state {
      return false;
    }
    self.entries.truncate(self.cursor + 1);
    self.entries.push(state);
    self.cursor = self.entries.len() - 1;
    true
  }

  pub fn back(&mut self) -> Option<&ViewState> {
    if self.cursor == 0 {
      return None;
    }
    self.cursor -= 1;
    Some(self.current())
  }

  pub fn forward(&mut self) -> Option<&ViewState> {
    if self.cursor + 1 >= self.entries.len() {
      return None;
    }
    self.cursor += 1;
    Some(self.current())
  }

  pub fn can_go_back(&self) -> bool {
    self.cursor > 0
  }

  pub fn can_go_forward(&self) -> bool {
    self.cursor + 1 < self.entries.len()
  }
}

impl Default for History {
  fn default() -> Self {
    Self::new(ViewState::home())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn back_and_forward_restore_states() {
    let mut history = History::default();
    history.push(ViewState::category("Music"));
    history.push(ViewState::video("clip"));

    assert_eq!(history.back(), Some(&ViewState::category("Music")));
    assert_eq!(history.back(), Some(&ViewState::home()));
    assert_eq!(history.back(), None);
    assert_eq!(history.forward(), Some(&ViewState::category("Music")));
    assert_eq!(history.forward(), Some(&ViewState::video("clip")));
    assert_eq!(history.forward(), None);
  }

  #[test]
  fn push_after_back_drops_forward_entries() {
    let mut history = History::default();
    history.push(ViewState::category("Music"));
    history.push(ViewState::category("Sports"));
    history.back();
    history.push(ViewState::hashtag("fun"));

    assert!(!history.can_go_forward());
    assert_eq!(history.back(), Some(&ViewState::category("Music")));
  }

  #[test]
  fn pushing_current_state_is_a_no_op() {
    let mut history = History::default();
    assert!(!history.push(ViewState::home()));
    assert!(!history.can_go_back());
    assert!(history.push(ViewState::home().with_page(2)));
    assert!(history.can_go_back());
  }
}
