//! Keyboard navigation over the merged suggestion list.
//!
//! The cursor is either idle (`None`, shown as `-1`) or on row `i` of a list
//! of length `n`. It never leaves `[-1, n-1]` and never wraps.

/// Navigation keys the state machine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Up,
    Down,
    Enter,
    Escape,
}

/// What the caller must do after a key was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    /// Nothing changed.
    Ignored,
    /// The cursor moved.
    Moved,
    /// Commit the row at this index.
    Commit(usize),
    /// Clear both lists.
    Dismiss,
}

/// Selection cursor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    index: Option<usize>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current row, `None` when idle.
    pub fn get(&self) -> Option<usize> {
        self.index
    }

    /// Current row as a signed index, `-1` when idle.
    pub fn as_signed(&self) -> isize {
        self.index.map_or(-1, |i| i as isize)
    }

    /// Back to idle.
    pub fn reset(&mut self) {
        self.index = None;
    }

    /// Handles `key` against a merged list of length `len`.
    ///
    /// Every key is a no-op on an empty list. Otherwise Escape dismisses
    /// from any state.
    pub fn handle(&mut self, key: NavKey, len: usize) -> NavOutcome {
        match key {
            _ if len == 0 => NavOutcome::Ignored,
            NavKey::Escape => {
                self.reset();
                NavOutcome::Dismiss
            }
            NavKey::Down => {
                let next = match self.index {
                    None => 0,
                    Some(i) => (i + 1).min(len - 1),
                };
                self.move_to(Some(next))
            }
            NavKey::Up => {
                let next = match self.index {
                    None | Some(0) => None,
                    Some(i) => Some(i - 1),
                };
                self.move_to(next)
            }
            NavKey::Enter => match self.index {
                Some(i) if i < len => {
                    self.reset();
                    NavOutcome::Commit(i)
                }
                _ => NavOutcome::Ignored,
            },
        }
    }

    fn move_to(&mut self, next: Option<usize>) -> NavOutcome {
        if next == self.index {
            NavOutcome::Ignored
        } else {
            self.index = next;
            NavOutcome::Moved
        }
    }
}
