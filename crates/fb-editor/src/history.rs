//! Undo/redo snapshot stack.
//!
//! Every recorded action pushes the state *before* it ran. Snapshots are
//! whole `FormState` values, but page component lists are `Arc`-shared with
//! the live state, so a snapshot only costs the nodes an action rewrote.

use crate::state::FormState;
use std::collections::VecDeque;

/// Default undo depth.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Bounded undo stack plus redo stack, owned by one editing session.
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: VecDeque<FormState>,
    redo_stack: Vec<FormState>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            undo_stack: VecDeque::with_capacity(limit.min(DEFAULT_HISTORY_LIMIT)),
            redo_stack: Vec::new(),
            limit,
        }
    }

    /// Record the state as it was before a new action. Clears redo.
    pub fn record(&mut self, prior: FormState) {
        self.redo_stack.clear();
        if self.limit == 0 {
            return;
        }
        self.undo_stack.push_back(prior);
        while self.undo_stack.len() > self.limit {
            self.undo_stack.pop_front();
        }
    }

    /// Step back: returns the state to restore and remembers `current` for redo.
    pub fn undo(&mut self, current: &FormState) -> Option<FormState> {
        let prior = self.undo_stack.pop_back()?;
        self.redo_stack.push(current.clone());
        Some(prior)
    }

    /// Step forward again after an undo.
    pub fn redo(&mut self, current: &FormState) -> Option<FormState> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push_back(current.clone());
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fb_core::{FormPage, NodeId};

    fn state(title: &str) -> FormState {
        FormState::with_pages(vec![FormPage::new(NodeId::intern("h_page"), title)])
            .unwrap()
    }

    #[test]
    fn undo_then_redo() {
        let mut history = History::new(10);
        history.record(state("one"));
        let current = state("two");

        let restored = history.undo(&current).unwrap();
        assert_eq!(restored.pages[0].title, "one");
        assert!(history.can_redo());
        assert!(!history.can_undo());

        let again = history.redo(&restored).unwrap();
        assert_eq!(again.pages[0].title, "two");
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn oldest_snapshot_dropped_past_limit() {
        let mut history = History::new(3);
        for i in 0..5 {
            history.record(state(&format!("s{i}")));
        }
        assert_eq!(history.undo_depth(), 3);

        let current = state("now");
        let mut titles = Vec::new();
        let mut at = current;
        while let Some(prev) = history.undo(&at) {
            titles.push(prev.pages[0].title.clone());
            at = prev;
        }
        assert_eq!(titles, vec!["s4", "s3", "s2"]);
    }

    #[test]
    fn new_record_clears_redo() {
        let mut history = History::default();
        history.record(state("a"));
        let _ = history.undo(&state("b"));
        assert!(history.can_redo());
        history.record(state("c"));
        assert!(!history.can_redo());
        assert_eq!(history.limit(), DEFAULT_HISTORY_LIMIT);
    }

    #[test]
    fn zero_limit_records_nothing() {
        let mut history = History::new(0);
        history.record(state("a"));
        assert!(!history.can_undo());
        history.clear();
        assert_eq!(history.redo_depth(), 0);
    }
}
