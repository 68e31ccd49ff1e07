//! Bounded undo/redo history of item-list snapshots.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::model::Workpiece;

/// Shared, immutable item list.
pub type ItemList = Arc<Vec<Workpiece>>;

/// Linear history with a cursor. Entry 0 is the initial item list.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<ItemList>,
    cursor: usize,
    limit: usize,
}

impl History {
    /// Start a history whose first entry is `initial`.
    ///
    /// A limit of zero is treated as one.
    pub fn new(initial: ItemList, limit: usize) -> Self {
        let mut entries = VecDeque::with_capacity(limit.clamp(1, 64));
        entries.push_back(initial);
        Self {
            entries,
            cursor: 0,
            limit: limit.max(1),
        }
    }

    /// Record `items` as the newest entry, discarding any redo branch.
    pub fn push(&mut self, items: ItemList) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push_back(items);
        while self.entries.len() > self.limit {
            self.entries.pop_front();
        }
        self.cursor = self.entries.len() - 1;
    }

    /// Step back. Returns the entry to restore, if any.
    pub fn undo(&mut self) -> Option<ItemList> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor).cloned()
    }

    /// Step forward. Returns the entry to restore, if any.
    pub fn redo(&mut self) -> Option<ItemList> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        self.entries.get(self.cursor).cloned()
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Drop every entry and restart from `initial`.
    pub fn reset(&mut self, initial: ItemList) {
        self.entries.clear();
        self.entries.push_back(initial);
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{default_catalog, Workpiece};

    fn list(n: usize) -> ItemList {
        let catalog = default_catalog();
        Arc::new(
            (0..n)
                .map(|_| Workpiece::from_material(&catalog["m1"]))
                .collect(),
        )
    }

    #[test]
    fn test_undo_redo_walks_entries() {
        let mut history = History::new(list(0), 50);
        let one = list(1);
        let two = list(2);
        history.push(one.clone());
        history.push(two.clone());

        assert_eq!(history.undo().unwrap().len(), 1);
        assert_eq!(history.undo().unwrap().len(), 0);
        assert!(history.undo().is_none());
        assert!(Arc::ptr_eq(&history.redo().unwrap(), &one));
        assert!(Arc::ptr_eq(&history.redo().unwrap(), &two));
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_push_truncates_redo_branch() {
        let mut history = History::new(list(0), 50);
        history.push(list(1));
        history.push(list(2));
        history.undo();
        history.push(list(3));

        assert_eq!(history.len(), 3);
        assert!(!history.can_redo());
        assert_eq!(history.undo().unwrap().len(), 1);
    }

    #[test]
    fn test_limit_evicts_oldest() {
        let mut history = History::new(list(0), 3);
        for n in 1..=5 {
            history.push(list(n));
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.cursor(), 2);
        assert_eq!(history.undo().unwrap().len(), 4);
        assert_eq!(history.undo().unwrap().len(), 3);
        assert!(history.undo().is_none());
    }

    #[test]
    fn test_zero_limit_keeps_latest() {
        let mut history = History::new(list(0), 0);
        history.push(list(1));
        assert_eq!(history.len(), 1);
        assert!(!history.can_undo());
    }
}
