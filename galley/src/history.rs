// Copyright 2025 the Galley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Undo/redo history.
//!
//! Every document mutation is recorded as a replacement: the offset it
//! happened at, the text it removed and the text it inserted, plus the
//! cursor on both sides. Consecutive typing and backspacing runs are merged
//! into single records within a time threshold, the stack depth is bounded,
//! and redo history is discarded on new edits.

use crate::editing::Cursor;

/// Maximum number of records kept on the undo stack.
const UNDO_LIMIT: usize = 1000;

/// Time threshold for merging consecutive typing operations.
const GROUP_THRESHOLD_MS: f64 = 500.0;

/// A recorded document replacement.
#[derive(Clone, Debug)]
pub(crate) struct EditRecord {
    /// Offset the replacement started at.
    pub(crate) start: usize,
    /// Text removed by the edit, separators rendered as `'\n'`.
    pub(crate) removed: String,
    /// Text inserted by the edit.
    pub(crate) inserted: String,
    /// Cursor before the edit.
    pub(crate) cursor_before: Cursor,
    /// Cursor after the edit.
    pub(crate) cursor_after: Cursor,
    /// Event timestamp the edit arrived with.
    pub(crate) time_ms: f64,
}

impl EditRecord {
    fn inserted_chars(&self) -> usize {
        self.inserted.chars().count()
    }

    fn removed_chars(&self) -> usize {
        self.removed.chars().count()
    }

    /// Whether `next` continues this record as a typing or backspacing run.
    fn can_merge(&self, next: &Self) -> bool {
        if next.time_ms - self.time_ms > GROUP_THRESHOLD_MS {
            return false;
        }
        let typing = self.removed.is_empty()
            && next.removed.is_empty()
            && !next.inserted.contains('\n')
            && next.start == self.start + self.inserted_chars();
        let backspacing = self.inserted.is_empty()
            && next.inserted.is_empty()
            && next.start + next.removed_chars() == self.start;
        typing || backspacing
    }

    fn merge(&mut self, next: Self) {
        if next.removed.is_empty() {
            self.inserted.push_str(&next.inserted);
        } else {
            self.start = next.start;
            let mut removed = next.removed;
            removed.push_str(&self.removed);
            self.removed = removed;
        }
        self.cursor_after = next.cursor_after;
        self.time_ms = next.time_ms;
    }
}

/// Bounded undo/redo stack.
#[derive(Default, Debug)]
pub(crate) struct History {
    undo: Vec<EditRecord>,
    redo: Vec<EditRecord>,
}

impl History {
    /// Records a new edit, merging typing runs and discarding redo history.
    pub(crate) fn push(&mut self, record: EditRecord) {
        self.redo.clear();
        if let Some(last) = self.undo.last_mut() {
            if last.can_merge(&record) {
                last.merge(record);
                return;
            }
        }
        self.undo.push(record);
        if self.undo.len() > UNDO_LIMIT {
            self.undo.remove(0);
        }
    }

    /// Pops the most recent record for undoing.
    ///
    /// The record is moved to the redo stack; the returned clone describes
    /// the forward edit, which the caller applies in reverse.
    pub(crate) fn undo(&mut self) -> Option<EditRecord> {
        let record = self.undo.pop()?;
        self.redo.push(record.clone());
        Some(record)
    }

    /// Pops the most recent undone record for redoing.
    pub(crate) fn redo(&mut self) -> Option<EditRecord> {
        let record = self.redo.pop()?;
        self.undo.push(record.clone());
        Some(record)
    }

    pub(crate) fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub(crate) fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Drops all history.
    pub(crate) fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert(start: usize, text: &str, time_ms: f64) -> EditRecord {
        EditRecord {
            start,
            removed: String::new(),
            inserted: text.into(),
            cursor_before: Cursor::at(start),
            cursor_after: Cursor::at(start + text.chars().count()),
            time_ms,
        }
    }

    fn remove(start: usize, text: &str, time_ms: f64) -> EditRecord {
        EditRecord {
            start,
            removed: text.into(),
            inserted: String::new(),
            cursor_before: Cursor::at(start + text.chars().count()),
            cursor_after: Cursor::at(start),
            time_ms,
        }
    }

    #[test]
    fn typing_runs_merge() {
        let mut history = History::default();
        history.push(insert(0, "h", 0.0));
        history.push(insert(1, "e", 100.0));
        history.push(insert(2, "y", 200.0));
        let record = history.undo().unwrap();
        assert_eq!(record.inserted, "hey");
        assert!(!history.can_undo());
    }

    #[test]
    fn slow_typing_does_not_merge() {
        let mut history = History::default();
        history.push(insert(0, "h", 0.0));
        history.push(insert(1, "i", 1000.0));
        history.undo().unwrap();
        assert!(history.can_undo());
    }

    #[test]
    fn backspace_runs_merge_in_reverse() {
        let mut history = History::default();
        history.push(remove(2, "l", 0.0));
        history.push(remove(1, "e", 50.0));
        let record = history.undo().unwrap();
        assert_eq!(record.start, 1);
        assert_eq!(record.removed, "el");
    }

    #[test]
    fn new_edit_clears_redo() {
        let mut history = History::default();
        history.push(insert(0, "a", 0.0));
        history.undo().unwrap();
        assert!(history.can_redo());
        history.push(insert(0, "b", 10.0));
        assert!(!history.can_redo());
    }

    #[test]
    fn newline_breaks_a_typing_run() {
        let mut history = History::default();
        history.push(insert(0, "a", 0.0));
        history.push(insert(1, "\n", 10.0));
        assert!(history.undo().is_some());
        assert!(history.can_undo());
    }
}
