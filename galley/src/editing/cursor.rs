// Copyright 2025 the Galley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::ops::Range;

use crate::document::Edit;

/// A position/anchor pair over document offsets.
///
/// The selection is the derived half-open range between the two; it is never
/// stored independently. Cursors reference the document by absolute code
/// point offset only, so edits elsewhere in the document shift them via
/// [`apply_edit`](Self::apply_edit) instead of invalidating them. Transient
/// cursors can be created freely for queries.
#[derive(Copy, Clone, Default, Debug)]
pub struct Cursor {
    position: usize,
    anchor: usize,
    /// Remembered horizontal position for consecutive vertical moves.
    pub(crate) h_pos: Option<f32>,
}

impl Cursor {
    /// Creates a collapsed cursor at an offset.
    pub fn at(offset: usize) -> Self {
        Self {
            position: offset,
            anchor: offset,
            h_pos: None,
        }
    }

    /// Creates a cursor selecting from `anchor` to `position`.
    pub fn between(anchor: usize, position: usize) -> Self {
        Self {
            position,
            anchor,
            h_pos: None,
        }
    }

    /// Returns the current position.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns the anchor.
    ///
    /// In a non-collapsed selection this is where the selection was
    /// initiated.
    pub fn anchor(&self) -> usize {
        self.anchor
    }

    /// Returns `true` if position and anchor coincide.
    pub fn is_collapsed(&self) -> bool {
        self.position == self.anchor
    }

    /// Returns the selected range, ordered.
    pub fn selection_range(&self) -> Range<usize> {
        self.position.min(self.anchor)..self.position.max(self.anchor)
    }

    /// Moves the position. With `extend` the anchor is kept, otherwise it
    /// collapses onto the new position.
    pub fn set_position(&mut self, offset: usize, extend: bool) {
        self.position = offset;
        if !extend {
            self.anchor = offset;
        }
        self.h_pos = None;
    }

    /// Sets both ends of the selection.
    pub fn select(&mut self, anchor: usize, position: usize) {
        self.anchor = anchor;
        self.position = position;
        self.h_pos = None;
    }

    /// Collapses the selection onto the position.
    pub fn collapse(&mut self) {
        self.anchor = self.position;
    }

    /// Clamps both ends into `0..=len`.
    pub fn clamp(&mut self, len: usize) {
        self.position = self.position.min(len);
        self.anchor = self.anchor.min(len);
    }

    /// Shifts both ends across a document edit.
    pub fn apply_edit(&mut self, edit: &Edit) {
        self.position = edit.transform(self.position);
        self.anchor = edit.transform(self.anchor);
        self.h_pos = None;
    }
}

impl PartialEq for Cursor {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position && self.anchor == other.anchor
    }
}

impl Eq for Cursor {}
