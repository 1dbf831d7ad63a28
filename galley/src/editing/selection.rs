// Copyright 2025 the Galley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cursor motions and granular selection extension.

use core::ops::Range;

use unicode_segmentation::UnicodeSegmentation;

use crate::editor::Editor;
use crate::measure::TextMeasure;

/// A cursor motion.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Motion {
    /// One code point to the left.
    CharLeft,
    /// One code point to the right.
    CharRight,
    /// To the previous word start.
    WordLeft,
    /// To the next word start.
    WordRight,
    /// One visual line up, preserving the horizontal position.
    Up,
    /// One visual line down, preserving the horizontal position.
    Down,
    /// To the start of the current visual line.
    LineStart,
    /// To the end of the current visual line.
    LineEnd,
    /// To the start of the current block.
    BlockStart,
    /// To the end of the current block.
    BlockEnd,
    /// To offset zero.
    DocumentStart,
    /// To the end of the document.
    DocumentEnd,
}

/// Granularity the selection was armed with.
///
/// `Word` and `Block` carry the seed range selected by the double or triple
/// click; drag extension never shrinks the selection below the seed.
#[derive(Clone, Default, Debug)]
pub(crate) enum AnchorBase {
    #[default]
    Char,
    Word(Range<usize>),
    Block(Range<usize>),
}

/// Mouse-selection state.
#[derive(Clone, Default, Debug)]
pub(crate) struct SelectState {
    pub(crate) base: AnchorBase,
    /// A press is active and moves extend the selection.
    pub(crate) selecting: bool,
}

/// Word and non-word segments of a block's text, in code point offsets.
///
/// Returns `(start, end, is_whitespace)` triples covering the text.
pub(crate) fn word_segments(text: &str) -> Vec<(usize, usize, bool)> {
    let mut segments = Vec::new();
    let mut start = 0;
    for segment in text.split_word_bounds() {
        let len = segment.chars().count();
        let ws = segment.chars().all(char::is_whitespace);
        segments.push((start, start + len, ws));
        start += len;
    }
    segments
}

impl<M: TextMeasure> Editor<M> {
    /// Applies a cursor motion.
    ///
    /// With `extend` the anchor is kept (the selection grows or shrinks),
    /// otherwise the selection collapses onto the new position.
    pub fn move_position(&mut self, motion: Motion, extend: bool) {
        let pos = self.cursor.position();
        let len = self.doc.len();
        match motion {
            Motion::CharLeft => {
                let target = if !extend && !self.cursor.is_collapsed() {
                    self.cursor.selection_range().start
                } else {
                    pos.saturating_sub(1)
                };
                self.cursor.set_position(target, extend);
            }
            Motion::CharRight => {
                let target = if !extend && !self.cursor.is_collapsed() {
                    self.cursor.selection_range().end
                } else {
                    (pos + 1).min(len)
                };
                self.cursor.set_position(target, extend);
            }
            Motion::WordLeft => {
                let target = self.previous_word_start(pos);
                self.cursor.set_position(target, extend);
            }
            Motion::WordRight => {
                let target = self.next_word_start(pos);
                self.cursor.set_position(target, extend);
            }
            Motion::Up => self.vertical_move(false, extend),
            Motion::Down => self.vertical_move(true, extend),
            Motion::LineStart => {
                if let Some((block, line)) = self.engine.block_line_of(&mut self.doc, pos) {
                    let start = self.line_range(block, line).start;
                    self.cursor.set_position(start, extend);
                }
            }
            Motion::LineEnd => {
                if let Some((block, line)) = self.engine.block_line_of(&mut self.doc, pos) {
                    let end = self.line_range(block, line).end;
                    self.cursor.set_position(end, extend);
                }
            }
            Motion::BlockStart => {
                let loc = self.doc.locate(pos);
                self.cursor
                    .set_position(self.doc.block_start(loc.block), extend);
            }
            Motion::BlockEnd => {
                let loc = self.doc.locate(pos);
                self.cursor
                    .set_position(self.doc.block_end(loc.block), extend);
            }
            Motion::DocumentStart => self.cursor.set_position(0, extend),
            Motion::DocumentEnd => self.cursor.set_position(len, extend),
        }
        self.generation.nudge();
    }

    /// Selects the whole document.
    pub fn select_all(&mut self) {
        self.cursor.select(0, self.doc.len());
        self.generation.nudge();
    }

    /// Document offset range of a visual line.
    pub(crate) fn line_range(&mut self, block: usize, line: usize) -> Range<usize> {
        let start = self.doc.block_start(block);
        match self.doc.block(block).and_then(|b| b.layout.line(line)) {
            Some(line) => start + line.start..start + line.end(),
            None => start..start,
        }
    }

    fn vertical_move(&mut self, down: bool, extend: bool) {
        let pos = self.cursor.position();
        let Some((block, line)) = self.engine.block_line_of(&mut self.doc, pos) else {
            // Cursor sits in an invisible block; fall back to the document
            // boundary in the direction of travel.
            let target = if down { self.doc.len() } else { 0 };
            self.cursor.set_position(target, extend);
            return;
        };
        let loc = self.doc.locate(pos);
        let x = self.cursor.h_pos.unwrap_or_else(|| {
            let data = self.doc.block(block).and_then(|b| b.layout.line(line).copied());
            data.map(|l| self.engine.x_of(&self.doc, block, &l, loc.offset))
                .unwrap_or(0.0)
        });

        let target = if down {
            self.line_below(block, line)
        } else {
            self.line_above(block, line)
        };
        match target {
            Some((nb, nl)) => {
                let Some(line_data) = self.doc.block(nb).and_then(|b| b.layout.line(nl).copied())
                else {
                    return;
                };
                let offset = self.engine.offset_in_line(&self.doc, nb, &line_data, x);
                let new_pos = self.doc.block_start(nb) + offset;
                self.cursor.set_position(new_pos, extend);
                self.cursor.h_pos = Some(x);
            }
            None => {
                // No line above/below anywhere in the document: degrade to
                // the document boundary.
                let target = if down { self.doc.len() } else { 0 };
                self.cursor.set_position(target, extend);
            }
        }
    }

    /// The visual line following (block, line), skipping invisible blocks.
    pub(crate) fn line_below(&mut self, block: usize, line: usize) -> Option<(usize, usize)> {
        let count = self.doc.block(block)?.layout.line_count();
        if line + 1 < count {
            return Some((block, line + 1));
        }
        for next in block + 1..self.doc.block_count() {
            self.engine.ensure_block(&mut self.doc, next);
            if self.doc.block(next)?.layout.line_count() > 0 {
                return Some((next, 0));
            }
        }
        None
    }

    /// The visual line preceding (block, line), skipping invisible blocks.
    pub(crate) fn line_above(&mut self, block: usize, line: usize) -> Option<(usize, usize)> {
        if line > 0 {
            return Some((block, line - 1));
        }
        for prev in (0..block).rev() {
            self.engine.ensure_block(&mut self.doc, prev);
            let count = self.doc.block(prev)?.layout.line_count();
            if count > 0 {
                return Some((prev, count - 1));
            }
        }
        None
    }

    fn next_word_start(&self, pos: usize) -> usize {
        let len = self.doc.len();
        if pos >= len {
            return len;
        }
        let loc = self.doc.locate(pos);
        let Some(block) = self.doc.block(loc.block) else {
            return pos;
        };
        if loc.offset == block.char_len() {
            // Crossing the separator lands at the start of the next block.
            return (pos + 1).min(len);
        }
        let start = self.doc.block_start(loc.block);
        for (seg_start, _, ws) in word_segments(block.text()) {
            if seg_start > loc.offset && !ws {
                return start + seg_start;
            }
        }
        start + block.char_len()
    }

    fn previous_word_start(&self, pos: usize) -> usize {
        let mut pos = pos;
        loop {
            if pos == 0 {
                return 0;
            }
            let loc = self.doc.locate(pos);
            if loc.offset == 0 {
                pos -= 1;
                continue;
            }
            let Some(block) = self.doc.block(loc.block) else {
                return pos;
            };
            let start = self.doc.block_start(loc.block);
            let candidate = word_segments(block.text())
                .iter()
                .rev()
                .find(|(seg_start, _, ws)| *seg_start < loc.offset && !ws)
                .map(|(seg_start, _, _)| *seg_start);
            match candidate {
                Some(seg_start) => return start + seg_start,
                // Only whitespace before the offset: keep walking back.
                None => pos = start,
            }
        }
    }

    /// The word range containing an offset, used to seed double-click
    /// selection.
    pub(crate) fn word_range_at(&self, pos: usize) -> Range<usize> {
        let len = self.doc.len();
        let loc = self.doc.locate(pos);
        let Some(block) = self.doc.block(loc.block) else {
            return pos..pos;
        };
        let start = self.doc.block_start(loc.block);
        if block.char_len() == 0 {
            // Empty block: the separator, if any, is the "word".
            return pos..(pos + 1).min(len);
        }
        let probe = if loc.offset == block.char_len() {
            loc.offset - 1
        } else {
            loc.offset
        };
        for (seg_start, seg_end, _) in word_segments(block.text()) {
            if probe >= seg_start && probe < seg_end {
                return start + seg_start..start + seg_end;
            }
        }
        pos..pos
    }

    /// The block range containing an offset, trailing separator included,
    /// used to seed triple-click selection.
    pub(crate) fn block_range_at(&self, pos: usize) -> Range<usize> {
        let len = self.doc.len();
        let loc = self.doc.locate(pos);
        let start = self.doc.block_start(loc.block);
        let end = (self.doc.block_end(loc.block) + 1).min(len);
        start..end
    }

    /// Extends a word-granular selection towards a candidate offset.
    ///
    /// A candidate inside the seed restores exactly the seed word. Otherwise
    /// the seed's far boundary becomes the anchor, which guarantees the seed
    /// is never shrunk as the drag continues (monotonicity); the focus
    /// follows the candidate, snapped by horizontal distance when it falls
    /// on inter-word whitespace.
    pub(crate) fn extend_word_selection(&mut self, pos: usize, x: f32) {
        let AnchorBase::Word(seed) = self.select.base.clone() else {
            self.cursor.set_position(pos, true);
            return;
        };
        if pos >= seed.start && pos <= seed.end {
            self.cursor.select(seed.start, seed.end);
            return;
        }
        let anchor = if pos < seed.start { seed.end } else { seed.start };
        let focus = self.snap_between_words(pos, x);
        self.cursor.select(anchor, focus);
    }

    /// Extends a block-granular selection towards a candidate offset.
    ///
    /// Dragging before the seed extends from the seed's end back to the
    /// target block's start; dragging after extends from the seed's start to
    /// the start of the block after the target, keeping the trailing
    /// separator inside the selection.
    pub(crate) fn extend_block_selection(&mut self, pos: usize) {
        let AnchorBase::Block(seed) = self.select.base.clone() else {
            self.cursor.set_position(pos, true);
            return;
        };
        let target = self.block_range_at(pos);
        if pos < seed.start {
            self.cursor.select(seed.end, target.start);
        } else if pos >= seed.end {
            self.cursor.select(seed.start, target.end);
        } else {
            self.cursor.select(seed.start, seed.end);
        }
    }

    /// Snaps a candidate offset that falls on inter-word whitespace to the
    /// neighbouring word boundary whose x coordinate is closer; the earlier
    /// boundary wins a tie. Offsets inside words pass through unchanged.
    fn snap_between_words(&mut self, pos: usize, x: f32) -> usize {
        let loc = self.doc.locate(pos);
        let Some(block) = self.doc.block(loc.block) else {
            return pos;
        };
        if block.char_len() == 0 || loc.offset >= block.char_len() {
            return pos;
        }
        let segment = word_segments(block.text())
            .into_iter()
            .find(|(start, end, _)| loc.offset >= *start && loc.offset < *end);
        let Some((seg_start, seg_end, true)) = segment else {
            return pos;
        };
        let start = self.doc.block_start(loc.block);
        let start_x = self.x_at(start + seg_start);
        let end_x = self.x_at(start + seg_end);
        if (x - start_x).abs() <= (x - end_x).abs() {
            start + seg_start
        } else {
            start + seg_end
        }
    }

    /// X coordinate of an offset within its visual line.
    pub(crate) fn x_at(&mut self, pos: usize) -> f32 {
        let Some((block, line)) = self.engine.block_line_of(&mut self.doc, pos) else {
            return 0.0;
        };
        let loc = self.doc.locate(pos);
        let Some(line_data) = self.doc.block(block).and_then(|b| b.layout.line(line).copied())
        else {
            return 0.0;
        };
        self.engine.x_of(&self.doc, block, &line_data, loc.offset)
    }
}
