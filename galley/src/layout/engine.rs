// Copyright 2025 the Galley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Incremental, line-granular layout.
//!
//! The engine keeps two aggregates alongside the per-block layouts: the
//! total line count and the widest block. Both are maintained by deltas as
//! blocks are laid out, so the cost of an edit is proportional to the
//! affected block range. The only O(block count) pass is the rescan for a
//! new widest block when the previously widest one shrank or disappeared.

use kurbo::Rect;

use crate::document::{Document, Edit};
use crate::event::{EditorEvent, EventQueue};
use crate::layout::line_break::break_block;
use crate::layout::{BlockLayout, DocumentSize, Line, WrapMode};
use crate::measure::TextMeasure;

/// Computes and caches per-block line layout.
#[derive(Clone, Debug)]
pub struct LayoutEngine<M: TextMeasure> {
    measure: M,
    wrap: WrapMode,
    max_advance: f32,
    total_lines: usize,
    max_width: f32,
    widest: usize,
    relayouts: u64,
}

impl<M: TextMeasure> LayoutEngine<M> {
    /// Creates an engine with unconstrained width and word wrapping.
    pub fn new(measure: M) -> Self {
        Self {
            measure,
            wrap: WrapMode::default(),
            max_advance: f32::MAX,
            total_lines: 0,
            max_width: 0.0,
            widest: 0,
            relayouts: 0,
        }
    }

    /// Returns the measurement source.
    pub fn measure(&self) -> &M {
        &self.measure
    }

    /// Returns the uniform line height.
    pub fn line_height(&self) -> f32 {
        self.measure.line_height()
    }

    /// Returns the current wrap mode.
    pub fn wrap(&self) -> WrapMode {
        self.wrap
    }

    /// Returns the available width for wrapping.
    pub fn max_advance(&self) -> f32 {
        self.max_advance
    }

    /// Returns the document size: widest block width and total line count.
    pub fn document_size(&self) -> DocumentSize {
        DocumentSize {
            width: self.max_width,
            lines: self.total_lines,
        }
    }

    /// Returns the total number of laid out lines.
    pub fn total_lines(&self) -> usize {
        self.total_lines
    }

    /// Returns the number of block layout passes performed so far.
    ///
    /// Instrumentation for hosts and tests verifying the incremental
    /// invalidation contract.
    pub fn relayouts(&self) -> u64 {
        self.relayouts
    }

    /// Sets the wrap mode and reflows the document.
    pub fn set_wrap(&mut self, doc: &mut Document, wrap: WrapMode, events: &mut EventQueue) {
        if self.wrap != wrap {
            self.wrap = wrap;
            self.reflow(doc, events);
        }
    }

    /// Sets the available width and reflows the document.
    pub fn set_max_advance(&mut self, doc: &mut Document, width: f32, events: &mut EventQueue) {
        if self.max_advance != width {
            self.max_advance = width;
            self.reflow(doc, events);
        }
    }

    /// Lays out every block again, from scratch.
    pub fn reflow(&mut self, doc: &mut Document, events: &mut EventQueue) {
        let before = self.document_size();
        self.total_lines = 0;
        self.max_width = 0.0;
        self.widest = 0;
        for index in 0..doc.block_count() {
            if let Some(block) = doc.block_mut(index) {
                block.layout = BlockLayout::default();
            }
        }
        for index in 0..doc.block_count() {
            self.layout_block(doc, index);
        }
        let after = self.document_size();
        if after != before {
            events.emit(EditorEvent::DocumentSizeChanged(after));
        }
    }

    /// Lays out a single block and folds the result into the aggregates.
    ///
    /// Invisible blocks lay out to zero lines. Out-of-range indices are
    /// ignored.
    pub fn layout_block(&mut self, doc: &mut Document, index: usize) {
        let wrap = self.wrap;
        let max_advance = self.max_advance;
        let Some(block) = doc.block_mut(index) else {
            return;
        };
        let old_lines = block.layout.line_count();
        let old_width = block.layout.width();
        if block.is_visible() {
            let lines = break_block(block.text(), wrap, max_advance, &self.measure);
            block.layout.set(lines);
        } else {
            block.layout.clear();
        }
        let new_lines = block.layout.line_count();
        let new_width = block.layout.width();
        self.relayouts += 1;
        self.total_lines = (self.total_lines + new_lines).saturating_sub(old_lines);
        if new_width > self.max_width {
            self.max_width = new_width;
            self.widest = index;
        } else if index == self.widest && new_width < old_width {
            self.rescan_widest(doc);
        }
    }

    /// Ensures a block has a valid layout.
    pub fn ensure_block(&mut self, doc: &mut Document, index: usize) {
        if doc
            .block(index)
            .is_some_and(|block| !block.layout.is_valid())
        {
            self.layout_block(doc, index);
        }
    }

    /// Responds to a document mutation.
    ///
    /// An edit confined to one block relays out that block alone; anything
    /// else relays out the affected range. The widest-block rescan runs only
    /// when the previously widest block shrank or was removed.
    pub fn document_changed(&mut self, doc: &mut Document, edit: &Edit, events: &mut EventQueue) {
        let before = self.document_size();
        self.total_lines = self.total_lines.saturating_sub(edit.old_lines);

        let widest_removed =
            self.widest >= edit.block && self.widest < edit.block + edit.old_blocks;
        if widest_removed {
            self.max_width = 0.0;
            self.widest = edit.block;
        } else if self.widest >= edit.block + edit.old_blocks {
            self.widest = self.widest + edit.new_blocks - edit.old_blocks;
        }

        for index in edit.block..edit.block + edit.new_blocks {
            self.layout_block(doc, index);
        }
        if widest_removed {
            self.rescan_widest(doc);
        }

        events.emit(EditorEvent::LayoutChanged { block: edit.block });
        let after = self.document_size();
        if after != before {
            events.emit(EditorEvent::DocumentSizeChanged(after));
        }
    }

    /// Responds to a block visibility change.
    pub fn block_visibility_changed(
        &mut self,
        doc: &mut Document,
        index: usize,
        events: &mut EventQueue,
    ) {
        if index >= doc.block_count() {
            return;
        }
        let before = self.document_size();
        self.layout_block(doc, index);
        events.emit(EditorEvent::LayoutChanged { block: index });
        let after = self.document_size();
        if after != before {
            events.emit(EditorEvent::DocumentSizeChanged(after));
        }
    }

    fn rescan_widest(&mut self, doc: &Document) {
        self.max_width = 0.0;
        self.widest = 0;
        for index in 0..doc.block_count() {
            let width = doc.block(index).map(|b| b.layout.width()).unwrap_or(0.0);
            if width > self.max_width {
                self.max_width = width;
                self.widest = index;
            }
        }
    }

    /// Returns the cached bounding rectangle of a block in document space,
    /// laying the block out first if needed.
    ///
    /// Invalid indices produce an empty rectangle.
    pub fn block_bounding_rect(&mut self, doc: &mut Document, index: usize) -> Rect {
        if index >= doc.block_count() {
            return Rect::ZERO;
        }
        self.ensure_block(doc, index);
        let y = self.lines_before(doc, index) as f64 * self.line_height() as f64;
        let Some(block) = doc.block(index) else {
            return Rect::ZERO;
        };
        let layout = &block.layout;
        Rect::new(0.0, y, layout.width() as f64, y + layout.height() as f64)
    }

    /// Returns the number of laid out lines in blocks preceding `index`.
    pub(crate) fn lines_before(&self, doc: &Document, index: usize) -> usize {
        (0..index.min(doc.block_count()))
            .map(|i| doc.block(i).map(|b| b.layout.line_count()).unwrap_or(0))
            .sum()
    }

    /// Resolves a document offset to a (block, line) pair.
    ///
    /// Returns `None` when the offset lands in an invisible block.
    pub(crate) fn block_line_of(
        &mut self,
        doc: &mut Document,
        offset: usize,
    ) -> Option<(usize, usize)> {
        let loc = doc.locate(offset);
        self.ensure_block(doc, loc.block);
        let line = doc.block(loc.block)?.layout.line_for_offset(loc.offset)?;
        Some((loc.block, line))
    }

    /// Returns the global line index of a (block, line) pair.
    pub(crate) fn global_line(&mut self, doc: &mut Document, block: usize, line: usize) -> usize {
        self.ensure_block(doc, block);
        self.lines_before(doc, block) + line
    }

    /// Resolves a global line index to a (block, line) pair.
    ///
    /// Indices past the last line clamp to the last line; `None` only when
    /// the document has no laid out lines at all.
    pub(crate) fn block_for_line(
        &mut self,
        doc: &mut Document,
        global: usize,
    ) -> Option<(usize, usize)> {
        let mut rest = global;
        let mut last = None;
        for index in 0..doc.block_count() {
            self.ensure_block(doc, index);
            let count = doc.block(index)?.layout.line_count();
            if count == 0 {
                continue;
            }
            if rest < count {
                return Some((index, rest));
            }
            rest -= count;
            last = Some((index, count - 1));
        }
        last
    }

    /// Returns the x coordinate of an offset within a line.
    pub(crate) fn x_of(&self, doc: &Document, block: usize, line: &Line, offset: usize) -> f32 {
        let Some(block) = doc.block(block) else {
            return 0.0;
        };
        let end = offset.clamp(line.start, line.end());
        self.measure.text_advance(block.slice(line.start, end))
    }

    /// Returns the code point offset within a line nearest to an x
    /// coordinate, measured from the line start.
    pub(crate) fn offset_in_line(
        &self,
        doc: &Document,
        block: usize,
        line: &Line,
        x: f32,
    ) -> usize {
        let Some(block) = doc.block(block) else {
            return line.start;
        };
        let mut cum = 0.0;
        for (index, ch) in block.slice(line.start, line.end()).chars().enumerate() {
            let advance = self.measure.advance(ch);
            if x < cum + advance / 2.0 {
                return line.start + index;
            }
            cum += advance;
        }
        line.end()
    }
}
