// Copyright 2025 the Galley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The editor: a document, its layout, the visible cursor and the viewport,
//! bound together behind the event queue.

use core::ops::Range;

use kurbo::Rect;

use crate::clipboard::{ClipboardContent, Fragment, PastePayload};
use crate::document::{Document, Edit, Marker};
use crate::editing::{Cursor, SelectState};
use crate::event::{EditorEvent, EventQueue, Generation};
use crate::history::{EditRecord, History};
use crate::input::{Composition, EditPolicy, InputState};
use crate::layout::{DocumentSize, LayoutEngine, Line, WrapMode};
use crate::measure::TextMeasure;
use crate::viewport::Viewport;

/// Minimum width drawn for selected empty lines and separators.
const MIN_RECT_WIDTH: f64 = 8.0;

/// One visible line, resolved for painting.
#[derive(Clone, PartialEq, Debug)]
pub struct VisibleLine {
    /// Index of the block the line belongs to.
    pub block: usize,
    /// The line record, with geometry local to its block.
    pub line: Line,
    /// Document offset range of the line's text.
    pub range: Range<usize>,
    /// Vertical position of the line top in viewport coordinates.
    pub y: f32,
}

/// A plain text editor over a block-structured document.
///
/// The editor owns the document, the layout engine, the visible cursor and
/// the viewport. Input events go through the `input` module handlers; the
/// consequences come back out of [`drain_events`](Self::drain_events) as
/// typed notifications in a deterministic order.
#[derive(Debug)]
pub struct Editor<M: TextMeasure> {
    pub(crate) doc: Document,
    pub(crate) engine: LayoutEngine<M>,
    pub(crate) viewport: Viewport,
    pub(crate) cursor: Cursor,
    pub(crate) select: SelectState,
    pub(crate) input: InputState,
    pub(crate) compose: Option<Composition>,
    pub(crate) history: History,
    pub(crate) policy: EditPolicy,
    pub(crate) events: EventQueue,
    pub(crate) generation: Generation,
}

impl<M: TextMeasure> Editor<M> {
    /// Creates an empty editor.
    pub fn new(measure: M) -> Self {
        let mut editor = Self {
            doc: Document::new(),
            engine: LayoutEngine::new(measure),
            viewport: Viewport::default(),
            cursor: Cursor::default(),
            select: SelectState::default(),
            input: InputState::new(),
            compose: None,
            history: History::default(),
            policy: EditPolicy::default(),
            events: EventQueue::default(),
            generation: Generation::default(),
        };
        editor.engine.reflow(&mut editor.doc, &mut editor.events);
        editor
    }

    /// Creates an editor over initial text.
    pub fn with_text(measure: M, text: &str) -> Self {
        let mut editor = Self::new(measure);
        editor.set_text(text);
        editor
    }

    // --- MARK: Accessors ---
    /// Returns the document.
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Returns the full text of the document.
    pub fn text(&self) -> String {
        self.doc.text()
    }

    /// Returns the visible cursor.
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Replaces the visible cursor, clamping it to the document.
    pub fn set_cursor(&mut self, mut cursor: Cursor) {
        cursor.clamp(self.doc.len());
        self.cursor = cursor;
        self.generation.nudge();
    }

    /// Returns the selected text, if the selection is not empty.
    pub fn selected_text(&self) -> Option<String> {
        let range = self.cursor.selection_range();
        if range.is_empty() {
            None
        } else {
            Some(self.doc.text_range(range.start, range.end))
        }
    }

    /// Returns the capability flags.
    pub fn policy(&self) -> EditPolicy {
        self.policy
    }

    /// Replaces the capability flags.
    pub fn set_policy(&mut self, policy: EditPolicy) {
        self.policy = policy;
    }

    /// Returns the current generation, for cheap redraw decisions.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Drains the pending notifications, in emission order.
    pub fn drain_events(&mut self) -> Vec<EditorEvent> {
        self.events.drain()
    }

    /// Returns the document size: widest block and total line count.
    pub fn document_size(&self) -> DocumentSize {
        self.engine.document_size()
    }

    /// Returns the number of block layout passes performed so far.
    pub fn relayouts(&self) -> u64 {
        self.engine.relayouts()
    }

    /// Returns the bounding rectangle of a block in document space.
    pub fn block_bounding_rect(&mut self, index: usize) -> Rect {
        self.engine.block_bounding_rect(&mut self.doc, index)
    }

    /// Sets the wrap mode and reflows.
    pub fn set_wrap_mode(&mut self, wrap: WrapMode) {
        self.engine.set_wrap(&mut self.doc, wrap, &mut self.events);
        self.refresh_scrollbar();
        self.request_full_update();
        self.generation.nudge();
    }

    /// Replaces the whole text.
    pub fn set_text(&mut self, text: &str) {
        self.doc = Document::from_text(text);
        self.cursor = Cursor::default();
        self.select = SelectState::default();
        self.compose = None;
        self.history.clear();
        self.engine.reflow(&mut self.doc, &mut self.events);
        self.viewport.top_block = 0;
        self.viewport.top_line = 0;
        self.viewport.frac = 0.0;
        self.refresh_scrollbar();
        self.request_full_update();
        self.generation.nudge();
    }

    // --- MARK: Block attributes ---
    /// Shows or hides a block. Hidden blocks lay out to zero lines but keep
    /// their place in the offset space.
    pub fn set_block_visible(&mut self, index: usize, visible: bool) {
        if self.doc.set_block_visible(index, visible) {
            self.engine
                .block_visibility_changed(&mut self.doc, index, &mut self.events);
            self.refresh_scrollbar();
            self.request_full_update();
            self.generation.nudge();
        }
    }

    /// Sets a block's checklist marker.
    pub fn set_block_marker(&mut self, index: usize, marker: Marker) {
        if self.doc.set_block_marker(index, marker) {
            self.request_full_update();
            self.generation.nudge();
        }
    }

    // --- MARK: Editing ---
    /// Inserts at the cursor, or replaces the selection.
    pub fn insert_or_replace_selection(&mut self, text: &str, time_ms: f64) {
        if self.policy.read_only {
            return;
        }
        let range = self.cursor.selection_range();
        self.edit_replace(range, text, time_ms);
    }

    /// Deletes the selection, if any.
    pub fn delete_selection(&mut self, time_ms: f64) {
        if self.policy.read_only {
            return;
        }
        let range = self.cursor.selection_range();
        if !range.is_empty() {
            self.edit_replace(range, "", time_ms);
        }
    }

    /// Deletes the selection or the code point before the cursor.
    pub fn backdelete(&mut self, time_ms: f64) {
        if self.policy.read_only {
            return;
        }
        let range = self.cursor.selection_range();
        if !range.is_empty() {
            self.edit_replace(range, "", time_ms);
        } else {
            let pos = self.cursor.position();
            if pos > 0 {
                self.edit_replace(pos - 1..pos, "", time_ms);
            }
        }
    }

    /// Deletes the selection or the code point after the cursor.
    pub fn delete_forward(&mut self, time_ms: f64) {
        if self.policy.read_only {
            return;
        }
        let range = self.cursor.selection_range();
        if !range.is_empty() {
            self.edit_replace(range, "", time_ms);
        } else {
            let pos = self.cursor.position();
            if pos < self.doc.len() {
                self.edit_replace(pos..pos + 1, "", time_ms);
            }
        }
    }

    /// Applies a replacement, records it, and settles the viewport.
    pub(crate) fn edit_replace(&mut self, range: Range<usize>, text: &str, time_ms: f64) {
        let cursor_before = self.cursor;
        let (edit, removed) = self.doc.replace(range.start, range.end, text);
        if edit.removed == 0 && edit.added == 0 {
            return;
        }
        self.engine
            .document_changed(&mut self.doc, &edit, &mut self.events);
        self.cursor.set_position(edit.start + edit.added, false);
        if let Some(compose) = &mut self.compose {
            compose.block = self.doc.locate(self.cursor.position()).block;
        }
        self.history.push(EditRecord {
            start: edit.start,
            removed,
            inserted: text.to_owned(),
            cursor_before,
            cursor_after: self.cursor,
            time_ms,
        });
        self.finish_edit();
    }

    /// Applies a replacement without recording history. Undo/redo path.
    fn apply_replace(&mut self, start: usize, end: usize, text: &str) -> Edit {
        let (edit, _) = self.doc.replace(start, end, text);
        self.engine
            .document_changed(&mut self.doc, &edit, &mut self.events);
        edit
    }

    pub(crate) fn finish_edit(&mut self) {
        let center = self.viewport.center_on_scroll;
        self.ensure_visible(self.cursor.position(), center, false);
        self.refresh_scrollbar();
        self.request_full_update();
        self.generation.nudge();
    }

    // --- MARK: Undo/redo ---
    /// Undoes the most recent edit. Returns `false` when there is nothing
    /// to undo.
    pub fn undo(&mut self, _time_ms: f64) -> bool {
        if self.policy.read_only {
            return false;
        }
        let Some(record) = self.history.undo() else {
            return false;
        };
        let inserted_chars = record.inserted.chars().count();
        self.apply_replace(
            record.start,
            record.start + inserted_chars,
            &record.removed,
        );
        self.cursor = record.cursor_before;
        self.cursor.clamp(self.doc.len());
        self.finish_edit();
        true
    }

    /// Redoes the most recently undone edit.
    pub fn redo(&mut self, _time_ms: f64) -> bool {
        if self.policy.read_only {
            return false;
        }
        let Some(record) = self.history.redo() else {
            return false;
        };
        let removed_chars = record.removed.chars().count();
        self.apply_replace(
            record.start,
            record.start + removed_chars,
            &record.inserted,
        );
        self.cursor = record.cursor_after;
        self.cursor.clamp(self.doc.len());
        self.finish_edit();
        true
    }

    /// Returns `true` if there is an edit to undo.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Returns `true` if there is an undone edit to redo.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // --- MARK: Clipboard ---
    /// Builds the multi-encoding snapshot of the selection.
    pub fn selection_content(&self) -> Option<ClipboardContent> {
        let range = self.cursor.selection_range();
        if range.is_empty() {
            return None;
        }
        let from = self.doc.locate(range.start);
        let to = self.doc.locate(range.end);
        let mut fragments = Vec::with_capacity(to.block - from.block + 1);
        for index in from.block..=to.block {
            let Some(block) = self.doc.block(index) else {
                continue;
            };
            let start = if index == from.block { from.offset } else { 0 };
            let end = if index == to.block {
                to.offset
            } else {
                block.char_len()
            };
            fragments.push(Fragment {
                text: block.slice(start, end).to_owned(),
                marker: block.marker(),
            });
        }
        Some(ClipboardContent::from_fragments(fragments))
    }

    /// Publishes the selection snapshot to the host clipboard.
    pub fn copy_selection(&mut self) -> bool {
        match self.selection_content() {
            Some(content) => {
                self.events.emit(EditorEvent::ClipboardSet(content));
                true
            }
            None => false,
        }
    }

    /// Copies the selection, then deletes it.
    pub fn cut_selection(&mut self, time_ms: f64) -> bool {
        if self.policy.read_only {
            return false;
        }
        if self.copy_selection() {
            self.delete_selection(time_ms);
            true
        } else {
            false
        }
    }

    /// Pastes an external payload at the cursor, replacing the selection.
    pub fn paste(&mut self, payload: &PastePayload, time_ms: f64) -> bool {
        if self.policy.read_only {
            return false;
        }
        let Some(fragments) = payload.resolve(self.policy.accept_rich_text) else {
            return false;
        };
        let range = self.cursor.selection_range();
        if !range.is_empty() {
            self.edit_replace(range, "", time_ms);
        }
        let at = self.cursor.position();
        self.insert_fragments(at, &fragments, time_ms);
        true
    }

    /// Inserts fragments at an offset, restoring their markers on the
    /// blocks they become. Returns the number of code points inserted.
    pub(crate) fn insert_fragments(
        &mut self,
        at: usize,
        fragments: &[Fragment],
        time_ms: f64,
    ) -> usize {
        let text = fragments
            .iter()
            .map(|f| f.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let added = text.chars().count();
        self.edit_replace(at..at, &text, time_ms);
        let first = self.doc.locate(at).block;
        for (index, fragment) in fragments.iter().enumerate() {
            if fragment.marker != Marker::None {
                self.doc.set_block_marker(first + index, fragment.marker);
            }
        }
        added
    }

    // --- MARK: Rendering boundary ---
    /// Resolves the lines currently inside the viewport, top to bottom.
    ///
    /// This is the renderer's paint list: each entry carries the text range
    /// to draw and where to draw it.
    pub fn visible_lines(&mut self) -> Vec<VisibleLine> {
        let lh = self.engine.line_height();
        let height = self.viewport.height;
        let mut out = Vec::new();
        let mut cur = (self.viewport.top_block, self.viewport.top_line);
        let mut y = -self.viewport.frac;
        while y < height {
            self.engine.ensure_block(&mut self.doc, cur.0);
            let Some(line) = self.doc.block(cur.0).and_then(|b| b.layout.line(cur.1).copied())
            else {
                break;
            };
            out.push(VisibleLine {
                block: cur.0,
                line,
                range: self.line_range(cur.0, cur.1),
                y,
            });
            match self.line_below(cur.0, cur.1) {
                Some(next) => {
                    cur = next;
                    y += lh;
                }
                None => break,
            }
        }
        out
    }

    /// Returns the rectangles covering the selection within the viewport.
    ///
    /// Selected empty lines and selected separators produce a small stub
    /// rectangle so the selection stays visible.
    pub fn selection_geometry(&mut self) -> Vec<Rect> {
        let sel = self.cursor.selection_range();
        let mut rects = Vec::new();
        if sel.is_empty() {
            return rects;
        }
        let lh = self.engine.line_height() as f64;
        let height = self.viewport.height as f64;
        let h_offset = self.viewport.h_offset as f64;
        let mut cur = (self.viewport.top_block, self.viewport.top_line);
        let mut y = -(self.viewport.frac as f64);
        loop {
            if y >= height {
                break;
            }
            let line_range = self.line_range(cur.0, cur.1);
            if line_range.start > sel.end {
                break;
            }
            let block_end = self.doc.block_end(cur.0);
            let is_last_line = line_range.end == block_end;
            let covers_separator =
                is_last_line && sel.start <= block_end && sel.end > block_end;
            let start = sel.start.max(line_range.start);
            let end = sel.end.min(line_range.end);
            if start < end || covers_separator {
                let line_data = self
                    .doc
                    .block(cur.0)
                    .and_then(|b| b.layout.line(cur.1).copied())
                    .unwrap_or_default();
                let loc_start = start.max(line_range.start) - line_range.start;
                let loc_end = end.max(start) - line_range.start;
                let x0 = self.engine.x_of(
                    &self.doc,
                    cur.0,
                    &line_data,
                    line_data.start + loc_start,
                ) as f64;
                let mut x1 = self
                    .engine
                    .x_of(&self.doc, cur.0, &line_data, line_data.start + loc_end)
                    as f64;
                if covers_separator {
                    x1 = x1.max(x0 + MIN_RECT_WIDTH);
                }
                rects.push(Rect::new(x0 - h_offset, y, x1 - h_offset, y + lh));
            }
            match self.line_below(cur.0, cur.1) {
                Some(next) => {
                    cur = next;
                    y += lh;
                }
                None => break,
            }
        }
        rects
    }

    /// Returns `true` when the cursor should currently be drawn.
    ///
    /// The cursor is withheld while blinked off or while the input method
    /// asked for it to be hidden.
    pub fn cursor_visible(&self) -> bool {
        if let Some(compose) = &self.compose {
            if compose.hide_cursor {
                return false;
            }
        }
        self.input.blink_on
    }

    /// Returns the cursor rectangle in viewport coordinates.
    ///
    /// This is the draw position regardless of blink state; pair it with
    /// [`cursor_visible`](Self::cursor_visible) when painting.
    pub fn cursor_geometry(&mut self, width: f32) -> Option<Rect> {
        let pos = self.cursor.position();
        let (block, line) = self.engine.block_line_of(&mut self.doc, pos)?;
        let line_data = self.doc.block(block)?.layout.line(line).copied()?;
        let loc = self.doc.locate(pos);
        let x =
            self.engine.x_of(&self.doc, block, &line_data, loc.offset) - self.viewport.h_offset;
        let y = self.engine.global_line(&mut self.doc, block, line) as f32
            * self.engine.line_height()
            - self.vertical_offset();
        Some(Rect::new(
            x as f64,
            y as f64,
            (x + width) as f64,
            (y + self.engine.line_height()) as f64,
        ))
    }
}
