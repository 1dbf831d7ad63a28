// Copyright 2025 the Galley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scrolling and the visible region.
//!
//! The viewport is described by the top block, the top line within it, a
//! fractional sub-line pixel offset, and a horizontal offset. Scrolling by a
//! small delta emits [`EditorEvent::Scrolled`] so the rendering surface can
//! blit; larger jumps request a full repaint.

use kurbo::Rect;

use crate::editor::Editor;
use crate::event::{EditorEvent, ScrollInfo};
use crate::measure::TextMeasure;

/// Viewport state.
#[derive(Clone, Default, Debug)]
pub(crate) struct Viewport {
    pub(crate) top_block: usize,
    pub(crate) top_line: usize,
    /// Sub-line pixel offset into the top line, `0.0..line height`.
    pub(crate) frac: f32,
    pub(crate) h_offset: f32,
    pub(crate) width: f32,
    pub(crate) height: f32,
    /// Centering scroll policy: scrollbar ranges allow scrolling past the
    /// end and ensure-visible targets the middle of the viewport.
    pub(crate) center_on_scroll: bool,
    pub(crate) last_info: Option<ScrollInfo>,
}

impl<M: TextMeasure> Editor<M> {
    /// Sets the viewport size in pixels and reflows for the new width.
    pub fn set_viewport_size(&mut self, width: f32, height: f32) {
        if (self.viewport.width, self.viewport.height) == (width, height) {
            return;
        }
        self.viewport.width = width;
        self.viewport.height = height;
        self.engine
            .set_max_advance(&mut self.doc, width, &mut self.events);
        self.refresh_scrollbar();
        self.request_full_update();
        self.generation.nudge();
    }

    /// Enables or disables the centering scroll policy.
    pub fn set_center_on_scroll(&mut self, center: bool) {
        self.viewport.center_on_scroll = center;
        self.refresh_scrollbar();
    }

    /// Returns the viewport rectangle at the origin.
    pub fn viewport_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.viewport.width as f64, self.viewport.height as f64)
    }

    /// Global line index of the viewport top.
    pub(crate) fn top_global(&mut self) -> usize {
        self.engine
            .global_line(&mut self.doc, self.viewport.top_block, self.viewport.top_line)
    }

    /// Vertical pixel offset of the viewport top from the document top.
    pub(crate) fn vertical_offset(&mut self) -> f32 {
        self.top_global() as f32 * self.engine.line_height() + self.viewport.frac
    }

    /// Scrolls so that `block`/`line` becomes the top of the viewport,
    /// applying `h_delta` to the horizontal offset.
    ///
    /// Indices clamp to the document. A small move emits a pixel-exact
    /// scroll; anything else requests a full update. The scrollbar state is
    /// refreshed either way.
    pub fn set_top(&mut self, block: usize, line: usize, h_delta: f32) {
        let block = block.min(self.doc.block_count() - 1);
        self.engine.ensure_block(&mut self.doc, block);
        let count = self
            .doc
            .block(block)
            .map(|b| b.layout.line_count())
            .unwrap_or(0);
        let line = line.min(count.saturating_sub(1));

        let old_v = self.vertical_offset();
        let old_h = self.viewport.h_offset;
        self.viewport.top_block = block;
        self.viewport.top_line = line;
        self.viewport.frac = 0.0;
        self.viewport.h_offset = (old_h + h_delta).max(0.0);
        let new_v = self.vertical_offset();

        let dy = old_v - new_v;
        let dx = old_h - self.viewport.h_offset;
        if dy != 0.0 || dx != 0.0 {
            if dy.abs() < self.viewport.height && dx.abs() < self.viewport.width {
                self.events.emit(EditorEvent::Scrolled { dx, dy });
            } else {
                self.request_full_update();
            }
        }
        self.refresh_scrollbar();
        self.generation.nudge();
    }

    /// Entry point for the external scrollbar's "value changed"
    /// notification; the value is a global line index.
    pub fn scroll_to_line(&mut self, line: usize) {
        if let Some((block, line)) = self.engine.block_for_line(&mut self.doc, line) {
            self.set_top(block, line, 0.0);
        } else {
            self.set_top(0, 0, 0.0);
        }
    }

    /// Scrolls the minimum amount needed to bring `position` into view.
    ///
    /// With `center` the line is centered when it was outside the view;
    /// `force_center` recenters unconditionally.
    pub fn ensure_visible(&mut self, position: usize, center: bool, force_center: bool) {
        let Some((block, line)) = self.engine.block_line_of(&mut self.doc, position) else {
            return;
        };
        let lh = self.engine.line_height();
        let y = self.engine.global_line(&mut self.doc, block, line) as f32 * lh;
        let top_v = self.vertical_offset();
        let visible = y >= top_v && y + lh <= top_v + self.viewport.height;
        if visible && !force_center {
            return;
        }

        let (nb, nl) = if center || force_center {
            self.walk_lines_back(block, line, self.viewport.height / 2.0)
        } else if y < top_v {
            (block, line)
        } else {
            self.walk_lines_back(block, line, self.viewport.height - lh)
        };
        self.set_top(nb, nl, 0.0);
    }

    /// Walks backward from a line, accumulating line heights until `needed`
    /// is covered, and returns the line reached.
    fn walk_lines_back(&mut self, block: usize, line: usize, needed: f32) -> (usize, usize) {
        let lh = self.engine.line_height();
        let mut cur = (block, line);
        let mut remaining = needed;
        while remaining >= lh {
            match self.line_above(cur.0, cur.1) {
                Some(prev) => {
                    cur = prev;
                    remaining -= lh;
                }
                None => break,
            }
        }
        cur
    }

    /// Moves the viewport one page up or down.
    ///
    /// When `move_cursor` is set, the cursor's vertical position relative to
    /// the viewport is remembered before the page and restored afterwards by
    /// repeated single-line moves, which preserves the horizontal position
    /// rather than the character index.
    pub fn page_move(&mut self, down: bool, extend: bool, move_cursor: bool) {
        let lh = self.engine.line_height();
        if lh <= 0.0 || self.viewport.height <= 0.0 {
            return;
        }
        let page_lines = ((self.viewport.height / lh).floor() as usize).max(1);

        let remembered = self.cursor_viewport_y().unwrap_or(0.0);

        let top = self.top_global();
        let total = self.engine.total_lines().max(1);
        let new_top = if down {
            (top + page_lines).min(total - 1)
        } else {
            top.saturating_sub(page_lines)
        };
        if let Some((block, line)) = self.engine.block_for_line(&mut self.doc, new_top) {
            self.set_top(block, line, 0.0);
        }

        if move_cursor {
            if self.cursor.h_pos.is_none() {
                let x = self.x_at(self.cursor.position());
                self.cursor.h_pos = Some(x);
            }
            loop {
                let Some(y) = self.cursor_viewport_y() else {
                    break;
                };
                let done = if down { y >= remembered } else { y <= remembered };
                if done {
                    break;
                }
                let before = self.cursor.position();
                self.move_position(
                    if down {
                        crate::editing::Motion::Down
                    } else {
                        crate::editing::Motion::Up
                    },
                    extend,
                );
                if self.cursor.position() == before {
                    break;
                }
            }
        }
    }

    /// Vertical position of the cursor's line relative to the viewport top.
    pub(crate) fn cursor_viewport_y(&mut self) -> Option<f32> {
        let pos = self.cursor.position();
        let (block, line) = self.engine.block_line_of(&mut self.doc, pos)?;
        let y = self.engine.global_line(&mut self.doc, block, line) as f32
            * self.engine.line_height();
        Some(y - self.vertical_offset())
    }

    /// Computes the scrollbar state.
    ///
    /// The non-centering mode sizes the last page exactly by walking
    /// backward from the last block; the centering mode approximates and
    /// allows scrolling past the end.
    pub fn scroll_info(&mut self) -> ScrollInfo {
        let lh = self.engine.line_height();
        let total = self.engine.total_lines();
        let page_step = if lh > 0.0 {
            ((self.viewport.height / lh).floor() as usize).max(1)
        } else {
            1
        };
        let value = self.top_global();
        if self.viewport.center_on_scroll {
            ScrollInfo {
                value,
                range: total.saturating_sub(1),
                page_step,
            }
        } else {
            let mut fit = 0_usize;
            let mut used = 0.0;
            'blocks: for index in (0..self.doc.block_count()).rev() {
                self.engine.ensure_block(&mut self.doc, index);
                let count = self
                    .doc
                    .block(index)
                    .map(|b| b.layout.line_count())
                    .unwrap_or(0);
                for _ in 0..count {
                    if used + lh > self.viewport.height {
                        break 'blocks;
                    }
                    used += lh;
                    fit += 1;
                }
            }
            ScrollInfo {
                value,
                range: total.saturating_sub(fit.max(1)),
                page_step,
            }
        }
    }

    /// Emits a scrollbar update if the state changed since the last one.
    pub(crate) fn refresh_scrollbar(&mut self) {
        let info = self.scroll_info();
        if self.viewport.last_info != Some(info) {
            self.viewport.last_info = Some(info);
            self.events.emit(EditorEvent::ScrollbarChanged(info));
        }
    }

    /// Hit-tests a viewport point to a document offset.
    ///
    /// Points outside the viewport or below the last line miss and return
    /// `None`; callers treat a miss as an instruction to ignore the event.
    pub fn offset_at(&mut self, x: f32, y: f32) -> Option<usize> {
        if y < 0.0 || y >= self.viewport.height {
            return None;
        }
        let lh = self.engine.line_height();
        if lh <= 0.0 {
            return None;
        }
        let abs = self.vertical_offset() + y;
        let global = (abs / lh).floor() as usize;
        if global >= self.engine.total_lines() {
            return None;
        }
        let (block, line) = self.engine.block_for_line(&mut self.doc, global)?;
        let line_data = self.doc.block(block)?.layout.line(line).copied()?;
        let offset =
            self.engine
                .offset_in_line(&self.doc, block, &line_data, x + self.viewport.h_offset);
        Some(self.doc.block_start(block) + offset)
    }

    /// Requests a repaint of the whole viewport.
    pub(crate) fn request_full_update(&mut self) {
        let rect = self.viewport_rect();
        self.events.emit(EditorEvent::UpdateRequested(rect));
    }
}
