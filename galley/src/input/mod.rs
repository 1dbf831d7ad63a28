// Copyright 2025 the Galley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The input-event state machine.
//!
//! Keyboard, mouse, drag-and-drop and IME events arrive here and are turned
//! into cursor and document mutations. Every handler returns whether the
//! event was consumed; unconsumed events propagate to the host. Per-flavor
//! behavior is data, not subclassing: one controller configured by
//! [`EditPolicy`].

mod keymap;

use core::ops::Range;

use keymap::{command_for, Command};

pub use keymap::{Key, Modifiers};

use crate::clipboard::PastePayload;
use crate::editing::AnchorBase;
use crate::editor::Editor;
use crate::event::{EditorEvent, TimerToken};
use crate::measure::TextMeasure;

/// Double/triple click promotion window, in milliseconds.
const MULTI_CLICK_MS: f64 = 400.0;
/// Maximum pointer travel between clicks of a multi-click, in pixels.
const MULTI_CLICK_SLOP: f32 = 4.0;
/// Pointer travel needed before a press inside the selection becomes a drag.
const DRAG_THRESHOLD: f32 = 4.0;
/// Cursor blink half-period, in milliseconds.
const BLINK_PERIOD_MS: f64 = 500.0;

/// Capability flags for the input controller.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct EditPolicy {
    /// Only navigation, selection and copy are permitted.
    pub read_only: bool,
    /// Double-click arms word-granular drag extension.
    pub word_selection: bool,
    /// Presses inside the selection may start a drag.
    pub drag_enabled: bool,
    /// Rich clipboard encodings are accepted on paste and drop.
    pub accept_rich_text: bool,
}

impl Default for EditPolicy {
    fn default() -> Self {
        Self {
            read_only: false,
            word_selection: true,
            drag_enabled: true,
            accept_rich_text: true,
        }
    }
}

/// A pointer event in viewport coordinates.
#[derive(Copy, Clone, Debug)]
pub struct PointerEvent {
    /// X position within the viewport.
    pub x: f32,
    /// Y position within the viewport.
    pub y: f32,
    /// Modifiers held.
    pub mods: Modifiers,
    /// Host timestamp in milliseconds.
    pub time_ms: f64,
}

/// Formatting override for a preedit sub-range, in code points relative to
/// the preedit text.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PreeditSpan {
    /// Range within the preedit text.
    pub range: Range<usize>,
    /// Draw an underline.
    pub underline: bool,
    /// Draw with the selection highlight.
    pub highlight: bool,
}

/// An IME composition event.
///
/// `commit` carries text the input method has finalized; `preedit` the
/// still-composing text. An event with an empty preedit ends composition.
/// `cursor` is the embedded cursor as `(offset, length)` in code points
/// relative to the preedit; a zero length hides the cursor.
#[derive(Clone, Default, Debug)]
pub struct ImeEvent {
    /// Finalized text, inserted at the cursor.
    pub commit: String,
    /// Composing text, held in the composition buffer.
    pub preedit: String,
    /// Embedded cursor `(offset, length)`.
    pub cursor: Option<(usize, usize)>,
    /// Formatting overrides for preedit sub-ranges.
    pub spans: Vec<PreeditSpan>,
}

/// The action requested by a completed drop.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum DropAction {
    /// Insert a copy of the payload.
    Copy,
    /// Insert the payload and remove it from the source.
    Move,
}

/// Transient state of an in-progress IME composition.
#[derive(Clone, Debug)]
pub struct Composition {
    /// Index of the block the composition is bound to.
    pub block: usize,
    /// The preedit text.
    pub text: String,
    /// Embedded cursor offset within the preedit, in code points.
    pub cursor: Option<usize>,
    /// The input method asked for the cursor to be hidden.
    pub hide_cursor: bool,
    /// Formatting overrides.
    pub spans: Vec<PreeditSpan>,
}

#[derive(Copy, Clone, Debug)]
pub(crate) struct ClickState {
    time_ms: f64,
    x: f32,
    y: f32,
    count: u32,
}

/// Mouse, drag, focus and timer state owned by the input controller.
#[derive(Default, Debug)]
pub(crate) struct InputState {
    pressed: bool,
    press_x: f32,
    press_y: f32,
    press_offset: usize,
    might_drag: bool,
    dragging: bool,
    drag_origin: Option<Range<usize>>,
    last_click: Option<ClickState>,
    blink: Option<TimerToken>,
    pub(crate) blink_on: bool,
    focused: bool,
    next_timer: u64,
}

impl InputState {
    pub(crate) fn new() -> Self {
        Self {
            blink_on: true,
            ..Self::default()
        }
    }
}

impl<M: TextMeasure> Editor<M> {
    // --- MARK: Keyboard ---
    /// Dispatches a key chord.
    ///
    /// Returns `false` when the chord is not in the table, is not permitted
    /// in the current mode, or arrives during composition; the host should
    /// propagate such events.
    pub fn key_down(&mut self, key: Key, mods: Modifiers, time_ms: f64) -> bool {
        let Some((command, extend)) = command_for(key, mods) else {
            return false;
        };
        if self.compose.is_some() {
            // The input method owns the keyboard while composing.
            return false;
        }
        if self.policy.read_only && !command.allowed_read_only() {
            return false;
        }
        let center = self.viewport.center_on_scroll;
        match command {
            Command::Move(motion) => {
                self.move_position(motion, extend);
                self.ensure_visible(self.cursor.position(), center, false);
                self.request_full_update();
            }
            Command::Page(down) => {
                self.page_move(down, extend, true);
                self.request_full_update();
            }
            Command::SelectAll => {
                self.select_all();
                self.request_full_update();
            }
            Command::Copy => {
                self.copy_selection();
            }
            Command::Cut => {
                self.cut_selection(time_ms);
            }
            Command::Paste => {
                self.events.emit(EditorEvent::PasteRequested);
            }
            Command::Undo => {
                self.undo(time_ms);
            }
            Command::Redo => {
                self.redo(time_ms);
            }
            Command::DeleteBackward => self.backdelete(time_ms),
            Command::DeleteForward => self.delete_forward(time_ms),
            Command::InsertNewline => self.insert_or_replace_selection("\n", time_ms),
            Command::Insert(c) => {
                let mut buf = [0_u8; 4];
                let text: &str = c.encode_utf8(&mut buf);
                self.insert_or_replace_selection(text, time_ms);
            }
        }
        self.input.blink_on = true;
        true
    }

    // --- MARK: Mouse ---
    /// Handles a primary-button press.
    ///
    /// Promotes repeated presses within the multi-click window to word and
    /// then block selection; presses inside an existing selection arm the
    /// drag gesture instead of collapsing it.
    pub fn pointer_down(&mut self, ev: PointerEvent) -> bool {
        let Some(hit) = self.offset_at(ev.x, ev.y) else {
            return false;
        };
        self.input.blink_on = true;

        let count = match self.input.last_click {
            Some(last)
                if ev.time_ms - last.time_ms <= MULTI_CLICK_MS
                    && (ev.x - last.x).abs() <= MULTI_CLICK_SLOP
                    && (ev.y - last.y).abs() <= MULTI_CLICK_SLOP
                    && last.count < 3 =>
            {
                last.count + 1
            }
            _ => 1,
        };
        self.input.last_click = Some(ClickState {
            time_ms: ev.time_ms,
            x: ev.x,
            y: ev.y,
            count,
        });
        self.input.pressed = true;
        self.input.press_x = ev.x;
        self.input.press_y = ev.y;
        self.input.press_offset = hit;
        self.input.might_drag = false;
        self.input.dragging = false;

        match count {
            1 => {
                if ev.mods.shift {
                    let x = ev.x + self.viewport.h_offset;
                    match self.select.base.clone() {
                        AnchorBase::Word(_) => self.extend_word_selection(hit, x),
                        AnchorBase::Block(_) => self.extend_block_selection(hit),
                        AnchorBase::Char => self.cursor.set_position(hit, true),
                    }
                    self.select.selecting = true;
                } else if self.policy.drag_enabled
                    && !self.cursor.is_collapsed()
                    && self.cursor.selection_range().contains(&hit)
                {
                    self.input.might_drag = true;
                } else {
                    self.cursor.set_position(hit, false);
                    self.select.base = AnchorBase::Char;
                    self.select.selecting = true;
                }
            }
            2 => {
                let seed = self.word_range_at(hit);
                self.cursor.select(seed.start, seed.end);
                self.select.base = if self.policy.word_selection {
                    AnchorBase::Word(seed)
                } else {
                    AnchorBase::Char
                };
                self.select.selecting = true;
            }
            _ => {
                let seed = self.block_range_at(hit);
                self.cursor.select(seed.start, seed.end);
                self.select.base = AnchorBase::Block(seed);
                self.select.selecting = true;
            }
        }
        self.generation.nudge();
        self.request_full_update();
        true
    }

    /// Handles pointer motion while the primary button is held.
    pub fn pointer_move(&mut self, ev: PointerEvent) -> bool {
        if !self.input.pressed {
            return false;
        }
        if self.input.dragging {
            // The platform drag loop owns the pointer now.
            return true;
        }
        if self.input.might_drag {
            let moved = (ev.x - self.input.press_x).abs() > DRAG_THRESHOLD
                || (ev.y - self.input.press_y).abs() > DRAG_THRESHOLD;
            if moved {
                self.input.dragging = true;
                self.input.drag_origin = Some(self.cursor.selection_range());
                if let Some(content) = self.selection_content() {
                    self.events.emit(EditorEvent::DragStarted(content));
                }
            }
            return true;
        }
        if !self.select.selecting {
            return false;
        }
        let Some(hit) = self.offset_at(ev.x, ev.y) else {
            return false;
        };
        let x = ev.x + self.viewport.h_offset;
        match self.select.base.clone() {
            AnchorBase::Char => self.cursor.set_position(hit, true),
            AnchorBase::Word(_) => self.extend_word_selection(hit, x),
            AnchorBase::Block(_) => self.extend_block_selection(hit),
        }
        self.ensure_visible(self.cursor.position(), false, false);
        self.generation.nudge();
        self.request_full_update();
        true
    }

    /// Handles release of the primary button.
    ///
    /// Ends the selecting state without discarding the selection; a press
    /// inside the selection that never became a drag collapses it here.
    pub fn pointer_up(&mut self, _ev: PointerEvent) -> bool {
        if !self.input.pressed {
            return false;
        }
        self.input.pressed = false;
        self.select.selecting = false;
        if self.input.might_drag && !self.input.dragging {
            self.cursor.set_position(self.input.press_offset, false);
            self.select.base = AnchorBase::Char;
            self.generation.nudge();
            self.request_full_update();
        }
        self.input.might_drag = false;
        true
    }

    // --- MARK: Drag and drop ---
    /// Completes a drop at a viewport point.
    ///
    /// A move-action drop from this editor back into itself removes the
    /// original selection after inserting; every other drop copies.
    pub fn drop_at(
        &mut self,
        x: f32,
        y: f32,
        payload: &PastePayload,
        action: DropAction,
        same_source: bool,
        time_ms: f64,
    ) -> bool {
        if self.policy.read_only {
            self.drag_finished();
            return false;
        }
        let Some(hit) = self.offset_at(x, y) else {
            self.drag_finished();
            return false;
        };
        let Some(fragments) = payload.resolve(self.policy.accept_rich_text) else {
            self.drag_finished();
            return false;
        };
        let origin = if same_source {
            self.input.drag_origin.clone()
        } else {
            None
        };
        if let Some(origin) = &origin {
            if action == DropAction::Move && hit >= origin.start && hit <= origin.end {
                // Dropping the selection onto itself moves nothing.
                self.drag_finished();
                return true;
            }
        }

        self.cursor.set_position(hit, false);
        let added = self.insert_fragments(hit, &fragments, time_ms);

        if action == DropAction::Move {
            if let Some(origin) = origin {
                // The insertion may have shifted the original selection.
                let (start, end) = if origin.start >= hit {
                    (origin.start + added, origin.end + added)
                } else {
                    (origin.start, origin.end)
                };
                self.edit_replace(start..end, "", time_ms);
                // Leave the cursor at the end of the dropped text.
                let target = if start >= hit + added {
                    hit + added
                } else {
                    hit + added - (end - start)
                };
                self.cursor.set_position(target, false);
            }
        }
        self.drag_finished();
        self.finish_edit();
        true
    }

    /// Clears drag state after a drop, or after the drag was cancelled.
    pub fn drag_finished(&mut self) {
        self.input.dragging = false;
        self.input.might_drag = false;
        self.input.drag_origin = None;
    }

    // --- MARK: IME ---
    /// Handles an IME composition event.
    ///
    /// Committed text replaces the selection; preedit text and its
    /// formatting overrides are stored in the composition buffer, scoped to
    /// the block containing the cursor. An event carrying nothing while no
    /// composition is active is a no-op and left unconsumed.
    pub fn ime_event(&mut self, ev: &ImeEvent, time_ms: f64) -> bool {
        if self.policy.read_only {
            return false;
        }
        if ev.commit.is_empty()
            && ev.preedit.is_empty()
            && ev.spans.is_empty()
            && self.compose.is_none()
        {
            return false;
        }
        if !ev.commit.is_empty() {
            self.insert_or_replace_selection(&ev.commit, time_ms);
        }
        if ev.preedit.is_empty() {
            self.compose = None;
        } else {
            let block = self.doc.locate(self.cursor.position()).block;
            self.compose = Some(Composition {
                block,
                text: ev.preedit.clone(),
                cursor: ev.cursor.map(|(offset, _)| offset),
                hide_cursor: !matches!(ev.cursor, Some((_, len)) if len > 0),
                spans: ev.spans.clone(),
            });
        }
        self.generation.nudge();
        self.request_full_update();
        true
    }

    /// Cancels any in-progress composition, discarding the preedit.
    pub fn cancel_composition(&mut self) {
        if self.compose.take().is_some() {
            self.generation.nudge();
            self.request_full_update();
        }
    }

    /// Returns `true` while an IME composition is active.
    pub fn is_composing(&self) -> bool {
        self.compose.is_some()
    }

    /// Returns the active composition buffer, if any.
    pub fn composition(&self) -> Option<&Composition> {
        self.compose.as_ref()
    }

    // --- MARK: Focus and timers ---
    /// Notifies the editor that it gained keyboard focus.
    pub fn focus_in(&mut self) {
        self.input.focused = true;
        self.input.blink_on = true;
        if self.input.blink.is_none() {
            let token = TimerToken(self.input.next_timer);
            self.input.next_timer += 1;
            self.input.blink = Some(token);
            self.events.emit(EditorEvent::TimerStarted {
                token,
                period_ms: BLINK_PERIOD_MS,
            });
        }
        self.request_full_update();
    }

    /// Returns `true` while the editor has keyboard focus.
    pub fn has_focus(&self) -> bool {
        self.input.focused
    }

    /// Notifies the editor that it lost keyboard focus.
    ///
    /// An active composition is cancelled; the blink timer is released.
    pub fn focus_out(&mut self) {
        self.input.focused = false;
        self.cancel_composition();
        if let Some(token) = self.input.blink.take() {
            self.events.emit(EditorEvent::TimerStopped { token });
        }
        self.input.blink_on = true;
        self.request_full_update();
    }

    /// Delivers a timer tick for a token previously started by the editor.
    pub fn timer_fired(&mut self, token: TimerToken) {
        if self.input.blink == Some(token) {
            self.input.blink_on = !self.input.blink_on;
            // Repaint the cursor cell in either phase, so the host can both
            // draw and erase it.
            if let Some(rect) = self.cursor_geometry(1.0) {
                self.events.emit(EditorEvent::UpdateRequested(rect));
            }
        }
    }
}
