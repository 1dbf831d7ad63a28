// Copyright 2025 the Galley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed change notifications for the embedding host.
//!
//! The editor replaces dense signal wiring with a small queue of typed
//! events. Emission order is deterministic: layout changes are queued before
//! size changes, size changes before scrollbar updates, scrollbar updates
//! before repaint requests, so a host draining the queue never observes
//! stale geometry.

use kurbo::Rect;

use crate::clipboard::ClipboardContent;
use crate::layout::DocumentSize;

/// Opaque representation of a generation.
///
/// Obtained from [`Editor::generation`](crate::Editor::generation).
// Overflow handling: generations are only compared, so wrapping is fine.
#[derive(PartialEq, Eq, Default, Clone, Copy, Debug)]
pub struct Generation(u32);

impl Generation {
    /// Make it not what it currently is.
    pub(crate) fn nudge(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }
}

/// Identifies a host timer owned by the editor.
///
/// Timers are scoped tokens: the editor requests them through
/// [`EditorEvent::TimerStarted`] and releases them through
/// [`EditorEvent::TimerStopped`]; the host fires them back with
/// [`Editor::timer_fired`](crate::Editor::timer_fired) on the same thread.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct TimerToken(pub(crate) u64);

/// Scrollbar state for the external scrollbar widget.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub struct ScrollInfo {
    /// Current value, in lines from the top of the document.
    pub value: usize,
    /// Maximum value.
    pub range: usize,
    /// Lines covered by one page step.
    pub page_step: usize,
}

/// A change notification produced by the editor.
#[derive(Clone, Debug)]
pub enum EditorEvent {
    /// A single block was laid out again; its geometry may have changed.
    LayoutChanged {
        /// Index of the block.
        block: usize,
    },
    /// The document size (widest block, total line count) changed.
    DocumentSizeChanged(DocumentSize),
    /// The visible region moved by a small pixel delta; the rendering
    /// surface may blit instead of repainting.
    Scrolled {
        /// Horizontal delta in pixels.
        dx: f32,
        /// Vertical delta in pixels.
        dy: f32,
    },
    /// The scrollbar range, page step or value changed.
    ScrollbarChanged(ScrollInfo),
    /// A region of the viewport needs repainting.
    UpdateRequested(Rect),
    /// The selection was copied or cut; the host should publish the snapshot
    /// to the system clipboard.
    ClipboardSet(ClipboardContent),
    /// A paste chord was dispatched; the host should gather the available
    /// encodings and call [`Editor::paste`](crate::Editor::paste).
    PasteRequested,
    /// A drag was started with the current selection as payload.
    DragStarted(ClipboardContent),
    /// The host should start firing a periodic timer.
    TimerStarted {
        /// Token to fire back.
        token: TimerToken,
        /// Period in milliseconds.
        period_ms: f64,
    },
    /// The host should stop the timer identified by `token`.
    TimerStopped {
        /// Token previously started.
        token: TimerToken,
    },
}

/// Ordered queue of pending notifications.
#[derive(Default, Debug)]
pub(crate) struct EventQueue {
    events: Vec<EditorEvent>,
}

impl EventQueue {
    pub(crate) fn emit(&mut self, event: EditorEvent) {
        self.events.push(event);
    }

    pub(crate) fn drain(&mut self) -> Vec<EditorEvent> {
        core::mem::take(&mut self.events)
    }
}
