// Copyright 2025 the Galley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared helpers for driving an editor with fixed metrics.

use galley::{Editor, FixedMeasure, Modifiers, PointerEvent};

/// Advance of every code point under test metrics.
pub const ADVANCE: f32 = 8.0;
/// Line height under test metrics.
pub const LINE: f32 = 16.0;

/// An editor with a 40-column, 10-row viewport and fixed metrics.
pub fn editor(text: &str) -> Editor<FixedMeasure> {
    editor_sized(text, 40, 10)
}

/// An editor with a viewport of the given column/row count.
pub fn editor_sized(text: &str, cols: usize, rows: usize) -> Editor<FixedMeasure> {
    let measure = FixedMeasure {
        advance: ADVANCE,
        line_height: LINE,
    };
    let mut editor = Editor::with_text(measure, text);
    editor.set_viewport_size(cols as f32 * ADVANCE, rows as f32 * LINE);
    editor.drain_events();
    editor
}

/// Pointer event at a column/row position in the viewport.
pub fn pointer(col: f32, row: f32, time_ms: f64) -> PointerEvent {
    PointerEvent {
        x: col * ADVANCE,
        y: row * LINE + LINE / 2.0,
        mods: Modifiers::default(),
        time_ms,
    }
}

/// Pointer event with shift held.
pub fn shift_pointer(col: f32, row: f32, time_ms: f64) -> PointerEvent {
    PointerEvent {
        mods: Modifiers {
            shift: true,
            ctrl: false,
        },
        ..pointer(col, row, time_ms)
    }
}

/// A full click: press and release.
pub fn click(editor: &mut Editor<FixedMeasure>, col: f32, row: f32, time_ms: f64) {
    let ev = pointer(col, row, time_ms);
    assert!(editor.pointer_down(ev), "click must hit text");
    editor.pointer_up(ev);
}

/// A double click, leaving the button pressed after the second press.
pub fn double_click_hold(editor: &mut Editor<FixedMeasure>, col: f32, row: f32, time_ms: f64) {
    click(editor, col, row, time_ms);
    assert!(editor.pointer_down(pointer(col, row, time_ms + 50.0)));
}

/// A triple click, released.
pub fn triple_click(editor: &mut Editor<FixedMeasure>, col: f32, row: f32, time_ms: f64) {
    click(editor, col, row, time_ms);
    click(editor, col, row, time_ms + 50.0);
    click(editor, col, row, time_ms + 100.0);
}

/// Ctrl-modified chord.
pub fn ctrl() -> Modifiers {
    Modifiers {
        ctrl: true,
        shift: false,
    }
}

/// Shift-modified chord.
pub fn shift() -> Modifiers {
    Modifiers {
        ctrl: false,
        shift: true,
    }
}
